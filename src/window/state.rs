//! Whole-window state: enumeration and reconciliation.
//!
//! A [`WindowState`] value describes every mutable aspect of a window.
//! [`enumerate`] reads one from a live window; [`reconcile`] diffs a
//! desired state against the live window and issues only the backend
//! calls needed to close the gap, in a fixed order. Reconciling a state
//! the window already conforms to issues no mutating calls at all.
//!
//! Reconciliation is not transactional: a failing step aborts the pass
//! and leaves the steps before it applied. Order is chosen so that the
//! steps most likely to invalidate later reads run first, fullscreen
//! membership above all, since it redefines what size and position mean.

use crate::error::{checked, Error, Result};
use crate::instance::Shared;
use crate::system::{
    InputModeFlag, MonitorId, SystemError, WindowAttrib, WindowId, WindowSystem,
};
use crate::types::{Bool32, Extent2D, Offset2D, Position, VideoMode, DONT_CARE};
use crate::window::CursorMode;

/// Complete mutable state of a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    /// The window covers its monitor with its stored video mode.
    pub fullscreen: Bool32,
    /// The window is iconified.
    pub iconified: Bool32,
    /// The window is maximized. Subordinate to `iconified`: a window
    /// asked to be both ends up iconified, and maximized again once it
    /// is restored.
    pub maximized: Bool32,
    /// The user can resize the window.
    pub resizable: Bool32,
    /// The window is visible.
    pub visible: Bool32,
    /// The window has decorations.
    pub decorated: Bool32,
    /// Fullscreen windows iconify on focus loss.
    pub auto_iconify: Bool32,
    /// The window floats above others.
    pub floating: Bool32,
    /// The window gains focus when shown.
    pub focus_on_show: Bool32,
    /// Input passes through the window.
    pub mouse_passthrough: Bool32,
    /// The close-requested flag.
    pub should_close: Bool32,
    /// Keys stay pressed until polled.
    pub sticky_keys: Bool32,
    /// Mouse buttons stay pressed until polled.
    pub sticky_mouse_buttons: Bool32,
    /// Key events carry lock-key modifier bits.
    pub lock_key_mods: Bool32,
    /// Raw mouse motion while the cursor is disabled.
    pub raw_mouse_motion: Bool32,
    /// Cursor behavior over the content area.
    pub cursor_mode: CursorMode,
    /// Window title.
    pub title: String,
    /// Content-area position; [`DONT_CARE`] components are left alone.
    pub position: Offset2D,
    /// Content-area size, ignored while fullscreen.
    pub size: Extent2D,
    /// Cursor position relative to the content area.
    pub cursor_position: Position,
    /// Window opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// User pointer slot.
    pub user_pointer: usize,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            fullscreen: Bool32::FALSE,
            iconified: Bool32::FALSE,
            maximized: Bool32::FALSE,
            resizable: Bool32::TRUE,
            visible: Bool32::TRUE,
            decorated: Bool32::TRUE,
            auto_iconify: Bool32::TRUE,
            floating: Bool32::FALSE,
            focus_on_show: Bool32::TRUE,
            mouse_passthrough: Bool32::FALSE,
            should_close: Bool32::FALSE,
            sticky_keys: Bool32::FALSE,
            sticky_mouse_buttons: Bool32::FALSE,
            lock_key_mods: Bool32::FALSE,
            raw_mouse_motion: Bool32::FALSE,
            cursor_mode: CursorMode::Normal,
            title: String::new(),
            position: Offset2D {
                x: DONT_CARE,
                y: DONT_CARE,
            },
            size: Extent2D {
                width: 640,
                height: 480,
            },
            cursor_position: Position::default(),
            opacity: 1.0,
            user_pointer: 0,
        }
    }
}

/// Maps a backend error from a state read or write. Feature gaps are
/// hard failures here; benign handling is the caller's decision.
fn map_state_error(error: Option<SystemError>) -> Result<()> {
    match error {
        None => Ok(()),
        Some(SystemError::FeatureUnavailable | SystemError::FeatureUnimplemented) => {
            Err(Error::FeatureNotSupported)
        }
        Some(SystemError::InvalidValue) => Err(Error::InvalidNumericValue),
        Some(SystemError::InvalidEnum) => Err(Error::InvalidEnumValue),
        Some(SystemError::PlatformError) => Err(Error::Platform),
        Some(_) => Err(Error::Unknown),
    }
}

fn read_attrib(system: &mut dyn WindowSystem, window: WindowId, attrib: WindowAttrib) -> Result<bool> {
    let (value, error) = checked(system, |s| s.window_attrib(window, attrib));
    map_state_error(error)?;
    Ok(value)
}

fn write_attrib(
    system: &mut dyn WindowSystem,
    window: WindowId,
    attrib: WindowAttrib,
    value: bool,
) -> Result<()> {
    let ((), error) = checked(system, |s| s.set_window_attrib(window, attrib, value));
    map_state_error(error)
}

/// One diff step: write the attribute only when the live value differs.
fn sync_attrib(
    system: &mut dyn WindowSystem,
    window: WindowId,
    attrib: WindowAttrib,
    desired: Bool32,
) -> Result<()> {
    let desired = desired.as_bool()?;
    if read_attrib(system, window, attrib)? != desired {
        write_attrib(system, window, attrib, desired)?;
    }
    Ok(())
}

fn sync_input_mode(
    system: &mut dyn WindowSystem,
    window: WindowId,
    mode: InputModeFlag,
    desired: Bool32,
) -> Result<()> {
    let desired = desired.as_bool()?;
    let (current, error) = checked(system, |s| s.input_mode(window, mode));
    map_state_error(error)?;
    if current != desired {
        let ((), error) = checked(system, |s| s.set_input_mode(window, mode, desired));
        map_state_error(error)?;
    }
    Ok(())
}

/// Reads the complete state of a window.
///
/// Platform gaps are reported in-band rather than failing the whole
/// read: an unreadable position comes back as [`DONT_CARE`] components
/// and an unreadable opacity as `1.0`.
pub(crate) fn enumerate(shared: &mut Shared, window: WindowId) -> Result<WindowState> {
    let system = shared.system.as_mut();
    let mut state = WindowState::default();

    let (monitor, error) = checked(system, |s| s.window_monitor(window));
    map_state_error(error)?;
    state.fullscreen = Bool32::from(monitor.is_some());

    for (attrib, slot) in [
        (WindowAttrib::Iconified, &mut state.iconified),
        (WindowAttrib::Maximized, &mut state.maximized),
        (WindowAttrib::Resizable, &mut state.resizable),
        (WindowAttrib::Visible, &mut state.visible),
        (WindowAttrib::Decorated, &mut state.decorated),
        (WindowAttrib::AutoIconify, &mut state.auto_iconify),
        (WindowAttrib::Floating, &mut state.floating),
        (WindowAttrib::FocusOnShow, &mut state.focus_on_show),
        (WindowAttrib::MousePassthrough, &mut state.mouse_passthrough),
    ] {
        let (value, error) = checked(system, |s| s.window_attrib(window, attrib));
        map_state_error(error)?;
        *slot = Bool32::from(value);
    }

    let (should_close, error) = checked(system, |s| s.window_should_close(window));
    map_state_error(error)?;
    state.should_close = Bool32::from(should_close);

    for (mode, slot) in [
        (InputModeFlag::StickyKeys, &mut state.sticky_keys),
        (InputModeFlag::StickyMouseButtons, &mut state.sticky_mouse_buttons),
        (InputModeFlag::LockKeyMods, &mut state.lock_key_mods),
        (InputModeFlag::RawMouseMotion, &mut state.raw_mouse_motion),
    ] {
        let (value, error) = checked(system, |s| s.input_mode(window, mode));
        map_state_error(error)?;
        *slot = Bool32::from(value);
    }

    let (cursor_mode, error) = checked(system, |s| s.cursor_mode(window));
    map_state_error(error)?;
    state.cursor_mode = cursor_mode;

    let (title, error) = checked(system, |s| s.window_title(window));
    map_state_error(error)?;
    state.title = title.ok_or(Error::Unknown)?;

    let (position, error) = checked(system, |s| s.window_position(window));
    state.position = match error {
        None => position,
        Some(SystemError::FeatureUnavailable) => Offset2D {
            x: DONT_CARE,
            y: DONT_CARE,
        },
        other => {
            map_state_error(other)?;
            position
        }
    };

    let (size, error) = checked(system, |s| s.window_size(window));
    map_state_error(error)?;
    state.size = size;

    let (cursor_position, error) = checked(system, |s| s.cursor_position(window));
    map_state_error(error)?;
    state.cursor_position = cursor_position;

    let (opacity, error) = checked(system, |s| s.window_opacity(window));
    state.opacity = match error {
        None => opacity,
        Some(SystemError::FeatureUnavailable) => 1.0,
        other => {
            map_state_error(other)?;
            opacity
        }
    };

    let (user_pointer, error) = checked(system, |s| s.window_user_pointer(window));
    map_state_error(error)?;
    state.user_pointer = user_pointer;

    Ok(state)
}

/// Drives a window toward a desired state.
///
/// Every step is a predicate/action pair: the live value is read and the
/// backend is touched only on a mismatch. The pass aborts on the first
/// failing step.
pub(crate) fn reconcile(
    shared: &mut Shared,
    window: WindowId,
    stored_monitor: MonitorId,
    stored_mode: VideoMode,
    desired: &WindowState,
) -> Result<()> {
    let system = shared.system.as_mut();

    let desired_fullscreen = desired.fullscreen.as_bool()?;
    let desired_iconified = desired.iconified.as_bool()?;
    let desired_maximized = desired.maximized.as_bool()?;

    // Fullscreen membership first: it redefines size and position.
    let (current_monitor, error) = checked(system, |s| s.window_monitor(window));
    map_state_error(error)?;
    if desired_fullscreen != current_monitor.is_some() {
        let position = if desired.position.x == DONT_CARE || desired.position.y == DONT_CARE {
            Offset2D::default()
        } else {
            desired.position
        };
        // The backend cannot report the refresh rate a window was created
        // with, so the stored mode supplies it in both directions.
        let target = if desired_fullscreen {
            Some(stored_monitor)
        } else {
            None
        };
        let ((), error) = checked(system, |s| {
            s.set_window_monitor(
                window,
                target,
                position,
                desired.size,
                stored_mode.refresh_rate,
            )
        });
        map_state_error(error)?;
    }

    // Iconified next, coupled with maximized: restoring clears both
    // backend flags, so a restore re-establishes maximization when the
    // desired state asks for it.
    let current_iconified = read_attrib(system, window, WindowAttrib::Iconified)?;
    if desired_iconified && !current_iconified {
        let ((), error) = checked(system, |s| s.iconify_window(window));
        map_state_error(error)?;
    } else if !desired_iconified && current_iconified {
        let ((), error) = checked(system, |s| s.restore_window(window));
        map_state_error(error)?;
        if desired_maximized {
            let ((), error) = checked(system, |s| s.maximize_window(window));
            map_state_error(error)?;
        }
    }

    sync_attrib(system, window, WindowAttrib::Resizable, desired.resizable)?;

    let desired_visible = desired.visible.as_bool()?;
    let current_visible = read_attrib(system, window, WindowAttrib::Visible)?;
    if desired_visible != current_visible {
        let ((), error) = checked(system, |s| {
            if desired_visible {
                s.show_window(window);
            } else {
                s.hide_window(window);
            }
        });
        map_state_error(error)?;
    }

    sync_attrib(system, window, WindowAttrib::Decorated, desired.decorated)?;
    sync_attrib(system, window, WindowAttrib::AutoIconify, desired.auto_iconify)?;
    sync_attrib(system, window, WindowAttrib::Floating, desired.floating)?;

    // Maximized, guarded against undoing a requested iconification.
    let current_maximized = read_attrib(system, window, WindowAttrib::Maximized)?;
    if desired_maximized && !current_maximized && !desired_iconified {
        let ((), error) = checked(system, |s| s.maximize_window(window));
        map_state_error(error)?;
    } else if !desired_maximized && current_maximized && !desired_iconified {
        let ((), error) = checked(system, |s| s.restore_window(window));
        map_state_error(error)?;
    }

    sync_attrib(system, window, WindowAttrib::FocusOnShow, desired.focus_on_show)?;
    sync_attrib(
        system,
        window,
        WindowAttrib::MousePassthrough,
        desired.mouse_passthrough,
    )?;

    let desired_should_close = desired.should_close.as_bool()?;
    let (current_should_close, error) = checked(system, |s| s.window_should_close(window));
    map_state_error(error)?;
    if desired_should_close != current_should_close {
        let ((), error) = checked(system, |s| {
            s.set_window_should_close(window, desired_should_close)
        });
        map_state_error(error)?;
    }

    sync_input_mode(system, window, InputModeFlag::StickyKeys, desired.sticky_keys)?;
    sync_input_mode(
        system,
        window,
        InputModeFlag::StickyMouseButtons,
        desired.sticky_mouse_buttons,
    )?;
    sync_input_mode(system, window, InputModeFlag::LockKeyMods, desired.lock_key_mods)?;
    sync_input_mode(
        system,
        window,
        InputModeFlag::RawMouseMotion,
        desired.raw_mouse_motion,
    )?;

    let (current_cursor_mode, error) = checked(system, |s| s.cursor_mode(window));
    map_state_error(error)?;
    if current_cursor_mode != desired.cursor_mode {
        let ((), error) = checked(system, |s| s.set_cursor_mode(window, desired.cursor_mode));
        map_state_error(error)?;
    }

    let (current_title, error) = checked(system, |s| s.window_title(window));
    map_state_error(error)?;
    if current_title.as_deref() != Some(desired.title.as_str()) {
        let ((), error) = checked(system, |s| s.set_window_title(window, &desired.title));
        map_state_error(error)?;
    }

    // Position and size only make sense windowed; fullscreen geometry is
    // the video mode's business.
    if !desired_fullscreen {
        if desired.position.x != DONT_CARE && desired.position.y != DONT_CARE {
            let (current_position, error) = checked(system, |s| s.window_position(window));
            let current_position = match error {
                None => Some(current_position),
                // An unreadable position is not a mismatch by itself; the
                // write below decides whether positioning works at all.
                Some(SystemError::FeatureUnavailable) => None,
                other => return map_state_error(other),
            };
            if current_position != Some(desired.position) {
                let ((), error) =
                    checked(system, |s| s.set_window_position(window, desired.position));
                map_state_error(error)?;
            }
        }

        let (current_size, error) = checked(system, |s| s.window_size(window));
        map_state_error(error)?;
        if current_size != desired.size {
            let ((), error) = checked(system, |s| s.set_window_size(window, desired.size));
            map_state_error(error)?;
        }
    }

    let (current_cursor_position, error) = checked(system, |s| s.cursor_position(window));
    map_state_error(error)?;
    if current_cursor_position != desired.cursor_position {
        let ((), error) = checked(system, |s| {
            s.set_cursor_position(window, desired.cursor_position)
        });
        map_state_error(error)?;
    }

    if !(0.0..=1.0).contains(&desired.opacity) {
        return Err(Error::InvalidNumericValue);
    }
    let (current_opacity, error) = checked(system, |s| s.window_opacity(window));
    let current_opacity = match error {
        None => current_opacity,
        Some(SystemError::FeatureUnavailable) => 1.0,
        other => return map_state_error(other),
    };
    if (current_opacity - desired.opacity).abs() > f32::EPSILON {
        let ((), error) = checked(system, |s| s.set_window_opacity(window, desired.opacity));
        map_state_error(error)?;
    }

    let (current_user_pointer, error) = checked(system, |s| s.window_user_pointer(window));
    map_state_error(error)?;
    if current_user_pointer != desired.user_pointer {
        let ((), error) = checked(system, |s| {
            s.set_window_user_pointer(window, desired.user_pointer)
        });
        map_state_error(error)?;
    }

    Ok(())
}
