//! Window handles and the window creation pipeline.
//!
//! A window handle is composite: besides the backend window id it carries
//! the monitor it was created against and the video mode that was honored
//! at creation. The backend cannot report a window's refresh rate back,
//! so fullscreen transitions replay the stored mode instead of asking.

pub mod state;

pub use state::WindowState;

use std::rc::Rc;

use bitflags::bitflags;

use crate::callbacks::WindowCallbacks;
use crate::error::{checked, platform_or_unknown, Error, Result};
use crate::instance::{validate_allocator, AllocationCallbacks, Instance, SharedSystem};
use crate::monitor::Monitor;
use crate::system::{
    MonitorId, SystemError, WindowHintBool, WindowHintI32, WindowHintString, WindowId,
};
use crate::types::{
    ContentScale, ExtensionChain, Extent2D, FrameExtents, ImageData, Offset2D, Position,
    StructureType, VideoMode, DONT_CARE,
};
use crate::vk::{VkInstance, VkResult, VkSurfaceKhr};

/// Cursor behavior over a window's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorMode {
    /// Visible, free-moving cursor.
    #[default]
    Normal,
    /// Invisible over the content area, otherwise unconstrained.
    Hidden,
    /// Hidden and locked to the window, providing unbounded motion.
    Disabled,
    /// Visible but confined to the content area.
    Captured,
}

bitflags! {
    /// Window creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowCreateFlags: u32 {
        /// Do not give the window input focus at creation.
        const NO_INITIAL_FOCUS = 0x0000_0001;
        /// Do not center the cursor on fullscreen windows.
        const DONT_CENTER_CURSOR = 0x0000_0002;
        /// Request an alpha-composited framebuffer.
        const TRANSPARENT_FRAMEBUFFER = 0x0000_0004;
        /// Resize the window to match monitor content scale.
        const SCALE_TO_MONITOR = 0x0000_0008;
        /// Do not scale the framebuffer with the content scale.
        const NO_SCALE_FRAMEBUFFER = 0x0000_0010;
        /// Apply [`WindowCreateInfo::initial_cursor_position`] after
        /// creation.
        const SET_INITIAL_CURSOR_POSITION = 0x0000_0020;
        /// Allow switching to the integrated GPU on macOS.
        const COCOA_GRAPHICS_SWITCHING = 0x0010_0000;
        /// Let Alt+Space open the window menu on Windows.
        const WIN32_KEYBOARD_MENU = 0x0020_0000;
        /// Honor the process show command on Windows.
        const WIN32_SHOWDEFAULT = 0x0040_0000;
    }
}

/// Parameters of window creation.
///
/// Creation runs in three phases: pure validation (no backend calls),
/// backend creation under programmed hints, and reconciliation of the
/// remaining initial state onto the new window. A failure in the last
/// phase destroys the half-configured window before returning.
#[derive(Default)]
pub struct WindowCreateInfo {
    /// Must be [`StructureType::WindowCreateInfo`].
    pub s_type: Option<StructureType>,
    /// Extension chain; must be `None`.
    pub next: Option<ExtensionChain>,
    /// Creation flags.
    pub flags: WindowCreateFlags,
    /// The video mode to honor. Fullscreen windows adopt its size and
    /// refresh rate; windowed ones store it for later fullscreen
    /// transitions. [`DONT_CARE`] fields are resolved against the
    /// monitor's current mode.
    pub requested_video_mode: VideoMode,
    /// Cursor position applied when
    /// [`WindowCreateFlags::SET_INITIAL_CURSOR_POSITION`] is set.
    pub initial_cursor_position: Position,
    /// macOS frame autosave name.
    pub cocoa_frame_name: String,
    /// X11 class name.
    pub x11_class_name: String,
    /// X11 instance name.
    pub x11_instance_name: String,
    /// Wayland app_id.
    pub wayland_app_id: String,
    /// Complete initial window state.
    pub initial_state: WindowState,
}

/// A snapshot of a window's derived properties.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowProperties {
    /// Framebuffer size in pixels.
    pub framebuffer_size: Extent2D,
    /// Decoration extents, [`FrameExtents::UNREPORTABLE`] where the
    /// platform cannot say.
    pub frame_extents: FrameExtents,
    /// Content scale.
    pub content_scale: ContentScale,
    /// The video mode stored in the handle.
    pub video_mode: VideoMode,
    /// The monitor stored in the handle.
    pub monitor: MonitorId,
}

/// A window.
///
/// The handle owns its backend window: dropping it without calling
/// [`destroy`](Self::destroy) leaks the backend object until the
/// instance is destroyed.
pub struct Window {
    shared: SharedSystem,
    raw: WindowId,
    monitor: MonitorId,
    video_mode: VideoMode,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.raw)
            .field("monitor", &self.monitor)
            .field("video_mode", &self.video_mode)
            .finish()
    }
}

/// Resolves [`DONT_CARE`] fields of a requested mode against a monitor's
/// current mode.
fn resolve_mode(requested: VideoMode, current: VideoMode) -> VideoMode {
    VideoMode {
        width: requested.width,
        height: requested.height,
        red_bits: if requested.red_bits == DONT_CARE {
            current.red_bits
        } else {
            requested.red_bits
        },
        green_bits: if requested.green_bits == DONT_CARE {
            current.green_bits
        } else {
            requested.green_bits
        },
        blue_bits: if requested.blue_bits == DONT_CARE {
            current.blue_bits
        } else {
            requested.blue_bits
        },
        refresh_rate: if requested.refresh_rate == DONT_CARE {
            current.refresh_rate
        } else {
            requested.refresh_rate
        },
    }
}

impl Window {
    pub(crate) fn create(
        instance: &Instance,
        monitor: &Monitor,
        create_info: &WindowCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<Self> {
        // Phase 1: validation, before any backend call.
        match create_info.s_type {
            None | Some(StructureType::WindowCreateInfo) => {}
            Some(_) => return Err(Error::InvalidEnumValue),
        }
        if create_info.next.is_some() {
            return Err(Error::FeatureNotSupported);
        }
        validate_allocator(allocator)?;

        let desired = &create_info.initial_state;
        let fullscreen = desired.fullscreen.as_bool()?;
        let mode = create_info.requested_video_mode;
        if mode.width <= 0 || mode.height <= 0 {
            return Err(Error::InvalidNumericValue);
        }
        if !fullscreen && (desired.size.width <= 0 || desired.size.height <= 0) {
            return Err(Error::InvalidNumericValue);
        }
        // The stored mode and the initial state describe one window; their
        // sizes must agree.
        if mode.width != desired.size.width || mode.height != desired.size.height {
            return Err(Error::InvalidNumericValue);
        }

        let mut shared = instance.shared.borrow_mut();
        shared.ensure_live()?;
        if !shared.allocator_matches(allocator) {
            return Err(Error::FeatureNotSupported);
        }

        let (current_mode, error) =
            checked(shared.system.as_mut(), |s| s.video_mode(monitor.id()));
        let current_mode = match (current_mode, error) {
            (Some(current_mode), None) => current_mode,
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };
        let stored_mode = resolve_mode(mode, current_mode);

        // Phase 2: program hints and create.
        let flags = create_info.flags;
        let system = shared.system.as_mut();
        let bool_hints = [
            (
                WindowHintBool::Focused,
                !flags.contains(WindowCreateFlags::NO_INITIAL_FOCUS),
            ),
            (
                WindowHintBool::CenterCursor,
                !flags.contains(WindowCreateFlags::DONT_CENTER_CURSOR),
            ),
            (
                WindowHintBool::TransparentFramebuffer,
                flags.contains(WindowCreateFlags::TRANSPARENT_FRAMEBUFFER),
            ),
            (
                WindowHintBool::ScaleToMonitor,
                flags.contains(WindowCreateFlags::SCALE_TO_MONITOR),
            ),
            (
                WindowHintBool::ScaleFramebuffer,
                !flags.contains(WindowCreateFlags::NO_SCALE_FRAMEBUFFER),
            ),
            (
                WindowHintBool::CocoaGraphicsSwitching,
                flags.contains(WindowCreateFlags::COCOA_GRAPHICS_SWITCHING),
            ),
            (
                WindowHintBool::Win32KeyboardMenu,
                flags.contains(WindowCreateFlags::WIN32_KEYBOARD_MENU),
            ),
            (
                WindowHintBool::Win32Showdefault,
                flags.contains(WindowCreateFlags::WIN32_SHOWDEFAULT),
            ),
            (WindowHintBool::Resizable, desired.resizable.as_bool()?),
            (WindowHintBool::Visible, desired.visible.as_bool()?),
            (WindowHintBool::Decorated, desired.decorated.as_bool()?),
            (WindowHintBool::AutoIconify, desired.auto_iconify.as_bool()?),
            (WindowHintBool::Floating, desired.floating.as_bool()?),
            (WindowHintBool::Maximized, desired.maximized.as_bool()?),
            (WindowHintBool::FocusOnShow, desired.focus_on_show.as_bool()?),
            (
                WindowHintBool::MousePassthrough,
                desired.mouse_passthrough.as_bool()?,
            ),
        ];
        for (hint, value) in bool_hints {
            let ((), error) = checked(system, |s| s.window_hint_bool(hint, value));
            crate::error::strict(error)?;
        }
        let i32_hints = [
            (WindowHintI32::PositionX, desired.position.x),
            (WindowHintI32::PositionY, desired.position.y),
            (WindowHintI32::RedBits, stored_mode.red_bits),
            (WindowHintI32::GreenBits, stored_mode.green_bits),
            (WindowHintI32::BlueBits, stored_mode.blue_bits),
            (WindowHintI32::RefreshRate, stored_mode.refresh_rate),
        ];
        for (hint, value) in i32_hints {
            let ((), error) = checked(system, |s| s.window_hint_i32(hint, value));
            crate::error::strict(error)?;
        }
        let string_hints = [
            (
                WindowHintString::CocoaFrameName,
                create_info.cocoa_frame_name.as_str(),
            ),
            (
                WindowHintString::X11ClassName,
                create_info.x11_class_name.as_str(),
            ),
            (
                WindowHintString::X11InstanceName,
                create_info.x11_instance_name.as_str(),
            ),
            (
                WindowHintString::WaylandAppId,
                create_info.wayland_app_id.as_str(),
            ),
        ];
        for (hint, value) in string_hints {
            let ((), error) = checked(system, |s| s.window_hint_string(hint, value));
            crate::error::strict(error)?;
        }

        let size = if fullscreen {
            Extent2D {
                width: stored_mode.width,
                height: stored_mode.height,
            }
        } else {
            desired.size
        };
        let (raw, error) = checked(system, |s| {
            s.create_window(size, &desired.title, fullscreen.then(|| monitor.id()))
        });
        let raw = match (raw, error) {
            (Some(raw), None) => raw,
            (_, Some(SystemError::InvalidValue)) => return Err(Error::InvalidNumericValue),
            (_, Some(SystemError::FormatUnavailable)) => {
                return Err(Error::PixelFormatNotSupported)
            }
            (_, Some(SystemError::OutOfMemory)) => return Err(Error::OutOfMemory),
            (_, Some(SystemError::ApiUnavailable)) => return Err(Error::ApiUnavailable),
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };

        // Phase 3: reconcile the residual initial state onto the new
        // window. On failure the half-configured window is destroyed.
        let finish = (|| {
            if flags.contains(WindowCreateFlags::SET_INITIAL_CURSOR_POSITION) {
                let ((), error) = checked(shared.system.as_mut(), |s| {
                    s.set_cursor_position(raw, create_info.initial_cursor_position)
                });
                match error {
                    None => {}
                    Some(SystemError::FeatureUnavailable) => {
                        return Err(Error::FeatureNotSupported)
                    }
                    Some(SystemError::PlatformError) => return Err(Error::Platform),
                    Some(_) => return Err(Error::Unknown),
                }
            }
            state::reconcile(&mut shared, raw, monitor.id(), stored_mode, desired)
        })();
        if let Err(error) = finish {
            let (_, _cleanup) = checked(shared.system.as_mut(), |s| s.destroy_window(raw));
            return Err(error);
        }

        log::debug!("window created: {:?} ({}x{})", raw, size.width, size.height);
        drop(shared);
        Ok(Self {
            shared: Rc::clone(&instance.shared),
            raw,
            monitor: monitor.id(),
            video_mode: stored_mode,
        })
    }

    /// The backend id of this window.
    pub fn id(&self) -> WindowId {
        self.raw
    }

    /// The video mode stored in the handle.
    pub fn video_mode(&self) -> VideoMode {
        self.video_mode
    }

    /// Destroys the window.
    ///
    /// A mismatched allocator returns the window untouched alongside
    /// [`Error::InvalidPointer`].
    pub fn destroy(self, allocator: Option<&AllocationCallbacks>) -> Result<(), (Error, Self)> {
        let precheck = {
            let shared = self.shared.borrow();
            if let Err(error) = shared.ensure_live() {
                Some(error)
            } else if !shared.allocator_matches(allocator) {
                Some(Error::InvalidPointer)
            } else {
                None
            }
        };
        if let Some(error) = precheck {
            return Err((error, self));
        }
        let result = {
            let mut shared = self.shared.borrow_mut();
            shared.window_callbacks.remove(self.raw);
            let ((), error) = checked(shared.system.as_mut(), |s| s.destroy_window(self.raw));
            platform_or_unknown(error)
        };
        log::debug!("window destroyed: {:?}", self.raw);
        result.map_err(|error| (error, self))
    }

    /// Reads the window's complete mutable state.
    pub fn state(&self) -> Result<WindowState> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        state::enumerate(&mut shared, self.raw)
    }

    /// Drives the window toward a desired state, touching only what
    /// differs. See [`state`] for ordering and failure semantics.
    pub fn apply_state(&self, desired: &WindowState) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        state::reconcile(&mut shared, self.raw, self.monitor, self.video_mode, desired)
    }

    /// Rebinds the window to another monitor and video mode.
    ///
    /// The stored monitor and mode are always updated; the live window is
    /// only touched while fullscreen. Changing channel depths at runtime
    /// is not supported.
    pub fn switch_monitor(&mut self, monitor: &Monitor, mode: VideoMode) -> Result<()> {
        if mode.width <= 0 || mode.height <= 0 {
            return Err(Error::InvalidNumericValue);
        }
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;

        let (current_mode, error) =
            checked(shared.system.as_mut(), |s| s.video_mode(monitor.id()));
        let current_mode = match (current_mode, error) {
            (Some(current_mode), None) => current_mode,
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };
        let resolved = resolve_mode(mode, current_mode);
        if resolved.red_bits != current_mode.red_bits
            || resolved.green_bits != current_mode.green_bits
            || resolved.blue_bits != current_mode.blue_bits
        {
            return Err(Error::FeatureNotSupported);
        }

        let (live_monitor, error) =
            checked(shared.system.as_mut(), |s| s.window_monitor(self.raw));
        platform_or_unknown(error)?;
        if live_monitor.is_some() {
            let ((), error) = checked(shared.system.as_mut(), |s| {
                s.set_window_monitor(
                    self.raw,
                    Some(monitor.id()),
                    Offset2D::default(),
                    Extent2D {
                        width: resolved.width,
                        height: resolved.height,
                    },
                    resolved.refresh_rate,
                )
            });
            match error {
                None => {}
                Some(SystemError::FeatureUnavailable) => return Err(Error::FeatureNotSupported),
                Some(SystemError::PlatformError) => return Err(Error::Platform),
                Some(_) => return Err(Error::Unknown),
            }
        }
        self.monitor = monitor.id();
        self.video_mode = resolved;
        Ok(())
    }

    /// Derived properties: framebuffer size, frame extents and content
    /// scale, plus the stored monitor and mode.
    pub fn properties(&self) -> Result<WindowProperties> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        // The stored monitor must still be connected; a vanished monitor
        // makes the stored mode meaningless.
        let (monitors, error) = checked(shared.system.as_mut(), |s| s.monitors());
        platform_or_unknown(error)?;
        if !monitors.contains(&self.monitor) {
            return Err(Error::Unknown);
        }
        let (framebuffer_size, error) =
            checked(shared.system.as_mut(), |s| s.framebuffer_size(self.raw));
        platform_or_unknown(error)?;
        let (frame_extents, error) =
            checked(shared.system.as_mut(), |s| s.frame_extents(self.raw));
        let frame_extents = match (frame_extents, error) {
            (Some(frame_extents), None) => frame_extents,
            // Decoration extents are a best-effort report.
            (_, Some(SystemError::FeatureUnavailable)) => FrameExtents::UNREPORTABLE,
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };
        let (content_scale, error) =
            checked(shared.system.as_mut(), |s| s.window_content_scale(self.raw));
        platform_or_unknown(error)?;
        Ok(WindowProperties {
            framebuffer_size,
            frame_extents,
            content_scale,
            video_mode: self.video_mode,
            monitor: self.monitor,
        })
    }

    /// The close-requested flag.
    pub fn should_close(&self) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (value, error) =
            checked(shared.system.as_mut(), |s| s.window_should_close(self.raw));
        crate::error::strict(error)?;
        Ok(value)
    }

    /// Sets the close-requested flag.
    pub fn set_should_close(&self, value: bool) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_window_should_close(self.raw, value)
        });
        crate::error::strict(error)
    }

    /// Registers the window's callback set, replacing any previous one.
    pub fn set_callbacks(&self, callbacks: WindowCallbacks) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        shared.window_callbacks.insert(self.raw, callbacks);
        Ok(())
    }

    /// Gives the window input focus.
    pub fn focus(&self) -> Result<()> {
        self.simple_op(|s, w| s.focus_window(w))
    }

    /// Requests user attention on the window.
    pub fn request_attention(&self) -> Result<()> {
        self.simple_op(|s, w| s.request_window_attention(w))
    }

    /// Sets the window icon candidates; an empty slice reverts to the
    /// platform default.
    pub fn set_icon(&self, images: &[ImageData]) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_window_icon(self.raw, images)
        });
        map_window_error(error)
    }

    /// Constrains the aspect ratio; [`DONT_CARE`] for both disables the
    /// constraint.
    pub fn set_aspect_ratio(&self, numer: i32, denom: i32) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_window_aspect_ratio(self.raw, numer, denom)
        });
        map_window_error(error)
    }

    /// Constrains the content-area size; [`DONT_CARE`] leaves a bound
    /// open.
    pub fn set_size_limits(
        &self,
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    ) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_window_size_limits(self.raw, min_width, min_height, max_width, max_height)
        });
        map_window_error(error)
    }

    /// Sets the cursor image shown over the content area; `None` reverts
    /// to the default arrow.
    pub fn set_cursor(&self, cursor: Option<&crate::cursor::Cursor>) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let id = cursor.map(crate::cursor::Cursor::id);
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_window_cursor(self.raw, id)
        });
        map_window_error(error)
    }

    /// Creates a Vulkan surface for this window.
    ///
    /// The result code and surface handle are the backend's raw values;
    /// a non-success `VkResult` is returned as data, not mapped into
    /// this layer's error taxonomy.
    pub fn create_surface(&self, vk_instance: VkInstance) -> Result<(VkResult, VkSurfaceKhr)> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (pair, error) = checked(shared.system.as_mut(), |s| {
            s.create_window_surface(vk_instance, self.raw)
        });
        match error {
            None => Ok(pair),
            Some(SystemError::ApiUnavailable) => Err(Error::ApiUnavailable),
            Some(SystemError::PlatformError) => Err(Error::Platform),
            Some(_) => Err(Error::Unknown),
        }
    }

    fn simple_op(
        &self,
        op: impl FnOnce(&mut dyn crate::system::WindowSystem, WindowId),
    ) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| op(s, self.raw));
        map_window_error(error)
    }
}

fn map_window_error(error: Option<SystemError>) -> Result<()> {
    match error {
        None => Ok(()),
        Some(SystemError::FeatureUnavailable | SystemError::FeatureUnimplemented) => {
            Err(Error::FeatureNotSupported)
        }
        Some(SystemError::InvalidValue) => Err(Error::InvalidNumericValue),
        Some(SystemError::PlatformError) => Err(Error::Platform),
        Some(_) => Err(Error::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceCreateInfo;
    use crate::system::null::{Capabilities, NullSystem};
    use crate::test_support;
    use crate::types::Bool32;

    fn null_instance(system: NullSystem) -> Instance {
        Instance::create_with_system(
            Box::new(system),
            &InstanceCreateInfo::default(),
            None,
        )
        .unwrap()
    }

    fn windowed_info(width: i32, height: i32) -> WindowCreateInfo {
        let mut info = WindowCreateInfo::default();
        info.initial_state.size = Extent2D { width, height };
        info.initial_state.title = String::from("test");
        info.requested_video_mode = VideoMode {
            width,
            height,
            ..VideoMode::default()
        };
        info
    }

    #[test]
    fn test_bad_video_mode_fails_before_backend() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let before = system.mutation_count();

        let mut info = windowed_info(640, 480);
        info.requested_video_mode.width = 0;
        let result = instance.create_window(&monitor, &info, None);
        assert!(matches!(result, Err(Error::InvalidNumericValue)));
        assert_eq!(system.window_count(), 0);
        assert_eq!(system.mutation_count(), before);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_mode_and_size_mismatch_fails_before_backend() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let before = system.mutation_count();

        let mut info = windowed_info(640, 480);
        info.requested_video_mode.width = 800;
        info.requested_video_mode.height = 600;
        let result = instance.create_window(&monitor, &info, None);
        assert!(matches!(result, Err(Error::InvalidNumericValue)));
        assert_eq!(system.window_count(), 0);
        assert_eq!(system.mutation_count(), before);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_windowed_creation_and_destroy() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(800, 600), None)
            .unwrap();
        assert_eq!(system.window_count(), 1);

        let state = window.state().unwrap();
        assert_eq!(state.size, Extent2D { width: 800, height: 600 });
        assert_eq!(state.title, "test");
        assert_eq!(state.fullscreen, Bool32::FALSE);

        window.destroy(None).unwrap();
        assert_eq!(system.window_count(), 0);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_dont_care_mode_fields_resolved_from_monitor() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        let current = monitor.current_video_mode().unwrap();

        let mut info = windowed_info(640, 480);
        info.requested_video_mode.refresh_rate = DONT_CARE;
        let window = instance.create_window(&monitor, &info, None).unwrap();
        assert_eq!(window.video_mode().refresh_rate, current.refresh_rate);
        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_fullscreen_creation_adopts_mode_size() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();

        let mut info = windowed_info(1280, 720);
        info.initial_state.fullscreen = Bool32::TRUE;
        let window = instance.create_window(&monitor, &info, None).unwrap();
        let state = window.state().unwrap();
        assert_eq!(state.fullscreen, Bool32::TRUE);
        assert_eq!(state.size, Extent2D { width: 1280, height: 720 });
        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_format_unavailable_maps_to_pixel_format() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        system.force_window_create_error(Some(SystemError::FormatUnavailable));
        let result = instance.create_window(&monitor, &windowed_info(640, 480), None);
        assert!(matches!(result, Err(Error::PixelFormatNotSupported)));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_allocator_asymmetry_between_create_and_destroy() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();

        // Creation with a foreign allocator is a capability problem.
        let foreign = AllocationCallbacks {
            user_data: 1,
            ..AllocationCallbacks::default()
        };
        let result = instance.create_window(&monitor, &windowed_info(640, 480), Some(&foreign));
        assert!(matches!(
            result,
            Err(Error::InvalidPointer | Error::FeatureNotSupported)
        ));

        // Destruction with a foreign allocator is a pointer problem, and
        // returns the window intact.
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();
        fn allocate(_s: usize, _u: usize) -> usize {
            0
        }
        fn reallocate(_b: usize, _s: usize, _u: usize) -> usize {
            0
        }
        fn deallocate(_b: usize, _u: usize) {}
        let complete = AllocationCallbacks {
            user_data: 2,
            allocate: Some(allocate),
            reallocate: Some(reallocate),
            deallocate: Some(deallocate),
        };
        let (error, window) = window.destroy(Some(&complete)).unwrap_err();
        assert_eq!(error, Error::InvalidPointer);
        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        let state = window.state().unwrap();
        let before = system.mutation_count();
        window.apply_state(&state).unwrap();
        assert_eq!(system.mutation_count(), before);

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_reconcile_applies_only_differences() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        let mut desired = window.state().unwrap();
        desired.title = String::from("renamed");
        desired.size = Extent2D { width: 1024, height: 768 };
        let before = system.mutation_count();
        window.apply_state(&desired).unwrap();
        assert_eq!(system.mutation_count(), before + 2);

        let state = window.state().unwrap();
        assert_eq!(state.title, "renamed");
        assert_eq!(state.size, Extent2D { width: 1024, height: 768 });

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_string_creation_hints_reach_backend() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();

        let mut info = windowed_info(640, 480);
        info.wayland_app_id = String::from("com.example.session");
        info.x11_class_name = String::from("Session");
        info.x11_instance_name = String::from("session");
        let window = instance.create_window(&monitor, &info, None).unwrap();
        assert_eq!(
            system.hinted_string(WindowHintString::WaylandAppId),
            "com.example.session"
        );
        assert_eq!(system.hinted_string(WindowHintString::X11ClassName), "Session");
        assert_eq!(
            system.hinted_string(WindowHintString::X11InstanceName),
            "session"
        );
        assert_eq!(system.hinted_string(WindowHintString::CocoaFrameName), "");

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_properties_fail_when_stored_monitor_vanishes() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();
        assert!(window.properties().is_ok());

        system.disconnect_monitor(monitor.id());
        assert_eq!(window.properties().err(), Some(Error::Unknown));

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_hidden_window_shows_with_one_mutation() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();

        let mut info = windowed_info(640, 480);
        info.initial_state.visible = Bool32::FALSE;
        let window = instance.create_window(&monitor, &info, None).unwrap();
        assert_eq!(window.state().unwrap().visible, Bool32::FALSE);

        let mut desired = window.state().unwrap();
        desired.visible = Bool32::TRUE;
        let before = system.mutation_count();
        window.apply_state(&desired).unwrap();
        assert_eq!(system.mutation_count(), before + 1);
        assert_eq!(window.state().unwrap().visible, Bool32::TRUE);

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_reconcile_fullscreen_uses_stored_refresh_rate() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();

        let mut info = windowed_info(1920, 1080);
        info.requested_video_mode.refresh_rate = 60;
        let window = instance.create_window(&monitor, &info, None).unwrap();

        let mut desired = window.state().unwrap();
        desired.fullscreen = Bool32::TRUE;
        window.apply_state(&desired).unwrap();

        let state = window.state().unwrap();
        assert_eq!(state.fullscreen, Bool32::TRUE);
        assert_eq!(state.size, Extent2D { width: 1920, height: 1080 });
        assert_eq!(system.window_refresh_rate(window.id()), Some(60));

        // And back out again: the stored rate is re-supplied even though
        // the desired state cannot carry one.
        desired.fullscreen = Bool32::FALSE;
        desired.size = Extent2D { width: 640, height: 480 };
        window.apply_state(&desired).unwrap();
        assert_eq!(window.state().unwrap().fullscreen, Bool32::FALSE);
        assert_eq!(system.window_refresh_rate(window.id()), Some(60));

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_iconified_and_maximized_are_coupled() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        // Ask for both: iconified wins, maximized is deferred.
        let mut desired = window.state().unwrap();
        desired.iconified = Bool32::TRUE;
        desired.maximized = Bool32::TRUE;
        window.apply_state(&desired).unwrap();
        let state = window.state().unwrap();
        assert_eq!(state.iconified, Bool32::TRUE);

        // Dropping iconified restores and re-establishes maximization.
        desired.iconified = Bool32::FALSE;
        window.apply_state(&desired).unwrap();
        let state = window.state().unwrap();
        assert_eq!(state.iconified, Bool32::FALSE);
        assert_eq!(state.maximized, Bool32::TRUE);

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_tri_state_violation_rejected_before_mutation() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        let mut desired = window.state().unwrap();
        desired.fullscreen = Bool32(2);
        let before = system.mutation_count();
        assert_eq!(window.apply_state(&desired), Err(Error::InvalidEnumValue));
        assert_eq!(system.mutation_count(), before);

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_position_read_benign_but_write_hard() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities::wayland_like());
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        // Reads degrade to sentinels.
        let state = window.state().unwrap();
        assert_eq!(state.position.x, DONT_CARE);
        assert_eq!(state.position.y, DONT_CARE);

        // Writes are a hard capability failure.
        let mut desired = state.clone();
        desired.position = Offset2D { x: 100, y: 100 };
        assert_eq!(window.apply_state(&desired), Err(Error::FeatureNotSupported));

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_switch_monitor_rejects_depth_change() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        let mut window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();

        let mut mode = monitor.current_video_mode().unwrap();
        mode.red_bits = 10;
        assert_eq!(
            window.switch_monitor(&monitor, mode),
            Err(Error::FeatureNotSupported)
        );

        // A matching-depth switch updates the stored mode even while
        // windowed.
        let mut mode = monitor.current_video_mode().unwrap();
        mode.width = 800;
        mode.height = 600;
        window.switch_monitor(&monitor, mode).unwrap();
        assert_eq!(window.video_mode().width, 800);

        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_frame_extents_degrade_to_unreportable() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities {
            frame_extents: false,
            ..Capabilities::default()
        });
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        let window = instance
            .create_window(&monitor, &windowed_info(640, 480), None)
            .unwrap();
        let properties = window.properties().unwrap();
        assert_eq!(properties.frame_extents, FrameExtents::UNREPORTABLE);
        window.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }
}
