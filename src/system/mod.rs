//! The backend seam: a trait mirroring the wrapped window system's
//! capability surface, error discipline included.
//!
//! The wrapped library reports failure out-of-band. A call returns a
//! sentinel (`None`, `false`, a zeroed struct) and stashes an error code
//! that a later query drains. [`WindowSystem`] keeps that shape on purpose:
//! the translation layer above is in the business of converting exactly
//! this discipline into explicit results, so the seam must not pre-digest
//! it. After any trait call, [`WindowSystem::take_error`] yields the error
//! the call left behind, or `None`.
//!
//! The shipped implementation is the headless [`null::NullSystem`].

pub mod null;

use slotmap::new_key_type;

use crate::callbacks::Event;
use crate::cursor::CursorShape;
use crate::input::{Action, GamepadState, HatState};
use crate::types::{
    ContentScale, Extent2D, FrameExtents, GammaRamp, ImageData, Offset2D, Position, Rect2D,
    VideoMode,
};
use crate::vk::{ProcAddr, VkBool32, VkInstance, VkPhysicalDevice, VkResult, VkSurfaceKhr};
use crate::window::CursorMode;

new_key_type! {
    /// Versioned id of a backend window.
    pub struct WindowId;
    /// Versioned id of a backend monitor.
    pub struct MonitorId;
    /// Versioned id of a backend cursor.
    pub struct CursorId;
}

/// Error codes the backend can leave behind, one per condition the wrapped
/// library distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemError {
    /// The backend was used before initialization.
    NotInitialized,
    /// An argument was outside its enumeration.
    InvalidEnum,
    /// An argument was outside its numeric range.
    InvalidValue,
    /// Allocation failed.
    OutOfMemory,
    /// The graphics API is unavailable.
    ApiUnavailable,
    /// The requested API version is unavailable.
    VersionUnavailable,
    /// A platform-specific failure.
    PlatformError,
    /// The requested pixel format is unavailable.
    FormatUnavailable,
    /// The requested standard cursor is unavailable on this platform.
    CursorUnavailable,
    /// The platform cannot provide this feature.
    FeatureUnavailable,
    /// The platform has not implemented this feature yet.
    FeatureUnimplemented,
    /// No suitable platform could be found or initialized.
    PlatformUnavailable,
}

/// Platforms the backend can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    /// Windows.
    Win32,
    /// macOS.
    Cocoa,
    /// Wayland.
    Wayland,
    /// X11.
    X11,
    /// The headless null platform.
    Null,
}

/// Pre-initialization toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitHint {
    /// Expose joystick hats as buttons as well.
    JoystickHatButtons,
    /// Use libdecor for Wayland decorations.
    WaylandLibdecor,
    /// Prefer `VK_KHR_xcb_surface` over `VK_KHR_xlib_surface`.
    X11XcbVulkanSurface,
    /// Create the menu bar on macOS.
    CocoaMenubar,
    /// Change directory into the bundle resources on macOS.
    CocoaChdirResources,
}

/// Boolean window creation hints and attributes that can be set before
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowHintBool {
    /// Give the window input focus at creation.
    Focused,
    /// Center the cursor on fullscreen windows at creation.
    CenterCursor,
    /// Request an alpha-composited framebuffer.
    TransparentFramebuffer,
    /// Resize the window to match monitor content scale.
    ScaleToMonitor,
    /// Scale the framebuffer with the content scale.
    ScaleFramebuffer,
    /// Allow switching to the integrated GPU on macOS.
    CocoaGraphicsSwitching,
    /// Let Alt+Space open the window menu on Windows.
    Win32KeyboardMenu,
    /// Honor the process show command on Windows.
    Win32Showdefault,
    /// The window can be resized by the user.
    Resizable,
    /// The window starts visible.
    Visible,
    /// The window has decorations.
    Decorated,
    /// Fullscreen windows iconify on focus loss.
    AutoIconify,
    /// The window floats above others.
    Floating,
    /// The window starts maximized.
    Maximized,
    /// The window gains focus when shown.
    FocusOnShow,
    /// Input passes through the window.
    MousePassthrough,
}

/// Integer window creation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowHintI32 {
    /// Initial x position.
    PositionX,
    /// Initial y position.
    PositionY,
    /// Framebuffer red channel depth.
    RedBits,
    /// Framebuffer green channel depth.
    GreenBits,
    /// Framebuffer blue channel depth.
    BlueBits,
    /// Fullscreen refresh rate.
    RefreshRate,
}

/// String window creation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowHintString {
    /// macOS frame autosave name.
    CocoaFrameName,
    /// X11 class name.
    X11ClassName,
    /// X11 instance name.
    X11InstanceName,
    /// Wayland app_id.
    WaylandAppId,
}

/// Per-window boolean attributes readable and (mostly) writable after
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowAttrib {
    /// The window has input focus (read-only).
    Focused,
    /// The window is iconified (read-only; change via iconify/restore).
    Iconified,
    /// The window is maximized (read-only; change via maximize/restore).
    Maximized,
    /// The cursor is over the content area (read-only).
    Hovered,
    /// The window is visible (read-only; change via show/hide).
    Visible,
    /// The window can be resized by the user.
    Resizable,
    /// The window has decorations.
    Decorated,
    /// Fullscreen windows iconify on focus loss.
    AutoIconify,
    /// The window floats above others.
    Floating,
    /// The framebuffer is alpha-composited (read-only).
    TransparentFramebuffer,
    /// The window gains focus when shown.
    FocusOnShow,
    /// Input passes through the window.
    MousePassthrough,
}

/// Boolean per-window input modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputModeFlag {
    /// Keys stay pressed until polled.
    StickyKeys,
    /// Mouse buttons stay pressed until polled.
    StickyMouseButtons,
    /// Key events carry lock-key modifier bits.
    LockKeyMods,
    /// Raw (unaccelerated) mouse motion while the cursor is disabled.
    RawMouseMotion,
}

/// The capability surface of the wrapped window system.
///
/// Calls never return errors directly. A failed call returns its sentinel
/// value and leaves a [`SystemError`] to be drained by [`take_error`];
/// callers pair every call with that query.
///
/// [`take_error`]: WindowSystem::take_error
pub trait WindowSystem {
    /// Drains the stored error state.
    fn take_error(&mut self) -> Option<SystemError>;

    // Initialization and platform selection.

    /// Human-readable backend version string. Callable before init.
    fn version_string(&self) -> String;
    /// Whether the backend was compiled with support for a platform.
    /// Callable before init.
    fn platform_supported(&self, platform: PlatformId) -> bool;
    /// Sets a boolean pre-init hint.
    fn init_hint(&mut self, hint: InitHint, value: bool);
    /// Requests a specific platform, or automatic selection with `None`.
    fn init_platform_hint(&mut self, platform: Option<PlatformId>);
    /// Initializes the backend. Returns `false` on failure.
    fn init(&mut self) -> bool;
    /// Tears the backend down, destroying all remaining objects.
    fn terminate(&mut self);
    /// The platform selected at init, if initialized.
    fn platform(&self) -> Option<PlatformId>;

    // Global queries.

    /// Whether raw mouse motion is available.
    fn raw_mouse_motion_supported(&mut self) -> bool;
    /// Current timer value in ticks.
    fn timer_value(&mut self) -> u64;
    /// Timer frequency in ticks per second.
    fn timer_frequency(&mut self) -> u64;
    /// Platform scancode for a layout-independent key, or `-1`.
    fn key_scancode(&mut self, key: crate::input::Key) -> i32;
    /// Layout-specific name of a printable key, if any.
    fn key_name(&mut self, key: crate::input::Key, scancode: i32) -> Option<String>;
    /// Clipboard contents, if textual content is present.
    fn clipboard(&mut self) -> Option<String>;
    /// Replaces the clipboard contents.
    fn set_clipboard(&mut self, text: &str);

    // Event pump.

    /// Drains queued events without blocking.
    fn poll_events(&mut self) -> Vec<Event>;
    /// Blocks until at least one event is queued, then drains.
    fn wait_events(&mut self) -> Vec<Event>;
    /// Blocks up to `timeout` seconds, then drains.
    fn wait_events_timeout(&mut self, timeout: f64) -> Vec<Event>;
    /// Queues an empty event to wake a blocked pump.
    fn post_empty_event(&mut self);

    // Monitors.

    /// Connected monitors, primary first. Empty on failure.
    fn monitors(&mut self) -> Vec<MonitorId>;
    /// Virtual-screen position of a monitor.
    fn monitor_position(&mut self, monitor: MonitorId) -> Offset2D;
    /// Work area of a monitor.
    fn monitor_workarea(&mut self, monitor: MonitorId) -> Rect2D;
    /// Physical size of a monitor in millimetres.
    fn monitor_physical_size(&mut self, monitor: MonitorId) -> Extent2D;
    /// Content scale of a monitor.
    fn monitor_content_scale(&mut self, monitor: MonitorId) -> ContentScale;
    /// Human-readable monitor name.
    fn monitor_name(&mut self, monitor: MonitorId) -> Option<String>;
    /// Monitor user pointer slot.
    fn monitor_user_pointer(&mut self, monitor: MonitorId) -> usize;
    /// Sets the monitor user pointer slot.
    fn set_monitor_user_pointer(&mut self, monitor: MonitorId, value: usize);
    /// All video modes of a monitor, sorted ascending.
    fn video_modes(&mut self, monitor: MonitorId) -> Option<Vec<VideoMode>>;
    /// Current video mode of a monitor.
    fn video_mode(&mut self, monitor: MonitorId) -> Option<VideoMode>;
    /// Current gamma ramp of a monitor.
    fn gamma_ramp(&mut self, monitor: MonitorId) -> Option<GammaRamp>;
    /// Replaces the gamma ramp of a monitor.
    fn set_gamma_ramp(&mut self, monitor: MonitorId, ramp: &GammaRamp);
    /// Generates and applies a ramp from an exponent.
    fn set_gamma(&mut self, monitor: MonitorId, gamma: f32);

    // Window creation hints and lifetime.

    /// Sets a boolean creation hint.
    fn window_hint_bool(&mut self, hint: WindowHintBool, value: bool);
    /// Sets an integer creation hint.
    fn window_hint_i32(&mut self, hint: WindowHintI32, value: i32);
    /// Sets a string creation hint.
    fn window_hint_string(&mut self, hint: WindowHintString, value: &str);
    /// Creates a window under the current hints. `monitor` makes it
    /// fullscreen on that monitor.
    fn create_window(
        &mut self,
        size: Extent2D,
        title: &str,
        monitor: Option<MonitorId>,
    ) -> Option<WindowId>;
    /// Destroys a window.
    fn destroy_window(&mut self, window: WindowId);

    // Window state.

    /// Monitor the window is fullscreen on, if any.
    fn window_monitor(&mut self, window: WindowId) -> Option<MonitorId>;
    /// Moves the window between fullscreen and windowed mode.
    fn set_window_monitor(
        &mut self,
        window: WindowId,
        monitor: Option<MonitorId>,
        position: Offset2D,
        size: Extent2D,
        refresh_rate: i32,
    );
    /// Reads a boolean attribute.
    fn window_attrib(&mut self, window: WindowId, attrib: WindowAttrib) -> bool;
    /// Writes a writable boolean attribute.
    fn set_window_attrib(&mut self, window: WindowId, attrib: WindowAttrib, value: bool);
    /// The close-requested flag.
    fn window_should_close(&mut self, window: WindowId) -> bool;
    /// Sets the close-requested flag.
    fn set_window_should_close(&mut self, window: WindowId, value: bool);
    /// Reads a boolean input mode.
    fn input_mode(&mut self, window: WindowId, mode: InputModeFlag) -> bool;
    /// Writes a boolean input mode.
    fn set_input_mode(&mut self, window: WindowId, mode: InputModeFlag, value: bool);
    /// Current cursor mode.
    fn cursor_mode(&mut self, window: WindowId) -> CursorMode;
    /// Sets the cursor mode.
    fn set_cursor_mode(&mut self, window: WindowId, mode: CursorMode);
    /// Window title.
    fn window_title(&mut self, window: WindowId) -> Option<String>;
    /// Sets the window title.
    fn set_window_title(&mut self, window: WindowId, title: &str);
    /// Content-area position, if the platform can report it.
    fn window_position(&mut self, window: WindowId) -> Offset2D;
    /// Moves the content area.
    fn set_window_position(&mut self, window: WindowId, position: Offset2D);
    /// Content-area size.
    fn window_size(&mut self, window: WindowId) -> Extent2D;
    /// Resizes the content area.
    fn set_window_size(&mut self, window: WindowId, size: Extent2D);
    /// Cursor position relative to the content area.
    fn cursor_position(&mut self, window: WindowId) -> Position;
    /// Warps the cursor.
    fn set_cursor_position(&mut self, window: WindowId, position: Position);
    /// Window opacity in `0.0..=1.0`.
    fn window_opacity(&mut self, window: WindowId) -> f32;
    /// Sets the window opacity.
    fn set_window_opacity(&mut self, window: WindowId, opacity: f32);
    /// Window user pointer slot.
    fn window_user_pointer(&mut self, window: WindowId) -> usize;
    /// Sets the window user pointer slot.
    fn set_window_user_pointer(&mut self, window: WindowId, value: usize);
    /// Framebuffer size in pixels.
    fn framebuffer_size(&mut self, window: WindowId) -> Extent2D;
    /// Decoration extents, if the platform can report them.
    fn frame_extents(&mut self, window: WindowId) -> Option<FrameExtents>;
    /// Content scale of the window.
    fn window_content_scale(&mut self, window: WindowId) -> ContentScale;
    /// Iconifies the window.
    fn iconify_window(&mut self, window: WindowId);
    /// Restores the window from iconified or maximized state.
    fn restore_window(&mut self, window: WindowId);
    /// Maximizes the window.
    fn maximize_window(&mut self, window: WindowId);
    /// Makes the window visible.
    fn show_window(&mut self, window: WindowId);
    /// Hides the window.
    fn hide_window(&mut self, window: WindowId);
    /// Gives the window input focus.
    fn focus_window(&mut self, window: WindowId);
    /// Requests user attention on the window.
    fn request_window_attention(&mut self, window: WindowId);
    /// Sets the window icon candidates; empty reverts to the default.
    fn set_window_icon(&mut self, window: WindowId, images: &[ImageData]);
    /// Constrains the aspect ratio, `-1/-1` to disable.
    fn set_window_aspect_ratio(&mut self, window: WindowId, numer: i32, denom: i32);
    /// Constrains the content-area size, `-1` for unconstrained bounds.
    fn set_window_size_limits(
        &mut self,
        window: WindowId,
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    );
    /// Sets the cursor image shown over the content area; `None` reverts
    /// to the default arrow.
    fn set_window_cursor(&mut self, window: WindowId, cursor: Option<CursorId>);

    // Cursors.

    /// Creates a standard-shape cursor.
    fn create_standard_cursor(&mut self, shape: CursorShape) -> Option<CursorId>;
    /// Creates a cursor from pixel data with a hotspot.
    fn create_custom_cursor(&mut self, image: &ImageData, hotspot: Offset2D) -> Option<CursorId>;
    /// Destroys a cursor.
    fn destroy_cursor(&mut self, cursor: CursorId);

    // Joysticks. Ids are slot numbers in `0..16`.

    /// Whether a joystick is present in the slot.
    fn joystick_present(&mut self, joystick: i32) -> bool;
    /// Axis values of a joystick.
    fn joystick_axes(&mut self, joystick: i32) -> Option<Vec<f32>>;
    /// Button states of a joystick.
    fn joystick_buttons(&mut self, joystick: i32) -> Option<Vec<Action>>;
    /// Hat states of a joystick.
    fn joystick_hats(&mut self, joystick: i32) -> Option<Vec<HatState>>;
    /// Human-readable joystick name.
    fn joystick_name(&mut self, joystick: i32) -> Option<String>;
    /// Stable joystick GUID.
    fn joystick_guid(&mut self, joystick: i32) -> Option<String>;
    /// Whether the joystick has a gamepad mapping.
    fn joystick_is_gamepad(&mut self, joystick: i32) -> bool;
    /// Mapped gamepad name, if the joystick has a mapping.
    fn gamepad_name(&mut self, joystick: i32) -> Option<String>;
    /// Mapped gamepad state, if the joystick has a mapping.
    fn gamepad_state(&mut self, joystick: i32) -> Option<GamepadState>;
    /// Joystick user pointer slot.
    fn joystick_user_pointer(&mut self, joystick: i32) -> usize;
    /// Sets the joystick user pointer slot.
    fn set_joystick_user_pointer(&mut self, joystick: i32, value: usize);
    /// Merges gamepad mapping data. Returns `false` on parse failure.
    fn update_gamepad_mappings(&mut self, mappings: &str) -> bool;

    // Vulkan brokerage. Values pass through untranslated.

    /// Whether a Vulkan loader and at least one WSI extension are present.
    fn vulkan_supported(&mut self) -> bool;
    /// Resolves a Vulkan entry point through the loader.
    fn instance_proc_loader(&mut self, instance: VkInstance, name: &str) -> ProcAddr;
    /// Instance extensions required for surface creation.
    fn required_instance_extensions(&mut self) -> Option<Vec<String>>;
    /// Whether a queue family can present to windows of this system.
    fn physical_device_presentation_support(
        &mut self,
        instance: VkInstance,
        device: VkPhysicalDevice,
        queue_family: u32,
    ) -> VkBool32;
    /// Creates a surface for a window. The result code is the raw value
    /// from the Vulkan side.
    fn create_window_surface(
        &mut self,
        instance: VkInstance,
        window: WindowId,
    ) -> (VkResult, VkSurfaceKhr);
}
