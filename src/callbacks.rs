//! Event callback registration.
//!
//! Callbacks are plain function pointers that receive backend ids rather
//! than borrowed handles. Events are only ever delivered from inside
//! [`Instance::process_events`](crate::instance::Instance::process_events),
//! on the thread that called it; handing out ids instead of handles keeps
//! callbacks from re-entering the layer's interior state mid-delivery.

use crate::input::{Action, HatState, Key, KeyAction, Modifiers, MouseButton};
use crate::system::{MonitorId, WindowId};
use crate::types::{ContentScale, Extent2D, Offset2D, Position};

/// Whether a device arrived or departed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionEvent {
    /// The device was connected.
    Connected,
    /// The device was disconnected.
    Disconnected,
}

/// Instance-scoped event callbacks.
///
/// Registered as a whole set; a later registration replaces the previous
/// one. Unset fields simply drop the corresponding events.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceCallbacks {
    /// A monitor was connected or disconnected.
    pub monitor_connection: Option<fn(MonitorId, ConnectionEvent)>,
    /// A joystick was connected or disconnected.
    pub joystick_connection: Option<fn(i32, ConnectionEvent)>,
}

/// Per-window event callbacks.
///
/// Registered as a whole set on one window; a later registration replaces
/// the previous one.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowCallbacks {
    /// The window moved.
    pub position_change: Option<fn(WindowId, Offset2D)>,
    /// The window's content area was resized.
    pub size_change: Option<fn(WindowId, Extent2D)>,
    /// The framebuffer was resized.
    pub framebuffer_size_change: Option<fn(WindowId, Extent2D)>,
    /// The window's content scale changed.
    pub content_scale_change: Option<fn(WindowId, ContentScale)>,
    /// The cursor moved over the content area.
    pub cursor_position_change: Option<fn(WindowId, Position)>,
    /// The window gained or lost input focus.
    pub focus_change: Option<fn(WindowId, bool)>,
    /// The window was iconified or restored.
    pub iconify_change: Option<fn(WindowId, bool)>,
    /// The window was maximized or restored.
    pub maximize_change: Option<fn(WindowId, bool)>,
    /// The user requested the window be closed.
    pub close_requested: Option<fn(WindowId)>,
    /// The window contents need to be redrawn.
    pub redraw_needed: Option<fn(WindowId)>,
    /// Files or directories were dropped onto the window.
    pub path_drop: Option<fn(WindowId, &[String])>,
    /// A mouse button was pressed or released.
    pub mouse_button: Option<fn(WindowId, MouseButton, Action, Modifiers)>,
    /// The scroll wheel or touchpad scrolled.
    pub scroll: Option<fn(WindowId, f64, f64)>,
    /// The cursor entered or left the content area.
    pub cursor_enter: Option<fn(WindowId, bool)>,
    /// A key was pressed, repeated or released.
    pub key: Option<fn(WindowId, Key, i32, KeyAction, Modifiers)>,
    /// A Unicode character was input.
    pub char_input: Option<fn(WindowId, char)>,
    /// A Unicode character was input, with modifiers.
    pub char_mods_input: Option<fn(WindowId, char, Modifiers)>,
}

/// A synthetic or delivered input event, as the backend queues them.
///
/// This is the currency of the event queue between the backend and the
/// callback sets above; it is public so test backends can inject events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The window moved.
    WindowPosition(WindowId, Offset2D),
    /// The window's content area was resized.
    WindowSize(WindowId, Extent2D),
    /// The framebuffer was resized.
    FramebufferSize(WindowId, Extent2D),
    /// The window's content scale changed.
    WindowContentScale(WindowId, ContentScale),
    /// The cursor moved.
    CursorPosition(WindowId, Position),
    /// Focus gained or lost.
    WindowFocus(WindowId, bool),
    /// Iconified or restored.
    WindowIconify(WindowId, bool),
    /// Maximized or restored.
    WindowMaximize(WindowId, bool),
    /// Close requested.
    WindowClose(WindowId),
    /// Redraw needed.
    WindowRefresh(WindowId),
    /// Paths dropped.
    PathDrop(WindowId, Vec<String>),
    /// Mouse button transition.
    MouseButton(WindowId, MouseButton, Action, Modifiers),
    /// Scroll offsets.
    Scroll(WindowId, f64, f64),
    /// Cursor entered or left.
    CursorEnter(WindowId, bool),
    /// Key transition.
    Key(WindowId, Key, i32, KeyAction, Modifiers),
    /// Character input.
    Char(WindowId, char),
    /// Character input with modifiers.
    CharMods(WindowId, char, Modifiers),
    /// Joystick hat moved. Delivered to no callback; recorded for input
    /// state queries only.
    JoystickHat(i32, usize, HatState),
    /// Monitor connected or disconnected.
    MonitorConnection(MonitorId, ConnectionEvent),
    /// Joystick connected or disconnected.
    JoystickConnection(i32, ConnectionEvent),
}

impl WindowCallbacks {
    /// Routes one queued event to the matching callback, if set.
    pub(crate) fn dispatch(&self, event: &Event) {
        match *event {
            Event::WindowPosition(id, offset) => {
                if let Some(cb) = self.position_change {
                    cb(id, offset);
                }
            }
            Event::WindowSize(id, extent) => {
                if let Some(cb) = self.size_change {
                    cb(id, extent);
                }
            }
            Event::FramebufferSize(id, extent) => {
                if let Some(cb) = self.framebuffer_size_change {
                    cb(id, extent);
                }
            }
            Event::WindowContentScale(id, scale) => {
                if let Some(cb) = self.content_scale_change {
                    cb(id, scale);
                }
            }
            Event::CursorPosition(id, position) => {
                if let Some(cb) = self.cursor_position_change {
                    cb(id, position);
                }
            }
            Event::WindowFocus(id, focused) => {
                if let Some(cb) = self.focus_change {
                    cb(id, focused);
                }
            }
            Event::WindowIconify(id, iconified) => {
                if let Some(cb) = self.iconify_change {
                    cb(id, iconified);
                }
            }
            Event::WindowMaximize(id, maximized) => {
                if let Some(cb) = self.maximize_change {
                    cb(id, maximized);
                }
            }
            Event::WindowClose(id) => {
                if let Some(cb) = self.close_requested {
                    cb(id);
                }
            }
            Event::WindowRefresh(id) => {
                if let Some(cb) = self.redraw_needed {
                    cb(id);
                }
            }
            Event::PathDrop(id, ref paths) => {
                if let Some(cb) = self.path_drop {
                    cb(id, paths);
                }
            }
            Event::MouseButton(id, button, action, mods) => {
                if let Some(cb) = self.mouse_button {
                    cb(id, button, action, mods);
                }
            }
            Event::Scroll(id, x, y) => {
                if let Some(cb) = self.scroll {
                    cb(id, x, y);
                }
            }
            Event::CursorEnter(id, entered) => {
                if let Some(cb) = self.cursor_enter {
                    cb(id, entered);
                }
            }
            Event::Key(id, key, scancode, action, mods) => {
                if let Some(cb) = self.key {
                    cb(id, key, scancode, action, mods);
                }
            }
            Event::Char(id, ch) => {
                if let Some(cb) = self.char_input {
                    cb(id, ch);
                }
            }
            Event::CharMods(id, ch, mods) => {
                if let Some(cb) = self.char_mods_input {
                    cb(id, ch, mods);
                }
            }
            Event::JoystickHat(..)
            | Event::MonitorConnection(..)
            | Event::JoystickConnection(..) => {}
        }
    }
}

impl InstanceCallbacks {
    /// Routes one queued connection event to the matching callback, if set.
    pub(crate) fn dispatch(&self, event: &Event) {
        match *event {
            Event::MonitorConnection(id, change) => {
                if let Some(cb) = self.monitor_connection {
                    cb(id, change);
                }
            }
            Event::JoystickConnection(id, change) => {
                if let Some(cb) = self.joystick_connection {
                    cb(id, change);
                }
            }
            _ => {}
        }
    }
}
