//! Headless backend.
//!
//! The analog of the wrapped library's null platform: every object is
//! plain in-process state, no display server is touched, and the event
//! pump never blocks. Capability toggles let tests stand in for platforms
//! that cannot report window positions, gamma ramps and the like, and a
//! mutation counter records every state-changing window call so tests can
//! assert that redundant reconciliation work is skipped.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use slotmap::SlotMap;

use crate::callbacks::Event;
use crate::cursor::CursorShape;
use crate::input::{Action, GamepadState, HatState, Key, GAMEPAD_AXIS_COUNT, GAMEPAD_BUTTON_COUNT};
use crate::types::{
    ContentScale, Extent2D, FrameExtents, GammaRamp, ImageData, Offset2D, Position, Rect2D,
    VideoMode, DONT_CARE,
};
use crate::vk::{ProcAddr, VkBool32, VkInstance, VkPhysicalDevice, VkResult, VkSurfaceKhr};
use crate::window::CursorMode;

use super::{
    CursorId, InitHint, InputModeFlag, MonitorId, PlatformId, SystemError, WindowAttrib,
    WindowHintBool, WindowHintI32, WindowHintString, WindowId, WindowSystem,
};

/// Number of joystick slots.
pub const JOYSTICK_SLOTS: usize = 16;

const GAMMA_RAMP_SIZE: usize = 256;

/// Per-feature availability toggles, modelling platforms that cannot
/// provide everything.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Window positions can be read and written.
    pub window_position: bool,
    /// The cursor can be warped programmatically.
    pub cursor_position: bool,
    /// Gamma ramps can be read and written.
    pub gamma: bool,
    /// Windows can be made floating.
    pub floating: bool,
    /// Raw mouse motion is available.
    pub raw_mouse_motion: bool,
    /// Window opacity can be read and written.
    pub opacity: bool,
    /// Frame extents can be reported.
    pub frame_extents: bool,
    /// Standard cursor shapes the platform lacks.
    pub missing_cursor_shapes: Vec<CursorShape>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            window_position: true,
            cursor_position: true,
            gamma: true,
            floating: true,
            raw_mouse_motion: true,
            opacity: true,
            frame_extents: true,
            missing_cursor_shapes: Vec::new(),
        }
    }
}

impl Capabilities {
    /// A profile resembling a Wayland session: no window positioning, no
    /// cursor warping, no gamma access, no floating windows.
    pub fn wayland_like() -> Self {
        Self {
            window_position: false,
            cursor_position: false,
            gamma: false,
            floating: false,
            ..Self::default()
        }
    }
}

/// Description of a joystick to attach to a slot.
#[derive(Debug, Clone)]
pub struct JoystickConfig {
    /// Device name.
    pub name: String,
    /// Device GUID.
    pub guid: String,
    /// Axis values.
    pub axes: Vec<f32>,
    /// Button states.
    pub buttons: Vec<Action>,
    /// Hat states.
    pub hats: Vec<HatState>,
    /// Whether a gamepad mapping exists for the GUID.
    pub gamepad: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            name: String::from("Null Gamepad"),
            guid: String::from("00000000000000000000000000000000"),
            axes: vec![0.0; GAMEPAD_AXIS_COUNT],
            buttons: vec![Action::Release; GAMEPAD_BUTTON_COUNT],
            hats: vec![HatState::CENTERED],
            gamepad: true,
        }
    }
}

#[derive(Debug, Clone)]
struct NullJoystick {
    config: JoystickConfig,
    user_pointer: usize,
}

#[derive(Debug, Clone)]
struct NullMonitor {
    name: String,
    position: Offset2D,
    physical_size: Extent2D,
    content_scale: ContentScale,
    modes: Vec<VideoMode>,
    current_mode: VideoMode,
    gamma: GammaRamp,
    user_pointer: usize,
}

impl NullMonitor {
    fn new(name: &str, modes: Vec<VideoMode>) -> Self {
        let current_mode = modes.last().copied().unwrap_or(VideoMode {
            width: 1920,
            height: 1080,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            refresh_rate: 60,
        });
        Self {
            name: String::from(name),
            position: Offset2D::default(),
            physical_size: Extent2D {
                width: 520,
                height: 290,
            },
            content_scale: ContentScale {
                x_scale: 1.0,
                y_scale: 1.0,
            },
            modes,
            current_mode,
            gamma: GammaRamp::linear(GAMMA_RAMP_SIZE),
            user_pointer: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct NullWindow {
    title: String,
    position: Offset2D,
    size: Extent2D,
    monitor: Option<MonitorId>,
    refresh_rate: i32,
    visible: bool,
    decorated: bool,
    resizable: bool,
    auto_iconify: bool,
    floating: bool,
    maximized: bool,
    iconified: bool,
    focused: bool,
    hovered: bool,
    focus_on_show: bool,
    mouse_passthrough: bool,
    transparent: bool,
    should_close: bool,
    sticky_keys: bool,
    sticky_mouse_buttons: bool,
    lock_key_mods: bool,
    raw_mouse_motion: bool,
    cursor_mode: CursorMode,
    cursor_position: Position,
    opacity: f32,
    user_pointer: usize,
    cursor: Option<CursorId>,
}

#[derive(Debug, Clone)]
struct NullCursor {
    #[allow(dead_code)]
    shape: Option<CursorShape>,
}

#[derive(Debug, Clone)]
struct HintSet {
    focused: bool,
    center_cursor: bool,
    transparent: bool,
    scale_to_monitor: bool,
    scale_framebuffer: bool,
    resizable: bool,
    visible: bool,
    decorated: bool,
    auto_iconify: bool,
    floating: bool,
    maximized: bool,
    focus_on_show: bool,
    mouse_passthrough: bool,
    position: Offset2D,
    red_bits: i32,
    green_bits: i32,
    blue_bits: i32,
    refresh_rate: i32,
    cocoa_frame_name: String,
    x11_class_name: String,
    x11_instance_name: String,
    wayland_app_id: String,
}

impl Default for HintSet {
    fn default() -> Self {
        Self {
            focused: true,
            center_cursor: true,
            transparent: false,
            scale_to_monitor: false,
            scale_framebuffer: true,
            resizable: true,
            visible: true,
            decorated: true,
            auto_iconify: true,
            floating: false,
            maximized: false,
            focus_on_show: true,
            mouse_passthrough: false,
            position: Offset2D {
                x: DONT_CARE,
                y: DONT_CARE,
            },
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            refresh_rate: DONT_CARE,
            cocoa_frame_name: String::new(),
            x11_class_name: String::new(),
            x11_instance_name: String::new(),
            wayland_app_id: String::new(),
        }
    }
}

struct NullState {
    error: Option<SystemError>,
    initialized: bool,
    platform_hint: Option<PlatformId>,
    hat_buttons: bool,
    caps: Capabilities,
    hints: HintSet,
    monitors: SlotMap<MonitorId, NullMonitor>,
    monitor_order: Vec<MonitorId>,
    windows: SlotMap<WindowId, NullWindow>,
    cursors: SlotMap<CursorId, NullCursor>,
    joysticks: [Option<NullJoystick>; JOYSTICK_SLOTS],
    events: VecDeque<Event>,
    clipboard: Option<String>,
    epoch: Instant,
    mutations: u64,
    next_surface: u64,
    timed_waits: u64,
    forced_create_error: Option<SystemError>,
    fail_init: bool,
}

impl NullState {
    fn new() -> Self {
        Self {
            error: None,
            initialized: false,
            platform_hint: None,
            hat_buttons: true,
            caps: Capabilities::default(),
            hints: HintSet::default(),
            monitors: SlotMap::with_key(),
            monitor_order: Vec::new(),
            windows: SlotMap::with_key(),
            cursors: SlotMap::with_key(),
            joysticks: Default::default(),
            events: VecDeque::new(),
            clipboard: None,
            epoch: Instant::now(),
            mutations: 0,
            next_surface: 1,
            timed_waits: 0,
            forced_create_error: None,
            fail_init: false,
        }
    }

    fn set_error(&mut self, error: SystemError) {
        self.error = Some(error);
    }

    /// Pre-call guard shared by everything that requires initialization.
    fn live(&mut self) -> bool {
        if self.initialized {
            true
        } else {
            self.set_error(SystemError::NotInitialized);
            false
        }
    }

    fn mutate(&mut self) {
        self.mutations += 1;
    }

    /// Validates a joystick slot number, recording `InvalidEnum` for ids
    /// outside the slot range.
    fn joystick_slot(&mut self, joystick: i32) -> Option<usize> {
        match usize::try_from(joystick) {
            Ok(slot) if slot < JOYSTICK_SLOTS => Some(slot),
            _ => {
                self.set_error(SystemError::InvalidEnum);
                None
            }
        }
    }

    fn default_modes() -> Vec<VideoMode> {
        [
            (640, 480, 60),
            (800, 600, 60),
            (1280, 720, 60),
            (1920, 1080, 60),
        ]
        .iter()
        .map(|&(width, height, refresh_rate)| VideoMode {
            width,
            height,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            refresh_rate,
        })
        .collect()
    }
}

/// The headless window system.
///
/// Clones share state, so a test can keep one handle for inspection while
/// boxing another into an instance.
#[derive(Clone)]
pub struct NullSystem {
    state: Rc<RefCell<NullState>>,
}

impl Default for NullSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl NullSystem {
    /// A fresh, uninitialized backend with full capabilities.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(NullState::new())),
        }
    }

    /// A fresh backend with the given capability profile.
    pub fn with_capabilities(caps: Capabilities) -> Self {
        let system = Self::new();
        system.state.borrow_mut().caps = caps;
        system
    }

    /// Number of state-changing window calls made so far.
    pub fn mutation_count(&self) -> u64 {
        self.state.borrow().mutations
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// Refresh rate last applied to a window. Test inspection only.
    pub fn window_refresh_rate(&self, window: WindowId) -> Option<i32> {
        self.state.borrow().windows.get(window).map(|w| w.refresh_rate)
    }

    /// Adds a monitor. Usable before or after init.
    pub fn add_monitor(&self, name: &str) -> MonitorId {
        let mut state = self.state.borrow_mut();
        let id = state
            .monitors
            .insert(NullMonitor::new(name, NullState::default_modes()));
        state.monitor_order.push(id);
        id
    }

    /// Removes a monitor and queues a disconnection event.
    pub fn disconnect_monitor(&self, monitor: MonitorId) {
        let mut state = self.state.borrow_mut();
        if state.monitors.remove(monitor).is_some() {
            state.monitor_order.retain(|&id| id != monitor);
            state.events.push_back(Event::MonitorConnection(
                monitor,
                crate::callbacks::ConnectionEvent::Disconnected,
            ));
        }
    }

    /// Attaches a joystick to a slot and queues a connection event.
    pub fn attach_joystick(&self, slot: usize, config: JoystickConfig) {
        let mut state = self.state.borrow_mut();
        state.joysticks[slot] = Some(NullJoystick {
            config,
            user_pointer: 0,
        });
        state.events.push_back(Event::JoystickConnection(
            slot as i32,
            crate::callbacks::ConnectionEvent::Connected,
        ));
    }

    /// Queues an arbitrary event for the next pump.
    pub fn push_event(&self, event: Event) {
        self.state.borrow_mut().events.push_back(event);
    }

    /// Forces the next window creation to fail with the given code.
    pub fn force_window_create_error(&self, error: Option<SystemError>) {
        self.state.borrow_mut().forced_create_error = error;
    }

    /// Forces initialization to fail.
    pub fn fail_init(&self) {
        self.state.borrow_mut().fail_init = true;
    }

    /// Number of timed waits the pump has performed. Test inspection
    /// only.
    pub fn timed_wait_count(&self) -> u64 {
        self.state.borrow().timed_waits
    }

    /// Last value pushed for a string creation hint. Test inspection
    /// only.
    pub fn hinted_string(&self, hint: WindowHintString) -> String {
        let state = self.state.borrow();
        match hint {
            WindowHintString::CocoaFrameName => state.hints.cocoa_frame_name.clone(),
            WindowHintString::X11ClassName => state.hints.x11_class_name.clone(),
            WindowHintString::X11InstanceName => state.hints.x11_instance_name.clone(),
            WindowHintString::WaylandAppId => state.hints.wayland_app_id.clone(),
        }
    }

    /// Current gamma ramp of a monitor, bypassing the capability gate.
    /// Test inspection only.
    pub fn raw_gamma_ramp(&self, monitor: MonitorId) -> Option<GammaRamp> {
        self.state
            .borrow()
            .monitors
            .get(monitor)
            .map(|m| m.gamma.clone())
    }
}

macro_rules! with_window {
    ($state:expr, $id:expr, $window:ident => $body:expr, $fallback:expr) => {{
        if !$state.live() {
            return $fallback;
        }
        match $state.windows.get_mut($id) {
            Some($window) => $body,
            None => {
                $state.set_error(SystemError::PlatformError);
                $fallback
            }
        }
    }};
}

macro_rules! with_monitor {
    ($state:expr, $id:expr, $monitor:ident => $body:expr, $fallback:expr) => {{
        if !$state.live() {
            return $fallback;
        }
        match $state.monitors.get_mut($id) {
            Some($monitor) => $body,
            None => {
                $state.set_error(SystemError::PlatformError);
                $fallback
            }
        }
    }};
}

impl WindowSystem for NullSystem {
    fn take_error(&mut self) -> Option<SystemError> {
        self.state.borrow_mut().error.take()
    }

    fn version_string(&self) -> String {
        String::from("null backend 3.4.0")
    }

    fn platform_supported(&self, platform: PlatformId) -> bool {
        platform == PlatformId::Null
    }

    fn init_hint(&mut self, hint: InitHint, value: bool) {
        let mut state = self.state.borrow_mut();
        if let InitHint::JoystickHatButtons = hint {
            state.hat_buttons = value;
        }
        // The remaining hints configure platforms this backend never runs
        // on; accepted and ignored, as the wrapped library does.
    }

    fn init_platform_hint(&mut self, platform: Option<PlatformId>) {
        self.state.borrow_mut().platform_hint = platform;
    }

    fn init(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.initialized {
            return true;
        }
        if state.fail_init {
            state.set_error(SystemError::PlatformError);
            return false;
        }
        if let Some(platform) = state.platform_hint {
            if platform != PlatformId::Null {
                state.set_error(SystemError::PlatformUnavailable);
                return false;
            }
        }
        if state.monitor_order.is_empty() {
            let id = state
                .monitors
                .insert(NullMonitor::new("Null Display", NullState::default_modes()));
            state.monitor_order.push(id);
        }
        state.epoch = Instant::now();
        state.initialized = true;
        true
    }

    fn terminate(&mut self) {
        let mut state = self.state.borrow_mut();
        state.windows.clear();
        state.cursors.clear();
        state.events.clear();
        state.hints = HintSet::default();
        state.initialized = false;
    }

    fn platform(&self) -> Option<PlatformId> {
        if self.state.borrow().initialized {
            Some(PlatformId::Null)
        } else {
            None
        }
    }

    fn raw_mouse_motion_supported(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        state.live() && state.caps.raw_mouse_motion
    }

    fn timer_value(&mut self) -> u64 {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return 0;
        }
        state.epoch.elapsed().as_nanos() as u64
    }

    fn timer_frequency(&mut self) -> u64 {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return 0;
        }
        1_000_000_000
    }

    fn key_scancode(&mut self, key: Key) -> i32 {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return -1;
        }
        if key == Key::Unknown {
            state.set_error(SystemError::InvalidEnum);
            return -1;
        }
        key as i32
    }

    fn key_name(&mut self, key: Key, _scancode: i32) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        key.printable()
            .map(|c| c.to_lowercase().collect::<String>())
    }

    fn clipboard(&mut self) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let text = state.clipboard.clone();
        if text.is_none() {
            state.set_error(SystemError::FormatUnavailable);
        }
        text
    }

    fn set_clipboard(&mut self, text: &str) {
        let mut state = self.state.borrow_mut();
        if state.live() {
            state.clipboard = Some(String::from(text));
        }
    }

    fn poll_events(&mut self) -> Vec<Event> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return Vec::new();
        }
        state.events.drain(..).collect()
    }

    fn wait_events(&mut self) -> Vec<Event> {
        // Headless: nothing ever arrives asynchronously, so waiting would
        // deadlock. Drain whatever is queued instead.
        self.poll_events()
    }

    fn wait_events_timeout(&mut self, _timeout: f64) -> Vec<Event> {
        self.state.borrow_mut().timed_waits += 1;
        self.poll_events()
    }

    fn post_empty_event(&mut self) {
        let mut state = self.state.borrow_mut();
        state.live();
    }

    fn monitors(&mut self) -> Vec<MonitorId> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return Vec::new();
        }
        state.monitor_order.clone()
    }

    fn monitor_position(&mut self, monitor: MonitorId) -> Offset2D {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => m.position, Offset2D::default())
    }

    fn monitor_workarea(&mut self, monitor: MonitorId) -> Rect2D {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => Rect2D {
            offset: m.position,
            extent: Extent2D {
                width: m.current_mode.width,
                height: m.current_mode.height,
            },
        }, Rect2D::default())
    }

    fn monitor_physical_size(&mut self, monitor: MonitorId) -> Extent2D {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => m.physical_size, Extent2D::default())
    }

    fn monitor_content_scale(&mut self, monitor: MonitorId) -> ContentScale {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => m.content_scale, ContentScale::default())
    }

    fn monitor_name(&mut self, monitor: MonitorId) -> Option<String> {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => Some(m.name.clone()), None)
    }

    fn monitor_user_pointer(&mut self, monitor: MonitorId) -> usize {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => m.user_pointer, 0)
    }

    fn set_monitor_user_pointer(&mut self, monitor: MonitorId, value: usize) {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => m.user_pointer = value, ())
    }

    fn video_modes(&mut self, monitor: MonitorId) -> Option<Vec<VideoMode>> {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => Some(m.modes.clone()), None)
    }

    fn video_mode(&mut self, monitor: MonitorId) -> Option<VideoMode> {
        let mut state = self.state.borrow_mut();
        with_monitor!(state, monitor, m => Some(m.current_mode), None)
    }

    fn gamma_ramp(&mut self, monitor: MonitorId) -> Option<GammaRamp> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        if !state.caps.gamma {
            state.set_error(SystemError::FeatureUnavailable);
            return None;
        }
        match state.monitors.get(monitor) {
            Some(m) => Some(m.gamma.clone()),
            None => {
                state.set_error(SystemError::PlatformError);
                None
            }
        }
    }

    fn set_gamma_ramp(&mut self, monitor: MonitorId, ramp: &GammaRamp) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if ramp.size() == 0
            || ramp.green.len() != ramp.size()
            || ramp.blue.len() != ramp.size()
        {
            state.set_error(SystemError::InvalidValue);
            return;
        }
        if !state.caps.gamma {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        match state.monitors.get_mut(monitor) {
            Some(m) => m.gamma = ramp.clone(),
            None => state.set_error(SystemError::PlatformError),
        }
    }

    fn set_gamma(&mut self, monitor: MonitorId, gamma: f32) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if !(gamma.is_finite() && gamma > 0.0) {
            state.set_error(SystemError::InvalidValue);
            return;
        }
        if !state.caps.gamma {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        let mut ramp = GammaRamp::linear(GAMMA_RAMP_SIZE);
        for i in 0..GAMMA_RAMP_SIZE {
            let input = i as f32 / (GAMMA_RAMP_SIZE - 1) as f32;
            let output = input.powf(1.0 / gamma).clamp(0.0, 1.0);
            let value = (output * f32::from(u16::MAX)).round() as u16;
            ramp.red[i] = value;
            ramp.green[i] = value;
            ramp.blue[i] = value;
        }
        match state.monitors.get_mut(monitor) {
            Some(m) => m.gamma = ramp,
            None => state.set_error(SystemError::PlatformError),
        }
    }

    fn window_hint_bool(&mut self, hint: WindowHintBool, value: bool) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        let hints = &mut state.hints;
        match hint {
            WindowHintBool::Focused => hints.focused = value,
            WindowHintBool::CenterCursor => hints.center_cursor = value,
            WindowHintBool::TransparentFramebuffer => hints.transparent = value,
            WindowHintBool::ScaleToMonitor => hints.scale_to_monitor = value,
            WindowHintBool::ScaleFramebuffer => hints.scale_framebuffer = value,
            WindowHintBool::Resizable => hints.resizable = value,
            WindowHintBool::Visible => hints.visible = value,
            WindowHintBool::Decorated => hints.decorated = value,
            WindowHintBool::AutoIconify => hints.auto_iconify = value,
            WindowHintBool::Floating => hints.floating = value,
            WindowHintBool::Maximized => hints.maximized = value,
            WindowHintBool::FocusOnShow => hints.focus_on_show = value,
            WindowHintBool::MousePassthrough => hints.mouse_passthrough = value,
            WindowHintBool::CocoaGraphicsSwitching
            | WindowHintBool::Win32KeyboardMenu
            | WindowHintBool::Win32Showdefault => {}
        }
    }

    fn window_hint_i32(&mut self, hint: WindowHintI32, value: i32) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        let hints = &mut state.hints;
        match hint {
            WindowHintI32::PositionX => hints.position.x = value,
            WindowHintI32::PositionY => hints.position.y = value,
            WindowHintI32::RedBits => hints.red_bits = value,
            WindowHintI32::GreenBits => hints.green_bits = value,
            WindowHintI32::BlueBits => hints.blue_bits = value,
            WindowHintI32::RefreshRate => hints.refresh_rate = value,
        }
    }

    fn window_hint_string(&mut self, hint: WindowHintString, value: &str) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        let hints = &mut state.hints;
        match hint {
            WindowHintString::CocoaFrameName => hints.cocoa_frame_name = String::from(value),
            WindowHintString::X11ClassName => hints.x11_class_name = String::from(value),
            WindowHintString::X11InstanceName => hints.x11_instance_name = String::from(value),
            WindowHintString::WaylandAppId => hints.wayland_app_id = String::from(value),
        }
    }

    fn create_window(
        &mut self,
        size: Extent2D,
        title: &str,
        monitor: Option<MonitorId>,
    ) -> Option<WindowId> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        if let Some(error) = state.forced_create_error.take() {
            state.set_error(error);
            return None;
        }
        if size.width <= 0 || size.height <= 0 {
            state.set_error(SystemError::InvalidValue);
            return None;
        }
        if let Some(monitor) = monitor {
            if !state.monitors.contains_key(monitor) {
                state.set_error(SystemError::PlatformError);
                return None;
            }
        }
        let hints = state.hints.clone();
        let position = if hints.position.x == DONT_CARE || hints.position.y == DONT_CARE {
            Offset2D { x: 0, y: 0 }
        } else {
            hints.position
        };
        let fullscreen = monitor.is_some();
        let window = NullWindow {
            title: String::from(title),
            position,
            size,
            monitor,
            refresh_rate: hints.refresh_rate,
            visible: fullscreen || hints.visible,
            decorated: hints.decorated,
            resizable: hints.resizable,
            auto_iconify: hints.auto_iconify,
            floating: hints.floating && state.caps.floating,
            maximized: hints.maximized && !fullscreen,
            iconified: false,
            focused: fullscreen || (hints.focused && hints.visible),
            hovered: false,
            focus_on_show: hints.focus_on_show,
            mouse_passthrough: hints.mouse_passthrough,
            transparent: hints.transparent,
            should_close: false,
            sticky_keys: false,
            sticky_mouse_buttons: false,
            lock_key_mods: false,
            raw_mouse_motion: false,
            cursor_mode: CursorMode::Normal,
            cursor_position: Position::default(),
            opacity: 1.0,
            user_pointer: 0,
            cursor: None,
        };
        Some(state.windows.insert(window))
    }

    fn destroy_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if state.live() {
            state.windows.remove(window);
        }
    }

    fn window_monitor(&mut self, window: WindowId) -> Option<MonitorId> {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.monitor, None)
    }

    fn set_window_monitor(
        &mut self,
        window: WindowId,
        monitor: Option<MonitorId>,
        position: Offset2D,
        size: Extent2D,
        refresh_rate: i32,
    ) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if let Some(monitor) = monitor {
            if !state.monitors.contains_key(monitor) {
                state.set_error(SystemError::PlatformError);
                return;
            }
        }
        state.mutate();
        if let Some(w) = state.windows.get_mut(window) {
            w.monitor = monitor;
            w.size = size;
            w.refresh_rate = refresh_rate;
            if monitor.is_none() {
                w.position = position;
            } else {
                w.maximized = false;
            }
        } else {
            state.set_error(SystemError::PlatformError);
        }
    }

    fn window_attrib(&mut self, window: WindowId, attrib: WindowAttrib) -> bool {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => match attrib {
            WindowAttrib::Focused => w.focused,
            WindowAttrib::Iconified => w.iconified,
            WindowAttrib::Maximized => w.maximized,
            WindowAttrib::Hovered => w.hovered,
            WindowAttrib::Visible => w.visible,
            WindowAttrib::Resizable => w.resizable,
            WindowAttrib::Decorated => w.decorated,
            WindowAttrib::AutoIconify => w.auto_iconify,
            WindowAttrib::Floating => w.floating,
            WindowAttrib::TransparentFramebuffer => w.transparent,
            WindowAttrib::FocusOnShow => w.focus_on_show,
            WindowAttrib::MousePassthrough => w.mouse_passthrough,
        }, false)
    }

    fn set_window_attrib(&mut self, window: WindowId, attrib: WindowAttrib, value: bool) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if attrib == WindowAttrib::Floating && !state.caps.floating {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        state.mutate();
        match state.windows.get_mut(window) {
            Some(w) => match attrib {
                WindowAttrib::Resizable => w.resizable = value,
                WindowAttrib::Decorated => w.decorated = value,
                WindowAttrib::AutoIconify => w.auto_iconify = value,
                WindowAttrib::Floating => w.floating = value,
                WindowAttrib::FocusOnShow => w.focus_on_show = value,
                WindowAttrib::MousePassthrough => w.mouse_passthrough = value,
                _ => state.set_error(SystemError::InvalidEnum),
            },
            None => state.set_error(SystemError::PlatformError),
        }
    }

    fn window_should_close(&mut self, window: WindowId) -> bool {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.should_close, false)
    }

    fn set_window_should_close(&mut self, window: WindowId, value: bool) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.should_close = value, ())
    }

    fn input_mode(&mut self, window: WindowId, mode: InputModeFlag) -> bool {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => match mode {
            InputModeFlag::StickyKeys => w.sticky_keys,
            InputModeFlag::StickyMouseButtons => w.sticky_mouse_buttons,
            InputModeFlag::LockKeyMods => w.lock_key_mods,
            InputModeFlag::RawMouseMotion => w.raw_mouse_motion,
        }, false)
    }

    fn set_input_mode(&mut self, window: WindowId, mode: InputModeFlag, value: bool) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if mode == InputModeFlag::RawMouseMotion && !state.caps.raw_mouse_motion {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        state.mutate();
        match state.windows.get_mut(window) {
            Some(w) => match mode {
                InputModeFlag::StickyKeys => w.sticky_keys = value,
                InputModeFlag::StickyMouseButtons => w.sticky_mouse_buttons = value,
                InputModeFlag::LockKeyMods => w.lock_key_mods = value,
                InputModeFlag::RawMouseMotion => w.raw_mouse_motion = value,
            },
            None => state.set_error(SystemError::PlatformError),
        }
    }

    fn cursor_mode(&mut self, window: WindowId) -> CursorMode {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.cursor_mode, CursorMode::Normal)
    }

    fn set_cursor_mode(&mut self, window: WindowId, mode: CursorMode) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.cursor_mode = mode, ())
    }

    fn window_title(&mut self, window: WindowId) -> Option<String> {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => Some(w.title.clone()), None)
    }

    fn set_window_title(&mut self, window: WindowId, title: &str) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.title = String::from(title), ())
    }

    fn window_position(&mut self, window: WindowId) -> Offset2D {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return Offset2D::default();
        }
        if !state.caps.window_position {
            state.set_error(SystemError::FeatureUnavailable);
            return Offset2D::default();
        }
        with_window!(state, window, w => w.position, Offset2D::default())
    }

    fn set_window_position(&mut self, window: WindowId, position: Offset2D) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if !state.caps.window_position {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.position = position, ())
    }

    fn window_size(&mut self, window: WindowId) -> Extent2D {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.size, Extent2D::default())
    }

    fn set_window_size(&mut self, window: WindowId, size: Extent2D) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.size = size, ())
    }

    fn cursor_position(&mut self, window: WindowId) -> Position {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.cursor_position, Position::default())
    }

    fn set_cursor_position(&mut self, window: WindowId, position: Position) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if !state.caps.cursor_position {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.cursor_position = position, ())
    }

    fn window_opacity(&mut self, window: WindowId) -> f32 {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return 1.0;
        }
        if !state.caps.opacity {
            state.set_error(SystemError::FeatureUnavailable);
            return 1.0;
        }
        with_window!(state, window, w => w.opacity, 1.0)
    }

    fn set_window_opacity(&mut self, window: WindowId, opacity: f32) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if !(0.0..=1.0).contains(&opacity) || !opacity.is_finite() {
            state.set_error(SystemError::InvalidValue);
            return;
        }
        if !state.caps.opacity {
            state.set_error(SystemError::FeatureUnavailable);
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.opacity = opacity, ())
    }

    fn window_user_pointer(&mut self, window: WindowId) -> usize {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.user_pointer, 0)
    }

    fn set_window_user_pointer(&mut self, window: WindowId, value: usize) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => w.user_pointer = value, ())
    }

    fn framebuffer_size(&mut self, window: WindowId) -> Extent2D {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, w => w.size, Extent2D::default())
    }

    fn frame_extents(&mut self, window: WindowId) -> Option<FrameExtents> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        if !state.caps.frame_extents {
            state.set_error(SystemError::FeatureUnavailable);
            return None;
        }
        with_window!(state, window, w => {
            if w.decorated && w.monitor.is_none() {
                Some(FrameExtents {
                    left: 1,
                    top: 24,
                    right: 1,
                    bottom: 1,
                })
            } else {
                Some(FrameExtents::default())
            }
        }, None)
    }

    fn window_content_scale(&mut self, window: WindowId) -> ContentScale {
        let mut state = self.state.borrow_mut();
        with_window!(state, window, _w => ContentScale {
            x_scale: 1.0,
            y_scale: 1.0,
        }, ContentScale::default())
    }

    fn iconify_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => {
            w.iconified = true;
            w.focused = false;
        }, ())
    }

    fn restore_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => {
            w.iconified = false;
            w.maximized = false;
        }, ())
    }

    fn maximize_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => {
            w.maximized = true;
            w.iconified = false;
        }, ())
    }

    fn show_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => {
            w.visible = true;
            if w.focus_on_show {
                w.focused = true;
            }
        }, ())
    }

    fn hide_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        with_window!(state, window, w => {
            w.visible = false;
            w.focused = false;
        }, ())
    }

    fn focus_window(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        state.mutate();
        if !state.windows.contains_key(window) {
            state.set_error(SystemError::PlatformError);
            return;
        }
        let ids: Vec<WindowId> = state.windows.keys().collect();
        for id in ids {
            if let Some(w) = state.windows.get_mut(id) {
                w.focused = id == window;
            }
        }
    }

    fn request_window_attention(&mut self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        with_window!(state, window, _w => (), ())
    }

    fn set_window_icon(&mut self, window: WindowId, images: &[ImageData]) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        for image in images {
            let expected = image.width as usize * image.height as usize * 4;
            if image.width <= 0 || image.height <= 0 || image.pixels.len() != expected {
                state.set_error(SystemError::InvalidValue);
                return;
            }
        }
        state.mutate();
        with_window!(state, window, _w => (), ())
    }

    fn set_window_aspect_ratio(&mut self, window: WindowId, numer: i32, denom: i32) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        let unconstrained = numer == DONT_CARE && denom == DONT_CARE;
        if !unconstrained && (numer <= 0 || denom <= 0) {
            state.set_error(SystemError::InvalidValue);
            return;
        }
        state.mutate();
        with_window!(state, window, _w => (), ())
    }

    fn set_window_size_limits(
        &mut self,
        window: WindowId,
        min_width: i32,
        min_height: i32,
        max_width: i32,
        max_height: i32,
    ) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        for value in [min_width, min_height, max_width, max_height] {
            if value < 0 && value != DONT_CARE {
                state.set_error(SystemError::InvalidValue);
                return;
            }
        }
        state.mutate();
        with_window!(state, window, _w => (), ())
    }

    fn set_window_cursor(&mut self, window: WindowId, cursor: Option<CursorId>) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        if let Some(cursor) = cursor {
            if !state.cursors.contains_key(cursor) {
                state.set_error(SystemError::PlatformError);
                return;
            }
        }
        state.mutate();
        with_window!(state, window, w => w.cursor = cursor, ())
    }

    fn create_standard_cursor(&mut self, shape: CursorShape) -> Option<CursorId> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        if shape == CursorShape::Custom {
            state.set_error(SystemError::InvalidEnum);
            return None;
        }
        if state.caps.missing_cursor_shapes.contains(&shape) {
            state.set_error(SystemError::CursorUnavailable);
            return None;
        }
        Some(state.cursors.insert(NullCursor { shape: Some(shape) }))
    }

    fn create_custom_cursor(&mut self, image: &ImageData, hotspot: Offset2D) -> Option<CursorId> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let expected = image.width as usize * image.height as usize * 4;
        let hotspot_in_bounds = (0..image.width).contains(&hotspot.x)
            && (0..image.height).contains(&hotspot.y);
        if image.width <= 0
            || image.height <= 0
            || image.pixels.len() != expected
            || !hotspot_in_bounds
        {
            state.set_error(SystemError::InvalidValue);
            return None;
        }
        Some(state.cursors.insert(NullCursor { shape: None }))
    }

    fn destroy_cursor(&mut self, cursor: CursorId) {
        let mut state = self.state.borrow_mut();
        if state.live() {
            state.cursors.remove(cursor);
        }
    }

    fn joystick_present(&mut self, joystick: i32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return false;
        }
        let Some(slot) = state.joystick_slot(joystick) else {
            return false;
        };
        state.joysticks[slot].is_some()
    }

    fn joystick_axes(&mut self, joystick: i32) -> Option<Vec<f32>> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot].as_ref().map(|j| j.config.axes.clone())
    }

    fn joystick_buttons(&mut self, joystick: i32) -> Option<Vec<Action>> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot].as_ref().map(|j| {
            let mut buttons = j.config.buttons.clone();
            if state.hat_buttons {
                for hat in &j.config.hats {
                    for flag in [HatState::UP, HatState::RIGHT, HatState::DOWN, HatState::LEFT] {
                        buttons.push(if hat.contains(flag) {
                            Action::Press
                        } else {
                            Action::Release
                        });
                    }
                }
            }
            buttons
        })
    }

    fn joystick_hats(&mut self, joystick: i32) -> Option<Vec<HatState>> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot].as_ref().map(|j| j.config.hats.clone())
    }

    fn joystick_name(&mut self, joystick: i32) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot].as_ref().map(|j| j.config.name.clone())
    }

    fn joystick_guid(&mut self, joystick: i32) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot].as_ref().map(|j| j.config.guid.clone())
    }

    fn joystick_is_gamepad(&mut self, joystick: i32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return false;
        }
        let Some(slot) = state.joystick_slot(joystick) else {
            return false;
        };
        state.joysticks[slot].as_ref().is_some_and(|j| j.config.gamepad)
    }

    fn gamepad_name(&mut self, joystick: i32) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot]
            .as_ref()
            .filter(|j| j.config.gamepad)
            .map(|j| j.config.name.clone())
    }

    fn gamepad_state(&mut self, joystick: i32) -> Option<GamepadState> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        let slot = state.joystick_slot(joystick)?;
        state.joysticks[slot]
            .as_ref()
            .filter(|j| j.config.gamepad)
            .map(|j| {
                let mut mapped = GamepadState::default();
                for (slot, value) in mapped.buttons.iter_mut().zip(&j.config.buttons) {
                    *slot = *value;
                }
                for (slot, value) in mapped.axes.iter_mut().zip(&j.config.axes) {
                    *slot = *value;
                }
                mapped
            })
    }

    fn joystick_user_pointer(&mut self, joystick: i32) -> usize {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return 0;
        }
        let Some(slot) = state.joystick_slot(joystick) else {
            return 0;
        };
        state.joysticks[slot].as_ref().map_or(0, |j| j.user_pointer)
    }

    fn set_joystick_user_pointer(&mut self, joystick: i32, value: usize) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return;
        }
        let Some(slot) = state.joystick_slot(joystick) else {
            return;
        };
        if let Some(j) = state.joysticks[slot].as_mut() {
            j.user_pointer = value;
        }
    }

    fn update_gamepad_mappings(&mut self, mappings: &str) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return false;
        }
        // Mapping lines are `guid,name,element:target,...`; anything with
        // fewer than two fields cannot be a mapping.
        for line in mappings.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.split(',').count() < 2 {
                state.set_error(SystemError::InvalidValue);
                return false;
            }
        }
        true
    }

    fn vulkan_supported(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        state.live()
    }

    fn instance_proc_loader(&mut self, _instance: VkInstance, name: &str) -> ProcAddr {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return ProcAddr(0);
        }
        if name.starts_with("vk") {
            // Stable fake address per symbol; never dereferenced.
            let cookie = name
                .bytes()
                .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
                    (h ^ u64::from(b)).wrapping_mul(0x0000_0100_0000_01b3)
                });
            ProcAddr(cookie as usize | 1)
        } else {
            ProcAddr(0)
        }
    }

    fn required_instance_extensions(&mut self) -> Option<Vec<String>> {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return None;
        }
        Some(vec![
            String::from("VK_KHR_surface"),
            String::from("VK_EXT_headless_surface"),
        ])
    }

    fn physical_device_presentation_support(
        &mut self,
        _instance: VkInstance,
        _device: VkPhysicalDevice,
        _queue_family: u32,
    ) -> VkBool32 {
        let mut state = self.state.borrow_mut();
        state.live();
        // Headless surfaces are rendered off-screen; no queue family can
        // present to a display.
        VkBool32::FALSE
    }

    fn create_window_surface(
        &mut self,
        _instance: VkInstance,
        window: WindowId,
    ) -> (VkResult, VkSurfaceKhr) {
        let mut state = self.state.borrow_mut();
        if !state.live() {
            return (VkResult::ERROR_INITIALIZATION_FAILED, VkSurfaceKhr::NULL);
        }
        if !state.windows.contains_key(window) {
            state.set_error(SystemError::PlatformError);
            return (VkResult::ERROR_INITIALIZATION_FAILED, VkSurfaceKhr::NULL);
        }
        let cookie = state.next_surface;
        state.next_surface += 1;
        (VkResult::SUCCESS, VkSurfaceKhr(cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> NullSystem {
        let mut system = NullSystem::new();
        assert!(system.init());
        system
    }

    #[test]
    fn test_uninitialized_calls_leave_not_initialized() {
        let mut system = NullSystem::new();
        assert!(system.monitors().is_empty());
        assert_eq!(system.take_error(), Some(SystemError::NotInitialized));
    }

    #[test]
    fn test_init_seeds_primary_monitor() {
        let mut system = initialized();
        let monitors = system.monitors();
        assert_eq!(monitors.len(), 1);
        assert_eq!(system.take_error(), None);
        assert_eq!(system.monitor_name(monitors[0]).as_deref(), Some("Null Display"));
    }

    #[test]
    fn test_non_null_platform_hint_fails_init() {
        let mut system = NullSystem::new();
        system.init_platform_hint(Some(PlatformId::Wayland));
        assert!(!system.init());
        assert_eq!(system.take_error(), Some(SystemError::PlatformUnavailable));
    }

    #[test]
    fn test_set_gamma_rejects_non_positive_exponent() {
        let mut system = initialized();
        let monitor = system.monitors()[0];
        system.set_gamma(monitor, 0.0);
        assert_eq!(system.take_error(), Some(SystemError::InvalidValue));
        system.set_gamma(monitor, f32::NAN);
        assert_eq!(system.take_error(), Some(SystemError::InvalidValue));
    }

    #[test]
    fn test_set_gamma_writes_monotone_ramp() {
        let mut system = initialized();
        let monitor = system.monitors()[0];
        system.set_gamma(monitor, 2.2);
        assert_eq!(system.take_error(), None);
        let ramp = system.gamma_ramp(monitor).unwrap();
        assert_eq!(ramp.size(), GAMMA_RAMP_SIZE);
        assert_eq!(ramp.red[0], 0);
        assert_eq!(ramp.red[GAMMA_RAMP_SIZE - 1], u16::MAX);
        assert!(ramp.red.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_wayland_profile_gates_gamma_and_position() {
        let mut system = NullSystem::with_capabilities(Capabilities::wayland_like());
        assert!(system.init());
        let monitor = system.monitors()[0];
        assert!(system.gamma_ramp(monitor).is_none());
        assert_eq!(system.take_error(), Some(SystemError::FeatureUnavailable));

        let window = system
            .create_window(Extent2D { width: 640, height: 480 }, "w", None)
            .unwrap();
        system.window_position(window);
        assert_eq!(system.take_error(), Some(SystemError::FeatureUnavailable));
    }

    #[test]
    fn test_mutation_counter_tracks_window_writes() {
        let mut system = initialized();
        let window = system
            .create_window(Extent2D { width: 640, height: 480 }, "w", None)
            .unwrap();
        let before = system.mutation_count();
        system.set_window_title(window, "renamed");
        system.set_window_size(window, Extent2D { width: 800, height: 600 });
        assert_eq!(system.mutation_count(), before + 2);
    }

    #[test]
    fn test_hat_buttons_append_to_button_array() {
        let mut system = initialized();
        system.attach_joystick(
            0,
            JoystickConfig {
                hats: vec![HatState::RIGHT_UP],
                ..JoystickConfig::default()
            },
        );
        let buttons = system.joystick_buttons(0).unwrap();
        let hat_bits = &buttons[buttons.len() - 4..];
        assert_eq!(
            hat_bits,
            [Action::Press, Action::Press, Action::Release, Action::Release]
        );
    }

    #[test]
    fn test_custom_cursor_validates_hotspot() {
        let mut system = initialized();
        let image = ImageData {
            width: 4,
            height: 4,
            pixels: vec![0; 64],
        };
        assert!(system
            .create_custom_cursor(&image, Offset2D { x: 5, y: 0 })
            .is_none());
        assert_eq!(system.take_error(), Some(SystemError::InvalidValue));
        assert!(system
            .create_custom_cursor(&image, Offset2D { x: 1, y: 1 })
            .is_some());
        assert_eq!(system.take_error(), None);
    }
}
