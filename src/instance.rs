//! Instance lifecycle, allocator identity rules and instance-scoped
//! operations.
//!
//! At most one instance exists per process; creation and destruction
//! bracket the backend's global init and terminate. The allocator passed
//! at creation becomes part of the instance's identity: destruction and
//! window creation must present the same allocator (or the same absence
//! of one) or they are rejected without side effects.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use bitflags::bitflags;

use crate::callbacks::{Event, InstanceCallbacks, WindowCallbacks};
use crate::error::{checked, platform_or_unknown, strict, Error, Result};
use crate::input::Key;
use crate::joystick::{Joystick, JoystickId, JOYSTICK_COUNT};
use crate::monitor::Monitor;
use crate::system::null::NullSystem;
use crate::system::{InitHint, PlatformId, SystemError, WindowId, WindowSystem};
use crate::types::{Bool32, ExtensionChain, StructureType};
use crate::vk::{ProcAddr, VkBool32, VkInstance, VkPhysicalDevice};
use crate::window::{Window, WindowCreateInfo};

static INSTANCE_LIVE: AtomicBool = AtomicBool::new(false);

/// Signature of a user allocation function. Receives the requested size
/// and the user data slot; returns the block address, or zero on failure.
pub type AllocateFn = fn(size: usize, user_data: usize) -> usize;
/// Signature of a user reallocation function.
pub type ReallocateFn = fn(block: usize, size: usize, user_data: usize) -> usize;
/// Signature of a user deallocation function.
pub type DeallocateFn = fn(block: usize, user_data: usize);

/// A user-supplied allocator, identified by its three entry points and
/// user data.
///
/// The layer does not route its own allocations through these functions;
/// it enforces the identity contract around them. A partially-filled set
/// is rejected with [`Error::InvalidPointer`], and every operation that
/// accepts an allocator must present the one the instance was created
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationCallbacks {
    /// Opaque value passed back to each entry point.
    pub user_data: usize,
    /// Allocation entry point.
    pub allocate: Option<AllocateFn>,
    /// Reallocation entry point.
    pub reallocate: Option<ReallocateFn>,
    /// Deallocation entry point.
    pub deallocate: Option<DeallocateFn>,
}

impl AllocationCallbacks {
    /// Whether all three entry points are present.
    pub fn is_complete(&self) -> bool {
        self.allocate.is_some() && self.reallocate.is_some() && self.deallocate.is_some()
    }
}

/// Checks a caller-supplied allocator for completeness.
pub(crate) fn validate_allocator(allocator: Option<&AllocationCallbacks>) -> Result<()> {
    match allocator {
        Some(a) if !a.is_complete() => Err(Error::InvalidPointer),
        _ => Ok(()),
    }
}

bitflags! {
    /// Behavior toggles applied at instance creation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstanceCreateFlags: u32 {
        /// Do not expose joystick hats as buttons.
        const DISABLE_JOYSTICK_HAT_BUTTONS = 0x0000_0001;
        /// Do not use libdecor for Wayland decorations.
        const WAYLAND_DISABLE_LIBDECOR = 0x0000_1000;
        /// Prefer Xlib over XCB for Vulkan surfaces.
        const X11_DISABLE_XCB_VULKAN_SURFACE = 0x0000_2000;
        /// Do not create the macOS menu bar.
        const COCOA_DISABLE_MENUBAR = 0x0000_4000;
        /// Do not change directory into the macOS bundle resources.
        const COCOA_DISABLE_CHDIR_RESOURCES = 0x0000_8000;
    }
}

bitflags! {
    /// Set of platforms a build can support.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PlatformMask: u32 {
        /// Windows.
        const WIN32 = 0x01;
        /// macOS.
        const COCOA = 0x02;
        /// Wayland.
        const WAYLAND = 0x04;
        /// X11.
        const X11 = 0x08;
        /// The headless null platform.
        const NULL = 0x10;
    }
}

/// Platform selection request for instance creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlatformRequest {
    /// Let the backend pick.
    #[default]
    Any,
    /// Require Windows.
    Win32,
    /// Require macOS.
    Cocoa,
    /// Require Wayland.
    Wayland,
    /// Require X11.
    X11,
    /// Require the headless null platform.
    Null,
}

impl PlatformRequest {
    fn platform_id(self) -> Option<PlatformId> {
        match self {
            Self::Any => None,
            Self::Win32 => Some(PlatformId::Win32),
            Self::Cocoa => Some(PlatformId::Cocoa),
            Self::Wayland => Some(PlatformId::Wayland),
            Self::X11 => Some(PlatformId::X11),
            Self::Null => Some(PlatformId::Null),
        }
    }
}

/// Parameters of instance creation.
#[derive(Default)]
pub struct InstanceCreateInfo {
    /// Must be [`StructureType::InstanceCreateInfo`].
    pub s_type: Option<StructureType>,
    /// Extension chain; must be `None`.
    pub next: Option<ExtensionChain>,
    /// Behavior toggles.
    pub flags: InstanceCreateFlags,
    /// Platform selection.
    pub platform: PlatformRequest,
}

impl InstanceCreateInfo {
    fn validate(&self) -> Result<()> {
        match self.s_type {
            None | Some(StructureType::InstanceCreateInfo) => {}
            Some(_) => return Err(Error::InvalidEnumValue),
        }
        if self.next.is_some() {
            return Err(Error::FeatureNotSupported);
        }
        Ok(())
    }
}

/// Properties queryable without an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalProperties {
    /// Layer major version.
    pub version_major: u32,
    /// Layer minor version.
    pub version_minor: u32,
    /// Layer revision.
    pub version_revision: u32,
    /// Backend version string.
    pub backend_version: String,
    /// Platforms this build can initialize.
    pub supported_platforms: PlatformMask,
}

/// Queries version and platform support without creating an instance.
pub fn enumerate_global_properties() -> GlobalProperties {
    let system = NullSystem::new();
    let mut supported = PlatformMask::empty();
    for (platform, bit) in [
        (PlatformId::Win32, PlatformMask::WIN32),
        (PlatformId::Cocoa, PlatformMask::COCOA),
        (PlatformId::Wayland, PlatformMask::WAYLAND),
        (PlatformId::X11, PlatformMask::X11),
        (PlatformId::Null, PlatformMask::NULL),
    ] {
        if system.platform_supported(platform) {
            supported |= bit;
        }
    }
    GlobalProperties {
        version_major: crate::types::VERSION_MAJOR,
        version_minor: crate::types::VERSION_MINOR,
        version_revision: crate::types::VERSION_REVISION,
        backend_version: system.version_string(),
        supported_platforms: supported,
    }
}

/// Properties of a live instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceProperties {
    /// The platform selected at creation.
    pub platform: PlatformRequest,
    /// Backend version string.
    pub backend_version: String,
}

/// Interior state shared by the instance and every handle derived from it.
pub(crate) struct Shared {
    pub(crate) system: Box<dyn WindowSystem>,
    pub(crate) allocator: Option<AllocationCallbacks>,
    pub(crate) live: bool,
    pub(crate) instance_callbacks: InstanceCallbacks,
    pub(crate) window_callbacks: slotmap::SecondaryMap<WindowId, WindowCallbacks>,
}

impl Shared {
    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.live {
            Ok(())
        } else {
            Err(Error::InitializationFailed)
        }
    }

    pub(crate) fn allocator_matches(&self, allocator: Option<&AllocationCallbacks>) -> bool {
        self.allocator.as_ref() == allocator
    }
}

pub(crate) type SharedSystem = Rc<RefCell<Shared>>;

/// The root handle. At most one exists per process.
///
/// The instance and every handle derived from it stay on the thread that
/// created them; none of them are `Send`.
pub struct Instance {
    pub(crate) shared: SharedSystem,
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance").finish_non_exhaustive()
    }
}

impl Instance {
    /// Creates the process instance over the default backend.
    ///
    /// Fails with [`Error::FeatureNotSupported`] if an instance already
    /// exists, and with [`Error::PlatformUnavailable`] if the requested
    /// platform is not supported by this build.
    pub fn create(
        create_info: &InstanceCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<Self> {
        Self::create_with_system(Box::new(NullSystem::new()), create_info, allocator)
    }

    /// Creates the process instance over a caller-supplied backend.
    pub fn create_with_system(
        mut system: Box<dyn WindowSystem>,
        create_info: &InstanceCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<Self> {
        create_info.validate()?;
        validate_allocator(allocator)?;
        if let Some(platform) = create_info.platform.platform_id() {
            if !system.platform_supported(platform) {
                return Err(Error::PlatformUnavailable);
            }
        }

        if INSTANCE_LIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::FeatureNotSupported);
        }

        let flags = create_info.flags;
        system.init_hint(
            InitHint::JoystickHatButtons,
            !flags.contains(InstanceCreateFlags::DISABLE_JOYSTICK_HAT_BUTTONS),
        );
        system.init_hint(
            InitHint::WaylandLibdecor,
            !flags.contains(InstanceCreateFlags::WAYLAND_DISABLE_LIBDECOR),
        );
        system.init_hint(
            InitHint::X11XcbVulkanSurface,
            !flags.contains(InstanceCreateFlags::X11_DISABLE_XCB_VULKAN_SURFACE),
        );
        system.init_hint(
            InitHint::CocoaMenubar,
            !flags.contains(InstanceCreateFlags::COCOA_DISABLE_MENUBAR),
        );
        system.init_hint(
            InitHint::CocoaChdirResources,
            !flags.contains(InstanceCreateFlags::COCOA_DISABLE_CHDIR_RESOURCES),
        );
        system.init_platform_hint(create_info.platform.platform_id());

        if !system.init() {
            let error = system.take_error();
            INSTANCE_LIVE.store(false, Ordering::SeqCst);
            return Err(match error {
                Some(SystemError::PlatformUnavailable) => Error::PlatformUnavailable,
                Some(SystemError::PlatformError) => Error::Platform,
                _ => Error::Unknown,
            });
        }
        system.take_error();

        log::info!(
            "instance created on {:?} platform",
            system.platform().map_or("unknown", |p| match p {
                PlatformId::Win32 => "win32",
                PlatformId::Cocoa => "cocoa",
                PlatformId::Wayland => "wayland",
                PlatformId::X11 => "x11",
                PlatformId::Null => "null",
            })
        );

        Ok(Self {
            shared: Rc::new(RefCell::new(Shared {
                system,
                allocator: allocator.copied(),
                live: true,
                instance_callbacks: InstanceCallbacks::default(),
                window_callbacks: slotmap::SecondaryMap::new(),
            })),
        })
    }

    /// Destroys the instance, tearing down every remaining backend object.
    ///
    /// With a mismatched allocator the instance is returned untouched
    /// alongside [`Error::InvalidPointer`]. If the backend reports an
    /// error during teardown the handle is spent; the error is returned
    /// with it and a retry yields [`Error::InitializationFailed`].
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
        let teardown = {
            let mut shared = self.shared.borrow_mut();
            shared.live = false;
            shared.window_callbacks.clear();
            let (_, error) = checked(shared.system.as_mut(), |s| s.terminate());
            platform_or_unknown(error)
        };
        INSTANCE_LIVE.store(false, Ordering::SeqCst);
        log::info!("instance destroyed");
        teardown.map_err(|error| (error, self))
    }

    /// Properties of this instance.
    pub fn properties(&self) -> Result<InstanceProperties> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let platform = match shared.system.platform() {
            Some(PlatformId::Win32) => PlatformRequest::Win32,
            Some(PlatformId::Cocoa) => PlatformRequest::Cocoa,
            Some(PlatformId::Wayland) => PlatformRequest::Wayland,
            Some(PlatformId::X11) => PlatformRequest::X11,
            Some(PlatformId::Null) => PlatformRequest::Null,
            None => return Err(Error::InitializationFailed),
        };
        Ok(InstanceProperties {
            platform,
            backend_version: shared.system.version_string(),
        })
    }

    /// Connected monitors, primary first.
    ///
    /// Every returned monitor is cross-checked against its current video
    /// mode; a monitor the backend lists but cannot describe aborts the
    /// enumeration.
    pub fn enumerate_monitors(&self) -> Result<Vec<Monitor>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (ids, error) = checked(shared.system.as_mut(), |s| s.monitors());
        platform_or_unknown(error)?;
        for &id in &ids {
            let (mode, error) = checked(shared.system.as_mut(), |s| s.video_mode(id));
            if error.is_some() || mode.is_none() {
                return Err(Error::Unknown);
            }
        }
        drop(shared);
        Ok(ids
            .into_iter()
            .map(|id| Monitor::new(Rc::clone(&self.shared), id))
            .collect())
    }

    /// The primary monitor.
    pub fn primary_monitor(&self) -> Result<Monitor> {
        self.enumerate_monitors()?
            .into_iter()
            .next()
            .ok_or(Error::ResultNotAvailable)
    }

    /// Creates a window bound to a monitor. See
    /// [`WindowCreateInfo`] for the creation pipeline.
    pub fn create_window(
        &self,
        monitor: &Monitor,
        create_info: &WindowCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<Window> {
        Window::create(self, monitor, create_info, allocator)
    }

    /// Creates a cursor object. See [`crate::cursor::Cursor::create`].
    pub fn create_cursor(
        &self,
        create_info: &crate::cursor::CursorCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<crate::cursor::Cursor> {
        crate::cursor::Cursor::create(self, create_info, allocator)
    }

    /// Registers the instance-scoped callback set, replacing any previous
    /// one.
    pub fn set_callbacks(&self, callbacks: InstanceCallbacks) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        shared.instance_callbacks = callbacks;
        Ok(())
    }

    /// Pumps the event queue and delivers callbacks.
    ///
    /// With `wait` true, the call blocks until an event arrives and
    /// `timeout` is ignored. With `wait` false, a zero `timeout` drains
    /// queued events without blocking and a positive one blocks for at
    /// most that many seconds; a negative or non-finite timeout is
    /// rejected.
    pub fn process_events(&self, timeout: f64, wait: Bool32) -> Result<()> {
        let wait = wait.as_bool()?;
        if !wait && timeout != 0.0 && !(timeout.is_finite() && timeout > 0.0) {
            return Err(Error::InvalidNumericValue);
        }
        let (events, instance_callbacks, window_callbacks) = {
            let mut shared = self.shared.borrow_mut();
            shared.ensure_live()?;
            let (events, error) = checked(shared.system.as_mut(), |s| {
                if wait {
                    s.wait_events()
                } else if timeout == 0.0 {
                    s.poll_events()
                } else {
                    s.wait_events_timeout(timeout)
                }
            });
            platform_or_unknown(error)?;
            (
                events,
                shared.instance_callbacks,
                shared.window_callbacks.clone(),
            )
        };
        // Dispatch happens after the borrow is released so callbacks can
        // call back into the layer through their ids.
        for event in &events {
            instance_callbacks.dispatch(event);
            if let Some(id) = event_window(event) {
                if let Some(callbacks) = window_callbacks.get(id) {
                    callbacks.dispatch(event);
                }
            }
        }
        Ok(())
    }

    /// Wakes a blocked [`process_events`](Self::process_events) call.
    pub fn post_empty_event(&self) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| s.post_empty_event());
        strict(error)
    }

    /// Whether raw (unaccelerated) mouse motion is available.
    pub fn raw_mouse_motion_supported(&self) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (supported, error) = checked(shared.system.as_mut(), |s| {
            s.raw_mouse_motion_supported()
        });
        strict(error)?;
        Ok(supported)
    }

    /// Current value of the monotonic timer, in ticks.
    pub fn timer_value(&self) -> Result<u64> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (value, error) = checked(shared.system.as_mut(), |s| s.timer_value());
        strict(error)?;
        Ok(value)
    }

    /// Frequency of the monotonic timer, in ticks per second.
    pub fn timer_frequency(&self) -> Result<u64> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (value, error) = checked(shared.system.as_mut(), |s| s.timer_frequency());
        strict(error)?;
        Ok(value)
    }

    /// Platform scancode of a layout-independent key.
    pub fn key_scancode(&self, key: Key) -> Result<i32> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (scancode, error) = checked(shared.system.as_mut(), |s| s.key_scancode(key));
        match error {
            None => Ok(scancode),
            Some(SystemError::InvalidEnum) => Err(Error::InvalidEnumValue),
            Some(SystemError::PlatformError) => Err(Error::Platform),
            Some(_) => Err(Error::Unknown),
        }
    }

    /// Layout-specific name of a printable key, if it has one.
    pub fn key_name(&self, key: Key, scancode: i32) -> Result<Option<String>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (name, error) = checked(shared.system.as_mut(), |s| s.key_name(key, scancode));
        match error {
            None => Ok(name),
            Some(SystemError::InvalidEnum) => Err(Error::InvalidEnumValue),
            Some(SystemError::InvalidValue) => Err(Error::InvalidNumericValue),
            Some(SystemError::PlatformError) => Err(Error::Platform),
            Some(_) => Err(Error::Unknown),
        }
    }

    /// Clipboard contents.
    ///
    /// An empty or non-textual clipboard is
    /// [`Error::ResultNotAvailable`], not a platform failure.
    pub fn clipboard(&self) -> Result<String> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (text, error) = checked(shared.system.as_mut(), |s| s.clipboard());
        match (text, error) {
            (Some(text), None) => Ok(text),
            (_, Some(SystemError::FormatUnavailable)) => Err(Error::ResultNotAvailable),
            (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
            _ => Err(Error::Unknown),
        }
    }

    /// Replaces the clipboard contents.
    pub fn set_clipboard(&self, text: &str) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| s.set_clipboard(text));
        platform_or_unknown(error)
    }

    /// A joystick handle for a slot in `0..16`.
    ///
    /// The handle is valid whether or not a device is present; presence
    /// is a property, not a precondition.
    pub fn joystick(&self, id: JoystickId) -> Result<Joystick> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        if !(0..JOYSTICK_COUNT as i32).contains(&id) {
            return Err(Error::InvalidHandle);
        }
        drop(shared);
        Ok(Joystick::new(Rc::clone(&self.shared), id))
    }

    /// Handles for every joystick slot with a device present.
    pub fn enumerate_joysticks(&self) -> Result<Vec<Joystick>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let mut present = Vec::new();
        for id in 0..JOYSTICK_COUNT as i32 {
            let (is_present, error) =
                checked(shared.system.as_mut(), |s| s.joystick_present(id));
            strict(error)?;
            if is_present {
                present.push(id);
            }
        }
        drop(shared);
        Ok(present
            .into_iter()
            .map(|id| Joystick::new(Rc::clone(&self.shared), id))
            .collect())
    }

    /// Merges SDL-style gamepad mapping data.
    ///
    /// Runtime mapping updates are not supported by this layer; the call
    /// always fails so callers do not silently depend on it.
    pub fn update_gamepad_mappings(&self, _mappings: &str) -> Result<()> {
        let shared = self.shared.borrow();
        shared.ensure_live()?;
        Err(Error::FeatureNotSupported)
    }

    /// Whether the backend found a Vulkan loader and surface support.
    pub fn vulkan_supported(&self) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (supported, error) = checked(shared.system.as_mut(), |s| s.vulkan_supported());
        strict(error)?;
        Ok(supported)
    }

    /// Instance extensions required for surface creation.
    pub fn required_instance_extensions(&self) -> Result<Vec<String>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (extensions, error) = checked(shared.system.as_mut(), |s| {
            s.required_instance_extensions()
        });
        match (extensions, error) {
            (Some(extensions), None) => Ok(extensions),
            (_, Some(SystemError::ApiUnavailable)) => Err(Error::ApiUnavailable),
            _ => Err(Error::Unknown),
        }
    }

    /// Resolves a Vulkan entry point through the backend's loader. The
    /// returned address is opaque and untranslated.
    pub fn instance_proc_addr(&self, vk_instance: VkInstance, name: &str) -> Result<ProcAddr> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (addr, error) = checked(shared.system.as_mut(), |s| {
            s.instance_proc_loader(vk_instance, name)
        });
        match error {
            None => Ok(addr),
            Some(SystemError::ApiUnavailable) => Err(Error::ApiUnavailable),
            Some(_) => Err(Error::Unknown),
        }
    }

    /// Whether a queue family of a physical device can present to windows
    /// of this instance. The returned value is the backend's raw answer.
    pub fn physical_device_presentation_support(
        &self,
        vk_instance: VkInstance,
        device: VkPhysicalDevice,
        queue_family: u32,
    ) -> Result<VkBool32> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (support, error) = checked(shared.system.as_mut(), |s| {
            s.physical_device_presentation_support(vk_instance, device, queue_family)
        });
        match error {
            None => Ok(support),
            Some(SystemError::ApiUnavailable) => Err(Error::ApiUnavailable),
            Some(SystemError::PlatformError) => Err(Error::Platform),
            Some(_) => Err(Error::Unknown),
        }
    }
}

/// The window an event belongs to, if it is window-scoped.
fn event_window(event: &Event) -> Option<WindowId> {
    match *event {
        Event::WindowPosition(id, _)
        | Event::WindowSize(id, _)
        | Event::FramebufferSize(id, _)
        | Event::WindowContentScale(id, _)
        | Event::CursorPosition(id, _)
        | Event::WindowFocus(id, _)
        | Event::WindowIconify(id, _)
        | Event::WindowMaximize(id, _)
        | Event::WindowClose(id)
        | Event::WindowRefresh(id)
        | Event::PathDrop(id, _)
        | Event::MouseButton(id, _, _, _)
        | Event::Scroll(id, _, _)
        | Event::CursorEnter(id, _)
        | Event::Key(id, _, _, _, _)
        | Event::Char(id, _)
        | Event::CharMods(id, _, _) => Some(id),
        Event::JoystickHat(..) | Event::MonitorConnection(..) | Event::JoystickConnection(..) => {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn null_instance() -> (NullSystem, Instance) {
        let system = NullSystem::new();
        let instance = Instance::create_with_system(
            Box::new(system.clone()),
            &InstanceCreateInfo::default(),
            None,
        )
        .unwrap();
        (system, instance)
    }

    fn complete_allocator() -> AllocationCallbacks {
        fn allocate(_size: usize, _user: usize) -> usize {
            0
        }
        fn reallocate(_block: usize, _size: usize, _user: usize) -> usize {
            0
        }
        fn deallocate(_block: usize, _user: usize) {}
        AllocationCallbacks {
            user_data: 7,
            allocate: Some(allocate),
            reallocate: Some(reallocate),
            deallocate: Some(deallocate),
        }
    }

    #[test]
    fn test_second_instance_is_rejected() {
        let _guard = test_support::lock();
        let (_system, instance) = null_instance();
        let second = Instance::create(&InstanceCreateInfo::default(), None);
        assert!(matches!(second, Err(Error::FeatureNotSupported)));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_instance_can_be_recreated_after_destroy() {
        let _guard = test_support::lock();
        let (_system, instance) = null_instance();
        instance.destroy(None).unwrap();
        let again = Instance::create(&InstanceCreateInfo::default(), None).unwrap();
        again.destroy(None).unwrap();
    }

    #[test]
    fn test_partial_allocator_is_rejected_before_init() {
        let _guard = test_support::lock();
        let partial = AllocationCallbacks {
            allocate: complete_allocator().allocate,
            ..AllocationCallbacks::default()
        };
        let result = Instance::create(&InstanceCreateInfo::default(), Some(&partial));
        assert!(matches!(result, Err(Error::InvalidPointer)));
        // The failed creation must not leak the singleton.
        let instance = Instance::create(&InstanceCreateInfo::default(), None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_destroy_requires_matching_allocator() {
        let _guard = test_support::lock();
        let allocator = complete_allocator();
        let instance =
            Instance::create(&InstanceCreateInfo::default(), Some(&allocator)).unwrap();
        let (error, instance) = instance.destroy(None).unwrap_err();
        assert_eq!(error, Error::InvalidPointer);
        // The instance survives a rejected destroy unchanged.
        assert!(instance.properties().is_ok());
        instance.destroy(Some(&allocator)).unwrap();
    }

    #[test]
    fn test_unsupported_platform_is_rejected() {
        let _guard = test_support::lock();
        let info = InstanceCreateInfo {
            platform: PlatformRequest::Wayland,
            ..InstanceCreateInfo::default()
        };
        let result = Instance::create(&info, None);
        assert!(matches!(result, Err(Error::PlatformUnavailable)));
        let instance = Instance::create(&InstanceCreateInfo::default(), None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_populated_extension_chain_is_rejected() {
        let _guard = test_support::lock();
        let info = InstanceCreateInfo {
            next: Some(Box::new(0_u32)),
            ..InstanceCreateInfo::default()
        };
        assert!(matches!(
            Instance::create(&info, None),
            Err(Error::FeatureNotSupported)
        ));
    }

    #[test]
    fn test_clipboard_round_trip_and_empty_read() {
        let _guard = test_support::lock();
        let (_system, instance) = null_instance();
        assert_eq!(instance.clipboard(), Err(Error::ResultNotAvailable));
        instance.set_clipboard("copied").unwrap();
        assert_eq!(instance.clipboard().unwrap(), "copied");
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_joystick_slot_range_is_checked() {
        let _guard = test_support::lock();
        let (_system, instance) = null_instance();
        assert!(instance.joystick(0).is_ok());
        assert!(instance.joystick(15).is_ok());
        assert_eq!(instance.joystick(16).err(), Some(Error::InvalidHandle));
        assert_eq!(instance.joystick(-1).err(), Some(Error::InvalidHandle));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_event_pump_branch_selection() {
        let _guard = test_support::lock();
        let (system, instance) = null_instance();

        instance.process_events(0.0, Bool32::FALSE).unwrap();
        assert_eq!(system.timed_wait_count(), 0);

        instance.process_events(0.25, Bool32::FALSE).unwrap();
        assert_eq!(system.timed_wait_count(), 1);

        // Waiting indefinitely ignores the timeout entirely.
        instance.process_events(-5.0, Bool32::TRUE).unwrap();
        assert_eq!(system.timed_wait_count(), 1);

        assert_eq!(
            instance.process_events(-0.5, Bool32::FALSE),
            Err(Error::InvalidNumericValue)
        );
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_enumerate_joysticks_reports_present_slots() {
        let _guard = test_support::lock();
        let (system, instance) = null_instance();
        assert!(instance.enumerate_joysticks().unwrap().is_empty());
        system.attach_joystick(2, crate::system::null::JoystickConfig::default());
        let joysticks = instance.enumerate_joysticks().unwrap();
        assert_eq!(joysticks.len(), 1);
        assert_eq!(joysticks[0].id(), 2);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_update_gamepad_mappings_is_unsupported() {
        let _guard = test_support::lock();
        let (_system, instance) = null_instance();
        assert_eq!(
            instance.update_gamepad_mappings("guid,name,a:b0"),
            Err(Error::FeatureNotSupported)
        );
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_global_properties_need_no_instance() {
        let properties = enumerate_global_properties();
        assert_eq!(properties.version_major, crate::types::VERSION_MAJOR);
        assert!(properties.supported_platforms.contains(PlatformMask::NULL));
        assert!(!properties.supported_platforms.contains(PlatformMask::WIN32));
    }
}
