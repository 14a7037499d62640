//! # vkwin
//!
//! An explicit-result windowing, input and monitor layer in the style of
//! modern graphics APIs.
//!
//! The crate re-expresses a conventional windowing library under a stricter
//! API discipline:
//!
//! - **Explicit results**: every fallible operation returns
//!   [`Result<T, Error>`](Error); nothing is signalled through a
//!   query-after-the-fact error flag.
//! - **Opaque handles**: [`Instance`], [`Window`], [`Monitor`], [`Cursor`]
//!   and [`Joystick`] wrap versioned backend ids; the composite window
//!   handle additionally carries the bound monitor and the video mode that
//!   was honored at creation, because the backend cannot report those back.
//! - **Create-info and state structs**: construction is driven by
//!   declarative `*CreateInfo` structs with a type tag and a (presently
//!   empty) extension chain, and a complete [`WindowState`] value can be
//!   both enumerated from and reconciled onto a live window.
//! - **Forward-compatible enums**: flag sets are `bitflags` types and
//!   boolean fields crossing validated boundaries use the tri-state-checked
//!   [`Bool32`].
//!
//! The underlying window system is consumed through the
//! [`system::WindowSystem`] trait, which preserves the library's native
//! out-of-band error discipline (sentinel returns plus a destructive
//! last-error query). The shipped backend is the headless
//! [`system::null::NullSystem`], the analog of the wrapped library's null
//! platform; it doubles as the test vehicle.
//!
//! ## Quick start
//!
//! ```rust
//! use vkwin::{Instance, InstanceCreateInfo, WindowCreateInfo, VideoMode, Extent2D};
//!
//! fn main() -> Result<(), vkwin::Error> {
//!     let instance = Instance::create(&InstanceCreateInfo::default(), None)?;
//!     let monitors = instance.enumerate_monitors()?;
//!
//!     let mut create_info = WindowCreateInfo::default();
//!     create_info.initial_state.size = Extent2D { width: 800, height: 600 };
//!     create_info.initial_state.title = String::from("demo");
//!     create_info.requested_video_mode = VideoMode {
//!         width: 800,
//!         height: 600,
//!         ..VideoMode::default()
//!     };
//!
//!     let window = instance.create_window(&monitors[0], &create_info, None)?;
//!     instance.process_events(0.0, vkwin::Bool32::FALSE)?;
//!
//!     window.destroy(None).map_err(|(e, _)| e)?;
//!     instance.destroy(None).map_err(|(e, _)| e)?;
//!     Ok(())
//! }
//! ```

pub mod callbacks;
pub mod cursor;
pub mod error;
pub mod input;
pub mod instance;
pub mod joystick;
pub mod monitor;
pub mod system;
pub mod types;
pub mod vk;
pub mod window;

pub use cursor::{Cursor, CursorCreateFlags, CursorCreateInfo, CursorShape};
pub use error::{Error, Result};
pub use instance::{
    enumerate_global_properties, AllocationCallbacks, GlobalProperties, Instance,
    InstanceCreateFlags, InstanceCreateInfo, InstanceProperties, PlatformMask, PlatformRequest,
};
pub use joystick::{Joystick, JoystickId, JoystickProperties};
pub use monitor::{Monitor, MonitorProperties};
pub use types::{
    Bool32, ContentScale, Extent2D, FrameExtents, GammaRamp, ImageData, Offset2D, Position,
    Rect2D, StructureType, VideoMode, DONT_CARE, VERSION_MAJOR, VERSION_MINOR, VERSION_REVISION,
};
pub use window::{
    CursorMode, Window, WindowCreateFlags, WindowCreateInfo, WindowProperties, WindowState,
};

/// Common imports for layer users
pub mod prelude {
    pub use crate::{
        callbacks::{InstanceCallbacks, WindowCallbacks},
        cursor::{Cursor, CursorCreateInfo, CursorShape},
        error::{Error, Result},
        input::{Action, Key, KeyAction, Modifiers, MouseButton},
        instance::{Instance, InstanceCreateInfo},
        monitor::Monitor,
        types::{Bool32, Extent2D, Offset2D, VideoMode},
        window::{CursorMode, Window, WindowCreateInfo, WindowState},
    };
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    /// The instance singleton is process-wide state, so tests that create an
    /// instance must not overlap. Lock this for the duration of each such test.
    pub static SERIAL: Mutex<()> = Mutex::new(());

    pub fn lock() -> std::sync::MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
