//! Joystick and gamepad queries.
//!
//! Joysticks are addressed by slot number. A handle refers to a slot, not
//! a device: it is valid while the instance lives, and queries against an
//! empty slot fail with [`Error::ResultNotAvailable`] rather than
//! invalidating the handle.

use crate::error::{checked, Error, Result};
use crate::instance::SharedSystem;
use crate::input::{Action, GamepadState, HatState};
use crate::system::SystemError;

/// Joystick slot number, `0..16`.
pub type JoystickId = i32;

/// Number of joystick slots.
pub const JOYSTICK_COUNT: usize = 16;

/// A joystick slot.
#[derive(Clone)]
pub struct Joystick {
    shared: SharedSystem,
    id: JoystickId,
}

/// Descriptive properties of a present joystick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoystickProperties {
    /// Device name.
    pub name: String,
    /// Stable device GUID.
    pub guid: String,
    /// Whether a gamepad mapping exists for the device.
    pub is_gamepad: bool,
    /// Mapped gamepad name, when a mapping exists.
    pub gamepad_name: Option<String>,
}

impl std::fmt::Debug for Joystick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joystick").field("id", &self.id).finish()
    }
}

impl Joystick {
    pub(crate) fn new(shared: SharedSystem, id: JoystickId) -> Self {
        Self { shared, id }
    }

    /// The slot number of this handle.
    pub fn id(&self) -> JoystickId {
        self.id
    }

    /// Whether a device is present in the slot.
    pub fn present(&self) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (present, error) = checked(shared.system.as_mut(), |s| s.joystick_present(self.id));
        crate::error::platform_or_unknown(error)?;
        Ok(present)
    }

    /// Descriptive properties of the device in the slot.
    pub fn properties(&self) -> Result<JoystickProperties> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (name, error) = checked(shared.system.as_mut(), |s| s.joystick_name(self.id));
        let name = match (name, error) {
            (Some(name), None) => name,
            (None, None) => return Err(Error::ResultNotAvailable),
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };
        let (guid, error) = checked(shared.system.as_mut(), |s| s.joystick_guid(self.id));
        let guid = match (guid, error) {
            (Some(guid), None) => guid,
            _ => return Err(Error::Unknown),
        };
        let (is_gamepad, error) =
            checked(shared.system.as_mut(), |s| s.joystick_is_gamepad(self.id));
        crate::error::strict(error)?;
        let gamepad_name = if is_gamepad {
            let (gamepad_name, error) =
                checked(shared.system.as_mut(), |s| s.gamepad_name(self.id));
            crate::error::strict(error)?;
            gamepad_name
        } else {
            None
        };
        Ok(JoystickProperties {
            name,
            guid,
            is_gamepad,
            gamepad_name,
        })
    }

    /// Axis values of the device in the slot.
    pub fn axes(&self) -> Result<Vec<f32>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (axes, error) = checked(shared.system.as_mut(), |s| s.joystick_axes(self.id));
        absent_or(axes, error)
    }

    /// Button states of the device in the slot. When hat buttons are
    /// enabled, hat directions are appended after the real buttons.
    pub fn buttons(&self) -> Result<Vec<Action>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (buttons, error) = checked(shared.system.as_mut(), |s| s.joystick_buttons(self.id));
        absent_or(buttons, error)
    }

    /// Hat states of the device in the slot.
    pub fn hats(&self) -> Result<Vec<HatState>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (hats, error) = checked(shared.system.as_mut(), |s| s.joystick_hats(self.id));
        absent_or(hats, error)
    }

    /// Whether the device has a gamepad mapping.
    pub fn is_gamepad(&self) -> Result<bool> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (is_gamepad, error) =
            checked(shared.system.as_mut(), |s| s.joystick_is_gamepad(self.id));
        crate::error::platform_or_unknown(error)?;
        Ok(is_gamepad)
    }

    /// The device's input state remapped to the standard gamepad layout.
    pub fn gamepad_state(&self) -> Result<GamepadState> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (state, error) = checked(shared.system.as_mut(), |s| s.gamepad_state(self.id));
        absent_or(state, error)
    }

    /// The slot's user pointer.
    pub fn user_pointer(&self) -> Result<usize> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (value, error) = checked(shared.system.as_mut(), |s| {
            s.joystick_user_pointer(self.id)
        });
        crate::error::strict(error)?;
        Ok(value)
    }

    /// Sets the slot's user pointer.
    pub fn set_user_pointer(&self, value: usize) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_joystick_user_pointer(self.id, value)
        });
        crate::error::strict(error)
    }
}

/// Shared mapping for queries that return nothing when the slot is empty.
fn absent_or<T>(value: Option<T>, error: Option<SystemError>) -> Result<T> {
    match (value, error) {
        (Some(value), None) => Ok(value),
        (None, None) => Err(Error::ResultNotAvailable),
        (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
        _ => Err(Error::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, InstanceCreateInfo};
    use crate::system::null::{JoystickConfig, NullSystem};
    use crate::test_support;

    fn null_instance(system: NullSystem) -> Instance {
        Instance::create_with_system(
            Box::new(system),
            &InstanceCreateInfo::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_slot_queries() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let joystick = instance.joystick(3).unwrap();
        assert!(!joystick.present().unwrap());
        assert_eq!(joystick.axes(), Err(Error::ResultNotAvailable));
        assert_eq!(joystick.properties(), Err(Error::ResultNotAvailable));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_attached_gamepad_reports_state() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        system.attach_joystick(
            0,
            JoystickConfig {
                name: String::from("Pad"),
                axes: vec![0.5, -0.5, 0.0, 0.0, 0.0, 0.0],
                ..JoystickConfig::default()
            },
        );
        let instance = null_instance(system);
        let joystick = instance.joystick(0).unwrap();
        assert!(joystick.present().unwrap());
        assert!(joystick.is_gamepad().unwrap());

        let properties = joystick.properties().unwrap();
        assert_eq!(properties.name, "Pad");
        assert_eq!(properties.gamepad_name.as_deref(), Some("Pad"));

        let state = joystick.gamepad_state().unwrap();
        assert_eq!(state.axis(crate::input::GamepadAxis::LeftX), 0.5);
        instance.destroy(None).unwrap();
    }
}
