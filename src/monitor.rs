//! Monitor handles, video mode queries and gamma control.

use crate::error::{checked, Error, Result};
use crate::instance::SharedSystem;
use crate::system::{MonitorId, SystemError};
use crate::types::{ContentScale, Extent2D, GammaRamp, Offset2D, Rect2D, VideoMode};

/// A connected monitor.
///
/// Monitor handles are borrowed views of backend state; they are cheap to
/// clone and carry no ownership. A handle outliving its monitor (or its
/// instance) fails its operations instead of dangling.
#[derive(Clone)]
pub struct Monitor {
    shared: SharedSystem,
    id: MonitorId,
}

/// A snapshot of a monitor's descriptive properties.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorProperties {
    /// Human-readable name.
    pub name: String,
    /// Position on the virtual screen.
    pub position: Offset2D,
    /// Work area, excluding task bars and docks.
    pub workarea: Rect2D,
    /// Physical size in millimetres.
    pub physical_size: Extent2D,
    /// Content scale.
    pub content_scale: ContentScale,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor").field("id", &self.id).finish()
    }
}

impl Monitor {
    pub(crate) fn new(shared: SharedSystem, id: MonitorId) -> Self {
        Self { shared, id }
    }

    /// The backend id of this monitor.
    pub fn id(&self) -> MonitorId {
        self.id
    }

    /// Descriptive properties of the monitor.
    pub fn properties(&self) -> Result<MonitorProperties> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (name, error) = checked(shared.system.as_mut(), |s| s.monitor_name(self.id));
        let name = match (name, error) {
            (Some(name), None) => name,
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };
        let (position, error) = checked(shared.system.as_mut(), |s| s.monitor_position(self.id));
        crate::error::platform_or_unknown(error)?;
        let (workarea, error) = checked(shared.system.as_mut(), |s| s.monitor_workarea(self.id));
        crate::error::platform_or_unknown(error)?;
        let (physical_size, error) =
            checked(shared.system.as_mut(), |s| s.monitor_physical_size(self.id));
        crate::error::platform_or_unknown(error)?;
        let (content_scale, error) =
            checked(shared.system.as_mut(), |s| s.monitor_content_scale(self.id));
        crate::error::platform_or_unknown(error)?;
        Ok(MonitorProperties {
            name,
            position,
            workarea,
            physical_size,
            content_scale,
        })
    }

    /// All video modes of this monitor, sorted ascending.
    pub fn video_modes(&self) -> Result<Vec<VideoMode>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (modes, error) = checked(shared.system.as_mut(), |s| s.video_modes(self.id));
        match (modes, error) {
            (Some(modes), None) => Ok(modes),
            (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
            _ => Err(Error::Unknown),
        }
    }

    /// The monitor's current video mode.
    pub fn current_video_mode(&self) -> Result<VideoMode> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (mode, error) = checked(shared.system.as_mut(), |s| s.video_mode(self.id));
        match (mode, error) {
            (Some(mode), None) => Ok(mode),
            (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
            _ => Err(Error::Unknown),
        }
    }

    /// The monitor's current gamma ramp.
    ///
    /// Platforms without gamma access are not an error here: the query
    /// succeeds with `None`, so callers can distinguish "no ramp to read"
    /// from actual failure.
    pub fn gamma_ramp(&self) -> Result<Option<GammaRamp>> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (ramp, error) = checked(shared.system.as_mut(), |s| s.gamma_ramp(self.id));
        match (ramp, error) {
            (Some(ramp), None) => Ok(Some(ramp)),
            (_, Some(SystemError::FeatureUnavailable)) => Ok(None),
            (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
            _ => Err(Error::Unknown),
        }
    }

    /// Replaces the monitor's gamma ramp.
    ///
    /// Platforms without gamma access accept and discard the ramp; the
    /// call succeeds there so portable code need not special-case them.
    pub fn set_gamma_ramp(&self, ramp: &GammaRamp) -> Result<()> {
        if ramp.size() == 0
            || ramp.green.len() != ramp.size()
            || ramp.blue.len() != ramp.size()
        {
            return Err(Error::InvalidNumericValue);
        }
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| s.set_gamma_ramp(self.id, ramp));
        match error {
            Some(SystemError::FeatureUnavailable) => Ok(()),
            other => map_gamma_error(other),
        }
    }

    /// Generates and applies a gamma ramp from an exponent.
    pub fn set_gamma(&self, gamma: f32) -> Result<()> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(Error::InvalidNumericValue);
        }
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| s.set_gamma(self.id, gamma));
        map_gamma_error(error)
    }

    /// Computes the ramp an exponent would produce, without leaving it
    /// applied.
    ///
    /// The backend owns the exponent-to-ramp curve, so the only way to
    /// obtain it is to apply the exponent and read the result back. The
    /// sequence is snapshot, apply, read, restore. The restore runs even
    /// when the middle steps failed; a restore failure takes precedence
    /// over theirs, since it leaves the display altered.
    pub fn derive_gamma_ramp(&self, gamma: f32) -> Result<GammaRamp> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(Error::InvalidNumericValue);
        }
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;

        let (snapshot, error) = checked(shared.system.as_mut(), |s| s.gamma_ramp(self.id));
        let snapshot = match (snapshot, error) {
            (Some(snapshot), None) => snapshot,
            (_, Some(SystemError::FeatureUnavailable)) => return Err(Error::FeatureNotSupported),
            (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
            _ => return Err(Error::Unknown),
        };

        let ((), apply_error) = checked(shared.system.as_mut(), |s| s.set_gamma(self.id, gamma));
        let derived = if apply_error.is_none() {
            let (derived, read_error) = checked(shared.system.as_mut(), |s| s.gamma_ramp(self.id));
            match (derived, read_error) {
                (Some(derived), None) => Ok(derived),
                (_, Some(SystemError::PlatformError)) => Err(Error::Platform),
                _ => Err(Error::Unknown),
            }
        } else {
            Err(match apply_error {
                Some(SystemError::InvalidValue) => Error::InvalidNumericValue,
                Some(SystemError::FeatureUnavailable) => Error::FeatureNotSupported,
                Some(SystemError::PlatformError) => Error::Platform,
                _ => Error::Unknown,
            })
        };

        let ((), restore_error) =
            checked(shared.system.as_mut(), |s| s.set_gamma_ramp(self.id, &snapshot));
        match map_gamma_error(restore_error) {
            Ok(()) => derived,
            Err(restore_error) => Err(restore_error),
        }
    }

    /// The monitor's user pointer slot.
    pub fn user_pointer(&self) -> Result<usize> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let (value, error) = checked(shared.system.as_mut(), |s| {
            s.monitor_user_pointer(self.id)
        });
        crate::error::strict(error)?;
        Ok(value)
    }

    /// Sets the monitor's user pointer slot.
    pub fn set_user_pointer(&self, value: usize) -> Result<()> {
        let mut shared = self.shared.borrow_mut();
        shared.ensure_live()?;
        let ((), error) = checked(shared.system.as_mut(), |s| {
            s.set_monitor_user_pointer(self.id, value)
        });
        crate::error::strict(error)
    }
}

fn map_gamma_error(error: Option<SystemError>) -> Result<()> {
    match error {
        None => Ok(()),
        Some(SystemError::InvalidValue) => Err(Error::InvalidNumericValue),
        Some(SystemError::FeatureUnavailable) => Err(Error::FeatureNotSupported),
        Some(SystemError::PlatformError) => Err(Error::Platform),
        Some(_) => Err(Error::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Instance, InstanceCreateInfo};
    use crate::system::null::{Capabilities, NullSystem};
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
    fn test_properties_report_seeded_monitor() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let monitor = instance.primary_monitor().unwrap();
        let properties = monitor.properties().unwrap();
        assert_eq!(properties.name, "Null Display");
        assert!(properties.physical_size.width > 0);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_gamma_ramp_read_is_benign_without_gamma_access() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities::wayland_like());
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        assert_eq!(monitor.gamma_ramp().unwrap(), None);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_set_gamma_ramp_is_benign_without_gamma_access() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities::wayland_like());
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        // Ramp writes are accepted and discarded; exponent application
        // stays a hard failure.
        assert_eq!(monitor.set_gamma_ramp(&GammaRamp::linear(256)), Ok(()));
        assert_eq!(monitor.set_gamma(2.2), Err(Error::FeatureNotSupported));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_set_gamma_rejects_bad_exponent_before_backend() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        assert_eq!(monitor.set_gamma(0.0), Err(Error::InvalidNumericValue));
        assert_eq!(monitor.set_gamma(-2.2), Err(Error::InvalidNumericValue));
        assert_eq!(monitor.set_gamma(f32::NAN), Err(Error::InvalidNumericValue));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_derive_gamma_ramp_restores_original() {
        let _guard = test_support::lock();
        let system = NullSystem::new();
        let instance = null_instance(system.clone());
        let monitor = instance.primary_monitor().unwrap();

        let before = monitor.gamma_ramp().unwrap().unwrap();
        let derived = monitor.derive_gamma_ramp(2.2).unwrap();
        let after = monitor.gamma_ramp().unwrap().unwrap();

        assert_eq!(before, after);
        assert_ne!(derived, before);
        // A 2.2 exponent brightens midtones relative to linear.
        let mid = derived.red.len() / 2;
        assert!(derived.red[mid] > before.red[mid]);
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_derive_gamma_ramp_without_gamma_access_fails() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities::wayland_like());
        let instance = null_instance(system);
        let monitor = instance.primary_monitor().unwrap();
        assert_eq!(
            monitor.derive_gamma_ramp(2.2),
            Err(Error::FeatureNotSupported)
        );
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_mismatched_ramp_channels_rejected() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let monitor = instance.primary_monitor().unwrap();
        let mut ramp = GammaRamp::linear(16);
        ramp.blue.pop();
        assert_eq!(
            monitor.set_gamma_ramp(&ramp),
            Err(Error::InvalidNumericValue)
        );
        instance.destroy(None).unwrap();
    }
}
