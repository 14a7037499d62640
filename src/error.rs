//! Result codes and the backend error translation protocol.
//!
//! The wrapped window system signals failure out-of-band: a call returns a
//! sentinel value (or nothing at all) and leaves an error code queryable
//! afterwards. Every public operation of this layer pulls that error state
//! after each backend call and maps it through a per-call-site table into
//! [`Error`]. The tables live at the call sites because the same backend
//! code can be benign in one context and fatal in another; this module only
//! provides the pairing helper and the two mappings that recur everywhere.

use thiserror::Error as ThisError;

use crate::system::{SystemError, WindowSystem};

/// Result alias used by every fallible operation in the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure kinds reported by this layer.
///
/// Each variant carries a stable negative code (see [`Error::code`]) so the
/// taxonomy can cross an ABI boundary unchanged; `0` is reserved for
/// success and never appears here.
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// A backend condition this layer has no mapping for. Unmapped codes
    /// are never passed through as success.
    #[error("unknown error")]
    Unknown,
    /// The instance is not (or no longer) initialized.
    #[error("initialization failed or instance not live")]
    InitializationFailed,
    /// An enumeration value outside its valid set, including a [`Bool32`]
    /// that is neither 0 nor 1.
    ///
    /// [`Bool32`]: crate::types::Bool32
    #[error("invalid enum value")]
    InvalidEnumValue,
    /// A numeric argument outside its valid range.
    #[error("invalid numeric value")]
    InvalidNumericValue,
    /// A required value was absent or an allocator did not match the one
    /// the instance was created with.
    #[error("invalid pointer value")]
    InvalidPointer,
    /// A handle that does not refer to a live object.
    #[error("invalid handle")]
    InvalidHandle,
    /// Allocation failure.
    #[error("out of memory")]
    OutOfMemory,
    /// The graphics API (or its loader) is unavailable.
    #[error("api unavailable")]
    ApiUnavailable,
    /// A platform-specific error in the underlying window system.
    #[error("platform error")]
    Platform,
    /// The requested pixel format is not supported.
    #[error("pixel format not supported")]
    PixelFormatNotSupported,
    /// The requested standard cursor shape is not available.
    #[error("cursor shape not supported")]
    CursorShapeNotSupported,
    /// The platform cannot provide the requested feature.
    #[error("feature not supported")]
    FeatureNotSupported,
    /// No suitable platform could be selected.
    #[error("platform unavailable")]
    PlatformUnavailable,
    /// The queried result is not available (e.g. empty clipboard).
    #[error("result not available")]
    ResultNotAvailable,
}

impl Error {
    /// The stable signed code for this failure. Zero means success and is
    /// never returned here.
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => -1,
            Self::InitializationFailed => -2,
            Self::InvalidEnumValue => -3,
            Self::InvalidNumericValue => -4,
            Self::InvalidPointer => -5,
            Self::InvalidHandle => -6,
            Self::OutOfMemory => -7,
            Self::ApiUnavailable => -8,
            Self::Platform => -9,
            Self::PixelFormatNotSupported => -10,
            Self::CursorShapeNotSupported => -11,
            Self::FeatureNotSupported => -12,
            Self::PlatformUnavailable => -13,
            Self::ResultNotAvailable => -14,
        }
    }
}

/// Pairs a backend call with the mandatory error query that follows it.
///
/// Returns the call's value together with the drained error state, so call
/// sites cannot forget the query half of the protocol.
pub(crate) fn checked<T>(
    system: &mut dyn WindowSystem,
    call: impl FnOnce(&mut dyn WindowSystem) -> T,
) -> (T, Option<SystemError>) {
    let value = call(system);
    let error = system.take_error();
    (value, error)
}

/// Call-site table for operations where any backend failure is unexpected:
/// everything maps to [`Error::Unknown`].
pub(crate) fn strict(error: Option<SystemError>) -> Result<()> {
    match error {
        None => Ok(()),
        Some(_) => Err(Error::Unknown),
    }
}

/// Call-site table for operations that may legitimately fail inside the
/// platform layer; anything else is unmapped.
pub(crate) fn platform_or_unknown(error: Option<SystemError>) -> Result<()> {
    match error {
        None => Ok(()),
        Some(SystemError::PlatformError) => Err(Error::Platform),
        Some(_) => Err(Error::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_negative_and_distinct() {
        let all = [
            Error::Unknown,
            Error::InitializationFailed,
            Error::InvalidEnumValue,
            Error::InvalidNumericValue,
            Error::InvalidPointer,
            Error::InvalidHandle,
            Error::OutOfMemory,
            Error::ApiUnavailable,
            Error::Platform,
            Error::PixelFormatNotSupported,
            Error::CursorShapeNotSupported,
            Error::FeatureNotSupported,
            Error::PlatformUnavailable,
            Error::ResultNotAvailable,
        ];
        let mut seen = std::collections::HashSet::new();
        for error in all {
            assert!(error.code() < 0);
            assert!(seen.insert(error.code()), "duplicate code {}", error.code());
        }
    }

    #[test]
    fn test_strict_maps_everything_to_unknown() {
        assert_eq!(strict(None), Ok(()));
        assert_eq!(strict(Some(SystemError::PlatformError)), Err(Error::Unknown));
        assert_eq!(
            strict(Some(SystemError::FeatureUnavailable)),
            Err(Error::Unknown)
        );
    }

    #[test]
    fn test_platform_table_distinguishes_platform_errors() {
        assert_eq!(platform_or_unknown(None), Ok(()));
        assert_eq!(
            platform_or_unknown(Some(SystemError::PlatformError)),
            Err(Error::Platform)
        );
        assert_eq!(
            platform_or_unknown(Some(SystemError::InvalidValue)),
            Err(Error::Unknown)
        );
    }
}
