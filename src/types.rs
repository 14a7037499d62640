//! Shared value types: geometry, video modes, gamma ramps and the
//! tri-state-checked boolean.

use crate::error::{Error, Result};

/// Layer major version.
pub const VERSION_MAJOR: u32 = 1;
/// Layer minor version.
pub const VERSION_MINOR: u32 = 0;
/// Layer revision version.
pub const VERSION_REVISION: u32 = 0;

/// Sentinel for "no preference" or "not reportable on this platform".
pub const DONT_CARE: i32 = -1;

/// A 32-bit boolean that must be exactly 0 or 1 at validated boundaries.
///
/// Any other bit pattern is rejected with [`Error::InvalidEnumValue`] when
/// the value reaches an enum-validated boundary, keeping the wire
/// representation forward-compatible without admitting garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bool32(pub u32);

impl Bool32 {
    /// The false value (0).
    pub const FALSE: Self = Self(0);
    /// The true value (1).
    pub const TRUE: Self = Self(1);

    /// Validates the tri-state contract and converts to `bool`.
    pub fn as_bool(self) -> Result<bool> {
        match self.0 {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidEnumValue),
        }
    }
}

impl From<bool> for Bool32 {
    fn from(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

/// Type tag carried by every create-info struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    /// Tags [`InstanceCreateInfo`](crate::instance::InstanceCreateInfo).
    InstanceCreateInfo,
    /// Tags [`WindowCreateInfo`](crate::window::WindowCreateInfo).
    WindowCreateInfo,
    /// Tags [`CursorCreateInfo`](crate::cursor::CursorCreateInfo).
    CursorCreateInfo,
}

/// Extension-chain slot of a create-info struct.
///
/// Must presently be `None`; a populated chain is rejected with
/// [`Error::FeatureNotSupported`], reserving the field for future use.
pub type ExtensionChain = Box<dyn std::any::Any>;

/// A width/height pair in screen coordinates.
///
/// Signed because the wrapped library reports sizes as signed integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// Width in screen coordinates.
    pub width: i32,
    /// Height in screen coordinates.
    pub height: i32,
}

/// An x/y pair in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset2D {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

/// A rectangle: offset plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect2D {
    /// Top-left corner.
    pub offset: Offset2D,
    /// Width and height.
    pub extent: Extent2D,
}

/// A sub-pixel position, used for cursor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// Per-axis content scale of a monitor or window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentScale {
    /// Horizontal scale factor.
    pub x_scale: f32,
    /// Vertical scale factor.
    pub y_scale: f32,
}

/// Decoration extents around a window's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameExtents {
    /// Size of the left frame edge.
    pub left: i32,
    /// Size of the top frame edge (title bar included).
    pub top: i32,
    /// Size of the right frame edge.
    pub right: i32,
    /// Size of the bottom frame edge.
    pub bottom: i32,
}

impl FrameExtents {
    /// All four edges set to [`DONT_CARE`], for platforms that cannot
    /// report decoration extents.
    pub const UNREPORTABLE: Self = Self {
        left: DONT_CARE,
        top: DONT_CARE,
        right: DONT_CARE,
        bottom: DONT_CARE,
    };
}

/// A display configuration: resolution, channel depths and refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoMode {
    /// Width in screen coordinates.
    pub width: i32,
    /// Height in screen coordinates.
    pub height: i32,
    /// Red channel bit depth.
    pub red_bits: i32,
    /// Green channel bit depth.
    pub green_bits: i32,
    /// Blue channel bit depth.
    pub blue_bits: i32,
    /// Refresh rate in Hz.
    pub refresh_rate: i32,
}

impl Default for VideoMode {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            refresh_rate: DONT_CARE,
        }
    }
}

/// A per-channel lookup table remapping displayed color intensities.
///
/// The three channel arrays always have equal length. Ownership follows the
/// producer: queries return a copy owned by the caller, sets borrow the
/// caller's ramp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaRamp {
    /// Red channel response table.
    pub red: Vec<u16>,
    /// Green channel response table.
    pub green: Vec<u16>,
    /// Blue channel response table.
    pub blue: Vec<u16>,
}

impl GammaRamp {
    /// A linear (identity) ramp of the given size.
    pub fn linear(size: usize) -> Self {
        let channel: Vec<u16> = (0..size)
            .map(|i| {
                if size <= 1 {
                    0
                } else {
                    ((i as u64 * u64::from(u16::MAX)) / (size as u64 - 1)) as u16
                }
            })
            .collect();
        Self {
            red: channel.clone(),
            green: channel.clone(),
            blue: channel,
        }
    }

    /// Number of entries per channel.
    pub fn size(&self) -> usize {
        self.red.len()
    }
}

/// Pixel data for window icons and custom cursors.
///
/// Pixels are 8-bit RGBA, arranged left-to-right, top-to-bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// RGBA pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool32_tri_state_check() {
        assert_eq!(Bool32::FALSE.as_bool(), Ok(false));
        assert_eq!(Bool32::TRUE.as_bool(), Ok(true));
        assert_eq!(Bool32(2).as_bool(), Err(Error::InvalidEnumValue));
        assert_eq!(Bool32(u32::MAX).as_bool(), Err(Error::InvalidEnumValue));
    }

    #[test]
    fn test_linear_ramp_endpoints() {
        let ramp = GammaRamp::linear(256);
        assert_eq!(ramp.size(), 256);
        assert_eq!(ramp.red[0], 0);
        assert_eq!(ramp.red[255], u16::MAX);
        assert_eq!(ramp.red, ramp.blue);
    }
}
