//! Cursor objects: standard shapes and custom images.

use std::rc::Rc;

use bitflags::bitflags;

use crate::error::{checked, platform_or_unknown, Error, Result};
use crate::instance::{validate_allocator, AllocationCallbacks, Instance, SharedSystem};
use crate::system::{CursorId, SystemError};
use crate::types::{ExtensionChain, ImageData, Offset2D, StructureType};

/// Cursor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorShape {
    /// The default arrow.
    #[default]
    Arrow,
    /// Text input I-beam.
    IBeam,
    /// Crosshair.
    Crosshair,
    /// Pointing hand.
    PointingHand,
    /// Horizontal resize arrows.
    ResizeEw,
    /// Vertical resize arrows.
    ResizeNs,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNwse,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNesw,
    /// Omnidirectional resize.
    ResizeAll,
    /// Operation-not-allowed.
    NotAllowed,
    /// A caller-supplied image; requires
    /// [`CursorCreateInfo::image`].
    Custom,
}

bitflags! {
    /// Cursor creation flags. Reserved; no flags are defined yet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CursorCreateFlags: u32 {}
}

/// Parameters of cursor creation.
#[derive(Default)]
pub struct CursorCreateInfo {
    /// Must be [`StructureType::CursorCreateInfo`].
    pub s_type: Option<StructureType>,
    /// Extension chain; must be `None`.
    pub next: Option<ExtensionChain>,
    /// Reserved flags.
    pub flags: CursorCreateFlags,
    /// The shape to create.
    pub shape: CursorShape,
    /// Pixel data for [`CursorShape::Custom`].
    pub image: Option<ImageData>,
    /// Hotspot within the image, for [`CursorShape::Custom`].
    pub hotspot: Offset2D,
}

/// A cursor object, usable on any window of the same instance.
pub struct Cursor {
    shared: SharedSystem,
    id: CursorId,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor").field("id", &self.id).finish()
    }
}

impl Cursor {
    /// Creates a cursor.
    ///
    /// The allocator must match the instance's; a different one is
    /// rejected before any backend call.
    pub fn create(
        instance: &Instance,
        create_info: &CursorCreateInfo,
        allocator: Option<&AllocationCallbacks>,
    ) -> Result<Self> {
        match create_info.s_type {
            None | Some(StructureType::CursorCreateInfo) => {}
            Some(_) => return Err(Error::InvalidEnumValue),
        }
        if create_info.next.is_some() {
            return Err(Error::FeatureNotSupported);
        }
        validate_allocator(allocator)?;

        let mut shared = instance.shared.borrow_mut();
        shared.ensure_live()?;
        if !shared.allocator_matches(allocator) {
            return Err(Error::FeatureNotSupported);
        }

        let id = if create_info.shape == CursorShape::Custom {
            let image = create_info.image.as_ref().ok_or(Error::InvalidPointer)?;
            let (id, error) = checked(shared.system.as_mut(), |s| {
                s.create_custom_cursor(image, create_info.hotspot)
            });
            match (id, error) {
                (Some(id), None) => id,
                (_, Some(SystemError::InvalidValue)) => return Err(Error::InvalidNumericValue),
                (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
                _ => return Err(Error::Unknown),
            }
        } else {
            let (id, error) = checked(shared.system.as_mut(), |s| {
                s.create_standard_cursor(create_info.shape)
            });
            match (id, error) {
                (Some(id), None) => id,
                (_, Some(SystemError::CursorUnavailable)) => {
                    return Err(Error::CursorShapeNotSupported)
                }
                (_, Some(SystemError::InvalidEnum)) => return Err(Error::InvalidEnumValue),
                (_, Some(SystemError::PlatformError)) => return Err(Error::Platform),
                _ => return Err(Error::Unknown),
            }
        };
        drop(shared);
        Ok(Self {
            shared: Rc::clone(&instance.shared),
            id,
        })
    }

    /// The backend id of this cursor.
    pub fn id(&self) -> CursorId {
        self.id
    }

    /// Destroys the cursor.
    ///
    /// A mismatched allocator returns the cursor untouched alongside
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
            let ((), error) = checked(shared.system.as_mut(), |s| s.destroy_cursor(self.id));
            platform_or_unknown(error)
        };
        result.map_err(|error| (error, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::InstanceCreateInfo;
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
    fn test_standard_cursor_lifecycle() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let cursor = Cursor::create(
            &instance,
            &CursorCreateInfo {
                shape: CursorShape::IBeam,
                ..CursorCreateInfo::default()
            },
            None,
        )
        .unwrap();
        cursor.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_missing_shape_maps_to_shape_not_supported() {
        let _guard = test_support::lock();
        let system = NullSystem::with_capabilities(Capabilities {
            missing_cursor_shapes: vec![CursorShape::ResizeAll],
            ..Capabilities::default()
        });
        let instance = null_instance(system);
        let result = Cursor::create(
            &instance,
            &CursorCreateInfo {
                shape: CursorShape::ResizeAll,
                ..CursorCreateInfo::default()
            },
            None,
        );
        assert!(matches!(result, Err(Error::CursorShapeNotSupported)));
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_custom_cursor_requires_image() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let result = Cursor::create(
            &instance,
            &CursorCreateInfo {
                shape: CursorShape::Custom,
                ..CursorCreateInfo::default()
            },
            None,
        );
        assert!(matches!(result, Err(Error::InvalidPointer)));

        let cursor = Cursor::create(
            &instance,
            &CursorCreateInfo {
                shape: CursorShape::Custom,
                image: Some(ImageData {
                    width: 8,
                    height: 8,
                    pixels: vec![0; 8 * 8 * 4],
                }),
                hotspot: Offset2D { x: 0, y: 0 },
                ..CursorCreateInfo::default()
            },
            None,
        )
        .unwrap();
        cursor.destroy(None).unwrap();
        instance.destroy(None).unwrap();
    }

    #[test]
    fn test_bad_hotspot_maps_to_invalid_numeric_value() {
        let _guard = test_support::lock();
        let instance = null_instance(NullSystem::new());
        let result = Cursor::create(
            &instance,
            &CursorCreateInfo {
                shape: CursorShape::Custom,
                image: Some(ImageData {
                    width: 8,
                    height: 8,
                    pixels: vec![0; 8 * 8 * 4],
                }),
                hotspot: Offset2D { x: 9, y: 0 },
                ..CursorCreateInfo::default()
            },
            None,
        );
        assert!(matches!(result, Err(Error::InvalidNumericValue)));
        instance.destroy(None).unwrap();
    }
}
