//! Opaque Vulkan interop handles.
//!
//! The layer brokers surface creation and presentation-support queries
//! between its own window handles and a Vulkan implementation, but never
//! interprets the Vulkan side: handles and result codes pass through as
//! opaque values, untranslated.

/// Opaque `VkInstance` handle supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct VkInstance(pub u64);

/// Opaque `VkPhysicalDevice` handle supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct VkPhysicalDevice(pub u64);

/// Opaque `VkSurfaceKHR` handle produced by surface creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct VkSurfaceKhr(pub u64);

impl VkSurfaceKhr {
    /// The null surface handle.
    pub const NULL: Self = Self(0);
}

/// A raw `VkResult` code, passed through without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct VkResult(pub i32);

impl VkResult {
    /// `VK_SUCCESS`.
    pub const SUCCESS: Self = Self(0);
    /// `VK_ERROR_INITIALIZATION_FAILED`.
    pub const ERROR_INITIALIZATION_FAILED: Self = Self(-3);
    /// `VK_ERROR_EXTENSION_NOT_PRESENT`.
    pub const ERROR_EXTENSION_NOT_PRESENT: Self = Self(-7);

    /// Whether this code means success.
    pub fn is_success(self) -> bool {
        self.0 == 0
    }
}

/// A raw `VkBool32`, passed through without the tri-state check applied to
/// this layer's own booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct VkBool32(pub u32);

impl VkBool32 {
    /// `VK_FALSE`.
    pub const FALSE: Self = Self(0);
    /// `VK_TRUE`.
    pub const TRUE: Self = Self(1);
}

/// An opaque function address returned by the Vulkan loader.
///
/// Zero means the symbol was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ProcAddr(pub usize);

impl ProcAddr {
    /// Whether the loader resolved the symbol.
    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}
