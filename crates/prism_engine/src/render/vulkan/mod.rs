//! Vulkan render backend
//!
//! Ownership follows the construction order Instance > LogicalDevice >
//! Swapchain > Pipeline; destruction runs in exact reverse, and the device is
//! waited idle before any destructive teardown. Every wrapper releases its
//! handles in `Drop`, conditionally, so partially constructed state tears
//! down cleanly.

pub mod device;
pub mod instance;
pub mod model;
pub mod pipeline;
pub mod renderer;
pub mod swapchain;

pub use device::{LogicalDevice, PhysicalDeviceInfo, PhysicalDeviceSelector, QueueFamilyIndices};
pub use instance::GraphicsContext;
pub use model::{Model, Vertex};
pub use pipeline::{Pipeline, PipelineConfig};
pub use renderer::VulkanRenderer;
pub use swapchain::Swapchain;

use ash::vk;
use thiserror::Error;

/// Number of frames the CPU may record ahead of the GPU.
///
/// Each in-flight frame owns one ring slot of synchronization primitives
/// (image-available semaphore, render-finished semaphore, in-flight fence).
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

/// Vulkan backend errors
///
/// Construction failures are fatal by policy: the application shell cannot
/// retry backend bring-up with different parameters, so these propagate up to
/// a logged termination. Per-frame transient codes (out-of-date, suboptimal)
/// never appear here; the frame scheduler inspects them as raw `vk::Result`
/// values.
#[derive(Error, Debug)]
pub enum VulkanError {
    /// A Vulkan entry point returned an error code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// A required layer, extension, device or capability is missing
    #[error("{0}")]
    InitializationFailed(String),

    /// No memory type satisfies the requested filter and property flags
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// No format in the candidate list supports the requested features
    #[error("No supported format in candidate list")]
    NoSupportedFormat,

    /// Shader or other asset could not be loaded
    #[error(transparent)]
    Asset(#[from] crate::assets::AssetError),

    /// Windowing layer failure during surface setup
    #[error(transparent)]
    Window(#[from] crate::window::WindowError),
}

/// Result type for Vulkan backend operations
pub type VulkanResult<T> = Result<T, VulkanError>;
