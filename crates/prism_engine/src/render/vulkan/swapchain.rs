//! Swapchain lifecycle and per-frame presentation synchronization
//!
//! The swapchain owns the presentable image chain and everything whose
//! lifetime is tied to it: image views, depth buffers, the render pass,
//! framebuffers, per-image command buffers and the frame-in-flight
//! synchronization primitives. Recreation transfers the old swapchain handle
//! into the new chain so the driver can reuse resources, then discards the
//! old wrapper.
//!
//! All handle destruction is conditional on the handle having been created,
//! so a partially constructed chain tears down cleanly.

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::vk;

use super::{GraphicsContext, LogicalDevice, VulkanError, VulkanResult, MAX_FRAMES_IN_FLIGHT};
use crate::window::Window;

/// Depth formats in preference order: pure 32-bit depth first, then the
/// combined depth+stencil variants.
const DEPTH_FORMAT_CANDIDATES: [vk::Format; 3] = [
    vk::Format::D32_SFLOAT,
    vk::Format::D32_SFLOAT_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
];

/// Pick the surface format.
///
/// Preference order: 8-bit sRGB format with sRGB color space, then the 8-bit
/// linear format with sRGB color space, then the first listed format.
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    for preferred in [
        (vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        (vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ] {
        if let Some(format) = formats
            .iter()
            .find(|f| f.format == preferred.0 && f.color_space == preferred.1)
        {
            return *format;
        }
    }
    formats.first().copied().unwrap_or_default()
}

/// Pick the presentation mode.
///
/// Mailbox (lowest-latency triple buffering) wins when available; immediate
/// is honored only when enabled by configuration; FIFO is the guaranteed
/// fallback.
pub fn choose_present_mode(
    modes: &[vk::PresentModeKHR],
    allow_immediate: bool,
) -> vk::PresentModeKHR {
    if modes.contains(&vk::PresentModeKHR::MAILBOX) {
        return vk::PresentModeKHR::MAILBOX;
    }
    if allow_immediate && modes.contains(&vk::PresentModeKHR::IMMEDIATE) {
        return vk::PresentModeKHR::IMMEDIATE;
    }
    vk::PresentModeKHR::FIFO
}

/// Derive the swapchain extent.
///
/// When the surface reports a fixed current extent, use it unmodified.
/// Otherwise (high-DPI platforms where window size != pixel size) derive the
/// extent from the framebuffer pixel size, clamped into the surface bounds.
pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    framebuffer_size: (u32, u32),
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }

    vk::Extent2D {
        width: framebuffer_size.0.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: framebuffer_size.1.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// One image above the minimum, capped by the maximum when the surface
/// reports one (0 means unbounded).
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let max = if capabilities.max_image_count > 0 {
        capabilities.max_image_count
    } else {
        u32::MAX
    };
    (capabilities.min_image_count + 1).min(max)
}

/// The presentable image chain with all of its per-image and per-frame
/// resources.
///
/// Invariant: image, view, depth, framebuffer and command buffer counts are
/// always equal.
pub struct Swapchain {
    device: ash::Device,
    swapchain_loader: SwapchainLoader,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    command_pool: vk::CommandPool,

    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    depth_images: Vec<vk::Image>,
    depth_memories: Vec<vk::DeviceMemory>,
    depth_views: Vec<vk::ImageView>,
    render_pass: vk::RenderPass,
    framebuffers: Vec<vk::Framebuffer>,
    command_buffers: Vec<vk::CommandBuffer>,

    image_available: Vec<vk::Semaphore>,
    render_finished: Vec<vk::Semaphore>,
    in_flight: Vec<vk::Fence>,
    images_in_flight: Vec<vk::Fence>,
    current_frame: usize,

    surface_format: vk::SurfaceFormatKHR,
    depth_format: vk::Format,
    extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a fresh swapchain for the window.
    pub fn new(
        context: &GraphicsContext,
        device: &LogicalDevice,
        window: &Window,
        allow_immediate: bool,
    ) -> VulkanResult<Self> {
        Self::create(context, device, window, allow_immediate, vk::SwapchainKHR::null())
    }

    /// Recreate the chain, transferring ownership of the previous one.
    ///
    /// The previous swapchain's handle is passed to the driver as the
    /// `old_swapchain` hint and the previous wrapper is discarded immediately
    /// after the new chain exists; it is never used again. The caller must
    /// have waited the device idle.
    pub fn recreate(
        previous: Swapchain,
        context: &GraphicsContext,
        device: &LogicalDevice,
        window: &Window,
        allow_immediate: bool,
    ) -> VulkanResult<Self> {
        let next = Self::create(context, device, window, allow_immediate, previous.swapchain)?;
        drop(previous);
        Ok(next)
    }

    fn create(
        context: &GraphicsContext,
        device: &LogicalDevice,
        window: &Window,
        allow_immediate: bool,
        old_swapchain: vk::SwapchainKHR,
    ) -> VulkanResult<Self> {
        log::trace!("Creating swapchain objects...");

        // Start from a fully-null chain so any failure below tears down the
        // parts that were already created.
        let mut chain = Self {
            device: device.device().clone(),
            swapchain_loader: device.swapchain_loader().clone(),
            graphics_queue: device.graphics_queue(),
            present_queue: device.present_queue(),
            command_pool: device.command_pool(),
            swapchain: vk::SwapchainKHR::null(),
            images: Vec::new(),
            image_views: Vec::new(),
            depth_images: Vec::new(),
            depth_memories: Vec::new(),
            depth_views: Vec::new(),
            render_pass: vk::RenderPass::null(),
            framebuffers: Vec::new(),
            command_buffers: Vec::new(),
            image_available: Vec::new(),
            render_finished: Vec::new(),
            in_flight: Vec::new(),
            images_in_flight: Vec::new(),
            current_frame: 0,
            surface_format: vk::SurfaceFormatKHR::default(),
            depth_format: vk::Format::UNDEFINED,
            extent: vk::Extent2D::default(),
        };

        chain.create_swapchain(context, device, window, allow_immediate, old_swapchain)?;
        chain.create_image_views()?;
        chain.create_depth_resources(device)?;
        chain.create_render_pass()?;
        chain.create_framebuffers()?;
        chain.create_command_buffers()?;
        chain.create_sync_objects()?;

        log::debug!(
            "Swapchain created: {} images, {}x{}, format {:?}",
            chain.images.len(),
            chain.extent.width,
            chain.extent.height,
            chain.surface_format.format
        );
        Ok(chain)
    }

    fn create_swapchain(
        &mut self,
        context: &GraphicsContext,
        device: &LogicalDevice,
        window: &Window,
        allow_immediate: bool,
        old_swapchain: vk::SwapchainKHR,
    ) -> VulkanResult<()> {
        let surface = context.surface();
        let surface_loader = context.surface_loader();
        let physical = device.physical_device();

        let capabilities = unsafe {
            surface_loader
                .get_physical_device_surface_capabilities(physical, surface)
                .map_err(VulkanError::Api)?
        };
        let formats = unsafe {
            surface_loader
                .get_physical_device_surface_formats(physical, surface)
                .map_err(VulkanError::Api)?
        };
        let present_modes = unsafe {
            surface_loader
                .get_physical_device_surface_present_modes(physical, surface)
                .map_err(VulkanError::Api)?
        };

        self.surface_format = choose_surface_format(&formats);
        let present_mode = choose_present_mode(&present_modes, allow_immediate);
        log::debug!("Chosen present mode: {present_mode:?}");
        self.extent = choose_extent(&capabilities, window.get_framebuffer_size());

        let queue_family_indices = [device.graphics_family(), device.present_family()];
        let mut create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(choose_image_count(&capabilities))
            .image_format(self.surface_format.format)
            .image_color_space(self.surface_format.color_space)
            .image_extent(self.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .pre_transform(capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain);

        // The chain is written by the graphics queue and read by the present
        // queue; concurrent sharing is only needed when those differ.
        if device.graphics_family() != device.present_family() {
            create_info = create_info
                .image_sharing_mode(vk::SharingMode::CONCURRENT)
                .queue_family_indices(&queue_family_indices);
        } else {
            create_info = create_info.image_sharing_mode(vk::SharingMode::EXCLUSIVE);
        }

        log::trace!("Creating swapchain...");
        self.swapchain = unsafe {
            self.swapchain_loader
                .create_swapchain(&create_info, None)
                .map_err(|err| {
                    log::error!("Failed to create swapchain!");
                    VulkanError::Api(err)
                })?
        };
        self.images = unsafe {
            self.swapchain_loader
                .get_swapchain_images(self.swapchain)
                .map_err(VulkanError::Api)?
        };

        Ok(())
    }

    fn create_image_views(&mut self) -> VulkanResult<()> {
        for (index, &image) in self.images.iter().enumerate() {
            let view_info = vk::ImageViewCreateInfo::builder()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(self.surface_format.format)
                .components(vk::ComponentMapping {
                    r: vk::ComponentSwizzle::IDENTITY,
                    g: vk::ComponentSwizzle::IDENTITY,
                    b: vk::ComponentSwizzle::IDENTITY,
                    a: vk::ComponentSwizzle::IDENTITY,
                })
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                });

            log::trace!("Creating image view for frame #{index}...");
            let view = unsafe {
                self.device
                    .create_image_view(&view_info, None)
                    .map_err(|err| {
                        log::error!("Failed to create image view!");
                        VulkanError::Api(err)
                    })?
            };
            self.image_views.push(view);
        }
        Ok(())
    }

    fn create_depth_resources(&mut self, device: &LogicalDevice) -> VulkanResult<()> {
        self.depth_format = device.find_supported_format(
            &DEPTH_FORMAT_CANDIDATES,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
        )?;

        for index in 0..self.images.len() {
            let image_info = vk::ImageCreateInfo::builder()
                .image_type(vk::ImageType::TYPE_2D)
                .extent(vk::Extent3D {
                    width: self.extent.width,
                    height: self.extent.height,
                    depth: 1,
                })
                .mip_levels(1)
                .array_layers(1)
                .format(self.depth_format)
                .tiling(vk::ImageTiling::OPTIMAL)
                .initial_layout(vk::ImageLayout::UNDEFINED)
                .usage(vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT)
                .samples(vk::SampleCountFlags::TYPE_1)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let (image, memory) = device
                .create_image_with_memory(&image_info, vk::MemoryPropertyFlags::DEVICE_LOCAL)?;
            self.depth_images.push(image);
            self.depth_memories.push(memory);

            let view_info = vk::ImageViewCreateInfo::builder()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(self.depth_format)
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::DEPTH,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                });

            log::trace!("Creating depth view for frame #{index}...");
            let view = unsafe {
                self.device
                    .create_image_view(&view_info, None)
                    .map_err(|err| {
                        log::error!("Failed to create depth view!");
                        VulkanError::Api(err)
                    })?
            };
            self.depth_views.push(view);
        }
        Ok(())
    }

    fn create_render_pass(&mut self) -> VulkanResult<()> {
        let color_attachment = vk::AttachmentDescription::builder()
            .format(self.surface_format.format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::STORE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::PRESENT_SRC_KHR)
            .build();
        let depth_attachment = vk::AttachmentDescription::builder()
            .format(self.depth_format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(vk::AttachmentLoadOp::CLEAR)
            .store_op(vk::AttachmentStoreOp::DONT_CARE)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
            .build();

        let color_ref = vk::AttachmentReference {
            attachment: 0,
            layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        };
        let depth_ref = vk::AttachmentReference {
            attachment: 1,
            layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        };

        let color_refs = [color_ref];
        let subpass = vk::SubpassDescription::builder()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs)
            .depth_stencil_attachment(&depth_ref)
            .build();

        // External dependency guarding the attachment writes of the subpass.
        let dependency = vk::SubpassDependency::builder()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                    | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
            )
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                    | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
            )
            .dst_access_mask(
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                    | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            )
            .build();

        let attachments = [color_attachment, depth_attachment];
        let subpasses = [subpass];
        let dependencies = [dependency];
        let render_pass_info = vk::RenderPassCreateInfo::builder()
            .attachments(&attachments)
            .subpasses(&subpasses)
            .dependencies(&dependencies);

        log::trace!("Creating render pass...");
        self.render_pass = unsafe {
            self.device
                .create_render_pass(&render_pass_info, None)
                .map_err(|err| {
                    log::error!("Failed to create render pass!");
                    VulkanError::Api(err)
                })?
        };
        Ok(())
    }

    fn create_framebuffers(&mut self) -> VulkanResult<()> {
        for index in 0..self.images.len() {
            let attachments = [self.image_views[index], self.depth_views[index]];
            let framebuffer_info = vk::FramebufferCreateInfo::builder()
                .render_pass(self.render_pass)
                .attachments(&attachments)
                .width(self.extent.width)
                .height(self.extent.height)
                .layers(1);

            log::trace!("Creating framebuffer for frame #{index}...");
            let framebuffer = unsafe {
                self.device
                    .create_framebuffer(&framebuffer_info, None)
                    .map_err(|err| {
                        log::error!("Failed to create framebuffer!");
                        VulkanError::Api(err)
                    })?
            };
            self.framebuffers.push(framebuffer);
        }
        Ok(())
    }

    fn create_command_buffers(&mut self) -> VulkanResult<()> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(self.images.len() as u32);

        log::trace!("Allocating command buffers...");
        self.command_buffers = unsafe {
            self.device
                .allocate_command_buffers(&alloc_info)
                .map_err(|err| {
                    log::error!("Failed to allocate command buffers!");
                    VulkanError::Api(err)
                })?
        };
        Ok(())
    }

    fn create_sync_objects(&mut self) -> VulkanResult<()> {
        let semaphore_info = vk::SemaphoreCreateInfo::builder();
        // Pre-signaled so the first frame's fence wait does not block forever.
        let fence_info = vk::FenceCreateInfo::builder().flags(vk::FenceCreateFlags::SIGNALED);

        for index in 0..MAX_FRAMES_IN_FLIGHT {
            log::trace!("Creating sync objects for ring slot #{index}...");
            unsafe {
                self.image_available.push(
                    self.device
                        .create_semaphore(&semaphore_info, None)
                        .map_err(VulkanError::Api)?,
                );
                self.render_finished.push(
                    self.device
                        .create_semaphore(&semaphore_info, None)
                        .map_err(VulkanError::Api)?,
                );
                self.in_flight.push(
                    self.device
                        .create_fence(&fence_info, None)
                        .map_err(VulkanError::Api)?,
                );
            }
        }
        self.images_in_flight = vec![vk::Fence::null(); self.images.len()];
        Ok(())
    }

    /// Wait on the current ring slot's fence, then acquire the next
    /// presentable image, signaling the slot's image-available semaphore.
    ///
    /// Returns the driver status unmodified: `Ok((index, suboptimal))` or the
    /// raw error code (notably `ERROR_OUT_OF_DATE_KHR`). Both waits block
    /// indefinitely; there is no bounded-wait cancellation at this layer.
    pub fn acquire_next_frame_index(&self) -> ash::prelude::VkResult<(u32, bool)> {
        unsafe {
            self.device.wait_for_fences(
                &[self.in_flight[self.current_frame]],
                true,
                u64::MAX,
            )?;

            self.swapchain_loader.acquire_next_image(
                self.swapchain,
                u64::MAX,
                self.image_available[self.current_frame],
                vk::Fence::null(),
            )
        }
    }

    /// Submit the image's recorded command buffer and present it.
    ///
    /// If the image is still owned by a fence from an earlier ring slot, that
    /// fence is waited first so two in-flight frames never write the same
    /// image. The ring slot advances unconditionally, even when present
    /// fails, so the ring keeps rotating. Returns the present status
    /// unmodified (`Ok(suboptimal)` or the raw error).
    pub fn submit_command_buffer(&mut self, image_index: u32) -> ash::prelude::VkResult<bool> {
        let image = image_index as usize;

        unsafe {
            if self.images_in_flight[image] != vk::Fence::null() {
                self.device
                    .wait_for_fences(&[self.images_in_flight[image]], true, u64::MAX)?;
            }
            self.images_in_flight[image] = self.in_flight[self.current_frame];

            let wait_semaphores = [self.image_available[self.current_frame]];
            let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
            let command_buffers = [self.command_buffers[image]];
            let signal_semaphores = [self.render_finished[self.current_frame]];

            let submit_info = vk::SubmitInfo::builder()
                .wait_semaphores(&wait_semaphores)
                .wait_dst_stage_mask(&wait_stages)
                .command_buffers(&command_buffers)
                .signal_semaphores(&signal_semaphores)
                .build();

            self.device
                .reset_fences(&[self.in_flight[self.current_frame]])?;
            self.device.queue_submit(
                self.graphics_queue,
                &[submit_info],
                self.in_flight[self.current_frame],
            )?;

            let swapchains = [self.swapchain];
            let image_indices = [image_index];
            let present_info = vk::PresentInfoKHR::builder()
                .wait_semaphores(&signal_semaphores)
                .swapchains(&swapchains)
                .image_indices(&image_indices);

            self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;

            self.swapchain_loader
                .queue_present(self.present_queue, &present_info)
        }
    }

    /// The raw swapchain handle.
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    /// The render pass all framebuffers of this chain target.
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    /// Current chain extent in pixels.
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// The chosen surface format.
    pub fn surface_format(&self) -> vk::SurfaceFormatKHR {
        self.surface_format
    }

    /// The chosen depth attachment format.
    pub fn depth_format(&self) -> vk::Format {
        self.depth_format
    }

    /// Number of images in the chain.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Framebuffer for a given image index.
    pub fn framebuffer(&self, image_index: u32) -> vk::Framebuffer {
        self.framebuffers[image_index as usize]
    }

    /// Command buffer associated with a given image index.
    pub fn command_buffer(&self, image_index: u32) -> vk::CommandBuffer {
        self.command_buffers[image_index as usize]
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        log::trace!("Destroying swapchain objects...");
        unsafe {
            for &view in &self.image_views {
                self.device.destroy_image_view(view, None);
            }
            for index in 0..self.depth_images.len() {
                self.device.destroy_image_view(self.depth_views[index], None);
                self.device.destroy_image(self.depth_images[index], None);
                self.device.free_memory(self.depth_memories[index], None);
            }
            for &framebuffer in &self.framebuffers {
                self.device.destroy_framebuffer(framebuffer, None);
            }
            if !self.command_buffers.is_empty() {
                self.device
                    .free_command_buffers(self.command_pool, &self.command_buffers);
            }
            for index in 0..self.in_flight.len() {
                self.device.destroy_fence(self.in_flight[index], None);
                self.device.destroy_semaphore(self.image_available[index], None);
                self.device.destroy_semaphore(self.render_finished[index], None);
            }
            if self.render_pass != vk::RenderPass::null() {
                self.device.destroy_render_pass(self.render_pass, None);
            }
            if self.swapchain != vk::SwapchainKHR::null() {
                self.swapchain_loader.destroy_swapchain(self.swapchain, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn capabilities(
        min_count: u32,
        max_count: u32,
        current: (u32, u32),
        min_extent: (u32, u32),
        max_extent: (u32, u32),
    ) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            min_image_count: min_count,
            max_image_count: max_count,
            current_extent: vk::Extent2D {
                width: current.0,
                height: current.1,
            },
            min_image_extent: vk::Extent2D {
                width: min_extent.0,
                height: min_extent.1,
            },
            max_image_extent: vk::Extent2D {
                width: max_extent.0,
                height: max_extent.1,
            },
            ..Default::default()
        }
    }

    #[test]
    fn surface_format_prefers_srgb_pair() {
        let formats = [
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::R8G8B8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::R8G8B8A8_SRGB);
        assert_eq!(chosen.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR);
    }

    #[test]
    fn surface_format_falls_back_to_linear_pair() {
        let formats = [
            format(vk::Format::R5G6B5_UNORM_PACK16, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::B8G8R8A8_UNORM);
    }

    #[test]
    fn surface_format_defaults_to_first_listed() {
        let formats = [
            format(vk::Format::R5G6B5_UNORM_PACK16, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::A2B10G10R10_UNORM_PACK32, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::R5G6B5_UNORM_PACK16);
    }

    #[test]
    fn present_mode_prefers_mailbox() {
        let modes = [
            vk::PresentModeKHR::FIFO,
            vk::PresentModeKHR::IMMEDIATE,
            vk::PresentModeKHR::MAILBOX,
        ];
        assert_eq!(
            choose_present_mode(&modes, false),
            vk::PresentModeKHR::MAILBOX
        );
    }

    #[test]
    fn present_mode_never_picks_immediate_unless_enabled() {
        let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE];
        assert_eq!(choose_present_mode(&modes, false), vk::PresentModeKHR::FIFO);
        assert_eq!(
            choose_present_mode(&modes, true),
            vk::PresentModeKHR::IMMEDIATE
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let modes = [vk::PresentModeKHR::FIFO_RELAXED, vk::PresentModeKHR::FIFO];
        assert_eq!(choose_present_mode(&modes, true), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn extent_uses_fixed_current_extent_when_reported() {
        let caps = capabilities(2, 0, (800, 600), (1, 1), (4096, 4096));
        let extent = choose_extent(&caps, (1920, 1080));
        assert_eq!(extent.width, 800);
        assert_eq!(extent.height, 600);
    }

    #[test]
    fn extent_clamps_framebuffer_size_when_unbounded() {
        let caps = capabilities(2, 0, (u32::MAX, u32::MAX), (200, 200), (1024, 1024));
        let extent = choose_extent(&caps, (1920, 100));
        assert_eq!(extent.width, 1024);
        assert_eq!(extent.height, 200);

        let within = choose_extent(&caps, (640, 480));
        assert_eq!(within.width, 640);
        assert_eq!(within.height, 480);
    }

    #[test]
    fn image_count_is_min_plus_one_capped_by_max() {
        let bounded = capabilities(2, 3, (800, 600), (1, 1), (4096, 4096));
        assert_eq!(choose_image_count(&bounded), 3);

        let unbounded = capabilities(2, 0, (800, 600), (1, 1), (4096, 4096));
        assert_eq!(choose_image_count(&unbounded), 3);

        let tight = capabilities(4, 4, (800, 600), (1, 1), (4096, 4096));
        assert_eq!(choose_image_count(&tight), 4);
    }
}
