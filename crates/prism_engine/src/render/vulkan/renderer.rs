//! Per-frame render driving and backend lifecycle
//!
//! `VulkanRenderer` wires the backend together in dependency order (context,
//! device, swapchain, pipeline) and drives the acquire / record / submit /
//! present cycle once per application tick. Swapchain invalidation is handled
//! exclusively by the resize notification path; the render path only skips
//! frames on transient status codes, which avoids recreation storms during
//! rapid resizing.

use ash::vk;

use super::pipeline::PushConstant2D;
use super::{
    GraphicsContext, LogicalDevice, Model, PhysicalDeviceSelector, Pipeline, PipelineConfig,
    Swapchain, Vertex, VulkanError, VulkanResult,
};
use crate::assets::Assets;
use crate::core::Config;
use crate::window::Window;

/// Config key enabling driver diagnostics outside debug builds.
pub const VALIDATION_KEY: &str = "Validation";
/// Config key allowing the immediate (tearing) present mode.
pub const PRESENT_IMMEDIATE_KEY: &str = "PresentModeImmediate";

const VERT_SHADER: &str = "flat.vert.spv";
const FRAG_SHADER: &str = "flat.frag.spv";

/// One of the fixed demo draw instances pushed per frame.
struct DrawInstance {
    rotation: f32,
    scale: [f32; 2],
    offset: [f32; 2],
    color: [f32; 3],
}

/// Column-major 2x2 rotation-and-scale matrix.
fn transform_2d(rotation: f32, scale: [f32; 2]) -> [[f32; 2]; 2] {
    let (sin, cos) = rotation.sin_cos();
    [
        [cos * scale[0], sin * scale[0]],
        [-sin * scale[1], cos * scale[1]],
    ]
}

/// The Vulkan render backend: owns the full resource hierarchy and performs
/// one frame cycle per `render` call.
pub struct VulkanRenderer {
    // Field order is teardown order: pipeline and geometry before the
    // swapchain, the swapchain before the device, the device before the
    // instance. The Drop impl waits the device idle first.
    pipeline: Pipeline,
    model: Model,
    swapchain: Option<Swapchain>,
    device: LogicalDevice,
    context: GraphicsContext,

    instances: Vec<DrawInstance>,
    clear_color: [f32; 4],
    allow_immediate: bool,
}

impl VulkanRenderer {
    /// Bring up the whole backend against `window`.
    ///
    /// Any failure here is fatal for the application: a partially initialized
    /// backend cannot produce a correct frame, so errors propagate up to a
    /// logged termination.
    pub fn new(
        window: &mut Window,
        assets: &Assets,
        config: &mut Config,
        app_name: &str,
        app_version: (u32, u32, u32),
    ) -> VulkanResult<Self> {
        log::debug!("Initializing Vulkan renderer...");

        let enable_diagnostics = config.get_parsed(VALIDATION_KEY, cfg!(debug_assertions));
        let allow_immediate = config.get_parsed(PRESENT_IMMEDIATE_KEY, false);

        let context = GraphicsContext::new(
            window,
            app_name,
            vk::make_api_version(0, app_version.0, app_version.1, app_version.2),
            enable_diagnostics,
        )?;

        log::debug!("Choosing Vulkan physical device...");
        let selector = PhysicalDeviceSelector::enumerate(&context)?;
        let physical = selector.pick(config)?;

        log::debug!("Creating Vulkan logical device...");
        let device = LogicalDevice::new(&context, &physical, enable_diagnostics)?;

        let swapchain = Swapchain::new(&context, &device, window, allow_immediate)?;

        let pipeline = Pipeline::new(
            &device,
            assets,
            VERT_SHADER,
            FRAG_SHADER,
            swapchain.render_pass(),
            &PipelineConfig::default_config(),
        )?;

        let model = Model::new(&device, &demo_triangle())?;

        log::debug!("Vulkan renderer initialized.");
        Ok(Self {
            pipeline,
            model,
            swapchain: Some(swapchain),
            device,
            context,
            instances: demo_instances(),
            clear_color: [0.01, 0.01, 0.03, 1.0],
            allow_immediate,
        })
    }

    /// Perform one frame cycle: acquire, record, submit, present.
    ///
    /// Out-of-date and suboptimal status codes skip the frame; the swapchain
    /// is rebuilt by the resize notification path, not here.
    pub fn render(&mut self) -> VulkanResult<()> {
        let Some(swapchain) = self.swapchain.as_mut() else {
            return Ok(());
        };

        let (image_index, _suboptimal) = match swapchain.acquire_next_frame_index() {
            Ok(acquired) => acquired,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => return Ok(()),
            Err(err) => return Err(VulkanError::Api(err)),
        };

        record_commands(
            self.device.device(),
            swapchain,
            &self.pipeline,
            &self.model,
            &self.instances,
            self.clear_color,
            image_index,
        )?;

        match swapchain.submit_command_buffer(image_index) {
            // Ok(true) means suboptimal; both are left to the resize path.
            Ok(_) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(()),
            Err(err) => Err(VulkanError::Api(err)),
        }
    }

    /// Rebuild the swapchain and pipeline for a new framebuffer size.
    ///
    /// Waits for all in-flight work, then recreates the chain through the
    /// old-swapchain transfer and rebuilds the pipeline against the new
    /// render pass. The caller guarantees both dimensions are non-zero.
    pub fn on_framebuffer_resize(&mut self, window: &Window, assets: &Assets) -> VulkanResult<()> {
        self.device.wait_idle()?;

        if let Some(previous) = self.swapchain.take() {
            let next = Swapchain::recreate(
                previous,
                &self.context,
                &self.device,
                window,
                self.allow_immediate,
            )?;
            self.pipeline = Pipeline::new(
                &self.device,
                assets,
                VERT_SHADER,
                FRAG_SHADER,
                next.render_pass(),
                &PipelineConfig::default_config(),
            )?;
            self.swapchain = Some(next);
        }

        Ok(())
    }

    /// Block until the device finished all submitted work.
    pub fn wait_idle(&self) -> VulkanResult<()> {
        self.device.wait_idle()
    }

    /// Current swapchain extent, if a chain exists.
    pub fn extent(&self) -> Option<(u32, u32)> {
        self.swapchain
            .as_ref()
            .map(|chain| (chain.extent().width, chain.extent().height))
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        log::debug!("Shutting down Vulkan renderer...");
        // Teardown must not free resources the GPU still reads; fields drop
        // in declaration order after this wait.
        let _ = self.device.wait_idle();
    }
}

fn record_commands(
    device: &ash::Device,
    swapchain: &Swapchain,
    pipeline: &Pipeline,
    model: &Model,
    instances: &[DrawInstance],
    clear_color: [f32; 4],
    image_index: u32,
) -> VulkanResult<()> {
    let command_buffer = swapchain.command_buffer(image_index);
    let extent = swapchain.extent();

    let begin_info = vk::CommandBufferBeginInfo::builder();
    unsafe {
        // The pool is created with RESET_COMMAND_BUFFER; beginning implicitly
        // resets the previous recording.
        device
            .begin_command_buffer(command_buffer, &begin_info)
            .map_err(VulkanError::Api)?;

        let clear_values = [
            vk::ClearValue {
                color: vk::ClearColorValue {
                    float32: clear_color,
                },
            },
            vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue {
                    depth: 1.0,
                    stencil: 0,
                },
            },
        ];
        let render_pass_info = vk::RenderPassBeginInfo::builder()
            .render_pass(swapchain.render_pass())
            .framebuffer(swapchain.framebuffer(image_index))
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent,
            })
            .clear_values(&clear_values);
        device.cmd_begin_render_pass(command_buffer, &render_pass_info, vk::SubpassContents::INLINE);

        let viewport = vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        let scissor = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };
        device.cmd_set_viewport(command_buffer, 0, &[viewport]);
        device.cmd_set_scissor(command_buffer, 0, &[scissor]);

        pipeline.bind(command_buffer);
        model.bind(command_buffer);

        for instance in instances {
            let push = PushConstant2D::new(
                transform_2d(instance.rotation, instance.scale),
                instance.offset,
                instance.color,
            );
            device.cmd_push_constants(
                command_buffer,
                pipeline.layout(),
                vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT,
                0,
                bytemuck::bytes_of(&push),
            );
            model.draw(command_buffer);
        }

        device.cmd_end_render_pass(command_buffer);
        device
            .end_command_buffer(command_buffer)
            .map_err(VulkanError::Api)?;
    }

    Ok(())
}

fn demo_triangle() -> [Vertex; 3] {
    [
        Vertex {
            position: [0.0, -0.5],
            color: [1.0, 0.2, 0.2],
        },
        Vertex {
            position: [0.5, 0.5],
            color: [0.2, 1.0, 0.2],
        },
        Vertex {
            position: [-0.5, 0.5],
            color: [0.2, 0.2, 1.0],
        },
    ]
}

fn demo_instances() -> Vec<DrawInstance> {
    vec![
        DrawInstance {
            rotation: 0.0,
            scale: [0.9, 0.9],
            offset: [0.0, 0.0],
            color: [0.9, 0.2, 0.2],
        },
        DrawInstance {
            rotation: 0.35,
            scale: [0.6, 0.6],
            offset: [-0.4, -0.3],
            color: [0.2, 0.8, 0.3],
        },
        DrawInstance {
            rotation: -0.6,
            scale: [0.45, 0.45],
            offset: [0.45, -0.25],
            color: [0.25, 0.4, 0.9],
        },
        DrawInstance {
            rotation: 1.2,
            scale: [0.3, 0.3],
            offset: [0.1, 0.4],
            color: [0.9, 0.8, 0.2],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn transform_with_zero_rotation_is_pure_scale() {
        let transform = transform_2d(0.0, [2.0, 3.0]);
        assert_relative_eq!(transform[0][0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(transform[0][1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(transform[1][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(transform[1][1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn transform_quarter_turn_swaps_axes() {
        let transform = transform_2d(std::f32::consts::FRAC_PI_2, [1.0, 1.0]);
        // Column 0 maps +x to +y, column 1 maps +y to -x.
        assert_relative_eq!(transform[0][0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(transform[0][1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(transform[1][0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(transform[1][1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn demo_scene_stays_within_guaranteed_push_budget() {
        // 128 bytes of push constants are guaranteed by every driver.
        assert!(std::mem::size_of::<PushConstant2D>() <= 128);
        assert!(!demo_instances().is_empty());
    }
}
