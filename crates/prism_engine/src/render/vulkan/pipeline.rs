//! Shader modules and graphics pipeline creation
//!
//! Shader binaries come from the asset layer as SPIR-V bytes; the wrapping
//! modules only live until the pipeline is linked. Viewport and scissor are
//! declared dynamic so the extent can change across swapchain recreations
//! without recompiling the pipeline.

use ash::util::read_spv;
use ash::vk;
use std::ffi::CStr;
use std::io::Cursor;

use super::model::Vertex;
use super::{LogicalDevice, VulkanError, VulkanResult};
use crate::assets::Assets;

/// Per-draw constants pushed for every instance: a 2D linear transform, a
/// translation offset and a flat color.
///
/// Matches the std430 layout of the shader's push-constant block: the mat2
/// occupies 16 bytes, the vec3 color is 16-byte aligned.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PushConstant2D {
    /// Column-major 2x2 transform applied to the vertex position
    pub transform: [[f32; 2]; 2],
    /// Translation applied after the transform
    pub offset: [f32; 2],
    _pad0: [f32; 2],
    /// Flat instance color
    pub color: [f32; 3],
    _pad1: f32,
}

impl PushConstant2D {
    /// Build the constant block from its payload fields.
    pub fn new(transform: [[f32; 2]; 2], offset: [f32; 2], color: [f32; 3]) -> Self {
        Self {
            transform,
            offset,
            _pad0: [0.0; 2],
            color,
            _pad1: 0.0,
        }
    }
}

/// Fixed-function state for one graphics pipeline.
///
/// Viewport and scissor are always dynamic and are not part of the config.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Primitive topology fed into the input assembler
    pub topology: vk::PrimitiveTopology,
    /// Polygon rasterization mode
    pub polygon_mode: vk::PolygonMode,
    /// Face culling mode
    pub cull_mode: vk::CullModeFlags,
    /// Winding order considered front-facing
    pub front_face: vk::FrontFace,
    /// Whether depth testing is enabled
    pub depth_test_enable: bool,
    /// Whether depth writes are enabled
    pub depth_write_enable: bool,
    /// Depth comparison; closer-wins by default
    pub depth_compare_op: vk::CompareOp,
    /// Whether color blending is enabled (replace when off)
    pub blend_enable: bool,
    /// Rasterization sample count
    pub samples: vk::SampleCountFlags,
    /// Subpass index the pipeline renders in
    pub subpass: u32,
}

impl PipelineConfig {
    /// Conventional baseline: triangle list, fill, no culling, single sample,
    /// no blending, depth test and write with closer-wins comparison.
    pub fn default_config() -> Self {
        Self {
            topology: vk::PrimitiveTopology::TRIANGLE_LIST,
            polygon_mode: vk::PolygonMode::FILL,
            cull_mode: vk::CullModeFlags::NONE,
            front_face: vk::FrontFace::CLOCKWISE,
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: vk::CompareOp::LESS,
            blend_enable: false,
            samples: vk::SampleCountFlags::TYPE_1,
            subpass: 0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

/// SPIR-V shader module wrapper.
///
/// Only needed between shader loading and pipeline linking; dropped right
/// after the pipeline exists.
struct ShaderModule {
    device: ash::Device,
    module: vk::ShaderModule,
}

impl ShaderModule {
    fn from_bytes(device: &ash::Device, name: &str, bytes: &[u8]) -> VulkanResult<Self> {
        let code = read_spv(&mut Cursor::new(bytes)).map_err(|err| {
            VulkanError::InitializationFailed(format!("Invalid SPIR-V in \"{name}\": {err}"))
        })?;
        let create_info = vk::ShaderModuleCreateInfo::builder().code(&code);

        let module = unsafe {
            device
                .create_shader_module(&create_info, None)
                .map_err(|err| {
                    log::error!("Failed to create shader module for \"{name}\"!");
                    VulkanError::Api(err)
                })?
        };

        Ok(Self {
            device: device.clone(),
            module,
        })
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}

/// A linked graphics pipeline and its layout.
pub struct Pipeline {
    device: ash::Device,
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
}

impl Pipeline {
    /// Load both shader stages through the asset layer and build the
    /// pipeline against `render_pass`.
    ///
    /// Shader modules are released as soon as linking succeeds.
    pub fn new(
        device: &LogicalDevice,
        assets: &Assets,
        vert_name: &str,
        frag_name: &str,
        render_pass: vk::RenderPass,
        config: &PipelineConfig,
    ) -> VulkanResult<Self> {
        log::debug!("Creating graphics pipeline ({vert_name} + {frag_name})...");

        let raw_device = device.device();
        let vert_bytes = assets.load_bytes(vert_name, None)?;
        let frag_bytes = assets.load_bytes(frag_name, None)?;
        let vert_module = ShaderModule::from_bytes(raw_device, vert_name, &vert_bytes)?;
        let frag_module = ShaderModule::from_bytes(raw_device, frag_name, &frag_bytes)?;

        let entry_point = unsafe { CStr::from_bytes_with_nul_unchecked(b"main\0") };
        let stages = [
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vert_module.module)
                .name(entry_point)
                .build(),
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(frag_module.module)
                .name(entry_point)
                .build(),
        ];

        let binding_descriptions = Vertex::binding_descriptions();
        let attribute_descriptions = Vertex::attribute_descriptions();
        let vertex_input = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&binding_descriptions)
            .vertex_attribute_descriptions(&attribute_descriptions);

        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(config.topology)
            .primitive_restart_enable(false);

        // Counts only; the actual rectangles are dynamic state set per frame.
        let viewport_state = vk::PipelineViewportStateCreateInfo {
            viewport_count: 1,
            scissor_count: 1,
            ..Default::default()
        };

        let rasterization = vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(config.polygon_mode)
            .line_width(1.0)
            .cull_mode(config.cull_mode)
            .front_face(config.front_face)
            .depth_bias_enable(false);

        let multisample = vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(false)
            .rasterization_samples(config.samples);

        let depth_stencil = vk::PipelineDepthStencilStateCreateInfo::builder()
            .depth_test_enable(config.depth_test_enable)
            .depth_write_enable(config.depth_write_enable)
            .depth_compare_op(config.depth_compare_op)
            .depth_bounds_test_enable(false)
            .stencil_test_enable(false);

        let blend_attachments = [vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(config.blend_enable)
            .build()];
        let color_blend = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .attachments(&blend_attachments);

        let dynamic_states = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];
        let dynamic_state =
            vk::PipelineDynamicStateCreateInfo::builder().dynamic_states(&dynamic_states);

        let push_constant_ranges = [vk::PushConstantRange::builder()
            .stage_flags(vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT)
            .offset(0)
            .size(std::mem::size_of::<PushConstant2D>() as u32)
            .build()];
        let layout_info =
            vk::PipelineLayoutCreateInfo::builder().push_constant_ranges(&push_constant_ranges);

        let layout = unsafe {
            raw_device
                .create_pipeline_layout(&layout_info, None)
                .map_err(|err| {
                    log::error!("Failed to create pipeline layout!");
                    VulkanError::Api(err)
                })?
        };

        let pipeline_info = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&stages)
            .vertex_input_state(&vertex_input)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization)
            .multisample_state(&multisample)
            .depth_stencil_state(&depth_stencil)
            .color_blend_state(&color_blend)
            .dynamic_state(&dynamic_state)
            .layout(layout)
            .render_pass(render_pass)
            .subpass(config.subpass)
            .build();

        let pipeline = unsafe {
            match raw_device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_info],
                None,
            ) {
                Ok(pipelines) => pipelines[0],
                Err((_, err)) => {
                    raw_device.destroy_pipeline_layout(layout, None);
                    log::error!("Failed to create graphics pipeline!");
                    return Err(VulkanError::Api(err));
                }
            }
        };

        // vert_module/frag_module drop here; modules are not needed after
        // linking.
        Ok(Self {
            device: raw_device.clone(),
            pipeline,
            layout,
        })
    }

    /// Bind the pipeline for graphics work.
    pub fn bind(&self, command_buffer: vk::CommandBuffer) {
        unsafe {
            self.device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                self.pipeline,
            );
        }
    }

    /// The pipeline layout, needed for push constants.
    pub fn layout(&self) -> vk::PipelineLayout {
        self.layout
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            if self.pipeline != vk::Pipeline::null() {
                self.device.destroy_pipeline(self.pipeline, None);
            }
            if self.layout != vk::PipelineLayout::null() {
                self.device.destroy_pipeline_layout(self.layout, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_conventional_baseline() {
        let config = PipelineConfig::default_config();
        assert_eq!(config.topology, vk::PrimitiveTopology::TRIANGLE_LIST);
        assert_eq!(config.polygon_mode, vk::PolygonMode::FILL);
        assert_eq!(config.cull_mode, vk::CullModeFlags::NONE);
        assert!(config.depth_test_enable);
        assert!(config.depth_write_enable);
        assert_eq!(config.depth_compare_op, vk::CompareOp::LESS);
        assert!(!config.blend_enable);
        assert_eq!(config.samples, vk::SampleCountFlags::TYPE_1);
        assert_eq!(config.subpass, 0);
    }

    #[test]
    fn push_constants_match_std430_block_layout() {
        // mat2 at 0 (16 bytes), vec2 at 16, vec3 at 32, block size 48.
        assert_eq!(std::mem::size_of::<PushConstant2D>(), 48);
        assert_eq!(memoffset_of_offset(), 16);
        assert_eq!(memoffset_of_color(), 32);
    }

    fn memoffset_of_offset() -> usize {
        let probe = PushConstant2D::new([[0.0; 2]; 2], [0.0; 2], [0.0; 3]);
        let base = std::ptr::addr_of!(probe) as usize;
        std::ptr::addr_of!(probe.offset) as usize - base
    }

    fn memoffset_of_color() -> usize {
        let probe = PushConstant2D::new([[0.0; 2]; 2], [0.0; 2], [0.0; 3]);
        let base = std::ptr::addr_of!(probe) as usize;
        std::ptr::addr_of!(probe.color) as usize - base
    }
}
