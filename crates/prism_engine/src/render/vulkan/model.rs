//! Vertex data and static geometry buffers

use ash::vk;
use bytemuck::{Pod, Zeroable};

use super::{LogicalDevice, VulkanError, VulkanResult};

/// One vertex of 2D geometry: position plus per-vertex color.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    /// Position in normalized device coordinates
    pub position: [f32; 2],
    /// Vertex color
    pub color: [f32; 3],
}

impl Vertex {
    /// The single interleaved vertex buffer binding.
    pub fn binding_descriptions() -> [vk::VertexInputBindingDescription; 1] {
        [vk::VertexInputBindingDescription {
            binding: 0,
            stride: std::mem::size_of::<Self>() as u32,
            input_rate: vk::VertexInputRate::VERTEX,
        }]
    }

    /// Attribute layout: position at location 0, color at location 1.
    pub fn attribute_descriptions() -> [vk::VertexInputAttributeDescription; 2] {
        [
            vk::VertexInputAttributeDescription {
                location: 0,
                binding: 0,
                format: vk::Format::R32G32_SFLOAT,
                offset: 0,
            },
            vk::VertexInputAttributeDescription {
                location: 1,
                binding: 0,
                format: vk::Format::R32G32B32_SFLOAT,
                offset: std::mem::size_of::<[f32; 2]>() as u32,
            },
        ]
    }
}

/// Static geometry: a vertex buffer with bound memory.
pub struct Model {
    device: ash::Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    vertex_count: u32,
}

impl Model {
    /// Upload `vertices` into a host-visible vertex buffer.
    pub fn new(device: &LogicalDevice, vertices: &[Vertex]) -> VulkanResult<Self> {
        if vertices.len() < 3 {
            return Err(VulkanError::InitializationFailed(
                "Model requires at least 3 vertices".to_string(),
            ));
        }

        let (buffer, memory) = device.create_buffer_with_data(
            vk::BufferUsageFlags::VERTEX_BUFFER,
            bytemuck::cast_slice(vertices),
        )?;

        Ok(Self {
            device: device.device().clone(),
            buffer,
            memory,
            vertex_count: vertices.len() as u32,
        })
    }

    /// Bind the vertex buffer.
    pub fn bind(&self, command_buffer: vk::CommandBuffer) {
        unsafe {
            self.device
                .cmd_bind_vertex_buffers(command_buffer, 0, &[self.buffer], &[0]);
        }
    }

    /// Issue the draw for all vertices of the model.
    pub fn draw(&self, command_buffer: vk::CommandBuffer) {
        unsafe {
            self.device.cmd_draw(command_buffer, self.vertex_count, 1, 0, 0);
        }
    }

    /// Number of vertices in the buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        unsafe {
            if self.buffer != vk::Buffer::null() {
                self.device.destroy_buffer(self.buffer, None);
            }
            if self.memory != vk::DeviceMemory::null() {
                self.device.free_memory(self.memory, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_shader_expectations() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);

        let bindings = Vertex::binding_descriptions();
        assert_eq!(bindings[0].stride, 20);
        assert_eq!(bindings[0].input_rate, vk::VertexInputRate::VERTEX);

        let attributes = Vertex::attribute_descriptions();
        assert_eq!(attributes[0].format, vk::Format::R32G32_SFLOAT);
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[1].format, vk::Format::R32G32B32_SFLOAT);
        assert_eq!(attributes[1].offset, 8);
    }
}
