//! GPU-side meshes
//!
//! Uploads [`GeometryData`] into vertex/index buffers and draws it through a
//! render pass extension trait.

use crate::gfx::geometry::GeometryData;

/// Position-only vertex layout shared by the water and skybox pipelines.
///
/// - Attribute 0: position (Float32x3) at shader location 0
pub struct PositionVertex;

impl PositionVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Uploaded geometry. `index_buffer` is `None` for non-indexed meshes like
/// the skybox cube.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(
        device: &wgpu::Device,
        geometry: &GeometryData,
        label: &str,
    ) -> Result<Self, std::num::TryFromIntError> {
        let vertex_count = u32::try_from(geometry.vertex_count())?;
        let index_count = geometry.index_count()?;

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = geometry.is_indexed().then(|| {
            wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer", label)),
                    contents: bytemuck::cast_slice(&geometry.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            )
        });

        log::info!(
            "Uploaded mesh '{}': {} vertices, {} triangles",
            label,
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_count,
            index_count,
        })
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        match &mesh.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            None => self.draw(0..mesh.vertex_count, 0..1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_vertex_layout() {
        let layout = PositionVertex::desc();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }
}
