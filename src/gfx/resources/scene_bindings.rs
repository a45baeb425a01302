//! Per-frame uniforms and bind groups for the water and skybox passes
//!
//! Both pipelines share one bind group layout: a uniform block at binding 0,
//! the skybox cubemap at binding 1 and its sampler at binding 2. The uniform
//! structs here MUST match the blocks declared in the GLSL shaders
//! (std140 layout).

use cgmath::{Matrix4, Point3, SquareMatrix};

use crate::{
    gfx::camera::camera_utils::{convert_matrix4_to_array, strip_translation},
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

use super::texture_resource::TextureResource;

/// Light parameters handed to the water shader
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// Direction-style light when `w == 0`
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [-15.0, 50.0, -15.0, 0.0],
            ambient: [0.1, 0.2, 0.3, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// `WaterUniforms` block of `water.vert` / `water.frag`
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaterUniformContent {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub camera_position: [f32; 4],
    pub time: f32,
    _padding: [f32; 3],
}
// 3 * 64 + 5 * 16 + 16 = 288 bytes

impl WaterUniformContent {
    pub fn new(
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_position: Point3<f32>,
        time: f32,
        light: &LightConfig,
    ) -> Self {
        Self {
            model: convert_matrix4_to_array(Matrix4::identity()),
            view: convert_matrix4_to_array(view),
            projection: convert_matrix4_to_array(projection),
            light_position: light.position,
            light_ambient: light.ambient,
            light_diffuse: light.diffuse,
            light_specular: light.specular,
            camera_position: [camera_position.x, camera_position.y, camera_position.z, 1.0],
            time,
            _padding: [0.0; 3],
        }
    }
}

/// `SkyboxUniforms` block of `skybox.vert`
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyboxUniformContent {
    /// View matrix with the translation removed
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl SkyboxUniformContent {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            view: convert_matrix4_to_array(strip_translation(view)),
            projection: convert_matrix4_to_array(projection),
        }
    }
}

pub type WaterUBO = UniformBuffer<WaterUniformContent>;
pub type SkyboxUBO = UniformBuffer<SkyboxUniformContent>;

/// Owns the scene uniform buffers and the bind groups that pair them with
/// the cubemap.
pub struct SceneBindings {
    layout: wgpu::BindGroupLayout,
    water_ubo: WaterUBO,
    skybox_ubo: SkyboxUBO,
    water_bind_group: wgpu::BindGroup,
    skybox_bind_group: wgpu::BindGroup,
}

impl SceneBindings {
    pub fn new(device: &wgpu::Device, cubemap: &TextureResource) -> Self {
        let layout = Self::create_layout(device);

        let identity = convert_matrix4_to_array(Matrix4::identity());
        let water_ubo = WaterUBO::new_with_data(
            device,
            &WaterUniformContent::new(
                Matrix4::identity(),
                Matrix4::identity(),
                Point3::new(0.0, 0.0, 0.0),
                0.0,
                &LightConfig::default(),
            ),
        );
        let skybox_ubo = SkyboxUBO::new_with_data(
            device,
            &SkyboxUniformContent {
                view: identity,
                projection: identity,
            },
        );

        let water_bind_group =
            Self::create_bind_group(device, &layout, &water_ubo, cubemap, "Water Bind Group");
        let skybox_bind_group =
            Self::create_bind_group(device, &layout, &skybox_ubo, cubemap, "Skybox Bind Group");

        Self {
            layout,
            water_ubo,
            skybox_ubo,
            water_bind_group,
            skybox_bind_group,
        }
    }

    fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                binding_types::entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    binding_types::uniform(),
                ),
                binding_types::entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::texture_cube(),
                ),
                binding_types::entry(
                    2,
                    wgpu::ShaderStages::FRAGMENT,
                    binding_types::sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        })
    }

    fn create_bind_group<Content: bytemuck::Pod>(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        ubo: &UniformBuffer<Content>,
        cubemap: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        })
    }

    /// Writes this frame's matrices, time and light into both uniform buffers.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_position: Point3<f32>,
        time: f32,
        light: &LightConfig,
    ) {
        self.water_ubo.update_content(
            queue,
            WaterUniformContent::new(view, projection, camera_position, time, light),
        );
        self.skybox_ubo
            .update_content(queue, SkyboxUniformContent::new(view, projection));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn water_bind_group(&self) -> &wgpu::BindGroup {
        &self.water_bind_group
    }

    pub fn skybox_bind_group(&self) -> &wgpu::BindGroup {
        &self.skybox_bind_group
    }
}
