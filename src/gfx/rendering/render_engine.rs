//! WGPU-based rendering engine
//!
//! Owns every GPU object the demo uses (surface, device, queue, meshes,
//! textures, pipelines, uniforms) and draws one frame at a time: the skybox
//! first, then the water plane on top of it.

use std::sync::Arc;

use anyhow::Context;
use cgmath::{Matrix4, Point3, SquareMatrix};

use crate::{
    config::SceneConfig,
    gfx::{
        geometry::{generate_grid_plane, generate_skybox_cube},
        resources::{
            cubemap::CubemapImage,
            scene_bindings::{LightConfig, SceneBindings},
            texture_resource::{DepthTexture, TextureResource},
        },
    },
};

use super::{
    mesh::{DrawMesh, GpuMesh},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

pub const WATER_PIPELINE: &str = "Water";
pub const SKYBOX_PIPELINE: &str = "Skybox";

/// (library name, file, stage) for every shader the engine loads
const SHADERS: [(&str, &str, naga::ShaderStage); 4] = [
    ("water_vs", "water.vert", naga::ShaderStage::Vertex),
    ("water_fs", "water.frag", naga::ShaderStage::Fragment),
    ("skybox_vs", "skybox.vert", naga::ShaderStage::Vertex),
    ("skybox_fs", "skybox.frag", naga::ShaderStage::Fragment),
];

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    pipeline_manager: PipelineManager,
    scene_bindings: SceneBindings,
    // Bound through `scene_bindings`; kept so the texture lives as long as the engine
    _cubemap: TextureResource,
    water_mesh: GpuMesh,
    skybox_mesh: GpuMesh,
    light: LightConfig,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Surface, adapter, device and cubemap failures are returned as errors.
    /// Shader and pipeline failures are only logged; the affected pass is
    /// skipped every frame.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `scene` - Meshes, light and asset locations
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        scene: &SceneConfig,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create GPU device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("surface reports no supported formats")?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");

        let cubemap_image =
            CubemapImage::load(&scene.cubemap_faces()).context("failed to load skybox cubemap")?;
        let cubemap = TextureResource::create_cubemap(&device, &queue, &cubemap_image, "Skybox");

        let scene_bindings = SceneBindings::new(&device, &cubemap);

        let water_mesh = GpuMesh::upload(
            &device,
            &generate_grid_plane(scene.grid_segments, scene.plane_size),
            "Water",
        )
        .context("water grid is too large to draw")?;
        let skybox_mesh = GpuMesh::upload(
            &device,
            &generate_skybox_cube(scene.skybox_half_extent),
            "Skybox",
        )
        .context("skybox cube is too large to draw")?;

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let pipeline_manager = Self::create_pipelines(
            device_handle.clone(),
            scene,
            format,
            scene_bindings.layout(),
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            scene_bindings,
            _cubemap: cubemap,
            water_mesh,
            skybox_mesh,
            light: scene.light,
        })
    }

    fn create_pipelines(
        device: Arc<wgpu::Device>,
        scene: &SceneConfig,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
    ) -> PipelineManager {
        let mut pipeline_manager = PipelineManager::new(device);

        for (name, file, stage) in SHADERS {
            if let Err(e) = pipeline_manager
                .shaders_mut()
                .load_glsl(name, &scene.shader_path(file), stage)
            {
                log::error!("{}", e);
            }
        }

        // Drawn first and behind everything, so the depth test never rejects it
        pipeline_manager.register_pipeline(
            SKYBOX_PIPELINE,
            PipelineConfig::with_shaders("skybox_vs", "skybox_fs")
                .with_label("SKYBOX")
                .with_cull_mode(None)
                .with_color_format(format)
                .with_depth(DepthTexture::FORMAT, false, wgpu::CompareFunction::Always)
                .with_bind_group_layouts(vec![layout.clone()]),
        );

        pipeline_manager.register_pipeline(
            WATER_PIPELINE,
            PipelineConfig::with_shaders("water_vs", "water_fs")
                .with_label("WATER")
                .with_cull_mode(None)
                .with_color_format(format)
                .with_depth(DepthTexture::FORMAT, true, wgpu::CompareFunction::Less)
                .with_bind_group_layouts(vec![layout.clone()]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{}", error);
            }
        }

        let stats = pipeline_manager.get_stats();
        log::info!(
            "{} pipeline(s) ready, {} failed, {} shader(s) loaded",
            stats.total_pipelines,
            stats.pending_pipelines,
            stats.loaded_shaders
        );

        pipeline_manager
    }

    /// Writes this frame's camera matrices and elapsed time into the uniforms
    ///
    /// # Arguments
    /// * `view` - Camera view matrix
    /// * `projection` - Projection already mapped to wgpu clip space
    /// * `elapsed` - Seconds since startup, drives the wave animation
    pub fn update(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, elapsed: f32) {
        let camera_position = camera_position(view);
        self.scene_bindings.update(
            &self.queue,
            view,
            projection,
            camera_position,
            elapsed,
            &self.light,
        );
    }

    /// Clears, draws the skybox and the water, then presents
    ///
    /// Surface errors are returned untouched; see [`RenderEngine::reconfigure`].
    pub fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SKYBOX_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.scene_bindings.skybox_bind_group(), &[]);
                render_pass.draw_mesh(&self.skybox_mesh);
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(WATER_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.scene_bindings.water_bind_group(), &[]);
                render_pass.draw_mesh(&self.water_mesh);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Handles window resize events
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-applies the surface configuration, e.g. after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
    }
}

/// Eye position recovered from a view matrix
fn camera_position(view: Matrix4<f32>) -> Point3<f32> {
    match view.invert() {
        Some(inverse) => Point3::new(inverse.w.x, inverse.w.y, inverse.w.z),
        None => Point3::new(0.0, 0.0, 0.0),
    }
}
