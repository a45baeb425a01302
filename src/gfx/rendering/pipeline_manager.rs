//! Render pipeline management system for wgpu
//!
//! Pipelines are registered as [`PipelineConfig`]s naming a vertex and a
//! fragment shader from the [`ShaderLibrary`], then built together. A
//! pipeline whose shaders are missing or that wgpu rejects is reported and
//! left out; callers skip its draw.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use super::{mesh::PositionVertex, shader_library::ShaderLibrary};

/// Depth test settings for a pipeline
#[derive(Debug, Clone, Copy)]
pub struct DepthConfig {
    pub format: TextureFormat,
    pub write_enabled: bool,
    pub compare: CompareFunction,
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth: Option<DepthConfig>,
    pub color_format: TextureFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            vertex_shader: String::new(),
            fragment_shader: String::new(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth: None,
            color_format: TextureFormat::Bgra8Unorm,
        }
    }
}

impl PipelineConfig {
    /// Creates a config for a vertex/fragment shader pair
    pub fn with_shaders(vertex: &str, fragment: &str) -> Self {
        Self {
            vertex_shader: vertex.to_string(),
            fragment_shader: fragment.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Sets all bind group layouts at once (builder pattern)
    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Enables depth testing against a depth buffer of `format`
    pub fn with_depth(
        mut self,
        format: TextureFormat,
        write_enabled: bool,
        compare: CompareFunction,
    ) -> Self {
        self.depth = Some(DepthConfig {
            format,
            write_enabled,
            compare,
        });
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }
}

/// Manages render pipelines and the shader library they are built from
pub struct PipelineManager {
    device: Arc<Device>,
    shaders: ShaderLibrary,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    pending_pipelines: Vec<String>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            shaders: ShaderLibrary::new(device.clone()),
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            pending_pipelines: Vec::new(),
        }
    }

    pub fn shaders_mut(&mut self) -> &mut ShaderLibrary {
        &mut self.shaders
    }

    /// Registers a pipeline configuration without creating it
    ///
    /// # Arguments
    /// * `name` - Unique identifier for this pipeline
    /// * `config` - Pipeline configuration
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        if !self.pending_pipelines.iter().any(|n| n == name) {
            self.pending_pipelines.push(name.to_string());
        }
    }

    /// Returns a created pipeline, `None` if it was never built
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    /// Creates all pending pipelines
    ///
    /// Pipelines that fail stay pending and are listed in the error.
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending = self.pending_pipelines.clone();

        for name in pending {
            let Some(config) = self.pipeline_configs.get(&name).cloned() else {
                continue;
            };
            match self.create_pipeline_from_config(&config) {
                Ok(pipeline) => {
                    log::info!("Created pipeline '{}'", name);
                    self.pipelines.insert(name.clone(), pipeline);
                    self.pending_pipelines.retain(|n| n != &name);
                }
                Err(e) => {
                    errors.push(format!("Pipeline '{}': {}", name, e));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a render pipeline from configuration
    ///
    /// Runs inside a validation error scope so wgpu reports interface
    /// mismatches between the two stages here instead of panicking.
    fn create_pipeline_from_config(&self, config: &PipelineConfig) -> Result<RenderPipeline, String> {
        let vertex_shader = self
            .shaders
            .get(&config.vertex_shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.vertex_shader))?;
        let fragment_shader = self
            .shaders
            .get(&config.fragment_shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.fragment_shader))?;

        self.device.push_error_scope(ErrorFilter::Validation);

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", config.label)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let depth_stencil = config.depth.map(|depth| DepthStencilState {
            format: depth.format,
            depth_write_enabled: depth.write_enabled,
            depth_compare: depth.compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: vertex_shader,
                    entry_point: Some("main"),
                    buffers: &[PositionVertex::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: fragment_shader,
                    entry_point: Some("main"),
                    targets: &[Some(ColorTargetState {
                        format: config.color_format,
                        blend: Some(BlendState::REPLACE),
                        write_mask: ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(error.to_string()),
            None => Ok(pipeline),
        }
    }

    /// Returns pipeline manager statistics
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            total_pipelines: self.pipelines.len(),
            pending_pipelines: self.pending_pipelines.len(),
            loaded_shaders: self.shaders.len(),
        }
    }
}

/// Statistics about pipeline manager state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub total_pipelines: usize,
    pub pending_pipelines: usize,
    pub loaded_shaders: usize,
}
