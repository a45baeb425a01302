// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles shaders, render pipelines, GPU meshes and frame rendering.

pub mod mesh;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shader_library;

// Re-export main types
pub use mesh::{DrawMesh, GpuMesh, PositionVertex};
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::RenderEngine;
pub use shader_library::{ShaderError, ShaderLibrary};
