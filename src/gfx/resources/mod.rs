// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform buffers, and bind groups for rendering.

pub mod cubemap;
pub mod scene_bindings;
pub mod texture_resource;

// Re-export main types
pub use cubemap::{CubemapError, CubemapImage};
pub use scene_bindings::{LightConfig, SceneBindings};
pub use texture_resource::{DepthTexture, TextureResource};
