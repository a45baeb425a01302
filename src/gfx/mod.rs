//! # Graphics Module
//!
//! Everything that touches the GPU or feeds it: camera, procedural geometry,
//! textures, shaders and the render loop.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - First-person fly camera with mouse look
//! - **Geometry** ([`geometry`]) - Grid plane and skybox cube generation
//! - **Rendering Pipeline** ([`rendering`]) - GLSL shaders, pipelines, frame rendering
//! - **Resource Management** ([`resources`]) - Cubemap, depth buffer and scene uniforms
//!
//! ## Usage
//!
//! The graphics system is driven by [`TidewaterApp`](crate::TidewaterApp):
//!
//! ```no_run
//! use tidewater::{SceneConfig, TidewaterApp};
//!
//! let app = TidewaterApp::new(SceneConfig::default()).unwrap();
//! app.run().unwrap();
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;

// Re-export commonly used types
pub use camera::Camera;
pub use rendering::render_engine::RenderEngine;
