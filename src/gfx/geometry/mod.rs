//! # Procedural Geometry Generation
//!
//! Builds the two static meshes the demo needs, so no model files are loaded.
//!
//! ## Supported Primitives
//!
//! - **Grid plane**: flat, subdivided water surface in the XZ plane
//! - **Skybox cube**: non-indexed cube drawn around the camera
//!
//! ## Usage
//!
//! ```rust
//! use tidewater::gfx::geometry::{generate_grid_plane, generate_skybox_cube};
//!
//! // 4x4 cells spanning a 10x10 square
//! let plane = generate_grid_plane(4, 10.0);
//! assert_eq!(plane.vertex_count(), 25);
//!
//! let sky = generate_skybox_cube(2.0);
//! assert_eq!(sky.vertex_count(), 36);
//! ```

use std::num::TryFromIntError;

pub mod primitives;

pub use primitives::*;

/// Generated geometry ready for GPU upload
///
/// The buffers are owned here; uploading borrows them, so nothing has to be
/// freed by hand once the GPU copy exists.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding). Empty for non-indexed meshes.
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices, in the type draw calls expect
    ///
    /// Fails instead of truncating when the count does not fit in `u32`.
    pub fn index_count(&self) -> Result<u32, TryFromIntError> {
        u32::try_from(self.indices.len())
    }

    /// Get the number of triangles in this geometry
    ///
    /// Non-indexed geometry is read as a plain triangle list.
    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len() / 3
        } else {
            self.vertices.len() / 3
        }
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}
