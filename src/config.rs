//! Scene constants
//!
//! Everything the demo needs to set up its window, meshes, camera and light.
//! [`SceneConfig::default`] holds the built-in values; the `with_*` builders
//! override individual fields.

use std::path::{Path, PathBuf};

use cgmath::Point3;

use crate::gfx::resources::{cubemap::FACE_FILE_NAMES, scene_bindings::LightConfig};

const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub window_title: String,
    pub width: u32,
    pub height: u32,

    /// Grid cells along each side of the water plane
    pub grid_segments: u32,
    /// Side length of the water plane
    pub plane_size: f32,
    pub skybox_half_extent: f32,

    pub camera_position: Point3<f32>,
    pub camera_target: Point3<f32>,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub light: LightConfig,

    pub shader_dir: PathBuf,
    pub image_dir: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_title: "3D Plane with Water Movement".to_string(),
            width: 800,
            height: 600,
            grid_segments: 1000,
            plane_size: 25.0,
            skybox_half_extent: 2.0,
            camera_position: Point3::new(0.0, 1.0, 2.5),
            camera_target: Point3::new(0.0, 0.0, -5.0),
            fov_degrees: 70.0,
            near: 0.1,
            far: 100.0,
            light: LightConfig::default(),
            shader_dir: Path::new(ASSET_DIR).join("shaders"),
            image_dir: Path::new(ASSET_DIR).join("images"),
        }
    }
}

impl SceneConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.window_title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_grid(mut self, segments: u32, size: f32) -> Self {
        self.grid_segments = segments;
        self.plane_size = size;
        self
    }

    pub fn with_camera(mut self, position: Point3<f32>, target: Point3<f32>) -> Self {
        self.camera_position = position;
        self.camera_target = target;
        self
    }

    pub fn with_light(mut self, light: LightConfig) -> Self {
        self.light = light;
        self
    }

    /// Points shader and image lookups at another asset root
    pub fn with_asset_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.shader_dir = dir.as_ref().join("shaders");
        self.image_dir = dir.as_ref().join("images");
        self
    }

    pub fn shader_path(&self, file: &str) -> PathBuf {
        self.shader_dir.join(file)
    }

    /// Face paths in cube layer order (+X, -X, +Y, -Y, +Z, -Z)
    pub fn cubemap_faces(&self) -> [PathBuf; 6] {
        FACE_FILE_NAMES.map(|name| self.image_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.window_title, "3D Plane with Water Movement");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.grid_segments, 1000);
        assert_eq!(config.plane_size, 25.0);
        assert_eq!(config.camera_position, Point3::new(0.0, 1.0, 2.5));
        assert!(config.shader_path("water.vert").ends_with("assets/shaders/water.vert"));
    }

    #[test]
    fn test_cubemap_face_order() {
        let config = SceneConfig::default().with_asset_dir("/tmp/sky");
        let faces = config.cubemap_faces();
        assert_eq!(faces[0], Path::new("/tmp/sky/images/right.png"));
        assert_eq!(faces[2], Path::new("/tmp/sky/images/top.png"));
        assert_eq!(faces[5], Path::new("/tmp/sky/images/back.png"));
    }

    #[test]
    fn test_shipped_cubemap_loads() {
        let config = SceneConfig::default();
        let cubemap =
            crate::gfx::resources::cubemap::CubemapImage::load(&config.cubemap_faces()).unwrap();
        assert_eq!(cubemap.faces.len(), 6);
    }

    #[test]
    fn test_builders() {
        let config = SceneConfig::default()
            .with_title("Test")
            .with_size(320, 240)
            .with_grid(10, 5.0);
        assert_eq!(config.window_title, "Test");
        assert_eq!((config.width, config.height), (320, 240));
        assert_eq!((config.grid_segments, config.plane_size), (10, 5.0));
    }
}
