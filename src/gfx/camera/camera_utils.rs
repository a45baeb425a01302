use cgmath::{Matrix3, Matrix4};
use winit::event::WindowEvent;

use super::{
    camera_controller::CameraController,
    fly_camera::{Camera, CursorControl},
};

/// Maps OpenGL clip-space depth (-1..1) onto wgpu's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

pub struct CameraManager {
    pub camera: Camera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: Camera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        self.controller.process_window_event(event);
    }

    /// Runs one frame of camera input against the window.
    pub fn update(&mut self, cursor: &impl CursorControl, dt: f32) {
        let input = self.controller.snapshot();
        if let Some((x, y)) = self.camera.inputs(&input, cursor, dt) {
            self.controller.cursor_warped(x, y);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.camera.view_matrix()
    }

    /// Projection remapped to wgpu's depth range.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.camera.projection()
    }
}

/// Keeps only the rotational part of a view matrix (skybox stays centered on
/// the eye).
pub fn strip_translation(view: Matrix4<f32>) -> Matrix4<f32> {
    let rotation = Matrix3::from_cols(view.x.truncate(), view.y.truncate(), view.z.truncate());
    Matrix4::from(rotation)
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Point3, SquareMatrix, Vector3, Vector4};
    use winit::event::ElementState;

    /// Cursor that always warps successfully
    struct WarpingCursor;

    impl CursorControl for WarpingCursor {
        fn hide_cursor(&self) {}
        fn show_cursor(&self) {}
        fn warp_cursor(&self, _x: f64, _y: f64) -> bool {
            true
        }
    }

    fn yaw_degrees(orientation: Vector3<f32>) -> f32 {
        orientation.x.atan2(-orientation.z).to_degrees()
    }

    #[test]
    fn test_single_cursor_move_turns_once() {
        let camera = Camera::new(800.0, 600.0, Point3::new(0.0, 0.0, 0.0));
        let mut manager = CameraManager::new(camera, CameraController::new());

        manager.controller.set_look_button(ElementState::Pressed);
        manager.controller.set_cursor(400.0, 300.0);
        manager.update(&WarpingCursor, 0.016);

        // a quarter of the viewport at sensitivity 50 is 12.5 degrees
        manager.controller.set_cursor(600.0, 300.0);
        manager.update(&WarpingCursor, 0.016);
        assert!((yaw_degrees(manager.camera.orientation) - 12.5).abs() < 1e-3);
        assert_eq!(manager.controller.snapshot().cursor, Some((400.0, 300.0)));

        // no further CursorMoved events: the view must stay put
        for _ in 0..4 {
            manager.update(&WarpingCursor, 0.016);
            assert!((yaw_degrees(manager.camera.orientation) - 12.5).abs() < 1e-3);
        }
        assert!((manager.camera.orientation.normalize().y).abs() < 1e-5);
    }

    #[test]
    fn test_strip_translation_keeps_rotation() {
        let view = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0))
            * Matrix4::from_angle_y(cgmath::Deg(30.0));
        let stripped = strip_translation(view);

        assert_eq!(stripped.w, Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(stripped.x, view.x);
        assert_eq!(stripped.y, view.y);
        assert_eq!(stripped.z, view.z);
    }

    #[test]
    fn test_depth_remap() {
        let camera = Camera::new(800.0, 600.0, Point3::new(0.0, 0.0, 0.0));
        let manager = CameraManager::new(camera, CameraController::new());
        let proj = manager.projection_matrix();

        let near = proj * Vector4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * Vector4::new(0.0, 0.0, -camera.far, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_convert_matrix_column_major() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(4.0, 5.0, 6.0));
        let array = convert_matrix4_to_array(m);
        assert_eq!(array[3], [4.0, 5.0, 6.0, 1.0]);
        assert_eq!(convert_matrix4_to_array(Matrix4::identity())[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
