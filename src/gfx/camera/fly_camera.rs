//! First-person fly camera
//!
//! Keyboard movement along the view direction, strafe axis and world up, and
//! mouse look while the look button is held. Look handling is an explicit
//! [`LookMode`] state machine; the window side effects go through the
//! [`CursorControl`] trait so the camera can be driven without a window.

use cgmath::*;
use winit::{
    dpi::PhysicalPosition,
    window::{CursorGrabMode, Window},
};

/// Forward direction assigned on every fresh look activation.
pub const DEFAULT_ORIENTATION: Vector3<f32> = Vector3::new(0.0, 0.0, -1.0);

/// Pitch changes are rejected once the view would come within this many
/// degrees of straight up or down.
const MAX_PITCH_DEGREES: f32 = 85.0;

/// Window operations the camera needs while looking around.
pub trait CursorControl {
    /// Hide the cursor and keep it inside the window.
    fn hide_cursor(&self);

    /// Restore the normal cursor.
    fn show_cursor(&self);

    /// Move the system cursor to `(x, y)` in physical pixels.
    ///
    /// Returns `false` when the platform does not allow it.
    fn warp_cursor(&self, x: f64, y: f64) -> bool;
}

impl CursorControl for Window {
    fn hide_cursor(&self) {
        self.set_cursor_visible(false);
        if let Err(err) = self
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| self.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::debug!("cursor grab unavailable: {err}");
        }
    }

    fn show_cursor(&self) {
        if let Err(err) = self.set_cursor_grab(CursorGrabMode::None) {
            log::debug!("cursor release failed: {err}");
        }
        self.set_cursor_visible(true);
    }

    fn warp_cursor(&self, x: f64, y: f64) -> bool {
        self.set_cursor_position(PhysicalPosition::new(x, y)).is_ok()
    }
}

/// Mouse-look state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookMode {
    /// Cursor visible, orientation untouched by the mouse.
    Free,
    /// Look button held. `last_cursor` is `None` until the first poll after
    /// activation has recentered the cursor.
    Looking { last_cursor: Option<(f64, f64)> },
}

/// Input state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Look button (left mouse) held
    pub look_held: bool,
    /// Last known cursor position in physical pixels
    pub cursor: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    /// View direction. Not kept normalized.
    pub orientation: Vector3<f32>,
    pub up: Vector3<f32>,
    pub width: f32,
    pub height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Movement speed in world units per second
    pub speed: f32,
    /// Degrees of rotation for a cursor sweep across the whole viewport
    pub sensitivity: f32,
    look_mode: LookMode,
}

impl Camera {
    pub fn new(width: f32, height: f32, position: Point3<f32>) -> Self {
        Self {
            position,
            orientation: DEFAULT_ORIENTATION,
            up: Vector3::unit_y(),
            width,
            height,
            fov_degrees: 70.0,
            near: 0.1,
            far: 100.0,
            speed: 2.5,
            sensitivity: 50.0,
            look_mode: LookMode::Free,
        }
    }

    /// Camera at `position` facing `target`.
    ///
    /// A target straight above or below the camera has no strafe axis; the
    /// default orientation is kept instead.
    pub fn looking_at(width: f32, height: f32, position: Point3<f32>, target: Point3<f32>) -> Self {
        let mut camera = Self::new(width, height, position);
        let direction = target - position;
        if strafe_axis(direction, camera.up).is_some() {
            camera.orientation = direction;
        } else {
            log::warn!("camera target is degenerate, keeping default orientation");
        }
        camera
    }

    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self.near = near;
        self.far = far;
        self
    }

    pub fn look_mode(&self) -> LookMode {
        self.look_mode
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Look-at transform from the position along the orientation.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.orientation, self.up)
    }

    /// OpenGL-convention perspective projection (depth in -1..1).
    pub fn proj_matrix(&self, fov_degrees: f32, near: f32, far: f32) -> Matrix4<f32> {
        perspective(Deg(fov_degrees), self.aspect(), near, far)
    }

    /// Projection with the stored field of view and clip planes.
    pub fn projection(&self) -> Matrix4<f32> {
        self.proj_matrix(self.fov_degrees, self.near, self.far)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Strafe axis (orientation x up), normalized. `None` while the view is
    /// parallel to up.
    pub fn right(&self) -> Option<Vector3<f32>> {
        strafe_axis(self.orientation, self.up)
    }

    /// Applies one frame of input.
    ///
    /// Movement is scaled by `speed * dt`. Mouse look only runs while
    /// `input.look_held`; see [`LookMode`] for the activation sequence.
    ///
    /// Returns the position the cursor was warped to, if any. Whoever tracks
    /// the cursor must adopt it, or the next frame measures the same motion
    /// again.
    pub fn inputs(
        &mut self,
        input: &InputSnapshot,
        cursor: &impl CursorControl,
        dt: f32,
    ) -> Option<(f64, f64)> {
        self.apply_movement(input, dt);

        if input.look_held {
            return self.look(input, cursor);
        }
        if let LookMode::Looking { .. } = self.look_mode {
            cursor.show_cursor();
            self.look_mode = LookMode::Free;
            log::debug!("mouse look released");
        }
        None
    }

    fn apply_movement(&mut self, input: &InputSnapshot, dt: f32) {
        let step = self.speed * dt;
        let mut displacement = Vector3::zero();

        if input.forward {
            displacement += self.orientation;
        }
        if input.back {
            displacement -= self.orientation;
        }
        if input.left || input.right {
            if let Some(right) = self.right() {
                if input.right {
                    displacement += right;
                }
                if input.left {
                    displacement -= right;
                }
            }
        }
        if input.up {
            displacement += self.up;
        }
        if input.down {
            displacement -= self.up;
        }

        self.position += displacement * step;
    }

    fn look(&mut self, input: &InputSnapshot, cursor: &impl CursorControl) -> Option<(f64, f64)> {
        let center = (self.width as f64 / 2.0, self.height as f64 / 2.0);

        let last_cursor = match self.look_mode {
            LookMode::Free => {
                cursor.hide_cursor();
                log::debug!("mouse look engaged");
                None
            }
            LookMode::Looking { last_cursor } => last_cursor,
        };

        let Some(last) = last_cursor else {
            let warped = cursor.warp_cursor(center.0, center.1).then_some(center);
            let anchor = warped.or(input.cursor).unwrap_or(center);
            self.orientation = DEFAULT_ORIENTATION;
            self.look_mode = LookMode::Looking {
                last_cursor: Some(anchor),
            };
            return warped;
        };

        let current = input.cursor.unwrap_or(last);
        let rot_x = self.sensitivity * (current.1 - last.1) as f32 / self.height;
        let rot_y = self.sensitivity * (current.0 - last.0) as f32 / self.width;

        self.rotate(rot_x, rot_y);

        let warped = cursor.warp_cursor(center.0, center.1).then_some(center);
        self.look_mode = LookMode::Looking {
            last_cursor: Some(warped.unwrap_or(current)),
        };
        warped
    }

    /// Pitches by `-pitch_degrees` about the strafe axis (rejected near the
    /// poles), then yaws by `-yaw_degrees` about up.
    fn rotate(&mut self, pitch_degrees: f32, yaw_degrees: f32) {
        if let Some(right) = self.right() {
            let pitch = Quaternion::from_axis_angle(right, Deg(-pitch_degrees));
            let pitched = pitch.rotate_vector(self.orientation);

            let from_up = Deg::from(pitched.angle(self.up));
            if (from_up.0 - 90.0).abs() <= MAX_PITCH_DEGREES {
                self.orientation = pitched;
            }
        }

        let yaw = Quaternion::from_axis_angle(self.up.normalize(), Deg(-yaw_degrees));
        self.orientation = yaw.rotate_vector(self.orientation);
    }
}

fn strafe_axis(orientation: Vector3<f32>, up: Vector3<f32>) -> Option<Vector3<f32>> {
    let axis = orientation.cross(up);
    (axis.magnitude2() > 1e-8).then(|| axis.normalize())
}
