//! Camera state and the per-frame input controller
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Yaw change per frame while a turn key is held. Not scaled by frame time.
pub const TURN_STEP: f64 = 0.1;

/// Snapshot of the movement keys held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub up: bool,
    pub down: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl Input {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// First-person camera: a position, a yaw around the y axis and a fixed up
/// vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    yaw: f64,
    look_direction: Vector3<f64>,
    pub up: Vector3<f64>,
    pub speed: f64,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(speed: f64, fov: f64, near: f64, far: f64) -> Self {
        let mut camera = Self {
            position: Point3::origin(),
            yaw: 0.0,
            look_direction: Vector3::z(),
            // Screen y grows downward.
            up: Vector3::new(0.0, -1.0, 0.0),
            speed,
            fov,
            near,
            far,
        };
        camera.refresh_look_direction();
        camera
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f64) {
        self.yaw = yaw;
        self.refresh_look_direction();
    }

    pub fn look_direction(&self) -> &Vector3<f64> {
        &self.look_direction
    }

    /// Apply one frame of input. Movement uses the look direction from the
    /// previous frame and is scaled by `speed * dt`; turning is a fixed step.
    pub fn update(&mut self, dt: f64, input: &Input) {
        let step = self.speed * dt;
        let forward = self.look_direction * step;
        let strafe = self.look_direction.cross(&self.up) * step;

        if input.forward {
            self.position += forward;
        }
        if input.backward {
            self.position -= forward;
        }
        if input.up {
            self.position.y += step;
        }
        if input.down {
            self.position.y -= step;
        }
        if input.strafe_left {
            self.position += strafe;
        }
        if input.strafe_right {
            self.position -= strafe;
        }
        if input.turn_left {
            self.yaw -= TURN_STEP;
        }
        if input.turn_right {
            self.yaw += TURN_STEP;
        }

        self.refresh_look_direction();
    }

    /// World-to-view matrix for the current position and heading.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let target = self.position + self.look_direction;
        let camera = Transform::point_at(&self.position, &target, &self.up);
        Transform::quick_inverse(&camera)
    }

    /// Projection matrix for a `width` x `height` viewport. The aspect factor
    /// is height / width and scales x.
    pub fn projection_matrix(&self, width: u32, height: u32) -> Matrix4<f64> {
        let aspect = height as f64 / width as f64;
        Transform::projection(self.fov, aspect, self.near, self.far)
    }

    fn refresh_look_direction(&mut self) {
        self.look_direction = Transform::direction(&Vector3::z(), &Transform::rotation_y(self.yaw));
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(10.0, 90.0, 0.1, 1000.0)
    }
}
