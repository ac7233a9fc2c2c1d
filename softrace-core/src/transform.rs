//! 4x4 transform builders and model rotation state
//!
//! Every matrix here is laid out for row vectors: a point is transformed as
//! `v * M`, translation lives in the bottom row, and `a * b` applies `a`
//! first. Matrices are passed to [`Transform::apply`], never multiplied from
//! the left by a column vector.
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Placement of the mesh in the world: rotation first, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub rotation: RotationState,
    pub translation: Vector3<f64>,
}

impl ModelTransform {
    pub fn new(translation: Vector3<f64>) -> Self {
        Self {
            rotation: RotationState::zero(),
            translation,
        }
    }

    /// World matrix: Z, then Y, then X rotation, then translation.
    pub fn world_matrix(&self) -> Matrix4<f64> {
        Transform::rotation_matrix(&self.rotation)
            * Transform::translation(self.translation.x, self.translation.y, self.translation.z)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn rotation_x(radians: f64) -> Matrix4<f64> {
        let (s, c) = radians.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0,   c,   s, 0.0,
            0.0,  -s,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn rotation_y(radians: f64) -> Matrix4<f64> {
        let (s, c) = radians.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
              c, 0.0,   s, 0.0,
            0.0, 1.0, 0.0, 0.0,
             -s, 0.0,   c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    pub fn rotation_z(radians: f64) -> Matrix4<f64> {
        let (s, c) = radians.sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
              c,   s, 0.0, 0.0,
             -s,   c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        m
    }

    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f64> {
        Self::rotation_z(rotation.z) * Self::rotation_y(rotation.y) * Self::rotation_x(rotation.x)
    }

    /// Create a translation matrix
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m[(3, 0)] = x;
        m[(3, 1)] = y;
        m[(3, 2)] = z;
        m
    }

    /// Perspective projection. `fov` is in degrees and `aspect` is applied to
    /// x, so callers pass `height / width`. The output `w` carries view-space
    /// z for the perspective divide.
    pub fn projection(fov: f64, aspect: f64, near: f64, far: f64) -> Matrix4<f64> {
        let f = 1.0 / (fov.to_radians() * 0.5).tan();
        let mut m = Matrix4::zeros();
        m[(0, 0)] = aspect * f;
        m[(1, 1)] = f;
        m[(2, 2)] = far / (far - near);
        m[(3, 2)] = -far * near / (far - near);
        m[(2, 3)] = 1.0;
        m
    }

    /// Camera-to-world matrix for an observer at `pos` looking at `target`.
    ///
    /// Rows are right, up, forward, position. `target` must differ from
    /// `pos`, and `up` must not be parallel to the viewing direction.
    pub fn point_at(pos: &Point3<f64>, target: &Point3<f64>, up: &Vector3<f64>) -> Matrix4<f64> {
        let forward = (target - pos).normalize();
        let new_up = (up - forward * up.dot(&forward)).normalize();
        let right = new_up.cross(&forward);

        #[rustfmt::skip]
        let m = Matrix4::new(
            right.x,   right.y,   right.z,   0.0,
            new_up.x,  new_up.y,  new_up.z,  0.0,
            forward.x, forward.y, forward.z, 0.0,
            pos.x,     pos.y,     pos.z,     1.0,
        );
        m
    }

    /// Inverse of a rotation + translation matrix.
    ///
    /// Only valid when the upper-left 3x3 block is orthonormal (no scale or
    /// shear), e.g. the output of [`Transform::point_at`]. It is not a general
    /// inverse: anything else yields a wrong matrix without any error.
    pub fn quick_inverse(m: &Matrix4<f64>) -> Matrix4<f64> {
        let (px, py, pz) = (m[(3, 0)], m[(3, 1)], m[(3, 2)]);
        let tx = -(px * m[(0, 0)] + py * m[(0, 1)] + pz * m[(0, 2)]);
        let ty = -(px * m[(1, 0)] + py * m[(1, 1)] + pz * m[(1, 2)]);
        let tz = -(px * m[(2, 0)] + py * m[(2, 1)] + pz * m[(2, 2)]);

        #[rustfmt::skip]
        let inv = Matrix4::new(
            m[(0, 0)], m[(1, 0)], m[(2, 0)], 0.0,
            m[(0, 1)], m[(1, 1)], m[(2, 1)], 0.0,
            m[(0, 2)], m[(1, 2)], m[(2, 2)], 0.0,
            tx,        ty,        tz,        1.0,
        );
        inv
    }

    /// Row vector times matrix.
    pub fn apply(v: &Vector4<f64>, m: &Matrix4<f64>) -> Vector4<f64> {
        (v.transpose() * m).transpose()
    }

    /// Transform a position by an affine matrix (w stays 1).
    pub fn point(p: &Point3<f64>, m: &Matrix4<f64>) -> Point3<f64> {
        Point3::from(Self::apply(&p.to_homogeneous(), m).xyz())
    }

    /// Transform a direction; translation is ignored.
    pub fn direction(v: &Vector3<f64>, m: &Matrix4<f64>) -> Vector3<f64> {
        Self::apply(&v.to_homogeneous(), m).xyz()
    }
}
