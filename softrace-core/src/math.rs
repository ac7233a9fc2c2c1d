//! Vector helpers and planes
//!
//! Positions are `Point3` (w = 1 when lifted to homogeneous form) and
//! directions are `Vector3` (w = 0). Plain arithmetic, dot, cross, norm and
//! normalization come straight from nalgebra; this module adds the plane
//! operations the clipper needs.
use nalgebra::{Point3, Vector3};

/// Tolerance used for degenerate-geometry checks.
pub const EPSILON: f64 = 1e-9;

/// An oriented plane. The side the normal points toward is "inside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3<f64>,
    normal: Vector3<f64>,
}

impl Plane {
    /// Build a plane through `point`. The normal is normalized here so every
    /// distance computed against the plane is a true signed distance.
    ///
    /// `normal` must be non-zero.
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Signed distance from `p` to the plane, positive on the inside.
    pub fn distance_to(&self, p: &Point3<f64>) -> f64 {
        distance_to_plane(p, self)
    }
}

/// Signed distance from `p` to `plane`.
pub fn distance_to_plane(p: &Point3<f64>, plane: &Plane) -> f64 {
    plane.normal.dot(&p.coords) - plane.normal.dot(&plane.point.coords)
}

/// Point where the segment `start -> end` crosses `plane`.
///
/// A segment parallel to the plane has no single crossing; `start` is
/// returned in that case. The clipper only calls this for segments whose
/// endpoints lie on opposite sides, where the denominator is never zero.
pub fn intersect_plane(plane: &Plane, start: &Point3<f64>, end: &Point3<f64>) -> Point3<f64> {
    let n = plane.normal;
    let plane_d = -n.dot(&plane.point.coords);
    let ad = start.coords.dot(&n);
    let bd = end.coords.dot(&n);
    let denom = bd - ad;
    if denom.abs() < EPSILON {
        return *start;
    }
    let t = (-plane_d - ad) / denom;
    *start + (*end - *start) * t
}

/// Unit normal of the triangle `(p0, p1, p2)`, computed as
/// `(p1 - p0) x (p2 - p0)`. Returns `None` for zero-area triangles.
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Option<Vector3<f64>> {
    let line1 = p1 - p0;
    let line2 = p2 - p0;
    line1.cross(&line2).try_normalize(EPSILON)
}
