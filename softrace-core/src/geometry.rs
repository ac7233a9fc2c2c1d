//! Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

use crate::math;

/// RGBA shade attached to a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::gray(255);
    pub const BLACK: Color = Color::gray(0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all channels set to `level`.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level, 255)
    }

    /// Perceived brightness in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A triangle face: three points in winding order plus a flat shade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [Point3<f64>; 3],
    pub shade: Color,
}

impl Triangle {
    pub fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>) -> Self {
        Self {
            points: [p0, p1, p2],
            shade: Color::default(),
        }
    }

    pub fn with_shade(mut self, shade: Color) -> Self {
        self.shade = shade;
        self
    }

    /// Unit face normal from the winding order, `None` when the triangle has
    /// no area.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let [p0, p1, p2] = &self.points;
        math::face_normal(p0, p1, p2)
    }

    /// Mean z of the three points, used as the painter's sort key.
    pub fn average_depth(&self) -> f64 {
        self.points.iter().map(|p| p.z).sum::<f64>() / 3.0
    }

    /// Apply `f` to every point, keeping the shade.
    pub fn map_points(&self, mut f: impl FnMut(&Point3<f64>) -> Point3<f64>) -> Self {
        Self {
            points: [f(&self.points[0]), f(&self.points[1]), f(&self.points[2])],
            shade: self.shade,
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned cube centred on the origin with outward-facing normals.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let corners = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        // Two counter-clockwise triangles per face, seen from outside.
        const FACES: [[usize; 3]; 12] = [
            [4, 5, 6], [4, 6, 7], // +z
            [0, 3, 2], [0, 2, 1], // -z
            [3, 7, 6], [3, 6, 2], // +y
            [0, 1, 5], [0, 5, 4], // -y
            [1, 2, 6], [1, 6, 5], // +x
            [0, 4, 7], [0, 7, 3], // -x
        ];

        let mut mesh = Self::with_capacity(FACES.len());
        for [a, b, c] in FACES {
            mesh.add_triangle(Triangle::new(corners[a], corners[b], corners[c]));
        }
        mesh
    }

    /// Square in the z = 0 plane facing -z, split into two triangles.
    pub fn quad(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(2);
        mesh.add_triangle(Triangle::new(
            Point3::new(-h, -h, 0.0),
            Point3::new(h, h, 0.0),
            Point3::new(h, -h, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Point3::new(-h, -h, 0.0),
            Point3::new(-h, h, 0.0),
            Point3::new(h, h, 0.0),
        ));
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.len(), 12);
        for tri in &cube.triangles {
            let normal = tri.normal().unwrap();
            let centroid = (tri.points[0].coords + tri.points[1].coords + tri.points[2].coords) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "inward face: {tri:?}");
        }
    }

    #[test]
    fn test_quad_faces_negative_z() {
        for tri in &Mesh::quad(2.0).triangles {
            let normal = tri.normal().unwrap();
            assert!((normal + Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_average_depth() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 6.0),
        );
        assert!((tri.average_depth() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_map_points_keeps_shade() {
        let tri = Triangle::new(Point3::origin(), Point3::origin(), Point3::origin())
            .with_shade(Color::gray(40));
        let moved = tri.map_points(|p| *p + Vector3::x());
        assert_eq!(moved.shade, Color::gray(40));
        assert_eq!(moved.points[2], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_gray_luminance() {
        assert!((Color::WHITE.luminance() - 1.0).abs() < 1e-9);
        assert_eq!(Color::BLACK.luminance(), 0.0);
    }
}
