//! Triangle clipping against planes
//!
//! [`clip_against_plane`] is a Sutherland-Hodgman pass specialised to one
//! triangle: the surviving polygon has at most four corners, so it always
//! fits in two output triangles. It keeps no state between calls.
//!
//! [`ScreenClipper`] runs a triangle through a fixed list of planes with two
//! fixed-capacity buffers that swap roles after every plane.
use heapless::Vec as FixedVec;
use nalgebra::{Point3, Vector3};

use crate::geometry::Triangle;
use crate::math::{intersect_plane, Plane};

/// Result of clipping one triangle against one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clipped {
    /// Every vertex was outside.
    None,
    /// Either the untouched input or the trimmed corner.
    One(Triangle),
    /// The two halves of the quadrilateral left after cutting one corner off.
    Two(Triangle, Triangle),
}

impl Clipped {
    pub fn len(&self) -> usize {
        match self {
            Clipped::None => 0,
            Clipped::One(_) => 1,
            Clipped::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::None)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        let (a, b) = match self {
            Clipped::None => (None, None),
            Clipped::One(t) => (Some(t), None),
            Clipped::Two(t1, t2) => (Some(t1), Some(t2)),
        };
        a.into_iter().chain(b)
    }
}

/// Clip `triangle` against `plane`, keeping the part on the side the normal
/// points to. Points exactly on the plane count as inside.
///
/// Emitted triangles carry the input shade and keep the input winding.
pub fn clip_against_plane(plane: &Plane, triangle: &Triangle) -> Clipped {
    let [p0, p1, p2] = triangle.points;
    let inside = [
        plane.distance_to(&p0) >= 0.0,
        plane.distance_to(&p1) >= 0.0,
        plane.distance_to(&p2) >= 0.0,
    ];
    let inside_count = inside.iter().filter(|&&i| i).count();
    let shade = triangle.shade;
    let pts = triangle.points;

    match inside_count {
        0 => Clipped::None,
        3 => Clipped::One(*triangle),
        1 => {
            // Rotate so the lone inside vertex comes first; the other two
            // follow in winding order.
            let k = inside.iter().position(|&i| i).unwrap_or(0);
            let keep = pts[k];
            let next = pts[(k + 1) % 3];
            let prev = pts[(k + 2) % 3];
            let t = Triangle::new(
                keep,
                intersect_plane(plane, &keep, &next),
                intersect_plane(plane, &keep, &prev),
            );
            Clipped::One(t.with_shade(shade))
        }
        _ => {
            // Inside vertices stay in index order; each cut lies on the edge
            // from that inside vertex to the outside one.
            let out = inside.iter().position(|&i| !i).unwrap_or(0);
            let (in0, in1) = match out {
                0 => (pts[1], pts[2]),
                1 => (pts[0], pts[2]),
                _ => (pts[0], pts[1]),
            };
            let o = pts[out];
            let cut0 = intersect_plane(plane, &in0, &o);
            let cut1 = intersect_plane(plane, &in1, &o);
            let (first, second) = if out == 1 {
                // Quad runs in0, cut0, cut1, in1.
                (Triangle::new(in0, cut0, in1), Triangle::new(cut0, cut1, in1))
            } else {
                (Triangle::new(in0, in1, cut0), Triangle::new(in1, cut1, cut0))
            };
            Clipped::Two(first.with_shade(shade), second.with_shade(shade))
        }
    }
}

/// Upper bound on fragments from one triangle after the four screen edges.
pub const MAX_SCREEN_FRAGMENTS: usize = 16;

/// The four screen boundary planes, inside facing the visible area.
pub fn screen_edges(width: u32, height: u32) -> [Plane; 4] {
    let right = width.saturating_sub(1) as f64;
    let bottom = height.saturating_sub(1) as f64;
    [
        // top
        Plane::new(Point3::origin(), Vector3::y()),
        // bottom
        Plane::new(Point3::new(0.0, bottom, 0.0), -Vector3::y()),
        // left
        Plane::new(Point3::origin(), Vector3::x()),
        // right
        Plane::new(Point3::new(right, 0.0, 0.0), -Vector3::x()),
    ]
}

/// Clips screen-space triangles against the viewport edges.
///
/// Each triangle is pushed into the read buffer, clipped against one edge
/// into the write buffer, and the buffers are swapped before the next edge.
/// Every pass at most doubles the count, so four edges never exceed
/// [`MAX_SCREEN_FRAGMENTS`].
#[derive(Debug, Clone)]
pub struct ScreenClipper {
    edges: [Plane; 4],
    read: FixedVec<Triangle, MAX_SCREEN_FRAGMENTS>,
    write: FixedVec<Triangle, MAX_SCREEN_FRAGMENTS>,
}

impl ScreenClipper {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            edges: screen_edges(width, height),
            read: FixedVec::new(),
            write: FixedVec::new(),
        }
    }

    pub fn edges(&self) -> &[Plane; 4] {
        &self.edges
    }

    /// Clip `triangle` against all four edges and append the survivors to
    /// `out`. Returns how many were appended.
    pub fn clip_into(&mut self, triangle: &Triangle, out: &mut Vec<Triangle>) -> usize {
        self.read.clear();
        // Cannot fail: the buffer was just cleared.
        let _ = self.read.push(*triangle);

        for edge in &self.edges {
            self.write.clear();
            for tri in self.read.iter() {
                for piece in clip_against_plane(edge, tri).iter() {
                    if self.write.push(*piece).is_err() {
                        log::warn!("screen clip buffer full, dropping fragment");
                    }
                }
            }
            core::mem::swap(&mut self.read, &mut self.write);
            if self.read.is_empty() {
                return 0;
            }
        }

        out.extend(self.read.iter().copied());
        self.read.len()
    }
}
