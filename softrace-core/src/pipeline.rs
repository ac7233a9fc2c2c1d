//! Per-frame render pipeline
//!
//! Each frame runs the mesh through, in order: world transform, back-face
//! cull, flat shading, view transform, near-plane clip, projection and
//! perspective divide, screen mapping, screen-edge clip, depth sort, and
//! finally dispatch to a [`TriangleSink`].
use nalgebra::{Matrix4, Point3, Vector3};
use std::path::Path;

use crate::camera::{Camera, Input};
use crate::clip::{clip_against_plane, ScreenClipper};
use crate::config::RendererConfig;
use crate::error::SceneError;
use crate::geometry::{Color, Mesh, Triangle};
use crate::math::Plane;
use crate::obj;
use crate::transform::{ModelTransform, Transform};

/// Minimum light level so faces turned from the light stay visible.
pub const AMBIENT_FLOOR: f64 = 0.1;

/// Receives the final screen-space triangles, back to front.
pub trait TriangleSink {
    /// Fill the triangle with corners `points` (pixel coordinates) in `color`.
    fn fill_triangle(&mut self, points: [(f64, f64); 3], color: Color);
}

impl<F: FnMut([(f64, f64); 3], Color)> TriangleSink for F {
    fn fill_triangle(&mut self, points: [(f64, f64); 3], color: Color) {
        self(points, color)
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Mesh triangles entering the pipeline.
    pub considered: usize,
    /// Dropped by back-face culling.
    pub culled: usize,
    /// Dropped because they have no area.
    pub degenerate: usize,
    /// Triangles handed to the sink after all clipping.
    pub dispatched: usize,
}

/// Owns the mesh, camera and per-frame buffers of one scene.
#[derive(Debug, Clone)]
pub struct Renderer {
    mesh: Mesh,
    camera: Camera,
    model: ModelTransform,
    light: Vector3<f64>,
    width: u32,
    height: u32,
    projection: Matrix4<f64>,
    near_plane: Plane,
    screen_clipper: ScreenClipper,
    projected: Vec<Triangle>,
    frame: Vec<Triangle>,
}

impl Renderer {
    pub fn new(mesh: Mesh, config: &RendererConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let camera = Camera::new(config.speed, config.fov, config.near, config.far);
        let projection = camera.projection_matrix(config.screen_width, config.screen_height);
        let near_plane = Plane::new(Point3::new(0.0, 0.0, config.near), Vector3::z());

        log::debug!(
            "Renderer {}x{}, fov {}, near {}, far {}, {} triangles",
            config.screen_width,
            config.screen_height,
            config.fov,
            config.near,
            config.far,
            mesh.len()
        );

        Ok(Self {
            mesh,
            camera,
            model: ModelTransform::new(config.model_translation),
            light: config.light_direction.normalize(),
            width: config.screen_width,
            height: config.screen_height,
            projection,
            near_plane,
            screen_clipper: ScreenClipper::new(config.screen_width, config.screen_height),
            projected: Vec::new(),
            frame: Vec::new(),
        })
    }

    /// Load an OBJ mesh from `path` and build a renderer for it.
    pub fn load(path: &Path, config: &RendererConfig) -> Result<Self, SceneError> {
        let mesh = obj::load(path)?;
        Self::new(mesh, config)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn model(&self) -> &ModelTransform {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ModelTransform {
        &mut self.model
    }

    pub fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Triangles dispatched by the last [`render`](Self::render), in draw order.
    pub fn frame_triangles(&self) -> &[Triangle] {
        &self.frame
    }

    /// Advance the camera by one frame of input.
    pub fn update(&mut self, dt: f64, input: &Input) {
        self.camera.update(dt, input);
    }

    /// Update from input, then render.
    pub fn tick<S: TriangleSink>(&mut self, dt: f64, input: &Input, sink: &mut S) -> FrameStats {
        self.update(dt, input);
        self.render(sink)
    }

    /// Render the mesh from the current camera and dispatch the visible
    /// triangles to `sink`, farthest first.
    pub fn render<S: TriangleSink>(&mut self, sink: &mut S) -> FrameStats {
        self.projected.clear();
        self.frame.clear();

        let world = self.model.world_matrix();
        let view = self.camera.view_matrix();
        let mut stats = FrameStats {
            considered: self.mesh.len(),
            ..FrameStats::default()
        };

        for triangle in &self.mesh.triangles {
            let transformed = triangle.map_points(|p| Transform::point(p, &world));

            let Some(normal) = transformed.normal() else {
                stats.degenerate += 1;
                continue;
            };
            let camera_ray = transformed.points[0] - self.camera.position;
            if normal.dot(&camera_ray) >= 0.0 {
                stats.culled += 1;
                continue;
            }

            let lit = transformed.with_shade(shade_for(&self.light, &normal));
            let viewed = lit.map_points(|p| Transform::point(p, &view));

            for piece in clip_against_plane(&self.near_plane, &viewed).iter() {
                if let Some(screen) = project_to_screen(piece, &self.projection, self.width, self.height) {
                    self.projected.push(screen);
                }
            }
        }

        for triangle in &self.projected {
            self.screen_clipper.clip_into(triangle, &mut self.frame);
        }

        sort_back_to_front(&mut self.frame);

        for triangle in &self.frame {
            let [a, b, c] = triangle.points;
            sink.fill_triangle([(a.x, a.y), (b.x, b.y), (c.x, c.y)], triangle.shade);
        }
        stats.dispatched = self.frame.len();

        log::trace!(
            "frame: {} considered, {} culled, {} degenerate, {} dispatched",
            stats.considered,
            stats.culled,
            stats.degenerate,
            stats.dispatched
        );
        stats
    }
}

/// Grayscale shade for a face with unit `normal` under unit `light`.
pub fn shade_for(light: &Vector3<f64>, normal: &Vector3<f64>) -> Color {
    let dp = light.dot(normal).max(AMBIENT_FLOOR);
    Color::gray((255.0 * dp).abs().min(255.0) as u8)
}

/// Project a view-space triangle to pixel coordinates. The z of each result
/// point keeps the normalized depth for sorting.
///
/// Returns `None` if any vertex lands on `w = 0`, which the near-plane clip
/// rules out for well-formed input.
pub fn project_to_screen(
    triangle: &Triangle,
    projection: &Matrix4<f64>,
    width: u32,
    height: u32,
) -> Option<Triangle> {
    let half_w = 0.5 * width as f64;
    let half_h = 0.5 * height as f64;

    let mut points = [Point3::origin(); 3];
    for (slot, p) in points.iter_mut().zip(triangle.points.iter()) {
        let clip = Transform::apply(&p.to_homogeneous(), projection);
        let ndc = Point3::from_homogeneous(clip)?;
        *slot = Point3::new((ndc.x + 1.0) * half_w, (ndc.y + 1.0) * half_h, ndc.z);
    }

    Some(Triangle {
        points,
        shade: triangle.shade,
    })
}

/// Painter's order: largest average depth first. Stable, so equal depths
/// keep mesh order.
pub fn sort_back_to_front(triangles: &mut [Triangle]) {
    triangles.sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));
}
