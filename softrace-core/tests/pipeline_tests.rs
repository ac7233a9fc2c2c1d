//! End-to-end scenarios for the render pipeline: OBJ in, draw calls out.

use nalgebra::{Point3, Vector3};
use softrace_core::{Color, Input, Mesh, Renderer, RendererConfig, SceneError, Triangle, TriangleSink};
use std::f64::consts::PI;
use std::io::Write;
use tempfile::NamedTempFile;

const WIDTH: u32 = 80;
const HEIGHT: u32 = 40;

const QUAD_OBJ: &str = "\
# unit quad facing -z
v -1 -1 0
v  1 -1 0
v  1  1 0
v -1  1 0
f 1 3 2
f 1 4 3
";

/// Records every draw call in order.
#[derive(Default)]
struct Recorder {
    draws: Vec<([(f64, f64); 3], Color)>,
}

impl TriangleSink for Recorder {
    fn fill_triangle(&mut self, points: [(f64, f64); 3], color: Color) {
        self.draws.push((points, color));
    }
}

impl Recorder {
    fn centroid_x(&self, i: usize) -> f64 {
        self.draws[i].0.iter().map(|p| p.0).sum::<f64>() / 3.0
    }
}

fn write_obj(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".obj")
        .tempfile()
        .unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config() -> RendererConfig {
    RendererConfig::new(WIDTH, HEIGHT)
}

/// Config with the mesh left at the world origin, so view space equals
/// world space (up to the axis flip) for a camera at the origin.
fn origin_config() -> RendererConfig {
    RendererConfig {
        model_translation: Vector3::zeros(),
        ..config()
    }
}

fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

mod loading {
    use super::*;

    #[test]
    fn load_quad_from_file() {
        let file = write_obj(QUAD_OBJ);
        let renderer = Renderer::load(file.path(), &config()).unwrap();
        assert_eq!(renderer.mesh().len(), 2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = Renderer::load(std::path::Path::new("/no/such/mesh.obj"), &config()).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn bad_face_index_fails_fast() {
        let file = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n");
        let err = Renderer::load(file.path(), &config()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::FaceIndex {
                line: 4,
                index: 9,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = RendererConfig {
            near: -1.0,
            ..config()
        };
        let err = Renderer::new(Mesh::quad(2.0), &bad).unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));
    }
}

mod visibility {
    use super::*;

    #[test]
    fn quad_seen_from_front_draws_two() {
        let file = write_obj(QUAD_OBJ);
        let mut renderer = Renderer::load(file.path(), &config()).unwrap();
        let mut sink = Recorder::default();

        // Camera at the origin, quad translated to z = 5, looking along +z.
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.dispatched, 2);
        assert_eq!(stats.culled, 0);
        assert_eq!(sink.draws.len(), 2);
    }

    #[test]
    fn quad_seen_from_behind_draws_nothing() {
        let file = write_obj(QUAD_OBJ);
        let mut renderer = Renderer::load(file.path(), &config()).unwrap();
        renderer.camera_mut().position = Point3::new(0.0, 0.0, 10.0);
        renderer.camera_mut().set_yaw(PI);

        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.culled, 2);
        assert_eq!(stats.dispatched, 0);
        assert!(sink.draws.is_empty());
    }

    #[test]
    fn back_faces_never_dispatched() {
        let mut flipped = Mesh::new();
        for tri in &Mesh::quad(2.0).triangles {
            let [a, b, c] = tri.points;
            flipped.add_triangle(Triangle::new(a, c, b));
        }
        let mut renderer = Renderer::new(flipped, &config()).unwrap();
        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.culled, 2);
        assert!(sink.draws.is_empty());
    }

    #[test]
    fn cube_shows_only_front_face() {
        let mut renderer = Renderer::new(Mesh::cube(2.0), &config()).unwrap();
        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.considered, 12);
        assert_eq!(stats.culled, 10);
        assert_eq!(stats.dispatched, 2);
    }

    #[test]
    fn geometry_behind_camera_is_clipped() {
        let mut renderer = Renderer::new(Mesh::quad(2.0), &config()).unwrap();
        // Facing away from the quad: it still faces the camera position, but
        // lies entirely behind the near plane.
        renderer.camera_mut().set_yaw(PI);
        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.dispatched, 0);
    }

    #[test]
    fn walking_past_the_quad_hides_it() {
        let mut renderer = Renderer::new(Mesh::quad(2.0), &config()).unwrap();
        let forward = Input {
            forward: true,
            ..Input::default()
        };
        let mut sink = Recorder::default();
        let stats = renderer.tick(0.6, &forward, &mut sink);
        assert!((renderer.camera().position.z - 6.0).abs() < 1e-9);
        assert_eq!(stats.dispatched, 0);
    }
}

mod projection {
    use super::*;

    #[test]
    fn pinned_screen_coordinates() {
        // aspect = height / width = 0.5 scales x; fov 90 leaves y unscaled.
        // World (x, y, 5) maps to pixel (40 - 4x, 20 - 4y).
        let mut renderer = Renderer::new(Mesh::quad(2.0), &config()).unwrap();
        let mut sink = Recorder::default();
        renderer.render(&mut sink);

        assert_eq!(sink.draws.len(), 2);
        let (first, _) = sink.draws[0];
        assert_close(first[0], (44.0, 24.0));
        assert_close(first[1], (36.0, 16.0));
        assert_close(first[2], (36.0, 24.0));

        let (second, _) = sink.draws[1];
        assert_close(second[0], (44.0, 24.0));
        assert_close(second[1], (44.0, 16.0));
        assert_close(second[2], (36.0, 16.0));
    }

    #[test]
    fn flat_shading_uses_light() {
        // Quad normal is -z; light (1, 1, -1) gives dot = 1/sqrt(3).
        let mut renderer = Renderer::new(Mesh::quad(2.0), &config()).unwrap();
        let mut sink = Recorder::default();
        renderer.render(&mut sink);
        let expected = (255.0 / 3f64.sqrt()) as u8;
        for (_, color) in &sink.draws {
            assert_eq!(*color, Color::gray(expected));
        }
    }

    #[test]
    fn offscreen_parts_are_clipped_to_viewport() {
        // Large quad close to the camera overflows every screen edge.
        let config = RendererConfig {
            model_translation: Vector3::new(0.0, 0.0, 1.0),
            ..config()
        };
        let mut renderer = Renderer::new(Mesh::quad(20.0), &config).unwrap();
        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert!(stats.dispatched > 2);
        for (points, _) in &sink.draws {
            for &(x, y) in points {
                assert!((-1e-9..=(WIDTH - 1) as f64 + 1e-9).contains(&x), "x = {x}");
                assert!((-1e-9..=(HEIGHT - 1) as f64 + 1e-9).contains(&y), "y = {y}");
            }
        }
    }
}

mod near_clip {
    use super::*;

    const NEAR: f64 = 0.1;

    fn single(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(a, b, c));
        mesh
    }

    #[test]
    fn one_vertex_in_front_gives_one_triangle() {
        let mesh = single(
            Point3::new(0.0, 0.0, NEAR * 2.0),
            Point3::new(0.0, 0.01, NEAR / 2.0),
            Point3::new(0.01, 0.0, NEAR / 2.0),
        );
        let mut renderer = Renderer::new(mesh, &origin_config()).unwrap();
        let stats = renderer.render(&mut Recorder::default());
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.dispatched, 1);
    }

    #[test]
    fn one_vertex_behind_gives_two_triangles() {
        let mesh = single(
            Point3::new(0.0, 0.0, NEAR / 2.0),
            Point3::new(0.0, 0.01, NEAR * 2.0),
            Point3::new(0.01, 0.0, NEAR * 2.0),
        );
        let mut renderer = Renderer::new(mesh, &origin_config()).unwrap();
        let stats = renderer.render(&mut Recorder::default());
        assert_eq!(stats.culled, 0);
        assert_eq!(stats.dispatched, 2);
    }
}

mod depth_order {
    use super::*;

    fn facing_triangle(cx: f64, z: f64) -> Triangle {
        let h = 0.25;
        Triangle::new(
            Point3::new(cx - h, -h, z),
            Point3::new(cx + h, h, z),
            Point3::new(cx + h, -h, z),
        )
    }

    #[test]
    fn far_triangle_drawn_first() {
        let mut mesh = Mesh::new();
        // Near triangle lands left of centre on screen, far one right.
        mesh.add_triangle(facing_triangle(1.0, 2.0));
        mesh.add_triangle(facing_triangle(-2.0, 8.0));

        let mut renderer = Renderer::new(mesh, &origin_config()).unwrap();
        let mut sink = Recorder::default();
        let stats = renderer.render(&mut sink);
        assert_eq!(stats.dispatched, 2);

        assert!(sink.centroid_x(0) > 40.0, "far triangle should come first");
        assert!(sink.centroid_x(1) < 40.0, "near triangle should come last");

        let depths: Vec<f64> = renderer
            .frame_triangles()
            .iter()
            .map(Triangle::average_depth)
            .collect();
        assert!(depths[0] > depths[1]);
    }
}
