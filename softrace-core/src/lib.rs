//! softrace core library: a CPU-only triangle pipeline
//!
//! Meshes are transformed from model space to screen pixels, back-face
//! culled, flat shaded, clipped against the near plane and the screen edges,
//! and handed back to front to a caller-supplied [`TriangleSink`]. Nothing
//! here draws pixels or owns a window.

pub mod camera;
pub mod clip;
pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod pipeline;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, Input};
pub use clip::{clip_against_plane, Clipped, ScreenClipper};
pub use config::RendererConfig;
pub use error::SceneError;
pub use geometry::{Color, Mesh, Triangle};
pub use math::Plane;
pub use pipeline::{FrameStats, Renderer, TriangleSink};
pub use transform::{ModelTransform, RotationState, Transform};
