use std::path::PathBuf;

/// Errors raised while loading a mesh or building a renderer.
///
/// Nothing in the per-frame pipeline returns an error; degenerate geometry
/// is dropped there instead.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Mesh file missing or unreadable.
    #[error("failed to read mesh {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `v` or `f` record could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A face that is not three plain vertex indices (quads, `v/vt/vn`).
    #[error("line {line}: only triangular faces with plain vertex indices are supported")]
    UnsupportedFace { line: usize },

    /// A face references a vertex that was not declared before it.
    #[error("line {line}: face references vertex {index} but only {vertex_count} are declared")]
    FaceIndex {
        line: usize,
        index: usize,
        vertex_count: usize,
    },

    /// Renderer construction parameters out of range.
    #[error("invalid renderer configuration: {0}")]
    InvalidConfig(String),
}
