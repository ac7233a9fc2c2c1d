//! Loader for the `v` / `f` subset of the OBJ format
//!
//! Vertices are declared with `v <x> <y> <z>` and triangular faces with
//! `f <i> <j> <k>` using 1-based indices into the vertices declared so far.
//! Comments, blank lines and any other record type are skipped.
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{space0, space1, u32 as index},
    combinator::map,
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::SceneError;
use crate::geometry::{Mesh, Triangle};

/// One parsed record.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Record {
    Vertex(Point3<f64>),
    Face([u32; 3]),
}

/// Read and parse an OBJ file.
pub fn load(path: &Path) -> Result<Mesh, SceneError> {
    let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&text)?;
    log::info!(
        "Loaded mesh {}: {} triangles",
        path.display(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Parse OBJ text into a mesh, failing on the first malformed record.
pub fn parse_obj(input: &str) -> Result<Mesh, SceneError> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut mesh = Mesh::new();

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match text.split_whitespace().next() {
            Some("v") | Some("f") => {}
            Some(other) => {
                log::debug!("line {}: skipping `{}` record", line, other);
                continue;
            }
            None => continue,
        }

        match parse_record(text, line)? {
            Record::Vertex(v) => vertices.push(v),
            Record::Face(indices) => {
                let mut points = [Point3::origin(); 3];
                for (slot, &idx) in points.iter_mut().zip(indices.iter()) {
                    *slot = resolve(idx as usize, &vertices, line)?;
                }
                mesh.add_triangle(Triangle::new(points[0], points[1], points[2]));
            }
        }
    }

    Ok(mesh)
}

fn resolve(index: usize, vertices: &[Point3<f64>], line: usize) -> Result<Point3<f64>, SceneError> {
    index
        .checked_sub(1)
        .and_then(|i| vertices.get(i))
        .copied()
        .ok_or(SceneError::FaceIndex {
            line,
            index,
            vertex_count: vertices.len(),
        })
}

fn parse_record(text: &str, line: usize) -> Result<Record, SceneError> {
    let (rest, record) = record(text).map_err(|e| {
        // A face whose first index carries `/` attributes fails inside the
        // index list; report it as an unsupported face, not a syntax error.
        if text.starts_with('f') && text.contains('/') {
            SceneError::UnsupportedFace { line }
        } else {
            SceneError::Parse {
                line,
                message: format!("malformed record `{}`: {:?}", text, e),
            }
        }
    })?;

    if !rest.trim().is_empty() {
        return Err(match record {
            Record::Face(_) => SceneError::UnsupportedFace { line },
            Record::Vertex(_) => SceneError::Parse {
                line,
                message: format!("unexpected trailing input `{}`", rest.trim()),
            },
        });
    }

    Ok(record)
}

fn record(input: &str) -> IResult<&str, Record> {
    alt((vertex, face))(input)
}

fn vertex(input: &str) -> IResult<&str, Record> {
    map(
        preceded(
            tag("v"),
            tuple((
                preceded(space1, double),
                preceded(space1, double),
                preceded(space1, double),
            )),
        ),
        |(x, y, z)| Record::Vertex(Point3::new(x, y, z)),
    )(input)
}

fn face(input: &str) -> IResult<&str, Record> {
    map(
        preceded(
            tag("f"),
            tuple((
                preceded(space1, index),
                preceded(space1, index),
                terminated(preceded(space1, index), space0),
            )),
        ),
        |(a, b, c)| Record::Face([a, b, c]),
    )(input)
}
