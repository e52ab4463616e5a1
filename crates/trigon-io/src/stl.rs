use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::debug;

use crate::geometry::{Geometry, MESH_RGB};

const HEADER_LEN: usize = 80;
const FACE_LEN: usize = 50;

pub fn read_stl(path: impl AsRef<Path>) -> Result<Geometry> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("read STL file {}", path.display()))?;
    parse_stl(&bytes).with_context(|| format!("parse STL file {}", path.display()))
}

/// Reads, centers, computes normals and paints the default color: the
/// geometry the viewer expects to receive.
pub fn load_geometry(path: impl AsRef<Path>) -> Result<Geometry> {
    let path = path.as_ref();
    let mut geometry = read_stl(path)?;
    geometry.compute_vertex_normals();
    let offset = geometry.center();
    geometry.paint_uniform(MESH_RGB);
    debug!(
        path = %path.display(),
        faces = geometry.face_count(),
        offset = ?offset,
        "geometry loaded"
    );
    Ok(geometry)
}

pub fn parse_stl(bytes: &[u8]) -> Result<Geometry> {
    let positions = if is_binary(bytes) {
        parse_binary(bytes)?
    } else {
        let text = std::str::from_utf8(bytes).context("STL is neither binary nor UTF-8 text")?;
        parse_ascii(text)?
    };
    Ok(Geometry::from_positions(positions)?)
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = face_count(bytes);
    HEADER_LEN + 4 + count * FACE_LEN == bytes.len()
}

fn face_count(bytes: &[u8]) -> usize {
    let raw = [
        bytes[HEADER_LEN],
        bytes[HEADER_LEN + 1],
        bytes[HEADER_LEN + 2],
        bytes[HEADER_LEN + 3],
    ];
    u32::from_le_bytes(raw) as usize
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<f64>> {
    let count = face_count(bytes);
    let mut positions = Vec::with_capacity(count * 9);
    for face in bytes[HEADER_LEN + 4..].chunks_exact(FACE_LEN) {
        // skip the stored normal (12 bytes) and the trailing attribute word
        for value in face[12..48].chunks_exact(4) {
            let value = f32::from_le_bytes([value[0], value[1], value[2], value[3]]);
            positions.push(value as f64);
        }
    }
    Ok(positions)
}

fn parse_ascii(text: &str) -> Result<Vec<f64>> {
    let mut positions = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        for axis in ["x", "y", "z"] {
            let Some(token) = tokens.next() else {
                bail!("line {}: vertex is missing its {axis} coordinate", line_no + 1);
            };
            let value: f64 = token
                .parse()
                .with_context(|| format!("line {}: invalid {axis} coordinate", line_no + 1))?;
            positions.push(value);
        }
    }
    if positions.is_empty() && !text.trim_start().starts_with("solid") {
        bail!("unrecognised STL content");
    }
    Ok(positions)
}
