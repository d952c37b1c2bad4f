//! STL reading (binary and ASCII).
//!
//! Only vertex positions are kept; normals and attributes are ignored. That
//! is all the planner needs to compute exact extents before and after
//! rotation.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::DVec3;
use hullsprite_spec::{BoundingExtent, ExtentError, OrientationPlan};
use thiserror::Error;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// Errors raised while reading a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("truncated binary STL {path}: expected {expected} bytes, found {actual}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("malformed ASCII STL {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("mesh {path} has no vertices")]
    Empty { path: PathBuf },

    #[error("mesh {path} is degenerate: {source}")]
    Degenerate {
        path: PathBuf,
        #[source]
        source: ExtentError,
    },
}

/// Vertex positions of an STL mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct StlMesh {
    pub path: PathBuf,
    pub vertices: Vec<[f64; 3]>,
}

impl StlMesh {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Axis-aligned extent of the mesh as loaded.
    pub fn extent(&self) -> Result<BoundingExtent, MeshError> {
        self.extent_of(self.vertices.iter().map(|v| DVec3::from_array(*v)))
    }

    /// Exact extent after rotating every vertex with the plan.
    pub fn rotated_extent(&self, plan: &OrientationPlan) -> Result<BoundingExtent, MeshError> {
        let m = plan.rotation_matrix();
        self.extent_of(self.vertices.iter().map(|v| m.mul_vec3(DVec3::from_array(*v))))
    }

    fn extent_of(&self, points: impl Iterator<Item = DVec3>) -> Result<BoundingExtent, MeshError> {
        let (min, max) = points
            .fold(None, |acc: Option<(DVec3, DVec3)>, p| match acc {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })
            .ok_or_else(|| MeshError::Empty {
                path: self.path.clone(),
            })?;
        BoundingExtent::from_corners(min.to_array(), max.to_array()).map_err(|source| {
            MeshError::Degenerate {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// Reads an STL file, detecting binary or ASCII encoding.
pub fn read_stl(path: &Path) -> Result<StlMesh, MeshError> {
    let bytes = std::fs::read(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_stl(&bytes, path)
}

/// Parses STL bytes. `path` is used for error messages.
pub fn parse_stl(bytes: &[u8], path: &Path) -> Result<StlMesh, MeshError> {
    let vertices = if is_binary(bytes) {
        parse_binary(bytes, path)?
    } else if looks_ascii(bytes) {
        parse_ascii(bytes, path)?
    } else {
        // Not ASCII and the size disagrees with the triangle count.
        parse_binary(bytes, path)?
    };

    if vertices.is_empty() {
        return Err(MeshError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(StlMesh {
        path: path.to_path_buf(),
        vertices,
    })
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    String::from_utf8_lossy(head).trim_start().starts_with("solid")
}

// Some exporters write binary files whose header starts with "solid", so the
// size check decides first.
fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let mut cursor = Cursor::new(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    match cursor.read_u32::<LittleEndian>() {
        Ok(count) => bytes.len() == HEADER_LEN + 4 + count as usize * TRIANGLE_LEN,
        Err(_) => false,
    }
}

fn parse_binary(bytes: &[u8], path: &Path) -> Result<Vec<[f64; 3]>, MeshError> {
    let truncated = |expected: usize| MeshError::Truncated {
        path: path.to_path_buf(),
        expected,
        actual: bytes.len(),
    };
    if bytes.len() < HEADER_LEN + 4 {
        return Err(truncated(HEADER_LEN + 4));
    }

    let mut cursor = Cursor::new(&bytes[HEADER_LEN..]);
    let count = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| truncated(HEADER_LEN + 4))? as usize;
    let expected = HEADER_LEN + 4 + count * TRIANGLE_LEN;
    if bytes.len() < expected {
        return Err(truncated(expected));
    }

    let mut vertices = Vec::with_capacity(count * 3);
    for _ in 0..count {
        // normal
        for _ in 0..3 {
            cursor
                .read_f32::<LittleEndian>()
                .map_err(|_| truncated(expected))?;
        }
        for _ in 0..3 {
            let mut v = [0.0; 3];
            for c in v.iter_mut() {
                *c = cursor
                    .read_f32::<LittleEndian>()
                    .map_err(|_| truncated(expected))? as f64;
            }
            vertices.push(v);
        }
        cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| truncated(expected))?;
    }
    Ok(vertices)
}

fn parse_ascii(bytes: &[u8], path: &Path) -> Result<Vec<[f64; 3]>, MeshError> {
    let text = String::from_utf8_lossy(bytes);
    let mut vertices = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut v = [0.0; 3];
        for c in v.iter_mut() {
            let token = tokens.next().ok_or_else(|| MeshError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message: "vertex needs three coordinates".to_string(),
            })?;
            *c = token.parse::<f64>().map_err(|e| MeshError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                message: format!("invalid coordinate '{}': {}", token, e),
            })?;
        }
        vertices.push(v);
    }
    Ok(vertices)
}
