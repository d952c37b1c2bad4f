//! Test fixture utilities for meshes and sprite trees.

use std::fs;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

/// Encodes triangles as a binary STL.
pub fn binary_stl(triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes
        .write_u32::<LittleEndian>(triangles.len() as u32)
        .expect("write to Vec");
    for triangle in triangles {
        for _ in 0..3 {
            bytes.write_f32::<LittleEndian>(0.0).expect("write to Vec");
        }
        for vertex in triangle {
            for &c in vertex {
                bytes.write_f32::<LittleEndian>(c).expect("write to Vec");
            }
        }
        bytes.write_u16::<LittleEndian>(0).expect("write to Vec");
    }
    bytes
}

/// Two triangles spanning an axis-aligned box of the given size from the origin.
pub fn box_triangles(width: f32, depth: f32, height: f32) -> Vec<[[f32; 3]; 3]> {
    vec![
        [[0.0, 0.0, 0.0], [width, 0.0, 0.0], [width, depth, 0.0]],
        [[0.0, 0.0, height], [width, depth, height], [0.0, depth, height]],
    ]
}

/// A temporary project with a config directory and a sprite tree.
pub struct ProjectFixture {
    pub root: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes a box-shaped binary STL and returns its path.
    pub fn add_box_mesh(&self, name: &str, width: f32, depth: f32, height: f32) -> PathBuf {
        let path = self.path().join(format!("{}.stl", name));
        fs::write(&path, binary_stl(&box_triangles(width, depth, height)))
            .expect("Failed to write STL");
        path
    }

    /// Writes a config file (e.g. `ship_sizes.json`) at the project root.
    pub fn add_config(&self, file: &str, json: &str) -> PathBuf {
        let path = self.path().join(file);
        fs::write(&path, json).expect("Failed to write config");
        path
    }

    /// Writes a solid-colour PNG at `rel` under the project root.
    pub fn add_sprite(&self, rel: &str, size: u32, color: [u8; 4]) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().expect("sprite path has a parent"))
            .expect("Failed to create sprite dir");
        RgbaImage::from_pixel(size, size, Rgba(color))
            .save(&path)
            .expect("Failed to write PNG");
        path
    }

    /// Writes arbitrary bytes at `rel` under the project root.
    pub fn add_file(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().expect("file path has a parent"))
            .expect("Failed to create dir");
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
