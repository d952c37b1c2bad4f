//! Mesh analysis used to plan renders without Blender.

pub mod stl;

pub use stl::{read_stl, MeshError, StlMesh};
