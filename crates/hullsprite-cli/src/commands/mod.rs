//! CLI command implementations

pub mod audit;
pub mod doctor;
pub mod plan;
pub mod render;
pub mod sync;
