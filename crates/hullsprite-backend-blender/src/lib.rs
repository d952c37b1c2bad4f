//! Hullsprite Blender Backend
//!
//! Renders top-down orthographic ship sprites using Blender as a subprocess.
//!
//! # Architecture
//!
//! 1. **Rust side** - resolves the orientation plan, material, camera framing
//!    and light rig into a [`RenderJob`], spawns Blender and reads the report
//! 2. **Python entrypoint** - `render_sprite.py`, runs inside Blender and
//!    executes the job step by step
//!
//! Communication happens via JSON files in a temp directory:
//! - the job JSON is passed with `--job`
//! - Blender writes a report JSON (`--report`) with the final mesh
//!   dimensions, Blender version and duration
//!
//! # Blender Requirements
//!
//! The orchestrator searches for Blender in:
//!
//! 1. An explicitly configured path
//! 2. `BLENDER_PATH` environment variable
//! 3. System PATH
//! 4. Common installation locations (platform-specific)
//!
//! Blender 3.6 LTS or 4.x is expected.

pub mod error;
pub mod job;
pub mod orchestrator;
pub mod report;
pub mod sprite;

pub use error::{BlenderError, BlenderResult};
pub use job::{RenderJob, SunLight, DEFAULT_RESOLUTION, DEFAULT_SAMPLES};
pub use orchestrator::{Orchestrator, OrchestratorConfig, BLENDER_PATH_ENV, ENTRYPOINT_ENV};
pub use report::{RenderReport, DIMENSION_TOLERANCE};
pub use sprite::{render, render_with_config, SpriteRenderResult};
