//! Top-down sprite rendering.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{BlenderError, BlenderResult};
use crate::job::RenderJob;
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::report::{RenderReport, DIMENSION_TOLERANCE};

/// Result of rendering one sprite.
#[derive(Debug)]
pub struct SpriteRenderResult {
    /// Path to the rendered PNG.
    pub output_path: PathBuf,
    /// Whether Blender's final dimensions agree with the planned extent.
    /// `None` when either side is unknown.
    pub dimensions_match: Option<bool>,
    /// Raw Blender report.
    pub report: RenderReport,
}

/// Renders a sprite with the default orchestrator configuration.
pub fn render(job: &RenderJob) -> BlenderResult<SpriteRenderResult> {
    render_with_config(job, OrchestratorConfig::new())
}

/// Renders a sprite with a custom orchestrator configuration.
pub fn render_with_config(
    job: &RenderJob,
    config: OrchestratorConfig,
) -> BlenderResult<SpriteRenderResult> {
    job.validate()?;

    if let Some(parent) = job.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let orchestrator = Orchestrator::with_config(config);
    let report = orchestrator.run_job(job)?;

    if !job.output.exists() {
        return Err(BlenderError::OutputNotFound {
            path: job.output.clone(),
        });
    }

    let dimensions_match = job
        .expected_extent
        .as_ref()
        .and_then(|expected| report.dimensions_within(expected, DIMENSION_TOLERANCE));
    if dimensions_match == Some(false) {
        warn!(
            expected = ?job.expected_extent.map(|e| e.to_array()),
            actual = ?report.final_dimensions,
            "Blender dimensions differ from the planned extent"
        );
    }

    info!(output = %job.output.display(), "sprite rendered");
    Ok(SpriteRenderResult {
        output_path: job.output.clone(),
        dimensions_match,
        report,
    })
}
