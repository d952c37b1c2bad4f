//! Report written by the Blender entrypoint.

use hullsprite_spec::BoundingExtent;
use serde::{Deserialize, Serialize};

/// Relative tolerance when comparing Blender's dimensions to the planned ones.
///
/// Blender stores vertices in single precision.
pub const DIMENSION_TOLERANCE: f64 = 1e-3;

/// Report JSON produced by `render_sprite.py`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    /// Whether the render succeeded.
    pub ok: bool,
    /// Error message if the render failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Mesh dimensions (X, Y, Z) after rotation, as Blender measured them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_dimensions: Option<[f64; 3]>,
    /// Path to the rendered PNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Blender version used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blender_version: Option<String>,
    /// Execution time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RenderReport {
    /// Creates a successful report.
    pub fn success(output_path: impl Into<String>, final_dimensions: [f64; 3]) -> Self {
        Self {
            ok: true,
            error: None,
            final_dimensions: Some(final_dimensions),
            output_path: Some(output_path.into()),
            blender_version: None,
            duration_ms: None,
        }
    }

    /// Creates a failed report.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            final_dimensions: None,
            output_path: None,
            blender_version: None,
            duration_ms: None,
        }
    }

    /// Checks the reported dimensions against an expected extent.
    ///
    /// Returns `None` when the report carries no dimensions.
    pub fn dimensions_within(&self, expected: &BoundingExtent, tolerance: f64) -> Option<bool> {
        let actual = self.final_dimensions?;
        let expected = expected.to_array();
        let scale = expected.iter().cloned().fold(f64::MIN, f64::max);
        Some(
            actual
                .iter()
                .zip(expected.iter())
                .all(|(a, e)| (a - e).abs() <= tolerance * scale),
        )
    }
}
