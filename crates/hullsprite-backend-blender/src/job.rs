//! Render job handed to the Blender entrypoint.
//!
//! The job is fully resolved on the Rust side: Blender receives the rotation
//! steps, the material, the camera framing and the light rig, and only
//! executes them.

use std::path::PathBuf;

use hullsprite_spec::{BoundingExtent, CameraFraming, EulerAngles, MaterialPreset};
use serde::{Deserialize, Serialize};

use crate::error::{BlenderError, BlenderResult};

/// Default sprite edge length in pixels.
pub const DEFAULT_RESOLUTION: u32 = 512;
/// Default Cycles sample count.
pub const DEFAULT_SAMPLES: u32 = 64;

const KEY_LIGHT_ENERGY: f64 = 3.0;
const FILL_LIGHT_ENERGY: f64 = 1.0;

/// A sun lamp in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunLight {
    pub name: String,
    pub location: [f64; 3],
    pub energy: f64,
}

impl SunLight {
    /// Fixed three-sun rig: a key light at the camera and two fills.
    pub fn standard_rig(framing: &CameraFraming) -> Vec<SunLight> {
        vec![
            SunLight {
                name: "Key".to_string(),
                location: framing.camera_location(),
                energy: KEY_LIGHT_ENERGY,
            },
            SunLight {
                name: "FillA".to_string(),
                location: [100.0, 100.0, 100.0],
                energy: FILL_LIGHT_ENERGY,
            },
            SunLight {
                name: "FillB".to_string(),
                location: [-100.0, -100.0, 100.0],
                energy: FILL_LIGHT_ENERGY,
            },
        ]
    }
}

/// Everything Blender needs to render one sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    /// STL mesh to import.
    pub input: PathBuf,
    /// PNG to write.
    pub output: PathBuf,
    /// Square output edge in pixels.
    pub resolution: u32,
    pub samples: u32,
    /// Rotation steps, applied and baked in order.
    pub steps: Vec<EulerAngles>,
    pub material: MaterialPreset,
    pub framing: CameraFraming,
    pub lights: Vec<SunLight>,
    /// Extent the mesh should have after the steps, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_extent: Option<BoundingExtent>,
}

impl RenderJob {
    /// Creates a job with default resolution, samples and the standard rig.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        steps: Vec<EulerAngles>,
        material: MaterialPreset,
        framing: CameraFraming,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            resolution: DEFAULT_RESOLUTION,
            samples: DEFAULT_SAMPLES,
            steps,
            material,
            lights: SunLight::standard_rig(&framing),
            framing,
            expected_extent: None,
        }
    }

    pub fn resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn expected_extent(mut self, extent: BoundingExtent) -> Self {
        self.expected_extent = Some(extent);
        self
    }

    /// Rejects jobs Blender would fail on late.
    pub fn validate(&self) -> BlenderResult<()> {
        if self.resolution == 0 {
            return Err(BlenderError::invalid_job("resolution must be at least 1"));
        }
        if self.samples == 0 {
            return Err(BlenderError::invalid_job("samples must be at least 1"));
        }
        let f = &self.framing;
        if !(f.ortho_scale.is_finite() && f.ortho_scale > 0.0) {
            return Err(BlenderError::invalid_job(format!(
                "ortho_scale must be positive, got {}",
                f.ortho_scale
            )));
        }
        if f.clip_end <= f.camera_height {
            return Err(BlenderError::invalid_job(
                "clip_end must lie beyond the camera height",
            ));
        }
        if !self.input.exists() {
            return Err(BlenderError::InputNotFound {
                path: self.input.clone(),
            });
        }
        Ok(())
    }
}
