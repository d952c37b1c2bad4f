//! Size-to-fill-ratio mapping and orthographic camera framing.
//!
//! Real ship sizes span tens of meters to tens of kilometers. A power curve
//! compresses that range so that small hulls stay legible while the largest
//! still fill the frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extent::BoundingExtent;

/// Baseline size in meters (smallest class).
pub const DEFAULT_REFERENCE_SIZE: f64 = 75.0;
/// Size in meters of the largest class.
pub const DEFAULT_MAX_SIZE: f64 = 14_000.0;
/// Power applied to the normalized size.
pub const DEFAULT_EXPONENT: f64 = 0.4;
/// Fill ratio of a reference-sized ship.
pub const DEFAULT_MIN_FILL: f64 = 0.12;
/// Fill ratio of the largest ship, and of ships with unknown size.
pub const DEFAULT_MAX_FILL: f64 = 1.0;
/// Default camera margin multiplier.
pub const DEFAULT_FRAME_MARGIN: f64 = 1.1;

/// Minimum camera height above the origin.
const MIN_CAMERA_HEIGHT: f64 = 1000.0;
/// Clearance added above the mesh.
const CAMERA_CLEARANCE: f64 = 100.0;
/// Extra clip distance beyond the mesh.
const CLIP_PADDING: f64 = 1000.0;

/// Invalid fill-curve parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("reference_size must be positive, got {0}")]
    InvalidReference(f64),

    #[error("max_size ({max}) must be greater than reference_size ({reference})")]
    InvalidMaxSize { max: f64, reference: f64 },

    #[error("exponent must be in (0, 1), got {0}")]
    InvalidExponent(f64),

    #[error("fill band must satisfy 0 < min_fill ({min}) <= max_fill ({max}) <= 1")]
    InvalidBand { min: f64, max: f64 },

    #[error("frame margin must be positive, got {0}")]
    InvalidMargin(f64),
}

/// Parameters of the size-to-fill power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillCurve {
    /// Size in meters that maps to `min_fill`.
    pub reference_size: f64,
    /// Size in meters that maps to `max_fill`.
    pub max_size: f64,
    /// Compression exponent, strictly between 0 and 1.
    pub exponent: f64,
    pub min_fill: f64,
    pub max_fill: f64,
}

impl Default for FillCurve {
    fn default() -> Self {
        Self {
            reference_size: DEFAULT_REFERENCE_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            exponent: DEFAULT_EXPONENT,
            min_fill: DEFAULT_MIN_FILL,
            max_fill: DEFAULT_MAX_FILL,
        }
    }
}

impl FillCurve {
    /// Checks the parameters.
    pub fn validate(&self) -> Result<(), CurveError> {
        if !(self.reference_size.is_finite() && self.reference_size > 0.0) {
            return Err(CurveError::InvalidReference(self.reference_size));
        }
        if !(self.max_size.is_finite() && self.max_size > self.reference_size) {
            return Err(CurveError::InvalidMaxSize {
                max: self.max_size,
                reference: self.reference_size,
            });
        }
        if !(self.exponent > 0.0 && self.exponent < 1.0) {
            return Err(CurveError::InvalidExponent(self.exponent));
        }
        if !(self.min_fill > 0.0 && self.min_fill <= self.max_fill && self.max_fill <= 1.0) {
            return Err(CurveError::InvalidBand {
                min: self.min_fill,
                max: self.max_fill,
            });
        }
        Ok(())
    }

    /// Maps a size in meters to a fill ratio in `[min_fill, max_fill]`.
    ///
    /// Unknown, non-finite or non-positive sizes fill the whole frame.
    pub fn fill_ratio(&self, size_meters: Option<f64>) -> f64 {
        let size = match size_meters {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => return self.max_fill,
        };

        let scaled = (size / self.reference_size).powf(self.exponent);
        let max_scaled = (self.max_size / self.reference_size).powf(self.exponent);
        let fill = self.min_fill
            + (self.max_fill - self.min_fill) * (scaled - 1.0) / (max_scaled - 1.0);

        fill.clamp(self.min_fill, self.max_fill)
    }
}

/// Fill ratio with the default curve.
pub fn fill_ratio(size_meters: Option<f64>) -> f64 {
    FillCurve::default().fill_ratio(size_meters)
}

/// Orthographic camera placement for a normalized mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFraming {
    /// Model units visible across the frame.
    pub ortho_scale: f64,
    /// Camera Z position; it looks down -Z at the origin.
    pub camera_height: f64,
    /// Far clip distance.
    pub clip_end: f64,
    /// Fill ratio the framing was computed for.
    pub fill_ratio: f64,
    /// Margin multiplier applied to the fill ratio.
    pub margin: f64,
}

impl CameraFraming {
    /// Frames a mesh whose extent is already in render orientation.
    pub fn for_extent(
        extent: &BoundingExtent,
        fill_ratio: f64,
        margin: f64,
    ) -> Result<Self, CurveError> {
        if !(margin.is_finite() && margin > 0.0) {
            return Err(CurveError::InvalidMargin(margin));
        }
        let target_fill = fill_ratio * margin;
        let ortho_scale = extent.footprint() / target_fill;
        let camera_height = (extent.height + CAMERA_CLEARANCE).max(MIN_CAMERA_HEIGHT);

        Ok(Self {
            ortho_scale,
            camera_height,
            clip_end: camera_height + extent.height + CLIP_PADDING,
            fill_ratio,
            margin,
        })
    }

    /// Camera location in world space.
    pub fn camera_location(&self) -> [f64; 3] {
        [0.0, 0.0, self.camera_height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_size_fills_frame() {
        assert_eq!(fill_ratio(None), DEFAULT_MAX_FILL);
        assert_eq!(fill_ratio(Some(0.0)), DEFAULT_MAX_FILL);
        assert_eq!(fill_ratio(Some(f64::NAN)), DEFAULT_MAX_FILL);
    }

    #[test]
    fn test_reference_size_maps_to_min_fill() {
        assert!((fill_ratio(Some(75.0)) - 0.12).abs() < 1e-12);
    }

    #[test]
    fn test_largest_class_maps_to_max_fill() {
        assert!((fill_ratio(Some(14_000.0)) - 1.0).abs() < 1e-12);
        assert_eq!(fill_ratio(Some(1_000_000.0)), 1.0);
        assert_eq!(fill_ratio(Some(10.0)), 0.12);
    }

    #[test]
    fn test_midrange_is_compressed() {
        // A 500m cruiser: (500/75)^0.4 ~= 2.135 against a max of ~8.10.
        let fill = fill_ratio(Some(500.0));
        assert!(fill > 0.2 && fill < 0.3, "fill = {}", fill);
    }

    #[test]
    fn test_validate_rejects_bad_curves() {
        assert!(FillCurve::default().validate().is_ok());

        let curve = FillCurve {
            exponent: 1.0,
            ..Default::default()
        };
        assert_eq!(curve.validate(), Err(CurveError::InvalidExponent(1.0)));

        let curve = FillCurve {
            max_size: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            curve.validate(),
            Err(CurveError::InvalidMaxSize { .. })
        ));

        let curve = FillCurve {
            min_fill: 0.5,
            max_fill: 0.4,
            ..Default::default()
        };
        assert!(matches!(curve.validate(), Err(CurveError::InvalidBand { .. })));
    }

    #[test]
    fn test_curve_parses_partial_json() {
        let curve: FillCurve = serde_json::from_str(r#"{"min_fill": 0.15}"#).unwrap();
        assert_eq!(curve.min_fill, 0.15);
        assert_eq!(curve.exponent, DEFAULT_EXPONENT);
        assert!(serde_json::from_str::<FillCurve>(r#"{"minfill": 0.15}"#).is_err());
    }

    #[test]
    fn test_camera_framing() {
        let extent = BoundingExtent::new(40.0, 120.0, 20.0).unwrap();
        let framing = CameraFraming::for_extent(&extent, 0.5, 1.0).unwrap();
        assert_eq!(framing.ortho_scale, 240.0);
        assert_eq!(framing.camera_height, 1000.0);
        assert_eq!(framing.clip_end, 2020.0);
        assert_eq!(framing.camera_location(), [0.0, 0.0, 1000.0]);

        let tall = BoundingExtent::new(40.0, 120.0, 2000.0).unwrap();
        let framing = CameraFraming::for_extent(&tall, 1.0, DEFAULT_FRAME_MARGIN).unwrap();
        assert_eq!(framing.camera_height, 2100.0);

        assert!(CameraFraming::for_extent(&extent, 1.0, 0.0).is_err());
    }
}
