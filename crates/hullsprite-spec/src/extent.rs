//! Bounding extents and axes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Relative tolerance under which two extents are considered equal.
pub const TIE_TOLERANCE: f64 = 1e-6;

/// One of the three mesh axes.
///
/// After normalization X is width, Y is forward length and Z is height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the axis as a lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    /// Component index (0, 1, 2).
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// All axes in component order.
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    /// Ranking priority used to break ties between equal extents.
    ///
    /// The vertical axis wins ties so an already-normalized mesh stays put.
    fn tie_priority(&self) -> u8 {
        match self {
            Axis::Z => 0,
            Axis::X => 1,
            Axis::Y => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Axis {
    type Err = ExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(ExtentError::UnknownAxis(s.to_string())),
        }
    }
}

/// Errors for degenerate or malformed extents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtentError {
    /// An extent is zero, negative or not finite.
    #[error("degenerate extent along {axis}: {value}")]
    Degenerate { axis: Axis, value: f64 },

    /// The bounds were empty (no vertices).
    #[error("mesh has no vertices")]
    Empty,

    /// Axis name was not x, y or z.
    #[error("unknown axis '{0}', expected one of: x, y, z")]
    UnknownAxis(String),
}

/// Size of a mesh along its three axes, in model units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingExtent {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub depth: f64,
    /// Extent along Z.
    pub height: f64,
}

impl BoundingExtent {
    /// Creates an extent, rejecting zero-volume or non-finite values.
    pub fn new(width: f64, depth: f64, height: f64) -> Result<Self, ExtentError> {
        let extent = Self {
            width,
            depth,
            height,
        };
        for axis in Axis::all() {
            let value = extent.along(axis);
            if !value.is_finite() || value <= 0.0 {
                return Err(ExtentError::Degenerate { axis, value });
            }
        }
        Ok(extent)
    }

    /// Builds an extent from min/max corners.
    pub fn from_corners(min: [f64; 3], max: [f64; 3]) -> Result<Self, ExtentError> {
        Self::new(max[0] - min[0], max[1] - min[1], max[2] - min[2])
    }

    /// Extent along the given axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.depth,
            Axis::Z => self.height,
        }
    }

    /// Returns the extent as `[x, y, z]`.
    pub fn to_array(&self) -> [f64; 3] {
        [self.width, self.depth, self.height]
    }

    /// Axes ranked from smallest to largest extent.
    ///
    /// Axes are grouped into runs anchored on the smallest remaining extent;
    /// members within [`TIE_TOLERANCE`] of the anchor count as tied and are
    /// ordered Z, X, Y.
    pub fn ranked(&self) -> [Axis; 3] {
        let mut axes = Axis::all();
        axes.sort_by(|a, b| self.along(*a).total_cmp(&self.along(*b)));

        let mut start = 0;
        while start < axes.len() {
            let anchor = self.along(axes[start]);
            let end = (start + 1..axes.len())
                .find(|&i| !nearly_equal(anchor, self.along(axes[i])))
                .unwrap_or(axes.len());
            axes[start..end].sort_by_key(|a| a.tie_priority());
            start = end;
        }
        axes
    }

    /// The axis with the smallest extent.
    pub fn smallest(&self) -> Axis {
        self.ranked()[0]
    }

    /// The larger of the two horizontal extents.
    pub fn footprint(&self) -> f64 {
        self.width.max(self.depth)
    }

    /// Returns a copy with two axes exchanged.
    pub fn swapped(&self, a: Axis, b: Axis) -> Self {
        let mut values = self.to_array();
        values.swap(a.index(), b.index());
        Self {
            width: values[0],
            depth: values[1],
            height: values[2],
        }
    }
}

/// Relative float comparison used for tie detection.
pub fn nearly_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
    (a - b).abs() <= TIE_TOLERANCE * scale
}
