//! Orientation selection for top-down rendering.
//!
//! A plan either assigns source axes semantically (which axis becomes
//! vertical, plus yaw corrections) or carries three explicit Euler angles.
//! Plans lower to an ordered list of [`EulerAngles`] steps, each applied and
//! baked into the mesh before the next one.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::extent::{nearly_equal, Axis, BoundingExtent};

/// Matrix entries closer than this to zero are snapped to zero.
const SNAP_EPSILON: f64 = 1e-12;

/// Rotation angles in degrees, applied in X, then Y, then Z order (extrinsic).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    /// Creates angles from three degree values.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A single rotation about one axis.
    pub fn about(axis: Axis, degrees: f64) -> Self {
        match axis {
            Axis::X => Self::new(degrees, 0.0, 0.0),
            Axis::Y => Self::new(0.0, degrees, 0.0),
            Axis::Z => Self::new(0.0, 0.0, degrees),
        }
    }

    /// Returns true when all three angles are zero.
    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Rotation matrix for these angles (`Rz * Ry * Rx`).
    pub fn to_matrix(&self) -> DMat3 {
        DMat3::from_rotation_z(self.z.to_radians())
            * DMat3::from_rotation_y(self.y.to_radians())
            * DMat3::from_rotation_x(self.x.to_radians())
    }
}

/// Semantic axis assignment: how the source axes map onto the render frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAssignment {
    /// Source axis that ends up vertical.
    pub vertical: Axis,
    /// Quarter turn that brings `vertical` onto Z, if it is not Z already.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<EulerAngles>,
    /// Whether a 90° yaw swaps width and forward after the tilt.
    pub yaw_swap: bool,
    /// Whether the forward direction is reversed (180° yaw).
    pub flip: bool,
    /// Extra yaw in degrees applied last.
    pub yaw_degrees: f64,
}

/// Rotation to apply before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OrientationPlan {
    /// Derived from extents or a semantic override.
    Semantic(AxisAssignment),
    /// Raw angles from an explicit override.
    Explicit(EulerAngles),
}

impl OrientationPlan {
    /// The plan that leaves the mesh untouched.
    pub fn identity() -> Self {
        OrientationPlan::Semantic(AxisAssignment {
            vertical: Axis::Z,
            tilt: None,
            yaw_swap: false,
            flip: false,
            yaw_degrees: 0.0,
        })
    }

    /// Ordered rotation steps for the render host.
    pub fn steps(&self) -> Vec<EulerAngles> {
        match self {
            OrientationPlan::Explicit(angles) => {
                if angles.is_identity() {
                    Vec::new()
                } else {
                    vec![*angles]
                }
            }
            OrientationPlan::Semantic(assignment) => {
                let mut steps = Vec::new();
                if let Some(tilt) = assignment.tilt {
                    steps.push(tilt);
                }
                if assignment.yaw_swap {
                    steps.push(EulerAngles::about(Axis::Z, 90.0));
                }
                if assignment.flip {
                    steps.push(EulerAngles::about(Axis::Z, 180.0));
                }
                if assignment.yaw_degrees != 0.0 {
                    steps.push(EulerAngles::about(Axis::Z, assignment.yaw_degrees));
                }
                steps
            }
        }
    }

    /// Returns true when applying the plan changes nothing.
    pub fn is_identity(&self) -> bool {
        self.steps().is_empty()
    }

    /// Combined rotation matrix of all steps.
    pub fn rotation_matrix(&self) -> DMat3 {
        let combined = self
            .steps()
            .iter()
            .fold(DMat3::IDENTITY, |acc, step| step.to_matrix() * acc);
        snap(combined)
    }

    /// Rotates a single point with the combined rotation.
    pub fn rotate_point(&self, point: [f64; 3]) -> [f64; 3] {
        self.rotation_matrix().mul_vec3(DVec3::from_array(point)).to_array()
    }

    /// Extent of the bounding box after rotation.
    ///
    /// Exact for quarter turns; for other angles this is the bound of the
    /// rotated box, which may be looser than the rotated mesh.
    pub fn apply_to_extent(&self, extent: &BoundingExtent) -> BoundingExtent {
        let m = self.rotation_matrix();
        let half = DVec3::from_array(extent.to_array()) * 0.5;
        let abs = DMat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
        let rotated = abs.mul_vec3(half) * 2.0;
        BoundingExtent {
            width: rotated.x,
            depth: rotated.y,
            height: rotated.z,
        }
    }
}

/// Per-item manual orientation instructions.
///
/// If any of `rx`, `ry`, `rz` is present the explicit form wins and every
/// other field except `scale` is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationOverride {
    /// Source axis that should point up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
    /// Reverse the forward direction.
    #[serde(default)]
    pub flip: bool,
    /// Fine-tune yaw in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rz: Option<f64>,
    /// Camera margin multiplier for awkward models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl OrientationOverride {
    /// Explicit angles, if any explicit field is present.
    pub fn explicit_angles(&self) -> Option<EulerAngles> {
        if self.rx.is_none() && self.ry.is_none() && self.rz.is_none() {
            return None;
        }
        Some(EulerAngles::new(
            self.rx.unwrap_or(0.0),
            self.ry.unwrap_or(0.0),
            self.rz.unwrap_or(0.0),
        ))
    }
}

/// Which rule produced the quarter turn for a vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TiltRule {
    Automatic,
    Override,
}

fn tilt_for(vertical: Axis, rule: TiltRule) -> Option<EulerAngles> {
    match (vertical, rule) {
        (Axis::X, TiltRule::Automatic) => Some(EulerAngles::about(Axis::Y, 90.0)),
        (Axis::X, TiltRule::Override) => Some(EulerAngles::about(Axis::Y, -90.0)),
        (Axis::Y, _) => Some(EulerAngles::about(Axis::X, 90.0)),
        (Axis::Z, _) => None,
    }
}

fn assign(
    extent: &BoundingExtent,
    vertical: Axis,
    rule: TiltRule,
    flip: bool,
    yaw_degrees: f64,
) -> AxisAssignment {
    // A quarter turn about the remaining horizontal axis swaps `vertical` with Z.
    let corrected = extent.swapped(vertical, Axis::Z);
    let yaw_swap =
        corrected.width > corrected.depth && !nearly_equal(corrected.width, corrected.depth);

    AxisAssignment {
        vertical,
        tilt: tilt_for(vertical, rule),
        yaw_swap,
        flip,
        yaw_degrees,
    }
}

/// Chooses the rotation that puts the smallest extent on Z and the largest
/// on Y, or follows the override when one is supplied.
pub fn choose_orientation(
    extent: &BoundingExtent,
    override_: Option<&OrientationOverride>,
) -> OrientationPlan {
    match override_ {
        Some(o) => match o.explicit_angles() {
            Some(angles) => OrientationPlan::Explicit(angles),
            None => OrientationPlan::Semantic(assign(
                extent,
                o.axis.unwrap_or(Axis::Z),
                TiltRule::Override,
                o.flip,
                o.rotation,
            )),
        },
        None => OrientationPlan::Semantic(assign(
            extent,
            extent.smallest(),
            TiltRule::Automatic,
            false,
            0.0,
        )),
    }
}

fn snap(m: DMat3) -> DMat3 {
    let mut cols = m.to_cols_array();
    for v in cols.iter_mut() {
        if v.abs() < SNAP_EPSILON {
            *v = 0.0;
        } else if (v.abs() - 1.0).abs() < SNAP_EPSILON {
            *v = v.signum();
        }
    }
    DMat3::from_cols_array(&cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extent(x: f64, y: f64, z: f64) -> BoundingExtent {
        BoundingExtent::new(x, y, z).unwrap()
    }

    #[test]
    fn test_already_normalized_is_identity() {
        let plan = choose_orientation(&extent(40.0, 120.0, 20.0), None);
        assert!(plan.is_identity());
        assert_eq!(plan, OrientationPlan::identity());
    }

    #[test]
    fn test_wide_mesh_gets_yaw() {
        let plan = choose_orientation(&extent(120.0, 40.0, 20.0), None);
        assert_eq!(plan.steps(), vec![EulerAngles::about(Axis::Z, 90.0)]);
        let after = plan.apply_to_extent(&extent(120.0, 40.0, 20.0));
        assert_eq!(after.to_array(), [40.0, 120.0, 20.0]);
    }

    #[test]
    fn test_smallest_x_tilts_about_y() {
        let e = extent(10.0, 120.0, 40.0);
        let plan = choose_orientation(&e, None);
        match plan {
            OrientationPlan::Semantic(a) => {
                assert_eq!(a.vertical, Axis::X);
                assert_eq!(a.tilt, Some(EulerAngles::about(Axis::Y, 90.0)));
                assert!(!a.yaw_swap);
            }
            other => panic!("expected semantic plan, got {:?}", other),
        }
        assert_eq!(plan.apply_to_extent(&e).to_array(), [40.0, 120.0, 10.0]);
    }

    #[test]
    fn test_smallest_y_tilts_about_x_then_yaws() {
        // After the tilt: X=120, Y=30, Z=8, so width > forward.
        let e = extent(120.0, 8.0, 30.0);
        let plan = choose_orientation(&e, None);
        assert_eq!(
            plan.steps(),
            vec![
                EulerAngles::about(Axis::X, 90.0),
                EulerAngles::about(Axis::Z, 90.0)
            ]
        );
        assert_eq!(plan.apply_to_extent(&e).to_array(), [30.0, 120.0, 8.0]);
    }

    #[test]
    fn test_reapplying_is_noop() {
        for e in [
            extent(120.0, 40.0, 20.0),
            extent(10.0, 120.0, 40.0),
            extent(120.0, 8.0, 30.0),
            extent(3.0, 2.0, 1.0),
        ] {
            let first = choose_orientation(&e, None);
            let normalized = first.apply_to_extent(&e);
            let second = choose_orientation(&normalized, None);
            assert!(second.is_identity(), "{:?} -> {:?}", e, second);
        }
    }

    #[test]
    fn test_explicit_override_wins() {
        let o = OrientationOverride {
            axis: Some(Axis::X),
            flip: true,
            rx: Some(0.0),
            rz: Some(45.0),
            ..Default::default()
        };
        let plan = choose_orientation(&extent(120.0, 40.0, 20.0), Some(&o));
        assert_eq!(plan, OrientationPlan::Explicit(EulerAngles::new(0.0, 0.0, 45.0)));
        assert_eq!(plan.steps(), vec![EulerAngles::new(0.0, 0.0, 45.0)]);
    }

    #[test]
    fn test_explicit_zero_override_is_still_explicit() {
        let o = OrientationOverride {
            ry: Some(0.0),
            ..Default::default()
        };
        let plan = choose_orientation(&extent(120.0, 40.0, 20.0), Some(&o));
        assert_eq!(plan, OrientationPlan::Explicit(EulerAngles::default()));
        assert!(plan.is_identity());
    }

    #[test]
    fn test_semantic_override_axis_flip_and_rotation() {
        let o = OrientationOverride {
            axis: Some(Axis::X),
            flip: true,
            rotation: 15.0,
            ..Default::default()
        };
        let plan = choose_orientation(&extent(10.0, 40.0, 120.0), Some(&o));
        // Tilt swaps X and Z: (120, 40, 10) so a yaw swap follows.
        assert_eq!(
            plan.steps(),
            vec![
                EulerAngles::about(Axis::Y, -90.0),
                EulerAngles::about(Axis::Z, 90.0),
                EulerAngles::about(Axis::Z, 180.0),
                EulerAngles::about(Axis::Z, 15.0),
            ]
        );
    }

    #[test]
    fn test_semantic_override_defaults_to_z() {
        let o = OrientationOverride {
            flip: true,
            ..Default::default()
        };
        let plan = choose_orientation(&extent(5.0, 120.0, 40.0), Some(&o));
        // The override keeps Z vertical even though X is smallest.
        assert_eq!(plan.steps(), vec![EulerAngles::about(Axis::Z, 180.0)]);
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let plan = OrientationPlan::Explicit(EulerAngles::about(Axis::Z, 90.0));
        assert_eq!(plan.rotate_point([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_plan_serializes_with_mode_tag() {
        let json = serde_json::to_value(OrientationPlan::Explicit(EulerAngles::new(1.0, 2.0, 3.0)))
            .unwrap();
        assert_eq!(json["mode"], "explicit");
        assert_eq!(json["z"], 3.0);
    }

    #[test]
    fn test_override_parses_from_json() {
        let o: OrientationOverride =
            serde_json::from_str(r#"{"axis": "y", "flip": true, "scale": 1.4}"#).unwrap();
        assert_eq!(o.axis, Some(Axis::Y));
        assert!(o.flip);
        assert_eq!(o.scale, Some(1.4));
        assert!(o.explicit_angles().is_none());
    }
}
