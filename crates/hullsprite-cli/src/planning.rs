//! Render planning: everything decided before Blender starts.

use std::path::{Path, PathBuf};

use anyhow::Result;
use hullsprite_spec::{
    choose_orientation, BoundingExtent, CameraFraming, ConfigError, EulerAngles,
    OrientationPlan, OverrideTable, ShipKey, SizeLookup, SizeTable, DEFAULT_FRAME_MARGIN,
    ORIENTATIONS_FILE, SIZES_FILE,
};
use serde::Serialize;
use tracing::debug;

use crate::analysis::StlMesh;

/// Orientation overrides and ship sizes from a config directory.
#[derive(Debug, Clone, Default)]
pub struct ConfigTables {
    pub dir: PathBuf,
    pub overrides: OverrideTable,
    pub sizes: SizeTable,
}

impl ConfigTables {
    /// Loads both tables; missing files give empty tables.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let overrides = OverrideTable::load(&dir.join(ORIENTATIONS_FILE))?;
        let sizes = SizeTable::load(&dir.join(SIZES_FILE))?;
        debug!(
            dir = %dir.display(),
            overrides = overrides.len(),
            sizes = sizes.len(),
            "loaded config tables"
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            overrides,
            sizes,
        })
    }
}

/// Fully resolved plan for one mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub ship_key: Option<ShipKey>,
    pub override_applied: bool,
    pub original_extent: BoundingExtent,
    pub orientation: OrientationPlan,
    pub steps: Vec<EulerAngles>,
    pub final_extent: BoundingExtent,
    pub size: SizeLookup,
    pub fill_ratio: f64,
    pub framing: CameraFraming,
}

impl RenderPlan {
    /// Plans a render of `mesh` for the given ship key.
    pub fn for_mesh(mesh: &StlMesh, key: Option<ShipKey>, tables: &ConfigTables) -> Result<Self> {
        let original_extent = mesh.extent()?;
        let override_ = key.as_ref().and_then(|k| tables.overrides.get(k));
        let orientation = choose_orientation(&original_extent, override_);
        let final_extent = mesh.rotated_extent(&orientation)?;

        let size = key
            .as_ref()
            .map(|k| tables.sizes.lookup(k))
            .unwrap_or(SizeLookup::Unknown);
        let fill_ratio = tables.sizes.curve().fill_ratio(size.meters());
        let margin = override_
            .and_then(|o| o.scale)
            .unwrap_or(DEFAULT_FRAME_MARGIN);
        let framing = CameraFraming::for_extent(&final_extent, fill_ratio, margin)?;

        Ok(Self {
            ship_key: key,
            override_applied: override_.is_some(),
            original_extent,
            steps: orientation.steps(),
            orientation,
            final_extent,
            size,
            fill_ratio,
            framing,
        })
    }
}

/// Ship key from an explicit `--key`, else derived from the output path.
pub fn resolve_ship_key(explicit: Option<&str>, output: Option<&Path>) -> Result<Option<ShipKey>> {
    if let Some(key) = explicit {
        return Ok(Some(key.parse()?));
    }
    Ok(output.and_then(ShipKey::from_output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hullsprite_spec::Axis;

    fn box_mesh(w: f64, d: f64, h: f64) -> StlMesh {
        StlMesh {
            path: PathBuf::from("box.stl"),
            vertices: vec![[0.0, 0.0, 0.0], [w, d, h], [w, 0.0, h]],
        }
    }

    fn tables(orientations: &str, sizes: &str) -> ConfigTables {
        ConfigTables {
            dir: PathBuf::from("."),
            overrides: OverrideTable::from_json(orientations, "o").unwrap(),
            sizes: SizeTable::from_json(sizes, "s").unwrap(),
        }
    }

    #[test]
    fn test_plan_without_key_fills_frame() {
        let plan = RenderPlan::for_mesh(&box_mesh(40.0, 120.0, 20.0), None, &ConfigTables::default())
            .unwrap();
        assert!(plan.steps.is_empty());
        assert_eq!(plan.size, SizeLookup::Unknown);
        assert_eq!(plan.fill_ratio, 1.0);
        assert!((plan.framing.ortho_scale - 120.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_plan_uses_class_default_and_override_scale() {
        let tables = tables(
            r#"{"amarr/frigate/punisher": {"axis": "y", "scale": 2.0}}"#,
            r#"{"_class_defaults": {"frigate": 75}}"#,
        );
        let key: ShipKey = "amarr/frigate/punisher".parse().unwrap();
        let plan = RenderPlan::for_mesh(&box_mesh(40.0, 20.0, 120.0), Some(key), &tables).unwrap();

        assert!(plan.override_applied);
        assert!(matches!(
            plan.orientation,
            OrientationPlan::Semantic(a) if a.vertical == Axis::Y
        ));
        assert_eq!(plan.size.meters(), Some(75.0));
        assert!((plan.fill_ratio - 0.12).abs() < 1e-9);
        assert_eq!(plan.framing.margin, 2.0);
    }

    #[test]
    fn test_resolve_ship_key() {
        let key = resolve_ship_key(None, Some(Path::new("out/caldari/frigate/kestrel.png")))
            .unwrap()
            .unwrap();
        assert_eq!(key.to_string(), "caldari/frigate/kestrel");

        let key = resolve_ship_key(Some("ore/venture"), Some(Path::new("x/amarr/a/b.png")))
            .unwrap()
            .unwrap();
        assert_eq!(key.to_string(), "ore/venture");

        assert!(resolve_ship_key(Some("bad"), None).is_err());
        assert!(resolve_ship_key(None, Some(Path::new("render.png"))).unwrap().is_none());
    }
}
