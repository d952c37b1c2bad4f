//! Orientation override table keyed by ship key.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{read_optional, ConfigError};
use crate::orientation::OrientationOverride;
use crate::ship_key::ShipKey;

/// Default file name of the override table.
pub const ORIENTATIONS_FILE: &str = "ship_orientations.json";

/// Read-only table of manual orientation overrides.
///
/// Keys starting with `_` are comments and are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    entries: BTreeMap<String, OrientationOverride>,
}

impl OverrideTable {
    /// Loads the table, returning an empty one when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match read_optional(path)? {
            Some(content) => Self::from_json(&content, &path.display().to_string()),
            None => Ok(Self::default()),
        }
    }

    /// Parses a table from JSON text. `origin` names the source in errors.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let root: Map<String, Value> =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let mut entries = BTreeMap::new();
        for (key, value) in root {
            if key.starts_with('_') {
                continue;
            }
            let entry: OrientationOverride = serde_json::from_value(value)
                .map_err(|e| ConfigError::invalid_entry(origin, &key, e.to_string()))?;
            if let Some(scale) = entry.scale {
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(ConfigError::invalid_entry(
                        origin,
                        &key,
                        format!("scale must be positive, got {}", scale),
                    ));
                }
            }
            entries.insert(key, entry);
        }
        Ok(Self { entries })
    }

    /// Override for a ship, if any.
    pub fn get(&self, key: &ShipKey) -> Option<&OrientationOverride> {
        self.entries.get(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
