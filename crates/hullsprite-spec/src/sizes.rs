//! Real-world ship sizes keyed by ship key, with per-class defaults.
//!
//! The table is a flat JSON object. Keys starting with `_` are reserved:
//!
//! ```json
//! {
//!   "_comment": "lengths in meters",
//!   "_class_defaults": { "frigate": 45, "titan": 14000 },
//!   "_fill_curve": { "min_fill": 0.12 },
//!   "amarr/frigate/punisher": 41
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{read_optional, ConfigError};
use crate::framing::FillCurve;
use crate::ship_key::ShipKey;

/// Default file name of the size table.
pub const SIZES_FILE: &str = "ship_sizes.json";

const CLASS_DEFAULTS_KEY: &str = "_class_defaults";
const FILL_CURVE_KEY: &str = "_fill_curve";

/// Outcome of a size lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SizeLookup {
    /// The ship key has its own entry.
    Exact { meters: f64 },
    /// Fell back to the ship's class default.
    ClassDefault { class: String, meters: f64 },
    /// No size is known.
    Unknown,
}

impl SizeLookup {
    /// Size in meters, if known.
    pub fn meters(&self) -> Option<f64> {
        match self {
            SizeLookup::Exact { meters } | SizeLookup::ClassDefault { meters, .. } => Some(*meters),
            SizeLookup::Unknown => None,
        }
    }
}

/// Read-only size table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeTable {
    entries: BTreeMap<String, f64>,
    class_defaults: BTreeMap<String, f64>,
    curve: Option<FillCurve>,
}

impl SizeTable {
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

        let mut table = Self::default();
        for (key, value) in root {
            match key.as_str() {
                CLASS_DEFAULTS_KEY => {
                    let defaults = value.as_object().ok_or_else(|| {
                        ConfigError::invalid_entry(origin, &key, "expected an object of class sizes")
                    })?;
                    for (class, size) in defaults {
                        let meters = parse_size(origin, class, size)?;
                        table.class_defaults.insert(class.clone(), meters);
                    }
                }
                FILL_CURVE_KEY => {
                    let curve: FillCurve =
                        serde_json::from_value(value).map_err(|source| ConfigError::Parse {
                            origin: format!("{} ({})", origin, FILL_CURVE_KEY),
                            source,
                        })?;
                    curve.validate().map_err(|source| ConfigError::Curve {
                        origin: origin.to_string(),
                        source,
                    })?;
                    table.curve = Some(curve);
                }
                k if k.starts_with('_') => {}
                _ => {
                    let meters = parse_size(origin, &key, &value)?;
                    table.entries.insert(key, meters);
                }
            }
        }
        Ok(table)
    }

    /// Looks up a size: exact key, then class default, then unknown.
    pub fn lookup(&self, key: &ShipKey) -> SizeLookup {
        if let Some(meters) = self.entries.get(&key.to_string()) {
            return SizeLookup::Exact { meters: *meters };
        }
        if let Some(class) = &key.class {
            if let Some(meters) = self.class_defaults.get(class) {
                return SizeLookup::ClassDefault {
                    class: class.clone(),
                    meters: *meters,
                };
            }
        }
        SizeLookup::Unknown
    }

    /// The configured fill curve, or the default one.
    pub fn curve(&self) -> FillCurve {
        self.curve.unwrap_or_default()
    }

    /// Number of per-ship entries (reserved keys excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of class defaults.
    pub fn class_default_count(&self) -> usize {
        self.class_defaults.len()
    }
}

fn parse_size(origin: &str, key: &str, value: &Value) -> Result<f64, ConfigError> {
    match value.as_f64() {
        Some(meters) if meters.is_finite() && meters > 0.0 => Ok(meters),
        Some(meters) => Err(ConfigError::invalid_entry(
            origin,
            key,
            format!("size must be a positive number of meters, got {}", meters),
        )),
        None => Err(ConfigError::invalid_entry(
            origin,
            key,
            format!("size must be a number, got {}", value),
        )),
    }
}
