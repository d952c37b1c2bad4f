//! Hierarchical ship identifiers (`faction/class/name`).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::faction::Faction;

/// Malformed ship key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ship key '{0}', expected faction/class/name or faction/name")]
pub struct ShipKeyError(pub String);

/// Identifier of a ship in the override and size tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShipKey {
    pub faction: String,
    pub class: Option<String>,
    pub name: String,
}

impl ShipKey {
    /// Creates a three-part key.
    pub fn new(faction: impl Into<String>, class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            class: Some(class.into()),
            name: name.into(),
        }
    }

    /// Derives the key from a sprite path such as `out/amarr/frigate/punisher.png`.
    ///
    /// The first path component naming a known faction anchors the key. The
    /// component after it is the class when at least one more component
    /// follows. Returns `None` when no known faction appears.
    pub fn from_output_path(path: &Path) -> Option<Self> {
        let normalized = path.to_string_lossy().replace('\\', "/");
        let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
        let last = parts.last()?;
        let name = Path::new(last).file_stem()?.to_string_lossy().to_string();

        let anchor = parts
            .iter()
            .position(|part| part.parse::<Faction>().is_ok())?;

        if anchor + 2 < parts.len() {
            Some(Self {
                faction: parts[anchor].to_string(),
                class: Some(parts[anchor + 1].to_string()),
                name,
            })
        } else if anchor + 1 < parts.len() {
            Some(Self {
                faction: parts[anchor].to_string(),
                class: None,
                name,
            })
        } else {
            None
        }
    }

    /// Parsed faction, if it is one of the known set.
    pub fn known_faction(&self) -> Option<Faction> {
        self.faction.parse().ok()
    }
}

impl fmt::Display for ShipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}/{}/{}", self.faction, class, self.name),
            None => write!(f, "{}/{}", self.faction, self.name),
        }
    }
}

impl FromStr for ShipKey {
    type Err = ShipKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ShipKeyError(s.to_string()));
        }
        match parts.as_slice() {
            [faction, class, name] => Ok(Self::new(*faction, *class, *name)),
            [faction, name] => Ok(Self {
                faction: faction.to_string(),
                class: None,
                name: name.to_string(),
            }),
            _ => Err(ShipKeyError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ShipKey {
    type Error = ShipKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShipKey> for String {
    fn from(key: ShipKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_display() {
        let key: ShipKey = "amarr/frigate/punisher".parse().unwrap();
        assert_eq!(key, ShipKey::new("amarr", "frigate", "punisher"));
        assert_eq!(key.to_string(), "amarr/frigate/punisher");

        let short: ShipKey = "jove/sarum".parse().unwrap();
        assert_eq!(short.class, None);
        assert_eq!(short.to_string(), "jove/sarum");

        assert!("amarr".parse::<ShipKey>().is_err());
        assert!("a/b/c/d".parse::<ShipKey>().is_err());
        assert!("amarr//punisher".parse::<ShipKey>().is_err());
    }

    #[test]
    fn test_from_output_path() {
        let key = ShipKey::from_output_path(Path::new("sprites/amarr/frigate/punisher.png")).unwrap();
        assert_eq!(key.to_string(), "amarr/frigate/punisher");

        let key = ShipKey::from_output_path(Path::new("out\\caldari\\raven.png")).unwrap();
        assert_eq!(key.to_string(), "caldari/raven");

        let key =
            ShipKey::from_output_path(Path::new("pirate/sanshas nation/phantasm.png")).unwrap();
        assert_eq!(key.class.as_deref(), Some("sanshas nation"));
    }

    #[test]
    fn test_from_output_path_without_faction() {
        assert_eq!(ShipKey::from_output_path(Path::new("renders/ship.png")), None);
        assert_eq!(ShipKey::from_output_path(Path::new("amarr")), None);
    }

    #[test]
    fn test_serde_as_string() {
        let key = ShipKey::new("ore", "frigate", "venture");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"ore/frigate/venture\"");
        let back: ShipKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
