//! Factions and their fixed render/audit presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown faction name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown faction '{0}'")]
pub struct UnknownFaction(pub String);

/// The closed set of factions sprites are organized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Amarr,
    Caldari,
    Gallente,
    Minmatar,
    Pirate,
    Triglavian,
    Ore,
    Concord,
    Sleeper,
    Rogue,
    Jove,
    SpecialEdition,
    Upwell,
}

/// Principled-BSDF parameters for the ship hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreset {
    /// Linear RGBA base colour.
    pub base_color: [f64; 4],
    pub metallic: f64,
    pub roughness: f64,
}

/// Hull colour shared by every faction under the neutral policy.
pub const NEUTRAL_MATERIAL: MaterialPreset = MaterialPreset {
    base_color: [0.4, 0.45, 0.5, 1.0],
    metallic: 0.8,
    roughness: 0.3,
};

/// Fixed per-faction record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionPreset {
    pub material: MaterialPreset,
    /// Header colour on audit sheets (sRGB).
    pub sheet_color: [u8; 3],
    /// Position on the master audit sheet.
    pub sheet_order: u8,
}

/// Header colour for directories that are not a known faction.
pub const UNKNOWN_SHEET_COLOR: [u8; 3] = [200, 200, 200];

fn preset(
    base: [f64; 3],
    metallic: f64,
    roughness: f64,
    sheet_color: [u8; 3],
    sheet_order: u8,
) -> FactionPreset {
    FactionPreset {
        material: MaterialPreset {
            base_color: [base[0], base[1], base[2], 1.0],
            metallic,
            roughness,
        },
        sheet_color,
        sheet_order,
    }
}

impl Faction {
    /// All factions in audit display order.
    pub const ALL: [Faction; 13] = [
        Faction::Amarr,
        Faction::Caldari,
        Faction::Gallente,
        Faction::Minmatar,
        Faction::Pirate,
        Faction::Triglavian,
        Faction::Ore,
        Faction::Concord,
        Faction::Sleeper,
        Faction::Rogue,
        Faction::Jove,
        Faction::SpecialEdition,
        Faction::Upwell,
    ];

    /// Directory / key name of the faction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Amarr => "amarr",
            Faction::Caldari => "caldari",
            Faction::Gallente => "gallente",
            Faction::Minmatar => "minmatar",
            Faction::Pirate => "pirate",
            Faction::Triglavian => "triglavian",
            Faction::Ore => "ore",
            Faction::Concord => "concord",
            Faction::Sleeper => "sleeper",
            Faction::Rogue => "rogue",
            Faction::Jove => "jove",
            Faction::SpecialEdition => "special_edition",
            Faction::Upwell => "upwell",
        }
    }

    /// Material and audit presets for this faction.
    pub fn preset(&self) -> FactionPreset {
        match self {
            Faction::Amarr => preset([0.55, 0.45, 0.22], 0.85, 0.25, [255, 215, 0], 1),
            Faction::Caldari => preset([0.32, 0.4, 0.5], 0.8, 0.3, [100, 149, 237], 2),
            Faction::Gallente => preset([0.28, 0.4, 0.33], 0.75, 0.35, [50, 205, 50], 3),
            Faction::Minmatar => preset([0.48, 0.3, 0.22], 0.6, 0.55, [205, 92, 92], 4),
            Faction::Pirate => preset([0.3, 0.22, 0.35], 0.8, 0.3, [148, 0, 211], 5),
            Faction::Triglavian => preset([0.5, 0.2, 0.15], 0.7, 0.4, [255, 69, 0], 6),
            Faction::Ore => preset([0.6, 0.45, 0.15], 0.6, 0.45, [255, 165, 0], 7),
            Faction::Concord => preset([0.25, 0.35, 0.5], 0.85, 0.25, [70, 130, 180], 8),
            Faction::Sleeper => preset([0.35, 0.35, 0.35], 0.7, 0.5, [128, 128, 128], 9),
            Faction::Rogue => preset([0.4, 0.28, 0.18], 0.6, 0.5, [139, 69, 19], 10),
            Faction::Jove => preset([0.42, 0.3, 0.45], 0.85, 0.2, [186, 85, 211], 11),
            Faction::SpecialEdition => preset([0.55, 0.25, 0.4], 0.9, 0.2, [255, 20, 147], 12),
            Faction::Upwell => preset([0.2, 0.45, 0.55], 0.8, 0.3, [0, 191, 255], 13),
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Faction {
    type Err = UnknownFaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Faction::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| UnknownFaction(s.to_string()))
    }
}

/// How the hull material is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPolicy {
    /// Tint by faction; unknown factions fall back to neutral.
    #[default]
    Faction,
    /// Same gray-blue hull for every ship.
    Neutral,
}

impl MaterialPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialPolicy::Faction => "faction",
            MaterialPolicy::Neutral => "neutral",
        }
    }

    /// Material for a ship of the given faction.
    pub fn material_for(&self, faction: Option<Faction>) -> MaterialPreset {
        match (self, faction) {
            (MaterialPolicy::Faction, Some(f)) => f.preset().material,
            _ => NEUTRAL_MATERIAL,
        }
    }
}

impl FromStr for MaterialPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faction" => Ok(MaterialPolicy::Faction),
            "neutral" => Ok(MaterialPolicy::Neutral),
            other => Err(format!(
                "unknown material policy '{}', expected faction or neutral",
                other
            )),
        }
    }
}

/// Audit-sheet header colour for a directory name.
pub fn sheet_color(name: &str) -> [u8; 3] {
    name.parse::<Faction>()
        .map(|f| f.preset().sheet_color)
        .unwrap_or(UNKNOWN_SHEET_COLOR)
}

/// Audit-sheet ordering key; unknown names sort last.
pub fn sheet_order(name: &str) -> u8 {
    name.parse::<Faction>()
        .map(|f| f.preset().sheet_order)
        .unwrap_or(99)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_all() {
        for faction in Faction::ALL {
            assert_eq!(faction.as_str().parse::<Faction>().unwrap(), faction);
        }
        assert_eq!("Caldari".parse::<Faction>().unwrap(), Faction::Caldari);
        assert!("guristas".parse::<Faction>().is_err());
    }

    #[test]
    fn test_sheet_order_is_display_order() {
        let orders: Vec<u8> = Faction::ALL.iter().map(|f| f.preset().sheet_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        assert_eq!(sheet_order("sheets"), 99);
    }

    #[test]
    fn test_material_policy() {
        assert_eq!(
            MaterialPolicy::Neutral.material_for(Some(Faction::Amarr)),
            NEUTRAL_MATERIAL
        );
        assert_eq!(MaterialPolicy::Faction.material_for(None), NEUTRAL_MATERIAL);
        assert_eq!(
            MaterialPolicy::Faction.material_for(Some(Faction::Amarr)),
            Faction::Amarr.preset().material
        );
    }

    #[test]
    fn test_sheet_color_fallback() {
        assert_eq!(sheet_color("amarr"), [255, 215, 0]);
        assert_eq!(sheet_color("misc"), UNKNOWN_SHEET_COLOR);
    }
}
