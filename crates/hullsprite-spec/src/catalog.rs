//! Game type-ID catalog mapping numeric asset IDs to ships.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::faction::Faction;
use crate::ship_key::ShipKey;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub type_id: u32,
    pub faction: String,
    /// Ship class directory; absent for factions without class folders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub name: String,
}

impl CatalogEntry {
    /// Parsed faction, if it is one of the known set.
    pub fn faction(&self) -> Option<Faction> {
        self.faction.parse().ok()
    }

    /// Ship key for size and override lookups.
    pub fn ship_key(&self) -> ShipKey {
        ShipKey {
            faction: self.faction.clone(),
            class: self.class.clone(),
            name: self.name.clone(),
        }
    }
}

// (type_id, faction, class, name); an empty class means none.
const BUILTIN: &[(u32, &str, &str, &str)] = &[
    (583, "caldari", "frigate", "bantam"),
    (602, "caldari", "frigate", "kestrel"),
    (603, "caldari", "frigate", "merlin"),
    (605, "caldari", "frigate", "condor"),
    (608, "caldari", "frigate", "griffin"),
    (607, "caldari", "frigate", "heron"),
    (621, "caldari", "cruiser", "caracal"),
    (620, "caldari", "cruiser", "moa"),
    (622, "caldari", "cruiser", "osprey"),
    (623, "caldari", "cruiser", "blackbird"),
    (638, "caldari", "battleship", "raven"),
    (639, "caldari", "battleship", "scorpion"),
    (640, "caldari", "battleship", "rokh"),
    (24688, "caldari", "battlecruiser", "drake"),
    (16238, "caldari", "battlecruiser", "ferox"),
    (16236, "caldari", "battlecruiser", "nighthawk"),
    (589, "amarr", "frigate", "impairor"),
    (593, "amarr", "frigate", "magnate"),
    (594, "amarr", "frigate", "crucifier"),
    (596, "amarr", "frigate", "tormentor"),
    (597, "amarr", "frigate", "punisher"),
    (598, "amarr", "frigate", "inquisitor"),
    (590, "amarr", "frigate", "executioner"),
    (624, "amarr", "cruiser", "omen"),
    (625, "amarr", "cruiser", "maller"),
    (626, "amarr", "cruiser", "augoror"),
    (628, "amarr", "cruiser", "arbitrator"),
    (642, "amarr", "battleship", "apocalypse"),
    (643, "amarr", "battleship", "armageddon"),
    (644, "amarr", "battleship", "abaddon"),
    (24690, "amarr", "battlecruiser", "prophecy"),
    (16240, "amarr", "battlecruiser", "harbringer"),
    (585, "gallente", "frigate", "atron"),
    (586, "gallente", "frigate", "incursus"),
    (587, "gallente", "frigate", "tristan"),
    (588, "gallente", "frigate", "imicus"),
    (591, "gallente", "frigate", "maulus"),
    (592, "gallente", "frigate", "navitas"),
    (627, "gallente", "cruiser", "vexor"),
    (629, "gallente", "cruiser", "thorax"),
    (630, "gallente", "cruiser", "exequror"),
    (631, "gallente", "cruiser", "celestis"),
    (641, "gallente", "battleship", "dominix"),
    (645, "gallente", "battleship", "megathron"),
    (24696, "gallente", "battlecruiser", "myrmidon"),
    (16242, "gallente", "battlecruiser", "brutix"),
    (11371, "minmatar", "frigate", "wolf"),
    (11373, "minmatar", "frigate", "jaguar"),
    (11377, "minmatar", "cruiser", "vagabond"),
    (11381, "minmatar", "cruiser", "muninn"),
    (11387, "minmatar", "cruiser", "scythe"),
    (11400, "minmatar", "cruiser", "stabber"),
    (24694, "minmatar", "battleship", "tempest"),
    (24700, "minmatar", "battleship", "typhoon"),
    (11547, "minmatar", "battlecruiser", "cyclone"),
    (11566, "minmatar", "battlecruiser", "hurricane"),
    (11567, "minmatar", "battlecruiser", "sleipnir"),
    (11568, "minmatar", "battlecruiser", "claymore"),
    (11184, "amarr", "frigate", "vengeance"),
    (11186, "amarr", "frigate", "retribution"),
    (1944, "concord", "frigate", "pacifier"),
    (2006, "special_edition", "battleship", "marshall"),
    (3764, "pirate", "fighter", "Pirate_Fighter"),
    (20185, "ore", "frigate", "venture"),
    (23757, "pirate", "soe", "Stratios"),
    (23911, "pirate", "sanshas nation", "phantasm"),
    (23915, "pirate", "sanshas nation", "nightmare"),
    (24483, "pirate", "blood raiders", "Ashimmu"),
    (47269, "triglavian", "", "damavik"),
    (47466, "triglavian", "", "kikimora"),
    (35683, "caldari", "destroyer", "Jackdaw"),
    (35685, "minmatar", "destroyer", "svipul"),
];

/// Immutable type-ID lookup table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeCatalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl TypeCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|&(type_id, faction, class, name)| {
                let entry = CatalogEntry {
                    type_id,
                    faction: faction.to_string(),
                    class: (!class.is_empty()).then(|| class.to_string()),
                    name: name.to_string(),
                };
                (type_id, entry)
            })
            .collect();
        Self { entries }
    }

    /// Parses a catalog from a JSON array of entries.
    ///
    /// Duplicate type IDs are rejected.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let rows: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse {
                origin: origin.to_string(),
                source,
            })?;

        let mut entries = BTreeMap::new();
        for mut row in rows {
            if row.faction.is_empty() || row.name.is_empty() {
                return Err(ConfigError::invalid_entry(
                    origin,
                    row.type_id.to_string(),
                    "faction and name must not be empty",
                ));
            }
            if row.class.as_deref() == Some("") {
                row.class = None;
            }
            let type_id = row.type_id;
            if entries.insert(type_id, row).is_some() {
                return Err(ConfigError::invalid_entry(
                    origin,
                    type_id.to_string(),
                    "duplicate type id",
                ));
            }
        }
        Ok(Self { entries })
    }

    /// Loads an external catalog file. Unlike the tables, the file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            origin: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    pub fn get(&self, type_id: u32) -> Option<&CatalogEntry> {
        self.entries.get(&type_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending type-ID order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}
