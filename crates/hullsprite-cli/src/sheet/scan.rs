//! Collecting sprites per faction directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hullsprite_spec::sheet_order;
use walkdir::WalkDir;

use super::SheetError;

/// Directories under the sprite root that never hold sprites.
pub const DEFAULT_EXCLUDES: &[&str] = &["sheets", "audit_sheets"];

/// One sprite found under a faction directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteInfo {
    pub path: PathBuf,
    /// File stem.
    pub name: String,
    /// Directory relative to the faction directory, `/`-separated; empty at
    /// the faction level.
    pub subdir: String,
}

/// Collects `.png` sprites under each immediate sub-directory of `root`.
///
/// Hidden directories, [`DEFAULT_EXCLUDES`] and `exclude` are skipped.
/// Sprites are sorted by (subdir, name) within each faction; factions with
/// no sprites are left out.
pub fn scan_sprites(
    root: &Path,
    exclude: &[String],
) -> Result<BTreeMap<String, Vec<SpriteInfo>>, SheetError> {
    let entries = std::fs::read_dir(root).map_err(|source| SheetError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut factions = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|source| SheetError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.')
            || DEFAULT_EXCLUDES.contains(&name.as_str())
            || exclude.iter().any(|e| e == &name)
        {
            continue;
        }

        let sprites = scan_faction(&path)?;
        if !sprites.is_empty() {
            factions.insert(name, sprites);
        }
    }
    Ok(factions)
}

fn scan_faction(dir: &Path) -> Result<Vec<SpriteInfo>, SheetError> {
    let mut sprites = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| SheetError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_png = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !entry.file_type().is_file() || !is_png {
            continue;
        }
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let subdir = path
            .parent()
            .and_then(|p| p.strip_prefix(dir).ok())
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        sprites.push(SpriteInfo {
            path: path.to_path_buf(),
            name,
            subdir,
        });
    }
    sprites.sort_by(|a, b| (&a.subdir, &a.name).cmp(&(&b.subdir, &b.name)));
    Ok(sprites)
}

/// Faction names in master-sheet order: known factions by display order,
/// then unknown ones alphabetically.
pub fn master_order<'a>(factions: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = factions.into_iter().map(|s| s.as_str()).collect();
    names.sort_by_key(|name| (sheet_order(name), *name));
    names
}
