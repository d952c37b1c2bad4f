//! Locating rendered sprites for catalog entries.

use std::path::{Path, PathBuf};

use hullsprite_spec::CatalogEntry;
use walkdir::WalkDir;

/// Finds the sprite for a catalog entry under `root`.
///
/// Direct candidates are tried first (`<faction>/<class>/<name>.png`, the
/// same with a lowercased name, then `<faction>/<name>.png`). Otherwise the
/// faction directory is walked in file-name order and the first `.png` whose
/// stem equals the name, or contains it, case-insensitively, wins.
pub fn find_sprite(root: &Path, entry: &CatalogEntry) -> Option<PathBuf> {
    let faction_dir = root.join(&entry.faction);
    let file = format!("{}.png", entry.name);
    let lower_file = format!("{}.png", entry.name.to_lowercase());

    let mut candidates = Vec::with_capacity(3);
    if let Some(class) = &entry.class {
        candidates.push(faction_dir.join(class).join(&file));
        candidates.push(faction_dir.join(class).join(&lower_file));
    }
    candidates.push(faction_dir.join(&file));

    if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
        return Some(found);
    }

    let needle = entry.name.to_lowercase();
    WalkDir::new(&faction_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .find(|e| {
            e.path()
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(faction: &str, class: &str, name: &str) -> CatalogEntry {
        CatalogEntry {
            type_id: 1,
            faction: faction.to_string(),
            class: (!class.is_empty()).then(|| class.to_string()),
            name: name.to_string(),
        }
    }

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"png").unwrap();
        path
    }

    #[test]
    fn test_direct_path() {
        let dir = tempfile::tempdir().unwrap();
        let expected = touch(dir.path(), "caldari/frigate/kestrel.png");
        touch(dir.path(), "caldari/kestrel.png");
        assert_eq!(
            find_sprite(dir.path(), &entry("caldari", "frigate", "kestrel")),
            Some(expected)
        );
    }

    #[test]
    fn test_lowercased_name() {
        let dir = tempfile::tempdir().unwrap();
        let expected = touch(dir.path(), "caldari/destroyer/jackdaw.png");
        assert_eq!(
            find_sprite(dir.path(), &entry("caldari", "destroyer", "Jackdaw")),
            Some(expected)
        );
    }

    #[test]
    fn test_faction_level_without_class() {
        let dir = tempfile::tempdir().unwrap();
        let expected = touch(dir.path(), "triglavian/damavik.png");
        assert_eq!(
            find_sprite(dir.path(), &entry("triglavian", "", "damavik")),
            Some(expected)
        );
    }

    #[test]
    fn test_fuzzy_substring_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pirate/zz/stratios_old.png");
        let expected = touch(dir.path(), "pirate/aa/stratios_final.png");
        touch(dir.path(), "pirate/aa/notes.txt");
        assert_eq!(
            find_sprite(dir.path(), &entry("pirate", "soe", "Stratios")),
            Some(expected)
        );
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "amarr/frigate/punisher.png");
        assert_eq!(find_sprite(dir.path(), &entry("amarr", "frigate", "omen")), None);
        assert_eq!(find_sprite(dir.path(), &entry("jove", "", "sarum")), None);
    }
}
