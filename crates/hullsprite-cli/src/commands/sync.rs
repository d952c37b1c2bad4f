//! Sync command implementation
//!
//! Refreshes `<type_id>.png` sprites in a game asset directory from the
//! rendered sprite tree.

use anyhow::{Context, Result};
use colored::Colorize;
use hullsprite_spec::{CatalogEntry, TypeCatalog};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};

use crate::lookup::find_sprite;

/// What happened to one destination sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Copied (or would be copied, in a dry run) from `source`.
    Updated { source: PathBuf },
    /// The type ID is mapped but no source sprite was found.
    NotFound,
    /// The type ID is not in the catalog.
    NoMapping,
    /// The copy itself failed.
    CopyFailed { message: String },
}

impl SyncOutcome {
    fn is_missing(&self) -> bool {
        !matches!(self, SyncOutcome::Updated { .. })
    }
}

/// Result for one destination sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncItem {
    pub type_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<CatalogEntry>,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Result of a whole sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncSummary {
    pub dry_run: bool,
    pub total: usize,
    pub updated: usize,
    pub items: Vec<SyncItem>,
}

impl SyncSummary {
    /// Items that were not updated.
    pub fn missing(&self) -> impl Iterator<Item = &SyncItem> {
        self.items.iter().filter(|item| item.outcome.is_missing())
    }

    pub fn missing_count(&self) -> usize {
        self.missing().count()
    }
}

/// Type IDs of the `<id>.png` files in `dest`, ascending. Other files are ignored.
pub fn destination_ids(dest: &Path) -> Result<Vec<u32>> {
    let entries = fs::read_dir(dest)
        .with_context(|| format!("Failed to read destination directory {}", dest.display()))?;

    let mut ids = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read destination directory {}", dest.display()))?
            .path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        if let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u32>().ok())
        {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

/// Copies `src` over `dest`, keeping the source modification time when the
/// platform allows it.
fn copy_preserving_mtime(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(src, dest)?;
    let modified = fs::metadata(src).and_then(|m| m.modified());
    let applied = modified.and_then(|mtime| {
        fs::OpenOptions::new()
            .write(true)
            .open(dest)
            .and_then(|f| f.set_modified(mtime))
    });
    if let Err(e) = applied {
        debug!(dest = %dest.display(), error = %e, "could not preserve modification time");
    }
    Ok(())
}

/// Syncs every `<id>.png` in `dest` from the sprite tree under `src`.
///
/// Per-item failures are recorded and the run continues. A destination that
/// does not exist yet holds no sprites, so the summary is empty.
pub fn sync_sprites(
    src: &Path,
    dest: &Path,
    catalog: &TypeCatalog,
    dry_run: bool,
) -> Result<SyncSummary> {
    let ids = if dest.exists() {
        destination_ids(dest)?
    } else {
        debug!(dest = %dest.display(), "destination does not exist");
        Vec::new()
    };
    let mut items = Vec::with_capacity(ids.len());

    for type_id in ids {
        let Some(entry) = catalog.get(type_id) else {
            items.push(SyncItem {
                type_id,
                entry: None,
                outcome: SyncOutcome::NoMapping,
            });
            continue;
        };

        let outcome = match find_sprite(src, entry) {
            None => SyncOutcome::NotFound,
            Some(source) if dry_run => SyncOutcome::Updated { source },
            Some(source) => {
                let target = dest.join(format!("{}.png", type_id));
                match copy_preserving_mtime(&source, &target) {
                    Ok(()) => SyncOutcome::Updated { source },
                    Err(e) => {
                        warn!(source = %source.display(), error = %e, "copy failed");
                        SyncOutcome::CopyFailed {
                            message: e.to_string(),
                        }
                    }
                }
            }
        };
        items.push(SyncItem {
            type_id,
            entry: Some(entry.clone()),
            outcome,
        });
    }

    let updated = items
        .iter()
        .filter(|item| !item.outcome.is_missing())
        .count();
    Ok(SyncSummary {
        dry_run,
        total: items.len(),
        updated,
        items,
    })
}

/// Run the sync command
///
/// # Arguments
/// * `src` - Root of the rendered sprite tree
/// * `dest` - Directory of `<type_id>.png` files to refresh
/// * `catalog_path` - External catalog JSON replacing the built-in one
/// * `dry_run` - Report without copying
/// * `json_output` - Print the summary as JSON
///
/// # Returns
/// Exit code: 0 when every sprite was updated, 1 otherwise
pub fn run(
    src: &Path,
    dest: &Path,
    catalog_path: Option<&Path>,
    dry_run: bool,
    json_output: bool,
) -> Result<ExitCode> {
    let catalog = match catalog_path {
        Some(path) => TypeCatalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => TypeCatalog::builtin(),
    };

    if !dry_run {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
    }

    let summary = sync_sprites(src, dest, &catalog, dry_run)?;

    if json_output {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize sync summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    if summary.missing_count() == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_summary(summary: &SyncSummary) {
    let verb = if summary.dry_run { "Checking" } else { "Updating" };
    println!("{} {} sprites\n", verb.cyan().bold(), summary.total);

    if summary.total == 0 {
        println!("{} nothing to sync", "INFO".cyan());
        return;
    }

    for item in &summary.items {
        let (name, faction) = match &item.entry {
            Some(entry) => (entry.name.as_str(), entry.faction.as_str()),
            None => ("???", "unknown"),
        };
        let status = match &item.outcome {
            SyncOutcome::Updated { .. } => "ok".green(),
            SyncOutcome::NotFound => "NOT FOUND".yellow(),
            SyncOutcome::NoMapping => "NO MAPPING".yellow(),
            SyncOutcome::CopyFailed { .. } => "COPY FAILED".red(),
        };
        println!("  {:5}: {:20} ({:12}) {}", item.type_id, name, faction, status);
    }

    println!("\n{}", "=".repeat(60));
    println!("Updated: {}/{}", summary.updated, summary.total);
    println!("Missing: {}", summary.missing_count());

    if summary.missing_count() > 0 {
        println!("\n{}", "Missing sprites - need manual resolution:".yellow().bold());
        for item in summary.missing() {
            match &item.entry {
                Some(entry) => println!("  {}: {}", item.type_id, entry.ship_key()),
                None => println!("  {}: unknown", item.type_id),
            }
        }
    }
}
