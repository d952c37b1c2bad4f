//! Audit command implementation
//!
//! Writes contact sheets of rendered sprites for visual review.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::sheet::layout::{
    faction_title, page_file_name, paginate, DEFAULT_COLS, DEFAULT_THUMB, MASTER_FILE,
};
use crate::sheet::{
    compose_faction_sheet, compose_master_sheet, master_order, save_png, scan_sprites,
    SheetStyle, SpriteInfo,
};

/// Options of one `hullsprite audit` invocation.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub sprites_dir: PathBuf,
    /// Defaults to `<sprites_dir>/audit_sheets`.
    pub output: Option<PathBuf>,
    pub thumb: u32,
    pub cols: u32,
    pub max_rows: Option<u32>,
    pub all: bool,
    pub exclude: Vec<String>,
}

impl AuditOptions {
    pub fn new(sprites_dir: impl Into<PathBuf>) -> Self {
        Self {
            sprites_dir: sprites_dir.into(),
            output: None,
            thumb: DEFAULT_THUMB,
            cols: DEFAULT_COLS,
            max_rows: None,
            all: false,
            exclude: Vec::new(),
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.sprites_dir.join("audit_sheets"))
    }

    /// User excludes plus the output directory when it sits directly under
    /// the sprite root.
    fn excludes(&self, output_dir: &Path) -> Vec<String> {
        let mut exclude = self.exclude.clone();
        if output_dir.parent() == Some(self.sprites_dir.as_path()) {
            if let Some(name) = output_dir.file_name() {
                exclude.push(name.to_string_lossy().to_string());
            }
        }
        exclude
    }
}

/// Sheets written by one audit run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub factions: usize,
    pub sprites: usize,
    pub sheets: Vec<PathBuf>,
}

/// Scans the sprite tree and writes every sheet.
///
/// Returns `Ok(None)` when no sprites were found.
pub fn generate_sheets(opts: &AuditOptions) -> Result<Option<AuditSummary>> {
    if opts.cols == 0 {
        bail!("--cols must be at least 1");
    }
    if opts.thumb <= 4 {
        bail!("--size must be larger than 4");
    }

    let output_dir = opts.output_dir();
    let groups = scan_sprites(&opts.sprites_dir, &opts.excludes(&output_dir))
        .with_context(|| format!("Failed to scan {}", opts.sprites_dir.display()))?;
    if groups.is_empty() {
        return Ok(None);
    }

    let mut summary = AuditSummary {
        factions: groups.len(),
        sprites: groups.values().map(Vec::len).sum(),
        sheets: Vec::new(),
    };

    let style = SheetStyle::faction(opts.thumb, opts.cols);
    for (faction, sprites) in &groups {
        let pages = paginate(sprites, opts.cols, opts.max_rows);
        for (page, chunk) in pages.iter().enumerate() {
            let title = faction_title(faction, sprites.len(), page, pages.len());
            let img = compose_faction_sheet(faction, &title, chunk, &style)?;
            let path = output_dir.join(page_file_name(faction, page));
            save_png(&img, &path)?;
            info!(faction = %faction, page = page + 1, sprites = chunk.len(), "wrote sheet");
            summary.sheets.push(path);
        }
    }

    if opts.all {
        let ordered: Vec<(&str, &[SpriteInfo])> = master_order(groups.keys())
            .into_iter()
            .filter_map(|name| groups.get(name).map(|s| (name, s.as_slice())))
            .collect();
        let img = compose_master_sheet(&ordered)?;
        let path = output_dir.join(MASTER_FILE);
        save_png(&img, &path)?;
        summary.sheets.push(path);
    }

    Ok(Some(summary))
}

/// Run the audit command
///
/// # Returns
/// Exit code: 0 when sheets were written, 1 when no sprites were found
pub fn run(opts: &AuditOptions) -> Result<ExitCode> {
    println!("{}", "Scanning for sprites...".cyan());

    let Some(summary) = generate_sheets(opts)? else {
        println!("{} No sprites found in {}", "!!".yellow(), opts.sprites_dir.display());
        return Ok(ExitCode::from(1));
    };

    println!(
        "Found {} sprites across {} factions\n",
        summary.sprites, summary.factions
    );
    for sheet in &summary.sheets {
        println!("  {} {}", "ok".green(), sheet.display());
    }
    println!(
        "\n{} Sheets saved to: {}",
        "SUCCESS".green().bold(),
        opts.output_dir().display()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_under_root_is_excluded() {
        let opts = AuditOptions::new("/sprites");
        let out = opts.output_dir();
        assert_eq!(out, PathBuf::from("/sprites/audit_sheets"));
        assert_eq!(opts.excludes(&out), vec!["audit_sheets".to_string()]);

        let mut custom = AuditOptions::new("/sprites");
        custom.exclude = vec!["wip".to_string()];
        assert_eq!(custom.excludes(Path::new("/tmp/out")), vec!["wip".to_string()]);
    }

    #[test]
    fn test_empty_tree_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let opts = AuditOptions::new(dir.path());
        assert_eq!(generate_sheets(&opts).unwrap(), None);
    }

    #[test]
    fn test_huge_grid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let faction = dir.path().join("amarr");
        std::fs::create_dir_all(&faction).unwrap();
        image::RgbaImage::new(8, 8).save(faction.join("punisher.png")).unwrap();

        let mut opts = AuditOptions::new(dir.path());
        opts.cols = u32::MAX;
        let err = generate_sheets(&opts).unwrap_err();
        assert!(err.to_string().contains("invalid sheet layout"), "{}", err);
    }

    #[test]
    fn test_rejects_zero_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = AuditOptions::new(dir.path());
        opts.cols = 0;
        assert!(generate_sheets(&opts).is_err());
    }
}
