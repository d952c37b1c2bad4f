//! Doctor command implementation
//!
//! Checks the Blender installation and the config tables.

use anyhow::Result;
use colored::Colorize;
use hullsprite_backend_blender::{BlenderError, Orchestrator, OrchestratorConfig};
use hullsprite_spec::{
    OverrideTable, SizeTable, TypeCatalog, ORIENTATIONS_FILE, SIZES_FILE,
};
use std::path::Path;
use std::process::ExitCode;

/// Run the doctor command
///
/// Checks:
/// - Tool version
/// - Blender installation and version
/// - Orientation and size tables in `config_dir`
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(config_dir: &Path, blender: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "Hullsprite Doctor".cyan().bold());
    println!("{}", "=================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} hullsprite v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "  {} built-in catalog: {} ships",
        "->".green(),
        TypeCatalog::builtin().len()
    );
    println!();

    println!("{}", "Dependencies:".bold());
    let mut config = OrchestratorConfig::new();
    if let Some(path) = blender {
        config = config.blender_path(path);
    }
    let orchestrator = Orchestrator::with_config(config);
    match orchestrator.find_blender() {
        Ok(path) => match orchestrator.blender_version() {
            Ok(version) => {
                println!("  {} {} ({})", "ok".green(), version, path.display());
            }
            Err(e) => {
                println!("  {} Blender at {} failed: {}", "!!".red(), path.display(), e);
                all_ok = false;
            }
        },
        Err(BlenderError::BlenderNotFound) => {
            println!("  {} Blender not found", "!!".yellow());
            println!(
                "     {}",
                "Blender is required for `hullsprite render`; set BLENDER_PATH or pass --blender."
                    .dimmed()
            );
            all_ok = false;
        }
        Err(e) => {
            println!("  {} Blender check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    println!("{} ({})", "Config tables:".bold(), config_dir.display());
    for check in check_tables(config_dir) {
        match check.result {
            Ok(summary) => println!("  {} {}: {}", "ok".green(), check.file, summary),
            Err(e) => {
                println!("  {} {}: {}", "!!".red(), check.file, e);
                all_ok = false;
            }
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "FAILED".red().bold()
        );
        Ok(ExitCode::from(1))
    }
}

struct TableCheck {
    file: &'static str,
    result: Result<String, String>,
}

fn describe_presence(path: &Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (file absent, empty table)"
    }
}

fn check_tables(config_dir: &Path) -> Vec<TableCheck> {
    let orientations = config_dir.join(ORIENTATIONS_FILE);
    let sizes = config_dir.join(SIZES_FILE);
    vec![
        TableCheck {
            file: ORIENTATIONS_FILE,
            result: OverrideTable::load(&orientations)
                .map(|t| {
                    format!("{} overrides{}", t.len(), describe_presence(&orientations))
                })
                .map_err(|e| e.to_string()),
        },
        TableCheck {
            file: SIZES_FILE,
            result: SizeTable::load(&sizes)
                .map(|t| {
                    format!(
                        "{} sizes, {} class defaults{}",
                        t.len(),
                        t.class_default_count(),
                        describe_presence(&sizes)
                    )
                })
                .map_err(|e| e.to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tables_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let checks = check_tables(dir.path());
        assert_eq!(checks.len(), 2);
        assert_eq!(
            checks[0].result,
            Ok("0 overrides (file absent, empty table)".to_string())
        );
    }

    #[test]
    fn test_check_tables_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SIZES_FILE), "{ not json").unwrap();
        std::fs::write(
            dir.path().join(ORIENTATIONS_FILE),
            r#"{"amarr/frigate/punisher": {"axis": "y"}}"#,
        )
        .unwrap();
        let checks = check_tables(dir.path());
        assert_eq!(checks[0].result, Ok("1 overrides".to_string()));
        assert!(checks[1].result.is_err());
    }
}
