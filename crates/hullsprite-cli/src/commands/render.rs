//! Render command implementation
//!
//! Plans the orientation and framing of one mesh, then hands the render job
//! to Blender.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use hullsprite_backend_blender::{render_with_config, OrchestratorConfig, RenderJob};
use hullsprite_spec::{BackendError, MaterialPolicy, ShipKey};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;

use crate::analysis::read_stl;
use crate::planning::{resolve_ship_key, ConfigTables, RenderPlan};

/// Options of one `hullsprite render` invocation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub resolution: u32,
    pub samples: u32,
    pub key: Option<String>,
    pub config_dir: PathBuf,
    pub material: MaterialPolicy,
    pub blender: Option<PathBuf>,
    pub entrypoint: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    success: bool,
    output_path: &'a Path,
    plan: &'a RenderPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blender_version: Option<String>,
    duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Debug, Serialize)]
struct JsonError {
    code: String,
    message: String,
}

/// Run the render command
///
/// # Returns
/// Exit code: 0 on success, 1 when Blender fails
pub fn run(opts: &RenderOptions) -> Result<ExitCode> {
    let start = Instant::now();

    if !opts.input.exists() {
        bail!("input file not found: {}", opts.input.display());
    }

    let key = ship_key(opts)?;
    let output = absolute(&opts.output)?;
    let tables = ConfigTables::load(&opts.config_dir).with_context(|| {
        format!("failed to load config tables from {}", opts.config_dir.display())
    })?;
    let mesh = read_stl(&opts.input)?;
    let plan = RenderPlan::for_mesh(&mesh, key, &tables)
        .with_context(|| format!("failed to plan render of {}", opts.input.display()))?;

    info!(
        input = %opts.input.display(),
        key = plan.ship_key.as_ref().map(|k| k.to_string()).unwrap_or_default(),
        steps = plan.steps.len(),
        fill_ratio = plan.fill_ratio,
        "planned render"
    );

    let faction = plan.ship_key.as_ref().and_then(|k| k.known_faction());
    let job = RenderJob::new(
        absolute(&opts.input)?,
        &output,
        plan.steps.clone(),
        opts.material.material_for(faction),
        plan.framing,
    )
    .resolution(opts.resolution)
    .samples(opts.samples)
    .expected_extent(plan.final_extent);

    let mut config = OrchestratorConfig::new();
    if let Some(path) = &opts.blender {
        config = config.blender_path(path);
    }
    if let Some(path) = &opts.entrypoint {
        config.entrypoint_path = Some(path.clone());
    }
    if let Some(secs) = opts.timeout_secs {
        config = config.timeout_secs(secs);
    }

    if !opts.json {
        println!("{} {}", "Rendering".cyan().bold(), opts.input.display());
        print_plan_summary(&plan);
    }

    let result = render_with_config(&job, config);
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(rendered) => {
            if opts.json {
                let out = RenderOutput {
                    success: true,
                    output_path: &rendered.output_path,
                    plan: &plan,
                    dimensions_match: rendered.dimensions_match,
                    blender_version: rendered.report.blender_version.clone(),
                    duration_ms,
                    error: None,
                };
                print_json(&out)?;
            } else {
                if rendered.dimensions_match == Some(false) {
                    println!(
                        "  {} Blender dimensions differ from the planned extent",
                        "!!".yellow()
                    );
                }
                println!(
                    "{} {} ({}ms)",
                    "SUCCESS".green().bold(),
                    rendered.output_path.display(),
                    duration_ms
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if opts.json {
                let out = RenderOutput {
                    success: false,
                    output_path: &output,
                    plan: &plan,
                    dimensions_match: None,
                    blender_version: None,
                    duration_ms,
                    error: Some(JsonError {
                        code: e.code().to_string(),
                        message: e.message(),
                    }),
                };
                print_json(&out)?;
            } else {
                println!("{} [{}] {}", "FAILED".red().bold(), e.code(), e);
            }
            Ok(ExitCode::from(1))
        }
    }
}

/// Ship key from `--key`, else from the output path exactly as given.
///
/// Only the job paths are made absolute; an absolute path would let a
/// faction-named directory above the working directory win the key.
fn ship_key(opts: &RenderOptions) -> Result<Option<ShipKey>> {
    resolve_ship_key(opts.key.as_deref(), Some(&opts.output))
}

fn print_plan_summary(plan: &RenderPlan) {
    match &plan.ship_key {
        Some(key) => println!("  {} key {}", "INFO".blue(), key),
        None => println!("  {} no ship key, framing without size", "INFO".blue()),
    }
    if plan.override_applied {
        println!("  {} orientation override applied", "INFO".blue());
    }
    println!(
        "  {} {} rotation step(s), fill {:.3}, ortho scale {:.3}",
        "ok".green(),
        plan.steps.len(),
        plan.fill_ratio,
        plan.framing.ortho_scale
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}

/// Blender runs from its own working directory; hand it absolute paths.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(input: PathBuf, output: PathBuf) -> RenderOptions {
        RenderOptions {
            input,
            output,
            resolution: 512,
            samples: 64,
            key: None,
            config_dir: PathBuf::from("."),
            material: MaterialPolicy::Faction,
            blender: None,
            entrypoint: None,
            timeout_secs: None,
            json: false,
        }
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path().join("absent.stl"), dir.path().join("out.png"));
        let err = run(&opts).unwrap_err();
        assert!(err.to_string().contains("input file not found"));
    }

    #[test]
    fn test_bad_explicit_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ship.stl");
        std::fs::write(&input, b"solid x\nendsolid x\n").unwrap();
        let mut opts = options(input, dir.path().join("out.png"));
        opts.key = Some("just-a-name".to_string());
        assert!(run(&opts).is_err());
    }

    #[test]
    fn test_key_uses_output_path_as_given() {
        let opts = options(
            PathBuf::from("kestrel.stl"),
            PathBuf::from("caldari/frigate/kestrel.png"),
        );
        let key = ship_key(&opts).unwrap().unwrap();
        assert_eq!(key.to_string(), "caldari/frigate/kestrel");

        // Made absolute under a faction-named directory, the key would change.
        let nested = Path::new("/home/dev/pirate/renders").join(&opts.output);
        let shifted = resolve_ship_key(None, Some(&nested)).unwrap().unwrap();
        assert_eq!(shifted.to_string(), "pirate/renders/kestrel");
        assert_ne!(shifted, key);
    }

    #[test]
    fn test_explicit_key_wins_over_output_path() {
        let mut opts = options(
            PathBuf::from("kestrel.stl"),
            PathBuf::from("caldari/frigate/kestrel.png"),
        );
        opts.key = Some("amarr/frigate/punisher".to_string());
        assert_eq!(
            ship_key(&opts).unwrap().unwrap().to_string(),
            "amarr/frigate/punisher"
        );
    }

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(absolute(dir.path()).unwrap(), dir.path());
        assert!(absolute(Path::new("rel/out.png")).unwrap().is_absolute());
    }
}
