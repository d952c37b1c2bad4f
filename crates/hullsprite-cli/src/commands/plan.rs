//! Plan command implementation
//!
//! Runs the normalizer on a mesh without starting Blender.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use hullsprite_spec::{BoundingExtent, OrientationPlan, SizeLookup};
use std::path::Path;
use std::process::ExitCode;

use crate::analysis::read_stl;
use crate::planning::{resolve_ship_key, ConfigTables, RenderPlan};

/// Run the plan command
///
/// # Arguments
/// * `input` - STL mesh to plan
/// * `key` - Explicit ship key
/// * `output` - Sprite path the key is derived from when `key` is absent
/// * `config_dir` - Directory holding the orientation and size tables
/// * `json_output` - Print the plan as JSON
pub fn run(
    input: &Path,
    key: Option<&str>,
    output: Option<&Path>,
    config_dir: &Path,
    json_output: bool,
) -> Result<ExitCode> {
    if !input.exists() {
        bail!("input file not found: {}", input.display());
    }

    let key = resolve_ship_key(key, output)?;
    let tables = ConfigTables::load(config_dir).with_context(|| {
        format!("failed to load config tables from {}", config_dir.display())
    })?;
    let mesh = read_stl(input)?;
    let plan = RenderPlan::for_mesh(&mesh, key, &tables)?;

    if json_output {
        let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{}", json);
    } else {
        print_plan(input, mesh.triangle_count(), &plan);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_plan(input: &Path, triangles: usize, plan: &RenderPlan) {
    println!("{} {}", "Plan for".cyan().bold(), input.display());
    println!("  triangles:      {}", triangles);
    match &plan.ship_key {
        Some(key) => println!("  ship key:       {}", key),
        None => println!("  ship key:       {}", "(none)".dimmed()),
    }
    println!("  original:       {}", format_extent(&plan.original_extent));
    println!("  orientation:    {}", describe_orientation(&plan.orientation, plan.override_applied));
    if plan.steps.is_empty() {
        println!("  steps:          {}", "(none)".dimmed());
    } else {
        for (i, step) in plan.steps.iter().enumerate() {
            println!(
                "  step {}:         x={} y={} z={}",
                i + 1,
                step.x,
                step.y,
                step.z
            );
        }
    }
    println!("  final:          {}", format_extent(&plan.final_extent));
    println!("  size:           {}", describe_size(&plan.size));
    println!("  fill ratio:     {:.4}", plan.fill_ratio);
    println!(
        "  camera:         ortho_scale={:.4} height={:.3} clip_end={:.3} margin={}",
        plan.framing.ortho_scale,
        plan.framing.camera_height,
        plan.framing.clip_end,
        plan.framing.margin
    );
}

fn format_extent(extent: &BoundingExtent) -> String {
    format!(
        "{:.3} x {:.3} x {:.3} (w x d x h)",
        extent.width, extent.depth, extent.height
    )
}

fn describe_orientation(plan: &OrientationPlan, overridden: bool) -> String {
    let source = if overridden { "override" } else { "auto" };
    match plan {
        OrientationPlan::Explicit(_) => format!("explicit angles ({})", source),
        OrientationPlan::Semantic(a) => {
            let mut parts = vec![format!("vertical={}", a.vertical.as_str())];
            if a.yaw_swap {
                parts.push("yaw 90".to_string());
            }
            if a.flip {
                parts.push("flip".to_string());
            }
            if a.yaw_degrees != 0.0 {
                parts.push(format!("yaw {}", a.yaw_degrees));
            }
            format!("{} ({})", parts.join(", "), source)
        }
    }
}

fn describe_size(size: &SizeLookup) -> String {
    match size {
        SizeLookup::Exact { meters } => format!("{} m (exact)", meters),
        SizeLookup::ClassDefault { class, meters } => {
            format!("{} m (default for class {})", meters, class)
        }
        SizeLookup::Unknown => "unknown".to_string(),
    }
}
