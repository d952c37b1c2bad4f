//! Hullsprite CLI - top-down ship sprite rendering
//!
//! This binary plans mesh orientation and framing, drives Blender to render
//! sprites, syncs them into game asset directories and builds audit sheets.

use clap::{Parser, Subcommand};
use hullsprite_backend_blender::{DEFAULT_RESOLUTION, DEFAULT_SAMPLES};
use hullsprite_spec::MaterialPolicy;
use std::path::PathBuf;
use std::process::ExitCode;

use hullsprite_cli::commands;
use hullsprite_cli::commands::audit::AuditOptions;
use hullsprite_cli::commands::render::RenderOptions;
use hullsprite_cli::logging::init_logging;
use hullsprite_cli::sheet::layout::{DEFAULT_COLS, DEFAULT_THUMB};

/// Hullsprite - top-down ship sprite renderer
#[derive(Parser)]
#[command(name = "hullsprite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Diagnostic log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an STL mesh to a transparent top-down PNG sprite
    Render {
        /// Input STL mesh
        input: PathBuf,

        /// Output PNG path (also used to derive the ship key)
        output: PathBuf,

        /// Square output resolution in pixels
        #[arg(default_value_t = DEFAULT_RESOLUTION)]
        resolution: u32,

        /// Ship key (faction/class/name); derived from the output path if omitted
        #[arg(short, long)]
        key: Option<String>,

        /// Directory holding ship_orientations.json and ship_sizes.json
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,

        /// Hull material policy (faction or neutral)
        #[arg(long, default_value = "faction")]
        material: MaterialPolicy,

        /// Cycles sample count
        #[arg(long, default_value_t = DEFAULT_SAMPLES)]
        samples: u32,

        /// Path to the Blender executable
        #[arg(long)]
        blender: Option<PathBuf>,

        /// Blender Python entrypoint to use instead of the embedded one
        #[arg(long)]
        entrypoint: Option<PathBuf>,

        /// Kill Blender after this many seconds (no limit by default)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the orientation and framing plan for a mesh without rendering
    Plan {
        /// Input STL mesh
        input: PathBuf,

        /// Ship key (faction/class/name)
        #[arg(short, long)]
        key: Option<String>,

        /// Sprite path to derive the ship key from
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding ship_orientations.json and ship_sizes.json
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy rendered sprites over <type_id>.png files in a game asset directory
    Sync {
        /// Root of the rendered sprite tree
        src: PathBuf,

        /// Directory of <type_id>.png files to update
        dest: PathBuf,

        /// JSON catalog replacing the built-in type-ID table
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Report what would be copied without copying
        #[arg(long)]
        dry_run: bool,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Build contact sheets of rendered sprites for visual review
    Audit {
        /// Root of the rendered sprite tree (one directory per faction)
        sprites_dir: PathBuf,

        /// Output directory (default: <sprites_dir>/audit_sheets)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Thumbnail size in pixels
        #[arg(short, long, default_value_t = DEFAULT_THUMB)]
        size: u32,

        /// Columns per row
        #[arg(short, long, default_value_t = DEFAULT_COLS)]
        cols: u32,

        /// Split a faction across pages of at most this many rows
        #[arg(long)]
        max_rows: Option<u32>,

        /// Also write a master sheet with every faction
        #[arg(short, long)]
        all: bool,

        /// Faction directories to skip (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Check Blender and the config tables
    Doctor {
        /// Directory holding ship_orientations.json and ship_sizes.json
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,

        /// Path to the Blender executable
        #[arg(long)]
        blender: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            resolution,
            key,
            config_dir,
            material,
            samples,
            blender,
            entrypoint,
            timeout_secs,
            json,
        } => commands::render::run(&RenderOptions {
            input,
            output,
            resolution,
            samples,
            key,
            config_dir,
            material,
            blender,
            entrypoint,
            timeout_secs,
            json,
        }),
        Commands::Plan {
            input,
            key,
            output,
            config_dir,
            json,
        } => commands::plan::run(&input, key.as_deref(), output.as_deref(), &config_dir, json),
        Commands::Sync {
            src,
            dest,
            catalog,
            dry_run,
            json,
        } => commands::sync::run(&src, &dest, catalog.as_deref(), dry_run, json),
        Commands::Audit {
            sprites_dir,
            output,
            size,
            cols,
            max_rows,
            all,
            exclude,
        } => commands::audit::run(&AuditOptions {
            sprites_dir,
            output,
            thumb: size,
            cols,
            max_rows,
            all,
            exclude,
        }),
        Commands::Doctor { config_dir, blender } => {
            commands::doctor::run(&config_dir, blender.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["hullsprite", "render", "in.stl", "out.png"]).unwrap();
        match cli.command {
            Commands::Render {
                resolution,
                samples,
                material,
                timeout_secs,
                ..
            } => {
                assert_eq!(resolution, 512);
                assert_eq!(samples, 64);
                assert_eq!(material, MaterialPolicy::Faction);
                assert_eq!(timeout_secs, None);
            }
            _ => panic!("expected render"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_render_positional_resolution_and_material() {
        let cli = Cli::try_parse_from([
            "hullsprite",
            "render",
            "in.stl",
            "out.png",
            "256",
            "--material",
            "neutral",
            "--timeout-secs",
            "30",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                resolution,
                material,
                timeout_secs,
                ..
            } => {
                assert_eq!(resolution, 256);
                assert_eq!(material, MaterialPolicy::Neutral);
                assert_eq!(timeout_secs, Some(30));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_bad_material_is_rejected() {
        assert!(Cli::try_parse_from([
            "hullsprite", "render", "in.stl", "out.png", "--material", "gold"
        ])
        .is_err());
    }

    #[test]
    fn test_audit_flags() {
        let cli = Cli::try_parse_from([
            "hullsprite",
            "audit",
            "sprites",
            "--all",
            "--max-rows",
            "4",
            "--exclude",
            "wip",
            "--exclude",
            "old",
        ])
        .unwrap();
        match cli.command {
            Commands::Audit {
                size,
                cols,
                max_rows,
                all,
                exclude,
                ..
            } => {
                assert_eq!((size, cols), (128, 8));
                assert_eq!(max_rows, Some(4));
                assert!(all);
                assert_eq!(exclude, vec!["wip".to_string(), "old".to_string()]);
            }
            _ => panic!("expected audit"),
        }
    }

    #[test]
    fn test_sync_and_global_log_level() {
        let cli = Cli::try_parse_from([
            "hullsprite", "sync", "renders", "assets", "--dry-run", "--log-level", "debug",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Sync { dry_run: true, .. }));
        assert_eq!(cli.log_level, "debug");
    }
}
