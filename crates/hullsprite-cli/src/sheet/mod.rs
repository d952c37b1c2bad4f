//! Contact sheets for visual QA of rendered sprites.

pub mod compose;
pub mod font;
pub mod layout;
pub mod scan;

use std::path::PathBuf;

use thiserror::Error;

pub use compose::{compose_faction_sheet, compose_master_sheet, save_png};
pub use layout::SheetStyle;
pub use scan::{master_order, scan_sprites, SpriteInfo, DEFAULT_EXCLUDES};

/// Errors raised while scanning sprites or writing sheets.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save sheet {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid sheet layout: {0}")]
    InvalidLayout(String),
}
