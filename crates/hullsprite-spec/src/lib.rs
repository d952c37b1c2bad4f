//! Hullsprite normalization library
//!
//! This crate holds the pure, file-format-independent half of the ship sprite
//! pipeline: picking a canonical orientation for a mesh from its bounding
//! extent, and mapping a real-world ship size to how much of the frame the
//! ship should fill.
//!
//! # Example
//!
//! ```
//! use hullsprite_spec::{choose_orientation, fill_ratio, BoundingExtent};
//!
//! // A ship lying on its side: longest along X, thinnest along Z.
//! let extent = BoundingExtent::new(120.0, 40.0, 20.0).unwrap();
//! let plan = choose_orientation(&extent, None);
//! let upright = plan.apply_to_extent(&extent);
//! assert!(upright.depth > upright.width);
//!
//! // A frigate-sized ship fills the least of the frame.
//! assert!((fill_ratio(Some(75.0)) - 0.12).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`extent`]: bounding extents and axis ranking
//! - [`orientation`]: orientation plans and the selection rule
//! - [`framing`]: fill-ratio curve and camera framing
//! - [`ship_key`], [`faction`]: ship identifiers and faction presets
//! - [`sizes`], [`overrides`], [`catalog`]: JSON lookup tables

pub mod catalog;
pub mod error;
pub mod extent;
pub mod faction;
pub mod framing;
pub mod orientation;
pub mod overrides;
pub mod ship_key;
pub mod sizes;

pub use catalog::{CatalogEntry, TypeCatalog};
pub use error::{BackendError, ConfigError};
pub use extent::{nearly_equal, Axis, BoundingExtent, ExtentError, TIE_TOLERANCE};
pub use faction::{
    sheet_color, sheet_order, Faction, FactionPreset, MaterialPolicy, MaterialPreset,
    UnknownFaction, NEUTRAL_MATERIAL, UNKNOWN_SHEET_COLOR,
};
pub use framing::{
    fill_ratio, CameraFraming, CurveError, FillCurve, DEFAULT_FRAME_MARGIN, DEFAULT_MAX_FILL,
    DEFAULT_MIN_FILL,
};
pub use orientation::{
    choose_orientation, AxisAssignment, EulerAngles, OrientationOverride, OrientationPlan,
};
pub use overrides::{OverrideTable, ORIENTATIONS_FILE};
pub use ship_key::{ShipKey, ShipKeyError};
pub use sizes::{SizeLookup, SizeTable, SIZES_FILE};
