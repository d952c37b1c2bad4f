//! Hullsprite CLI library.
//!
//! Mesh loading, render planning, sprite sync and contact sheets behind the
//! `hullsprite` binary.

pub mod analysis;
pub mod commands;
pub mod logging;
pub mod lookup;
pub mod planning;
pub mod sheet;
