//! Shared fixtures for hullsprite integration tests.

pub mod fixtures;
