//! Test helpers shared across crates.
//!
//! This crate provides a `figment::Jail` wrapper for tests that touch the
//! working directory or process environment, plus sample configuration
//! documents written to disk on demand.

pub mod fixtures;
pub mod jail;
