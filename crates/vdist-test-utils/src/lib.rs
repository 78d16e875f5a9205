//! Shared test fixtures for the validator-dist workspace.
//!
//! This crate is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`staging`] - [`Staging`] builder for source and node trees

pub mod staging;

pub use staging::{Staging, validator_name};
