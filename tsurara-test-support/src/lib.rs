//! Shared test utilities used across tsurara crates.
//!
//! Fixtures are expressed as raw `(parent, child, lambda, child_size)` rows so
//! this crate stays independent of `tsurara-core`; the core record type
//! converts from the tuple form.

pub mod fixtures;
pub mod profile;
pub mod tracing;
