//! Benchmark support crate for tsurara.
//!
//! Builds balanced synthetic condensed trees for the Criterion benchmarks of
//! the layout and selection stages.

pub mod error;
pub mod params;
pub mod synthetic;
