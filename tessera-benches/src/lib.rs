//! Benchmark support crate for tessera.
//!
//! Provides seeded synthetic images and parameter types used by the Criterion
//! benchmarks for forest construction and full segmentation runs.

pub mod error;
pub mod params;
pub mod source;
