//! Shared test utilities used across tessera crates.

pub mod capture;
pub mod ci;
