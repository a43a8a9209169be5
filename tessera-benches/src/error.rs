//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use tessera_core::SegmentationError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic image generation failed.
    #[error("synthetic image generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Configuring or running the segmenter failed.
    #[error("segmentation failed: {0}")]
    Segmentation(#[from] SegmentationError),
}
