//! Benchmark parameter types.

use std::fmt;

/// Parameters for one segmentation benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct SegmentBenchParams {
    /// Image height in pixels.
    pub rows: usize,
    /// Image width in pixels.
    pub cols: usize,
    /// Granularity `k` handed to the segmenter.
    pub granularity: u32,
}

impl fmt::Display for SegmentBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{},k={}", self.rows, self.cols, self.granularity)
    }
}
