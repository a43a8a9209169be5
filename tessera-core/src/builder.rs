//! Builder utilities for configuring the segmenter.
//!
//! Exposes the pixel connectivity selection surface and the validation run
//! before constructing [`Segmenter`] instances.

use tracing::warn;

use crate::{Result, error::SegmentationError, segmenter::Segmenter};

const DEFAULT_GRANULARITY: f64 = 300.0;

/// Which neighbours of a pixel are joined by adjacency edges.
///
/// # Examples
/// ```
/// use tessera_core::Connectivity;
///
/// assert_eq!(Connectivity::default(), Connectivity::Eight);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Horizontal and vertical neighbours only.
    Four,
    /// Horizontal, vertical and diagonal neighbours.
    #[default]
    Eight,
}

impl Connectivity {
    /// Offsets applied from every pixel. Each undirected neighbour pair is
    /// produced by exactly one of its two endpoints.
    pub(crate) const fn forward_offsets(self) -> &'static [(isize, isize)] {
        match self {
            Self::Four => &[(1, 0), (0, 1)],
            Self::Eight => &[(1, 0), (0, 1), (1, 1), (1, -1)],
        }
    }
}

/// Configures and constructs [`Segmenter`] instances.
///
/// # Examples
/// ```
/// use tessera_core::{Connectivity, SegmenterBuilder};
///
/// let segmenter = SegmenterBuilder::new()
///     .with_granularity(150.0)
///     .with_connectivity(Connectivity::Four)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(segmenter.granularity(), 150.0);
/// assert_eq!(segmenter.connectivity(), Connectivity::Four);
/// ```
#[derive(Debug, Clone)]
pub struct SegmenterBuilder {
    granularity: f64,
    connectivity: Connectivity,
}

impl Default for SegmenterBuilder {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            connectivity: Connectivity::Eight,
        }
    }
}

impl SegmenterBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use tessera_core::{Connectivity, SegmenterBuilder};
    ///
    /// let builder = SegmenterBuilder::new();
    /// assert_eq!(builder.granularity(), 300.0);
    /// assert_eq!(builder.connectivity(), Connectivity::Eight);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the granularity `k`. Larger values favour fewer, larger
    /// regions.
    #[must_use]
    pub fn with_granularity(mut self, granularity: f64) -> Self {
        self.granularity = granularity;
        self
    }

    /// Returns the configured granularity.
    #[must_use]
    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    /// Sets the pixel connectivity used to build adjacency edges.
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Returns the configured connectivity.
    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Validates the configuration and constructs a [`Segmenter`].
    ///
    /// # Errors
    /// Returns [`SegmentationError::InvalidGranularity`] when the granularity
    /// is negative, NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// use tessera_core::{SegmentationError, SegmenterBuilder};
    ///
    /// let err = SegmenterBuilder::new()
    ///     .with_granularity(-1.0)
    ///     .build()
    ///     .expect_err("negative granularity is rejected");
    /// assert!(matches!(err, SegmentationError::InvalidGranularity { .. }));
    /// ```
    pub fn build(self) -> Result<Segmenter> {
        if !self.granularity.is_finite() || self.granularity < 0.0 {
            warn!(
                granularity = self.granularity,
                "rejecting invalid granularity"
            );
            return Err(SegmentationError::InvalidGranularity {
                got: self.granularity,
            });
        }
        Ok(Segmenter::new(self.granularity, self.connectivity))
    }
}
