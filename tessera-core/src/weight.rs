//! Edge-weight collaborators.
//!
//! The segmenter never inspects colors itself; it asks an [`EdgeWeight`] for
//! the dissimilarity between two adjacent pixels.

use crate::{error::WeightError, grid::Pixel};

/// Computes the dissimilarity between two adjacent pixels.
///
/// Implementations must be pure (the same pair always yields the same weight)
/// and must return finite, non-negative values. The segmenter rejects other
/// values with [`crate::SegmentationError::InvalidEdgeWeight`].
///
/// # Examples
/// ```
/// use tessera_core::{EdgeWeight, Pixel, Position, WeightError};
///
/// struct Absolute;
///
/// impl EdgeWeight<i32> for Absolute {
///     fn weight(&self, first: Pixel<'_, i32>, second: Pixel<'_, i32>) -> Result<f64, WeightError> {
///         Ok(f64::from((first.color() - second.color()).abs()))
///     }
/// }
///
/// let (a, b) = (3, 10);
/// let weight = Absolute.weight(Pixel::new(Position::new(0, 0), &a), Pixel::new(Position::new(0, 1), &b))?;
/// assert_eq!(weight, 7.0);
/// # Ok::<(), WeightError>(())
/// ```
pub trait EdgeWeight<C> {
    /// Returns the dissimilarity between `first` and `second`.
    ///
    /// # Errors
    /// Returns [`WeightError`] when the collaborator cannot compare the pair.
    fn weight(&self, first: Pixel<'_, C>, second: Pixel<'_, C>) -> Result<f64, WeightError>;
}

/// Adapts an infallible color-distance closure into an [`EdgeWeight`].
///
/// # Examples
/// ```
/// use tessera_core::{ColorDistance, EdgeWeight, Pixel, Position};
///
/// let weigher = ColorDistance::new(|a: &f64, b: &f64| (a - b).abs());
/// let (a, b) = (0.25, 1.0);
/// let weight = weigher
///     .weight(Pixel::new(Position::new(0, 0), &a), Pixel::new(Position::new(1, 0), &b))
///     .expect("closures never fail");
/// assert_eq!(weight, 0.75);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ColorDistance<F> {
    distance: F,
}

impl<F> ColorDistance<F> {
    /// Wraps `distance`.
    #[must_use]
    pub const fn new(distance: F) -> Self {
        Self { distance }
    }
}

impl<C, F> EdgeWeight<C> for ColorDistance<F>
where
    F: Fn(&C, &C) -> f64,
{
    fn weight(&self, first: Pixel<'_, C>, second: Pixel<'_, C>) -> Result<f64, WeightError> {
        Ok((self.distance)(first.color(), second.color()))
    }
}
