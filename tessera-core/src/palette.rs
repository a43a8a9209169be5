//! Color generators that hand out one representative color per region.

#[cfg(feature = "random-palette")]
use std::collections::HashSet;

#[cfg(feature = "random-palette")]
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{color::Rgb, error::PaletteError};

/// Number of distinct 24-bit colors.
const RGB_SPACE: u32 = 1 << 24;
const RGB_MASK: u32 = RGB_SPACE - 1;

/// Odd multiplier used by [`SequentialPalette`]; any odd value permutes the
/// 24-bit space.
const SEQUENTIAL_STRIDE: u32 = 0x009E_3779;

#[cfg(feature = "random-palette")]
const DEFAULT_RANDOM_SEED: u64 = 0x7E55_E4A0;

/// Produces a fresh representative color on demand.
///
/// Implementations must never repeat a color within one segmentation run.
pub trait ColorGenerator<C> {
    /// Returns the next unused color.
    ///
    /// # Errors
    /// Returns [`PaletteError::Exhausted`] once no unused color remains.
    fn next_color(&mut self) -> Result<C, PaletteError>;
}

/// Yields `0, 1, 2, …` as `u32` labels.
///
/// Useful when the caller only needs region identities rather than colors.
///
/// # Examples
/// ```
/// use tessera_core::{ColorGenerator, CountingPalette};
///
/// let mut palette = CountingPalette::default();
/// assert_eq!(palette.next_color()?, 0);
/// assert_eq!(palette.next_color()?, 1);
/// # Ok::<(), tessera_core::PaletteError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct CountingPalette {
    issued: u64,
}

impl ColorGenerator<u32> for CountingPalette {
    fn next_color(&mut self) -> Result<u32, PaletteError> {
        let label = u32::try_from(self.issued).map_err(|_| PaletteError::Exhausted {
            issued: self.issued,
        })?;
        self.issued = self.issued.saturating_add(1);
        Ok(label)
    }
}

/// Deterministically walks the whole 24-bit RGB space.
///
/// Successive colors are spaced by a large odd stride so neighbouring regions
/// rarely receive similar hues. Every color is issued exactly once before the
/// palette reports exhaustion.
///
/// # Examples
/// ```
/// use tessera_core::{ColorGenerator, SequentialPalette};
///
/// let mut palette = SequentialPalette::new();
/// let first = palette.next_color()?;
/// let second = palette.next_color()?;
/// assert_ne!(first, second);
/// # Ok::<(), tessera_core::PaletteError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SequentialPalette {
    issued: u32,
}

impl SequentialPalette {
    /// Creates a palette starting at its first color.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }
}

impl ColorGenerator<Rgb> for SequentialPalette {
    fn next_color(&mut self) -> Result<Rgb, PaletteError> {
        if self.issued >= RGB_SPACE {
            return Err(PaletteError::Exhausted {
                issued: u64::from(self.issued),
            });
        }
        let value = self
            .issued
            .wrapping_add(1)
            .wrapping_mul(SEQUENTIAL_STRIDE)
            & RGB_MASK;
        self.issued += 1;
        Ok(Rgb::from_u24(value))
    }
}

/// Draws uniformly random 24-bit colors from a seeded generator, rejecting
/// repeats.
///
/// # Examples
/// ```
/// use tessera_core::{ColorGenerator, RandomPalette};
///
/// let mut a = RandomPalette::with_seed(7);
/// let mut b = RandomPalette::with_seed(7);
/// assert_eq!(a.next_color()?, b.next_color()?);
/// # Ok::<(), tessera_core::PaletteError>(())
/// ```
#[cfg(feature = "random-palette")]
#[cfg_attr(docsrs, doc(cfg(feature = "random-palette")))]
#[derive(Clone, Debug)]
pub struct RandomPalette {
    rng: SmallRng,
    issued: HashSet<u32>,
}

#[cfg(feature = "random-palette")]
impl RandomPalette {
    /// Creates a palette whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// Returns how many colors have been issued.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

#[cfg(feature = "random-palette")]
impl Default for RandomPalette {
    fn default() -> Self {
        Self::with_seed(DEFAULT_RANDOM_SEED)
    }
}

#[cfg(feature = "random-palette")]
impl ColorGenerator<Rgb> for RandomPalette {
    fn next_color(&mut self) -> Result<Rgb, PaletteError> {
        let issued = u64::try_from(self.issued.len()).unwrap_or(u64::MAX);
        if issued >= u64::from(RGB_SPACE) {
            return Err(PaletteError::Exhausted { issued });
        }
        loop {
            let candidate = self.rng.gen_range(0..RGB_SPACE);
            if self.issued.insert(candidate) {
                return Ok(Rgb::from_u24(candidate));
            }
        }
    }
}
