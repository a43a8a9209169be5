//! Synthetic images for benchmarking.
//!
//! Images are Voronoi-style mosaics: a few randomly placed seed pixels each
//! own a random base color, every pixel takes the color of its nearest seed,
//! and per-channel noise is added on top. Output is fully determined by the
//! configured seed.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tessera_core::{ColorGrid, Position, Rgb, SegmentationError};

/// Errors that may occur during synthetic image generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested row count was zero.
    #[error("row count must be greater than zero")]
    ZeroRows,
    /// The requested column count was zero.
    #[error("column count must be greater than zero")]
    ZeroCols,
    /// The requested region count was zero.
    #[error("region count must be greater than zero")]
    ZeroRegions,
    /// The grid could not be assembled.
    #[error("grid construction failed: {0}")]
    Grid(#[from] SegmentationError),
}

/// Configuration for synthetic image generation.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Image height in pixels.
    pub rows: usize,
    /// Image width in pixels.
    pub cols: usize,
    /// Number of seed pixels, and so the upper bound on flat regions.
    pub regions: usize,
    /// Maximum per-channel deviation added to every pixel.
    pub noise: u8,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a mosaic image from `config`.
///
/// # Errors
///
/// Returns [`SyntheticError::ZeroRows`], [`SyntheticError::ZeroCols`] or
/// [`SyntheticError::ZeroRegions`] for degenerate configurations, and
/// [`SyntheticError::Grid`] when the dimensions overflow.
///
/// # Examples
///
/// ```
/// use tessera_benches::source::{SyntheticConfig, generate};
///
/// let config = SyntheticConfig { rows: 8, cols: 12, regions: 3, noise: 4, seed: 42 };
/// let grid = generate(&config).expect("valid config");
/// assert_eq!((grid.rows(), grid.cols()), (8, 12));
/// ```
pub fn generate(config: &SyntheticConfig) -> Result<ColorGrid<Rgb>, SyntheticError> {
    if config.rows == 0 {
        return Err(SyntheticError::ZeroRows);
    }
    if config.cols == 0 {
        return Err(SyntheticError::ZeroCols);
    }
    if config.regions == 0 {
        return Err(SyntheticError::ZeroRegions);
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let seeds: Vec<(Position, Rgb)> = (0..config.regions)
        .map(|_| {
            let position = Position::new(
                rng.gen_range(0..config.rows),
                rng.gen_range(0..config.cols),
            );
            (position, Rgb::from_u24(rng.gen_range(0..(1_u32 << 24))))
        })
        .collect();

    let mut cells = Vec::with_capacity(config.rows.saturating_mul(config.cols));
    for row in 0..config.rows {
        for col in 0..config.cols {
            let base = nearest_seed(&seeds, Position::new(row, col))
                .ok_or(SyntheticError::ZeroRegions)?;
            cells.push(jitter(base, config.noise, &mut rng));
        }
    }
    Ok(ColorGrid::from_cells(config.rows, config.cols, cells)?)
}

fn nearest_seed(seeds: &[(Position, Rgb)], position: Position) -> Option<Rgb> {
    seeds
        .iter()
        .min_by_key(|(seed, _)| squared_distance(*seed, position))
        .map(|&(_, color)| color)
}

fn squared_distance(a: Position, b: Position) -> usize {
    let rows = a.row().abs_diff(b.row());
    let cols = a.col().abs_diff(b.col());
    rows.saturating_mul(rows)
        .saturating_add(cols.saturating_mul(cols))
}

fn jitter(color: Rgb, noise: u8, rng: &mut SmallRng) -> Rgb {
    if noise == 0 {
        return color;
    }
    let spread = i16::from(noise);
    Rgb::new(
        jitter_channel(color.red, spread, rng),
        jitter_channel(color.green, spread, rng),
        jitter_channel(color.blue, spread, rng),
    )
}

fn jitter_channel(value: u8, spread: i16, rng: &mut SmallRng) -> u8 {
    let shifted = i16::from(value).saturating_add(rng.gen_range(-spread..=spread));
    u8::try_from(shifted.clamp(0, i16::from(u8::MAX))).unwrap_or(u8::MAX)
}
