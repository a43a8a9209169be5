use tessera_core::{ColorGrid, EdgeWeight, Pixel, Rgb, WeightError};

pub const WARM: Rgb = Rgb::new(200, 30, 30);
pub const COOL: Rgb = Rgb::new(30, 30, 200);

/// A `rows x cols` grid whose left `split` columns are [`WARM`] and whose
/// remaining columns are [`COOL`].
#[must_use]
pub fn two_band(rows: usize, cols: usize, split: usize) -> ColorGrid<Rgb> {
    let cells = (0..rows * cols)
        .map(|index| if index % cols < split { WARM } else { COOL })
        .collect();
    ColorGrid::from_cells(rows, cols, cells).expect("cell count matches shape")
}

/// Absolute difference between scalar intensities.
#[derive(Clone, Copy, Debug, Default)]
pub struct Intensity;

impl EdgeWeight<f64> for Intensity {
    fn weight(&self, first: Pixel<'_, f64>, second: Pixel<'_, f64>) -> Result<f64, WeightError> {
        Ok((first.color() - second.color()).abs())
    }
}
