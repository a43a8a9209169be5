//! A 24-bit RGB color and its Euclidean edge weight.

use std::fmt;

use crate::{EdgeWeight, Pixel, WeightError};

const CHANNEL_MASK: u32 = 0xFF;

/// An opaque 24-bit color.
///
/// # Examples
/// ```
/// use tessera_core::Rgb;
///
/// let color = Rgb::new(255, 128, 0);
/// assert_eq!(color.to_string(), "#ff8000");
/// assert_eq!(Rgb::from_u24(color.to_u24()), color);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Unpacks the low 24 bits of `value` as `0xRRGGBB`. Higher bits are
    /// ignored.
    #[must_use]
    pub fn from_u24(value: u32) -> Self {
        let channel = |shift: u32| u8::try_from((value >> shift) & CHANNEL_MASK).unwrap_or(u8::MAX);
        Self {
            red: channel(16),
            green: channel(8),
            blue: channel(0),
        }
    }

    /// Packs the color as `0xRRGGBB`.
    #[must_use]
    pub fn to_u24(self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Euclidean distance between the channel vectors of two [`Rgb`] pixels.
///
/// # Examples
/// ```
/// use tessera_core::{EdgeWeight, Pixel, Position, Rgb, RgbEuclidean};
///
/// let (black, red) = (Rgb::new(0, 0, 0), Rgb::new(3, 4, 0));
/// let weight = RgbEuclidean.weight(
///     Pixel::new(Position::new(0, 0), &black),
///     Pixel::new(Position::new(0, 1), &red),
/// )?;
/// assert_eq!(weight, 5.0);
/// # Ok::<(), tessera_core::WeightError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RgbEuclidean;

impl EdgeWeight<Rgb> for RgbEuclidean {
    fn weight(&self, first: Pixel<'_, Rgb>, second: Pixel<'_, Rgb>) -> Result<f64, WeightError> {
        let (a, b) = (first.color(), second.color());
        let delta = |x: u8, y: u8| f64::from(x) - f64::from(y);
        let red = delta(a.red, b.red);
        let green = delta(a.green, b.green);
        let blue = delta(a.blue, b.blue);
        Ok(blue.mul_add(blue, red.mul_add(red, green * green)).sqrt())
    }
}
