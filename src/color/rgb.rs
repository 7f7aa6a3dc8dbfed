//! RGB / RGBA value types with channels in `[0, 1]`.
use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{DatathonError, Result};


/// An opaque color. Each channel lies in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}


/// A color with an alpha channel. Each channel lies in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Opacity, `1` for opaque.
    pub a: f64,
}


impl Rgb {
    /// Build a color from channels in `[0, 1]`.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }


    /// Build a color from 8-bit channels.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255f64, g as f64 / 255f64, b as f64 / 255f64)
    }


    /// Parse a CSS color such as `#rrggbb`, `#rrggbbaa` or `steelblue`.
    /// The alpha channel is dropped.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let color = csscolorparser::parse(hex)
            .map_err(|e| DatathonError::InvalidInput(
                "hex color".into(),
                format!("{hex:?}: {e}"),
            ))?;
        let [r, g, b, _] = color.to_rgba8();
        Ok(Self::from_u8(r, g, b))
    }


    /// Returns the channels as an array `[r, g, b]`.
    #[inline]
    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }


    /// Linear interpolation `self + (other - self) * t`, per channel.
    #[inline]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }


    /// Attach the alpha channel `a`.
    #[inline]
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }


    /// 8-bit channels, rounded to nearest.
    pub fn to_u8(&self) -> [u8; 3] {
        self.channels()
            .map(|c| (c.clamp(0f64, 1f64) * 255f64).round() as u8)
    }


    /// 8-bit channels, rounded up.
    pub fn to_u8_ceil(&self) -> [u8; 3] {
        self.channels()
            .map(|c| (c.clamp(0f64, 1f64) * 255f64).ceil() as u8)
    }


    /// `#rrggbb`, with channels rounded to nearest.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}


impl Rgba {
    /// Drop the alpha channel.
    #[inline]
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }


    /// Returns the channels as an array `[r, g, b, a]`.
    #[inline]
    pub fn channels(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}


impl From<(f64, f64, f64)> for Rgb {
    #[inline]
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self::new(r, g, b)
    }
}


impl From<[f64; 3]> for Rgb {
    #[inline]
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self::new(r, g, b)
    }
}


impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
