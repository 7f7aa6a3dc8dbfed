//! Builds a piecewise-linear colormap from a sequence of
//! breakpoints and colors.
//!
//! The sequence alternates between colors and breakpoints:
//! every breakpoint is immediately preceded by the color to its left
//! and followed by the color to its right.
//! A color between two breakpoints serves both of them.
//!
//! ```
//! use datathon::color::{make_colormap, ColorLookup, Rgb, Segment};
//! let red    = Rgb::new(1.0, 0.0, 0.0);
//! let violet = Rgb::new(0.93, 0.51, 0.93);
//! let blue   = Rgb::new(0.0, 0.0, 1.0);
//! let cmap = make_colormap(&[
//!     red.into(), violet.into(), Segment::Stop(0.33),
//!     violet.into(), blue.into(), Segment::Stop(0.66),
//!     blue.into(),
//! ]).unwrap();
//! assert_eq!(cmap.color_at(0.0), red);
//! assert_eq!(cmap.color_at(1.0), blue);
//! ```
use serde::{Serialize, Deserialize};

use super::{ColorLookup, Rgb};
use crate::error::{DatathonError, Result};


/// One entry of the sequence given to [`make_colormap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// A breakpoint in `(0, 1)`.
    Stop(f64),
    /// A color.
    Color(Rgb),
}


impl From<Rgb> for Segment {
    #[inline]
    fn from(color: Rgb) -> Self {
        Self::Color(color)
    }
}


impl From<f64> for Segment {
    #[inline]
    fn from(position: f64) -> Self {
        Self::Stop(position)
    }
}


/// A breakpoint together with the colors on its left and right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Breakpoint in `[0, 1]`.
    pub position: f64,
    /// Color just below `position`.
    pub left: Rgb,
    /// Color from `position` on.
    pub right: Rgb,
}


/// The color channel of a segment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// The red channel.
    Red,
    /// The green channel.
    Green,
    /// The blue channel.
    Blue,
}


/// A continuous colormap made of linear pieces.
/// The first stop sits at `0.0` and the last at `1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Colormap {
    stops: Vec<ColorStop>,
}


/// Return a [`Colormap`] for the given sequence of breakpoints and colors.
///
/// Breakpoints must be strictly increasing and lie in `(0, 1)`,
/// and the sequence must start and end with a color.
/// Synthetic breakpoints at `0.0` and `1.0` take the first and last
/// colors. A sequence of colors without any breakpoint is the linear
/// gradient from its first color to its last one.
pub fn make_colormap(seq: &[Segment]) -> Result<Colormap> {
    let (first, last) = match (seq.first(), seq.last()) {
        (Some(Segment::Color(first)), Some(Segment::Color(last)))
            => (*first, *last),
        (None, _) => {
            return Err(invalid("the sequence is empty".into()));
        },
        _ => {
            return Err(invalid(
                "the sequence must start and end with a color".into()
            ));
        },
    };

    let mut stops = Vec::with_capacity(seq.len());
    stops.push(ColorStop { position: 0f64, left: first, right: first });

    for (i, item) in seq.iter().enumerate() {
        let Segment::Stop(position) = *item else { continue; };

        if !(position > 0f64 && position < 1f64) {
            return Err(invalid(format!(
                "breakpoint {position} at index {i} is not in (0, 1)"
            )));
        }
        let previous = stops.last().map(|s| s.position).unwrap_or(0f64);
        if position <= previous {
            return Err(invalid(format!(
                "breakpoint {position} at index {i} \
                 does not exceed the previous one ({previous})"
            )));
        }

        // `seq` starts and ends with a color, so both neighbors exist.
        let (left, right) = match (seq[i - 1], seq[i + 1]) {
            (Segment::Color(l), Segment::Color(r)) => (l, r),
            _ => {
                return Err(invalid(format!(
                    "breakpoint {position} at index {i} \
                     must sit between two colors"
                )));
            },
        };
        stops.push(ColorStop { position, left, right });
    }

    stops.push(ColorStop { position: 1f64, left: last, right: last });

    Ok(Colormap { stops })
}


fn invalid(message: String) -> DatathonError {
    DatathonError::InvalidColormap(message)
}


impl Colormap {
    /// Returns the stops, including the synthetic ones at `0` and `1`.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops[..]
    }


    /// Returns the segment table `[x, y_left, y_right]` of one channel.
    pub fn segments(&self, channel: Channel) -> Vec<[f64; 3]> {
        let pick = |c: &Rgb| match channel {
            Channel::Red   => c.r,
            Channel::Green => c.g,
            Channel::Blue  => c.b,
        };
        self.stops.iter()
            .map(|s| [s.position, pick(&s.left), pick(&s.right)])
            .collect()
    }
}


impl ColorLookup for Colormap {
    fn color_at(&self, x: f64) -> Rgb {
        let x = if x.is_nan() { 0f64 } else { x.clamp(0f64, 1f64) };

        // Index of the stop that opens the piece containing `x`.
        let k = self.stops.partition_point(|s| s.position <= x)
            .saturating_sub(1)
            .min(self.stops.len() - 2);

        let (lo, hi) = (&self.stops[k], &self.stops[k + 1]);
        let t = (x - lo.position) / (hi.position - lo.position);
        lo.right.lerp(&hi.left, t)
    }
}
