//! Colors, the custom gradient builder, and the fixed colormaps
//! used by the plotting and graph helpers.

pub mod rgb;
pub mod colormap;
pub mod coolwarm;
pub mod palette;


pub use rgb::{Rgb, Rgba};
pub use colormap::{make_colormap, ColorStop, Colormap, Segment};
pub use coolwarm::Coolwarm;
pub use palette::class_palette;


/// A continuous map from `[0, 1]` to a color.
///
/// Values outside of `[0, 1]` are clamped.
pub trait ColorLookup {
    /// Returns the color at `x`.
    fn color_at(&self, x: f64) -> Rgb;


    /// Returns `n` colors evaluated at `linspace(0, 1, n)`,
    /// as rows of `(r, g, b, a)`.
    fn sample(&self, n: usize) -> Vec<Rgba> {
        linspace(0f64, 1f64, n).into_iter()
            .map(|x| self.color_at(x).with_alpha(1f64))
            .collect()
    }
}


impl<L: ColorLookup + ?Sized> ColorLookup for &L {
    fn color_at(&self, x: f64) -> Rgb {
        (**self).color_at(x)
    }
}


/// `n` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| {
                    if i == n - 1 { stop } else { start + step * i as f64 }
                })
                .collect()
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
