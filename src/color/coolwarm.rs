//! The cool-to-warm diverging colormap.
//!
//! Colors are interpolated in the polar form `(M, s, h)` of CIELAB,
//! passing through an unsaturated white at the midpoint,
//! between a cool blue and a warm red.
//! The default map agrees with the tabulated 33-point coolwarm table
//! to within `1e-3` per channel.
use palette::white_point::D65;
use palette::{FromColor, Lab, LinSrgb, Srgb};

use std::f64::consts::PI;

use super::{ColorLookup, Rgb};


/// Magnitude of the unsaturated midpoint.
const MID_MAGNITUDE: f64 = 88.0;

/// Saturation under which a color counts as unsaturated.
const SATURATION_EPS: f64 = 0.05;


/// The cool-to-warm diverging colormap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coolwarm {
    cool: Msh,
    warm: Msh,
}


impl Default for Coolwarm {
    fn default() -> Self {
        Self::new(
            Rgb::new(0.229_805_7, 0.298_717_966, 0.753_683_153),
            Rgb::new(0.705_673_158, 0.015_556_160_8, 0.150_232_812),
        )
    }
}


impl Coolwarm {
    /// A diverging colormap between two saturated colors.
    pub fn new(cool: Rgb, warm: Rgb) -> Self {
        Self {
            cool: Msh::from_rgb(&cool),
            warm: Msh::from_rgb(&warm),
        }
    }
}


impl ColorLookup for Coolwarm {
    fn color_at(&self, x: f64) -> Rgb {
        let x = if x.is_nan() { 0f64 } else { x.clamp(0f64, 1f64) };
        let (mut lo, mut hi) = (self.cool, self.warm);
        let mut t = x;

        if lo.s > SATURATION_EPS
            && hi.s > SATURATION_EPS
            && hue_distance(lo.h, hi.h) > PI / 3f64
        {
            let mid = Msh {
                m: lo.m.max(hi.m).max(MID_MAGNITUDE),
                s: 0f64,
                h: 0f64,
            };
            if t < 0.5 {
                hi = mid;
                t *= 2f64;
            } else {
                lo = mid;
                t = 2f64 * t - 1f64;
            }
        }

        if lo.s < SATURATION_EPS && hi.s > SATURATION_EPS {
            lo.h = adjust_hue(&hi, lo.m);
        } else if hi.s < SATURATION_EPS && lo.s > SATURATION_EPS {
            hi.h = adjust_hue(&lo, hi.m);
        }

        let msh = Msh {
            m: (1f64 - t) * lo.m + t * hi.m,
            s: (1f64 - t) * lo.s + t * hi.s,
            h: (1f64 - t) * lo.h + t * hi.h,
        };
        msh.to_rgb()
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
struct Msh {
    m: f64,
    s: f64,
    h: f64,
}


impl Msh {
    fn from_rgb(rgb: &Rgb) -> Self {
        let linear = Srgb::new(rgb.r, rgb.g, rgb.b).into_linear();
        let Lab { l, a, b, .. } = Lab::<D65, f64>::from_color(linear);
        let m = (l * l + a * a + b * b).sqrt();
        let s = if m > 0f64 { (l / m).clamp(-1f64, 1f64).acos() } else { 0f64 };
        let h = b.atan2(a);
        Self { m, s, h }
    }


    fn to_rgb(self) -> Rgb {
        let lab = Lab::<D65, f64>::new(
            self.m * self.s.cos(),
            self.m * self.s.sin() * self.h.cos(),
            self.m * self.s.sin() * self.h.sin(),
        );
        let rgb = Srgb::from_linear(LinSrgb::from_color(lab));
        Rgb::new(rgb.red, rgb.green, rgb.blue)
    }
}


/// Hue of an unsaturated color next to `saturated`,
/// spun so that the interpolation does not pass through gray too early.
fn adjust_hue(saturated: &Msh, unsaturated_m: f64) -> f64 {
    if saturated.m >= unsaturated_m {
        return saturated.h;
    }
    let spin = saturated.s
        * (unsaturated_m.powi(2) - saturated.m.powi(2)).sqrt()
        / (saturated.m * saturated.s.sin());
    if saturated.h > -PI / 3f64 {
        saturated.h + spin
    } else {
        saturated.h - spin
    }
}


fn hue_distance(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).abs() % (2f64 * PI);
    if d > PI { 2f64 * PI - d } else { d }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Rgb, expected: Rgb, tol: f64) {
        let diff = actual.channels().iter()
            .zip(expected.channels())
            .map(|(a, e)| (a - e).abs())
            .fold(0f64, f64::max);
        assert!(diff < tol, "{actual:?} != {expected:?}");
    }

    #[test]
    fn endpoints_are_the_anchor_colors() {
        let cmap = Coolwarm::default();
        assert_close(
            cmap.color_at(0.0),
            Rgb::new(0.229_805_7, 0.298_717_966, 0.753_683_153),
            1e-3,
        );
        assert_close(
            cmap.color_at(1.0),
            Rgb::new(0.705_673_158, 0.015_556_160_8, 0.150_232_812),
            1e-3,
        );
    }

    #[test]
    fn midpoint_is_light_gray() {
        let mid = Coolwarm::default().color_at(0.5);
        assert_close(mid, Rgb::new(0.865, 0.865, 0.865), 0.01);
    }

    #[test]
    fn quarter_point_matches_the_tabulated_map() {
        assert_close(
            Coolwarm::default().color_at(0.25),
            Rgb::new(0.552_953_156, 0.688_929_332, 0.995_375_608),
            1e-3,
        );
    }

    #[test]
    fn halves_lean_to_their_side() {
        let cmap = Coolwarm::default();
        let cool = cmap.color_at(0.25);
        let warm = cmap.color_at(0.75);
        assert!(cool.b > cool.r);
        assert!(warm.r > warm.b);
    }
}
