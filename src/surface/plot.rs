//! Drawing a decision surface with `plotters`.
use plotters::coord::Shift;
use plotters::prelude::*;

use std::f64::consts::PI;
use std::fmt;
use std::ops::Range;

use super::grid::{normalize, value_range, ClassifiedGrid};
use crate::classifier::Classifier;
use crate::color::{make_colormap, ColorLookup, Colormap, Rgb, Segment};
use crate::constants::*;
use crate::error::{DatathonError, Result};
use crate::sample::Sample;


/// Options of [`plot_model_pred_2d`].
///
/// ```no_run
/// use datathon::prelude::*;
/// use plotters::prelude::*;
///
/// # fn run(model: &DecisionTree, sample: &Sample) -> datathon::Result<()> {
/// let area = BitMapBackend::new("surface.png", (800, 600)).into_drawing_area();
/// let options = SurfacePlot::new()
///     .x_label("petal length")
///     .y_label("petal width");
/// plot_model_pred_2d(&area, model, sample, &options)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SurfacePlot<'a> {
    colormap: Option<&'a dyn ColorLookup>,
    colorbar: bool,
    x_label: Option<String>,
    y_label: Option<String>,
    resolution: usize,
}


impl Default for SurfacePlot<'_> {
    fn default() -> Self {
        Self {
            colormap: None,
            colorbar: true,
            x_label: None,
            y_label: None,
            resolution: DEFAULT_GRID_RESOLUTION,
        }
    }
}


impl fmt::Debug for SurfacePlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfacePlot")
            .field("colormap", &self.colormap.map(|_| "custom"))
            .field("colorbar", &self.colorbar)
            .field("x_label", &self.x_label)
            .field("y_label", &self.y_label)
            .field("resolution", &self.resolution)
            .finish()
    }
}


impl<'a> SurfacePlot<'a> {
    /// Default options: the orange-to-blue gradient,
    /// a color bar, no axis labels, and a 100 x 100 grid.
    pub fn new() -> Self {
        Self::default()
    }


    /// Colormap of the regions and the examples.
    pub fn colormap(mut self, colormap: &'a dyn ColorLookup) -> Self {
        self.colormap = Some(colormap);
        self
    }


    /// Attach a color bar on the right.
    pub fn colorbar(mut self, colorbar: bool) -> Self {
        self.colorbar = colorbar;
        self
    }


    /// Caption of the horizontal axis.
    pub fn x_label<S: ToString>(mut self, label: S) -> Self {
        self.x_label = Some(label.to_string());
        self
    }


    /// Caption of the vertical axis.
    pub fn y_label<S: ToString>(mut self, label: S) -> Self {
        self.y_label = Some(label.to_string());
        self
    }


    /// Number of grid points per axis. Must be at least `2`.
    pub fn resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }


    /// Draw the decision surface of `model` over the two features
    /// of `sample`, with the examples colored by their target.
    ///
    /// Nothing is presented; the caller owns `area`.
    pub fn draw<DB, C>(
        &self,
        area: &DrawingArea<DB, Shift>,
        model: &C,
        sample: &Sample,
    ) -> Result<()>
        where DB: DrawingBackend,
              C: Classifier + ?Sized,
    {
        let n_sample = sample.shape().0;
        if sample.target().len() != n_sample {
            return Err(DatathonError::InvalidSample(format!(
                "the target has {} values for {n_sample} examples",
                sample.target().len()
            )));
        }

        let grid = ClassifiedGrid::evaluate(model, sample, self.resolution)?;

        let default;
        let colormap: &dyn ColorLookup = match self.colormap {
            Some(colormap) => colormap,
            None => {
                default = default_colormap()?;
                &default
            },
        };

        if self.colorbar {
            let (width, _) = area.dim_in_pixel();
            let split = (width as f64 * SURFACE_WIDTH_RATIO) as i32;
            let (surface, bar) = area.split_horizontally(split);
            self.draw_surface(&surface, &grid, sample, colormap)?;
            draw_colorbar(&bar, grid.label_range(), colormap)?;
        } else {
            self.draw_surface(area, &grid, sample, colormap)?;
        }
        Ok(())
    }


    fn draw_surface<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        grid: &ClassifiedGrid,
        sample: &Sample,
        colormap: &dyn ColorLookup,
    ) -> Result<()>
        where DB: DrawingBackend
    {
        let (xs, ys) = (grid.xs(), grid.ys());
        let x_range = padded(xs[0], xs[xs.len() - 1]);
        let y_range = padded(ys[0], ys[ys.len() - 1]);

        let mut chart = ChartBuilder::on(area)
            .margin(5)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(plot_error)?;

        let formatter = |v: &f64| format!("{:.1}", v);
        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_label_formatter(&formatter)
                .y_label_formatter(&formatter);
            if let Some(label) = &self.x_label {
                mesh.x_desc(label.as_str());
            }
            if let Some(label) = &self.y_label {
                mesh.y_desc(label.as_str());
            }
            mesh.draw().map_err(plot_error)?;
        }

        // Each cell is centered on its grid point and clipped to the chart.
        let half_x = half_cell(xs, &x_range);
        let half_y = half_cell(ys, &y_range);
        let (v_min, v_max) = grid.label_range();
        chart.draw_series(
            grid.points().map(|(x, y, label)| {
                let color = rgb_color(colormap.color_at(normalize(label, v_min, v_max)));
                let lower = (
                    (x - half_x).max(x_range.start),
                    (y - half_y).max(y_range.start),
                );
                let upper = (
                    (x + half_x).min(x_range.end),
                    (y + half_y).min(y_range.end),
                );
                Rectangle::new([lower, upper], color.filled())
            })
        ).map_err(plot_error)?;

        let features = sample.features();
        let target = sample.target();
        let (t_min, t_max) = value_range(target);
        let radius = (MARKER_AREA / PI).sqrt().round() as i32;

        chart.draw_series(
            target.iter()
                .enumerate()
                .map(|(i, &t)| {
                    let color = rgb_color(colormap.color_at(normalize(t, t_min, t_max)));
                    Circle::new((features[0][i], features[1][i]), radius, color.filled())
                })
        ).map_err(plot_error)?;
        chart.draw_series(
            (0..target.len())
                .map(|i| {
                    let edge = BLACK.stroke_width(MARKER_EDGE_WIDTH);
                    Circle::new((features[0][i], features[1][i]), radius, edge)
                })
        ).map_err(plot_error)?;

        Ok(())
    }
}


/// Draw the decision surface of `model` on `area`.
/// See [`SurfacePlot::draw`].
pub fn plot_model_pred_2d<DB, C>(
    area: &DrawingArea<DB, Shift>,
    model: &C,
    sample: &Sample,
    options: &SurfacePlot<'_>,
) -> Result<()>
    where DB: DrawingBackend,
          C: Classifier + ?Sized,
{
    options.draw(area, model, sample)
}


/// The gradient used when no colormap is given:
/// 255 steps from a translucent orange towards a translucent blue,
/// with the transparency dropped.
pub fn default_colormap() -> Result<Colormap> {
    let lo = Rgb::from_hex(DEFAULT_GRADIENT_LOW)?;
    let hi = Rgb::from_hex(DEFAULT_GRADIENT_HIGH)?;

    let steps = DEFAULT_GRADIENT_STEPS as f64;
    let seq = (0..DEFAULT_GRADIENT_STEPS)
        .map(|i| Segment::Color(lo.lerp(&hi, i as f64 / steps)))
        .collect::<Vec<_>>();
    make_colormap(&seq)
}


fn draw_colorbar<DB>(
    area: &DrawingArea<DB, Shift>,
    (lo, hi): (f64, f64),
    colormap: &dyn ColorLookup,
) -> Result<()>
    where DB: DrawingBackend
{
    let range = padded(lo, hi);
    let mut chart = ChartBuilder::on(area)
        .margin(5)
        .x_label_area_size(40)
        .right_y_label_area_size(40)
        .build_cartesian_2d(0f64..1f64, range.clone())
        .map_err(plot_error)?;

    chart.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()
        .map_err(plot_error)?;

    let steps = COLORBAR_STEPS as f64;
    let height = range.end - range.start;
    chart.draw_series(
        (0..COLORBAR_STEPS).map(|i| {
            let i = i as f64;
            let bottom = range.start + height * i / steps;
            let top = range.start + height * (i + 1f64) / steps;
            let color = rgb_color(colormap.color_at((i + 0.5) / steps));
            Rectangle::new([(0f64, bottom), (1f64, top)], color.filled())
        })
    ).map_err(plot_error)?;
    Ok(())
}


/// `min..max`, widened by `0.5` on both sides when empty.
fn padded(min: f64, max: f64) -> Range<f64> {
    if max > min {
        min..max
    } else {
        (min - 0.5)..(max + 0.5)
    }
}


/// Half the width of a grid cell along an axis.
/// A constant feature has one cell spanning the whole padded `range`.
fn half_cell(values: &[f64], range: &Range<f64>) -> f64 {
    let step = values[1] - values[0];
    if step > 0f64 {
        step / 2f64
    } else {
        (range.end - range.start) / 2f64
    }
}


#[inline]
fn rgb_color(color: Rgb) -> RGBColor {
    let [r, g, b] = color.to_u8();
    RGBColor(r, g, b)
}


fn plot_error<E: fmt::Display>(error: E) -> DatathonError {
    DatathonError::Plot(error.to_string())
}
