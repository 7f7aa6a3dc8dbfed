//! Predicted labels over a rectangular grid.
use log::debug;

use crate::classifier::Classifier;
use crate::color::linspace;
use crate::error::{DatathonError, Result};
use crate::sample::{Feature, Sample};


/// Labels predicted at `resolution x resolution` points
/// spanning the ranges of the two features of a sample.
///
/// Labels are stored row by row: the first feature varies fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    labels: Vec<f64>,
    resolution: usize,
}


impl ClassifiedGrid {
    /// Query `model` at every point of the grid over the feature ranges
    /// of `sample`, which must have exactly two features.
    ///
    /// Errors returned by the model are propagated unchanged.
    pub fn evaluate<C>(model: &C, sample: &Sample, resolution: usize)
        -> Result<Self>
        where C: Classifier + ?Sized
    {
        if resolution < 2 {
            return Err(DatathonError::InvalidInput(
                "resolution".into(),
                format!("expected at least 2 points per axis, got {resolution}"),
            ));
        }

        let (n_sample, n_feature) = sample.shape();
        if n_feature != 2 {
            return Err(DatathonError::InvalidSample(format!(
                "a decision surface needs exactly 2 features, got {n_feature}"
            )));
        }
        if n_sample == 0 {
            return Err(DatathonError::InvalidSample(
                "a decision surface needs at least one example".into()
            ));
        }

        let features = sample.features();
        let (x_min, x_max) = finite_range(&features[0])?;
        let (y_min, y_max) = finite_range(&features[1])?;

        let xs = linspace(x_min, x_max, resolution);
        let ys = linspace(y_min, y_max, resolution);

        let n_points = resolution * resolution;
        let mut grid_x = Vec::with_capacity(n_points);
        let mut grid_y = Vec::with_capacity(n_points);
        for &y in &ys {
            for &x in &xs {
                grid_x.push(x);
                grid_y.push(y);
            }
        }
        let grid = Sample::from_columns(
            vec![
                Feature::from_vals(features[0].name(), grid_x),
                Feature::from_vals(features[1].name(), grid_y),
            ],
            Vec::new(),
        )?;

        let labels = model.predict_all(&grid)?;
        if labels.len() != n_points {
            return Err(DatathonError::predict(format!(
                "the classifier returned {} labels for {n_points} points",
                labels.len()
            )));
        }
        debug!("evaluated the classifier on a {resolution}x{resolution} grid");

        Ok(Self { xs, ys, labels, resolution })
    }


    /// Grid coordinates along the first feature.
    pub fn xs(&self) -> &[f64] {
        &self.xs[..]
    }


    /// Grid coordinates along the second feature.
    pub fn ys(&self) -> &[f64] {
        &self.ys[..]
    }


    /// All predicted labels, row by row.
    pub fn labels(&self) -> &[f64] {
        &self.labels[..]
    }


    /// Number of points per axis.
    pub fn resolution(&self) -> usize {
        self.resolution
    }


    /// The label predicted at `(xs[i], ys[j])`.
    #[inline]
    pub fn label(&self, i: usize, j: usize) -> f64 {
        self.labels[j * self.resolution + i]
    }


    /// Returns the pair `(min, max)` of the predicted labels.
    pub fn label_range(&self) -> (f64, f64) {
        value_range(&self.labels)
    }


    /// `true` if every grid point got the same label.
    pub fn is_uniform(&self) -> bool {
        let (min, max) = self.label_range();
        min == max
    }


    /// Map `label` into `[0, 1]` by the label range of the grid.
    #[inline]
    pub fn normalize(&self, label: f64) -> f64 {
        let (min, max) = self.label_range();
        normalize(label, min, max)
    }


    /// Iterate over `(x, y, label)` for every grid point.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.labels.iter()
            .enumerate()
            .map(|(k, &label)| {
                let (i, j) = (k % self.resolution, k / self.resolution);
                (self.xs[i], self.ys[j], label)
            })
    }
}


fn finite_range(feature: &Feature) -> Result<(f64, f64)> {
    match feature.min_max() {
        Some((min, max)) if min.is_finite() && max.is_finite() => Ok((min, max)),
        _ => Err(DatathonError::InvalidSample(format!(
            "feature \"{}\" has no finite range", feature.name()
        ))),
    }
}


/// Returns the pair `(min, max)` of the finite values in `vals`.
pub(crate) fn value_range(vals: &[f64]) -> (f64, f64) {
    vals.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        })
}


/// `(v - min) / (max - min)`, or `0` for an empty or flat range.
#[inline]
pub(crate) fn normalize(v: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (v - min) / (max - min)
    } else {
        0f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    struct AboveDiagonal;

    impl Classifier for AboveDiagonal {
        fn predict(&self, sample: &Sample, row: usize) -> Result<f64> {
            let x = sample.features();
            Ok(if x[1][row] > x[0][row] { 1.0 } else { 0.0 })
        }
    }

    fn sample() -> Sample {
        Sample::from_columns(
            vec![
                Feature::from_vals("x", vec![0.0, 1.0, 0.5]),
                Feature::from_vals("y", vec![-1.0, 1.0, 0.0]),
            ],
            vec![0.0, 1.0, 0.0],
        ).unwrap()
    }

    #[test]
    fn grid_spans_the_feature_ranges() {
        let grid = ClassifiedGrid::evaluate(&AboveDiagonal, &sample(), 3).unwrap();
        assert_eq!(grid.xs(), &[0.0, 0.5, 1.0]);
        assert_eq!(grid.ys(), &[-1.0, 0.0, 1.0]);
        assert_eq!(grid.labels().len(), 9);
        // First feature varies fastest.
        assert_eq!(grid.label(0, 2), 1.0);
        assert_eq!(grid.label(2, 0), 0.0);
        assert_eq!(grid.label_range(), (0.0, 1.0));
        assert!(!grid.is_uniform());
        assert_eq!(grid.points().nth(5), Some((1.0, 0.0, 0.0)));
    }

    #[test]
    fn bad_inputs_are_rejected() {
        assert!(ClassifiedGrid::evaluate(&AboveDiagonal, &sample(), 1).is_err());

        let one = Sample::from_columns(
            vec![Feature::from_vals("x", vec![0.0])], vec![0.0]
        ).unwrap();
        assert!(ClassifiedGrid::evaluate(&AboveDiagonal, &one, 10).is_err());

        let empty = Sample::from_columns(
            vec![
                Feature::from_vals("x", Vec::new()),
                Feature::from_vals("y", Vec::new()),
            ],
            Vec::new()
        ).unwrap();
        assert!(ClassifiedGrid::evaluate(&AboveDiagonal, &empty, 10).is_err());
    }

    #[test]
    fn flat_ranges_normalize_to_zero() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert_eq!(normalize(2.0, 1.0, 3.0), 0.5);
        assert_eq!(value_range(&[f64::NAN, 2.0, -1.0]), (-1.0, 2.0));
    }
}
