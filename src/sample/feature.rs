//! A named column of a [`Sample`](super::Sample).
use std::ops::Index;

use polars::prelude::*;

use crate::error::{DatathonError, Result};


/// A named column of feature values.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    name: String,
    vals: Vec<f64>,
}


impl Feature {
    /// Construct a feature from its values.
    pub fn from_vals<T: ToString>(name: T, vals: Vec<f64>) -> Self {
        Self { name: name.to_string(), vals, }
    }


    /// Convert a `polars::Series` into a feature.
    /// Integer columns are cast to `f64`; a null entry is an error.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let vals = series_to_vec(series)?;
        Ok(Self { name, vals, })
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Returns the values as a slice.
    pub fn vals(&self) -> &[f64] {
        &self.vals[..]
    }


    /// Returns the number of items in this feature.
    pub fn len(&self) -> usize {
        self.vals.len()
    }


    /// Returns `true` if the feature holds no value.
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }


    /// Returns the pair `(min, max)` of this feature,
    /// or `None` for an empty feature.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.is_empty() { return None; }

        let range = self.vals.iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });
        Some(range)
    }
}


impl Index<usize> for Feature {
    type Output = f64;
    fn index(&self, idx: usize) -> &Self::Output {
        &self.vals[idx]
    }
}


/// Read a numeric `Series` into a `Vec<f64>`.
pub(crate) fn series_to_vec(series: &Series) -> Result<Vec<f64>> {
    let name = series.name().to_string();
    let casted = series.cast(&DataType::Float64)?;
    casted.f64()?
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            DatathonError::InvalidSample(
                format!("column \"{name}\" contains a null value")
            )
        })
}
