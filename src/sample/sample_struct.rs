//! Column-major examples and their targets.
use polars::prelude::*;
use rayon::prelude::*;

use super::feature::*;
use crate::error::{DatathonError, Result};


/// Struct `Sample` holds a batch of examples in a column-major layout
/// together with their target labels.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership for the given pair
    /// `data` and `target`.
    /// The target may be empty when the sample is only fed to a classifier.
    pub fn from_dataframe(data: DataFrame, target: Series) -> Result<Self> {
        let (n_sample, n_feature) = data.shape();
        let target = series_to_vec(&target)?;

        let features = data.get_columns()
            .par_iter()
            .map(Feature::from_series)
            .collect::<Result<Vec<_>>>()?;

        let sample = Self {
            features,
            target,
            n_sample,
            n_feature,
        };
        sample.target_is_aligned()?;
        Ok(sample)
    }


    /// Build a `Sample` from feature columns and a target vector.
    /// All columns must have the same length;
    /// the target is either empty or of that length.
    pub fn from_columns(features: Vec<Feature>, target: Vec<f64>)
        -> Result<Self>
    {
        let n_feature = features.len();
        let n_sample = features.first()
            .map(|feat| feat.len())
            .unwrap_or(0);

        if let Some(feat) = features.iter().find(|f| f.len() != n_sample) {
            return Err(DatathonError::InvalidSample(format!(
                "feature \"{}\" has {} values, expected {n_sample}",
                feat.name(), feat.len()
            )));
        }

        let sample = Self {
            features,
            target,
            n_sample,
            n_feature,
        };
        sample.target_is_aligned()?;
        Ok(sample)
    }


    /// Returns the slice of target values.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Returns a slice of the features.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Returns the pair of the number of examples and
    /// the number of features
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    fn target_is_aligned(&self) -> Result<()> {
        let n_target = self.target.len();
        if n_target != 0 && n_target != self.n_sample {
            return Err(DatathonError::InvalidSample(format!(
                "the target has {n_target} values \
                 while the features have {} rows",
                self.n_sample
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Sample {
        let s1 = Series::new("x", &[10.0, 14.0, 15.0, 5.0]);
        let s2 = Series::new("y", &[ 5.0,  8.0,  3.0, 1.0]);
        let df = DataFrame::new(vec![s1, s2]).unwrap();
        let target = Series::new("class", &[1_i64, 1, 0, 0]);
        Sample::from_dataframe(df, target).unwrap()
    }

    #[test]
    fn dataframe_conversion() {
        let sample = toy();
        assert_eq!(sample.shape(), (4, 2));
        assert_eq!(sample.target(), &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(sample.features()[0].vals(), &[10.0, 14.0, 15.0, 5.0]);
        assert_eq!(sample.features()[1].name(), "y");
        assert_eq!(sample.features()[1][3], 1.0);
    }

    #[test]
    fn misaligned_target_is_rejected() {
        let s1 = Series::new("x", &[1.0, 2.0, 3.0]);
        let df = DataFrame::new(vec![s1]).unwrap();
        let target = Series::new("class", &[1.0, 0.0]);
        assert!(Sample::from_dataframe(df, target).is_err());
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let features = vec![
            Feature::from_vals("x", vec![1.0, 2.0]),
            Feature::from_vals("y", vec![1.0]),
        ];
        assert!(Sample::from_columns(features, Vec::new()).is_err());
    }
}
