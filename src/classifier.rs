//! The prediction interface consumed by the decision surface renderer.
use crate::Sample;
use crate::error::Result;


/// A trait that defines a trained classifier.
///
/// Errors raised by an implementation are propagated unchanged
/// by every helper that queries it. Wrap foreign errors with
/// [`DatathonError::predict`](crate::DatathonError::predict).
pub trait Classifier {
    /// Predicts the label of the `row`-th example in `sample`.
    fn predict(&self, sample: &Sample, row: usize) -> Result<f64>;


    /// Predicts the labels of all examples in `sample`.
    fn predict_all(&self, sample: &Sample) -> Result<Vec<f64>> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(sample, row))
            .collect()
    }
}


impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict(&self, sample: &Sample, row: usize) -> Result<f64> {
        (**self).predict(sample, row)
    }

    fn predict_all(&self, sample: &Sample) -> Result<Vec<f64>> {
        (**self).predict_all(sample)
    }
}
