//! Value rescaling used by the image transforms.
//!
//! # Min-Max Normalization
//!
//! Scales to [0, 1] or [-1, 1]:
//! ```text
//! normalized = (x - min) / (max - min)            // unit
//! normalized = 2 * (x - min) / (max - min) - 1    // symmetric
//! ```
//!
//! Used for:
//! - Gramian angular fields: each window is rescaled to [-1, 1] before `arccos`
//! - Output standardisation: each image is rescaled to [0, 1]
//!
//! A degenerate range (`max == min`, or no values seen) maps everything to 0.

use ndarray::ArrayViewMut2;

/// Trait for normalization strategies.
///
/// Implementers provide methods to:
/// 1. Update internal state with new data (if needed)
/// 2. Normalize a single value
/// 3. Normalize a batch of values
/// 4. Reset state
pub trait Normalizer: Send + Sync {
    /// Update normalizer state with a new value.
    fn update(&mut self, value: f64);

    /// Normalize a single value.
    fn normalize(&self, value: f64) -> f64;

    /// Normalize a batch of values.
    ///
    /// Default implementation calls `normalize` for each value,
    /// but can be overridden for efficiency.
    fn normalize_batch(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }

    /// Reset normalizer state.
    fn reset(&mut self);

    /// Check if normalizer is ready (has enough data to normalize).
    fn is_ready(&self) -> bool {
        true
    }
}

/// Min-max normalization with bounds learned from the data.
///
/// # Example
///
/// ```
/// use labelled_image::preprocessing::{MinMaxNormalizer, Normalizer};
///
/// let unit = MinMaxNormalizer::fit(&[0.0, 50.0, 100.0], false);
/// assert_eq!(unit.normalize(50.0), 0.5);
///
/// let symmetric = MinMaxNormalizer::fit(&[0.0, 100.0], true);
/// assert_eq!(symmetric.normalize(0.0), -1.0);
/// assert_eq!(symmetric.normalize(100.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct MinMaxNormalizer {
    min: f64,
    max: f64,
    symmetric: bool, // If true, normalize to [-1, 1], else [0, 1]
}

impl MinMaxNormalizer {
    /// Create a normalizer with no observed values.
    pub fn new(symmetric: bool) -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            symmetric,
        }
    }

    /// Create a normalizer bounded by the extremes of `values`.
    pub fn fit(values: &[f64], symmetric: bool) -> Self {
        let mut normalizer = Self::new(symmetric);
        for &v in values {
            normalizer.update(v);
        }
        normalizer
    }

    /// Get the min value.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Get the max value.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// True when the bounds cannot scale (nothing seen, or a constant input).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.max > self.min)
    }
}

impl Normalizer for MinMaxNormalizer {
    fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }

        let clamped = value.clamp(self.min, self.max);
        let normalized = (clamped - self.min) / (self.max - self.min);

        if self.symmetric {
            2.0 * normalized - 1.0 // Map to [-1, 1]
        } else {
            normalized // Map to [0, 1]
        }
    }

    fn reset(&mut self) {
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
    }

    fn is_ready(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Rescale an image in place to [0, 1]. A constant image becomes all zeros.
pub fn standardize_image(mut image: ArrayViewMut2<'_, f64>) {
    let mut normalizer = MinMaxNormalizer::new(false);
    image.iter().for_each(|&v| normalizer.update(v));
    image.mapv_inplace(|v| normalizer.normalize(v));
}
