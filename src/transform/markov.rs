//! Markov transition field.
//!
//! 1. Quantile edges split the window into `num_bin` bins (linear interpolation
//!    between order statistics).
//! 2. Consecutive values give a `num_bin × num_bin` transition-count matrix,
//!    row-normalised into probabilities (rows with no outgoing transition stay 0).
//! 3. The field spreads those probabilities over time:
//!
//! ```text
//! MTF[i, j] = P[bin(xi), bin(xj)]
//! ```

use super::{ImageStrategy, ImageTransform};
use crate::error::{ImagingError, Result};
use ndarray::{Array2, ArrayViewMut2};

/// Markov transition field encoder.
#[derive(Debug, Clone)]
pub struct MarkovTransitionField {
    num_bin: usize,
}

impl MarkovTransitionField {
    /// Create an encoder with `num_bin` quantile bins.
    pub fn new(num_bin: usize) -> Result<Self> {
        if num_bin == 0 {
            return Err(ImagingError::InvalidBinCount(num_bin));
        }
        Ok(Self { num_bin })
    }

    /// Number of quantile bins.
    pub fn num_bin(&self) -> usize {
        self.num_bin
    }

    /// Interior quantile edges `q / num_bin` for `q = 1 .. num_bin - 1`.
    pub fn quantile_edges(window: &[f64], num_bin: usize) -> Vec<f64> {
        if window.is_empty() {
            return Vec::new();
        }
        let mut sorted = window.to_vec();
        sorted.sort_by(f64::total_cmp);
        let last = sorted.len() - 1;

        (1..num_bin)
            .map(|q| {
                let pos = q as f64 / num_bin as f64 * last as f64;
                let lo = pos.floor() as usize;
                let hi = (lo + 1).min(last);
                sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
            })
            .collect()
    }

    /// Bin index in `0..num_bin` for every value of the window.
    pub fn quantile_bins(window: &[f64], num_bin: usize) -> Vec<usize> {
        let edges = Self::quantile_edges(window, num_bin);
        window
            .iter()
            .map(|&x| edges.iter().filter(|&&e| x > e).count())
            .collect()
    }

    /// Row-normalised transition probabilities between consecutive bins.
    pub fn transition_matrix(bins: &[usize], num_bin: usize) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((num_bin, num_bin));
        for pair in bins.windows(2) {
            matrix[[pair[0], pair[1]]] += 1.0;
        }
        for mut row in matrix.rows_mut() {
            let total = row.sum();
            if total > 0.0 {
                row.mapv_inplace(|c| c / total);
            }
        }
        matrix
    }
}

impl ImageTransform for MarkovTransitionField {
    fn strategy(&self) -> ImageStrategy {
        ImageStrategy::Mtf
    }

    fn image_size(&self, window: usize) -> (usize, usize) {
        (window, window)
    }

    fn encode_window(&self, window: &[f64], mut out: ArrayViewMut2<'_, f64>) {
        let bins = Self::quantile_bins(window, self.num_bin);
        let transitions = Self::transition_matrix(&bins, self.num_bin);

        for ((i, j), value) in out.indexed_iter_mut() {
            *value = transitions[[bins[i], bins[j]]];
        }
    }
}
