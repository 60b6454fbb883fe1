//! Unthresholded recurrence plot.
//!
//! ```text
//! RP[i, j] = |xi − xj|
//! ```
//!
//! Optional standardisation rescales the W × W block to [0, 1]; padding then
//! appends `padding` zero rows at the bottom and zero columns at the right,
//! giving `(W + padding) × (W + padding)` images.

use super::{ImageStrategy, ImageTransform};
use crate::preprocessing::standardize_image;
use ndarray::{s, ArrayViewMut2};

/// Recurrence plot encoder.
#[derive(Debug, Clone)]
pub struct RecurrencePlot {
    padding: usize,
    standardize: bool,
}

impl RecurrencePlot {
    /// Create an encoder with `padding` zero rows/columns.
    pub fn new(padding: usize, standardize: bool) -> Self {
        Self {
            padding,
            standardize,
        }
    }

    /// Zero rows/columns appended to each image.
    pub fn padding(&self) -> usize {
        self.padding
    }
}

impl ImageTransform for RecurrencePlot {
    fn strategy(&self) -> ImageStrategy {
        ImageStrategy::Rp
    }

    fn image_size(&self, window: usize) -> (usize, usize) {
        (window + self.padding, window + self.padding)
    }

    fn encode_window(&self, window: &[f64], mut out: ArrayViewMut2<'_, f64>) {
        let n = window.len();
        let mut block = out.slice_mut(s![..n, ..n]);

        for ((i, j), value) in block.indexed_iter_mut() {
            *value = (window[i] - window[j]).abs();
        }

        if self.standardize {
            standardize_image(block);
        }
    }
}
