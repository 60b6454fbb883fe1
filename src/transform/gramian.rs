//! Gramian angular fields.
//!
//! Each window is min-max rescaled to [-1, 1] and mapped to polar angles
//! `φ = arccos(x̃)`. The image is a Gram-like matrix of angle sums or
//! differences:
//!
//! ```text
//! GASF[i, j] = cos(φi + φj) = x̃i·x̃j − √(1−x̃i²)·√(1−x̃j²)
//! GADF[i, j] = sin(φi − φj) = √(1−x̃i²)·x̃j − x̃i·√(1−x̃j²)
//! ```
//!
//! A constant window rescales to all zeros (φ = π/2 everywhere).

use super::{ImageStrategy, ImageTransform};
use crate::preprocessing::{standardize_image, MinMaxNormalizer, Normalizer};
use ndarray::ArrayViewMut2;

/// Angle combination used to build the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GramianKind {
    /// cos(φi + φj)
    Summation,
    /// sin(φi − φj)
    Difference,
}

/// GASF / GADF encoder.
#[derive(Debug, Clone)]
pub struct GramianAngularField {
    kind: GramianKind,
    standardize: bool,
}

impl GramianAngularField {
    /// Create an encoder; `standardize` rescales each output image to [0, 1].
    pub fn new(kind: GramianKind, standardize: bool) -> Self {
        Self { kind, standardize }
    }

    /// Field kind.
    pub fn kind(&self) -> GramianKind {
        self.kind
    }

    /// Rescaled window and polar angles `φ = arccos(x̃)`.
    pub fn polar_encode(window: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let scaled = MinMaxNormalizer::fit(window, true).normalize_batch(window);
        let phi = scaled.iter().map(|x| x.acos()).collect();
        (scaled, phi)
    }
}

impl ImageTransform for GramianAngularField {
    fn strategy(&self) -> ImageStrategy {
        match self.kind {
            GramianKind::Summation => ImageStrategy::Gasf,
            GramianKind::Difference => ImageStrategy::Gadf,
        }
    }

    fn image_size(&self, window: usize) -> (usize, usize) {
        (window, window)
    }

    fn encode_window(&self, window: &[f64], mut out: ArrayViewMut2<'_, f64>) {
        let (cos_phi, _) = Self::polar_encode(window);
        let sin_phi: Vec<f64> = cos_phi
            .iter()
            .map(|x| (1.0 - x * x).max(0.0).sqrt())
            .collect();

        for ((i, j), value) in out.indexed_iter_mut() {
            *value = match self.kind {
                GramianKind::Summation => cos_phi[i] * cos_phi[j] - sin_phi[i] * sin_phi[j],
                GramianKind::Difference => sin_phi[i] * cos_phi[j] - cos_phi[i] * sin_phi[j],
            };
        }

        if self.standardize {
            standardize_image(out);
        }
    }
}
