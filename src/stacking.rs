//! Channel stacking of per-strategy images.
//!
//! | Strategies | Output | Shape |
//! |------------|--------|-------|
//! | 1 | [`ImageTensor::Single`] | (n, H, W) |
//! | k > 1 | [`ImageTensor::Stacked`] | (n, H, W, k), channels last |
//!
//! Channel `c` of a stacked tensor always holds the images of the `c`-th
//! requested strategy. Duplicate strategies produce duplicate channels.
//!
//! # Mixed Image Sizes
//!
//! A padded recurrence plot is larger than the other encodings. What happens
//! then is governed by [`ChannelPolicy`]:
//!
//! ```text
//! Reject        RP 15×15 + GASF 14×14  → ChannelShapeMismatch
//! PadToLargest  RP 15×15 + GASF 14×14  → (n, 15, 15, 2), GASF zero-padded bottom/right
//! ```

use crate::error::{ImagingError, Result};
use crate::transform::StrategyImages;
use ndarray::{s, Array3, Array4};
use serde::{Deserialize, Serialize};

// ============================================================================
// Image Tensor
// ============================================================================

/// Final image array of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageTensor {
    /// One strategy: (n, H, W)
    Single(Array3<f64>),

    /// Several strategies: (n, H, W, channels)
    Stacked(Array4<f64>),
}

impl ImageTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ImageTensor::Single(arr) => arr.shape().to_vec(),
            ImageTensor::Stacked(arr) => arr.shape().to_vec(),
        }
    }

    /// Get the number of dimensions.
    pub fn ndim(&self) -> usize {
        match self {
            ImageTensor::Single(_) => 3,
            ImageTensor::Stacked(_) => 4,
        }
    }

    /// Number of images (leading axis).
    pub fn num_images(&self) -> usize {
        self.shape()[0]
    }

    /// Number of channels (1 for a single strategy).
    pub fn channels(&self) -> usize {
        match self {
            ImageTensor::Single(_) => 1,
            ImageTensor::Stacked(arr) => arr.shape()[3],
        }
    }

    /// Get total number of elements.
    pub fn len(&self) -> usize {
        match self {
            ImageTensor::Single(arr) => arr.len(),
            ImageTensor::Stacked(arr) => arr.len(),
        }
    }

    /// Check if tensor is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Try to get as a single-strategy array.
    pub fn as_single(&self) -> Option<&Array3<f64>> {
        match self {
            ImageTensor::Single(arr) => Some(arr),
            ImageTensor::Stacked(_) => None,
        }
    }

    /// Try to get as a stacked array.
    pub fn as_stacked(&self) -> Option<&Array4<f64>> {
        match self {
            ImageTensor::Stacked(arr) => Some(arr),
            ImageTensor::Single(_) => None,
        }
    }
}

// ============================================================================
// Stacking
// ============================================================================

/// How images of different sizes are combined into channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Fail with [`ImagingError::ChannelShapeMismatch`].
    #[default]
    Reject,

    /// Zero-pad smaller images bottom/right to the largest height and width.
    PadToLargest,
}

/// Combine per-strategy images, in request order, into one tensor.
///
/// # Errors
///
/// - [`ImagingError::EmptyStrategySet`] for an empty input
/// - [`ImagingError::ShapeMismatch`] if the strategies disagree on image count
/// - [`ImagingError::ChannelShapeMismatch`] if image sizes differ under [`ChannelPolicy::Reject`]
pub fn stack_images(mut outputs: Vec<StrategyImages>, policy: ChannelPolicy) -> Result<ImageTensor> {
    let first = outputs.first().ok_or(ImagingError::EmptyStrategySet)?;
    let count = first.count();
    let first_size = first.image_size();

    for out in &outputs[1..] {
        if out.count() != count {
            return Err(ImagingError::ShapeMismatch {
                strategy: out.strategy,
                expected: count,
                actual: out.count(),
            });
        }
        if policy == ChannelPolicy::Reject && out.image_size() != first_size {
            return Err(ImagingError::ChannelShapeMismatch {
                strategy: out.strategy,
                expected: first_size,
                actual: out.image_size(),
            });
        }
    }

    if outputs.len() == 1 {
        if let Some(only) = outputs.pop() {
            return Ok(ImageTensor::Single(only.images));
        }
    }

    let height = outputs.iter().map(|o| o.image_size().0).max().unwrap_or(0);
    let width = outputs.iter().map(|o| o.image_size().1).max().unwrap_or(0);
    let mut stacked = Array4::<f64>::zeros((count, height, width, outputs.len()));

    for (channel, out) in outputs.iter().enumerate() {
        let (h, w) = out.image_size();
        stacked
            .slice_mut(s![.., ..h, ..w, channel])
            .assign(&out.images);
    }

    log::debug!(
        "stacked {} channels into {:?} ({:?})",
        outputs.len(),
        stacked.shape(),
        policy
    );

    Ok(ImageTensor::Stacked(stacked))
}
