//! Error type shared by every stage of the dataset pipeline.
//!
//! Failures fall into four kinds:
//!
//! | Kind | Meaning | Recoverable by caller? |
//! |------|---------|------------------------|
//! | [`ErrorKind::Configuration`] | Invalid window sizes, strategies, bins, series | Yes, fix the request |
//! | [`ErrorKind::LabelContract`] | Labeler emitted a category outside Sell/Buy/Hold | No, broken adapter |
//! | [`ErrorKind::ShapeMismatch`] | A transform produced an inconsistent image count or size | No, broken transform |
//! | [`ErrorKind::Io`] | Reading/writing configuration or exported arrays | Depends |
//!
//! Every error is fatal for the call that produced it; no partial dataset is
//! ever returned.

use crate::transform::ImageStrategy;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Coarse classification of an [`ImagingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is invalid.
    Configuration,
    /// The labeler broke its output contract.
    LabelContract,
    /// A transform produced images inconsistent with the alignment.
    ShapeMismatch,
    /// File system or serialization failure.
    Io,
}

/// Errors raised while building a labelled image dataset.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    /// Label window must be a positive odd integer.
    #[error("label window must be a positive odd integer, got {0}")]
    InvalidLabelWindow(usize),

    /// Label window is longer than the series.
    #[error("label window ({label_window}) exceeds series length ({series_len})")]
    LabelWindowExceedsSeries {
        label_window: usize,
        series_len: usize,
    },

    /// Image window must be positive.
    #[error("image window must be > 0")]
    InvalidImageWindow,

    /// `W < ceil(L/2)`: no slice exists where both an image and a centred label fit.
    #[error(
        "image window ({image_window}) must be >= ceil(label window / 2) = {required} \
         (label window {label_window})"
    )]
    ImageWindowTooSmall {
        image_window: usize,
        label_window: usize,
        required: usize,
    },

    /// Image window does not fit in the trimmed (and possibly returns-derived) series.
    #[error(
        "image window ({image_window}) exceeds effective series length ({effective_len})"
    )]
    ImageWindowExceedsSeries {
        image_window: usize,
        effective_len: usize,
    },

    /// No image strategy was requested.
    #[error("no image strategy requested (expected one or more of GASF, GADF, RP, MTF)")]
    EmptyStrategySet,

    /// Strategy name outside the supported set.
    #[error("unknown image strategy '{0}' (expected GASF, GADF, RP or MTF)")]
    UnknownStrategy(String),

    /// Markov transition field needs at least one bin.
    #[error("MTF bin count must be > 0, got {0}")]
    InvalidBinCount(usize),

    /// Requested column is not in the series table.
    #[error("column '{0}' not found in series table")]
    MissingColumn(String),

    /// Series content cannot be imaged (empty, non-finite, zero price for returns).
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    /// Configuration file content is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Labeler produced a category outside Sell/Buy/Hold.
    #[error("labeler produced unknown category '{label}' at index {index}")]
    LabelContract { index: usize, label: String },

    /// Text that names none of Sell/Buy/Hold, outside any label sequence.
    #[error("unknown label category '{0}'")]
    UnknownLabel(String),

    /// Labeler returned a different number of records than input values.
    #[error("labeler returned {actual} records for {expected} input values")]
    LabelCount { expected: usize, actual: usize },

    /// A transform produced a different image count than the alignment expects.
    #[error("{strategy} produced {actual} images, alignment expects {expected}")]
    ShapeMismatch {
        strategy: ImageStrategy,
        expected: usize,
        actual: usize,
    },

    /// Per-strategy image sizes differ and the channel policy forbids reconciling them.
    #[error(
        "cannot stack {strategy} images of size {actual:?} with images of size {expected:?}"
    )]
    ChannelShapeMismatch {
        strategy: ImageStrategy,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Images, labels and prices of a dataset disagree in length.
    #[error(
        "misaligned dataset: {images} images, {labels} labels, {prices} prices \
         (alignment expects {expected})"
    )]
    AlignmentMismatch {
        expected: usize,
        images: usize,
        labels: usize,
        prices: usize,
    },

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON / TOML (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// NumPy array write/read failure.
    #[error("npy error: {0}")]
    Npy(String),
}

impl ImagingError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImagingError::InvalidLabelWindow(_)
            | ImagingError::LabelWindowExceedsSeries { .. }
            | ImagingError::InvalidImageWindow
            | ImagingError::ImageWindowTooSmall { .. }
            | ImagingError::ImageWindowExceedsSeries { .. }
            | ImagingError::EmptyStrategySet
            | ImagingError::UnknownStrategy(_)
            | ImagingError::InvalidBinCount(_)
            | ImagingError::MissingColumn(_)
            | ImagingError::InvalidSeries(_)
            | ImagingError::InvalidConfig(_) => ErrorKind::Configuration,
            ImagingError::LabelContract { .. }
            | ImagingError::UnknownLabel(_)
            | ImagingError::LabelCount { .. } => ErrorKind::LabelContract,
            ImagingError::ShapeMismatch { .. }
            | ImagingError::ChannelShapeMismatch { .. }
            | ImagingError::AlignmentMismatch { .. } => ErrorKind::ShapeMismatch,
            ImagingError::Io(_) | ImagingError::Serialization(_) | ImagingError::Npy(_) => {
                ErrorKind::Io
            }
        }
    }

    /// True for errors the caller can fix by changing the request.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

impl From<serde_json::Error> for ImagingError {
    fn from(err: serde_json::Error) -> Self {
        ImagingError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for ImagingError {
    fn from(err: toml::ser::Error) -> Self {
        ImagingError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ImagingError {
    fn from(err: toml::de::Error) -> Self {
        ImagingError::Serialization(err.to_string())
    }
}

impl From<ndarray_npy::WriteNpyError> for ImagingError {
    fn from(err: ndarray_npy::WriteNpyError) -> Self {
        ImagingError::Npy(err.to_string())
    }
}

impl From<ndarray_npy::ReadNpyError> for ImagingError {
    fn from(err: ndarray_npy::ReadNpyError) -> Self {
        ImagingError::Npy(err.to_string())
    }
}
