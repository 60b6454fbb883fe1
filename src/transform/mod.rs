//! Image encodings of a series window and the strategy dispatcher.
//!
//! # Strategies
//!
//! | Tag | Name | Image size | Options |
//! |-----|------|------------|---------|
//! | `GASF` | angular-summation-field | W × W | `standardize_gasf` |
//! | `GADF` | angular-difference-field | W × W | `standardize_gadf` |
//! | `RP` | recurrence-plot | (W + p) × (W + p) | `rp_padding`, `standardize_rp` |
//! | `MTF` | markov-transition-field | W × W | `num_bin` |
//!
//! Every transform slides a window of `W` values with stride 1 over the
//! series it is given, producing `len - W + 1` images stacked along axis 0.
//! Image `i` is built from `series[i .. i + W]`.
//!
//! # Dispatch
//!
//! Strategies form a closed enum. [`ImageStrategy::build`] maps each tag to
//! its transform with an exhaustive match; names from configuration files
//! are parsed with [`ImageStrategy::from_str`], which rejects unknown names.
//!
//! ```
//! use labelled_image::transform::{Dispatcher, ImageStrategy, TransformOptions};
//!
//! let series: Vec<f64> = (0..20).map(|i| (i as f64 * 0.4).sin()).collect();
//! let dispatcher = Dispatcher::new(TransformOptions::default());
//!
//! let out = dispatcher
//!     .run(&[ImageStrategy::Rp, ImageStrategy::Gasf], &series, 8, 13)
//!     .unwrap();
//!
//! assert_eq!(out[0].strategy, ImageStrategy::Rp);
//! assert_eq!(out[1].images.shape(), &[13, 8, 8]);
//! ```

pub mod gramian;
pub mod markov;
pub mod recurrence;

pub use gramian::{GramianAngularField, GramianKind};
pub use markov::MarkovTransitionField;
pub use recurrence::RecurrencePlot;

use crate::error::{ImagingError, Result};
use ndarray::{Array3, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Strategy Tags
// ============================================================================

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageStrategy {
    /// Gramian angular summation field.
    Gasf,
    /// Gramian angular difference field.
    Gadf,
    /// Recurrence plot.
    Rp,
    /// Markov transition field.
    Mtf,
}

impl ImageStrategy {
    /// All strategies.
    pub const ALL: [ImageStrategy; 4] = [
        ImageStrategy::Gasf,
        ImageStrategy::Gadf,
        ImageStrategy::Rp,
        ImageStrategy::Mtf,
    ];

    /// Short tag (`GASF`, `GADF`, `RP`, `MTF`).
    pub fn tag(&self) -> &'static str {
        match self {
            ImageStrategy::Gasf => "GASF",
            ImageStrategy::Gadf => "GADF",
            ImageStrategy::Rp => "RP",
            ImageStrategy::Mtf => "MTF",
        }
    }

    /// Descriptive name.
    pub fn long_name(&self) -> &'static str {
        match self {
            ImageStrategy::Gasf => "angular-summation-field",
            ImageStrategy::Gadf => "angular-difference-field",
            ImageStrategy::Rp => "recurrence-plot",
            ImageStrategy::Mtf => "markov-transition-field",
        }
    }

    /// Instantiate the transform for this strategy with its options.
    pub fn build(&self, options: &TransformOptions) -> Result<Box<dyn ImageTransform>> {
        Ok(match self {
            ImageStrategy::Gasf => Box::new(GramianAngularField::new(
                GramianKind::Summation,
                options.standardize_gasf,
            )),
            ImageStrategy::Gadf => Box::new(GramianAngularField::new(
                GramianKind::Difference,
                options.standardize_gadf,
            )),
            ImageStrategy::Rp => Box::new(RecurrencePlot::new(
                options.rp_padding,
                options.standardize_rp,
            )),
            ImageStrategy::Mtf => Box::new(MarkovTransitionField::new(options.num_bin)?),
        })
    }
}

impl fmt::Display for ImageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ImageStrategy {
    type Err = ImagingError;

    /// Accepts tags and long names, case-insensitive, `_` or `-` separators.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        match key.as_str() {
            "gasf" | "angular-summation-field" | "gramian-angular-summation-field" => {
                Ok(ImageStrategy::Gasf)
            }
            "gadf" | "angular-difference-field" | "gramian-angular-difference-field" => {
                Ok(ImageStrategy::Gadf)
            }
            "rp" | "recurrence-plot" => Ok(ImageStrategy::Rp),
            "mtf" | "markov-transition-field" => Ok(ImageStrategy::Mtf),
            _ => Err(ImagingError::UnknownStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for ImageStrategy {
    type Error = ImagingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ImageStrategy> for String {
    fn from(strategy: ImageStrategy) -> Self {
        strategy.tag().to_string()
    }
}

/// Parse a list of strategy names, preserving order.
///
/// # Errors
///
/// [`ImagingError::EmptyStrategySet`] for an empty list,
/// [`ImagingError::UnknownStrategy`] naming the first bad entry.
pub fn parse_strategies<I, S>(names: I) -> Result<Vec<ImageStrategy>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let strategies = names
        .into_iter()
        .map(|name| name.as_ref().parse())
        .collect::<Result<Vec<ImageStrategy>>>()?;

    if strategies.is_empty() {
        return Err(ImagingError::EmptyStrategySet);
    }
    Ok(strategies)
}

// ============================================================================
// Transform Options
// ============================================================================

/// Strategy-specific parameters. Each field is only read by its strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Quantile bins for MTF.
    pub num_bin: usize,

    /// Zero rows/columns appended bottom/right of each RP image.
    pub rp_padding: usize,

    /// Rescale each RP image to [0, 1].
    pub standardize_rp: bool,

    /// Rescale each GASF image to [0, 1].
    pub standardize_gasf: bool,

    /// Rescale each GADF image to [0, 1].
    pub standardize_gadf: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            num_bin: 5,
            rp_padding: 0,
            standardize_rp: false,
            standardize_gasf: false,
            standardize_gadf: false,
        }
    }
}

impl TransformOptions {
    /// Check the options consulted by `strategies`.
    pub fn validate_for(&self, strategies: &[ImageStrategy]) -> Result<()> {
        if strategies.contains(&ImageStrategy::Mtf) && self.num_bin == 0 {
            return Err(ImagingError::InvalidBinCount(self.num_bin));
        }
        Ok(())
    }
}

// ============================================================================
// Transform Trait
// ============================================================================

/// A window → image encoding.
pub trait ImageTransform: Send + Sync {
    /// Strategy tag this transform implements.
    fn strategy(&self) -> ImageStrategy;

    /// Output image size `(height, width)` for a window of `window` values.
    fn image_size(&self, window: usize) -> (usize, usize);

    /// Encode one window into `out`, which is zero-initialised and has
    /// [`image_size`](Self::image_size).
    fn encode_window(&self, window: &[f64], out: ArrayViewMut2<'_, f64>);

    /// Encode every sliding window of `window` values over `series`.
    ///
    /// Returns shape `(series.len() - window + 1, height, width)`.
    fn transform(&self, series: &[f64], window: usize) -> Result<Array3<f64>> {
        if window == 0 {
            return Err(ImagingError::InvalidImageWindow);
        }
        if window > series.len() {
            return Err(ImagingError::ImageWindowExceedsSeries {
                image_window: window,
                effective_len: series.len(),
            });
        }

        let n_images = series.len() - window + 1;
        let (height, width) = self.image_size(window);
        let mut images = Array3::<f64>::zeros((n_images, height, width));

        for (i, image) in images.axis_iter_mut(Axis(0)).enumerate() {
            self.encode_window(&series[i..i + window], image);
        }

        Ok(images)
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Images produced by one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyImages {
    /// Strategy that produced the images.
    pub strategy: ImageStrategy,

    /// Shape (num_images, height, width).
    pub images: Array3<f64>,
}

impl StrategyImages {
    /// Number of images.
    pub fn count(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    /// `(height, width)` of each image.
    pub fn image_size(&self) -> (usize, usize) {
        let shape = self.images.shape();
        (shape[1], shape[2])
    }
}

/// Runs the requested strategies over one image source.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    options: TransformOptions,
}

impl Dispatcher {
    /// Create a dispatcher with the given options.
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    /// Current options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Run each strategy, in request order, over the same `source`.
    ///
    /// `expected_images` is the aligned image count; any strategy producing a
    /// different count fails with [`ImagingError::ShapeMismatch`].
    pub fn run(
        &self,
        strategies: &[ImageStrategy],
        source: &[f64],
        window: usize,
        expected_images: usize,
    ) -> Result<Vec<StrategyImages>> {
        if strategies.is_empty() {
            return Err(ImagingError::EmptyStrategySet);
        }
        self.options.validate_for(strategies)?;

        strategies
            .iter()
            .map(|&strategy| {
                let transform = strategy.build(&self.options)?;
                let images = transform.transform(source, window)?;
                let produced = StrategyImages { strategy, images };

                if produced.count() != expected_images {
                    return Err(ImagingError::ShapeMismatch {
                        strategy,
                        expected: expected_images,
                        actual: produced.count(),
                    });
                }

                log::debug!(
                    "{} produced {:?} from {} values (window {})",
                    strategy,
                    produced.images.shape(),
                    source.len(),
                    window
                );
                Ok(produced)
            })
            .collect()
    }
}
