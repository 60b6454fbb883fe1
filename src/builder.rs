//! Fluent builder for dataset pipelines.
//!
//! # Quick Start
//!
//! ```
//! use labelled_image::builder::DatasetBuilder;
//! use labelled_image::transform::ImageStrategy;
//!
//! let pipeline = DatasetBuilder::new("Close")
//!     .windows(3, 14)
//!     .strategy(ImageStrategy::Rp)
//!     .strategy(ImageStrategy::Gasf)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(pipeline.config().strategies.len(), 2);
//! ```
//!
//! # Common Configurations
//!
//! ## Padded recurrence plot next to angular fields
//!
//! ```
//! # use labelled_image::builder::DatasetBuilder;
//! let pipeline = DatasetBuilder::new("Close")
//!     .windows(5, 20)
//!     .strategy_names(["RP", "GASF", "GADF"])
//!     .unwrap()
//!     .rp_padding(1)
//!     .pad_to_largest()
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Returns basis with a Markov transition field
//!
//! ```
//! # use labelled_image::builder::DatasetBuilder;
//! # use labelled_image::transform::ImageStrategy;
//! let config = DatasetBuilder::new("Close")
//!     .windows(3, 10)
//!     .strategy(ImageStrategy::Mtf)
//!     .num_bin(4)
//!     .use_returns(true)
//!     .build_config()
//!     .unwrap();
//! ```

use crate::alignment::Basis;
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::labeling::{Labeler, LocalExtremaLabeler};
use crate::pipeline::LabelledImagePipeline;
use crate::stacking::ChannelPolicy;
use crate::transform::{parse_strategies, ImageStrategy};

/// Fluent builder for a [`LabelledImagePipeline`].
///
/// Strategies accumulate in call order, which is the channel order of the
/// stacked output.
pub struct DatasetBuilder {
    config: DatasetConfig,
    labeler: Box<dyn Labeler>,
}

impl DatasetBuilder {
    /// Start a builder for `column` with default parameters and no strategy.
    pub fn new(column: &str) -> Self {
        Self {
            config: DatasetConfig {
                column: column.to_string(),
                strategies: Vec::new(),
                ..Default::default()
            },
            labeler: Box::new(LocalExtremaLabeler),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: DatasetConfig) -> Self {
        Self {
            config,
            labeler: Box::new(LocalExtremaLabeler),
        }
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Set label window (L) and image window (W).
    pub fn windows(mut self, label_window: usize, image_window: usize) -> Self {
        self.config.label_window = label_window;
        self.config.image_window = image_window;
        self
    }

    /// Set the label window (L).
    pub fn label_window(mut self, size: usize) -> Self {
        self.config.label_window = size;
        self
    }

    /// Set the image window (W).
    pub fn image_window(mut self, size: usize) -> Self {
        self.config.image_window = size;
        self
    }

    // =========================================================================
    // Strategies
    // =========================================================================

    /// Append one strategy.
    pub fn strategy(mut self, strategy: ImageStrategy) -> Self {
        self.config.strategies.push(strategy);
        self
    }

    /// Replace the strategy list.
    pub fn strategies(mut self, strategies: Vec<ImageStrategy>) -> Self {
        self.config.strategies = strategies;
        self
    }

    /// Replace the strategy list from names (tags or long names).
    pub fn strategy_names<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.strategies = parse_strategies(names)?;
        Ok(self)
    }

    /// MTF quantile bin count.
    pub fn num_bin(mut self, num_bin: usize) -> Self {
        self.config.num_bin = num_bin;
        self
    }

    /// RP zero padding.
    pub fn rp_padding(mut self, padding: usize) -> Self {
        self.config.rp_padding = padding;
        self
    }

    /// Standardise RP output.
    pub fn standardize_rp(mut self, enabled: bool) -> Self {
        self.config.standardize_rp = enabled;
        self
    }

    /// Standardise GASF output.
    pub fn standardize_gasf(mut self, enabled: bool) -> Self {
        self.config.standardize_gasf = enabled;
        self
    }

    /// Standardise GADF output.
    pub fn standardize_gadf(mut self, enabled: bool) -> Self {
        self.config.standardize_gadf = enabled;
        self
    }

    // =========================================================================
    // Basis / Stacking / Labeler
    // =========================================================================

    /// Image one-step returns instead of raw values.
    pub fn use_returns(mut self, enabled: bool) -> Self {
        self.config.basis = Basis::from_use_returns(enabled);
        self
    }

    /// Set the imaging basis.
    pub fn basis(mut self, basis: Basis) -> Self {
        self.config.basis = basis;
        self
    }

    /// Set the channel policy.
    pub fn channel_policy(mut self, policy: ChannelPolicy) -> Self {
        self.config.channel_policy = policy;
        self
    }

    /// Shorthand for [`ChannelPolicy::PadToLargest`].
    pub fn pad_to_largest(self) -> Self {
        self.channel_policy(ChannelPolicy::PadToLargest)
    }

    /// Replace the default [`LocalExtremaLabeler`].
    pub fn labeler<L: Labeler + 'static>(mut self, labeler: L) -> Self {
        self.labeler = Box::new(labeler);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Validate and return the configuration.
    pub fn build_config(self) -> Result<DatasetConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validate and return a ready-to-use pipeline.
    pub fn build(self) -> Result<LabelledImagePipeline> {
        self.config.validate()?;
        Ok(LabelledImagePipeline::with_labeler(self.config, self.labeler))
    }

    /// Get a summary of the current configuration.
    pub fn summary(&self) -> String {
        let strategies: Vec<&str> = self.config.strategies.iter().map(|s| s.tag()).collect();
        format!(
            "DatasetBuilder Summary:\n\
             - Column: {}\n\
             - Label window: {}\n\
             - Image window: {}\n\
             - Strategies: [{}]\n\
             - Basis: {}\n\
             - Channel policy: {:?}\n\
             - Labeler: {}",
            self.config.column,
            self.config.label_window,
            self.config.image_window,
            strategies.join(", "),
            self.config.basis,
            self.config.channel_policy,
            self.labeler.name(),
        )
    }
}
