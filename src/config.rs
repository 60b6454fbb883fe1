//! Dataset configuration management.
//!
//! [`DatasetConfig`] carries every parameter of one dataset build, with
//! serialization support for experiment reproducibility.
//!
//! # Features
//!
//! - **Serialization**: Save/load configurations to TOML or JSON
//! - **Validation**: Length-independent checks before any work is done
//! - **Defaults**: Optional fields may be omitted from configuration files
//!
//! # Example
//!
//! ```no_run
//! use labelled_image::config::DatasetConfig;
//! use labelled_image::transform::ImageStrategy;
//!
//! let config = DatasetConfig::new("Close", 3, 14, vec![ImageStrategy::Rp, ImageStrategy::Gasf]);
//! config.save_toml("experiment_config.toml")?;
//!
//! let loaded = DatasetConfig::load_toml("experiment_config.toml")?;
//! assert_eq!(loaded, config);
//! # Ok::<(), labelled_image::ImagingError>(())
//! ```
//!
//! A minimal TOML file only needs the required fields:
//!
//! ```toml
//! column = "Close"
//! label_window = 3
//! image_window = 14
//! strategies = ["RP", "angular-summation-field", "MTF"]
//! ```

use crate::alignment::Basis;
use crate::error::{ImagingError, Result};
use crate::stacking::ChannelPolicy;
use crate::transform::{ImageStrategy, TransformOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_num_bin() -> usize {
    5
}

/// Full parameter set for one labelled image dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Name of the series column to image and label.
    pub column: String,

    /// Label window size (L), odd.
    pub label_window: usize,

    /// Image window size (W).
    pub image_window: usize,

    /// Strategies in channel order.
    pub strategies: Vec<ImageStrategy>,

    /// Quantile bins for MTF.
    #[serde(default = "default_num_bin")]
    pub num_bin: usize,

    /// Zero padding appended to RP images.
    #[serde(default)]
    pub rp_padding: usize,

    /// Standardise RP images.
    #[serde(default)]
    pub standardize_rp: bool,

    /// Standardise GASF images.
    #[serde(default)]
    pub standardize_gasf: bool,

    /// Standardise GADF images.
    #[serde(default)]
    pub standardize_gadf: bool,

    /// Image the raw values or their one-step returns.
    #[serde(default)]
    pub basis: Basis,

    /// How mixed image sizes are stacked.
    #[serde(default)]
    pub channel_policy: ChannelPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            column: "Close".to_string(),
            label_window: 3,
            image_window: 14,
            strategies: vec![ImageStrategy::Gasf],
            num_bin: default_num_bin(),
            rp_padding: 0,
            standardize_rp: false,
            standardize_gasf: false,
            standardize_gadf: false,
            basis: Basis::Price,
            channel_policy: ChannelPolicy::Reject,
        }
    }
}

/// On-disk form of [`DatasetConfig`] with strategy names kept as text.
///
/// Names are resolved after parsing so an unknown strategy surfaces as
/// [`ImagingError::UnknownStrategy`] instead of a deserialization failure.
#[derive(Debug, Deserialize)]
struct RawDatasetConfig {
    column: String,
    label_window: usize,
    image_window: usize,
    strategies: Vec<String>,
    #[serde(default = "default_num_bin")]
    num_bin: usize,
    #[serde(default)]
    rp_padding: usize,
    #[serde(default)]
    standardize_rp: bool,
    #[serde(default)]
    standardize_gasf: bool,
    #[serde(default)]
    standardize_gadf: bool,
    #[serde(default)]
    basis: Basis,
    #[serde(default)]
    channel_policy: ChannelPolicy,
}

impl RawDatasetConfig {
    /// Resolve strategy names and validate the result.
    fn resolve(self) -> Result<DatasetConfig> {
        let strategies = self
            .strategies
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<ImageStrategy>>>()?;

        let config = DatasetConfig {
            column: self.column,
            label_window: self.label_window,
            image_window: self.image_window,
            strategies,
            num_bin: self.num_bin,
            rp_padding: self.rp_padding,
            standardize_rp: self.standardize_rp,
            standardize_gasf: self.standardize_gasf,
            standardize_gadf: self.standardize_gadf,
            basis: self.basis,
            channel_policy: self.channel_policy,
        };
        config.validate()?;
        Ok(config)
    }
}

impl DatasetConfig {
    /// Configuration with the required fields set and defaults elsewhere.
    pub fn new(
        column: impl Into<String>,
        label_window: usize,
        image_window: usize,
        strategies: Vec<ImageStrategy>,
    ) -> Self {
        Self {
            column: column.into(),
            label_window,
            image_window,
            strategies,
            ..Default::default()
        }
    }

    /// Options handed to the transform dispatcher.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            num_bin: self.num_bin,
            rp_padding: self.rp_padding,
            standardize_rp: self.standardize_rp,
            standardize_gasf: self.standardize_gasf,
            standardize_gadf: self.standardize_gadf,
        }
    }

    /// Validate everything that does not depend on the series length.
    ///
    /// Series-dependent checks (`L <= N`, `W` within the effective length)
    /// happen in [`Alignment::compute`](crate::alignment::Alignment::compute).
    pub fn validate(&self) -> Result<()> {
        if self.column.is_empty() {
            return Err(ImagingError::InvalidConfig(
                "column name must not be empty".to_string(),
            ));
        }
        if self.label_window == 0 || self.label_window % 2 == 0 {
            return Err(ImagingError::InvalidLabelWindow(self.label_window));
        }
        if self.image_window == 0 {
            return Err(ImagingError::InvalidImageWindow);
        }

        let required = self.label_window.div_ceil(2);
        if self.image_window < required {
            return Err(ImagingError::ImageWindowTooSmall {
                image_window: self.image_window,
                label_window: self.label_window,
                required,
            });
        }

        if self.strategies.is_empty() {
            return Err(ImagingError::EmptyStrategySet);
        }
        self.transform_options().validate_for(&self.strategies)
    }

    /// Save configuration to TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Load configuration from TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawDatasetConfig = toml::from_str(contents)?;
        raw.resolve()
    }

    /// Save configuration to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load configuration from JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let raw: RawDatasetConfig = serde_json::from_str(&contents)?;
        raw.resolve()
    }
}
