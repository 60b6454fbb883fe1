//! Trading-action labels for supervised image classification.
//!
//! Labeling turns a raw price series into one classification target per
//! timestamp: **Sell** at local maxima, **Buy** at local minima, **Hold**
//! everywhere else.
//!
//! # Components
//!
//! - [`Labeler`]: adapter seam. Any labelling algorithm can be plugged into the
//!   pipeline by implementing it.
//! - [`LocalExtremaLabeler`]: default adapter using a centred window of odd size.
//! - [`LabelEncoder`]: one-hot encoding in the fixed (Sell, Buy, Hold) column order.
//!
//! # Adapter Contract
//!
//! A labeler returns a [`LabeledSeries`] with exactly one [`LabeledRecord`] per
//! input value. Record labels are category *names*; the encoder rejects any name
//! outside `{"Sell", "Buy", "Hold"}` as a contract violation.
//!
//! # Example
//!
//! ```
//! use labelled_image::labeling::{Labeler, LocalExtremaLabeler, TradeAction};
//!
//! let prices = [3.0, 1.0, 2.0, 5.0, 4.0];
//! let labelled = LocalExtremaLabeler.label(&prices, 3).unwrap();
//!
//! assert_eq!(labelled.records[1].label, TradeAction::Buy.name());
//! assert_eq!(labelled.records[3].label, TradeAction::Sell.name());
//! ```

pub mod encoder;
pub mod local_extrema;

pub use encoder::{LabelEncoder, LabelNameMap, OneHotLabels, CANONICAL_ORDER};
pub use local_extrema::LocalExtremaLabeler;

use crate::error::{ImagingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Core Types
// ============================================================================

/// Trading action implied by a timestamp's position in its label window.
///
/// The discriminants follow the canonical one-hot column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeAction {
    /// Local maximum: sell here.
    Sell = 0,

    /// Local minimum: buy here.
    Buy = 1,

    /// Neither extremum.
    Hold = 2,
}

impl TradeAction {
    /// Column index in the one-hot encoding.
    ///
    /// Returns: 0 (Sell), 1 (Buy), 2 (Hold)
    #[inline]
    pub fn as_class_index(&self) -> usize {
        *self as usize
    }

    /// Create from a one-hot column index.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(TradeAction::Sell),
            1 => Some(TradeAction::Buy),
            2 => Some(TradeAction::Hold),
            _ => None,
        }
    }

    /// Category name as emitted by labelers.
    pub fn name(&self) -> &'static str {
        match self {
            TradeAction::Sell => "Sell",
            TradeAction::Buy => "Buy",
            TradeAction::Hold => "Hold",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TradeAction {
    type Err = ImagingError;

    /// Exact match on the category name.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Sell" => Ok(TradeAction::Sell),
            "Buy" => Ok(TradeAction::Buy),
            "Hold" => Ok(TradeAction::Hold),
            other => Err(ImagingError::UnknownLabel(other.to_string())),
        }
    }
}

/// One row of the labelled series table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Position in the original series.
    pub index: usize,

    /// Original series value at `index`.
    pub value: f64,

    /// Category name assigned by the labeler.
    pub label: String,

    /// Ancillary fields emitted by the labeler. Opaque to the pipeline.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

impl LabeledRecord {
    /// Record with no ancillary fields.
    pub fn new(index: usize, value: f64, label: impl Into<String>) -> Self {
        Self {
            index,
            value,
            label: label.into(),
            extras: BTreeMap::new(),
        }
    }
}

/// Labeler output: the labelled table plus the parameters it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    /// One record per input value, in series order.
    pub records: Vec<LabeledRecord>,

    /// Label window size used.
    pub window_size: usize,

    /// Copy of the series the labels were computed on.
    pub original: Vec<f64>,
}

impl LabeledSeries {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Series values column.
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    /// Label column as raw category names.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.label.as_str())
    }
}

/// Adapter seam for labelling algorithms.
///
/// Implementations must return exactly one record per input value and must
/// not mutate the input.
pub trait Labeler: Send + Sync {
    /// Label every timestamp of `series` using a centred window of `window_size`.
    fn label(&self, series: &[f64], window_size: usize) -> Result<LabeledSeries>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

// ============================================================================
// Label Statistics
// ============================================================================

/// Class distribution of a label sequence.
///
/// # Example
///
/// ```
/// use labelled_image::labeling::{LabelStats, TradeAction};
///
/// let stats = LabelStats::from_actions(&[
///     TradeAction::Buy,
///     TradeAction::Hold,
///     TradeAction::Hold,
///     TradeAction::Sell,
/// ]);
///
/// assert_eq!(stats.total, 4);
/// assert_eq!(stats.majority_class(), TradeAction::Hold);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Total number of labels
    pub total: usize,

    /// Number of Sell labels
    pub sell_count: usize,

    /// Number of Buy labels
    pub buy_count: usize,

    /// Number of Hold labels
    pub hold_count: usize,
}

impl LabelStats {
    /// Count the classes in `actions`.
    pub fn from_actions(actions: &[TradeAction]) -> Self {
        let mut stats = LabelStats {
            total: actions.len(),
            ..Default::default()
        };
        for action in actions {
            match action {
                TradeAction::Sell => stats.sell_count += 1,
                TradeAction::Buy => stats.buy_count += 1,
                TradeAction::Hold => stats.hold_count += 1,
            }
        }
        stats
    }

    /// Returns (sell_percentage, buy_percentage, hold_percentage) in [0.0, 1.0].
    pub fn class_balance(&self) -> (f64, f64, f64) {
        if self.total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let total = self.total as f64;
        (
            self.sell_count as f64 / total,
            self.buy_count as f64 / total,
            self.hold_count as f64 / total,
        )
    }

    /// Check if any class is severely underrepresented (< 10%).
    pub fn has_minority_class(&self) -> bool {
        if self.total == 0 {
            return true;
        }
        let (sell, buy, hold) = self.class_balance();
        sell < 0.1 || buy < 0.1 || hold < 0.1
    }

    /// Most frequent class. Ties resolve in canonical order.
    pub fn majority_class(&self) -> TradeAction {
        let counts = [self.sell_count, self.buy_count, self.hold_count];
        let best = counts
            .iter()
            .enumerate()
            .fold(0, |best, (idx, &c)| if c > counts[best] { idx } else { best });
        TradeAction::from_class_index(best).unwrap_or(TradeAction::Hold)
    }

    /// Counts keyed by category name.
    pub fn distribution(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            ("Sell".to_string(), self.sell_count),
            ("Buy".to_string(), self.buy_count),
            ("Hold".to_string(), self.hold_count),
        ])
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
