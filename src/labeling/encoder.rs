//! One-hot label encoding with a fixed column order.
//!
//! Columns are always `(Sell, Buy, Hold)`, independent of which categories
//! occur in the input and of the order they first appear in. The order comes
//! from [`CANONICAL_ORDER`]; nothing is inferred from the data.
//!
//! # Example
//!
//! ```
//! use labelled_image::labeling::{LabelEncoder, TradeAction};
//!
//! let encoded = LabelEncoder::encode(["Hold", "Buy", "Hold"]).unwrap();
//!
//! assert_eq!(encoded.matrix.shape(), &[3, 3]);
//! assert_eq!(encoded.matrix.row(1).to_vec(), vec![0, 1, 0]);
//! assert_eq!(encoded.names.get(0), Some(TradeAction::Sell));
//! ```

use super::{LabelStats, TradeAction};
use crate::error::{ImagingError, Result};
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column order of every one-hot label matrix.
pub const CANONICAL_ORDER: [TradeAction; 3] =
    [TradeAction::Sell, TradeAction::Buy, TradeAction::Hold];

/// Mapping from one-hot column index to category.
///
/// Always built from [`CANONICAL_ORDER`], so it cannot disagree with the
/// matrix it accompanies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelNameMap(BTreeMap<usize, TradeAction>);

impl LabelNameMap {
    /// Map for [`CANONICAL_ORDER`].
    pub fn canonical() -> Self {
        Self(
            CANONICAL_ORDER
                .iter()
                .enumerate()
                .map(|(idx, action)| (idx, *action))
                .collect(),
        )
    }

    /// Category at column `index`.
    pub fn get(&self, index: usize) -> Option<TradeAction> {
        self.0.get(&index).copied()
    }

    /// Column holding `action`.
    pub fn index_of(&self, action: TradeAction) -> Option<usize> {
        self.0
            .iter()
            .find_map(|(idx, a)| (*a == action).then_some(*idx))
    }

    /// `(column, category)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, TradeAction)> + '_ {
        self.0.iter().map(|(idx, a)| (*idx, *a))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a canonical map.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column → name, for JSON metadata.
    pub fn to_names(&self) -> BTreeMap<usize, String> {
        self.iter()
            .map(|(idx, a)| (idx, a.name().to_string()))
            .collect()
    }
}

impl Default for LabelNameMap {
    fn default() -> Self {
        Self::canonical()
    }
}

/// One-hot encoded labels plus their column names.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotLabels {
    /// Shape (n, 3), exactly one `1` per row.
    pub matrix: Array2<u8>,

    /// Column → category.
    pub names: LabelNameMap,

    /// Decoded actions, one per row.
    pub actions: Vec<TradeAction>,
}

impl OneHotLabels {
    /// Number of encoded labels.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True if no labels were encoded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Rows `[start, end)` as a new, independently owned encoding.
    pub fn slice(&self, start: usize, end: usize) -> OneHotLabels {
        OneHotLabels {
            matrix: self.matrix.slice(s![start..end, ..]).to_owned(),
            names: self.names.clone(),
            actions: self.actions[start..end].to_vec(),
        }
    }

    /// Class counts.
    pub fn stats(&self) -> LabelStats {
        LabelStats::from_actions(&self.actions)
    }
}

/// Converts labeler category names into [`OneHotLabels`].
pub struct LabelEncoder;

impl LabelEncoder {
    /// Encode category names in input order.
    ///
    /// # Errors
    ///
    /// [`ImagingError::LabelContract`] naming the first value outside
    /// `{Sell, Buy, Hold}` and its position.
    pub fn encode<I, S>(labels: I) -> Result<OneHotLabels>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let actions = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                label
                    .as_ref()
                    .parse::<TradeAction>()
                    .map_err(|_| ImagingError::LabelContract {
                        index,
                        label: label.as_ref().to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::encode_actions(&actions))
    }

    /// Encode already-typed actions.
    pub fn encode_actions(actions: &[TradeAction]) -> OneHotLabels {
        let names = LabelNameMap::canonical();
        let mut matrix = Array2::<u8>::zeros((actions.len(), CANONICAL_ORDER.len()));

        for (row, action) in actions.iter().enumerate() {
            // Column looked up through the name map, not the enum discriminant.
            if let Some(col) = names.index_of(*action) {
                matrix[[row, col]] = 1;
            }
        }

        OneHotLabels {
            matrix,
            names,
            actions: actions.to_vec(),
        }
    }
}
