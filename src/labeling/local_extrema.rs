//! Local minimum / maximum labelling.
//!
//! For every timestamp `t` with a complete centred window
//! `[t - h, t + h]` (`h = floor(L / 2)`):
//!
//! ```text
//! value[t] == max(window) and window not constant  → Sell
//! value[t] == min(window) and window not constant  → Buy
//! otherwise                                        → Hold
//! ```
//!
//! The first and last `h` timestamps have no complete window and are labelled
//! Hold. The alignment engine never selects them.

use super::{LabeledRecord, LabeledSeries, Labeler, TradeAction};
use crate::error::{ImagingError, Result};

/// Default labeler: centred local extrema.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExtremaLabeler;

impl LocalExtremaLabeler {
    fn classify(value: f64, min: f64, max: f64) -> TradeAction {
        if min == max {
            TradeAction::Hold
        } else if value == max {
            TradeAction::Sell
        } else if value == min {
            TradeAction::Buy
        } else {
            TradeAction::Hold
        }
    }
}

impl Labeler for LocalExtremaLabeler {
    fn label(&self, series: &[f64], window_size: usize) -> Result<LabeledSeries> {
        if window_size == 0 || window_size % 2 == 0 {
            return Err(ImagingError::InvalidLabelWindow(window_size));
        }
        if window_size > series.len() {
            return Err(ImagingError::LabelWindowExceedsSeries {
                label_window: window_size,
                series_len: series.len(),
            });
        }

        let half = window_size / 2;
        let n = series.len();

        let records = series
            .iter()
            .enumerate()
            .map(|(t, &value)| {
                if t < half || t + half >= n {
                    return LabeledRecord::new(t, value, TradeAction::Hold.name());
                }

                let window = &series[t - half..=t + half];
                let min = window.iter().copied().fold(f64::INFINITY, f64::min);
                let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

                let mut record =
                    LabeledRecord::new(t, value, Self::classify(value, min, max).name());
                record.extras.insert("window_min".to_string(), min);
                record.extras.insert("window_max".to_string(), max);
                record
            })
            .collect();

        Ok(LabeledSeries {
            records,
            window_size,
            original: series.to_vec(),
        })
    }

    fn name(&self) -> &str {
        "local_extrema"
    }
}
