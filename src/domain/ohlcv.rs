//! OHLCV bar representation and the validated daily price series.

use chrono::NaiveDate;

use super::error::ConfluenceError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// A bar carrying only a closing price; open/high/low mirror the close.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        OhlcvBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Ordered daily bars for a single instrument.
///
/// Construction guarantees the series is non-empty, strictly increasing in
/// date, and every close is finite and positive. Immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, ConfluenceError> {
        if bars.is_empty() {
            return Err(ConfluenceError::MalformedData {
                reason: "price series is empty".into(),
            });
        }

        for window in bars.windows(2) {
            if window[1].date <= window[0].date {
                return Err(ConfluenceError::MalformedData {
                    reason: format!(
                        "dates not strictly increasing at {} (after {})",
                        window[1].date, window[0].date
                    ),
                });
            }
        }

        if let Some(bad) = bars.iter().find(|b| !b.close.is_finite() || b.close <= 0.0) {
            return Err(ConfluenceError::MalformedData {
                reason: format!("non-positive close {} on {}", bad.close, bad.date),
            });
        }

        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &OhlcvBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &OhlcvBar {
        &self.bars[self.bars.len() - 1]
    }
}
