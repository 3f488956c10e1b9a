//! Buy-and-hold baseline.

use super::ohlcv::OhlcvBar;
use super::portfolio::EquityPoint;

/// Invest everything at the first close and hold to the end.
pub fn buy_and_hold(bars: &[OhlcvBar], initial_capital: f64) -> Vec<EquityPoint> {
    let Some(first) = bars.first() else {
        return Vec::new();
    };
    let shares = initial_capital / first.close;

    bars.iter()
        .map(|bar| EquityPoint {
            date: bar.date,
            equity: shares * bar.close,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::from_close(start + chrono::Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn empty_input() {
        assert!(buy_and_hold(&[], 10_000.0).is_empty());
    }

    #[test]
    fn first_value_is_initial_capital() {
        let curve = buy_and_hold(&bars(&[37.0, 40.0]), 10_000.0);
        assert_relative_eq!(curve[0].equity, 10_000.0, max_relative = 1e-12);
    }

    #[test]
    fn scales_with_close() {
        let closes: Vec<f64> = (0..50).map(|i| 20.0 + i as f64 * 1.5).collect();
        let curve = buy_and_hold(&bars(&closes), 10_000.0);

        assert_eq!(curve.len(), closes.len());
        for (point, close) in curve.iter().zip(&closes) {
            assert_relative_eq!(point.equity, 10_000.0 / 20.0 * close, max_relative = 1e-12);
        }
    }
}
