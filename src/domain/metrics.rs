//! Performance metrics and statistics.
//!
//! All functions are pure and apply equally to the strategy and the
//! buy-and-hold equity curves.

use super::indicator::stddev::sample_stddev;
use super::portfolio::EquityPoint;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    /// `NaN` when the returns have zero variance or fewer than two samples.
    pub sharpe_ratio: f64,
    /// Non-positive fraction; 0 means the curve never fell below a prior peak.
    pub max_drawdown: f64,
}

impl PerformanceReport {
    pub fn compute(equity_curve: &[EquityPoint]) -> Self {
        let values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
        let returns = period_returns(&values);

        let (total_return, annualized_return) = match (values.first(), values.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => {
                let total = (last - first) / first;
                let years = values.len() as f64 / TRADING_DAYS_PER_YEAR;
                let annualized = if total.is_finite() {
                    (1.0 + total).powf(1.0 / years) - 1.0
                } else {
                    0.0
                };
                (total, annualized)
            }
            _ => (0.0, 0.0),
        };

        PerformanceReport {
            total_return,
            annualized_return,
            sharpe_ratio: sharpe_ratio(&returns),
            max_drawdown: max_drawdown(&returns),
        }
    }
}

/// Simple returns between consecutive values; the first value has none.
pub fn period_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| {
            let prev = w[0];
            let curr = w[1];
            if prev > 0.0 {
                (curr - prev) / prev
            } else {
                0.0
            }
        })
        .collect()
}

/// Annualized Sharpe ratio with no risk-free adjustment:
/// mean / sample stddev * sqrt(252).
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return f64::NAN;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let stddev = sample_stddev(returns);

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        f64::NAN
    }
}

/// Deepest fall of cumulative growth below its running peak, as a
/// non-positive fraction.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut growth = 1.0_f64;
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for r in returns {
        growth *= 1.0 + r;
        peak = peak.max(growth);
        if peak > 0.0 {
            let dd = (growth - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn make_equity_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                equity: v,
            })
            .collect()
    }

    #[test]
    fn returns_skip_first_value() {
        let returns = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert_abs_diff_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(returns[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn returns_guard_zero_previous() {
        assert_eq!(period_returns(&[0.0, 10.0]), vec![0.0]);
    }

    #[test]
    fn sharpe_known_value() {
        let returns = [0.01, 0.02, 0.03];
        // mean 0.02, sample stddev 0.01
        let expected = 2.0 * TRADING_DAYS_PER_YEAR.sqrt();
        assert_abs_diff_eq!(sharpe_ratio(&returns), expected, epsilon = 1e-9);
    }

    #[test]
    fn sharpe_zero_variance_is_nan() {
        assert!(sharpe_ratio(&[0.0, 0.0, 0.0]).is_nan());
        assert!(sharpe_ratio(&[0.01, 0.01]).is_nan());
    }

    #[test]
    fn sharpe_too_few_returns_is_nan() {
        assert!(sharpe_ratio(&[]).is_nan());
        assert!(sharpe_ratio(&[0.05]).is_nan());
    }

    #[test]
    fn sharpe_negative_for_losing_curve() {
        let returns = period_returns(&[100.0, 95.0, 97.0, 90.0, 88.0]);
        assert!(sharpe_ratio(&returns) < 0.0);
    }

    #[test]
    fn drawdown_known_value() {
        let returns = period_returns(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]);
        let expected = (80.0 - 110.0) / 110.0;
        assert_abs_diff_eq!(max_drawdown(&returns), expected, epsilon = 1e-9);
    }

    #[test]
    fn drawdown_zero_for_non_decreasing_growth() {
        let returns = period_returns(&[100.0, 100.0, 105.0, 105.0, 120.0]);
        assert_eq!(max_drawdown(&returns), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn drawdown_peak_starts_at_first_growth_value() {
        // the first return is already a loss; the running peak starts there
        let returns = period_returns(&[100.0, 90.0, 95.0]);
        assert_eq!(max_drawdown(&returns), 0.0);
    }

    #[test]
    fn drawdown_never_positive() {
        let values: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 15.0)
            .collect();
        assert!(max_drawdown(&period_returns(&values)) <= 0.0);
    }

    #[test]
    fn report_constant_curve() {
        let report = PerformanceReport::compute(&make_equity_curve(&[10_000.0; 300]));

        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.annualized_return, 0.0);
        assert!(report.sharpe_ratio.is_nan());
        assert_eq!(report.max_drawdown, 0.0);
    }

    #[test]
    fn report_total_and_annualized_return() {
        let mut values = vec![100_000.0; 252];
        values[251] = 110_000.0;
        let report = PerformanceReport::compute(&make_equity_curve(&values));

        assert_abs_diff_eq!(report.total_return, 0.10, epsilon = 1e-9);
        // exactly one year of points
        assert_abs_diff_eq!(report.annualized_return, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn report_empty_curve() {
        let report = PerformanceReport::compute(&[]);
        assert_eq!(report.total_return, 0.0);
        assert!(report.sharpe_ratio.is_nan());
        assert_eq!(report.max_drawdown, 0.0);
    }

    #[test]
    fn report_sharpe_positive_for_rising_curve() {
        let values: Vec<f64> = (0..253)
            .map(|i| 100_000.0 * (1.0 + 0.001 * i as f64 + 0.0005 * (i % 3) as f64))
            .collect();
        let report = PerformanceReport::compute(&make_equity_curve(&values));
        assert!(report.sharpe_ratio > 0.0);
        assert!(report.max_drawdown <= 0.0);
    }
}
