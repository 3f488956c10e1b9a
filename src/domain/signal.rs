//! Buy/sell signal generation.
//!
//! Each timestamp is evaluated against its own indicator snapshot only:
//! - Buy:  fast MA above slow MA, RSI below oversold, close below lower band
//! - Sell: fast MA below slow MA, RSI above overbought, close above upper band
//!
//! A conjunction with any undefined operand is false.

use crate::domain::indicator::{IndicatorSet, IndicatorSnapshot};

/// RSI thresholds for the entry and exit conjunctions.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRules {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalRules {
    fn default() -> Self {
        SignalRules {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signal {
    pub buy: bool,
    pub sell: bool,
}

pub fn evaluate(close: f64, snapshot: &IndicatorSnapshot, rules: &SignalRules) -> Signal {
    let buy = matches!(
        (snapshot.fast_ma, snapshot.slow_ma, snapshot.rsi, snapshot.lower_band),
        (Some(fast), Some(slow), Some(rsi), Some(lower))
            if fast > slow && rsi < rules.rsi_oversold && close < lower
    );
    let sell = matches!(
        (snapshot.fast_ma, snapshot.slow_ma, snapshot.rsi, snapshot.upper_band),
        (Some(fast), Some(slow), Some(rsi), Some(upper))
            if fast < slow && rsi > rules.rsi_overbought && close > upper
    );
    Signal { buy, sell }
}

/// One signal per close, aligned with `indicators`.
pub fn generate_signals(closes: &[f64], indicators: &IndicatorSet, rules: &SignalRules) -> Vec<Signal> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| evaluate(close, &indicators.at(i), rules))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorParams;
    use proptest::prelude::*;

    fn snapshot(fast: f64, slow: f64, rsi: f64, upper: f64, lower: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            fast_ma: Some(fast),
            slow_ma: Some(slow),
            rsi: Some(rsi),
            upper_band: Some(upper),
            lower_band: Some(lower),
        }
    }

    #[test]
    fn buy_when_all_conditions_hold() {
        let snap = snapshot(110.0, 100.0, 25.0, 120.0, 95.0);
        let signal = evaluate(90.0, &snap, &SignalRules::default());
        assert!(signal.buy);
        assert!(!signal.sell);
    }

    #[test]
    fn no_buy_when_one_condition_fails() {
        let rules = SignalRules::default();
        // trend down
        assert!(!evaluate(90.0, &snapshot(99.0, 100.0, 25.0, 120.0, 95.0), &rules).buy);
        // RSI not oversold
        assert!(!evaluate(90.0, &snapshot(110.0, 100.0, 30.0, 120.0, 95.0), &rules).buy);
        // close at lower band, not below
        assert!(!evaluate(95.0, &snapshot(110.0, 100.0, 25.0, 120.0, 95.0), &rules).buy);
    }

    #[test]
    fn sell_when_all_conditions_hold() {
        let snap = snapshot(90.0, 100.0, 75.0, 120.0, 80.0);
        let signal = evaluate(125.0, &snap, &SignalRules::default());
        assert!(signal.sell);
        assert!(!signal.buy);
    }

    #[test]
    fn no_sell_when_rsi_at_threshold() {
        let snap = snapshot(90.0, 100.0, 70.0, 120.0, 80.0);
        assert!(!evaluate(125.0, &snap, &SignalRules::default()).sell);
    }

    #[test]
    fn undefined_operand_disables_signal() {
        let mut snap = snapshot(110.0, 100.0, 25.0, 120.0, 95.0);
        snap.slow_ma = None;
        assert_eq!(evaluate(90.0, &snap, &SignalRules::default()), Signal::default());

        let mut snap = snapshot(90.0, 100.0, 75.0, 120.0, 80.0);
        snap.upper_band = None;
        assert_eq!(evaluate(125.0, &snap, &SignalRules::default()), Signal::default());
    }

    #[test]
    fn custom_thresholds() {
        let rules = SignalRules {
            rsi_oversold: 40.0,
            rsi_overbought: 60.0,
        };
        assert!(evaluate(90.0, &snapshot(110.0, 100.0, 35.0, 120.0, 95.0), &rules).buy);
        assert!(evaluate(125.0, &snapshot(90.0, 100.0, 65.0, 120.0, 80.0), &rules).sell);
    }

    #[test]
    fn short_series_yields_no_signals() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + (i as f64 * 0.7).sin() * 20.0).collect();
        let indicators = IndicatorSet::compute(&closes, &IndicatorParams::default());
        let signals = generate_signals(&closes, &indicators, &SignalRules::default());

        assert_eq!(signals.len(), 150);
        assert!(signals.iter().all(|s| !s.buy && !s.sell));
    }

    fn maybe_value() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![Just(None), (0.0f64..200.0).prop_map(Some)]
    }

    proptest! {
        #[test]
        fn buy_and_sell_never_both_true(
            close in 0.01f64..200.0,
            fast in maybe_value(),
            slow in maybe_value(),
            rsi in prop_oneof![Just(None), (0.0f64..=100.0).prop_map(Some)],
            upper in maybe_value(),
            lower in maybe_value(),
        ) {
            let snap = IndicatorSnapshot {
                fast_ma: fast,
                slow_ma: slow,
                rsi,
                upper_band: upper,
                lower_band: lower,
            };
            let signal = evaluate(close, &snap, &SignalRules::default());
            prop_assert!(!(signal.buy && signal.sell));
        }
    }
}
