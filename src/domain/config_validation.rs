//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use crate::domain::error::ConfluenceError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    validate_symbol(config)?;
    validate_initial_capital(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    for (key, min) in [("fast_ma", 1), ("slow_ma", 1), ("bollinger", 2), ("rsi", 1)] {
        validate_window(config, key, min)?;
    }
    validate_bollinger_mult(config)?;
    validate_rsi_thresholds(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ConfluenceError {
    ConfluenceError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid("backtest", "symbol", "symbol must not be empty")),
        None => Err(ConfluenceError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    let value = config.get_double("backtest", "initial_capital", 10_000.0)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub(crate) fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ConfluenceError> {
    match value {
        None => Err(ConfluenceError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            ConfluenceError::ConfigInvalid {
                section: "backtest".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

/// Bollinger needs two closes per window for a sample stddev.
fn validate_window(config: &dyn ConfigPort, key: &str, min: i64) -> Result<(), ConfluenceError> {
    let value = config.get_int("indicators", key, min)?;
    if value < min {
        return Err(invalid(
            "indicators",
            key,
            &format!("{} must be at least {}", key, min),
        ));
    }
    Ok(())
}

fn validate_bollinger_mult(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    let value = config.get_double("indicators", "bollinger_mult", 2.0)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "indicators",
            "bollinger_mult",
            "bollinger_mult must be positive",
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), ConfluenceError> {
    let oversold = config.get_double("signals", "rsi_oversold", 30.0)?;
    let overbought = config.get_double("signals", "rsi_overbought", 70.0)?;

    if !(0.0..=100.0).contains(&oversold) {
        return Err(invalid(
            "signals",
            "rsi_oversold",
            "rsi_oversold must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "signals",
            "rsi_overbought",
            "rsi_overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(invalid(
            "signals",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID: &str = r#"
[backtest]
symbol = SPY
start_date = 2015-01-01
end_date = 2023-01-01
initial_capital = 10000

[indicators]
fast_ma = 50
slow_ma = 200
bollinger = 20
bollinger_mult = 2.0
rsi = 14

[signals]
rsi_oversold = 30
rsi_overbought = 70
"#;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn with_replaced(from: &str, to: &str) -> FileConfigAdapter {
        adapter(&VALID.replace(from, to))
    }

    #[test]
    fn valid_config_passes() {
        let config = adapter(VALID);
        assert!(validate_backtest_config(&config).is_ok());
        assert!(validate_indicator_config(&config).is_ok());
    }

    #[test]
    fn indicator_sections_are_optional() {
        let config = adapter("[backtest]\nsymbol = SPY\nstart_date = 2015-01-01\nend_date = 2016-01-01\n");
        assert!(validate_backtest_config(&config).is_ok());
        assert!(validate_indicator_config(&config).is_ok());
    }

    #[test]
    fn missing_symbol() {
        let config = with_replaced("symbol = SPY\n", "");
        assert!(matches!(
            validate_backtest_config(&config),
            Err(ConfluenceError::ConfigMissing { key, .. }) if key == "symbol"
        ));
    }

    #[test]
    fn non_positive_capital() {
        let config = with_replaced("initial_capital = 10000", "initial_capital = 0");
        assert!(matches!(
            validate_backtest_config(&config),
            Err(ConfluenceError::ConfigInvalid { key, .. }) if key == "initial_capital"
        ));
    }

    #[test]
    fn start_after_end() {
        let config = with_replaced("start_date = 2015-01-01", "start_date = 2024-01-01");
        assert!(validate_backtest_config(&config).is_err());
    }

    #[test]
    fn bad_date_format() {
        let config = with_replaced("end_date = 2023-01-01", "end_date = 01/01/2023");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(err.to_string().contains("end_date"));
    }

    #[test]
    fn missing_date() {
        let config = with_replaced("start_date = 2015-01-01\n", "");
        assert!(matches!(
            validate_backtest_config(&config),
            Err(ConfluenceError::ConfigMissing { key, .. }) if key == "start_date"
        ));
    }

    #[test]
    fn zero_window() {
        let config = with_replaced("rsi = 14", "rsi = 0");
        assert!(matches!(
            validate_indicator_config(&config),
            Err(ConfluenceError::ConfigInvalid { key, .. }) if key == "rsi"
        ));
    }

    #[test]
    fn non_positive_bollinger_mult() {
        let config = with_replaced("bollinger_mult = 2.0", "bollinger_mult = -1");
        assert!(validate_indicator_config(&config).is_err());
    }

    #[test]
    fn thresholds_out_of_order() {
        let config = with_replaced("rsi_oversold = 30", "rsi_oversold = 80");
        assert!(matches!(
            validate_indicator_config(&config),
            Err(ConfluenceError::ConfigInvalid { key, .. }) if key == "rsi_oversold"
        ));
    }

    #[test]
    fn thresholds_out_of_range() {
        let config = with_replaced("rsi_overbought = 70", "rsi_overbought = 170");
        assert!(validate_indicator_config(&config).is_err());
    }

    #[test]
    fn bollinger_window_of_one_has_no_bands() {
        let config = with_replaced("bollinger = 20", "bollinger = 1");
        assert!(matches!(
            validate_indicator_config(&config),
            Err(ConfluenceError::ConfigInvalid { key, reason, .. })
                if key == "bollinger" && reason.contains("at least 2")
        ));
        let config = with_replaced("bollinger = 20", "bollinger = 2");
        assert!(validate_indicator_config(&config).is_ok());
    }

    #[test]
    fn typo_in_capital_is_rejected() {
        let config = with_replaced("initial_capital = 10000", "initial_capital = 1o000");
        assert!(matches!(
            validate_backtest_config(&config),
            Err(ConfluenceError::ConfigInvalid { key, reason, .. })
                if key == "initial_capital" && reason.contains("not a number")
        ));
    }

    #[test]
    fn typo_in_any_numeric_indicator_key_is_rejected() {
        let cases = [
            ("fast_ma = 50", "fast_ma = 5O", "fast_ma"),
            ("slow_ma = 200", "slow_ma = 2OO", "slow_ma"),
            ("bollinger = 20", "bollinger = twenty", "bollinger"),
            ("rsi = 14", "rsi = 14.5", "rsi"),
            ("bollinger_mult = 2.0", "bollinger_mult = 2,0", "bollinger_mult"),
            ("rsi_oversold = 30", "rsi_oversold = 3O", "rsi_oversold"),
            ("rsi_overbought = 70", "rsi_overbought = 7O", "rsi_overbought"),
        ];
        for (from, to, expected) in cases {
            let config = with_replaced(from, to);
            match validate_indicator_config(&config) {
                Err(ConfluenceError::ConfigInvalid { key, reason, .. }) => {
                    assert_eq!(key, expected, "{to}");
                    assert!(reason.contains("not a number"), "{to}: {reason}");
                }
                other => panic!("{to}: expected ConfigInvalid, got {other:?}"),
            }
        }
    }
}
