//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod simulation;
pub mod baseline;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
