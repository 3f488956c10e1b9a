//! Single-position strategy simulation.
//!
//! A strict forward fold of `SimulationState::step` over the price series.
//! The equity curve is the fold's trace: one point per bar, appended after
//! that bar's transition check.

use chrono::NaiveDate;

use super::ohlcv::OhlcvBar;
use super::portfolio::{EquityPoint, SimulationState, Transition};
use super::position::ClosedTrade;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// A state transition as executed at a bar's close.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub date: NaiveDate,
    pub side: Side,
    pub price: f64,
    pub shares: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub initial_capital: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub fills: Vec<Fill>,
    pub closed_trades: Vec<ClosedTrade>,
    pub final_state: SimulationState,
}

impl SimulationResult {
    pub fn trade_count(&self) -> usize {
        self.fills.len()
    }
}

/// Walk `bars` in order, applying the aligned `signals`.
///
/// `signals` must be the same length as `bars`; any excess on either side is ignored.
pub fn simulate(bars: &[OhlcvBar], signals: &[Signal], initial_capital: f64) -> SimulationResult {
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut fills = Vec::new();
    let mut closed_trades = Vec::new();

    let final_state = bars.iter().zip(signals).fold(
        SimulationState::new(initial_capital),
        |state, (bar, &signal)| {
            let (next, transition) = state.step(bar.date, bar.close, signal);

            match transition {
                Some(Transition::Entered(position)) => {
                    tracing::debug!(
                        date = %bar.date,
                        price = bar.close,
                        shares = position.shares,
                        "entered position"
                    );
                    fills.push(Fill {
                        date: bar.date,
                        side: Side::Buy,
                        price: bar.close,
                        shares: position.shares,
                    });
                }
                Some(Transition::Exited(trade)) => {
                    tracing::debug!(
                        date = %bar.date,
                        price = bar.close,
                        pnl = trade.pnl,
                        "exited position"
                    );
                    fills.push(Fill {
                        date: bar.date,
                        side: Side::Sell,
                        price: bar.close,
                        shares: trade.shares,
                    });
                    closed_trades.push(trade);
                }
                None => {}
            }

            equity_curve.push(EquityPoint {
                date: bar.date,
                equity: next.total_equity(bar.close),
            });
            next
        },
    );

    SimulationResult {
        initial_capital,
        equity_curve,
        fills,
        closed_trades,
        final_state,
    }
}
