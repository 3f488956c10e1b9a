//! Portfolio state and equity tracking.
//!
//! `SimulationState` is either fully in cash or fully invested; the enum makes
//! a partially sized portfolio unrepresentable.

use chrono::NaiveDate;

use super::position::{ClosedTrade, Position};
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Equity values of a series, in order.
pub fn equity_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.equity).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationState {
    Flat { cash: f64 },
    Invested(Position),
}

/// What a single step did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Entered(Position),
    Exited(ClosedTrade),
}

impl SimulationState {
    pub fn new(initial_capital: f64) -> Self {
        SimulationState::Flat {
            cash: initial_capital,
        }
    }

    pub fn cash_balance(&self) -> f64 {
        match self {
            SimulationState::Flat { cash } => *cash,
            SimulationState::Invested(_) => 0.0,
        }
    }

    pub fn share_count(&self) -> f64 {
        match self {
            SimulationState::Flat { .. } => 0.0,
            SimulationState::Invested(position) => position.shares,
        }
    }

    pub fn is_invested(&self) -> bool {
        matches!(self, SimulationState::Invested(_))
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            SimulationState::Flat { .. } => None,
            SimulationState::Invested(position) => Some(position),
        }
    }

    /// Mark-to-market value at `price`.
    pub fn total_equity(&self, price: f64) -> f64 {
        match self {
            SimulationState::Flat { cash } => *cash,
            SimulationState::Invested(position) => position.market_value(price),
        }
    }

    /// Apply one timestamp's signal at its close.
    ///
    /// Buy is checked before sell: a flat state only reacts to buy, an
    /// invested state only to sell, so at most one transition happens.
    pub fn step(self, date: NaiveDate, close: f64, signal: Signal) -> (Self, Option<Transition>) {
        match self {
            SimulationState::Flat { cash } if signal.buy => {
                let position = Position {
                    entry_date: date,
                    entry_price: close,
                    shares: cash / close,
                };
                (
                    SimulationState::Invested(position),
                    Some(Transition::Entered(position)),
                )
            }
            SimulationState::Invested(position) if signal.sell => {
                let trade = position.close(date, close);
                let cash = position.market_value(close);
                (SimulationState::Flat { cash }, Some(Transition::Exited(trade)))
            }
            state => (state, None),
        }
    }
}
