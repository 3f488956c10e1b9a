//! Open position and closed trade records.

use chrono::NaiveDate;

/// A fully-invested long holding. Shares are fractional: the whole cash
/// balance is converted at the entry close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares * (price - self.entry_price)
    }

    pub fn close(self, exit_date: NaiveDate, exit_price: f64) -> ClosedTrade {
        ClosedTrade {
            entry_date: self.entry_date,
            exit_date,
            entry_price: self.entry_price,
            exit_price,
            shares: self.shares,
            pnl: self.unrealized_pnl(exit_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: f64,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn return_pct(&self) -> f64 {
        (self.exit_price - self.entry_price) / self.entry_price * 100.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
