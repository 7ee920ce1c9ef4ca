//! Position tracking for the single open trade an engine instance manages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::Direction;

/// One open position. Created on a qualifying entry signal, mutated every
/// bar while open, destroyed on stop/target/reversal exit.
///
/// `trailing_sl` obeys the ratchet invariant: it only ever moves in the
/// position's favor. `trailing_tp` is recomputed each bar and may move
/// either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Direction,
    pub entry_price: f64,
    /// ATR at the entry bar, frozen for reference and initial placement.
    pub entry_atr: f64,
    pub entry_index: usize,
    pub entry_time: DateTime<Utc>,
    /// Initial stop-loss level, frozen at entry.
    pub stop_loss: f64,
    /// Initial take-profit level, frozen at entry.
    pub take_profit: f64,
    /// Active stop level (starts at `stop_loss`, ratchets favorably).
    pub trailing_sl: f64,
    /// Active target level (starts at `take_profit`, recomputed per bar).
    pub trailing_tp: f64,
    /// Running max (long) / min (short) of close since entry.
    pub best_price_since_entry: f64,
    /// Unrealized profit in percent of entry, from the latest close.
    pub profit_pct: f64,
    /// True once the adaptive trailing update has taken over the levels.
    pub trailing_active: bool,
}

impl Position {
    /// Open a position at the signal bar's close with precomputed initial
    /// stop/target levels.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        symbol: String,
        side: Direction,
        entry_price: f64,
        entry_atr: f64,
        entry_index: usize,
        entry_time: DateTime<Utc>,
        stop_loss: f64,
        take_profit: f64,
    ) -> Self {
        Self {
            symbol,
            side,
            entry_price,
            entry_atr,
            entry_index,
            entry_time,
            stop_loss,
            take_profit,
            trailing_sl: stop_loss,
            trailing_tp: take_profit,
            best_price_since_entry: entry_price,
            profit_pct: 0.0,
            trailing_active: false,
        }
    }

    pub fn is_long(&self) -> bool {
        self.side == Direction::Long
    }

    /// Fold a new close into the best-price watermark.
    pub fn update_best_price(&mut self, close: f64) {
        self.best_price_since_entry = match self.side {
            Direction::Long => self.best_price_since_entry.max(close),
            Direction::Short => self.best_price_since_entry.min(close),
        };
    }

    /// Unrealized profit in percent of entry at the given price.
    /// Positive when the trade is in the money, for both sides.
    pub fn unrealized_profit_pct(&self, price: f64) -> f64 {
        match self.side {
            Direction::Long => (price - self.entry_price) / self.entry_price * 100.0,
            Direction::Short => (self.entry_price - price) / self.entry_price * 100.0,
        }
    }
}
