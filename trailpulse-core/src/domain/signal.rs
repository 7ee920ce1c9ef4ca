//! Signal and exit events — the engine's outward-facing vocabulary.
//!
//! Events are immutable once emitted: they describe a market decision at a
//! bar, not its downstream handling. The order-execution collaborator reads
//! `{direction, entry_price, stop_loss, take_profit}` off a [`SignalEvent`];
//! everything else is context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directional intent of a signal, and the side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }
}

/// Confirmation tier of an entry signal, graded by its temporal proximity
/// to an EMA-fast/EMA-slow trend crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    /// The trend crossover happened within the pre-lookback window.
    StrongPre,
    /// A Weak signal upgraded by a crossover within the post-confirm window.
    StrongPost,
    /// No crossover nearby (yet).
    Weak,
}

/// An entry signal emitted for a single bar. At most one per bar; buy and
/// sell are mutually exclusive by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: Direction,
    /// Entry reference price (the signal bar's close).
    pub entry_price: f64,
    /// Initial ATR-based stop-loss level.
    pub stop_loss: f64,
    /// Initial ATR-based take-profit level.
    pub take_profit: f64,
    /// `None` when EMA confirmation grading is disabled.
    pub confirmation: Option<Confirmation>,
}

/// A Weak signal's pending record was upgraded to StrongPost by a trend
/// crossover inside its confirmation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationUpgrade {
    pub direction: Direction,
    pub origin_bar_index: usize,
    pub upgraded_at_index: usize,
    pub timestamp: DateTime<Utc>,
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Closed to reverse into an opposite-direction signal
    /// (only under `OppositeSignalPolicy::CloseAndReverse`).
    Reversal,
}

/// A position was closed on this bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitEvent {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub side: Direction,
    /// Close price of the exit bar.
    pub price: f64,
    pub reason: ExitReason,
}
