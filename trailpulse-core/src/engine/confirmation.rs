//! Confirmation classifier — grades entry signals by their temporal
//! proximity to an EMA-fast/EMA-slow trend crossover.
//!
//! A signal within `pre_lookback_bars` of a matching crossover is StrongPre.
//! Otherwise it is Weak and opens a pending record; a matching crossover
//! inside the post-confirm window upgrades it to StrongPost, expiry is
//! silent. At most one pending record per direction, and a newer weak
//! signal of the same direction replaces the older one (last signal wins).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Confirmation, ConfirmationUpgrade, Direction};
use crate::indicators::Cross;

/// Counter value meaning "no crossover observed yet", and the saturation cap.
const CROSS_SENTINEL: usize = 999;

/// A Weak signal waiting for a trend crossover to upgrade it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub origin_bar_index: usize,
    pub expiry_bar_index: usize,
}

/// Per-direction crossover recency counters plus pending upgrade records.
#[derive(Debug, Clone)]
pub struct ConfirmationClassifier {
    pre_lookback_bars: usize,
    post_confirm_bars: usize,
    bars_since_bull_cross: usize,
    bars_since_bear_cross: usize,
    pending_long: Option<PendingConfirmation>,
    pending_short: Option<PendingConfirmation>,
}

impl ConfirmationClassifier {
    pub fn new(pre_lookback_bars: usize, post_confirm_bars: usize) -> Self {
        Self {
            pre_lookback_bars,
            post_confirm_bars,
            bars_since_bull_cross: CROSS_SENTINEL,
            bars_since_bear_cross: CROSS_SENTINEL,
            pending_long: None,
            pending_short: None,
        }
    }

    /// Advance counters and pending records for bar `i`. Must run before
    /// [`classify`](Self::classify) on the same bar, so that a same-bar
    /// crossover counts as pre-confirmation.
    pub fn on_bar(
        &mut self,
        i: usize,
        trend_cross: Cross,
        timestamp: DateTime<Utc>,
    ) -> Option<ConfirmationUpgrade> {
        self.bars_since_bull_cross = if trend_cross.is_up() {
            0
        } else {
            (self.bars_since_bull_cross + 1).min(CROSS_SENTINEL)
        };
        self.bars_since_bear_cross = if trend_cross.is_down() {
            0
        } else {
            (self.bars_since_bear_cross + 1).min(CROSS_SENTINEL)
        };

        // Expire first: a crossover arriving past the window must not
        // upgrade a record that is already dead.
        if self.pending_long.is_some_and(|p| i > p.expiry_bar_index) {
            self.pending_long = None;
        }
        if self.pending_short.is_some_and(|p| i > p.expiry_bar_index) {
            self.pending_short = None;
        }

        if trend_cross.is_up() {
            if let Some(pending) = self.pending_long.take() {
                return Some(ConfirmationUpgrade {
                    direction: Direction::Long,
                    origin_bar_index: pending.origin_bar_index,
                    upgraded_at_index: i,
                    timestamp,
                });
            }
        }
        if trend_cross.is_down() {
            if let Some(pending) = self.pending_short.take() {
                return Some(ConfirmationUpgrade {
                    direction: Direction::Short,
                    origin_bar_index: pending.origin_bar_index,
                    upgraded_at_index: i,
                    timestamp,
                });
            }
        }

        None
    }

    /// Grade a signal emitted at bar `i`. Weak signals open (or replace)
    /// the pending record for their direction.
    pub fn classify(&mut self, i: usize, direction: Direction) -> Confirmation {
        let bars_since = match direction {
            Direction::Long => self.bars_since_bull_cross,
            Direction::Short => self.bars_since_bear_cross,
        };

        if bars_since <= self.pre_lookback_bars {
            return Confirmation::StrongPre;
        }

        let pending = PendingConfirmation {
            origin_bar_index: i,
            expiry_bar_index: i + self.post_confirm_bars,
        };
        match direction {
            Direction::Long => self.pending_long = Some(pending),
            Direction::Short => self.pending_short = Some(pending),
        }
        Confirmation::Weak
    }

    pub fn pending(&self, direction: Direction) -> Option<PendingConfirmation> {
        match direction {
            Direction::Long => self.pending_long,
            Direction::Short => self.pending_short,
        }
    }
}
