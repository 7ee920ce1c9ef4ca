//! Exit management — initial ATR-based stop/target placement at entry,
//! then a profit-tiered adaptive trailing stop/target while the position
//! stays open.
//!
//! Levels behave like resting orders: a bar is first checked against the
//! levels set at the previous bar's close, and only then are the levels
//! advanced. The trailing stop obeys the ratchet invariant (accepted only
//! when strictly more favorable); the trailing target is recomputed every
//! bar and may move either way.

use crate::config::EngineConfig;
use crate::domain::{Bar, Direction, ExitEvent, ExitReason, Position};

/// Initial stop/target placement at the entry bar.
///
/// Long: sl = entry - atr*sl_mult, tp = entry + atr*sl_mult*rr.
/// Short: mirrored.
pub fn initial_levels(
    side: Direction,
    entry: f64,
    atr: f64,
    sl_mult: f64,
    risk_reward: f64,
) -> (f64, f64) {
    let stop_distance = atr * sl_mult;
    match side {
        Direction::Long => (entry - stop_distance, entry + stop_distance * risk_reward),
        Direction::Short => (entry + stop_distance, entry - stop_distance * risk_reward),
    }
}

/// Reward multiple tiered by unrealized profit: lock a modest win quickly
/// if momentum stalls near entry, let strongly profitable trades run with
/// an expanding target. Boundaries land on the higher tier.
fn reward_multiple(profit_pct: f64) -> f64 {
    if profit_pct >= 20.0 {
        3.0
    } else if profit_pct >= 10.0 {
        2.0
    } else {
        1.0
    }
}

/// Exit manager: opens positions and drives their per-bar level updates.
#[derive(Debug, Clone)]
pub struct ExitManager {
    sl_mult: f64,
    risk_reward: f64,
    trail_mult: f64,
    trailing_enabled: bool,
}

impl ExitManager {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            sl_mult: config.atr_sl_mult,
            risk_reward: config.atr_risk_reward,
            trail_mult: config.trail_mult,
            trailing_enabled: config.use_trailing_stop,
        }
    }

    /// Open a position at the signal bar's close.
    pub fn open(&self, bar_index: usize, bar: &Bar, side: Direction, atr: f64) -> Position {
        let (stop_loss, take_profit) =
            initial_levels(side, bar.close, atr, self.sl_mult, self.risk_reward);
        Position::open(
            bar.symbol.clone(),
            side,
            bar.close,
            atr,
            bar_index,
            bar.timestamp,
            stop_loss,
            take_profit,
        )
    }

    /// Check the bar's close against the levels currently in effect.
    /// A bar crossing both levels resolves to the stop.
    pub fn check_exit(&self, position: &Position, bar_index: usize, bar: &Bar) -> Option<ExitEvent> {
        let close = bar.close;
        let (stop_hit, target_hit) = match position.side {
            Direction::Long => (close <= position.trailing_sl, close >= position.trailing_tp),
            Direction::Short => (close >= position.trailing_sl, close <= position.trailing_tp),
        };

        let reason = if stop_hit {
            ExitReason::StopLoss
        } else if target_hit {
            ExitReason::TakeProfit
        } else {
            return None;
        };

        Some(ExitEvent {
            bar_index,
            timestamp: bar.timestamp,
            side: position.side,
            price: close,
            reason,
        })
    }

    /// Advance the best-price watermark and, when trailing is enabled, the
    /// adaptive stop/target levels.
    pub fn update_trailing(&self, position: &mut Position, bar: &Bar, atr: f64) {
        let close = bar.close;
        position.update_best_price(close);
        position.profit_pct = position.unrealized_profit_pct(close);

        if !self.trailing_enabled {
            return;
        }
        position.trailing_active = true;

        let best = position.best_price_since_entry;
        let trail_distance = atr * self.sl_mult * self.trail_mult;

        // Ratchet: accept only a strictly more favorable stop.
        let candidate = match position.side {
            Direction::Long => best - trail_distance,
            Direction::Short => best + trail_distance,
        };
        let improved = match position.side {
            Direction::Long => candidate > position.trailing_sl,
            Direction::Short => candidate < position.trailing_sl,
        };
        if improved {
            position.trailing_sl = candidate;
        }

        let stop_distance = (best - position.trailing_sl).abs();
        let reward = reward_multiple(position.profit_pct);
        position.trailing_tp = match position.side {
            Direction::Long => best + stop_distance * reward,
            Direction::Short => best - stop_distance * reward,
        };
    }
}
