//! Entry signal state machine.
//!
//! Raw signals come from the EMA(1) crossover against the trailing-stop
//! line, gated by the close sitting on the right side of that line. The
//! SuperTrend filter confirms direction, flip-debounce suppresses repeats
//! of the last emitted direction, and the cooldown enforces a minimum bar
//! time between emissions.
//!
//! Evaluation order per bar: raw crossover → SuperTrend filter → debounce →
//! cooldown. A candidate suppressed by cooldown advances neither
//! `last_direction` nor `last_trade_time`.
//!
//! Debounce state is deliberately independent of whether a position is
//! actually held — binding the two together is a caller decision.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::{Bar, Direction};
use crate::indicators::{Cross, IndicatorSeries};

/// Mutable debounce/cooldown state carried across bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalState {
    /// Direction of the last emitted signal; a repeat is suppressed until
    /// the opposite direction fires.
    pub last_direction: Option<Direction>,
    /// Bar timestamp of the last emitted signal (cooldown reference).
    pub last_trade_time: Option<DateTime<Utc>>,
}

/// Evaluate the state machine at bar `i`, mutating `state` only when a
/// signal is emitted. Buy and sell are mutually exclusive by construction:
/// a single crossover value cannot be both up and down.
pub(crate) fn evaluate_bar(
    config: &EngineConfig,
    bars: &[Bar],
    series: &IndicatorSeries,
    i: usize,
    state: &mut SignalState,
) -> Option<Direction> {
    if i < config.warmup_bars() {
        return None;
    }

    let close = bars[i].close;
    let ts = series.trailing_stop[i];
    let st = series.supertrend[i];

    let candidate = match series.price_cross[i] {
        Cross::Up if close > ts => Direction::Long,
        Cross::Down if close < ts => Direction::Short,
        _ => return None,
    };

    // SuperTrend filter: confirming only, never a source.
    let trend_ok = match candidate {
        Direction::Long => close > st,
        Direction::Short => close < st,
    };
    if !trend_ok {
        return None;
    }

    // Flip-debounce: same direction as the last emission is suppressed.
    if state.last_direction == Some(candidate) {
        return None;
    }

    // Cooldown: suppression leaves all state untouched.
    if let Some(last) = state.last_trade_time {
        if bars[i].timestamp - last < Duration::minutes(config.min_delay_minutes) {
            return None;
        }
    }

    state.last_direction = Some(candidate);
    state.last_trade_time = Some(bars[i].timestamp);
    Some(candidate)
}

/// Re-derive the signal state by replaying the machine over `bars[..upto]`.
///
/// This is the stateless-recompute convention: the caller keeps no state
/// between calls and the window itself determines debounce/cooldown.
pub(crate) fn replay(
    config: &EngineConfig,
    bars: &[Bar],
    series: &IndicatorSeries,
    upto: usize,
) -> SignalState {
    let mut state = SignalState::default();
    for i in 0..upto {
        evaluate_bar(config, bars, series, i, &mut state);
    }
    state
}
