//! End-to-end engine tests over synthetic bar paths.
//!
//! The paths are small V-shapes: a decline establishes the trailing-stop
//! line above price, a sharp rally crosses it (long setup), and mirrored
//! for shorts. Signal bars below were derived by hand from the indicator
//! recurrences and pinned here.

use chrono::{DateTime, Duration, TimeZone, Utc};
use trailpulse_core::config::{EngineConfig, OppositeSignalPolicy, UpdateMode};
use trailpulse_core::domain::{Bar, Confirmation, Direction, ExitReason};
use trailpulse_core::engine::{BarOutcome, Engine, SignalState};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}

/// Bars from closes: open = prev close, high/low bracket by 1.0,
/// `minutes` apart.
fn make_bars_spaced(closes: &[f64], minutes: i64) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "BTCUSDT".to_string(),
                timestamp: base_time() + Duration::minutes(minutes * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    make_bars_spaced(closes, 60)
}

/// Short lookbacks so the paths stay small: warm-up = 5 bars.
fn fast_config() -> EngineConfig {
    EngineConfig {
        atr_period: 3,
        atr_sensitivity: 1.0,
        supertrend_period: 3,
        supertrend_factor: 1.0,
        ema_fast_len: 3,
        ema_slow_len: 5,
        min_delay_minutes: 0,
        ..Default::default()
    }
}

/// Decline then sharp rally: long signal fires on the rally bar (index 7).
const V_LONG: [f64; 9] = [100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0];

/// Rally then sharp drop: short signal fires on the drop bar (index 7).
const V_SHORT: [f64; 8] = [100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 112.0, 100.0];

fn signals(outcomes: &[BarOutcome]) -> Vec<(usize, Direction)> {
    outcomes
        .iter()
        .filter_map(|o| o.signal.as_ref().map(|s| (o.bar_index, s.direction)))
        .collect()
}

// ──────────────────────────────────────────────
// Entries
// ──────────────────────────────────────────────

#[test]
fn long_entry_on_v_reversal() {
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars(&V_LONG)).unwrap();

    assert_eq!(signals(&outcomes), vec![(7, Direction::Long)]);

    let signal = outcomes[7].signal.as_ref().unwrap();
    let atr = outcomes[7].indicators.atr;
    assert!(atr > 0.0);
    assert_eq!(signal.entry_price, 100.0);
    // Default risk config: sl_mult = 2, rr = 2.
    assert!((signal.stop_loss - (100.0 - 2.0 * atr)).abs() < 1e-9);
    assert!((signal.take_profit - (100.0 + 4.0 * atr)).abs() < 1e-9);

    let pos = engine.position().expect("position must be open");
    assert_eq!(pos.side, Direction::Long);
    assert_eq!(pos.entry_index, 7);
    assert_eq!(pos.entry_price, 100.0);
    assert_eq!(pos.trailing_sl, signal.stop_loss);
}

#[test]
fn short_entry_on_inverted_v() {
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars(&V_SHORT)).unwrap();

    assert_eq!(signals(&outcomes), vec![(7, Direction::Short)]);
    let pos = engine.position().expect("position must be open");
    assert_eq!(pos.side, Direction::Short);
    assert!(pos.trailing_sl > pos.entry_price);
}

#[test]
fn no_signal_during_warmup_or_steady_trend() {
    let mut engine = Engine::new(fast_config()).unwrap();
    // Pure decline: the only crossover is at bar 2, inside warm-up.
    let outcomes = engine
        .run_series(&make_bars(&[100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 86.0]))
        .unwrap();
    assert!(signals(&outcomes).is_empty());
    assert!(engine.position().is_none());
}

#[test]
fn signal_grading_is_attached_when_confirmation_enabled() {
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars(&V_LONG)).unwrap();
    // The rally bar also carries the EMA-fast/EMA-slow bull cross, so the
    // signal is pre-confirmed.
    let signal = outcomes[7].signal.as_ref().unwrap();
    assert_eq!(signal.confirmation, Some(Confirmation::StrongPre));
}

#[test]
fn signal_grading_absent_when_confirmation_disabled() {
    let config = EngineConfig {
        use_ema_confirmation: false,
        ..fast_config()
    };
    let mut engine = Engine::new(config).unwrap();
    let outcomes = engine.run_series(&make_bars(&V_LONG)).unwrap();
    assert_eq!(outcomes[7].signal.as_ref().unwrap().confirmation, None);
}

// ──────────────────────────────────────────────
// Exits
// ──────────────────────────────────────────────

#[test]
fn stop_loss_exit_closes_position_and_allows_same_bar_reversal() {
    let mut engine = Engine::new(fast_config()).unwrap();
    // Long at bar 7 (entry 100), then a crash through the initial stop
    // (~85.5) at bar 9. The stop exit flattens the engine, after which the
    // crash bar's own short signal opens the opposite position.
    let closes = [
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0, 80.0,
    ];
    let outcomes = engine.run_series(&make_bars(&closes)).unwrap();

    let exit = outcomes[9].exit.as_ref().expect("stop exit expected");
    assert_eq!(exit.reason, ExitReason::StopLoss);
    assert_eq!(exit.side, Direction::Long);
    assert_eq!(exit.price, 80.0);

    assert_eq!(
        outcomes[9].signal.as_ref().map(|s| s.direction),
        Some(Direction::Short)
    );
    let pos = engine.position().expect("reversal entry expected");
    assert_eq!(pos.side, Direction::Short);
    assert_eq!(pos.entry_price, 80.0);
}

#[test]
fn opposite_signal_ignored_keeps_position() {
    // Crash to 87 fires a short signal but stays above the long's stop.
    let closes = [
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0, 87.0,
    ];
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars(&closes)).unwrap();

    assert_eq!(
        signals(&outcomes),
        vec![(7, Direction::Long), (9, Direction::Short)]
    );
    assert!(outcomes[9].exit.is_none());
    let pos = engine.position().expect("long must survive under Ignore");
    assert_eq!(pos.side, Direction::Long);
    assert_eq!(pos.entry_index, 7);
}

#[test]
fn opposite_signal_reverses_under_close_and_reverse() {
    let closes = [
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0, 87.0,
    ];
    let config = EngineConfig {
        opposite_signal: OppositeSignalPolicy::CloseAndReverse,
        ..fast_config()
    };
    let mut engine = Engine::new(config).unwrap();
    let outcomes = engine.run_series(&make_bars(&closes)).unwrap();

    let exit = outcomes[9].exit.as_ref().expect("reversal exit expected");
    assert_eq!(exit.reason, ExitReason::Reversal);
    assert_eq!(exit.side, Direction::Long);
    assert_eq!(exit.price, 87.0);

    let pos = engine.position().expect("short entry expected");
    assert_eq!(pos.side, Direction::Short);
    assert_eq!(pos.entry_price, 87.0);
    assert_eq!(pos.entry_index, 9);
}

#[test]
fn trailing_stop_ratchets_while_long_runs() {
    // Long at bar 7, then a persistent rally: the trailing stop must be
    // non-decreasing bar over bar once the position is open.
    let mut closes = V_LONG.to_vec();
    for i in 0..12 {
        closes.push(104.0 + 3.0 * i as f64);
    }
    let mut engine = Engine::new(fast_config()).unwrap();
    let bars = make_bars(&closes);

    let mut last_sl = f64::NEG_INFINITY;
    for bar in &bars {
        engine.push_bar(bar.clone()).unwrap();
        if let Some(pos) = engine.position() {
            assert!(
                pos.trailing_sl >= last_sl - 1e-12,
                "trailing stop loosened: {} -> {}",
                last_sl,
                pos.trailing_sl
            );
            last_sl = pos.trailing_sl;
        }
    }
    assert!(engine.position().is_some());
}

// ──────────────────────────────────────────────
// Debounce and cooldown
// ──────────────────────────────────────────────

#[test]
fn emitted_directions_alternate() {
    // Double-V: long at 7, short at 9, long again at 12.
    let closes = [
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0, 87.0, 85.0, 83.0, 95.0,
    ];
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars(&closes)).unwrap();

    let emitted = signals(&outcomes);
    assert_eq!(
        emitted,
        vec![
            (7, Direction::Long),
            (9, Direction::Short),
            (12, Direction::Long)
        ]
    );
    for pair in emitted.windows(2) {
        assert_ne!(pair[0].1, pair[1].1, "directions must alternate");
    }
}

#[test]
fn cooldown_suppresses_signal_and_leaves_state_untouched() {
    // 15-minute bars: the short setup at bar 9 lands 30 minutes after the
    // long emission at bar 7, inside a 60-minute cooldown.
    let closes = [
        100.0, 98.0, 96.0, 94.0, 92.0, 90.0, 88.0, 100.0, 102.0, 87.0,
    ];
    let config = EngineConfig {
        min_delay_minutes: 60,
        ..fast_config()
    };
    let mut engine = Engine::new(config).unwrap();
    let bars = make_bars_spaced(&closes, 15);
    let outcomes = engine.run_series(&bars).unwrap();

    assert_eq!(signals(&outcomes), vec![(7, Direction::Long)]);
    let state = engine.signal_state();
    assert_eq!(state.last_direction, Some(Direction::Long));
    assert_eq!(state.last_trade_time, Some(bars[7].timestamp));

    // Same path without the cooldown emits the short: the suppression
    // above was the cooldown's doing, not the setup's.
    let mut engine = Engine::new(fast_config()).unwrap();
    let outcomes = engine.run_series(&make_bars_spaced(&closes, 15)).unwrap();
    assert_eq!(
        signals(&outcomes),
        vec![(7, Direction::Long), (9, Direction::Short)]
    );
}

// ──────────────────────────────────────────────
// Update modes
// ──────────────────────────────────────────────

#[test]
fn stateless_mode_derives_state_from_seeded_window() {
    let bars = make_bars(&V_LONG);

    let config = EngineConfig {
        mode: UpdateMode::Stateless,
        ..fast_config()
    };
    let mut stateless = Engine::new(config).unwrap();
    stateless.seed_history(&bars[..8]).unwrap(); // includes the signal bar
    let outcome = stateless.push_bar(bars[8].clone()).unwrap();
    assert!(outcome.signal.is_none());
    // The replayed window tells the stateless engine a long already fired.
    assert_eq!(
        stateless.signal_state().last_direction,
        Some(Direction::Long)
    );
    assert_eq!(
        stateless.signal_state().last_trade_time,
        Some(bars[7].timestamp)
    );
}

#[test]
fn incremental_mode_starts_fresh_after_seeding() {
    let bars = make_bars(&V_LONG);

    let mut incremental = Engine::new(fast_config()).unwrap();
    incremental.seed_history(&bars[..8]).unwrap();
    let outcome = incremental.push_bar(bars[8].clone()).unwrap();
    assert!(outcome.signal.is_none());
    // Go-live state is clean: the seeded window's signal never happened as
    // far as debounce/cooldown are concerned.
    assert_eq!(*incremental.signal_state(), SignalState::default());
}

#[test]
fn modes_agree_when_fed_every_bar() {
    let bars = make_bars(&V_LONG);

    let mut incremental = Engine::new(fast_config()).unwrap();
    let config = EngineConfig {
        mode: UpdateMode::Stateless,
        ..fast_config()
    };
    let mut stateless = Engine::new(config).unwrap();

    let a = incremental.run_series(&bars).unwrap();
    let b = stateless.run_series(&bars).unwrap();
    assert_eq!(signals(&a), signals(&b));
    assert_eq!(incremental.signal_state(), stateless.signal_state());
}
