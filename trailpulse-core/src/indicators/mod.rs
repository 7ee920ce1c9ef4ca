//! Pure series calculators feeding the engine.
//!
//! Every calculator takes full history in and produces an output series of
//! the same length: no indicator value at bar i may depend on data from bar
//! i+1 or later. The engine precomputes them into an [`IndicatorSeries`]
//! once per window (batch) or per pushed bar (live) and reads per-bar
//! [`IndicatorState`] snapshots off it.

pub mod atr;
pub mod crossover;
pub mod ema;
pub mod supertrend;
pub mod trailing_stop;

pub use atr::{atr, true_range, wilder_atr};
pub use crossover::{detect, detect_at, Cross};
pub use ema::ema;
pub use supertrend::supertrend;
pub use trailing_stop::trailing_stop;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::Bar;

/// Derived indicator values for a single bar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorState {
    pub atr: f64,
    pub ema1: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub trailing_stop: f64,
    pub supertrend: f64,
    /// EMA(1) vs. trailing-stop cross at this bar (entry trigger).
    pub price_cross: Cross,
    /// EMA-fast vs. EMA-slow cross at this bar (confirmation trigger).
    pub trend_cross: Cross,
}

/// All indicator series for a bar window, computed in one pass.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSeries {
    pub atr: Vec<f64>,
    pub ema1: Vec<f64>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub trailing_stop: Vec<f64>,
    pub supertrend: Vec<f64>,
    pub price_cross: Vec<Cross>,
    pub trend_cross: Vec<Cross>,
}

impl IndicatorSeries {
    /// Compute every series the engine needs over the full bar window.
    pub fn compute(bars: &[Bar], config: &EngineConfig) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let atr_series = atr(bars, config.atr_period);
        let st_atr = atr(bars, config.supertrend_period);

        let ema1 = ema(&closes, 1);
        let ema_fast = ema(&closes, config.ema_fast_len);
        let ema_slow = ema(&closes, config.ema_slow_len);

        let ts = trailing_stop(&closes, &atr_series, config.atr_sensitivity);
        let st = supertrend(bars, &st_atr, config.supertrend_factor);

        let price_cross = detect(&ema1, &ts);
        let trend_cross = detect(&ema_fast, &ema_slow);

        Self {
            atr: atr_series,
            ema1,
            ema_fast,
            ema_slow,
            trailing_stop: ts,
            supertrend: st,
            price_cross,
            trend_cross,
        }
    }

    pub fn len(&self) -> usize {
        self.atr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atr.is_empty()
    }

    /// Snapshot of all indicator values at one bar.
    pub fn state_at(&self, i: usize) -> IndicatorState {
        IndicatorState {
            atr: self.atr[i],
            ema1: self.ema1[i],
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            trailing_stop: self.trailing_stop[i],
            supertrend: self.supertrend[i],
            price_cross: self.price_cross[i],
            trend_cross: self.trend_cross[i],
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000. Timestamps advance one hour per bar.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples, hourly spacing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            symbol: "TEST".to_string(),
            timestamp: base + chrono::Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_lengths_match_bars() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let config = EngineConfig::default();
        let series = IndicatorSeries::compute(&bars, &config);
        assert_eq!(series.len(), 5);
        assert_eq!(series.ema_fast.len(), 5);
        assert_eq!(series.trailing_stop.len(), 5);
        assert_eq!(series.price_cross.len(), 5);
    }

    #[test]
    fn ema1_tracks_close() {
        let bars = make_bars(&[100.0, 105.0, 103.0]);
        let series = IndicatorSeries::compute(&bars, &EngineConfig::default());
        assert_eq!(series.ema1, vec![100.0, 105.0, 103.0]);
    }

    #[test]
    fn state_at_mirrors_series() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = IndicatorSeries::compute(&bars, &EngineConfig::default());
        let state = series.state_at(2);
        assert_eq!(state.ema1, series.ema1[2]);
        assert_eq!(state.trailing_stop, series.trailing_stop[2]);
        assert_eq!(state.trend_cross, series.trend_cross[2]);
    }

    #[test]
    fn no_lookahead_in_any_series() {
        // Truncated-vs-full: values up to bar i must not change when later
        // bars are appended.
        let full = make_bars(&[
            100.0, 102.0, 101.0, 104.0, 107.0, 105.0, 109.0, 111.0, 108.0, 112.0,
        ]);
        let config = EngineConfig::default();
        let full_series = IndicatorSeries::compute(&full, &config);
        let trunc_series = IndicatorSeries::compute(&full[..6], &config);
        for i in 0..6 {
            assert_eq!(full_series.atr[i], trunc_series.atr[i]);
            assert_eq!(full_series.trailing_stop[i], trunc_series.trailing_stop[i]);
            assert_eq!(full_series.supertrend[i], trunc_series.supertrend[i]);
            assert_eq!(full_series.price_cross[i], trunc_series.price_cross[i]);
        }
    }
}
