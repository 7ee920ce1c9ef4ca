//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with the
//! first bar falling back to high-low (no previous close).
//! ATR uses Wilder smoothing: seed = mean of the first `period` true-range
//! values, then atr[i] = (atr[i-1]*(period-1) + tr[i]) / period.
//!
//! Bars before the seed index are zero-filled. Downstream consumers treat a
//! zero ATR as "no volatility estimate yet": bands collapse onto price and
//! signal generation is gated behind the engine warm-up anyway.

use crate::domain::Bar;

/// Compute the True Range series from bars.
///
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[i] = max(high[i]-low[i], |high[i]-close[i-1]|, |low[i]-close[i-1]|).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = Vec::with_capacity(n);

    if n == 0 {
        return tr;
    }

    tr.push(bars[0].high - bars[0].low);
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));
    }

    tr
}

/// Apply Wilder smoothing to a true-range series.
///
/// Seed at index `period - 1` is the mean of the first `period` values;
/// indices before the seed are zero-filled. Returns all zeros when the
/// series is shorter than `period` (the engine rejects such windows up
/// front, but the function stays total).
pub fn wilder_atr(tr: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "ATR period must be >= 1");
    let n = tr.len();
    let mut atr = vec![0.0; n];

    if n < period {
        return atr;
    }

    let seed: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    atr[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let smoothed = (prev * (period as f64 - 1.0) + tr[i]) / period as f64;
        atr[i] = smoothed;
        prev = smoothed;
    }

    atr
}

/// ATR over a bar series: Wilder-smoothed true range.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    wilder_atr(&true_range(bars), period)
}
