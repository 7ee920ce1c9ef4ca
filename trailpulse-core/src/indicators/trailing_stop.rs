//! ATR trailing stop line — an adaptive support/resistance level that
//! ratchets toward price within a trend and resets on a flip.
//!
//! With nLoss[i] = sensitivity * atr[i] and prev = ts[i-1]:
//! - close[i] and close[i-1] both above prev: uptrend ratchet,
//!   ts[i] = max(prev, close[i] - nLoss[i]) — never loosens.
//! - close[i] and close[i-1] both below prev: downtrend ratchet,
//!   ts[i] = min(prev, close[i] + nLoss[i]).
//! - close[i] above prev only: flip to uptrend, ts[i] = close[i] - nLoss[i].
//! - otherwise: flip to downtrend, ts[i] = close[i] + nLoss[i].
//!
//! Invariant: outside a flip bar the line only tightens toward price.

/// Compute the trailing stop line from closes and a matching ATR series.
///
/// `ts[0] = close[0] - sensitivity * atr[0]` (the line starts in support
/// posture beneath the first close).
pub fn trailing_stop(closes: &[f64], atr: &[f64], sensitivity: f64) -> Vec<f64> {
    assert_eq!(closes.len(), atr.len(), "trailing stop inputs must be aligned");
    assert!(sensitivity > 0.0, "sensitivity must be positive");

    let n = closes.len();
    let mut ts = Vec::with_capacity(n);

    if n == 0 {
        return ts;
    }

    ts.push(closes[0] - sensitivity * atr[0]);
    for i in 1..n {
        let prev = ts[i - 1];
        let n_loss = sensitivity * atr[i];
        ts.push(step(closes[i], closes[i - 1], prev, n_loss));
    }

    ts
}

/// One step of the trailing-stop recurrence.
pub fn step(close: f64, prev_close: f64, prev_ts: f64, n_loss: f64) -> f64 {
    if close > prev_ts && prev_close > prev_ts {
        prev_ts.max(close - n_loss)
    } else if close < prev_ts && prev_close < prev_ts {
        prev_ts.min(close + n_loss)
    } else if close > prev_ts {
        close - n_loss
    } else {
        close + n_loss
    }
}
