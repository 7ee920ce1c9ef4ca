//! SuperTrend — an ATR-band trend line flipping between support and
//! resistance roles.
//!
//! mid = (high + low) / 2; upper = mid + factor * atr; lower = mid - factor * atr.
//! st[0] = lower[0]. For i >= 1: close[i] above st[i-1] keeps the line in
//! support posture, st[i] = max(lower[i], st[i-1]); otherwise resistance,
//! st[i] = min(upper[i], st[i-1]).
//!
//! Used exclusively as a confirming filter for entry signals, never as a
//! signal source on its own.

use crate::domain::Bar;

/// Compute the SuperTrend line from bars and a matching ATR series.
pub fn supertrend(bars: &[Bar], atr: &[f64], factor: f64) -> Vec<f64> {
    assert_eq!(bars.len(), atr.len(), "supertrend inputs must be aligned");
    assert!(factor > 0.0, "factor must be positive");

    let n = bars.len();
    let mut st = Vec::with_capacity(n);

    if n == 0 {
        return st;
    }

    st.push(bars[0].hl2() - factor * atr[0]);
    for i in 1..n {
        let mid = bars[i].hl2();
        let upper = mid + factor * atr[i];
        let lower = mid - factor * atr[i];
        let prev = st[i - 1];

        let next = if bars[i].close > prev {
            lower.max(prev)
        } else {
            upper.min(prev)
        };
        st.push(next);
    }

    st
}
