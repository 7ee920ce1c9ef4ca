//! Crossover detector — flags directional crosses between two series.
//!
//! Reused for EMA(1) vs. the trailing-stop line (entry signals) and for
//! EMA-fast vs. EMA-slow (confirmation grading).

use serde::{Deserialize, Serialize};

/// Direction of a cross between two series at one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cross {
    /// `a` crossed above `b`: a[i-1] <= b[i-1] and a[i] > b[i].
    Up,
    /// `a` crossed below `b`: a[i-1] >= b[i-1] and a[i] < b[i].
    Down,
    None,
}

impl Cross {
    pub fn is_up(self) -> bool {
        self == Cross::Up
    }

    pub fn is_down(self) -> bool {
        self == Cross::Down
    }
}

/// Detect crossovers of `a` over `b` across two aligned series.
///
/// Index 0 has no previous bar and is always `Cross::None`. The two slices
/// must have equal length.
pub fn detect(a: &[f64], b: &[f64]) -> Vec<Cross> {
    assert_eq!(a.len(), b.len(), "crossover inputs must be aligned");
    let n = a.len();
    let mut out = Vec::with_capacity(n);

    if n == 0 {
        return out;
    }

    out.push(Cross::None);
    for i in 1..n {
        out.push(detect_at(a[i - 1], b[i - 1], a[i], b[i]));
    }

    out
}

/// Single-step crossover check from (prev_a, prev_b) to (cur_a, cur_b).
pub fn detect_at(prev_a: f64, prev_b: f64, cur_a: f64, cur_b: f64) -> Cross {
    if prev_a <= prev_b && cur_a > cur_b {
        Cross::Up
    } else if prev_a >= prev_b && cur_a < cur_b {
        Cross::Down
    } else {
        Cross::None
    }
}
