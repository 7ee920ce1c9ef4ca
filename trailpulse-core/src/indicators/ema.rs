//! Exponential Moving Average (EMA).
//!
//! Recursive: ema[i] = alpha * v[i] + (1 - alpha) * ema[i-1] with
//! alpha = 2 / (period + 1), seeded from the first value.
//!
//! period = 1 collapses to the input series itself and is used deliberately
//! as a minimal-lag proxy for "current price" in crossover detection against
//! the trailing-stop line — it is not a genuine trend average there.

/// Compute an EMA over a raw f64 series.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = Vec::with_capacity(n);

    if n == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = values[0];
    result.push(prev);

    for &v in &values[1..] {
        let next = alpha * v + (1.0 - alpha) * prev;
        result.push(next);
        prev = next;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_input() {
        let values = [100.0, 200.0, 300.0];
        let result = ema(&values, 1);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 2/(3+1) = 0.5, seed = 10.
        // ema[1] = 0.5*11 + 0.5*10.0 = 10.5
        // ema[2] = 0.5*12 + 0.5*10.5 = 11.25
        // ema[3] = 0.5*13 + 0.5*11.25 = 12.125
        let values = [10.0, 11.0, 12.0, 13.0];
        let result = ema(&values, 3);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let values = [42.0; 10];
        let result = ema(&values, 5);
        for v in result {
            assert_approx(v, 42.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_converges_toward_new_level() {
        // Step from 100 to 200: EMA approaches 200 monotonically.
        let mut values = vec![100.0; 5];
        values.extend(vec![200.0; 20]);
        let result = ema(&values, 5);
        for i in 6..result.len() {
            assert!(result[i] > result[i - 1], "EMA must rise toward the step");
        }
        assert!(result[result.len() - 1] > 195.0);
    }

    #[test]
    fn ema_empty_series() {
        assert!(ema(&[], 5).is_empty());
    }
}
