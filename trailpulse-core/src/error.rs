//! Error types for configuration validation and bar-feed faults.
//!
//! The split mirrors the two failure classes: invalid input fails fast with
//! an explicit error; valid-but-degenerate market data never raises — it is
//! absorbed locally by the calculators (zero-filled ATR warmup, etc.).

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Configuration rejected before the engine is constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be >= 1")]
    ZeroPeriod { name: &'static str },

    #[error("{name} must be positive and finite, got {value}")]
    BadMultiplier { name: &'static str, value: f64 },

    #[error("ema_slow_len ({slow}) must be > ema_fast_len ({fast})")]
    EmaOrdering { fast: usize, slow: usize },

    #[error("min_delay_minutes must be >= 0, got {0}")]
    NegativeCooldown(i64),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Malformed input to a running engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bar timestamp {next} is not after previous bar {prev}")]
    NonIncreasingTimestamp {
        prev: DateTime<Utc>,
        next: DateTime<Utc>,
    },

    #[error("malformed bar at {timestamp}: {reason}")]
    MalformedBar {
        timestamp: DateTime<Utc>,
        reason: String,
    },

    #[error("series too short: {actual} bars, warm-up requires {required}")]
    SeriesTooShort { required: usize, actual: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages() {
        let err = ConfigError::ZeroPeriod { name: "atr_period" };
        assert_eq!(err.to_string(), "atr_period must be >= 1");

        let err = ConfigError::BadMultiplier {
            name: "atr_sensitivity",
            value: -1.0,
        };
        assert!(err.to_string().contains("atr_sensitivity"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn series_too_short_message() {
        let err = EngineError::SeriesTooShort {
            required: 21,
            actual: 5,
        };
        assert_eq!(
            err.to_string(),
            "series too short: 5 bars, warm-up requires 21"
        );
    }

    #[test]
    fn config_error_wraps_into_engine_error() {
        let err: EngineError = ConfigError::NegativeCooldown(-5).into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
