//! Engine configuration — recognized options, defaults, validation, TOML
//! loading.
//!
//! Validation happens once, before an engine is constructed. Everything
//! downstream may assume positive periods and finite positive multipliers.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How debounce/cooldown state is carried across `push_bar` calls.
///
/// The two conventions are not equivalent: they differ at startup and after
/// a process restart, which is why the choice is an explicit option rather
/// than an implementation detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Signal state persists inside the engine between calls. A restarted
    /// process starts from a clean slate regardless of the window it is fed.
    Incremental,
    /// Signal state is re-derived from the full retained window on every
    /// call, reproducing the recompute-per-call scripts: a restart fed the
    /// same window lands in the same state.
    Stateless,
}

/// What to do with an opposite-direction signal while a position is open.
///
/// The engine does not guess: the caller declares the policy. The signal
/// state machine itself (debounce/cooldown) is unaffected either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OppositeSignalPolicy {
    /// Keep the open position; the signal is still emitted for the caller.
    Ignore,
    /// Close the open position at the signal bar's close and enter the
    /// opposite direction on the same bar.
    CloseAndReverse,
}

/// All recognized engine options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// ATR lookback for the trailing-stop line.
    pub atr_period: usize,
    /// Sensitivity multiplier `a` applied to ATR for the trailing-stop line.
    pub atr_sensitivity: f64,
    /// ATR lookback for the SuperTrend filter.
    pub supertrend_period: usize,
    /// Band width multiplier for the SuperTrend filter.
    pub supertrend_factor: f64,
    /// Minimum minutes between emitted signals (cooldown), from bar
    /// timestamps, not wall-clock.
    pub min_delay_minutes: i64,
    /// Stop distance at entry, in ATR multiples.
    pub atr_sl_mult: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub atr_risk_reward: f64,
    /// Wide multiplier for the adaptive trailing stop against the best
    /// price since entry.
    pub trail_mult: f64,
    /// Fast EMA length for confirmation grading.
    pub ema_fast_len: usize,
    /// Slow EMA length for confirmation grading.
    pub ema_slow_len: usize,
    /// A signal within this many bars after a trend crossover is StrongPre.
    pub pre_lookback_bars: usize,
    /// A Weak signal waits this many bars for a crossover upgrade.
    pub post_confirm_bars: usize,
    /// Grade signals against EMA crossovers at all.
    pub use_ema_confirmation: bool,
    /// Run the adaptive trailing update while a position is open.
    pub use_trailing_stop: bool,
    pub mode: UpdateMode,
    pub opposite_signal: OppositeSignalPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            atr_period: 10,
            atr_sensitivity: 3.0,
            supertrend_period: 10,
            supertrend_factor: 3.0,
            min_delay_minutes: 60,
            atr_sl_mult: 2.0,
            atr_risk_reward: 2.0,
            trail_mult: 8.0,
            ema_fast_len: 9,
            ema_slow_len: 21,
            pre_lookback_bars: 3,
            post_confirm_bars: 5,
            use_ema_confirmation: true,
            use_trailing_stop: true,
            mode: UpdateMode::Incremental,
            opposite_signal: OppositeSignalPolicy::Ignore,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML, falling back to defaults for absent keys,
    /// then validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, period) in [
            ("atr_period", self.atr_period),
            ("supertrend_period", self.supertrend_period),
            ("ema_fast_len", self.ema_fast_len),
            ("ema_slow_len", self.ema_slow_len),
        ] {
            if period == 0 {
                return Err(ConfigError::ZeroPeriod { name });
            }
        }

        for (name, value) in [
            ("atr_sensitivity", self.atr_sensitivity),
            ("supertrend_factor", self.supertrend_factor),
            ("atr_sl_mult", self.atr_sl_mult),
            ("atr_risk_reward", self.atr_risk_reward),
            ("trail_mult", self.trail_mult),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::BadMultiplier { name, value });
            }
        }

        if self.ema_slow_len <= self.ema_fast_len {
            return Err(ConfigError::EmaOrdering {
                fast: self.ema_fast_len,
                slow: self.ema_slow_len,
            });
        }

        if self.min_delay_minutes < 0 {
            return Err(ConfigError::NegativeCooldown(self.min_delay_minutes));
        }

        Ok(())
    }

    /// Bars required before signal generation unlocks: the largest
    /// configured lookback.
    pub fn warmup_bars(&self) -> usize {
        self.atr_period
            .max(self.supertrend_period)
            .max(self.ema_slow_len)
    }
}
