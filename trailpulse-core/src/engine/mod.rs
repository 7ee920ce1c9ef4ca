//! The engine — per-bar driver over the signal state machine, confirmation
//! classifier, and exit manager.
//!
//! One engine instance owns exactly one instrument's state: bar history,
//! debounce/cooldown, pending confirmations, and at most one open position.
//! Concurrent backtests or instruments get independent instances; there is
//! no shared mutable state anywhere in the crate.
//!
//! Per-bar order of operations:
//! 1. Open-position management: the bar is checked against the stop/target
//!    levels resting from the previous bar, then the trailing levels advance.
//! 2. Confirmation counters and pending records advance.
//! 3. The signal state machine runs; an emitted signal is graded and, when
//!    the engine is flat (or the reverse policy applies), opens a position
//!    at the bar's close.

pub mod confirmation;
pub mod exits;
pub mod signal_gen;
pub mod warmup;

pub use confirmation::{ConfirmationClassifier, PendingConfirmation};
pub use exits::{initial_levels, ExitManager};
pub use signal_gen::SignalState;
pub use warmup::WarmupState;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, OppositeSignalPolicy, UpdateMode};
use crate::domain::{
    Bar, ConfirmationUpgrade, ExitEvent, ExitReason, Position, SignalEvent,
};
use crate::error::{ConfigError, EngineError};
use crate::indicators::{IndicatorSeries, IndicatorState};

/// Everything the engine produced for one bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarOutcome {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub indicators: IndicatorState,
    pub signal: Option<SignalEvent>,
    pub upgrade: Option<ConfirmationUpgrade>,
    pub exit: Option<ExitEvent>,
}

/// The signal-and-exit engine. Feed it closed bars in order; it hands back
/// a [`BarOutcome`] per bar.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    bars: Vec<Bar>,
    series: IndicatorSeries,
    signal_state: SignalState,
    classifier: ConfirmationClassifier,
    exits: ExitManager,
    warmup: WarmupState,
    position: Option<Position>,
}

impl Engine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier =
            ConfirmationClassifier::new(config.pre_lookback_bars, config.post_confirm_bars);
        let exits = ExitManager::from_config(&config);
        // +1: crossover detection needs the bar before the first eligible one.
        let warmup = WarmupState::new(config.warmup_bars() + 1);
        Ok(Self {
            config,
            bars: Vec::new(),
            series: IndicatorSeries::default(),
            signal_state: SignalState::default(),
            classifier,
            exits,
            warmup,
            position: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn signal_state(&self) -> &SignalState {
        &self.signal_state
    }

    /// True once enough bars have been seen for signals to fire.
    pub fn is_warm(&self) -> bool {
        self.warmup.is_warm()
    }

    /// Preload historical bars without running the signal machinery.
    ///
    /// Indicators and warm-up see the seeded bars on the next push. Whether
    /// debounce/cooldown see them depends on the mode: `Stateless`
    /// re-derives state from the full window (seeded bars included) on
    /// every push, `Incremental` starts its state at go-live.
    pub fn seed_history(&mut self, bars: &[Bar]) -> Result<(), EngineError> {
        for bar in bars {
            self.validate_bar(bar)?;
            self.bars.push(bar.clone());
            self.warmup.process_bar();
        }
        self.series = IndicatorSeries::compute(&self.bars, &self.config);
        Ok(())
    }

    /// Ingest one newly closed bar (live-loop convention).
    pub fn push_bar(&mut self, bar: Bar) -> Result<BarOutcome, EngineError> {
        self.validate_bar(&bar)?;
        self.bars.push(bar);
        self.series = IndicatorSeries::compute(&self.bars, &self.config);
        self.warmup.process_bar();

        let i = self.bars.len() - 1;
        if self.config.mode == UpdateMode::Stateless {
            self.signal_state = signal_gen::replay(&self.config, &self.bars, &self.series, i);
        }
        Ok(self.evaluate_bar(i))
    }

    /// Ingest a historical window (backtest convention). Fails fast when
    /// the total series stays shorter than the warm-up length.
    pub fn run_series(&mut self, bars: &[Bar]) -> Result<Vec<BarOutcome>, EngineError> {
        let required = self.config.warmup_bars();
        let actual = self.bars.len() + bars.len();
        if actual < required {
            return Err(EngineError::SeriesTooShort { required, actual });
        }
        bars.iter().map(|bar| self.push_bar(bar.clone())).collect()
    }

    fn validate_bar(&self, bar: &Bar) -> Result<(), EngineError> {
        if bar.is_void() {
            return Err(EngineError::MalformedBar {
                timestamp: bar.timestamp,
                reason: "NaN in OHLC fields".into(),
            });
        }
        if !bar.is_sane() {
            return Err(EngineError::MalformedBar {
                timestamp: bar.timestamp,
                reason: "inconsistent OHLC range".into(),
            });
        }
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(EngineError::NonIncreasingTimestamp {
                    prev: last.timestamp,
                    next: bar.timestamp,
                });
            }
        }
        Ok(())
    }

    fn evaluate_bar(&mut self, i: usize) -> BarOutcome {
        let bar = self.bars[i].clone();
        let state = self.series.state_at(i);
        let mut exit = None;

        // 1. Open-position management against resting levels.
        if let Some(mut pos) = self.position.take() {
            if let Some(event) = self.exits.check_exit(&pos, i, &bar) {
                exit = Some(event);
            } else {
                self.exits.update_trailing(&mut pos, &bar, state.atr);
                self.position = Some(pos);
            }
        }

        // 2. Confirmation bookkeeping advances every bar.
        let upgrade = if self.config.use_ema_confirmation {
            self.classifier.on_bar(i, state.trend_cross, bar.timestamp)
        } else {
            None
        };

        // 3. Entry signal and position lifecycle.
        let mut signal = None;
        if let Some(direction) = signal_gen::evaluate_bar(
            &self.config,
            &self.bars,
            &self.series,
            i,
            &mut self.signal_state,
        ) {
            let confirmation = self
                .config
                .use_ema_confirmation
                .then(|| self.classifier.classify(i, direction));
            let (stop_loss, take_profit) = initial_levels(
                direction,
                bar.close,
                state.atr,
                self.config.atr_sl_mult,
                self.config.atr_risk_reward,
            );
            signal = Some(SignalEvent {
                bar_index: i,
                timestamp: bar.timestamp,
                symbol: bar.symbol.clone(),
                direction,
                entry_price: bar.close,
                stop_loss,
                take_profit,
                confirmation,
            });

            match self.position.as_ref().map(|p| p.side) {
                None => {
                    self.position = Some(self.exits.open(i, &bar, direction, state.atr));
                }
                Some(side) if side != direction => match self.config.opposite_signal {
                    OppositeSignalPolicy::Ignore => {}
                    OppositeSignalPolicy::CloseAndReverse => {
                        exit = Some(ExitEvent {
                            bar_index: i,
                            timestamp: bar.timestamp,
                            side,
                            price: bar.close,
                            reason: ExitReason::Reversal,
                        });
                        self.position = Some(self.exits.open(i, &bar, direction, state.atr));
                    }
                },
                Some(_) => {}
            }
        }

        BarOutcome {
            bar_index: i,
            timestamp: bar.timestamp,
            indicators: state,
            signal,
            upgrade,
            exit,
        }
    }
}
