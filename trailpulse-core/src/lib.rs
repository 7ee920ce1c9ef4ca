//! TrailPulse Core — the signal-and-exit engine behind the trading bots.
//!
//! Ingests an ordered sequence of OHLCV bars and produces directional entry
//! signals graded by trend-confirmation strength, plus continuously updated
//! volatility-adaptive stop-loss/take-profit levels for the one position an
//! engine instance manages:
//!
//! - Domain types (bars, positions, signal/exit events)
//! - Pure indicator calculators (ATR, EMA, trailing stop line, SuperTrend,
//!   crossover detection)
//! - Entry signal state machine with flip-debounce and time cooldown
//! - Confirmation classifier (pre/post/weak grading against EMA crossovers)
//! - Exit manager with ratcheting adaptive trailing stop and tiered target
//!
//! Exchange I/O, order placement, sizing, persistence, and notification are
//! external collaborators; the engine is synchronous, single-threaded, and
//! deterministic (cooldown time comes from bar timestamps, never the clock).

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
