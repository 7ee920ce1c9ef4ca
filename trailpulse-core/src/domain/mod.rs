//! Domain types for the signal-and-exit engine.

pub mod bar;
pub mod position;
pub mod signal;

pub use bar::Bar;
pub use position::Position;
pub use signal::{
    Confirmation, ConfirmationUpgrade, Direction, ExitEvent, ExitReason, SignalEvent,
};

/// Symbol type alias
pub type Symbol = String;
