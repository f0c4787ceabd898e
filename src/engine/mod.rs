//! Event dispatch over a built transition table.
//!
//! A [`StateMachine`] owns one instance's current state, listeners, and
//! history, and shares its [`TransitionTable`](crate::table::TransitionTable)
//! with any other instance built from the same definition.

mod config;
mod error;
mod machine;
mod result;

pub use config::{MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use error::{EngineError, FailedHook};
pub use machine::StateMachine;
pub use result::{EventResult, MachineStatus};
