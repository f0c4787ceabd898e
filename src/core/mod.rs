//! Core state machine types.
//!
//! This module contains the vocabulary shared by every other layer:
//! - State and event definitions via the `State` and `Event` traits
//! - Guard predicates and transition actions
//! - The context passed to guards, actions, and listeners
//! - Immutable history tracking

mod context;
mod guard;
mod history;
mod state;

pub use context::{BoxError, Payload, TransitionContext, TransitionKind};
pub use guard::{Action, Guard};
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};
