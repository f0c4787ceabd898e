//! Builder API for declaring state machines.
//!
//! This module provides the two-phase [`MachineBuilder`], the fluent
//! [`TransitionBuilder`], and macros for declaring closed state and event
//! sets with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::{ConfigError, ConfigIssue};
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Event, State};

/// Declare an external transition `source --event--> target`.
///
/// Returns a [`TransitionBuilder`] so a guard, action, or name can be added.
///
/// # Example
///
/// ```
/// use statewise::builder::external;
/// use statewise::{event_enum, state_enum};
///
/// state_enum! {
///     enum MyState { Start, End }
///     final: [End]
/// }
///
/// event_enum! {
///     enum MyEvent { Finish }
/// }
///
/// let transition = external(MyState::Start, MyState::End, MyEvent::Finish).name("finish");
/// ```
pub fn external<S: State, E: Event>(source: S, target: S, event: E) -> TransitionBuilder<S, E> {
    TransitionBuilder::new()
        .source(source)
        .target(target)
        .event(event)
}

/// Declare an internal transition on `state`: the action runs but the state
/// is neither exited nor re-entered.
pub fn internal<S: State, E: Event>(state: S, event: E) -> TransitionBuilder<S, E> {
    TransitionBuilder::new().source(state).event(event).internal()
}
