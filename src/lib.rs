//! Statewise: a strongly-typed flat state machine runtime
//!
//! States and events are closed enumerations. Transitions between them are
//! declared once with a [`MachineBuilder`], validated as a whole, and frozen
//! into an immutable [`TransitionTable`]. Any number of [`StateMachine`]
//! instances can then run that table, each with its own current state,
//! listeners, and history.
//!
//! # Core Concepts
//!
//! - **State / Event**: Type-safe identifiers via the `State` and `Event` traits
//! - **Guards**: Predicates that decide whether a candidate transition may fire
//! - **Actions**: Hooks run when a transition fires, before the state changes
//! - **Listeners**: Observers of entries, exits, and transitions
//! - **History**: Record of every fired transition
//!
//! # Example
//!
//! ```rust
//! use statewise::builder::external;
//! use statewise::{event_enum, state_enum, MachineBuilder, StateMachine};
//!
//! state_enum! {
//!     pub enum States { State1, State2 }
//! }
//!
//! event_enum! {
//!     pub enum Events { Event1, Event2 }
//! }
//!
//! let table = MachineBuilder::new()
//!     .states(States::all(), States::State1)
//!     .events(Events::all())
//!     .transition(external(States::State1, States::State2, Events::Event1))
//!     .transition(external(States::State2, States::State1, Events::Event2))
//!     .build()
//!     .unwrap();
//!
//! // Construction enters the initial state.
//! let mut machine = StateMachine::new(table);
//! assert_eq!(machine.current_state(), &States::State1);
//!
//! assert!(machine.send_event(Events::Event1).unwrap().accepted);
//! assert_eq!(machine.current_state(), &States::State2);
//!
//! // No transition from State2 on Event1: ignored, state unchanged.
//! assert!(!machine.send_event(Events::Event1).unwrap().accepted);
//! assert_eq!(machine.current_state(), &States::State2);
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod listener;
pub mod table;

// Re-export commonly used types
pub use builder::{ConfigError, MachineBuilder, TransitionBuilder};
pub use core::{Action, Event, Guard, State, StateHistory, StateTransition, TransitionContext};
pub use engine::{EngineError, EventResult, MachineConfig, MachineStatus, StateMachine};
pub use listener::{Listener, StateCallbacks};
pub use table::TransitionTable;
