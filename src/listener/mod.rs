//! Observers notified of machine lifecycle and transitions.
//!
//! Implement [`Listener`] for a type and register it with
//! [`StateMachine::register`](crate::engine::StateMachine::register), or use
//! [`StateCallbacks`] to bind closures to particular states.
//!
//! Listeners are called synchronously, in registration order, on the thread
//! that submitted the event. A failing listener does not stop the others and
//! does not affect the transition; its error is reported as a warning.

mod callbacks;
mod error;
mod registry;

pub use callbacks::StateCallbacks;
pub use error::{Hook, ListenerError};
pub use registry::ListenerRegistry;

use crate::core::{BoxError, Event, State, TransitionContext};

/// Observer of a single machine.
///
/// Every hook has a no-op default, so implementors only override what they
/// need.
///
/// # Example
///
/// ```rust
/// use statewise::core::{BoxError, State};
/// use statewise::listener::Listener;
/// use statewise::{event_enum, state_enum};
///
/// state_enum! {
///     enum Phase { Idle, Active }
/// }
///
/// event_enum! {
///     enum Signal { Wake }
/// }
///
/// #[derive(Default)]
/// struct EntryLog(Vec<String>);
///
/// impl Listener<Phase, Signal> for EntryLog {
///     fn on_state_entry(&mut self, state: &Phase) -> Result<(), BoxError> {
///         self.0.push(state.name().to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Listener<S: State, E: Event>: Send {
    /// Name reported in [`ListenerError`]s.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// A state was entered, including the initial state on start.
    fn on_state_entry(&mut self, _state: &S) -> Result<(), BoxError> {
        Ok(())
    }

    /// A state was exited by an external transition.
    fn on_state_exit(&mut self, _state: &S) -> Result<(), BoxError> {
        Ok(())
    }

    /// A transition was selected and is about to run its action.
    fn on_transition_start(
        &mut self,
        _transition: &TransitionContext<'_, S, E>,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// A transition completed and the current state is now its target.
    fn on_transition_end(
        &mut self,
        _transition: &TransitionContext<'_, S, E>,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// An event matched no transition from `state`.
    fn on_event_not_accepted(&mut self, _state: &S, _event: &E) -> Result<(), BoxError> {
        Ok(())
    }

    /// The machine started in `initial`.
    fn on_machine_started(&mut self, _initial: &S) -> Result<(), BoxError> {
        Ok(())
    }

    /// The machine stopped while in `state`.
    fn on_machine_stopped(&mut self, _state: &S) -> Result<(), BoxError> {
        Ok(())
    }
}
