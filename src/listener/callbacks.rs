//! Closure callbacks keyed by state.

use super::Listener;
use crate::core::{BoxError, Event, State, TransitionContext};
use std::collections::HashMap;

type StateCallback<S> = Box<dyn FnMut(&S) -> Result<(), BoxError> + Send>;
type TransitionCallback<S, E> =
    Box<dyn FnMut(&TransitionContext<'_, S, E>) -> Result<(), BoxError> + Send>;

/// Listener that dispatches to closures bound to particular states.
///
/// Callbacks are looked up by state value when the hook fires; states with
/// nothing bound cost one map lookup.
///
/// # Example
///
/// ```rust
/// use statewise::listener::StateCallbacks;
/// use statewise::{event_enum, state_enum};
///
/// state_enum! {
///     enum States { State1, State2 }
/// }
///
/// event_enum! {
///     enum Events { Event1 }
/// }
///
/// let callbacks: StateCallbacks<States, Events> = StateCallbacks::new("my-bean")
///     .on_entry(States::State1, |_| println!("entered STATE1"))
///     .on_transition_to(States::State2, |ctx| {
///         println!("moved to STATE2 on {:?}", ctx.event);
///         Ok::<(), std::io::Error>(())
///     });
/// ```
pub struct StateCallbacks<S: State, E: Event> {
    name: String,
    entry: HashMap<S, Vec<StateCallback<S>>>,
    exit: HashMap<S, Vec<StateCallback<S>>>,
    transition_to: HashMap<S, Vec<TransitionCallback<S, E>>>,
}

impl<S: State, E: Event> StateCallbacks<S, E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry: HashMap::new(),
            exit: HashMap::new(),
            transition_to: HashMap::new(),
        }
    }

    /// Run `callback` whenever `state` is entered, including as the initial state.
    pub fn on_entry<F>(self, state: S, mut callback: F) -> Self
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.try_on_entry(state, move |s: &S| -> Result<(), BoxError> {
            callback(s);
            Ok(())
        })
    }

    /// Fallible variant of [`on_entry`](Self::on_entry).
    pub fn try_on_entry<F, Err>(mut self, state: S, mut callback: F) -> Self
    where
        F: FnMut(&S) -> Result<(), Err> + Send + 'static,
        Err: Into<BoxError>,
    {
        self.entry
            .entry(state)
            .or_default()
            .push(Box::new(move |s: &S| -> Result<(), BoxError> {
                callback(s).map_err(Into::into)
            }));
        self
    }

    /// Run `callback` whenever `state` is exited.
    pub fn on_exit<F>(mut self, state: S, mut callback: F) -> Self
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.exit
            .entry(state)
            .or_default()
            .push(Box::new(move |s: &S| -> Result<(), BoxError> {
                callback(s);
                Ok(())
            }));
        self
    }

    /// Run `callback` after every transition whose target is `target`.
    ///
    /// Internal transitions count when their state is `target`. The initial
    /// entry on start is not a transition; bind it with [`on_entry`](Self::on_entry).
    pub fn on_transition_to<F, Err>(mut self, target: S, mut callback: F) -> Self
    where
        F: FnMut(&TransitionContext<'_, S, E>) -> Result<(), Err> + Send + 'static,
        Err: Into<BoxError>,
    {
        self.transition_to.entry(target).or_default().push(Box::new(
            move |ctx: &TransitionContext<'_, S, E>| -> Result<(), BoxError> {
                callback(ctx).map_err(Into::into)
            },
        ));
        self
    }
}

/// Run every callback even after one fails; the first error is reported.
fn run_all<S>(callbacks: Option<&mut Vec<StateCallback<S>>>, arg: &S) -> Result<(), BoxError> {
    let mut first_error = None;
    for callback in callbacks.into_iter().flatten() {
        if let Err(err) = callback(arg) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn run_transition_callbacks<S: State, E: Event>(
    callbacks: Option<&mut Vec<TransitionCallback<S, E>>>,
    ctx: &TransitionContext<'_, S, E>,
) -> Result<(), BoxError> {
    let mut first_error = None;
    for callback in callbacks.into_iter().flatten() {
        if let Err(err) = callback(ctx) {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

impl<S: State, E: Event> Listener<S, E> for StateCallbacks<S, E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_state_entry(&mut self, state: &S) -> Result<(), BoxError> {
        run_all(self.entry.get_mut(state), state)
    }

    fn on_state_exit(&mut self, state: &S) -> Result<(), BoxError> {
        run_all(self.exit.get_mut(state), state)
    }

    fn on_transition_end(
        &mut self,
        transition: &TransitionContext<'_, S, E>,
    ) -> Result<(), BoxError> {
        run_transition_callbacks(self.transition_to.get_mut(transition.target), transition)
    }
}
