//! Guard predicates and transition actions.
//!
//! Guards are predicates that decide at dispatch time whether a candidate
//! transition may fire. Actions are the side-effecting hooks run when it does.
//! Both are reference counted so a built transition table can be shared
//! read-only between machines and threads.

use super::context::{BoxError, TransitionContext};
use super::state::{Event, State};
use std::fmt;
use std::sync::Arc;

type Predicate<S, E> =
    dyn Fn(&TransitionContext<'_, S, E>) -> Result<bool, BoxError> + Send + Sync;

type Hook<S, E> = dyn Fn(&TransitionContext<'_, S, E>) -> Result<(), BoxError> + Send + Sync;

/// Predicate that determines if a candidate transition can fire.
///
/// # Example
///
/// ```rust
/// use statewise::core::{Guard, TransitionContext, TransitionKind};
/// use statewise::{event_enum, state_enum};
///
/// state_enum! {
///     enum Task { Pending, Running }
/// }
///
/// event_enum! {
///     enum Cmd { Run }
/// }
///
/// let only_named = Guard::new(|ctx: &TransitionContext<'_, Task, Cmd>| ctx.name.is_some());
///
/// let ctx = TransitionContext {
///     source: &Task::Pending,
///     target: &Task::Running,
///     event: &Cmd::Run,
///     kind: TransitionKind::External,
///     name: Some("start"),
///     payload: None,
///     machine_id: None,
/// };
///
/// assert!(only_named.check(&ctx).unwrap());
/// ```
pub struct Guard<S: State, E: Event> {
    predicate: Arc<Predicate<S, E>>,
}

impl<S: State, E: Event> Guard<S, E> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(
                move |ctx: &TransitionContext<'_, S, E>| -> Result<bool, BoxError> {
                    Ok(predicate(ctx))
                },
            ),
        }
    }

    /// Create a guard whose evaluation can fail.
    ///
    /// A failing guard aborts the dispatch with an action execution error
    /// and leaves the machine in its prior state.
    pub fn try_new<F, Err>(predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> Result<bool, Err> + Send + Sync + 'static,
        Err: Into<BoxError>,
    {
        Guard {
            predicate: Arc::new(
                move |ctx: &TransitionContext<'_, S, E>| -> Result<bool, BoxError> {
                    predicate(ctx).map_err(Into::into)
                },
            ),
        }
    }

    /// Evaluate the guard against a candidate transition.
    pub fn check(&self, ctx: &TransitionContext<'_, S, E>) -> Result<bool, BoxError> {
        (self.predicate)(ctx)
    }
}

impl<S: State, E: Event> Clone for Guard<S, E> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Guard<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

/// Side-effecting hook executed when a transition fires.
///
/// Actions run synchronously before the current state changes, so a failing
/// action never leaves the machine half-transitioned.
pub struct Action<S: State, E: Event> {
    hook: Arc<Hook<S, E>>,
}

impl<S: State, E: Event> Action<S, E> {
    /// Create an action from a fallible closure.
    pub fn new<F, Err>(hook: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> Result<(), Err> + Send + Sync + 'static,
        Err: Into<BoxError>,
    {
        Action {
            hook: Arc::new(
                move |ctx: &TransitionContext<'_, S, E>| -> Result<(), BoxError> {
                    hook(ctx).map_err(Into::into)
                },
            ),
        }
    }

    /// Create an action that cannot fail.
    pub fn infallible<F>(hook: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) + Send + Sync + 'static,
    {
        Action {
            hook: Arc::new(
                move |ctx: &TransitionContext<'_, S, E>| -> Result<(), BoxError> {
                    hook(ctx);
                    Ok(())
                },
            ),
        }
    }

    pub fn execute(&self, ctx: &TransitionContext<'_, S, E>) -> Result<(), BoxError> {
        (self.hook)(ctx)
    }
}

impl<S: State, E: Event> Clone for Action<S, E> {
    fn clone(&self) -> Self {
        Self {
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Action<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
