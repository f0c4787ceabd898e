//! Builder for declaring transitions.

use crate::builder::error::ConfigIssue;
use crate::core::{Action, BoxError, Event, Guard, State, TransitionContext, TransitionKind};
use crate::table::Transition;

/// Fluent declaration of one transition.
///
/// Missing parts are reported by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build) together
/// with every other configuration issue.
pub struct TransitionBuilder<S: State, E: Event> {
    source: Option<S>,
    target: Option<S>,
    event: Option<E>,
    kind: TransitionKind,
    name: Option<String>,
    guard: Option<Guard<S, E>>,
    action: Option<Action<S, E>>,
}

impl<S: State, E: Event> TransitionBuilder<S, E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            target: None,
            event: None,
            kind: TransitionKind::External,
            name: None,
            guard: None,
            action: None,
        }
    }

    /// Set the source state (required).
    pub fn source(mut self, state: S) -> Self {
        self.source = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn target(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn event(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Make this an internal transition: no exit or entry, state unchanged.
    ///
    /// Sets the target to the source when no target was given.
    pub fn internal(mut self) -> Self {
        self.kind = TransitionKind::Internal;
        if self.target.is_none() {
            self.target = self.source.clone();
        }
        self
    }

    /// Name used in logs and diagnostics.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<S, E>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a fallible guard using a closure (optional).
    pub fn try_when<F, Err>(self, predicate: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> Result<bool, Err> + Send + Sync + 'static,
        Err: Into<BoxError>,
    {
        self.guard(Guard::try_new(predicate))
    }

    /// Set the action run when the transition fires (optional).
    pub fn action<F, Err>(self, hook: F) -> Self
    where
        F: Fn(&TransitionContext<'_, S, E>) -> Result<(), Err> + Send + Sync + 'static,
        Err: Into<BoxError>,
    {
        self.with_action(Action::new(hook))
    }

    /// Set a pre-built action (optional).
    pub fn with_action(mut self, action: Action<S, E>) -> Self {
        self.action = Some(action);
        self
    }

    /// Compile into a transition, or report which required parts are missing.
    pub(crate) fn compile(self, index: usize) -> Result<Transition<S, E>, Vec<ConfigIssue>> {
        let mut missing = Vec::new();
        if self.source.is_none() {
            missing.push(ConfigIssue::MissingSource { index });
        }
        if self.target.is_none() {
            missing.push(ConfigIssue::MissingTarget { index });
        }
        if self.event.is_none() {
            missing.push(ConfigIssue::MissingEvent { index });
        }

        match (self.source, self.target, self.event) {
            (Some(source), Some(target), Some(event)) => Ok(Transition {
                source,
                target,
                event,
                kind: self.kind,
                name: self.name,
                guard: self.guard,
                action: self.action,
            }),
            _ => Err(missing),
        }
    }
}

impl<S: State, E: Event> Default for TransitionBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
