//! Compiled transition rules.

use crate::core::{
    Action, BoxError, Event, Guard, Payload, State, TransitionContext, TransitionKind,
};

/// A single `(source, event) -> target` rule with optional guard and action.
///
/// Transitions are produced by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build) and
/// never change afterwards.
#[derive(Clone, Debug)]
pub struct Transition<S: State, E: Event> {
    pub source: S,
    pub target: S,
    pub event: E,
    pub kind: TransitionKind,
    pub name: Option<String>,
    pub guard: Option<Guard<S, E>>,
    pub action: Option<Action<S, E>>,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Build the context this transition presents to hooks.
    pub fn context<'a>(
        &'a self,
        payload: Option<&'a Payload>,
        machine_id: Option<&'a str>,
    ) -> TransitionContext<'a, S, E> {
        TransitionContext {
            source: &self.source,
            target: &self.target,
            event: &self.event,
            kind: self.kind,
            name: self.name.as_deref(),
            payload,
            machine_id,
        }
    }

    /// Evaluate the guard; guardless transitions always pass.
    pub fn accepts(&self, ctx: &TransitionContext<'_, S, E>) -> Result<bool, BoxError> {
        match &self.guard {
            Some(guard) => guard.check(ctx),
            None => Ok(true),
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    /// Label used in diagnostics, the transition name when one was given.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{} --{}--> {}",
                self.source.name(),
                self.event.name(),
                self.target.name()
            ),
        }
    }
}
