//! Context handed to guards, actions, and transition listeners.

use super::state::{Event, State};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

/// Boxed error returned by fallible user hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque data attached to a single event submission.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// How a transition treats its source state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransitionKind {
    /// Exit the source and enter the target, even when they are the same state.
    #[default]
    External,

    /// Stay in the source state without exit or entry notifications.
    Internal,
}

/// Borrowed view of a transition while it is being resolved or fired.
pub struct TransitionContext<'a, S: State, E: Event> {
    pub source: &'a S,
    pub target: &'a S,
    pub event: &'a E,
    pub kind: TransitionKind,
    pub name: Option<&'a str>,
    pub payload: Option<&'a Payload>,
    pub machine_id: Option<&'a str>,
}

impl<'a, S: State, E: Event> TransitionContext<'a, S, E> {
    /// Downcast the submission payload, if any, to a concrete type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewise::core::{Payload, TransitionContext, TransitionKind};
    /// use statewise::{event_enum, state_enum};
    /// use std::sync::Arc;
    ///
    /// state_enum! {
    ///     enum Light { Off, On }
    /// }
    ///
    /// event_enum! {
    ///     enum Switch { Flip }
    /// }
    ///
    /// let payload: Payload = Arc::new(42u32);
    /// let ctx = TransitionContext {
    ///     source: &Light::Off,
    ///     target: &Light::On,
    ///     event: &Switch::Flip,
    ///     kind: TransitionKind::External,
    ///     name: None,
    ///     payload: Some(&payload),
    ///     machine_id: None,
    /// };
    ///
    /// assert_eq!(ctx.payload_as::<u32>(), Some(&42));
    /// assert_eq!(ctx.payload_as::<String>(), None);
    /// ```
    pub fn payload_as<T: Any>(&self) -> Option<&'a T> {
        self.payload.and_then(|p| p.downcast_ref::<T>())
    }

    /// Whether this transition changes the current state.
    pub fn changes_state(&self) -> bool {
        self.kind == TransitionKind::External
    }

    /// Human-readable label, `SOURCE --EVENT--> TARGET`.
    pub fn label(&self) -> String {
        format!(
            "{} --{}--> {}",
            self.source.name(),
            self.event.name(),
            self.target.name()
        )
    }
}
