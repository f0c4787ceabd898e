//! Ordered listener registry.

use super::error::{Hook, ListenerError};
use super::Listener;
use crate::core::{BoxError, Event, State};
use tracing::warn;

/// Listeners of one machine, in registration order.
pub struct ListenerRegistry<S: State, E: Event> {
    listeners: Vec<Box<dyn Listener<S, E>>>,
}

impl<S: State, E: Event> ListenerRegistry<S, E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Append a listener; it is notified after every listener registered before it.
    pub fn register<L>(&mut self, listener: L)
    where
        L: Listener<S, E> + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: Listener<S, E> + 'static,
    {
        self.register(listener);
        self
    }

    pub fn register_boxed(&mut self, listener: Box<dyn Listener<S, E>>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Call `notify` on every listener in order, collecting failures into `warnings`.
    pub fn notify<F>(&mut self, hook: Hook, warnings: &mut Vec<ListenerError>, mut notify: F)
    where
        F: FnMut(&mut dyn Listener<S, E>) -> Result<(), BoxError>,
    {
        for listener in self.listeners.iter_mut() {
            if let Err(source) = notify(listener.as_mut()) {
                let name = listener.name().to_string();
                warn!(listener = %name, %hook, error = %source, "listener failed");
                warnings.push(ListenerError {
                    listener: name,
                    hook,
                    source,
                });
            }
        }
    }
}

impl<S: State, E: Event> Default for ListenerRegistry<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
