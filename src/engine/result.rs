//! Engine status and dispatch results.

use crate::listener::ListenerError;
use serde::{Deserialize, Serialize};

/// Lifecycle of a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatus {
    /// Not yet in its initial state.
    ///
    /// Internal only: constructors return a machine that is already `Ready`,
    /// so [`StateMachine::status`](crate::engine::StateMachine::status) never
    /// reports this.
    Uninitialized,
    /// Waiting for events.
    Ready,
    /// Resolving or firing a transition.
    Processing,
    /// No further events are accepted.
    Stopped,
}

/// Outcome of a successful `send_event()` call.
#[derive(Debug)]
#[must_use]
pub struct EventResult {
    /// Whether a transition fired.
    pub accepted: bool,
    /// Listener failures observed during the call.
    pub warnings: Vec<ListenerError>,
}

impl EventResult {
    pub(crate) fn accepted(warnings: Vec<ListenerError>) -> Self {
        Self {
            accepted: true,
            warnings,
        }
    }

    pub(crate) fn not_accepted(warnings: Vec<ListenerError>) -> Self {
        Self {
            accepted: false,
            warnings,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
