//! Per-machine runtime options.

use serde::{Deserialize, Serialize};

/// Fired transitions kept in history unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Options for a [`StateMachine`](crate::engine::StateMachine) instance.
///
/// Deserializable so it can be embedded in an application's own
/// configuration; unspecified fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Application-assigned identifier, exposed to hooks and logs.
    pub machine_id: Option<String>,

    /// Maximum number of fired transitions kept in history; unbounded when `None`.
    ///
    /// Defaults to [`DEFAULT_HISTORY_LIMIT`].
    pub history_limit: Option<usize>,

    /// Stop the machine once an external transition enters a final state.
    pub complete_on_final: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            machine_id: None,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            complete_on_final: true,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn machine_id(mut self, id: impl Into<String>) -> Self {
        self.machine_id = Some(id.into());
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Keep every fired transition. Memory grows with the number of events.
    pub fn unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }

    pub fn complete_on_final(mut self, enabled: bool) -> Self {
        self.complete_on_final = enabled;
        self
    }
}
