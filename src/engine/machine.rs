//! State machine instance that dispatches events against a transition table.

use crate::core::{Event, Payload, State, StateHistory, StateTransition, TransitionKind};
use crate::engine::config::MachineConfig;
use crate::engine::error::{EngineError, FailedHook};
use crate::engine::result::{EventResult, MachineStatus};
use crate::listener::{Hook, Listener, ListenerError, ListenerRegistry};
use crate::table::TransitionTable;
use chrono::Utc;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, debug_span, trace, warn};
use uuid::Uuid;

/// A running instance of a machine definition.
///
/// Owns its current state, listeners, and history. The transition table is
/// shared and never modified, so any number of machines can run the same
/// definition independently.
///
/// Construction enters the initial state: the machine is `Ready` as soon as
/// the constructor returns. Listeners that must observe the initial
/// `on_state_entry` are passed to [`with_listeners`](Self::with_listeners).
///
/// Dispatch takes `&mut self`: one event is processed at a time, start to
/// finish, on the caller's thread. Share a machine across threads behind a
/// `Mutex` if needed.
pub struct StateMachine<S: State, E: Event> {
    table: Arc<TransitionTable<S, E>>,
    config: MachineConfig,
    uuid: Uuid,
    status: MachineStatus,
    completed: bool,
    current: S,
    listeners: ListenerRegistry<S, E>,
    history: StateHistory<S, E>,
    startup_warnings: Vec<ListenerError>,
}

impl<S: State, E: Event> StateMachine<S, E> {
    /// Create a `Ready` machine in the table's initial state with default options.
    pub fn new(table: impl Into<Arc<TransitionTable<S, E>>>) -> Self {
        Self::with_config(table, MachineConfig::default())
    }

    pub fn with_config(
        table: impl Into<Arc<TransitionTable<S, E>>>,
        config: MachineConfig,
    ) -> Self {
        Self::with_listeners(table, config, ListenerRegistry::new())
    }

    /// Create a machine whose listeners observe `on_machine_started` and the
    /// initial `on_state_entry`.
    ///
    /// Listener failures during construction are kept in
    /// [`startup_warnings`](Self::startup_warnings).
    pub fn with_listeners(
        table: impl Into<Arc<TransitionTable<S, E>>>,
        config: MachineConfig,
        listeners: ListenerRegistry<S, E>,
    ) -> Self {
        let table = table.into();
        let current = table.initial().clone();
        let mut machine = Self {
            table,
            config,
            uuid: Uuid::new_v4(),
            status: MachineStatus::Uninitialized,
            completed: false,
            current,
            listeners,
            history: StateHistory::new(),
            startup_warnings: Vec::new(),
        };
        machine.enter_initial();
        machine
    }

    /// Register a listener for subsequent events. It does not observe the
    /// initial state entry; pass such listeners to
    /// [`with_listeners`](Self::with_listeners).
    pub fn register<L>(&mut self, listener: L)
    where
        L: Listener<S, E> + 'static,
    {
        self.listeners.register(listener);
    }

    pub fn register_boxed(&mut self, listener: Box<dyn Listener<S, E>>) {
        self.listeners.register_boxed(listener);
    }

    /// Submit an event without payload.
    pub fn send_event(&mut self, event: E) -> Result<EventResult, EngineError> {
        self.dispatch(event, None)
    }

    /// Submit an event with a payload visible to guards, actions, and listeners.
    pub fn send_event_with<P>(&mut self, event: E, payload: P) -> Result<EventResult, EngineError>
    where
        P: Any + Send + Sync,
    {
        self.dispatch(event, Some(Arc::new(payload)))
    }

    /// Submit an event with an already shared payload.
    pub fn send_event_payload(
        &mut self,
        event: E,
        payload: Payload,
    ) -> Result<EventResult, EngineError> {
        self.dispatch(event, Some(payload))
    }

    /// Stop accepting events. Stopping twice is a no-op.
    pub fn stop(&mut self) -> Vec<ListenerError> {
        let mut warnings = Vec::new();
        if self.status != MachineStatus::Stopped {
            self.halt(&mut warnings);
        }
        warnings
    }

    pub fn current_state(&self) -> &S {
        &self.current
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == MachineStatus::Ready
    }

    /// Whether the machine stopped itself by entering a final state.
    ///
    /// A manual [`stop`](Self::stop) never counts as completion.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Application-assigned identifier from the config.
    pub fn id(&self) -> Option<&str> {
        self.config.machine_id.as_deref()
    }

    /// Identifier unique to this instance.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn history(&self) -> &StateHistory<S, E> {
        &self.history
    }

    pub fn table(&self) -> &Arc<TransitionTable<S, E>> {
        &self.table
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listener failures raised while entering the initial state.
    pub fn startup_warnings(&self) -> &[ListenerError] {
        &self.startup_warnings
    }

    fn enter_initial(&mut self) {
        self.status = MachineStatus::Ready;

        let mut warnings = Vec::new();
        let initial = &self.current;
        self.listeners
            .notify(Hook::MachineStarted, &mut warnings, |l| l.on_machine_started(initial));
        self.listeners
            .notify(Hook::StateEntry, &mut warnings, |l| l.on_state_entry(initial));
        self.startup_warnings = warnings;

        debug!(
            machine = %self.uuid,
            id = self.config.machine_id.as_deref().unwrap_or(""),
            initial = self.current.name(),
            "state machine started"
        );
    }

    fn dispatch(&mut self, event: E, payload: Option<Payload>) -> Result<EventResult, EngineError> {
        if self.status == MachineStatus::Stopped {
            return Err(EngineError::MachineStopped {
                state: self.current.name().to_string(),
            });
        }

        let span = debug_span!("send_event", machine = %self.uuid, event = event.name());
        let _entered = span.enter();

        self.status = MachineStatus::Processing;
        let outcome = self.resolve_and_fire(&event, payload.as_ref());
        if self.status == MachineStatus::Processing {
            self.status = MachineStatus::Ready;
        }
        outcome
    }

    fn resolve_and_fire(
        &mut self,
        event: &E,
        payload: Option<&Payload>,
    ) -> Result<EventResult, EngineError> {
        let table = Arc::clone(&self.table);
        let machine_id = self.config.machine_id.clone();
        let machine_id = machine_id.as_deref();
        let mut warnings = Vec::new();

        let mut enabled = Vec::new();
        for candidate in table.candidates(&self.current, event) {
            match candidate.accepts(&candidate.context(payload, machine_id)) {
                Ok(true) => enabled.push(candidate),
                Ok(false) => {}
                Err(source) => {
                    warn!(transition = %candidate.label(), error = %source, "guard failed");
                    return Err(EngineError::ActionExecution {
                        transition: candidate.label(),
                        hook: FailedHook::Guard,
                        source,
                        warnings,
                    });
                }
            }
        }

        let transition = match enabled.as_slice() {
            [] => {
                trace!(state = self.current.name(), "event not accepted");
                let current = &self.current;
                self.listeners.notify(Hook::EventNotAccepted, &mut warnings, |l| {
                    l.on_event_not_accepted(current, event)
                });
                return Ok(EventResult::not_accepted(warnings));
            }
            [single] => *single,
            many => {
                let candidates: Vec<String> = many.iter().map(|t| t.label()).collect();
                warn!(
                    state = self.current.name(),
                    candidates = ?candidates,
                    "ambiguous transition"
                );
                return Err(EngineError::AmbiguousTransition {
                    state: self.current.name().to_string(),
                    event: event.name().to_string(),
                    candidates,
                });
            }
        };

        let ctx = transition.context(payload, machine_id);
        self.listeners
            .notify(Hook::TransitionStart, &mut warnings, |l| l.on_transition_start(&ctx));

        if let Some(action) = &transition.action {
            if let Err(source) = action.execute(&ctx) {
                warn!(transition = %transition.label(), error = %source, "action failed");
                return Err(EngineError::ActionExecution {
                    transition: transition.label(),
                    hook: FailedHook::Action,
                    source,
                    warnings,
                });
            }
        }

        if transition.kind == TransitionKind::External {
            self.listeners.notify(Hook::StateExit, &mut warnings, |l| {
                l.on_state_exit(&transition.source)
            });
            self.current = transition.target.clone();
            self.listeners.notify(Hook::StateEntry, &mut warnings, |l| {
                l.on_state_entry(&transition.target)
            });
        }

        self.listeners
            .notify(Hook::TransitionEnd, &mut warnings, |l| l.on_transition_end(&ctx));

        self.history.push(
            StateTransition {
                from: transition.source.clone(),
                to: transition.target.clone(),
                event: event.clone(),
                timestamp: Utc::now(),
            },
            self.config.history_limit,
        );
        debug!(transition = %transition.label(), "transition fired");

        if transition.kind == TransitionKind::External
            && self.config.complete_on_final
            && self.current.is_final()
        {
            self.completed = true;
            self.halt(&mut warnings);
        }

        Ok(EventResult::accepted(warnings))
    }

    fn halt(&mut self, warnings: &mut Vec<ListenerError>) {
        self.status = MachineStatus::Stopped;
        let current = &self.current;
        self.listeners
            .notify(Hook::MachineStopped, warnings, |l| l.on_machine_stopped(current));
        debug!(machine = %self.uuid, state = self.current.name(), "state machine stopped");
    }
}
