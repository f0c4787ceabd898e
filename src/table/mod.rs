//! Immutable transition table.
//!
//! A [`TransitionTable`] maps `(source, event)` pairs to their candidate
//! transitions in declaration order. Resolution is one hash lookup followed
//! by a single pass over the (usually tiny) candidate list.
//!
//! Tables are built once by [`MachineBuilder`](crate::builder::MachineBuilder)
//! and shared read-only, typically behind an `Arc`, by any number of
//! [`StateMachine`](crate::engine::StateMachine) instances.

mod transition;

pub use crate::core::TransitionKind;
pub use transition::Transition;

use crate::core::{Event, State};
use std::collections::HashMap;
use std::fmt;

/// Immutable machine definition produced by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build).
///
/// Holds the declared states and events, the initial state, and every
/// transition keyed by `(source, event)` with candidates in declaration
/// order. Share it between machines with `Arc`.
pub struct TransitionTable<S: State, E: Event> {
    states: Vec<S>,
    events: Vec<E>,
    initial: S,
    transitions: HashMap<(S, E), Vec<Transition<S, E>>>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Assemble a table from already validated parts.
    pub(crate) fn from_parts(
        states: Vec<S>,
        events: Vec<E>,
        initial: S,
        declared: Vec<Transition<S, E>>,
    ) -> Self {
        let mut transitions: HashMap<(S, E), Vec<Transition<S, E>>> = HashMap::new();
        for t in declared {
            transitions
                .entry((t.source.clone(), t.event.clone()))
                .or_default()
                .push(t);
        }

        Self {
            states,
            events,
            initial,
            transitions,
        }
    }

    /// Candidate transitions for `(state, event)`, in declaration order.
    pub fn candidates(&self, state: &S, event: &E) -> &[Transition<S, E>] {
        // Keys are owned pairs, so the lookup needs one of its own.
        self.transitions
            .get(&(state.clone(), event.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Declared states in declaration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// Declared events in declaration order.
    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    pub fn contains_event(&self, event: &E) -> bool {
        self.events.contains(event)
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(Vec::len).sum()
    }

    /// Events with at least one transition out of `state`, in declaration order.
    pub fn events_from(&self, state: &S) -> Vec<&E> {
        self.events
            .iter()
            .filter(|e| !self.candidates(state, e).is_empty())
            .collect()
    }

    /// All transitions leaving `state`, ordered by event declaration.
    fn outgoing(&self, state: &S) -> Vec<&Transition<S, E>> {
        self.events
            .iter()
            .flat_map(|e| self.candidates(state, e).iter())
            .collect()
    }
}

/// Renders one line per state, in declaration order:
///
/// ```text
/// TransitionTable {
///   STATE1 (initial)
///     --EVENT1--> STATE2
///   STATE2
///     --EVENT2--> STATE1
/// }
/// ```
impl<S: State, E: Event> fmt::Display for TransitionTable<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TransitionTable {{")?;
        for state in &self.states {
            write!(f, "  {}", state.name())?;
            if *state == self.initial {
                write!(f, " (initial)")?;
            }
            if state.is_final() {
                write!(f, " (final)")?;
            }
            writeln!(f)?;

            for t in self.outgoing(state) {
                write!(f, "    --{}--> {}", t.event.name(), t.target.name())?;
                let mut notes = Vec::new();
                if t.kind == TransitionKind::Internal {
                    notes.push("internal");
                }
                if t.is_guarded() {
                    notes.push("guarded");
                }
                if t.action.is_some() {
                    notes.push("action");
                }
                if !notes.is_empty() {
                    write!(f, " [{}]", notes.join(", "))?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "}}")
    }
}

impl<S: State, E: Event> fmt::Debug for TransitionTable<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("states", &self.states)
            .field("events", &self.events)
            .field("initial", &self.initial)
            .field("transitions", &self.transition_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Door {
            Closed,
            Open,
            Locked,
        }
    }

    event_enum! {
        enum Cmd {
            Push,
            Pull,
            Lock,
        }
    }

    fn rule(source: Door, event: Cmd, target: Door) -> Transition<Door, Cmd> {
        Transition {
            source,
            target,
            event,
            kind: TransitionKind::External,
            name: None,
            guard: None,
            action: None,
        }
    }

    fn table() -> TransitionTable<Door, Cmd> {
        TransitionTable::from_parts(
            Door::all(),
            Cmd::all(),
            Door::Closed,
            vec![
                rule(Door::Closed, Cmd::Push, Door::Open),
                rule(Door::Open, Cmd::Pull, Door::Closed),
                rule(Door::Closed, Cmd::Lock, Door::Locked),
            ],
        )
    }

    #[test]
    fn candidates_are_indexed_by_source_and_event() {
        let table = table();

        let found = table.candidates(&Door::Closed, &Cmd::Push);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, Door::Open);

        assert!(table.candidates(&Door::Open, &Cmd::Push).is_empty());
        assert!(table.candidates(&Door::Locked, &Cmd::Pull).is_empty());
    }

    #[test]
    fn declaration_order_is_preserved() {
        let table = table();
        assert_eq!(table.states(), &[Door::Closed, Door::Open, Door::Locked]);
        assert_eq!(table.events(), &[Cmd::Push, Cmd::Pull, Cmd::Lock]);
        assert_eq!(table.initial(), &Door::Closed);
        assert_eq!(table.transition_count(), 3);
    }

    #[test]
    fn events_from_lists_outgoing_triggers() {
        let table = table();
        assert_eq!(table.events_from(&Door::Closed), vec![&Cmd::Push, &Cmd::Lock]);
        assert!(table.events_from(&Door::Locked).is_empty());
    }

    #[test]
    fn membership_checks() {
        let table = TransitionTable::from_parts(
            vec![Door::Closed, Door::Open],
            vec![Cmd::Push],
            Door::Closed,
            vec![rule(Door::Closed, Cmd::Push, Door::Open)],
        );

        assert!(table.contains_state(&Door::Open));
        assert!(!table.contains_state(&Door::Locked));
        assert!(table.contains_event(&Cmd::Push));
        assert!(!table.contains_event(&Cmd::Lock));
    }

    #[test]
    fn display_renders_each_state() {
        let rendered = table().to_string();
        let expected = "TransitionTable {\n  \
                        Closed (initial)\n    \
                        --Push--> Open\n    \
                        --Lock--> Locked\n  \
                        Open\n    \
                        --Pull--> Closed\n  \
                        Locked\n\
                        }";
        assert_eq!(rendered, expected);
    }
}
