//! Property-based tests for building and running state machines.
//!
//! These tests use proptest to verify dispatch properties hold across
//! many randomly generated tables and event sequences.

use proptest::prelude::*;
use statewise::builder::{external, internal};
use statewise::core::{BoxError, TransitionContext};
use statewise::{
    event_enum, state_enum, EngineError, MachineBuilder, MachineConfig, MachineStatus,
    StateMachine, TransitionTable,
};
use std::collections::BTreeMap;
use std::sync::Arc;

state_enum! {
    enum Node {
        A,
        B,
        C,
        D,
    }
}

event_enum! {
    enum Signal {
        X,
        Y,
        Z,
    }
}

type Ctx<'a> = TransitionContext<'a, Node, Signal>;

const STATES: [Node; 4] = [Node::A, Node::B, Node::C, Node::D];
const SIGNALS: [Signal; 3] = [Signal::X, Signal::Y, Signal::Z];

fn is_odd(ctx: &Ctx<'_>) -> bool {
    ctx.payload_as::<u8>().is_some_and(|n| n % 2 == 1)
}

fn is_even(ctx: &Ctx<'_>) -> bool {
    ctx.payload_as::<u8>().is_some_and(|n| n % 2 == 0)
}

/// Mixed table: guarded branches, an external self loop, and an internal transition.
fn mixed_table() -> TransitionTable<Node, Signal> {
    MachineBuilder::new()
        .states(Node::all(), Node::A)
        .events(Signal::all())
        .transition(external(Node::A, Node::B, Signal::X))
        .transition(external(Node::A, Node::D, Signal::Y).when(is_odd))
        .transition(external(Node::A, Node::C, Signal::Y).when(is_even))
        .transition(external(Node::B, Node::B, Signal::X))
        .transition(external(Node::B, Node::C, Signal::Y))
        .transition(external(Node::C, Node::A, Signal::X))
        .transition(internal(Node::C, Signal::Z))
        .transition(external(Node::D, Node::A, Signal::Z))
        .build()
        .unwrap()
}

/// Reference model of `mixed_table`.
fn mixed_next(state: &Node, signal: &Signal, payload: u8) -> Option<Node> {
    match (state, signal) {
        (Node::A, Signal::X) => Some(Node::B),
        (Node::A, Signal::Y) if payload % 2 == 1 => Some(Node::D),
        (Node::A, Signal::Y) => Some(Node::C),
        (Node::B, Signal::X) => Some(Node::B),
        (Node::B, Signal::Y) => Some(Node::C),
        (Node::C, Signal::X) => Some(Node::A),
        (Node::C, Signal::Z) => Some(Node::C),
        (Node::D, Signal::Z) => Some(Node::A),
        _ => None,
    }
}

prop_compose! {
    fn arbitrary_state()(index in 0..STATES.len()) -> Node {
        STATES[index].clone()
    }
}

prop_compose! {
    fn arbitrary_signal()(index in 0..SIGNALS.len()) -> Signal {
        SIGNALS[index].clone()
    }
}

prop_compose! {
    fn arbitrary_step()(signal in arbitrary_signal(), payload in any::<u8>()) -> (Signal, u8) {
        (signal, payload)
    }
}

prop_compose! {
    /// Unguarded rules with at most one target per (source, event).
    fn arbitrary_rules()(
        rules in prop::collection::vec(
            (arbitrary_state(), arbitrary_signal(), arbitrary_state()),
            0..12,
        )
    ) -> BTreeMap<(usize, usize), Node> {
        rules
            .into_iter()
            .map(|(source, signal, target)| {
                let s = STATES.iter().position(|n| *n == source).unwrap();
                let e = SIGNALS.iter().position(|n| *n == signal).unwrap();
                ((s, e), target)
            })
            .collect()
    }
}

fn table_from_rules(
    initial: Node,
    rules: &BTreeMap<(usize, usize), Node>,
) -> TransitionTable<Node, Signal> {
    MachineBuilder::new()
        .states(Node::all(), initial)
        .events(Signal::all())
        .transitions(rules.iter().map(|(&(s, e), target)| {
            external(STATES[s].clone(), target.clone(), SIGNALS[e].clone())
        }))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn construction_enters_declared_initial_state(
        initial in arbitrary_state(),
        rules in arbitrary_rules()
    ) {
        let machine = StateMachine::new(table_from_rules(initial.clone(), &rules));

        prop_assert_eq!(machine.current_state(), &initial);
        prop_assert_eq!(machine.status(), MachineStatus::Ready);
        prop_assert!(machine.history().is_empty());
    }

    #[test]
    fn state_is_target_of_last_fired_transition(
        initial in arbitrary_state(),
        rules in arbitrary_rules(),
        signals in prop::collection::vec(arbitrary_signal(), 0..30)
    ) {
        let mut machine = StateMachine::with_config(
            table_from_rules(initial.clone(), &rules),
            MachineConfig::new().complete_on_final(false),
        );
        let mut expected = initial;

        for signal in signals {
            let s = STATES.iter().position(|n| *n == expected).unwrap();
            let e = SIGNALS.iter().position(|n| *n == signal).unwrap();
            let result = machine.send_event(signal).unwrap();

            match rules.get(&(s, e)) {
                Some(target) => {
                    prop_assert!(result.accepted);
                    expected = target.clone();
                }
                None => prop_assert!(!result.accepted),
            }
            prop_assert_eq!(machine.current_state(), &expected);
        }

        if let Some(last) = machine.history().transitions().last() {
            prop_assert_eq!(&last.to, machine.current_state());
        }
    }

    #[test]
    fn guarded_dispatch_matches_reference_model(
        steps in prop::collection::vec(arbitrary_step(), 0..40)
    ) {
        let mut machine = StateMachine::new(mixed_table());
        let mut expected = Node::A;

        for (signal, payload) in steps {
            let next = mixed_next(&expected, &signal, payload);
            let result = machine.send_event_with(signal, payload).unwrap();

            prop_assert_eq!(result.accepted, next.is_some());
            if let Some(next) = next {
                expected = next;
            }
            prop_assert_eq!(machine.current_state(), &expected);
        }
    }

    #[test]
    fn unmatched_events_are_idempotent(
        steps in prop::collection::vec(arbitrary_step(), 0..20),
        repeats in 1..5usize
    ) {
        let mut machine = StateMachine::new(mixed_table());
        for (signal, payload) in steps {
            let _ = machine.send_event_with(signal, payload).unwrap();
        }

        let before = machine.current_state().clone();
        let recorded = machine.history().len();
        let unmatched: Vec<Signal> = SIGNALS
            .iter()
            .filter(|s| {
                mixed_next(&before, s, 0).is_none() && mixed_next(&before, s, 1).is_none()
            })
            .cloned()
            .collect();

        for signal in unmatched {
            for _ in 0..repeats {
                let result = machine.send_event(signal.clone()).unwrap();
                prop_assert!(!result.accepted);
            }
        }

        prop_assert_eq!(machine.current_state(), &before);
        prop_assert_eq!(machine.history().len(), recorded);
    }

    #[test]
    fn engines_sharing_a_table_agree(
        steps in prop::collection::vec(arbitrary_step(), 0..40)
    ) {
        let table = Arc::new(mixed_table());
        let mut first = StateMachine::new(Arc::clone(&table));
        let mut second = StateMachine::new(Arc::clone(&table));

        for (signal, payload) in &steps {
            let a = first.send_event_with(signal.clone(), *payload).unwrap();
            let b = second.send_event_with(signal.clone(), *payload).unwrap();
            prop_assert_eq!(a.accepted, b.accepted);
        }

        prop_assert_eq!(first.current_state(), second.current_state());
        prop_assert_eq!(first.history().get_path(), second.history().get_path());
        prop_assert_eq!(first.history().events(), second.history().events());
        prop_assert_ne!(first.uuid(), second.uuid());
    }

    #[test]
    fn failing_action_changes_nothing(
        warmup in prop::collection::vec(arbitrary_signal(), 0..10),
        poison in any::<u8>()
    ) {
        let table = MachineBuilder::new()
            .states(Node::all(), Node::A)
            .events(Signal::all())
            .transition(external(Node::A, Node::B, Signal::X))
            .transition(external(Node::B, Node::A, Signal::X))
            .transition(external(Node::A, Node::C, Signal::Y).action(move |ctx: &Ctx<'_>| {
                if ctx.payload_as::<u8>() == Some(&poison) {
                    Err::<(), BoxError>("poisoned payload".into())
                } else {
                    Ok(())
                }
            }))
            .transition(external(Node::B, Node::C, Signal::Y).action(move |ctx: &Ctx<'_>| {
                if ctx.payload_as::<u8>() == Some(&poison) {
                    Err::<(), BoxError>("poisoned payload".into())
                } else {
                    Ok(())
                }
            }))
            .build()
            .unwrap();
        let mut machine = StateMachine::new(table);
        for signal in warmup.into_iter().filter(|s| *s == Signal::X) {
            let _ = machine.send_event(signal).unwrap();
        }

        let before = machine.current_state().clone();
        let recorded = machine.history().len();
        let err = machine.send_event_with(Signal::Y, poison).unwrap_err();

        let is_action_failure = matches!(err, EngineError::ActionExecution { .. });
        prop_assert!(is_action_failure);
        prop_assert_eq!(machine.current_state(), &before);
        prop_assert_eq!(machine.history().len(), recorded);
        prop_assert_eq!(machine.status(), MachineStatus::Ready);
    }
}
