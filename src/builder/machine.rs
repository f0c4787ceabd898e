//! Builder that validates a machine definition into a transition table.

use crate::builder::error::{ConfigError, ConfigIssue};
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State, TransitionKind};
use crate::table::{Transition, TransitionTable};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

type Check = Validation<(), NonEmptyVec<ConfigIssue>>;

fn reject(issue: ConfigIssue) -> Check {
    Validation::fail(issue)
}

fn ensure(ok: bool, issue: impl FnOnce() -> ConfigIssue) -> Check {
    if ok {
        Validation::success(())
    } else {
        reject(issue())
    }
}

struct StateDecl<S> {
    states: Vec<S>,
    initial: S,
}

/// Two-phase builder: declare states and events, then transitions.
///
/// Nothing is validated until [`build`](Self::build), which reports every
/// problem with the definition at once.
///
/// # Example
///
/// ```
/// use statewise::builder::{external, MachineBuilder};
/// use statewise::{event_enum, state_enum};
///
/// state_enum! {
///     enum States { State1, State2 }
/// }
///
/// event_enum! {
///     enum Events { Event1, Event2 }
/// }
///
/// let table = MachineBuilder::new()
///     .states(States::all(), States::State1)
///     .events(Events::all())
///     .transition(external(States::State1, States::State2, Events::Event1))
///     .transition(external(States::State2, States::State1, Events::Event2))
///     .build()
///     .unwrap();
///
/// assert_eq!(table.initial(), &States::State1);
/// assert_eq!(table.transition_count(), 2);
/// ```
pub struct MachineBuilder<S: State, E: Event> {
    state_decls: Vec<StateDecl<S>>,
    event_decls: Vec<Vec<E>>,
    transitions: Vec<TransitionBuilder<S, E>>,
}

impl<S: State, E: Event> MachineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            state_decls: Vec::new(),
            event_decls: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Declare the state set and its initial state. Must be called exactly once.
    pub fn states(mut self, states: impl IntoIterator<Item = S>, initial: S) -> Self {
        self.state_decls.push(StateDecl {
            states: states.into_iter().collect(),
            initial,
        });
        self
    }

    /// Declare the event set. Must be called exactly once.
    pub fn events(mut self, events: impl IntoIterator<Item = E>) -> Self {
        self.event_decls.push(events.into_iter().collect());
        self
    }

    /// Add a transition declaration.
    pub fn transition(mut self, transition: TransitionBuilder<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transition declarations at once.
    pub fn transitions(
        mut self,
        transitions: impl IntoIterator<Item = TransitionBuilder<S, E>>,
    ) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate the definition and compile it into an immutable table.
    ///
    /// Fails with a [`ConfigError`] listing every issue found: phase misuse,
    /// empty or duplicated sets, undeclared references, and `(source, event)`
    /// pairs with several candidates where at least one has no guard.
    pub fn build(self) -> Result<TransitionTable<S, E>, ConfigError> {
        let Self {
            state_decls,
            event_decls,
            transitions,
        } = self;
        let mut checks: Vec<Check> = Vec::new();

        let state_decl = check_state_phase(&state_decls, &mut checks);
        let events = check_event_phase(&event_decls, &mut checks);

        let mut compiled = Vec::with_capacity(transitions.len());
        for (index, builder) in transitions.into_iter().enumerate() {
            match builder.compile(index) {
                Ok(t) => compiled.push(t),
                Err(missing) => checks.extend(missing.into_iter().map(reject)),
            }
        }

        if let Some(decl) = state_decl {
            for t in &compiled {
                checks.push(ensure(decl.states.contains(&t.source), || {
                    ConfigIssue::UndeclaredSource {
                        transition: t.label(),
                        state: t.source.name().to_string(),
                    }
                }));
                checks.push(ensure(decl.states.contains(&t.target), || {
                    ConfigIssue::UndeclaredTarget {
                        transition: t.label(),
                        state: t.target.name().to_string(),
                    }
                }));
            }
        }
        if let Some(events) = events {
            for t in &compiled {
                checks.push(ensure(events.contains(&t.event), || {
                    ConfigIssue::UndeclaredEvent {
                        transition: t.label(),
                        event: t.event.name().to_string(),
                    }
                }));
            }
        }
        for t in &compiled {
            checks.push(ensure(
                t.kind == TransitionKind::External || t.source == t.target,
                || ConfigIssue::InternalEndpointsDiffer {
                    transition: t.label(),
                },
            ));
        }
        checks.extend(check_determinism(&compiled));

        if let Validation::Failure(issues) = Validation::all_vec(checks) {
            return Err(ConfigError::new(issues.iter().cloned().collect()));
        }

        // A missing phase always fails validation above.
        let (Some(decl), Some(events)) = (state_decl, events) else {
            return Err(ConfigError::new(vec![
                ConfigIssue::MissingStates,
                ConfigIssue::MissingEvents,
            ]));
        };

        debug!(
            states = decl.states.len(),
            events = events.len(),
            transitions = compiled.len(),
            initial = decl.initial.name(),
            "built transition table"
        );
        Ok(TransitionTable::from_parts(
            decl.states.clone(),
            events.clone(),
            decl.initial.clone(),
            compiled,
        ))
    }
}

fn check_state_phase<'a, S: State>(
    decls: &'a [StateDecl<S>],
    checks: &mut Vec<Check>,
) -> Option<&'a StateDecl<S>> {
    checks.push(ensure(!decls.is_empty(), || ConfigIssue::MissingStates));
    checks.push(ensure(decls.len() <= 1, || ConfigIssue::StatesRedeclared));

    let decl = decls.first()?;
    checks.push(ensure(!decl.states.is_empty(), || ConfigIssue::EmptyStates));
    checks.extend(
        duplicates(&decl.states)
            .into_iter()
            .map(|s| reject(ConfigIssue::DuplicateState(s.name().to_string()))),
    );
    checks.push(ensure(decl.states.contains(&decl.initial), || {
        ConfigIssue::UndeclaredInitial(decl.initial.name().to_string())
    }));
    Some(decl)
}

fn check_event_phase<'a, E: Event>(
    decls: &'a [Vec<E>],
    checks: &mut Vec<Check>,
) -> Option<&'a Vec<E>> {
    checks.push(ensure(!decls.is_empty(), || ConfigIssue::MissingEvents));
    checks.push(ensure(decls.len() <= 1, || ConfigIssue::EventsRedeclared));

    let events = decls.first()?;
    checks.push(ensure(!events.is_empty(), || ConfigIssue::EmptyEvents));
    checks.extend(
        duplicates(events)
            .into_iter()
            .map(|e| reject(ConfigIssue::DuplicateEvent(e.name().to_string()))),
    );
    Some(events)
}

impl<S: State, E: Event> Default for MachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Items appearing more than once, each reported once, in first-seen order.
fn duplicates<T: Eq + std::hash::Hash>(items: &[T]) -> Vec<&T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    items
        .iter()
        .filter(|item| !seen.insert(*item) && reported.insert(*item))
        .collect()
}

/// A `(source, event)` pair with several candidates must guard all of them.
fn check_determinism<S: State, E: Event>(transitions: &[Transition<S, E>]) -> Vec<Check> {
    let mut order: Vec<(&S, &E)> = Vec::new();
    let mut groups: HashMap<(&S, &E), Vec<&Transition<S, E>>> = HashMap::new();
    for t in transitions {
        let key = (&t.source, &t.event);
        let group = groups.entry(key).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push(t);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let group = groups.get(&key)?;
            let ambiguous = group.len() > 1 && group.iter().any(|t| !t.is_guarded());
            ambiguous.then(|| {
                reject(ConfigIssue::UnguardedDuplicate {
                    state: key.0.name().to_string(),
                    event: key.1.name().to_string(),
                    candidates: group.iter().map(|t| t.label()).collect(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{external, internal};
    use crate::core::TransitionContext;
    use crate::{event_enum, state_enum};

    type Ctx<'a> = TransitionContext<'a, TestState, TestEvent>;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Orphan,
        }
        final: [Complete]
    }

    event_enum! {
        enum TestEvent {
            Start,
            Finish,
            Refresh,
        }
    }

    fn declared() -> MachineBuilder<TestState, TestEvent> {
        MachineBuilder::new()
            .states(
                vec![TestState::Initial, TestState::Processing, TestState::Complete],
                TestState::Initial,
            )
            .events(TestEvent::all())
    }

    #[test]
    fn builds_valid_definition() {
        let table = declared()
            .transition(external(TestState::Initial, TestState::Processing, TestEvent::Start))
            .transition(external(TestState::Processing, TestState::Complete, TestEvent::Finish))
            .build()
            .unwrap();

        assert_eq!(table.initial(), &TestState::Initial);
        assert_eq!(table.transition_count(), 2);
        assert_eq!(table.candidates(&TestState::Initial, &TestEvent::Start).len(), 1);
    }

    #[test]
    fn state_phase_is_required() {
        let err = MachineBuilder::<TestState, TestEvent>::new()
            .events(TestEvent::all())
            .build()
            .unwrap_err();

        assert_eq!(err.issues(), &[ConfigIssue::MissingStates]);
    }

    #[test]
    fn event_phase_is_required() {
        let err = MachineBuilder::<TestState, TestEvent>::new()
            .states(TestState::all(), TestState::Initial)
            .build()
            .unwrap_err();

        assert_eq!(err.issues(), &[ConfigIssue::MissingEvents]);
    }

    #[test]
    fn phases_cannot_be_repeated() {
        let err = declared()
            .states(TestState::all(), TestState::Initial)
            .events(TestEvent::all())
            .build()
            .unwrap_err();

        assert!(err.contains(&ConfigIssue::StatesRedeclared));
        assert!(err.contains(&ConfigIssue::EventsRedeclared));
    }

    #[test]
    fn empty_sets_are_rejected() {
        let err = MachineBuilder::<TestState, TestEvent>::new()
            .states(Vec::new(), TestState::Initial)
            .events(Vec::new())
            .build()
            .unwrap_err();

        assert!(err.contains(&ConfigIssue::EmptyStates));
        assert!(err.contains(&ConfigIssue::EmptyEvents));
        assert!(err.contains(&ConfigIssue::UndeclaredInitial("Initial".to_string())));
    }

    #[test]
    fn duplicates_are_reported_once() {
        let err = MachineBuilder::new()
            .states(
                vec![
                    TestState::Initial,
                    TestState::Initial,
                    TestState::Initial,
                    TestState::Processing,
                ],
                TestState::Initial,
            )
            .events(vec![TestEvent::Start, TestEvent::Start])
            .build()
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[
                ConfigIssue::DuplicateState("Initial".to_string()),
                ConfigIssue::DuplicateEvent("Start".to_string()),
            ]
        );
    }

    #[test]
    fn initial_must_be_declared() {
        let err = MachineBuilder::new()
            .states(vec![TestState::Processing], TestState::Initial)
            .events(TestEvent::all())
            .build()
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[ConfigIssue::UndeclaredInitial("Initial".to_string())]
        );
    }

    #[test]
    fn undeclared_references_are_rejected() {
        let err = MachineBuilder::new()
            .states(
                vec![TestState::Initial, TestState::Processing],
                TestState::Initial,
            )
            .events(vec![TestEvent::Start])
            .transition(external(TestState::Orphan, TestState::Complete, TestEvent::Finish))
            .build()
            .unwrap_err();

        let label = "Orphan --Finish--> Complete".to_string();
        assert_eq!(
            err.issues(),
            &[
                ConfigIssue::UndeclaredSource {
                    transition: label.clone(),
                    state: "Orphan".to_string(),
                },
                ConfigIssue::UndeclaredTarget {
                    transition: label.clone(),
                    state: "Complete".to_string(),
                },
                ConfigIssue::UndeclaredEvent {
                    transition: label,
                    event: "Finish".to_string(),
                },
            ]
        );
    }

    #[test]
    fn incomplete_transitions_are_rejected() {
        let err = declared()
            .transition(TransitionBuilder::new().source(TestState::Initial))
            .build()
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[
                ConfigIssue::MissingTarget { index: 0 },
                ConfigIssue::MissingEvent { index: 0 },
            ]
        );
    }

    #[test]
    fn unguarded_duplicates_fail_fast() {
        let err = declared()
            .transition(external(TestState::Initial, TestState::Processing, TestEvent::Start))
            .transition(external(TestState::Initial, TestState::Complete, TestEvent::Start))
            .build()
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[ConfigIssue::UnguardedDuplicate {
                state: "Initial".to_string(),
                event: "Start".to_string(),
                candidates: vec![
                    "Initial --Start--> Processing".to_string(),
                    "Initial --Start--> Complete".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn one_guardless_candidate_among_guarded_is_ambiguous() {
        let err = declared()
            .transition(
                external(TestState::Initial, TestState::Processing, TestEvent::Start)
                    .when(|_: &Ctx<'_>| true),
            )
            .transition(external(TestState::Initial, TestState::Complete, TestEvent::Start))
            .build()
            .unwrap_err();

        assert!(matches!(
            err.issues(),
            [ConfigIssue::UnguardedDuplicate { .. }]
        ));
    }

    #[test]
    fn fully_guarded_duplicates_are_allowed() {
        let table = declared()
            .transition(
                external(TestState::Initial, TestState::Processing, TestEvent::Start)
                    .when(|ctx: &Ctx<'_>| ctx.payload.is_some()),
            )
            .transition(
                external(TestState::Initial, TestState::Complete, TestEvent::Start)
                    .when(|ctx: &Ctx<'_>| ctx.payload.is_none()),
            )
            .build()
            .unwrap();

        assert_eq!(table.candidates(&TestState::Initial, &TestEvent::Start).len(), 2);
    }

    #[test]
    fn internal_transition_requires_same_endpoints() {
        let err = declared()
            .transition(
                TransitionBuilder::new()
                    .source(TestState::Initial)
                    .target(TestState::Processing)
                    .event(TestEvent::Refresh)
                    .internal(),
            )
            .build()
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[ConfigIssue::InternalEndpointsDiffer {
                transition: "Initial --Refresh--> Processing".to_string(),
            }]
        );

        let table = declared()
            .transition(internal(TestState::Processing, TestEvent::Refresh))
            .build()
            .unwrap();
        assert_eq!(table.transition_count(), 1);
    }

    #[test]
    fn all_issues_are_accumulated() {
        let err = MachineBuilder::new()
            .states(vec![TestState::Processing], TestState::Initial)
            .events(Vec::<TestEvent>::new())
            .transition(external(TestState::Orphan, TestState::Processing, TestEvent::Start))
            .build()
            .unwrap_err();

        assert_eq!(err.issues().len(), 4);
        assert!(err.contains(&ConfigIssue::EmptyEvents));
        assert!(err.contains(&ConfigIssue::UndeclaredInitial("Initial".to_string())));
    }
}
