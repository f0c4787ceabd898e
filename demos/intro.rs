//! Two states, two events, and a callback bound to entering `State2`.
//!
//! Run with `RUST_LOG=statewise=debug cargo run --example intro` to see the
//! engine's own logs.

use statewise::builder::external;
use statewise::core::{BoxError, Event, State, TransitionContext};
use statewise::{event_enum, state_enum, MachineBuilder, StateCallbacks, StateMachine};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum States {
        State1,
        State2,
    }
}

event_enum! {
    enum Events {
        Event1,
        Event2,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table = MachineBuilder::new()
        .states(States::all(), States::State1)
        .events(Events::all())
        .transition(external(States::State1, States::State2, Events::Event1))
        .transition(external(States::State2, States::State1, Events::Event2))
        .build()?;
    println!("{table}\n");

    let bean = StateCallbacks::new("intro-bean").on_transition_to(
        States::State2,
        |ctx: &TransitionContext<'_, States, Events>| {
            println!("  -> reached {} via {}", ctx.target.name(), ctx.event.name());
            Ok::<(), BoxError>(())
        },
    );

    let mut machine = StateMachine::new(table);
    machine.register(bean);
    println!("started in {}", machine.current_state().name());

    for event in [Events::Event1, Events::Event2, Events::Event2] {
        let label = event.name().to_string();
        let result = machine.send_event(event)?;
        println!(
            "{label}: {} (now {})",
            if result.accepted { "accepted" } else { "ignored" },
            machine.current_state().name()
        );
    }

    Ok(())
}
