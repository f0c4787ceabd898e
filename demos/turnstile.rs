//! Coin-operated turnstile with guards, an action, payloads, and an
//! internal transition.
//!
//! Inserting a coin of at least `FARE` cents unlocks the gate; anything less
//! is refunded without leaving `Locked`. Pushing an unlocked gate lets one
//! person through. `Service` shuts the machine down for good.

use statewise::builder::{external, internal};
use statewise::core::{BoxError, Event, State, TransitionContext};
use statewise::listener::{Listener, ListenerRegistry};
use statewise::{event_enum, state_enum, MachineBuilder, MachineConfig, StateMachine};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const FARE: u32 = 50;

state_enum! {
    enum Gate {
        Locked,
        Unlocked,
        OutOfService,
    }
    final: [OutOfService]
}

event_enum! {
    enum Input {
        Coin,
        Push,
        Service,
    }
}

type Ctx<'a> = TransitionContext<'a, Gate, Input>;

fn coin(ctx: &Ctx<'_>) -> u32 {
    ctx.payload_as::<u32>().copied().unwrap_or(0)
}

struct Console;

impl Listener<Gate, Input> for Console {
    fn name(&self) -> &str {
        "console"
    }

    fn on_state_entry(&mut self, state: &Gate) -> Result<(), BoxError> {
        println!("  [gate is {}]", state.name());
        Ok(())
    }

    fn on_event_not_accepted(&mut self, state: &Gate, event: &Input) -> Result<(), BoxError> {
        println!("  [{} ignored while {}]", event.name(), state.name());
        Ok(())
    }

    fn on_machine_stopped(&mut self, state: &Gate) -> Result<(), BoxError> {
        println!("  [stopped in {}]", state.name());
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let takings = Arc::new(AtomicU32::new(0));
    let till = Arc::clone(&takings);

    let table = MachineBuilder::new()
        .states(Gate::all(), Gate::Locked)
        .events(Input::all())
        .transition(
            external(Gate::Locked, Gate::Unlocked, Input::Coin)
                .name("pay")
                .when(|ctx: &Ctx<'_>| coin(ctx) >= FARE)
                .action(move |ctx: &Ctx<'_>| {
                    till.fetch_add(coin(ctx), Ordering::SeqCst);
                    Ok::<(), BoxError>(())
                }),
        )
        .transition(
            internal(Gate::Locked, Input::Coin)
                .name("refund")
                .when(|ctx: &Ctx<'_>| coin(ctx) < FARE)
                .action(|ctx: &Ctx<'_>| {
                    println!("  refunding {} cents", coin(ctx));
                    Ok::<(), BoxError>(())
                }),
        )
        .transition(external(Gate::Unlocked, Gate::Locked, Input::Push).name("pass"))
        .transition(external(Gate::Locked, Gate::OutOfService, Input::Service))
        .transition(external(Gate::Unlocked, Gate::OutOfService, Input::Service))
        .build()?;
    println!("{table}\n");

    let mut machine = StateMachine::with_listeners(
        table,
        MachineConfig::new().machine_id("turnstile-1").history_limit(32),
        ListenerRegistry::new().with_listener(Console),
    );

    println!("> push");
    let _ = machine.send_event(Input::Push)?;
    println!("> coin 20");
    let _ = machine.send_event_with(Input::Coin, 20u32)?;
    println!("> coin 50");
    let _ = machine.send_event_with(Input::Coin, 50u32)?;
    println!("> push");
    let _ = machine.send_event(Input::Push)?;
    println!("> service");
    let _ = machine.send_event(Input::Service)?;

    match machine.send_event(Input::Push) {
        Ok(_) => println!("unexpected: machine still running"),
        Err(err) => println!("> push: {err}"),
    }

    println!(
        "\n{} collected {} cents over {} transitions",
        machine.id().unwrap_or("turnstile"),
        takings.load(Ordering::SeqCst),
        machine.history().len()
    );
    for step in machine.history().transitions() {
        println!("  {} --{}--> {}", step.from.name(), step.event.name(), step.to.name());
    }

    Ok(())
}
