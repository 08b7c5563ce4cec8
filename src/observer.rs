//! Hooks around the aggregation loop. The engine calls these at fixed points;
//! the default observer does nothing.

use crate::action::Action;
use crate::costs::CostVector;
use std::time::Duration;

/// What one slot added to the net this turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contribution {
    pub slot: usize,
    pub strategy: &'static str,
    pub opinion: CostVector,
    pub weight: CostVector,
    pub weighted: CostVector,
    /// The event restarted this turn; the strategy was reset instead of asked.
    pub reset: bool,
}

pub trait TurnObserver {
    fn on_contribution(&mut self, _turn: u32, _contribution: &Contribution, _elapsed: Duration) {}

    fn on_turn(&mut self, _turn: u32, _net: &CostVector, _action: Action, _elapsed: Duration) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TurnObserver for NoopObserver {}

/// Emits per-slot cost tables (`debug`) and elapsed times (`timing`) as
/// tracing events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver {
    pub debug: bool,
    pub timing: bool,
}

impl TracingObserver {
    pub fn new(debug: bool, timing: bool) -> Self {
        Self { debug, timing }
    }
}

impl TurnObserver for TracingObserver {
    fn on_contribution(&mut self, turn: u32, contribution: &Contribution, elapsed: Duration) {
        if self.debug {
            if contribution.reset {
                tracing::info!(
                    turn,
                    slot = contribution.slot,
                    strategy = contribution.strategy,
                    "event restarted, strategy reset"
                );
            }
            for action in Action::ALL {
                tracing::info!(
                    turn,
                    slot = contribution.slot,
                    strategy = contribution.strategy,
                    "{:<5} base={:+6.2} weight={:+6.2} net={:+6.2}",
                    action.as_str(),
                    contribution.opinion.get(action),
                    contribution.weight.get(action),
                    contribution.weighted.get(action),
                );
            }
        }
        if self.timing {
            tracing::info!(
                turn,
                strategy = contribution.strategy,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "strategy timing"
            );
        }
    }

    fn on_turn(&mut self, turn: u32, net: &CostVector, action: Action, elapsed: Duration) {
        if self.debug {
            tracing::info!(turn, %action, "net costs {net}");
        }
        if self.timing {
            tracing::info!(
                turn,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "turn timing"
            );
        }
    }
}
