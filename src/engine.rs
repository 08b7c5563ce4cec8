//! Per-turn vote aggregation.
//!
//! Every slot pairs one strategy with its confidence curve. Each turn the
//! strategy's opinion is weighted by the curve evaluated on that same opinion,
//! the weighted opinions are summed into a net cost vector, and the decider
//! picks the cheapest action from the net.

use crate::action::Action;
use crate::config::{EngineConfig, WeightingPolicy};
use crate::costs::CostVector;
use crate::curve::{ConfidenceCurve, CurveSet};
use crate::decider::decide;
use crate::error::VoteError;
use crate::observer::{Contribution, NoopObserver, TracingObserver, TurnObserver};
use crate::strategies::{EventStrategy, Strategy};
use crate::turn::EventTurn;
use std::time::Instant;

pub struct Slot<S> {
    pub strategy: S,
    pub curve: ConfidenceCurve,
}

impl<S> Slot<S> {
    pub fn new(strategy: S, curve: ConfidenceCurve) -> Self {
        Self { strategy, curve }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnDecision {
    pub turn: u32,
    pub action: Action,
    pub net: CostVector,
    pub contributions: Vec<Contribution>,
}

pub struct AggregationEngine<S = EventStrategy> {
    slots: Vec<Slot<S>>,
    weighting: WeightingPolicy,
    observer: Box<dyn TurnObserver>,
    turn: u32,
}

impl AggregationEngine<EventStrategy> {
    /// Standard four-event roster for `player_idx`, observed according to
    /// the config's debug/timing flags.
    pub fn for_player(
        player_idx: usize,
        config: &EngineConfig,
        curves: &CurveSet,
    ) -> Result<Self, VoteError> {
        let engine = Self::from_curves(EventStrategy::roster(player_idx), curves, config.weighting)?;
        Ok(if config.observes() {
            engine.with_observer(TracingObserver::new(config.debug, config.timing))
        } else {
            engine
        })
    }
}

impl<S: Strategy> AggregationEngine<S> {
    pub fn new(slots: Vec<Slot<S>>, weighting: WeightingPolicy) -> Self {
        Self {
            slots,
            weighting,
            observer: Box::new(NoopObserver),
            turn: 0,
        }
    }

    pub fn from_curves(
        strategies: Vec<S>,
        curves: &CurveSet,
        weighting: WeightingPolicy,
    ) -> Result<Self, VoteError> {
        if strategies.len() != curves.len() {
            return Err(VoteError::RosterMismatch {
                expected: strategies.len(),
                actual: curves.len(),
            });
        }
        let slots = strategies
            .into_iter()
            .zip(curves.curves.iter().copied())
            .map(|(strategy, curve)| Slot::new(strategy, curve))
            .collect();
        Ok(Self::new(slots, weighting))
    }

    pub fn with_observer(mut self, observer: impl TurnObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn slots(&self) -> &[Slot<S>] {
        &self.slots
    }

    /// Turns processed so far.
    pub fn turns(&self) -> u32 {
        self.turn
    }

    /// Sums every slot's weighted opinion for one turn. `events` carries one
    /// line per slot, in roster order.
    pub fn accumulate(
        &mut self,
        events: &[EventTurn],
    ) -> Result<(CostVector, Vec<Contribution>), VoteError> {
        if events.len() != self.slots.len() {
            return Err(VoteError::RosterMismatch {
                expected: self.slots.len(),
                actual: events.len(),
            });
        }

        let mut net = CostVector::zero();
        let mut contributions = Vec::with_capacity(self.slots.len());
        for (idx, (slot, event)) in self.slots.iter_mut().zip(events).enumerate() {
            let started = Instant::now();
            let reset = event.is_game_over();
            let opinion = if reset {
                slot.strategy.reset();
                CostVector::zero()
            } else {
                slot.strategy.produce_opinion(event)
            };
            let (weight, weighted) = match weigh(idx, opinion, &slot.curve, self.weighting) {
                Err(VoteError::NonFiniteCost { slot: bad, action }) => {
                    tracing::warn!(
                        slot = bad,
                        strategy = slot.strategy.id(),
                        %action,
                        "weighted opinion is not finite, slot abstains this turn"
                    );
                    (slot.curve.evaluate_costs(opinion), CostVector::zero())
                }
                other => other?,
            };
            net += weighted;

            let contribution = Contribution {
                slot: idx,
                strategy: slot.strategy.id(),
                opinion,
                weight,
                weighted,
                reset,
            };
            self.observer
                .on_contribution(self.turn, &contribution, started.elapsed());
            contributions.push(contribution);
        }
        Ok((net, contributions))
    }

    pub fn run_turn(&mut self, events: &[EventTurn]) -> Result<TurnDecision, VoteError> {
        let started = Instant::now();
        let (net, contributions) = self.accumulate(events)?;
        let action = decide(&net);
        self.observer
            .on_turn(self.turn, &net, action, started.elapsed());

        let decision = TurnDecision {
            turn: self.turn,
            action,
            net,
            contributions,
        };
        self.turn += 1;
        Ok(decision)
    }
}

/// Applies `curve` to `opinion` under `policy`, returning the weight vector
/// and the weighted opinion.
pub fn weigh(
    slot: usize,
    opinion: CostVector,
    curve: &ConfidenceCurve,
    policy: WeightingPolicy,
) -> Result<(CostVector, CostVector), VoteError> {
    let weight = curve.evaluate_costs(opinion);
    let weighted = match policy {
        WeightingPolicy::SelfWeighted => opinion * weight,
        WeightingPolicy::Normalized => {
            let mut out = CostVector::zero();
            for (action, value) in opinion.iter() {
                if value == 0.0 {
                    continue;
                }
                let w = weight.get(action);
                if w == 0.0 {
                    return Err(VoteError::DegenerateConfidence { slot, action });
                }
                out.set(action, value / w);
            }
            out
        }
    };
    if let Some(action) = weighted.first_non_finite() {
        return Err(VoteError::NonFiniteCost { slot, action });
    }
    Ok((weight, weighted))
}
