//! Per-event heuristics. Each one reads only its own event's line and turns
//! it into a cost opinion; none of them know about the others.

pub mod archery;
pub mod diving;
pub mod hurdles;
pub mod skating;

use crate::costs::CostVector;
use crate::turn::{EventTurn, PLAYER_COUNT};

pub use archery::ArcheryStrategy;
pub use diving::DivingStrategy;
pub use hurdles::HurdlesStrategy;
pub use skating::SkatingStrategy;

pub trait Strategy {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Returns the zero vector when the event offers nothing to act on
    /// (stunned, no turns left, malformed line).
    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector;
    /// Clears per-event state. Called when the event signals a restart.
    fn reset(&mut self);
}

/// Our player index and the two opponents, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seat {
    pub me: usize,
    pub p2: usize,
    pub p3: usize,
}

impl Seat {
    pub fn new(player_idx: usize) -> Self {
        let me = player_idx % PLAYER_COUNT;
        Self {
            me,
            p2: (me + 1) % PLAYER_COUNT,
            p3: (me + 2) % PLAYER_COUNT,
        }
    }

    pub fn opponents(&self) -> [usize; 2] {
        [self.p2, self.p3]
    }
}

/// The fixed roster, one variant per event slot.
#[derive(Clone, Debug)]
pub enum EventStrategy {
    Hurdles(HurdlesStrategy),
    Archery(ArcheryStrategy),
    Skating(SkatingStrategy),
    Diving(DivingStrategy),
}

impl EventStrategy {
    /// Slot order matches the order events appear in turn input.
    pub fn roster(player_idx: usize) -> Vec<EventStrategy> {
        let seat = Seat::new(player_idx);
        vec![
            Self::Hurdles(HurdlesStrategy::new(seat)),
            Self::Archery(ArcheryStrategy::new(seat)),
            Self::Skating(SkatingStrategy::new(seat)),
            Self::Diving(DivingStrategy::new(seat)),
        ]
    }

    fn inner(&self) -> &dyn Strategy {
        match self {
            Self::Hurdles(s) => s,
            Self::Archery(s) => s,
            Self::Skating(s) => s,
            Self::Diving(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Strategy {
        match self {
            Self::Hurdles(s) => s,
            Self::Archery(s) => s,
            Self::Skating(s) => s,
            Self::Diving(s) => s,
        }
    }
}

impl Strategy for EventStrategy {
    fn id(&self) -> &'static str {
        self.inner().id()
    }

    fn description(&self) -> &'static str {
        self.inner().description()
    }

    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector {
        self.inner_mut().produce_opinion(turn)
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}

pub fn describe_strategies() -> Vec<(&'static str, &'static str)> {
    EventStrategy::roster(0)
        .iter()
        .map(|strategy| (strategy.id(), strategy.description()))
        .collect()
}
