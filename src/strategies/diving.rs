//! Diving: matching the first letter of the GPU extends the combo, which is
//! what the dive scores.

use super::{Seat, Strategy};
use crate::action::Action;
use crate::costs::CostVector;
use crate::turn::EventTurn;

#[derive(Clone, Debug)]
pub struct DivingStrategy {
    seat: Seat,
    turns_seen: u32,
}

impl DivingStrategy {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            turns_seen: 0,
        }
    }
}

impl Strategy for DivingStrategy {
    fn id(&self) -> &'static str {
        "diving"
    }

    fn description(&self) -> &'static str {
        "Follows the next dive letter, weighted by the combo at stake."
    }

    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector {
        if turn.is_game_over() {
            return CostVector::zero();
        }
        self.turns_seen += 1;

        let Some(&letter) = turn.gpu.as_bytes().first() else {
            tracing::debug!("diving: no dives left, abstaining");
            return CostVector::zero();
        };
        let Some(target) = Action::from_letter(letter) else {
            tracing::debug!(letter = %char::from(letter), "diving: unknown dive letter");
            return CostVector::zero();
        };

        let combo = f64::from(turn.register(self.seat.me + 3));
        let mut opinion = CostVector::uniform(1.0);
        opinion.set(target, -1.0);
        opinion * (combo + 1.0)
    }

    fn reset(&mut self) {
        tracing::debug!(turns = self.turns_seen, "resetting diving");
        self.turns_seen = 0;
    }
}
