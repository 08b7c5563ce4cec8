//! Roller skating: the GPU lists the four actions in order of increasing
//! effort. Index 0 moves 1 space and sheds risk, index 3 moves 3 spaces and
//! adds 2 risk. Sharing a square with an opponent adds 2 more; reaching 5
//! risk stuns.

use super::{Seat, Strategy};
use crate::action::Action;
use crate::costs::CostVector;
use crate::turn::EventTurn;

const LAP_LENGTH: i32 = 10;
const DISTANCE_BY_RANK: [i32; 4] = [1, 2, 2, 3];
const CLASH_RISK: i32 = 2;
const STUN_THRESHOLD: i32 = 5;
const RISK_WEIGHT: f64 = 0.5;
const STUN_PENALTY: f64 = 4.0;
const TIMER_REGISTER: usize = 6;

#[derive(Clone, Debug)]
pub struct SkatingStrategy {
    seat: Seat,
    turns_seen: u32,
}

impl SkatingStrategy {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            turns_seen: 0,
        }
    }

    fn rank_of(gpu: &str, action: Action) -> Option<usize> {
        let letter = action.as_str().as_bytes()[0];
        gpu.bytes().position(|b| b == letter)
    }
}

impl Strategy for SkatingStrategy {
    fn id(&self) -> &'static str {
        "skating"
    }

    fn description(&self) -> &'static str {
        "Trades distance against accumulated risk, avoiding stuns and clashes."
    }

    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector {
        if turn.is_game_over() {
            return CostVector::zero();
        }
        self.turns_seen += 1;

        let position = i32::from(turn.register(self.seat.me));
        let risk = i32::from(turn.register(self.seat.me + 3));
        let turns_left = turn.register(TIMER_REGISTER);
        if risk < 0 {
            tracing::debug!(risk, "skating: stunned, abstaining");
            return CostVector::zero();
        }
        if turns_left <= 0 {
            tracing::debug!("skating: no turns left, abstaining");
            return CostVector::zero();
        }

        let opponent_squares: Vec<i32> = self
            .seat
            .opponents()
            .iter()
            .map(|&p| i32::from(turn.register(p)).rem_euclid(LAP_LENGTH))
            .collect();
        let final_turn = turns_left == 1;

        let mut opinion = CostVector::zero();
        for action in Action::ALL {
            let Some(rank) = Self::rank_of(&turn.gpu, action).filter(|r| *r < 4) else {
                tracing::debug!(gpu = %turn.gpu, "skating: malformed risk order");
                return CostVector::zero();
            };
            let distance = DISTANCE_BY_RANK[rank];
            if final_turn {
                opinion.set(action, -f64::from(distance));
                continue;
            }

            let mut risk_after = (risk + rank as i32 - 1).max(0);
            let landing = (position + distance).rem_euclid(LAP_LENGTH);
            if opponent_squares.contains(&landing) {
                risk_after += CLASH_RISK;
            }
            let mut cost = -f64::from(distance) + RISK_WEIGHT * f64::from(risk_after);
            if risk_after >= STUN_THRESHOLD {
                cost += STUN_PENALTY;
            }
            opinion.set(action, cost);
        }
        tracing::debug!(position, risk, turns_left, "skating opinion {opinion}");
        opinion
    }

    fn reset(&mut self) {
        tracing::debug!(turns = self.turns_seen, "resetting skating");
        self.turns_seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decider::decide;

    fn line(gpu: &str, positions: [i16; 3], risks: [i16; 3], timer: i16) -> EventTurn {
        let mut registers = [0i16; 7];
        registers[..3].copy_from_slice(&positions);
        registers[3..6].copy_from_slice(&risks);
        registers[6] = timer;
        EventTurn::new(gpu, registers)
    }

    fn opinion(turn: &EventTurn) -> CostVector {
        SkatingStrategy::new(Seat::new(0)).produce_opinion(turn)
    }

    #[test]
    fn fresh_skater_weighs_distance_against_risk() {
        let costs = opinion(&line("UDLR", [0, 5, 5], [0, 0, 0], 10));
        assert_eq!(costs, CostVector::new(-1.0, -2.0, -1.5, -2.0));
        assert_eq!(decide(&costs), Action::Down);
    }

    #[test]
    fn avoids_stun_when_risk_is_high() {
        let costs = opinion(&line("UDLR", [0, 5, 5], [3, 0, 0], 10));
        assert_eq!(costs.right, -3.0 + 2.5 + STUN_PENALTY);
        assert_eq!(decide(&costs), Action::Down);
    }

    #[test]
    fn clash_with_opponent_adds_risk() {
        let costs = opinion(&line("UDLR", [0, 13, 5], [0, 0, 0], 10));
        assert_eq!(costs.right, -3.0 + 0.5 * 4.0);
    }

    #[test]
    fn final_turn_only_counts_distance() {
        let costs = opinion(&line("LURD", [0, 5, 5], [4, 0, 0], 1));
        assert_eq!(costs, CostVector::new(-2.0, -3.0, -1.0, -2.0));
        assert_eq!(decide(&costs), Action::Down);
    }

    #[test]
    fn abstains_when_stunned_finished_or_malformed() {
        assert_eq!(opinion(&line("UDLR", [0, 0, 0], [-2, 0, 0], 5)), CostVector::zero());
        assert_eq!(opinion(&line("UDLR", [0, 0, 0], [0, 0, 0], 0)), CostVector::zero());
        assert_eq!(opinion(&line("UDL", [0, 0, 0], [0, 0, 0], 5)), CostVector::zero());
        assert_eq!(opinion(&line("UDLLR", [0, 0, 0], [0, 0, 0], 5)), CostVector::zero());
    }
}
