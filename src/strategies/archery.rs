//! Archery: each turn the cursor moves by the current wind strength in the
//! chosen direction. Closest to (0, 0) when the wind runs out wins.

use super::{Seat, Strategy};
use crate::costs::CostVector;
use crate::turn::EventTurn;

const PULL_LEFT: CostVector = CostVector::new(0.0, 0.0, -1.0, 1.0);
const PULL_RIGHT: CostVector = CostVector::new(0.0, 0.0, 1.0, -1.0);
const PULL_UP: CostVector = CostVector::new(-1.0, 1.0, 0.0, 0.0);
const PULL_DOWN: CostVector = CostVector::new(1.0, -1.0, 0.0, 0.0);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cursor {
    x: f64,
    y: f64,
}

impl Cursor {
    fn of(turn: &EventTurn, player: usize) -> Self {
        Self {
            x: f64::from(turn.register(2 * player)),
            y: f64::from(turn.register(2 * player + 1)),
        }
    }

    fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    fn on_target(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[derive(Clone, Debug)]
pub struct ArcheryStrategy {
    seat: Seat,
    turns_seen: u32,
}

impl ArcheryStrategy {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            turns_seen: 0,
        }
    }
}

impl Strategy for ArcheryStrategy {
    fn id(&self) -> &'static str {
        "archery"
    }

    fn description(&self) -> &'static str {
        "Steers the cursor toward the centre, harder when trailing with wind left."
    }

    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector {
        if turn.is_game_over() {
            return CostVector::zero();
        }
        self.turns_seen += 1;

        let me = Cursor::of(turn, self.seat.me);
        if me.on_target() {
            tracing::debug!("archery: on bullseye, abstaining");
            return CostVector::zero();
        }

        let turns_left = turn.gpu.len();
        if turns_left == 0 {
            tracing::debug!("archery: no wind left, abstaining");
            return CostVector::zero();
        }

        let best_opponent = self
            .seat
            .opponents()
            .iter()
            .map(|&p| Cursor::of(turn, p).distance())
            .fold(f64::INFINITY, f64::min);
        let gap = if best_opponent > 0.0 {
            me.distance() / best_opponent
        } else {
            1.0
        };
        let scaler = turns_left as f64 * gap;

        let pull = if me.x.abs() >= me.y.abs() {
            if me.x > 0.0 {
                PULL_LEFT
            } else {
                PULL_RIGHT
            }
        } else if me.y > 0.0 {
            PULL_UP
        } else {
            PULL_DOWN
        };
        let opinion = pull * scaler;
        tracing::debug!(x = me.x, y = me.y, scaler, "archery opinion {opinion}");
        opinion
    }

    fn reset(&mut self) {
        tracing::debug!(turns = self.turns_seen, "resetting archery");
        self.turns_seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::decider::decide;

    fn line(wind: &str, cursors: [(i16, i16); 3]) -> EventTurn {
        let mut registers = [0i16; 7];
        for (p, (x, y)) in cursors.iter().enumerate() {
            registers[2 * p] = *x;
            registers[2 * p + 1] = *y;
        }
        EventTurn::new(wind, registers)
    }

    fn decide_for(seat: usize, turn: &EventTurn) -> Action {
        decide(&ArcheryStrategy::new(Seat::new(seat)).produce_opinion(turn))
    }

    #[test]
    fn steers_toward_centre_on_dominant_axis() {
        let others = (3, 4);
        assert_eq!(decide_for(0, &line("555", [(8, 2), others, others])), Action::Left);
        assert_eq!(decide_for(0, &line("555", [(-8, 2), others, others])), Action::Right);
        assert_eq!(decide_for(0, &line("555", [(1, 7), others, others])), Action::Up);
        assert_eq!(decide_for(0, &line("555", [(1, -7), others, others])), Action::Down);
    }

    #[test]
    fn diagonal_prefers_horizontal_axis() {
        let others = (3, 4);
        assert_eq!(decide_for(0, &line("9", [(5, 5), others, others])), Action::Left);
        assert_eq!(decide_for(0, &line("9", [(-5, -5), others, others])), Action::Right);
    }

    #[test]
    fn scales_by_turns_left_and_gap_to_best_opponent() {
        // me at distance 10, best opponent at 5 -> gap 2, 3 turns -> 6
        let turn = line("123", [(6, 8), (3, 4), (0, 20)]);
        let opinion = ArcheryStrategy::new(Seat::new(0)).produce_opinion(&turn);
        assert_eq!(opinion, CostVector::new(-6.0, 6.0, 0.0, 0.0));
    }

    #[test]
    fn uses_own_seat_cursor() {
        let turn = line("12", [(0, 0), (0, 0), (0, -9)]);
        assert_eq!(decide_for(2, &turn), Action::Down);
        assert_eq!(
            ArcheryStrategy::new(Seat::new(0)).produce_opinion(&turn),
            CostVector::zero()
        );
    }

    #[test]
    fn opponent_on_bullseye_keeps_opinion_finite() {
        let turn = line("12", [(4, 0), (0, 0), (7, 7)]);
        let opinion = ArcheryStrategy::new(Seat::new(0)).produce_opinion(&turn);
        assert!(opinion.is_finite());
        assert_eq!(opinion, PULL_LEFT * 2.0);
    }

    #[test]
    fn abstains_without_wind() {
        let turn = line("", [(4, 0), (1, 1), (1, 1)]);
        assert_eq!(
            ArcheryStrategy::new(Seat::new(0)).produce_opinion(&turn),
            CostVector::zero()
        );
    }
}
