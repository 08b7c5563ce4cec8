//! Hurdle race: UP jumps 2, LEFT steps 1, DOWN runs 2, RIGHT runs 3.
//! Landing on or running through a hurdle without jumping stuns.

use super::{Seat, Strategy};
use crate::costs::CostVector;
use crate::turn::EventTurn;

pub const TRACK_LENGTH: usize = 30;
const TILE_EMPTY: u8 = b'.';
const TILE_HURDLE: u8 = b'#';

const JUMP_NOW: CostVector = CostVector::new(-1.0, 3.0, 3.0, 3.0);
const STEP_ONE: CostVector = CostVector::new(3.0, 3.0, -1.0, 3.0);
const AVOID_SPRINT: CostVector = CostVector::new(-2.0, -2.0, -1.0, 3.0);
const SPRINT: CostVector = CostVector::new(-2.0, -2.0, -1.0, -3.0);

#[derive(Clone, Debug)]
pub struct HurdlesStrategy {
    seat: Seat,
    turns_seen: u32,
}

impl HurdlesStrategy {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            turns_seen: 0,
        }
    }

    /// Track as seen from `position`: index 0 is the current tile, anything
    /// past the finish reads as empty.
    fn view_from(gpu: &str, position: usize) -> [u8; TRACK_LENGTH] {
        let track = gpu.as_bytes();
        let mut view = [TILE_EMPTY; TRACK_LENGTH];
        for (offset, tile) in view.iter_mut().enumerate() {
            let idx = position + offset;
            if idx < TRACK_LENGTH {
                if let Some(&byte) = track.get(idx) {
                    *tile = byte;
                }
            }
        }
        view
    }
}

impl Strategy for HurdlesStrategy {
    fn id(&self) -> &'static str {
        "hurdles"
    }

    fn description(&self) -> &'static str {
        "Jumps the next hurdle, steps up to it, otherwise sprints."
    }

    fn produce_opinion(&mut self, turn: &EventTurn) -> CostVector {
        if turn.is_game_over() {
            return CostVector::zero();
        }
        self.turns_seen += 1;

        let position = turn.register(self.seat.me);
        let stun = turn.register(self.seat.me + 3);
        if stun != 0 {
            tracing::debug!(stun, "hurdles: stunned, abstaining");
            return CostVector::zero();
        }
        let Ok(position) = usize::try_from(position) else {
            tracing::debug!(position, "hurdles: negative position, abstaining");
            return CostVector::zero();
        };

        let view = Self::view_from(&turn.gpu, position);
        let opinion = if view[1] == TILE_HURDLE {
            JUMP_NOW
        } else if view[2] == TILE_HURDLE {
            STEP_ONE
        } else if view[3] == TILE_HURDLE {
            AVOID_SPRINT
        } else {
            SPRINT
        };
        tracing::debug!(
            turn = self.turns_seen,
            view = %String::from_utf8_lossy(&view),
            "hurdles opinion {opinion}"
        );
        opinion
    }

    fn reset(&mut self) {
        tracing::debug!(turns = self.turns_seen, "resetting hurdles");
        self.turns_seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::decider::decide;

    fn line(track: &str, position: i16, stun: i16) -> EventTurn {
        let mut registers = [0i16; 7];
        registers[0] = position;
        registers[3] = stun;
        EventTurn::new(track, registers)
    }

    fn opinion(track: &str, position: i16) -> CostVector {
        HurdlesStrategy::new(Seat::new(0)).produce_opinion(&line(track, position, 0))
    }

    #[test]
    fn jumps_adjacent_hurdle() {
        assert_eq!(opinion(".#............................", 0), JUMP_NOW);
        assert_eq!(decide(&JUMP_NOW), Action::Up);
    }

    #[test]
    fn single_steps_two_tiles_out() {
        assert_eq!(opinion("..#...........................", 0), STEP_ONE);
        assert_eq!(decide(&STEP_ONE), Action::Left);
    }

    #[test]
    fn avoids_sprinting_three_tiles_out() {
        assert_eq!(opinion("...#..........................", 0), AVOID_SPRINT);
    }

    #[test]
    fn sprints_on_clear_track() {
        assert_eq!(opinion("..............................", 0), SPRINT);
        assert_eq!(decide(&SPRINT), Action::Right);
    }

    #[test]
    fn view_is_shifted_by_position() {
        let track = ".....#........................";
        assert_eq!(opinion(track, 4), JUMP_NOW);
        assert_eq!(opinion(track, 3), STEP_ONE);
        assert_eq!(opinion(track, 6), SPRINT);
    }

    #[test]
    fn past_the_end_reads_as_empty() {
        let track = "............................#.";
        assert_eq!(opinion(track, 29), SPRINT);
        assert_eq!(opinion(track, 27), JUMP_NOW);
        assert_eq!(opinion("..", 0), SPRINT);
    }

    #[test]
    fn abstains_when_stunned_or_malformed() {
        let mut strategy = HurdlesStrategy::new(Seat::new(0));
        assert_eq!(strategy.produce_opinion(&line(".#..", 0, 2)), CostVector::zero());
        assert_eq!(strategy.produce_opinion(&line(".#..", -1, 0)), CostVector::zero());
    }

    #[test]
    fn reads_own_seat_registers() {
        let mut registers = [0i16; 7];
        registers[2] = 4; // our position as player 2
        registers[5] = 0;
        registers[3] = 1; // player 0 is stunned, irrelevant to us
        let turn = EventTurn::new(".....#........................", registers);
        let opinion = HurdlesStrategy::new(Seat::new(2)).produce_opinion(&turn);
        assert_eq!(opinion, JUMP_NOW);
    }
}
