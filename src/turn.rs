use serde::{Deserialize, Serialize};

pub const PLAYER_COUNT: usize = 3;
pub const REGISTER_COUNT: usize = 7;
pub const MEDAL_KINDS: usize = 3;
pub const GAME_OVER_TOKEN: &str = "GAME_OVER";

/// One event's line of turn input: the GPU string and seven registers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTurn {
    pub gpu: String,
    pub registers: [i16; REGISTER_COUNT],
}

impl EventTurn {
    pub fn new(gpu: impl Into<String>, registers: [i16; REGISTER_COUNT]) -> Self {
        Self {
            gpu: gpu.into(),
            registers,
        }
    }

    pub fn game_over() -> Self {
        Self::new(GAME_OVER_TOKEN, [0; REGISTER_COUNT])
    }

    /// The event is restarting; its strategy must be reset.
    pub fn is_game_over(&self) -> bool {
        self.gpu == GAME_OVER_TOKEN
    }

    pub fn register(&self, idx: usize) -> i16 {
        self.registers.get(idx).copied().unwrap_or(0)
    }
}

/// Per-player score line: running score then gold/silver/bronze counts for
/// each event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub score: i32,
    pub medals: Vec<[i32; MEDAL_KINDS]>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    pub scores: Vec<ScoreLine>,
    pub events: Vec<EventTurn>,
}
