//! Line protocol spoken with the referee.
//!
//! Input is whitespace-separated tokens: a header (`player_idx`, `nb_games`),
//! optionally a flat list of curve coefficients, then per turn one score line
//! per player followed by one line per event. Output is one action token per
//! turn.

use crate::action::Action;
use crate::config::{CoefficientSource, EngineConfig};
use crate::curve::{CurveSet, COEFFICIENTS_PER_CURVE};
use crate::engine::AggregationEngine;
use crate::error::VoteError;
use crate::strategies::EventStrategy;
use crate::turn::{EventTurn, ScoreLine, TurnInput, MEDAL_KINDS, PLAYER_COUNT, REGISTER_COUNT};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

pub const READY_TOKEN: &str = "INITIALIZED";

pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
    line_no: usize,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line_no: 0,
        }
    }

    /// Next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("failed reading input line {}", self.line_no + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    pub fn parse_next<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let token = self
            .next_token()?
            .ok_or_else(|| anyhow!("unexpected end of input reading {what} (line {})", self.line_no))?;
        token
            .parse::<T>()
            .map_err(|err| anyhow!("invalid {what} '{token}' on line {}: {err}", self.line_no))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    pub player_idx: usize,
    pub game_count: usize,
}

pub fn read_header<R: BufRead>(tokens: &mut TokenReader<R>) -> Result<Header> {
    let player_idx: usize = tokens.parse_next("player index")?;
    if player_idx >= PLAYER_COUNT {
        return Err(anyhow!(
            "player index {player_idx} out of range (0..{PLAYER_COUNT})"
        ));
    }
    let game_count: usize = tokens.parse_next("game count")?;
    Ok(Header {
        player_idx,
        game_count,
    })
}

/// Reads `slots` curves worth of coefficients (`a b c d` per slot).
pub fn read_coefficients<R: BufRead>(tokens: &mut TokenReader<R>, slots: usize) -> Result<CurveSet> {
    let mut values = Vec::with_capacity(slots * COEFFICIENTS_PER_CURVE);
    for idx in 0..slots * COEFFICIENTS_PER_CURVE {
        let value: f64 = tokens.parse_next(&format!("curve coefficient #{idx}"))?;
        if !value.is_finite() {
            return Err(anyhow!("curve coefficient #{idx} is not finite: {value}"));
        }
        values.push(value);
    }
    Ok(CurveSet::from_flat(&values, slots)?)
}

/// Reads one turn. `Ok(None)` means the input ended cleanly between turns.
pub fn read_turn<R: BufRead>(
    tokens: &mut TokenReader<R>,
    game_count: usize,
) -> Result<Option<TurnInput>> {
    let Some(first) = tokens.next_token()? else {
        return Ok(None);
    };

    let mut scores = Vec::with_capacity(PLAYER_COUNT);
    for player in 0..PLAYER_COUNT {
        let score: i32 = if player == 0 {
            first
                .parse()
                .map_err(|err| anyhow!("invalid score '{first}': {err}"))?
        } else {
            tokens.parse_next("player score")?
        };
        let mut medals = Vec::with_capacity(game_count);
        for _ in 0..game_count {
            let mut counts = [0i32; MEDAL_KINDS];
            for count in counts.iter_mut() {
                *count = tokens.parse_next("medal count")?;
            }
            medals.push(counts);
        }
        scores.push(ScoreLine { score, medals });
    }

    let mut events = Vec::with_capacity(game_count);
    for _ in 0..game_count {
        let gpu: String = tokens.parse_next("event gpu")?;
        let mut registers = [0i16; REGISTER_COUNT];
        for reg in registers.iter_mut() {
            *reg = tokens.parse_next("event register")?;
        }
        events.push(EventTurn { gpu, registers });
    }

    Ok(Some(TurnInput { scores, events }))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub player_idx: usize,
    pub turns: u32,
    pub actions: Vec<Action>,
    pub action_counts: BTreeMap<Action, u32>,
}

/// Plays a full session: header, optional coefficients, then one decision
/// per turn until the input ends or `max_turns` is reached.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: &EngineConfig,
    max_turns: u32,
) -> Result<SessionSummary> {
    let mut tokens = TokenReader::new(input);
    let header = read_header(&mut tokens)?;
    tracing::debug!(
        player_idx = header.player_idx,
        games = header.game_count,
        "session header"
    );
    let roster_len = EventStrategy::roster(header.player_idx).len();
    if header.game_count != roster_len {
        return Err(VoteError::RosterMismatch {
            expected: roster_len,
            actual: header.game_count,
        })
        .context("header game count does not match the strategy roster");
    }

    let curves = match config.resolve_curves()? {
        Some(curves) => curves,
        None => {
            let curves = read_coefficients(&mut tokens, header.game_count)
                .context("failed reading external curve coefficients")?;
            writeln!(output, "{READY_TOKEN}")?;
            output.flush()?;
            curves
        }
    };
    if config.coefficients_source != CoefficientSource::Inline {
        tracing::info!(curves = ?curves.curves, "using non-default confidence curves");
    }

    let mut engine = AggregationEngine::for_player(header.player_idx, config, &curves)
        .context("failed building aggregation engine")?;

    let mut summary = SessionSummary {
        player_idx: header.player_idx,
        ..SessionSummary::default()
    };
    while summary.turns < max_turns {
        let Some(turn) = read_turn(&mut tokens, header.game_count)
            .with_context(|| format!("failed reading turn {}", summary.turns))?
        else {
            break;
        };
        tracing::trace!(scores = ?turn.scores, "turn scores");

        let decision = engine
            .run_turn(&turn.events)
            .with_context(|| format!("turn {} aggregation failed", summary.turns))?;
        writeln!(output, "{}", decision.action)?;
        output.flush()?;

        summary.turns += 1;
        summary.actions.push(decision.action);
        *summary.action_counts.entry(decision.action).or_default() += 1;
    }

    tracing::debug!(turns = summary.turns, "session finished");
    Ok(summary)
}
