use crate::action::Action;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum VoteError {
    DivisionByZero { action: Action },
    ScalarDivisionByZero,
    DegenerateConfidence { slot: usize, action: Action },
    NonFiniteCost { slot: usize, action: Action },
    RosterMismatch { expected: usize, actual: usize },
    InvalidCoefficients { expected: usize, actual: usize },
}

impl fmt::Display for VoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero { action } => {
                write!(f, "division by zero in {action} cost field")
            }
            Self::ScalarDivisionByZero => write!(f, "division of cost vector by zero scalar"),
            Self::DegenerateConfidence { slot, action } => write!(
                f,
                "confidence curve for slot {slot} evaluated to zero on {action}; coefficients are miscalibrated"
            ),
            Self::NonFiniteCost { slot, action } => {
                write!(f, "slot {slot} produced a non-finite {action} cost")
            }
            Self::RosterMismatch { expected, actual } => write!(
                f,
                "turn carried {actual} event states, roster has {expected} slots"
            ),
            Self::InvalidCoefficients { expected, actual } => write!(
                f,
                "expected {expected} curve coefficients, got {actual}"
            ),
        }
    }
}

impl std::error::Error for VoteError {}
