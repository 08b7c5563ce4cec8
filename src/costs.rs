//! Four-way cost vector shared by every opinion and by the per-turn net.
//!
//! Lower is better. Operators are elementwise against another vector and
//! broadcast against an `f64`. The plain `/` operators follow IEEE semantics;
//! callers that cannot tolerate infinities use `checked_div` /
//! `checked_div_scalar`.

use crate::action::Action;
use crate::error::VoteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostVector {
    pub up: f64,
    pub down: f64,
    pub left: f64,
    pub right: f64,
}

impl CostVector {
    pub const fn new(up: f64, down: f64, left: f64, right: f64) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub const fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Same cost on every action, i.e. no preference.
    pub const fn uniform(k: f64) -> Self {
        Self::new(k, k, k, k)
    }

    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::Up => self.up,
            Action::Down => self.down,
            Action::Left => self.left,
            Action::Right => self.right,
        }
    }

    pub fn set(&mut self, action: Action, value: f64) {
        match action {
            Action::Up => self.up = value,
            Action::Down => self.down = value,
            Action::Left => self.left = value,
            Action::Right => self.right = value,
        }
    }

    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::new(f(self.up), f(self.down), f(self.left), f(self.right))
    }

    pub fn zip_with(self, rhs: Self, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        Self::new(
            f(self.up, rhs.up),
            f(self.down, rhs.down),
            f(self.left, rhs.left),
            f(self.right, rhs.right),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::ALL.into_iter().map(move |action| (action, self.get(action)))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, value)| value == 0.0)
    }

    pub fn first_non_finite(&self) -> Option<Action> {
        self.iter()
            .find(|(_, value)| !value.is_finite())
            .map(|(action, _)| action)
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    pub fn checked_div(self, rhs: Self) -> Result<Self, VoteError> {
        if let Some((action, _)) = rhs.iter().find(|(_, value)| *value == 0.0) {
            return Err(VoteError::DivisionByZero { action });
        }
        Ok(self / rhs)
    }

    pub fn checked_div_scalar(self, k: f64) -> Result<Self, VoteError> {
        if k == 0.0 {
            return Err(VoteError::ScalarDivisionByZero);
        }
        Ok(self / k)
    }
}

impl From<f64> for CostVector {
    fn from(k: f64) -> Self {
        Self::uniform(k)
    }
}

impl fmt::Display for CostVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UP={:+.3} DOWN={:+.3} LEFT={:+.3} RIGHT={:+.3}",
            self.up, self.down, self.left, self.right
        )
    }
}

macro_rules! elementwise_ops {
    ($($op:ident :: $method:ident, $assign:ident :: $assign_method:ident => $sym:tt;)*) => {
        $(
            impl $op for CostVector {
                type Output = CostVector;

                fn $method(self, rhs: CostVector) -> CostVector {
                    self.zip_with(rhs, |a, b| a $sym b)
                }
            }

            impl $op<f64> for CostVector {
                type Output = CostVector;

                fn $method(self, k: f64) -> CostVector {
                    self.map(|a| a $sym k)
                }
            }

            impl $assign for CostVector {
                fn $assign_method(&mut self, rhs: CostVector) {
                    *self = $op::$method(*self, rhs);
                }
            }

            impl $assign<f64> for CostVector {
                fn $assign_method(&mut self, k: f64) {
                    *self = $op::$method(*self, k);
                }
            }
        )*
    };
}

elementwise_ops! {
    Add::add, AddAssign::add_assign => +;
    Sub::sub, SubAssign::sub_assign => -;
    Mul::mul, MulAssign::mul_assign => *;
    Div::div, DivAssign::div_assign => /;
}

impl std::iter::Sum for CostVector {
    fn sum<I: Iterator<Item = CostVector>>(iter: I) -> Self {
        iter.fold(CostVector::zero(), |acc, next| acc + next)
    }
}

#[cfg(test)]
pub(crate) fn approx_eq(a: CostVector, b: CostVector, eps: f64) -> bool {
    a.iter().zip(b.iter()).all(|((_, x), (_, y))| (x - y).abs() <= eps)
}
