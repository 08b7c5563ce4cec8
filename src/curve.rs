//! Confidence curves: `a·x³ + b·x² + c·x + d`, evaluated on a strategy's own
//! opinion to decide how much that opinion is trusted.

use crate::costs::CostVector;
use crate::error::VoteError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const COEFFICIENTS_PER_CURVE: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl ConfidenceCurve {
    pub const fn cubic(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub const fn quadratic(b: f64, c: f64, d: f64) -> Self {
        Self::cubic(0.0, b, c, d)
    }

    pub const fn linear(c: f64, d: f64) -> Self {
        Self::cubic(0.0, 0.0, c, d)
    }

    pub const fn constant(d: f64) -> Self {
        Self::cubic(0.0, 0.0, 0.0, d)
    }

    pub fn coefficients(&self) -> [f64; COEFFICIENTS_PER_CURVE] {
        [self.a, self.b, self.c, self.d]
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.a * x * x * x + self.b * x * x + self.c * x + self.d
    }

    pub fn evaluate_costs(&self, costs: CostVector) -> CostVector {
        costs.map(|x| self.evaluate(x))
    }
}

impl From<[f64; COEFFICIENTS_PER_CURVE]> for ConfidenceCurve {
    fn from([a, b, c, d]: [f64; COEFFICIENTS_PER_CURVE]) -> Self {
        Self::cubic(a, b, c, d)
    }
}

/// One curve per event slot, in roster order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveSet {
    pub curves: Vec<ConfidenceCurve>,
}

impl CurveSet {
    /// Tuned reference coefficients for hurdles, archery, skating and diving.
    pub fn builtin() -> Self {
        Self {
            curves: vec![
                ConfidenceCurve::cubic(
                    -0.48562301469285085,
                    14.560719309039953,
                    11.501279122760458,
                    15.919786940425276,
                ),
                ConfidenceCurve::cubic(
                    0.015640058614165953,
                    0.03477142832844393,
                    -2.6045582061099912,
                    -3.6463286061008153,
                ),
                ConfidenceCurve::cubic(
                    0.09721789666247926,
                    7.419701990195123,
                    1.65630939318324,
                    -4.116144837869353,
                ),
                ConfidenceCurve::cubic(
                    1.8492198786838454,
                    15.839304318465024,
                    -12.07666784285157,
                    9.434974481354772,
                ),
            ],
        }
    }

    /// Builds `slots` curves from a flat `a b c d a b c d ...` list.
    pub fn from_flat(values: &[f64], slots: usize) -> Result<Self, VoteError> {
        let expected = slots * COEFFICIENTS_PER_CURVE;
        if values.len() != expected {
            return Err(VoteError::InvalidCoefficients {
                expected,
                actual: values.len(),
            });
        }
        let curves = values
            .chunks_exact(COEFFICIENTS_PER_CURVE)
            .map(|chunk| ConfidenceCurve::cubic(chunk[0], chunk[1], chunk[2], chunk[3]))
            .collect();
        Ok(Self { curves })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed reading curve set {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("invalid curve set json in {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_to_constant_at_zero() {
        for curve in [
            ConfidenceCurve::cubic(3.0, -2.0, 9.5, 1.25),
            ConfidenceCurve::cubic(-1e9, 1e9, -7.0, -0.5),
            ConfidenceCurve::constant(42.0),
        ] {
            assert_eq!(curve.evaluate(0.0), curve.d);
        }
    }

    #[test]
    fn evaluates_cubic() {
        let curve = ConfidenceCurve::cubic(1.0, 2.0, 3.0, 4.0);
        assert_eq!(curve.evaluate(2.0), 8.0 + 8.0 + 6.0 + 4.0);
        assert_eq!(curve.evaluate(-1.0), -1.0 + 2.0 - 3.0 + 4.0);
    }

    #[test]
    fn shorter_constructors_fill_leading_zeros() {
        assert_eq!(ConfidenceCurve::linear(2.0, 1.0).coefficients(), [0.0, 0.0, 2.0, 1.0]);
        assert_eq!(
            ConfidenceCurve::quadratic(3.0, 2.0, 1.0).coefficients(),
            [0.0, 3.0, 2.0, 1.0]
        );
        assert_eq!(ConfidenceCurve::default(), ConfidenceCurve::constant(0.0));
    }

    #[test]
    fn evaluates_each_cost_field_independently() {
        let curve = ConfidenceCurve::linear(2.0, 1.0);
        let weights = curve.evaluate_costs(CostVector::new(0.0, 1.0, -1.0, 3.0));
        assert_eq!(weights, CostVector::new(1.0, 3.0, -1.0, 7.0));
    }

    #[test]
    fn flat_coefficients_split_into_curves() {
        let values: Vec<f64> = (0..8).map(f64::from).collect();
        let set = CurveSet::from_flat(&values, 2).unwrap();
        assert_eq!(set.curves[0], ConfidenceCurve::cubic(0.0, 1.0, 2.0, 3.0));
        assert_eq!(set.curves[1], ConfidenceCurve::cubic(4.0, 5.0, 6.0, 7.0));
    }

    #[test]
    fn flat_coefficients_reject_wrong_count() {
        assert_eq!(
            CurveSet::from_flat(&[1.0; 15], 4),
            Err(VoteError::InvalidCoefficients {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn curve_set_json_roundtrip_through_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("curves.json");
        fs::write(&path, serde_json::to_vec_pretty(&CurveSet::builtin())?)?;
        let loaded = CurveSet::from_file(&path)?;
        assert_eq!(loaded.len(), 4);
        for (got, want) in loaded.curves.iter().zip(CurveSet::builtin().curves.iter()) {
            for (x, y) in got.coefficients().iter().zip(want.coefficients().iter()) {
                assert!((x - y).abs() < 1e-12, "{x} != {y}");
            }
        }
        Ok(())
    }
}
