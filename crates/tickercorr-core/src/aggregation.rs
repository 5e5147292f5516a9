//! Pure statistics over price series.
//!
//! All dispersion measures use the population formulas (divisor `n`, not
//! `n - 1`). Nothing here performs I/O or touches shared state.

use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::AggregationError;

/// Pearson coefficient, or the explicit undefined state produced when either
/// input has zero variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined,
}

impl Correlation {
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(value),
            Self::Undefined => None,
        }
    }

    pub const fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn strength(self) -> Option<CorrelationStrength> {
        self.value().map(CorrelationStrength::classify)
    }
}

/// `Undefined` serializes as `null`.
impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl Display for Correlation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defined(value) => write!(f, "{value:.4}"),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

/// Display bands for a defined coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    WeakPositive,
    NegligiblePositive,
    WeakNegative,
    StrongNegative,
}

impl CorrelationStrength {
    pub fn classify(value: f64) -> Self {
        if value > 0.75 {
            Self::StrongPositive
        } else if value > 0.5 {
            Self::ModeratePositive
        } else if value > 0.25 {
            Self::WeakPositive
        } else if value > 0.0 {
            Self::NegligiblePositive
        } else if value > -0.25 {
            Self::WeakNegative
        } else {
            Self::StrongNegative
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongPositive => "strong_positive",
            Self::ModeratePositive => "moderate_positive",
            Self::WeakPositive => "weak_positive",
            Self::NegligiblePositive => "negligible_positive",
            Self::WeakNegative => "weak_negative",
            Self::StrongNegative => "strong_negative",
        }
    }
}

impl Display for CorrelationStrength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation. `None` for an empty slice.
///
/// A series of identical values is exactly `0.0`; the rounded mean of such a
/// series need not equal its elements, so this is checked directly.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if is_constant(values) {
        return Some(0.0);
    }
    let sum_sq = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>();
    Some((sum_sq / values.len() as f64).sqrt())
}

/// Population covariance of two equal-length series.
pub fn covariance(left: &[f64], right: &[f64]) -> Result<f64, AggregationError> {
    ensure_paired(left, right)?;

    let (mean_left, mean_right) = match (mean(left), mean(right)) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(AggregationError::EmptySeries),
    };

    let sum_prod = left
        .iter()
        .zip(right)
        .map(|(l, r)| (l - mean_left) * (r - mean_right))
        .sum::<f64>();

    Ok(sum_prod / left.len() as f64)
}

/// Pearson correlation of two equal-length series.
///
/// A constant series has zero standard deviation, which makes the
/// coefficient undefined; that case is returned as [`Correlation::Undefined`]
/// rather than as NaN.
pub fn correlation(left: &[f64], right: &[f64]) -> Result<Correlation, AggregationError> {
    let covariance = covariance(left, right)?;

    let (sd_left, sd_right) = match (population_std_dev(left), population_std_dev(right)) {
        (Some(l), Some(r)) => (l, r),
        _ => return Err(AggregationError::EmptySeries),
    };

    if sd_left == 0.0 || sd_right == 0.0 {
        return Ok(Correlation::Undefined);
    }

    let value = covariance / (sd_left * sd_right);
    if !value.is_finite() {
        return Ok(Correlation::Undefined);
    }

    // Rounding can push |r| a hair past 1.
    Ok(Correlation::Defined(value.clamp(-1.0, 1.0)))
}

fn is_constant(values: &[f64]) -> bool {
    values
        .split_first()
        .is_some_and(|(first, rest)| rest.iter().all(|value| value == first))
}

fn ensure_paired(left: &[f64], right: &[f64]) -> Result<(), AggregationError> {
    if left.is_empty() || right.is_empty() {
        return Err(AggregationError::EmptySeries);
    }
    if left.len() != right.len() {
        return Err(AggregationError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}
