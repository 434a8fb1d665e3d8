//! Threshold scoring and the score-to-probability table.
//!
//! Each of the eight checks adds exactly one point when it passes; no check
//! subtracts. The thresholds are fixed constants and are not tuned.

use serde::Serialize;

use crate::features::FeatureSet;

/// Highest reachable score (all checks pass).
pub const MAX_SCORE: u8 = 8;

/// Probability for any score the table does not list.
pub const DEFAULT_PROBABILITY: f64 = 0.45;

/// Score → probability. Scores 0..=2 fall through to [`DEFAULT_PROBABILITY`].
const PROBABILITY_TABLE: [(u8, f64); 6] = [
    (8, 0.95),
    (7, 0.85),
    (6, 0.75),
    (5, 0.65),
    (4, 0.55),
    (3, 0.45),
];

/// Count of passed threshold checks, always in `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// Returns `None` above [`MAX_SCORE`].
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= MAX_SCORE {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn probability(self) -> f64 {
        probability_for_score(self.0)
    }
}

/// Table lookup with the shared 0.45 fallback.
///
/// A table miss and a low score are deliberately indistinguishable.
#[must_use]
pub fn probability_for_score(score: u8) -> f64 {
    PROBABILITY_TABLE
        .iter()
        .find(|(s, _)| *s == score)
        .map_or(DEFAULT_PROBABILITY, |&(_, p)| p)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Comparator {
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "<")]
    Below,
}

impl Comparator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Above => ">",
            Self::Below => "<",
        }
    }

    fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Above => value > threshold,
            Self::Below => value < threshold,
        }
    }
}

/// One evaluated threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCheck {
    pub name: &'static str,
    pub value: f64,
    pub comparator: Comparator,
    pub threshold: f64,
    pub passed: bool,
}

impl ThresholdCheck {
    fn evaluate(name: &'static str, value: f64, comparator: Comparator, threshold: f64) -> Self {
        Self {
            name,
            value,
            comparator,
            threshold,
            passed: comparator.holds(value, threshold),
        }
    }
}

/// Evaluate all eight checks in their fixed order.
#[must_use]
pub fn score_breakdown(f: &FeatureSet) -> [ThresholdCheck; MAX_SCORE as usize] {
    use Comparator::{Above, Below};
    [
        ThresholdCheck::evaluate("entropy", f.entropy, Above, 0.58),
        ThresholdCheck::evaluate("stddev", f.stddev, Above, 55.0),
        ThresholdCheck::evaluate("bias_rolling", f.bias_rolling, Below, 0.2),
        ThresholdCheck::evaluate("repetition_penalty", f.repetition_penalty, Below, 0.1),
        ThresholdCheck::evaluate("gradient", f64::from(f.gradient), Above, 80.0),
        ThresholdCheck::evaluate("hex_density", f.hex_density, Above, 0.55),
        ThresholdCheck::evaluate("skewness", f.skewness, Above, 0.5),
        ThresholdCheck::evaluate("kurtosis", f.kurtosis, Above, 3.0),
    ]
}

#[must_use]
pub fn score(f: &FeatureSet) -> Score {
    let passed = score_breakdown(f).iter().filter(|c| c.passed).count();
    // At most eight checks exist.
    Score(passed as u8)
}
