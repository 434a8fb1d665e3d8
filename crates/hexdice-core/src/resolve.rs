//! Outcome, confidence tier, and the diagnostic line.

use std::fmt;

use serde::Serialize;

use crate::features::FeatureSet;
use crate::score::{self, Score};

/// Probability at or above which the outcome is [`Outcome::High`].
pub const HIGH_OUTCOME_CUTOFF: f64 = 0.5;

/// The two predicted outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// "Tài": three-dice sum 11..=18.
    High,
    /// "Xỉu": three-dice sum 3..=10.
    Low,
}

impl Outcome {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_OUTCOME_CUTOFF {
            Self::High
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
        }
    }

    /// Domain label used in replies and history rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "Tài",
            Self::Low => "Xỉu",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Confidence tiers, lowest first so the derived ordering follows probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceTier {
    /// Top-down cutoffs; first match wins.
    const CUTOFFS: [(f64, Self); 3] = [
        (0.9, Self::VeryHigh),
        (0.8, Self::High),
        (0.7, Self::Medium),
    ];

    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        Self::CUTOFFS
            .iter()
            .find(|(cutoff, _)| probability >= *cutoff)
            .map_or(Self::Low, |&(_, tier)| tier)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved result of scoring one feature set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub score: Score,
    pub probability: f64,
    pub outcome: Outcome,
    pub confidence: ConfidenceTier,
    pub diagnostics: String,
}

/// Score the features and derive outcome, tier and diagnostics.
#[must_use]
pub fn resolve(features: &FeatureSet) -> Verdict {
    let score = score::score(features);
    let probability = score.probability();
    Verdict {
        score,
        probability,
        outcome: Outcome::from_probability(probability),
        confidence: ConfidenceTier::from_probability(probability),
        diagnostics: diagnostics(features, score),
    }
}

/// Single-line summary of every feature and the score.
#[must_use]
pub fn diagnostics(f: &FeatureSet, score: Score) -> String {
    format!(
        "Entropy={:.3} | StdDev={:.1} | Bias={:.2} | Gradient={} | HexDensity={:.2} | \
         Skewness={:.2} | Kurtosis={:.2} | CRC16={} | Score={}",
        f.entropy,
        f.stddev,
        f.bias_rolling,
        f.gradient,
        f.hex_density,
        f.skewness,
        f.kurtosis,
        f.crc16,
        score.value(),
    )
}
