//! Three-dice simulation constrained by the resolved outcome.
//!
//! Dice are redrawn as a triple until the sum lands in the outcome's range.
//! Exactly half of the 216 triples qualify for each outcome, so the budget
//! below is never reached with a working RNG.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::InternalFault;
use crate::resolve::Outcome;

/// Draw budget before the roll is reported as an internal fault.
pub const MAX_ROLL_ATTEMPTS: u32 = 10_000;

const FACES: RangeInclusive<u8> = 1..=6;

/// Three faces and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceRoll {
    pub faces: [u8; 3],
    pub total: u8,
}

impl DiceRoll {
    fn from_faces(faces: [u8; 3]) -> Self {
        Self {
            faces,
            total: faces.iter().sum(),
        }
    }
}

/// Inclusive sum range that agrees with `outcome`.
#[must_use]
pub const fn sum_range(outcome: Outcome) -> RangeInclusive<u8> {
    match outcome {
        Outcome::High => 11..=18,
        Outcome::Low => 3..=10,
    }
}

/// Rejection-sampling dice roller.
#[derive(Debug)]
pub struct DiceSimulator<R = StdRng> {
    rng: R,
    max_attempts: u32,
}

impl DiceSimulator<StdRng> {
    /// Freshly seeded from OS entropy; intended to be built per request.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible roller for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceSimulator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_attempts: MAX_ROLL_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Roll until the sum agrees with `outcome`.
    pub fn roll(&mut self, outcome: Outcome) -> Result<DiceRoll, InternalFault> {
        let range = sum_range(outcome);
        for _ in 0..self.max_attempts {
            let roll = DiceRoll::from_faces([self.face(), self.face(), self.face()]);
            if range.contains(&roll.total) {
                return Ok(roll);
            }
        }
        Err(InternalFault::DiceBudgetExhausted {
            outcome,
            attempts: self.max_attempts,
        })
    }

    fn face(&mut self) -> u8 {
        self.rng.gen_range(FACES)
    }
}
