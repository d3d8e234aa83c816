//! Probabilistic single-card level mutation.
//!
//! A mash rolls once against three fixed outcomes:
//!
//! | outcome | probability | effect              |
//! |---------|-------------|---------------------|
//! | better  | 0.15        | level + 1, max 7    |
//! | worse   | 0.05        | level - 1, min 1    |
//! | same    | 0.80        | unchanged           |
//!
//! Who may mash and how often is decided by the caller.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::card::{Card, MAX_LEVEL, MIN_LEVEL};

pub const P_BETTER: f64 = 0.15;
pub const P_WORSE: f64 = 0.05;
pub const P_SAME: f64 = 1.0 - P_BETTER - P_WORSE;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MashOutcome {
    Better,
    Worse,
    Same,
}

impl MashOutcome {
    /// Maps a roll in `[0, 1)` onto an outcome.
    pub fn from_roll(roll: f64) -> Self {
        if roll < P_BETTER {
            MashOutcome::Better
        } else if roll < P_BETTER + P_WORSE {
            MashOutcome::Worse
        } else {
            MashOutcome::Same
        }
    }

    /// Level after applying this outcome, clamped to the legal range.
    pub fn apply(self, level: u8) -> u8 {
        match self {
            MashOutcome::Better => level.saturating_add(1).min(MAX_LEVEL),
            MashOutcome::Worse => level.saturating_sub(1).max(MIN_LEVEL),
            MashOutcome::Same => level,
        }
    }
}

/// Result of one mash, reported back to the log.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MashReport {
    pub outcome: MashOutcome,
    pub before: u8,
    pub after: u8,
}

impl MashReport {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Mutates the card's level in place for a given roll.
pub fn mash_with_roll(card: &mut Card, roll: f64) -> MashReport {
    let outcome = MashOutcome::from_roll(roll);
    let before = card.level;
    card.level = outcome.apply(before);
    MashReport {
        outcome,
        before,
        after: card.level,
    }
}

/// Draws a roll and mutates the card's level in place.
pub fn mash<R: Rng + ?Sized>(card: &mut Card, rng: &mut R) -> MashReport {
    let roll = rng.gen_range(0.0..1.0);
    mash_with_roll(card, roll)
}
