//! Cheapest-valid-play search used by AI seats and timeouts.

use crate::card::{Card, total_level};
use crate::requirement::{RoundRequirement, validate};
use crate::state::PlayedSet;

/// Finds the valid selection with the lowest summed level, or `None` to pass.
///
/// Candidates are the `count`-subsets of the hand (restricted to the required
/// resource for single-type requirements) in lexicographic index order; the
/// first minimum found wins ties. A candidate that exactly matches the previous
/// total cannot be undercut, so the search stops there.
pub fn search_move(
    hand: &[Card],
    last_play: Option<&PlayedSet>,
    requirement: &RoundRequirement,
) -> Option<Vec<Card>> {
    let pool: Vec<Card> = match requirement.resource() {
        Some(resource) if requirement.kind().is_single_type() => hand
            .iter()
            .filter(|card| card.resource == resource)
            .copied()
            .collect(),
        _ => hand.to_vec(),
    };
    let count = requirement.count();
    if count == 0 || count > pool.len() {
        return None;
    }
    let floor = last_play.map(PlayedSet::total);

    let mut best: Option<(u32, Vec<Card>)> = None;
    let mut candidate = Vec::with_capacity(count);
    for indices in Combinations::new(pool.len(), count) {
        candidate.clear();
        candidate.extend(indices.iter().map(|&idx| pool[idx]));
        if validate(&candidate, last_play, requirement).is_err() {
            continue;
        }
        let total = total_level(&candidate);
        if best.as_ref().is_none_or(|(best_total, _)| total < *best_total) {
            best = Some((total, candidate.clone()));
            if floor == Some(total) {
                break;
            }
        }
    }
    best.map(|(_, cards)| cards)
}

/// Lexicographic `k`-subsets of `0..n`, yielded as index lists.
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        let k = self.indices.len();
        // Rightmost slot that can still move forward.
        let mut slot = k;
        while slot > 0 {
            slot -= 1;
            if self.indices[slot] < self.n - k + slot {
                self.indices[slot] += 1;
                for next in slot + 1..k {
                    self.indices[next] = self.indices[next - 1] + 1;
                }
                return Some(current);
            }
        }
        self.done = true;
        Some(current)
    }
}
