//! Random opening hands and the first dealer.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, CardId, MAX_LEVEL, MIN_LEVEL, RESOURCE_COUNT, ResourceType, total_level};
use crate::error::GameError;

/// Inclusive per-resource range for how many cards of that type a hand receives.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }
}

/// Count ranges for every resource type, indexed by `ResourceType::index`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRanges {
    pub ranges: [CountRange; RESOURCE_COUNT],
}

impl Default for HandRanges {
    fn default() -> Self {
        Self {
            ranges: [CountRange::new(1, 2); RESOURCE_COUNT],
        }
    }
}

impl HandRanges {
    pub fn uniform(min: usize, max: usize) -> Self {
        Self {
            ranges: [CountRange::new(min, max); RESOURCE_COUNT],
        }
    }

    pub fn get(&self, resource: ResourceType) -> CountRange {
        self.ranges[resource.index()]
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.ranges.iter().any(|range| range.min > range.max) {
            return Err(GameError::InvalidConfiguration(
                "hand range minimum exceeds its maximum",
            ));
        }
        // Every seat needs a card to be able to empty its hand.
        if self.ranges.iter().map(|range| range.min).sum::<usize>() == 0 {
            return Err(GameError::InvalidConfiguration(
                "hand ranges must guarantee at least one card",
            ));
        }
        Ok(())
    }
}

/// Hands out card ids that stay unique across every hand at the table.
#[derive(Debug, Default)]
pub struct CardIdSource {
    next: u32,
}

impl CardIdSource {
    pub fn next_id(&mut self) -> CardId {
        let id = CardId(self.next);
        self.next += 1;
        id
    }
}

/// Deals one hand: a uniform count per resource type, then a uniform level per card.
pub fn deal_hand<R: Rng + ?Sized>(
    rng: &mut R,
    ranges: &HandRanges,
    ids: &mut CardIdSource,
) -> Vec<Card> {
    let mut hand = Vec::new();
    for resource in ResourceType::ALL {
        let count = rng.gen_range(ranges.get(resource).as_range());
        for _ in 0..count {
            let level = rng.gen_range(MIN_LEVEL..=MAX_LEVEL);
            hand.push(Card::new(ids.next_id(), resource, level));
        }
    }
    hand
}

/// Deals `players` hands from one shared id sequence.
pub fn deal_hands<R: Rng + ?Sized>(
    rng: &mut R,
    ranges: &HandRanges,
    players: usize,
) -> Vec<Vec<Card>> {
    let mut ids = CardIdSource::default();
    (0..players)
        .map(|_| deal_hand(rng, ranges, &mut ids))
        .collect()
}

/// Seat holding the greatest summed hand level; the lowest seat wins ties.
pub fn starting_dealer(hands: &[Vec<Card>]) -> PlayerId {
    let mut best = 0;
    let mut best_total = None;
    for (seat, hand) in hands.iter().enumerate() {
        let total = total_level(hand);
        if best_total.is_none_or(|current| total > current) {
            best = seat;
            best_total = Some(total);
        }
    }
    best
}
