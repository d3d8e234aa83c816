use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 7;
pub const NUM_PLAYERS: usize = 4;
pub const RESOURCE_COUNT: usize = 4;

/// Opaque identifier of a dealt card. Unique across every hand at the table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resource a card produces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ResourceType {
    Soldier,
    Tower,
    Farm,
    Ore,
}

impl ResourceType {
    /// Fixed enumeration order. Tie-breaks across the engine follow it.
    pub const ALL: [ResourceType; RESOURCE_COUNT] = [
        ResourceType::Soldier,
        ResourceType::Tower,
        ResourceType::Farm,
        ResourceType::Ore,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            ResourceType::Soldier => 0,
            ResourceType::Tower => 1,
            ResourceType::Farm => 2,
            ResourceType::Ore => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Soldier => "Soldier",
            ResourceType::Tower => "Tower",
            ResourceType::Farm => "Farm",
            ResourceType::Ore => "Ore",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A leveled resource card. Only the level ever changes after the deal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub resource: ResourceType,
    pub level: u8,
}

impl Card {
    #[inline]
    pub fn new(id: CardId, resource: ResourceType, level: u8) -> Self {
        debug_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&level));
        Self {
            id,
            resource,
            level: level.clamp(MIN_LEVEL, MAX_LEVEL),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.level)
    }
}

/// Summed level of a selection of cards.
#[inline]
pub fn total_level(cards: &[Card]) -> u32 {
    cards.iter().map(|card| u32::from(card.level)).sum()
}

/// Number of cards of each resource type, indexed by `ResourceType::index`.
pub fn resource_counts(cards: &[Card]) -> [usize; RESOURCE_COUNT] {
    let mut counts = [0usize; RESOURCE_COUNT];
    for card in cards {
        counts[card.resource.index()] += 1;
    }
    counts
}

/// Checks that levels, once sorted, increase strictly with no repeats.
pub fn strictly_ascending(cards: &[Card]) -> bool {
    let mut levels: Vec<u8> = cards.iter().map(|card| card.level).collect();
    levels.sort_unstable();
    levels.windows(2).all(|pair| pair[0] < pair[1])
}
