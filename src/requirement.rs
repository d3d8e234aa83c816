//! Round requirements and the move validator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, ResourceType, strictly_ascending, total_level};
use crate::error::Rejection;
use crate::state::PlayedSet;

/// Shape of the combination the dealer asks for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    /// `count` cards of one resource type, any levels.
    SingleFixed,
    /// `count` cards of one resource type with strictly increasing levels.
    SingleAscending,
    /// `count` cards of any resource types with strictly increasing levels.
    MixedAscending,
}

impl RequirementKind {
    #[inline]
    pub fn is_single_type(self) -> bool {
        matches!(self, RequirementKind::SingleFixed | RequirementKind::SingleAscending)
    }

    #[inline]
    pub fn is_ascending(self) -> bool {
        matches!(
            self,
            RequirementKind::SingleAscending | RequirementKind::MixedAscending
        )
    }
}

/// What counts as a legal play for the current round.
///
/// A resource type is present exactly when the kind is single-type; the
/// constructors are the only way to build one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RoundRequirement {
    kind: RequirementKind,
    resource: Option<ResourceType>,
    count: usize,
}

impl RoundRequirement {
    pub fn single_fixed(resource: ResourceType, count: usize) -> Self {
        Self {
            kind: RequirementKind::SingleFixed,
            resource: Some(resource),
            count: count.max(1),
        }
    }

    pub fn single_ascending(resource: ResourceType, count: usize) -> Self {
        Self {
            kind: RequirementKind::SingleAscending,
            resource: Some(resource),
            count: count.max(1),
        }
    }

    pub fn mixed_ascending(count: usize) -> Self {
        Self {
            kind: RequirementKind::MixedAscending,
            resource: None,
            count: count.max(1),
        }
    }

    pub fn kind(&self) -> RequirementKind {
        self.kind
    }

    pub fn resource(&self) -> Option<ResourceType> {
        self.resource
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Derives the requirement a dealer's opening cards describe.
    ///
    /// Returns `None` for an empty selection and for mixed resource types whose
    /// levels are not strictly ascending, since no requirement matches those.
    pub fn infer_from(cards: &[Card]) -> Option<Self> {
        let first = cards.first()?;
        let single_type = cards.iter().all(|card| card.resource == first.resource);
        let ascending = strictly_ascending(cards);
        match (single_type, ascending) {
            (true, true) if cards.len() >= 2 => {
                Some(Self::single_ascending(first.resource, cards.len()))
            }
            (true, _) => Some(Self::single_fixed(first.resource, cards.len())),
            (false, true) => Some(Self::mixed_ascending(cards.len())),
            (false, false) => None,
        }
    }

    /// Checks a selection against this requirement and the previous play.
    pub fn validate(
        &self,
        selected: &[Card],
        last_play: Option<&PlayedSet>,
    ) -> Result<(), Rejection> {
        validate(selected, last_play, self)
    }
}

impl fmt::Display for RoundRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.resource) {
            (RequirementKind::SingleFixed, Some(resource)) => {
                write!(f, "{} x {}", self.count, resource)
            }
            (RequirementKind::SingleAscending, Some(resource)) => {
                write!(f, "{} x {} ascending", self.count, resource)
            }
            _ => write!(f, "{} x any resource ascending", self.count),
        }
    }
}

/// Accepts or rejects a selection. The first failing check wins:
/// count, resource type, strict ascent, then the running total.
///
/// Matching the previous total is a legal beat. With no previous play any
/// selection satisfying the requirement is accepted.
pub fn validate(
    selected: &[Card],
    last_play: Option<&PlayedSet>,
    requirement: &RoundRequirement,
) -> Result<(), Rejection> {
    if selected.len() != requirement.count {
        return Err(Rejection::WrongCount {
            expected: requirement.count,
            actual: selected.len(),
        });
    }
    if requirement.kind.is_single_type() {
        if let Some(expected) = requirement.resource {
            if selected.iter().any(|card| card.resource != expected) {
                return Err(Rejection::WrongResourceType { expected });
            }
        }
    }
    if requirement.kind.is_ascending() && !strictly_ascending(selected) {
        return Err(Rejection::NotStrictlyAscending);
    }
    if let Some(last) = last_play {
        let required = last.total();
        let actual = total_level(selected);
        if actual < required {
            return Err(Rejection::BelowRequiredTotal { required, actual });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardId;

    fn card(id: u32, resource: ResourceType, level: u8) -> Card {
        Card::new(CardId(id), resource, level)
    }

    fn last(cards: Vec<Card>) -> PlayedSet {
        PlayedSet {
            player: 1,
            cards,
            sequence: 1,
        }
    }

    #[test]
    fn count_is_checked_first() {
        let req = RoundRequirement::single_ascending(ResourceType::Soldier, 2);
        // Wrong type and wrong count at once: the count wins.
        let err = validate(&[card(0, ResourceType::Ore, 3)], None, &req).unwrap_err();
        assert_eq!(err, Rejection::WrongCount { expected: 2, actual: 1 });
    }

    #[test]
    fn resource_type_checked_before_ascent() {
        let req = RoundRequirement::single_ascending(ResourceType::Farm, 2);
        let selected = [card(0, ResourceType::Farm, 3), card(1, ResourceType::Ore, 3)];
        assert_eq!(
            validate(&selected, None, &req),
            Err(Rejection::WrongResourceType {
                expected: ResourceType::Farm
            })
        );
    }

    #[test]
    fn mixed_ascending_rejects_ties() {
        let req = RoundRequirement::mixed_ascending(3);
        let selected = [
            card(0, ResourceType::Farm, 2),
            card(1, ResourceType::Ore, 5),
            card(2, ResourceType::Tower, 2),
        ];
        assert_eq!(
            validate(&selected, None, &req),
            Err(Rejection::NotStrictlyAscending)
        );
    }

    #[test]
    fn single_fixed_allows_repeated_levels() {
        let req = RoundRequirement::single_fixed(ResourceType::Tower, 2);
        let selected = [card(0, ResourceType::Tower, 4), card(1, ResourceType::Tower, 4)];
        assert_eq!(validate(&selected, None, &req), Ok(()));
    }

    #[test]
    fn equal_total_beats_previous_play() {
        let req = RoundRequirement::single_fixed(ResourceType::Soldier, 1);
        let previous = last(vec![card(9, ResourceType::Soldier, 4)]);
        assert_eq!(
            validate(&[card(0, ResourceType::Soldier, 4)], Some(&previous), &req),
            Ok(())
        );
        assert_eq!(
            validate(&[card(1, ResourceType::Soldier, 3)], Some(&previous), &req),
            Err(Rejection::BelowRequiredTotal {
                required: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn count_is_floored_at_one() {
        assert_eq!(RoundRequirement::single_fixed(ResourceType::Ore, 0).count(), 1);
        assert_eq!(RoundRequirement::mixed_ascending(0).count(), 1);
        assert_eq!(RoundRequirement::mixed_ascending(3).resource(), None);
    }

    #[test]
    fn infers_requirement_from_lead() {
        let soldiers = [card(0, ResourceType::Soldier, 2), card(1, ResourceType::Soldier, 5)];
        assert_eq!(
            RoundRequirement::infer_from(&soldiers),
            Some(RoundRequirement::single_ascending(ResourceType::Soldier, 2))
        );

        let pair = [card(0, ResourceType::Soldier, 5), card(1, ResourceType::Soldier, 5)];
        assert_eq!(
            RoundRequirement::infer_from(&pair),
            Some(RoundRequirement::single_fixed(ResourceType::Soldier, 2))
        );

        let single = [card(0, ResourceType::Ore, 6)];
        assert_eq!(
            RoundRequirement::infer_from(&single),
            Some(RoundRequirement::single_fixed(ResourceType::Ore, 1))
        );

        let mixed = [card(0, ResourceType::Ore, 1), card(1, ResourceType::Farm, 3)];
        assert_eq!(
            RoundRequirement::infer_from(&mixed),
            Some(RoundRequirement::mixed_ascending(2))
        );

        let broken = [card(0, ResourceType::Ore, 3), card(1, ResourceType::Farm, 3)];
        assert_eq!(RoundRequirement::infer_from(&broken), None);
        assert_eq!(RoundRequirement::infer_from(&[]), None);
    }

    #[test]
    fn inferred_requirement_accepts_its_own_lead() {
        let leads = [
            vec![card(0, ResourceType::Tower, 1), card(1, ResourceType::Tower, 7)],
            vec![card(0, ResourceType::Farm, 3), card(1, ResourceType::Farm, 3)],
            vec![
                card(0, ResourceType::Farm, 3),
                card(1, ResourceType::Ore, 1),
                card(2, ResourceType::Soldier, 6),
            ],
        ];
        for lead in leads {
            let req = RoundRequirement::infer_from(&lead).expect("lead describes a requirement");
            assert_eq!(req.validate(&lead, None), Ok(()));
        }
    }
}
