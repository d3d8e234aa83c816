//! Heuristic used by AI dealers to set the round requirement.

use rand::Rng;

use crate::card::{Card, ResourceType, resource_counts};
use crate::requirement::RoundRequirement;

pub const MIXED_THRESHOLD: f64 = 0.8;
pub const ASCENDING_THRESHOLD: f64 = 0.6;
pub const MIXED_COUNT: usize = 3;
pub const MAX_SINGLE_COUNT: usize = 2;

/// Resource the hand holds most of, with its count. Ties follow `ResourceType::ALL`.
pub fn dominant_resource(hand: &[Card]) -> (ResourceType, usize) {
    let counts = resource_counts(hand);
    let mut best = (ResourceType::ALL[0], counts[0]);
    for resource in ResourceType::ALL.into_iter().skip(1) {
        let count = counts[resource.index()];
        if count > best.1 {
            best = (resource, count);
        }
    }
    best
}

/// Draws the roll and picks a requirement for the dealer's hand.
pub fn choose_requirement<R: Rng + ?Sized>(hand: &[Card], rng: &mut R) -> RoundRequirement {
    let roll = rng.gen_range(0.0..1.0);
    choose_requirement_with_roll(hand, roll)
}

/// Deterministic core of the dealer heuristic for a roll in `[0, 1)`.
///
/// The mixed branch is not checked against the hand, so a dealer can set a
/// requirement it cannot meet itself.
pub fn choose_requirement_with_roll(hand: &[Card], roll: f64) -> RoundRequirement {
    let (best, best_count) = dominant_resource(hand);
    let single_count = best_count.min(MAX_SINGLE_COUNT).max(1);
    if roll > MIXED_THRESHOLD && hand.len() >= MIXED_COUNT {
        RoundRequirement::mixed_ascending(MIXED_COUNT)
    } else if roll > ASCENDING_THRESHOLD && best_count >= 2 {
        RoundRequirement::single_ascending(best, single_count)
    } else {
        RoundRequirement::single_fixed(best, single_count)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::card::CardId;
    use crate::requirement::RequirementKind;

    fn hand(spec: &[(ResourceType, u8)]) -> Vec<Card> {
        spec.iter()
            .enumerate()
            .map(|(idx, &(resource, level))| Card::new(CardId(idx as u32), resource, level))
            .collect()
    }

    #[test]
    fn dominant_resource_breaks_ties_by_enumeration_order() {
        let cards = hand(&[
            (ResourceType::Ore, 1),
            (ResourceType::Farm, 2),
            (ResourceType::Ore, 3),
            (ResourceType::Farm, 4),
        ]);
        assert_eq!(dominant_resource(&cards), (ResourceType::Farm, 2));
    }

    #[test]
    fn high_roll_with_three_cards_goes_mixed() {
        let cards = hand(&[
            (ResourceType::Ore, 1),
            (ResourceType::Farm, 2),
            (ResourceType::Tower, 3),
        ]);
        let req = choose_requirement_with_roll(&cards, 0.95);
        assert_eq!(req, RoundRequirement::mixed_ascending(3));
    }

    #[test]
    fn high_roll_with_small_hand_falls_through() {
        let cards = hand(&[(ResourceType::Ore, 1), (ResourceType::Ore, 2)]);
        let req = choose_requirement_with_roll(&cards, 0.95);
        assert_eq!(req, RoundRequirement::single_ascending(ResourceType::Ore, 2));
    }

    #[test]
    fn middle_roll_needs_two_of_a_kind_for_ascending() {
        let cards = hand(&[
            (ResourceType::Soldier, 4),
            (ResourceType::Tower, 2),
            (ResourceType::Farm, 6),
        ]);
        let req = choose_requirement_with_roll(&cards, 0.7);
        assert_eq!(req, RoundRequirement::single_fixed(ResourceType::Soldier, 1));
    }

    #[test]
    fn low_roll_caps_single_count_at_two() {
        let cards = hand(&[
            (ResourceType::Tower, 4),
            (ResourceType::Tower, 2),
            (ResourceType::Tower, 6),
        ]);
        let req = choose_requirement_with_roll(&cards, 0.1);
        assert_eq!(req, RoundRequirement::single_fixed(ResourceType::Tower, 2));
    }

    #[test]
    fn thresholds_are_exclusive() {
        let cards = hand(&[
            (ResourceType::Tower, 4),
            (ResourceType::Tower, 2),
            (ResourceType::Ore, 6),
        ]);
        assert_eq!(
            choose_requirement_with_roll(&cards, 0.8).kind(),
            RequirementKind::SingleAscending
        );
        assert_eq!(
            choose_requirement_with_roll(&cards, 0.6).kind(),
            RequirementKind::SingleFixed
        );
    }

    #[test]
    fn single_type_requirements_fit_the_dealer_hand() {
        let mut rng = StdRng::seed_from_u64(3);
        let cards = hand(&[
            (ResourceType::Farm, 1),
            (ResourceType::Farm, 1),
            (ResourceType::Ore, 5),
        ]);
        for _ in 0..100 {
            let req = choose_requirement(&cards, &mut rng);
            assert!(req.count() >= 1);
            if req.kind().is_single_type() {
                assert_eq!(req.resource(), Some(ResourceType::Farm));
                assert!(req.count() <= 2);
            }
        }
    }
}
