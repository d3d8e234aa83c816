use proptest::prelude::*;

use cardmash::mash::mash_with_roll;
use cardmash::search::search_move;
use cardmash::{
    Card, CardId, MAX_LEVEL, MIN_LEVEL, PlayedSet, RequirementKind, ResourceType,
    RoundRequirement, validate,
};

fn total(cards: &[Card]) -> u32 {
    cards.iter().map(|card| u32::from(card.level)).sum()
}

fn arb_resource() -> impl Strategy<Value = ResourceType> {
    (0..4usize).prop_map(|idx| ResourceType::ALL[idx])
}

fn arb_cards(max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec((arb_resource(), MIN_LEVEL..=MAX_LEVEL), 0..=max).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (resource, level))| Card::new(CardId(idx as u32), resource, level))
            .collect()
    })
}

fn arb_requirement() -> impl Strategy<Value = RoundRequirement> {
    (0..3usize, arb_resource(), 1..=4usize).prop_map(|(kind, resource, count)| match kind {
        0 => RoundRequirement::single_fixed(resource, count),
        1 => RoundRequirement::single_ascending(resource, count),
        _ => RoundRequirement::mixed_ascending(count),
    })
}

fn arb_last_play() -> impl Strategy<Value = Option<PlayedSet>> {
    prop::option::of(arb_cards(4).prop_map(|cards| PlayedSet {
        player: 0,
        cards,
        sequence: 1,
    }))
}

fn sorted_levels(cards: &[Card]) -> Vec<u8> {
    let mut levels: Vec<u8> = cards.iter().map(|card| card.level).collect();
    levels.sort_unstable();
    levels
}

/// Every valid subset's total, by brute force over bitmasks.
fn valid_totals(
    hand: &[Card],
    last: Option<&PlayedSet>,
    requirement: &RoundRequirement,
) -> Vec<u32> {
    let mut totals = Vec::new();
    for mask in 0u32..(1 << hand.len()) {
        let subset: Vec<Card> = hand
            .iter()
            .enumerate()
            .filter(|(idx, _)| mask & (1 << idx) != 0)
            .map(|(_, card)| *card)
            .collect();
        if validate(&subset, last, requirement).is_ok() {
            totals.push(total(&subset));
        }
    }
    totals
}

proptest! {
    #[test]
    fn accepted_plays_satisfy_every_rule(
        selected in arb_cards(5),
        last in arb_last_play(),
        requirement in arb_requirement(),
    ) {
        if validate(&selected, last.as_ref(), &requirement).is_ok() {
            prop_assert_eq!(selected.len(), requirement.count());
            if let Some(last) = &last {
                prop_assert!(total(&selected) >= last.total());
            }
            if requirement.kind().is_ascending() {
                let levels = sorted_levels(&selected);
                prop_assert!(levels.windows(2).all(|pair| pair[0] < pair[1]));
            }
            if requirement.kind() != RequirementKind::MixedAscending {
                prop_assert!(selected.iter().all(|card| Some(card.resource) == requirement.resource()));
            }
        }
    }

    #[test]
    fn search_returns_the_cheapest_valid_play(
        hand in arb_cards(8),
        last in arb_last_play(),
        requirement in arb_requirement(),
    ) {
        let totals = valid_totals(&hand, last.as_ref(), &requirement);
        match search_move(&hand, last.as_ref(), &requirement) {
            Some(chosen) => {
                prop_assert!(validate(&chosen, last.as_ref(), &requirement).is_ok());
                prop_assert_eq!(Some(total(&chosen)), totals.iter().copied().min());
                prop_assert!(chosen.iter().all(|card| hand.contains(card)));
            }
            None => prop_assert!(totals.is_empty()),
        }
    }

    #[test]
    fn mash_keeps_levels_in_range(level in MIN_LEVEL..=MAX_LEVEL, roll in 0.0f64..1.0) {
        let mut card = Card::new(CardId(1), ResourceType::Farm, level);
        let report = mash_with_roll(&mut card, roll);
        prop_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&card.level));
        prop_assert!(card.level.abs_diff(level) <= 1);
        prop_assert_eq!(report.before, level);
        prop_assert_eq!(card.id, CardId(1));
    }
}

#[test]
fn equal_totals_are_a_legal_beat() {
    let requirement = RoundRequirement::single_fixed(ResourceType::Ore, 2);
    let last = PlayedSet {
        player: 2,
        cards: vec![
            Card::new(CardId(50), ResourceType::Ore, 3),
            Card::new(CardId(51), ResourceType::Ore, 4),
        ],
        sequence: 1,
    };
    let tie = [
        Card::new(CardId(1), ResourceType::Ore, 5),
        Card::new(CardId(2), ResourceType::Ore, 2),
    ];
    assert!(validate(&tie, Some(&last), &requirement).is_ok());
}
