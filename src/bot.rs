use crate::action::Action;
use crate::requirement::RoundRequirement;
use crate::search::search_move;
use crate::state::{GamePhase, GameStateView};

/// Interface for a participant that decides on its own turn.
pub trait Bot {
    fn select_action(&mut self, state: &GameStateView) -> Action;
}

/// Action taken for a human seat whose turn budget ran out.
///
/// A dealer leads the lowest-level card under a one-card fixed requirement of
/// its resource; a player mid-round plays the cheapest valid beat or passes.
pub fn timeout_action(state: &GameStateView) -> Action {
    match state.phase {
        GamePhase::DealerSelection => match state.hand.iter().min_by_key(|card| card.level) {
            Some(card) => Action::Lead {
                requirement: RoundRequirement::single_fixed(card.resource, 1),
                cards: vec![card.id],
            },
            None => Action::Pass,
        },
        _ => cheapest_play(state),
    }
}

/// Cheapest valid play for the current round, or a pass.
pub fn cheapest_play(state: &GameStateView) -> Action {
    let Some(requirement) = state.requirement else {
        return Action::Pass;
    };
    match search_move(&state.hand, state.last_play(), &requirement) {
        Some(cards) => Action::PlayCards(cards.iter().map(|card| card.id).collect()),
        None => Action::Pass,
    }
}
