use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::Action;
use crate::bot::{Bot, cheapest_play};
use crate::dealer::choose_requirement;
use crate::search::search_move;
use crate::state::{GamePhase, GameStateView};

/// Rule-based seat used for every AI player at the table.
///
/// In plain English:
/// - As dealer, ask for what the hand holds most of (sometimes an ascending run,
///   occasionally three mixed cards), then open with the cheapest cards that fit.
/// - Mid-round, beat the stack as cheaply as possible so high levels stay in the
///   hand for later rounds; pass when nothing fits.
///
/// Dealing and opening happen in one `Action::Lead`, so the requirement and the
/// opening cards are computed from the same hand snapshot.
pub struct HeuristicBot<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> HeuristicBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn deal(&mut self, state: &GameStateView) -> Action {
        let requirement = choose_requirement(&state.hand, &mut self.rng);
        match search_move(&state.hand, None, &requirement) {
            Some(cards) => Action::Lead {
                requirement,
                cards: cards.iter().map(|card| card.id).collect(),
            },
            // The mixed branch can outrun the hand; open anyway and pass next turn.
            None => Action::SubmitRequirement(requirement),
        }
    }
}

impl HeuristicBot<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Bot for HeuristicBot<R> {
    fn select_action(&mut self, state: &GameStateView) -> Action {
        match state.phase {
            GamePhase::DealerSelection => self.deal(state),
            _ => cheapest_play(state),
        }
    }
}
