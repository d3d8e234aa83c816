use serde::{Deserialize, Serialize};

use crate::card::CardId;
use crate::requirement::RoundRequirement;

/// Zero-based seat index of a player at the table.
pub type PlayerId = usize;

/// Inbound action a participant submits to the engine.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Dealer sets the round requirement without playing yet.
    SubmitRequirement(RoundRequirement),
    /// Dealer sets the requirement and plays the opening cards in one step.
    Lead {
        requirement: RoundRequirement,
        cards: Vec<CardId>,
    },
    /// Play the listed cards from the hand, in the given order. During dealer
    /// selection the requirement is inferred from the cards.
    PlayCards(Vec<CardId>),
    /// Decline to beat the current stack for the rest of the round.
    Pass,
    /// Attempt to nudge the level of one card in the player's own hand.
    MashCard(CardId),
}

impl Action {
    /// Short name used in errors and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SubmitRequirement(_) => "submit-requirement",
            Action::Lead { .. } => "lead",
            Action::PlayCards(_) => "play-cards",
            Action::Pass => "pass",
            Action::MashCard(_) => "mash-card",
        }
    }

    /// Whether applying the action consumes the player's turn.
    pub fn is_turn_action(&self) -> bool {
        !matches!(self, Action::MashCard(_))
    }
}
