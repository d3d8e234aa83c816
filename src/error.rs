use thiserror::Error;

use crate::action::PlayerId;
use crate::card::{CardId, ResourceType};
use crate::state::GamePhase;

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player index {0} is out of range")]
    InvalidPlayer(PlayerId),
    #[error("not the specified player's turn")]
    NotPlayersTurn,
    #[error("action was chosen for version {expected} but the game is at {current}")]
    StaleAction { expected: u64, current: u64 },
    #[error("action `{action}` is not valid during {phase:?}")]
    InvalidAction {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("card {0} is not in the player's hand")]
    UnknownCard(CardId),
    #[error("card {0} was selected more than once")]
    DuplicateCard(CardId),
    #[error("play rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("selected cards do not describe a round requirement")]
    CannotInferRequirement,
    #[error("mash is cooling down")]
    MashCoolingDown,
    #[error("game is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Reasons the move validator refuses a selection. The actor may retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("wrong count: expected {expected} cards, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("wrong resource type: every card must be {expected}")]
    WrongResourceType { expected: ResourceType },
    #[error("levels must be strictly increasing")]
    NotStrictlyAscending,
    #[error("total must be at least {required}, got {actual}")]
    BelowRequiredTotal { required: u32, actual: u32 },
}
