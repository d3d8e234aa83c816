use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, total_level};
use crate::requirement::RoundRequirement;

/// Lifecycle phase of the single game at the table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Init,
    DealerSelection,
    Playing,
    RoundEnd,
    GameEnd,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameEnd)
    }
}

/// One play on the table stack, kept in the order the cards were selected.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedSet {
    pub player: PlayerId,
    pub cards: Vec<Card>,
    pub sequence: u32,
}

impl PlayedSet {
    #[inline]
    pub fn total(&self) -> u32 {
        total_level(&self.cards)
    }
}

/// Public portion of a player's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub hand_size: usize,
    pub medals: u32,
    pub passed: bool,
    pub is_active: bool,
    pub is_dealer: bool,
}

/// Game state snapshot handed to bots and the presentation layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub phase: GamePhase,
    pub self_player: PlayerId,
    pub active_player: PlayerId,
    pub dealer: PlayerId,
    pub round: u32,
    pub completed_rounds: u32,
    pub requirement: Option<RoundRequirement>,
    pub stack: Vec<PlayedSet>,
    pub players: Vec<PlayerPublicState>,
    pub hand: Vec<Card>,
    pub winner: Option<PlayerId>,
}

impl GameStateView {
    /// Most recent play of the round, if any.
    pub fn last_play(&self) -> Option<&PlayedSet> {
        self.stack.last()
    }

    pub fn is_own_turn(&self) -> bool {
        self.active_player == self.self_player && !self.phase.is_terminal()
    }
}

/// Final standing of one player, ordered by medals.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub medals: u32,
    pub cards_left: usize,
}
