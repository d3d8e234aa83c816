//! Rules engine for a four-seat resource card game: dealers set a requirement,
//! players beat the summed level on the table or pass, and cards can be
//! "mashed" to nudge their level.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod deal;
pub mod dealer;
pub mod error;
pub mod events;
pub mod game;
pub mod mash;
pub mod requirement;
pub mod schedule;
pub mod search;
pub mod session;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, PlayerId};
pub use crate::bot::{Bot, cheapest_play, timeout_action};
pub use crate::bots::{HeuristicBot, HumanBot};
pub use crate::card::{Card, CardId, MAX_LEVEL, MIN_LEVEL, NUM_PLAYERS, ResourceType};
pub use crate::deal::{CountRange, HandRanges};
pub use crate::dealer::{choose_requirement, choose_requirement_with_roll};
pub use crate::error::{GameError, Rejection};
pub use crate::events::{EventLog, LogEntry, LogKind};
pub use crate::game::{Game, GameBuilder, GameConfig, TurnOutcome, replay, step};
pub use crate::mash::{MashOutcome, MashReport};
pub use crate::requirement::{RequirementKind, RoundRequirement, validate};
pub use crate::schedule::{StateTag, TaskKind};
pub use crate::search::search_move;
pub use crate::session::{Applied, Session, SessionConfig};
pub use crate::state::{GamePhase, GameStateView, PlayedSet, PlayerPublicState, Standing};
pub use crate::visualize::{VisualOptions, describe_action, render_log, render_state};
