//! Orchestrates one table: AI thinking delays, human turn timeouts and the
//! mash cooldown, all driven by an injected logical clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{Action, PlayerId};
use crate::bot::{Bot, timeout_action};
use crate::bots::HeuristicBot;
use crate::card::CardId;
use crate::error::GameError;
use crate::game::{Game, TurnOutcome};
use crate::mash::MashReport;
use crate::schedule::{ScheduledTask, Scheduler, StateTag, TaskKind};

/// Timing knobs for a session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long an AI seat "thinks" before its action fires.
    pub ai_delay: Duration,
    /// Wall-clock budget for a human turn before it is auto-resolved.
    pub turn_timeout: Duration,
    /// Minimum gap between two mashes by the same player.
    pub mash_cooldown: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ai_delay: Duration::from_millis(800),
            turn_timeout: Duration::from_secs(20),
            mash_cooldown: Duration::from_millis(300),
        }
    }
}

/// A scheduled action that fired and was committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub player: PlayerId,
    pub kind: TaskKind,
    pub action: Action,
    pub outcome: TurnOutcome,
}

pub struct Session {
    game: Game,
    config: SessionConfig,
    scheduler: Scheduler,
    bots: Vec<Option<Box<dyn Bot>>>,
    last_mash: Vec<Option<Duration>>,
    discarded: usize,
}

impl Session {
    /// Seats every non-human player with a seeded `HeuristicBot`.
    pub fn new(game: Game, config: SessionConfig, seed: u64) -> Self {
        let bots = (0..game.num_players())
            .map(|seat| {
                if game.is_human(seat) {
                    None
                } else {
                    let bot_seed = seed ^ ((seat as u64 + 1) * 0x9E37_79B9);
                    Some(Box::new(HeuristicBot::seeded(bot_seed)) as Box<dyn Bot>)
                }
            })
            .collect();
        let last_mash = vec![None; game.num_players()];
        Self {
            game,
            config,
            scheduler: Scheduler::default(),
            bots,
            last_mash,
            discarded: 0,
        }
    }

    /// Replaces the controller of an AI seat.
    pub fn with_bot(mut self, seat: PlayerId, bot: Box<dyn Bot>) -> Self {
        if let Some(slot) = self.bots.get_mut(seat) {
            if slot.is_some() {
                *slot = Some(bot);
            }
        }
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Stale tasks dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Schedules the first decision of the game.
    pub fn start(&mut self, now: Duration) {
        self.schedule_current(now);
    }

    /// Applies an action a participant chose while looking at the state
    /// identified by `expected` (normally the human seat).
    ///
    /// Turn actions are refused with `GameError::StaleAction` once the game has
    /// moved past `expected`. A rejected action changes nothing, so the pending
    /// timeout stays valid. Mashes only need the card to still be in hand.
    pub fn submit(
        &mut self,
        player: PlayerId,
        action: Action,
        expected: StateTag,
        now: Duration,
    ) -> Result<TurnOutcome, GameError> {
        if let Action::MashCard(card) = action {
            return self.mash(player, card, now).map(TurnOutcome::Mashed);
        }
        let current = self.game.tag();
        if expected != current {
            debug!(player, action = action.name(), expected = expected.version, current = current.version, "stale submission rejected");
            return Err(GameError::StaleAction {
                expected: expected.version,
                current: current.version,
            });
        }
        let outcome = self.game.apply_action(player, action)?;
        self.schedule_current(now);
        Ok(outcome)
    }

    /// Mashes a card unless the player's cooldown is still running.
    /// Attempts during the cooldown are dropped, never queued.
    pub fn mash(
        &mut self,
        player: PlayerId,
        card: CardId,
        now: Duration,
    ) -> Result<MashReport, GameError> {
        let last = self
            .last_mash
            .get(player)
            .ok_or(GameError::InvalidPlayer(player))?;
        if let Some(last) = last {
            if now < *last + self.config.mash_cooldown {
                debug!(player, card = card.0, "mash rejected during cooldown");
                return Err(GameError::MashCoolingDown);
            }
        }
        let report = self.game.mash_card(player, card)?;
        self.last_mash[player] = Some(now);
        Ok(report)
    }

    /// Fires every task due by `now`, oldest first. Tasks computed for an
    /// earlier state are discarded without being applied.
    pub fn advance(&mut self, now: Duration) -> Vec<Applied> {
        let mut applied = Vec::new();
        while let Some(task) = self.scheduler.pop_due(now) {
            let tag = self.game.tag();
            if !task.is_current(&tag) {
                self.discarded += 1;
                debug!(player = task.player, kind = ?task.kind, stale = task.tag.version, current = tag.version, "discarding stale task");
                continue;
            }
            if let Some(done) = self.fire(task) {
                applied.push(done);
                self.schedule_current(task.due);
            }
        }
        applied
    }

    /// Drives the clock from deadline to deadline until the game ends or
    /// `max_steps` tasks have fired. Returns the game winner, if any.
    pub fn run_to_end(&mut self, max_steps: usize) -> Option<PlayerId> {
        let mut steps = 0;
        while !self.game.is_finished() && steps < max_steps {
            let Some(due) = self.next_deadline() else {
                break;
            };
            steps += self.advance(due).len().max(1);
        }
        self.game.winner()
    }

    fn fire(&mut self, task: ScheduledTask) -> Option<Applied> {
        let view = self.game.state_view(task.player).ok()?;
        let mut action = match task.kind {
            TaskKind::AiTurn => match self.bots.get_mut(task.player) {
                Some(Some(bot)) => bot.select_action(&view),
                _ => timeout_action(&view),
            },
            TaskKind::Timeout => timeout_action(&view),
        };
        if !action.is_turn_action() {
            action = timeout_action(&view);
        }
        let outcome = match self.game.apply_action(task.player, action.clone()) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(player = task.player, error = %err, "scheduled action rejected; using fallback");
                action = timeout_action(&view);
                match self.game.apply_action(task.player, action.clone()) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        warn!(player = task.player, error = %err, "fallback action rejected");
                        return None;
                    }
                }
            }
        };
        debug!(player = task.player, kind = ?task.kind, action = action.name(), "scheduled action applied");
        Some(Applied {
            player: task.player,
            kind: task.kind,
            action,
            outcome,
        })
    }

    /// Called after every committed action: drops tasks issued for earlier
    /// states, then queues the decision for the new active seat.
    fn schedule_current(&mut self, base: Duration) {
        if self.game.is_finished() {
            self.scheduler.clear();
            return;
        }
        let tag = self.game.tag();
        let dropped = self.scheduler.discard_stale(&tag);
        if dropped > 0 {
            self.discarded += dropped;
            debug!(dropped, version = tag.version, "dropped tasks from earlier states");
        }
        let player = self.game.active_player();
        let (kind, delay) = if self.game.is_human(player) {
            (TaskKind::Timeout, self.config.turn_timeout)
        } else {
            (TaskKind::AiTurn, self.config.ai_delay)
        };
        self.scheduler.schedule(ScheduledTask {
            due: base + delay,
            player,
            kind,
            tag,
        });
    }
}
