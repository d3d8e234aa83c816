use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::action::{Action, PlayerId};
use crate::card::{Card, CardId, MAX_LEVEL, MIN_LEVEL, NUM_PLAYERS, total_level};
use crate::deal::{HandRanges, deal_hands, starting_dealer};
use crate::error::GameError;
use crate::events::{EventLog, LogKind};
use crate::mash::{MashReport, mash};
use crate::requirement::RoundRequirement;
use crate::schedule::StateTag;
use crate::state::{GamePhase, GameStateView, PlayedSet, PlayerPublicState, Standing};

const DEFAULT_SEED: u64 = 0x5EED_CA2D_5EED_CA2D;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u64,
    pub humans: Vec<PlayerId>,
    pub hand_ranges: HandRanges,
    pub names: Option<[String; NUM_PLAYERS]>,
}

impl GameConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            humans: Vec::new(),
            hand_ranges: HandRanges::default(),
            names: None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Builder that enables deterministic hand injection for tests and replays.
pub struct GameBuilder {
    config: GameConfig,
    hands: Option<Vec<Vec<Card>>>,
    dealer: Option<PlayerId>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            hands: None,
            dealer: None,
        }
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            hands: None,
            dealer: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Marks a seat as human-controlled. AI seats are the default.
    pub fn with_human(mut self, seat: PlayerId) -> Self {
        if !self.config.humans.contains(&seat) {
            self.config.humans.push(seat);
        }
        self
    }

    pub fn with_hand_ranges(mut self, ranges: HandRanges) -> Self {
        self.config.hand_ranges = ranges;
        self
    }

    pub fn with_names(mut self, names: [String; NUM_PLAYERS]) -> Self {
        self.config.names = Some(names);
        self
    }

    /// Replace the random deal with fixed hands, one per seat.
    pub fn with_hands(mut self, hands: Vec<Vec<Card>>) -> Self {
        self.hands = Some(hands);
        self
    }

    /// Override the highest-total rule for who deals the first round.
    pub fn with_starting_dealer(mut self, dealer: PlayerId) -> Self {
        self.dealer = Some(dealer);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a committed action led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The round goes on and `next` is now active.
    Continue { next: PlayerId },
    /// Everyone else passed back to the stack owner.
    RoundWon { winner: PlayerId },
    /// A play emptied a hand.
    GameWon { winner: PlayerId },
    /// Nobody played and everybody passed; dealer selection reopens.
    Stalled { dealer: PlayerId },
    /// A card level was rolled; the turn did not change.
    Mashed(MashReport),
}

/// Result of scanning forward for the next player to act.
enum Advance {
    Next(PlayerId),
    RoundWinner(PlayerId),
    Stalled,
}

#[derive(Clone, Debug)]
struct PlayerState {
    name: String,
    is_human: bool,
    hand: Vec<Card>,
    medals: u32,
    passed: bool,
}

impl PlayerState {
    fn find(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|card| card.id == id)
    }
}

/// Rules engine for one table of four.
#[derive(Clone, Debug)]
pub struct Game {
    phase: GamePhase,
    players: Vec<PlayerState>,
    dealer: PlayerId,
    active: PlayerId,
    requirement: Option<RoundRequirement>,
    stack: Vec<PlayedSet>,
    round: u32,
    completed_rounds: u32,
    next_sequence: u32,
    version: u64,
    winner: Option<PlayerId>,
    log: EventLog,
    rng: StdRng,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder::from_config(config).build()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    pub fn dealer(&self) -> PlayerId {
        self.dealer
    }

    pub fn requirement(&self) -> Option<RoundRequirement> {
        self.requirement
    }

    pub fn stack(&self) -> &[PlayedSet] {
        &self.stack
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn is_human(&self, player: PlayerId) -> bool {
        self.players.get(player).is_some_and(|p| p.is_human)
    }

    pub fn hand(&self, player: PlayerId) -> Result<&[Card], GameError> {
        self.players
            .get(player)
            .map(|p| p.hand.as_slice())
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn medals(&self, player: PlayerId) -> Result<u32, GameError> {
        self.players
            .get(player)
            .map(|p| p.medals)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn has_passed(&self, player: PlayerId) -> Result<bool, GameError> {
        self.players
            .get(player)
            .map(|p| p.passed)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Number of committed turn actions so far; mashes do not count.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Identifies the decision point a scheduled action was computed for.
    pub fn tag(&self) -> StateTag {
        StateTag {
            version: self.version,
            phase: self.phase,
            active: self.active,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The player whose play emptied their hand.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Players ranked by medals, highest first. Ties keep seat order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| Standing {
                player: seat,
                name: player.name.clone(),
                medals: player.medals,
                cards_left: player.hand.len(),
            })
            .collect();
        standings.sort_by(|a, b| b.medals.cmp(&a.medals));
        standings
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<GameStateView, GameError> {
        let me = self
            .players
            .get(perspective)
            .ok_or(GameError::InvalidPlayer(perspective))?;
        let players = self
            .players
            .iter()
            .enumerate()
            .map(|(seat, player)| PlayerPublicState {
                id: seat,
                name: player.name.clone(),
                is_human: player.is_human,
                hand_size: player.hand.len(),
                medals: player.medals,
                passed: player.passed,
                is_active: seat == self.active && !self.is_finished(),
                is_dealer: seat == self.dealer,
            })
            .collect();

        Ok(GameStateView {
            phase: self.phase,
            self_player: perspective,
            active_player: self.active,
            dealer: self.dealer,
            round: self.round,
            completed_rounds: self.completed_rounds,
            requirement: self.requirement,
            stack: self.stack.clone(),
            players,
            hand: me.hand.clone(),
            winner: self.winner,
        })
    }

    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: Action,
    ) -> Result<TurnOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if let Action::MashCard(card) = action {
            return self.mash_card(player, card).map(TurnOutcome::Mashed);
        }
        if player != self.active {
            return Err(GameError::NotPlayersTurn);
        }

        let outcome = match (self.phase, action) {
            (GamePhase::DealerSelection, Action::SubmitRequirement(requirement)) => {
                self.open_round(requirement);
                TurnOutcome::Continue { next: self.active }
            }
            (GamePhase::DealerSelection, Action::Lead { requirement, cards }) => {
                let selection = self.resolve_selection(player, &cards)?;
                requirement.validate(&selection, None)?;
                self.open_round(requirement);
                self.commit_play(player, selection)
            }
            (GamePhase::DealerSelection, Action::PlayCards(cards)) => {
                let selection = self.resolve_selection(player, &cards)?;
                let requirement = RoundRequirement::infer_from(&selection)
                    .ok_or(GameError::CannotInferRequirement)?;
                self.open_round(requirement);
                self.commit_play(player, selection)
            }
            (GamePhase::Playing, Action::PlayCards(cards)) => {
                let selection = self.resolve_selection(player, &cards)?;
                let requirement = self.requirement.ok_or(GameError::InvalidAction {
                    action: "play-cards",
                    phase: self.phase,
                })?;
                requirement.validate(&selection, self.stack.last())?;
                self.commit_play(player, selection)
            }
            (GamePhase::Playing, Action::Pass) => {
                self.players[player].passed = true;
                self.log.push(
                    LogKind::Action,
                    self.round,
                    format!("{} passed", self.players[player].name),
                );
                debug!(player, round = self.round, "pass");
                self.resolve_advance()
            }
            (phase, action) => {
                return Err(GameError::InvalidAction {
                    action: action.name(),
                    phase,
                });
            }
        };
        self.version += 1;
        Ok(outcome)
    }

    /// Rolls a mash on a card in the player's own hand. Allowed in any live phase.
    pub fn mash_card(&mut self, player: PlayerId, card: CardId) -> Result<MashReport, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        let state = self
            .players
            .get_mut(player)
            .ok_or(GameError::InvalidPlayer(player))?;
        let target = state
            .hand
            .iter_mut()
            .find(|c| c.id == card)
            .ok_or(GameError::UnknownCard(card))?;
        let report = mash(target, &mut self.rng);
        debug_assert!((MIN_LEVEL..=MAX_LEVEL).contains(&target.level));
        let described = *target;
        let kind = if report.changed() {
            LogKind::Success
        } else {
            LogKind::Info
        };
        self.log.push(
            kind,
            self.round,
            format!(
                "{} mashed {}: {:?} ({} -> {})",
                state.name, described.resource, report.outcome, report.before, report.after
            ),
        );
        debug!(player, card = card.0, outcome = ?report.outcome, "mash");
        Ok(report)
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            hands,
            dealer,
        } = builder;
        config.hand_ranges.validate()?;
        if config.humans.iter().any(|&seat| seat >= NUM_PLAYERS) {
            return Err(GameError::InvalidConfiguration("human seat out of range"));
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        let hands = match hands {
            Some(hands) => {
                Self::check_hands(&hands)?;
                hands
            }
            None => deal_hands(&mut rng, &config.hand_ranges, NUM_PLAYERS),
        };
        let dealer = match dealer {
            Some(seat) if seat >= NUM_PLAYERS => {
                return Err(GameError::InvalidConfiguration("dealer seat out of range"));
            }
            Some(seat) => seat,
            None => starting_dealer(&hands),
        };

        let players = hands
            .into_iter()
            .enumerate()
            .map(|(seat, hand)| {
                let is_human = config.humans.contains(&seat);
                let name = match &config.names {
                    Some(names) => names[seat].clone(),
                    None if is_human => format!("You (seat {})", seat + 1),
                    None => format!("Player {}", seat + 1),
                };
                PlayerState {
                    name,
                    is_human,
                    hand,
                    medals: 0,
                    passed: false,
                }
            })
            .collect();

        let mut game = Game {
            phase: GamePhase::Init,
            players,
            dealer,
            active: dealer,
            requirement: None,
            stack: Vec::new(),
            round: 1,
            completed_rounds: 0,
            next_sequence: 0,
            version: 0,
            winner: None,
            log: EventLog::default(),
            rng,
        };
        game.log.push(
            LogKind::Info,
            game.round,
            format!(
                "Hands dealt; {} deals the first round",
                game.players[dealer].name
            ),
        );
        info!(dealer, seed = config.seed, "game dealt");
        game.phase = GamePhase::DealerSelection;
        Ok(game)
    }

    fn check_hands(hands: &[Vec<Card>]) -> Result<(), GameError> {
        if hands.len() != NUM_PLAYERS {
            return Err(GameError::InvalidConfiguration("exactly four hands are required"));
        }
        if hands.iter().any(Vec::is_empty) {
            return Err(GameError::InvalidConfiguration("every hand needs a card"));
        }
        let mut seen = HashSet::new();
        for card in hands.iter().flatten() {
            if !(MIN_LEVEL..=MAX_LEVEL).contains(&card.level) {
                return Err(GameError::InvalidConfiguration("card level out of range"));
            }
            if !seen.insert(card.id) {
                return Err(GameError::InvalidConfiguration("card ids must be unique"));
            }
        }
        Ok(())
    }

    /// Looks up the selected ids in the player's hand, keeping selection order.
    fn resolve_selection(&self, player: PlayerId, ids: &[CardId]) -> Result<Vec<Card>, GameError> {
        let state = &self.players[player];
        let mut seen = HashSet::with_capacity(ids.len());
        let mut selection = Vec::with_capacity(ids.len());
        for &id in ids {
            if !seen.insert(id) {
                return Err(GameError::DuplicateCard(id));
            }
            let card = state.find(id).ok_or(GameError::UnknownCard(id))?;
            selection.push(*card);
        }
        Ok(selection)
    }

    fn open_round(&mut self, requirement: RoundRequirement) {
        self.stack.clear();
        for player in &mut self.players {
            player.passed = false;
        }
        self.requirement = Some(requirement);
        self.active = self.dealer;
        self.phase = GamePhase::Playing;
        self.log.push(
            LogKind::Info,
            self.round,
            format!(
                "{} set round {} requirement: {}",
                self.players[self.dealer].name, self.round, requirement
            ),
        );
        debug!(dealer = self.dealer, round = self.round, %requirement, "round opened");
    }

    fn commit_play(&mut self, player: PlayerId, cards: Vec<Card>) -> TurnOutcome {
        let state = &mut self.players[player];
        state
            .hand
            .retain(|held| !cards.iter().any(|played| played.id == held.id));
        let listed = cards
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.log.push(
            LogKind::Action,
            self.round,
            format!("{} played {} (total {})", state.name, listed, total_level(&cards)),
        );
        debug!(player, total = total_level(&cards), left = state.hand.len(), "play");
        let emptied = state.hand.is_empty();
        self.next_sequence += 1;
        self.stack.push(PlayedSet {
            player,
            cards,
            sequence: self.next_sequence,
        });
        if emptied {
            return self.finish_game(player);
        }
        self.resolve_advance()
    }

    fn resolve_advance(&mut self) -> TurnOutcome {
        match self.advance_turn() {
            Advance::Next(next) => {
                self.active = next;
                TurnOutcome::Continue { next }
            }
            Advance::RoundWinner(winner) => self.end_round(winner),
            Advance::Stalled => self.reopen_dealer_selection(),
        }
    }

    /// Scans forward from the seat after the active one, at most once around.
    fn advance_turn(&self) -> Advance {
        let owner = self.stack.last().map(|play| play.player);
        let seats = self.players.len();
        for step in 1..=seats {
            let seat = (self.active + step) % seats;
            if owner == Some(seat) {
                return Advance::RoundWinner(seat);
            }
            if !self.players[seat].passed {
                return Advance::Next(seat);
            }
        }
        Advance::Stalled
    }

    fn end_round(&mut self, winner: PlayerId) -> TurnOutcome {
        self.phase = GamePhase::RoundEnd;
        self.players[winner].medals += 1;
        self.completed_rounds += 1;
        self.log.push(
            LogKind::Success,
            self.round,
            format!(
                "{} wins round {} and takes a medal",
                self.players[winner].name, self.round
            ),
        );
        info!(winner, round = self.round, "round won");
        self.dealer = winner;
        self.active = winner;
        self.round += 1;
        self.clear_round();
        TurnOutcome::RoundWon { winner }
    }

    /// Stack empty and every seat passed: nobody can win the round, so the same
    /// dealer picks a new requirement. No medal changes hands.
    fn reopen_dealer_selection(&mut self) -> TurnOutcome {
        let dealer = self.dealer;
        self.log.push(
            LogKind::Alert,
            self.round,
            format!(
                "Everyone passed without a play; {} chooses again",
                self.players[dealer].name
            ),
        );
        warn!(dealer, round = self.round, "turn advance stalled on an empty stack");
        self.active = dealer;
        self.clear_round();
        TurnOutcome::Stalled { dealer }
    }

    fn clear_round(&mut self) {
        self.stack.clear();
        self.requirement = None;
        for player in &mut self.players {
            player.passed = false;
        }
        self.phase = GamePhase::DealerSelection;
    }

    fn finish_game(&mut self, winner: PlayerId) -> TurnOutcome {
        self.phase = GamePhase::GameEnd;
        self.winner = Some(winner);
        self.requirement = None;
        self.log.push(
            LogKind::Success,
            self.round,
            format!(
                "{} played their last card and ends the game",
                self.players[winner].name
            ),
        );
        info!(winner, rounds = self.completed_rounds, "game over");
        TurnOutcome::GameWon { winner }
    }
}

/// Pure reducer form of `Game::apply_action`: the input state is left untouched.
pub fn step(
    game: &Game,
    player: PlayerId,
    action: Action,
) -> Result<(Game, TurnOutcome), GameError> {
    let mut next = game.clone();
    let outcome = next.apply_action(player, action)?;
    Ok((next, outcome))
}

/// Folds a stream of actions over a starting state, stopping at the first error.
pub fn replay<I>(game: Game, actions: I) -> Result<Game, GameError>
where
    I: IntoIterator<Item = (PlayerId, Action)>,
{
    actions
        .into_iter()
        .try_fold(game, |state, (player, action)| {
            step(&state, player, action).map(|(next, _)| next)
        })
}
