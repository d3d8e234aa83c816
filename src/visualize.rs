use std::fmt::Write;

use crate::action::Action;
use crate::card::{Card, CardId, total_level};
use crate::events::{LogEntry, LogKind};
use crate::state::{GamePhase, GameStateView};

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    pub show_stack: bool,
    pub show_hand_slots: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_stack: true,
            show_hand_slots: true,
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let phase = match (state.phase, state.winner) {
        (GamePhase::GameEnd, Some(winner)) => format!("Game over (winner: Player {})", winner + 1),
        (phase, _) => format!("{phase:?}"),
    };
    let _ = writeln!(out, "Round {}  |  {phase}", state.round);
    let requirement = state
        .requirement
        .map(|req| req.to_string())
        .unwrap_or_else(|| String::from("(dealer choosing)"));
    let _ = writeln!(out, "Requirement: {requirement}");
    if options.show_stack {
        if state.stack.is_empty() {
            let _ = writeln!(out, "Table: (empty)");
        } else {
            let _ = writeln!(out, "Table:");
            for play in &state.stack {
                let _ = writeln!(
                    out,
                    "  #{} Player {}: {} (total {})",
                    play.sequence,
                    play.player + 1,
                    format_cards(&play.cards),
                    play.total()
                );
            }
        }
    }
    let _ = writeln!(out, "Players:");
    for player in &state.players {
        let you = if player.id == state.self_player {
            " (You)"
        } else {
            ""
        };
        let mut tags = Vec::new();
        if player.is_dealer {
            tags.push("dealer");
        }
        if player.is_active {
            tags.push("to act");
        }
        if player.passed {
            tags.push("passed");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        let _ = writeln!(
            out,
            "  {}{} - medals {}, cards {}{}",
            player.name, you, player.medals, player.hand_size, tags
        );
    }
    if state.hand.is_empty() {
        let _ = writeln!(out, "Hand: (empty)");
    } else if options.show_hand_slots {
        let entries = state
            .hand
            .iter()
            .enumerate()
            .map(|(slot, card)| format!("[{slot}] {card}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "Hand: {entries}");
    } else {
        let _ = writeln!(out, "Hand: {}", format_cards(&state.hand));
    }
    out
}

/// Renders log entries one per line with a marker for their kind.
pub fn render_log(entries: &[LogEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let marker = match entry.kind {
            LogKind::Info => "  ",
            LogKind::Action => "> ",
            LogKind::Alert => "! ",
            LogKind::Success => "* ",
        };
        let _ = writeln!(out, "{marker}{}", entry.message);
    }
    out
}

pub fn describe_action(state: &GameStateView, action: &Action) -> String {
    match action {
        Action::SubmitRequirement(requirement) => format!("Require {requirement}"),
        Action::Lead { requirement, cards } => {
            let cards = lookup(state, cards);
            format!(
                "Require {requirement} and lead {} (total {})",
                format_cards(&cards),
                total_level(&cards)
            )
        }
        Action::PlayCards(ids) => {
            let cards = lookup(state, ids);
            format!("Play {} (total {})", format_cards(&cards), total_level(&cards))
        }
        Action::Pass => String::from("Pass"),
        Action::MashCard(id) => match lookup(state, &[*id]).first() {
            Some(card) => format!("Mash {card}"),
            None => format!("Mash card {id}"),
        },
    }
}

fn lookup(state: &GameStateView, ids: &[CardId]) -> Vec<Card> {
    ids.iter()
        .filter_map(|id| state.hand.iter().find(|card| card.id == *id).copied())
        .collect()
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameBuilder;

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let game = GameBuilder::new().with_human(0).build().expect("game");
        let view = game.state_view(0).expect("state view");
        let text = render_state(&view);
        assert!(text.contains("(You)"));
        assert!(text.contains("Hand: [0]"));
        assert!(text.contains("(dealer choosing)"));

        let first = view.hand[0];
        let desc = describe_action(&view, &Action::PlayCards(vec![first.id]));
        assert!(desc.starts_with("Play "));
        assert!(desc.contains(&first.to_string()));
        assert_eq!(describe_action(&view, &Action::Pass), "Pass");

        let log = render_log(game.log().entries());
        assert!(log.contains("deals the first round"));
    }

    #[test]
    fn options_hide_stack_and_slots() -> Result<(), crate::error::GameError> {
        let mut game = GameBuilder::new().with_seed(3).build()?;
        let dealer = game.dealer();
        let lowest = game.hand(dealer)?[0];
        game.apply_action(dealer, Action::PlayCards(vec![lowest.id]))?;
        let view = game.state_view(dealer)?;
        assert!(render_state(&view).contains("Table:\n"));

        let options = VisualOptions {
            show_stack: false,
            show_hand_slots: false,
        };
        let text = render_state_with_options(&view, options);
        assert!(!text.contains("Table:"));
        assert!(!text.contains("[0]"));
        Ok(())
    }
}
