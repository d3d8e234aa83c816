use std::io::{self, Write};

use crate::action::Action;
use crate::bot::Bot;
use crate::card::{CardId, ResourceType};
use crate::requirement::RoundRequirement;
use crate::state::{GamePhase, GameStateView};
use crate::visualize::render_state;

/// Interactive seat that reads commands from standard input.
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

impl Bot for HumanBot {
    fn select_action(&mut self, state: &GameStateView) -> Action {
        loop {
            println!(
                "\n=== {}'s turn (player {}) ===",
                self.name,
                state.self_player + 1
            );
            println!("{}", render_state(state));
            print_commands(state.phase);
            print!("> ");
            if io::stdout().flush().is_err() {
                eprintln!("failed to flush stdout");
            }
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                eprintln!("failed to read input");
                continue;
            }
            let trimmed = input.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                println!("Exiting game at user's request.");
                std::process::exit(0);
            }
            match parse_command(trimmed, state) {
                Ok(action) => return action,
                Err(message) => println!("{message}"),
            }
        }
    }
}

fn print_commands(phase: GamePhase) {
    println!("Commands (cards are chosen by the [slot] shown next to your hand):");
    if phase == GamePhase::DealerSelection {
        println!("  req fixed <resource> <count>   set a single-type requirement");
        println!("  req asc <resource> <count>     single-type, strictly ascending levels");
        println!("  req mixed <count>              any types, strictly ascending levels");
        println!("  play <slot> [<slot> ...]       open the round; requirement inferred");
    } else {
        println!("  play <slot> [<slot> ...]       play the selected cards");
        println!("  pass                           give up the round");
    }
    println!("  mash <slot>                    try to nudge a card's level");
    println!("  q                              quit");
}

/// Parses one command line into an action. Slots index the rendered hand.
pub fn parse_command(input: &str, state: &GameStateView) -> Result<Action, String> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Err(String::from("Please enter a command."));
    };
    let rest: Vec<&str> = words.collect();
    match head.to_ascii_lowercase().as_str() {
        "pass" => Ok(Action::Pass),
        "play" => Ok(Action::PlayCards(slots_to_ids(&rest, state)?)),
        "mash" => {
            let ids = slots_to_ids(&rest, state)?;
            match ids.as_slice() {
                [id] => Ok(Action::MashCard(*id)),
                _ => Err(String::from("Mash exactly one card.")),
            }
        }
        "req" => parse_requirement(&rest).map(Action::SubmitRequirement),
        other => Err(format!("Unknown command '{other}'.")),
    }
}

fn slots_to_ids(slots: &[&str], state: &GameStateView) -> Result<Vec<CardId>, String> {
    if slots.is_empty() {
        return Err(String::from("Select at least one card slot."));
    }
    slots
        .iter()
        .map(|slot| {
            let index = slot
                .parse::<usize>()
                .map_err(|_| format!("'{slot}' is not a slot number."))?;
            state
                .hand
                .get(index)
                .map(|card| card.id)
                .ok_or_else(|| format!("Slot {index} is out of range."))
        })
        .collect()
}

fn parse_resource(word: &str) -> Result<ResourceType, String> {
    ResourceType::ALL
        .into_iter()
        .find(|resource| resource.label().eq_ignore_ascii_case(word))
        .ok_or_else(|| format!("Unknown resource '{word}' (soldier, tower, farm, ore)."))
}

fn parse_count(word: Option<&&str>) -> Result<usize, String> {
    let word = word.ok_or_else(|| String::from("Missing card count."))?;
    match word.parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(format!("'{word}' is not a positive count.")),
    }
}

fn parse_requirement(words: &[&str]) -> Result<RoundRequirement, String> {
    match words.first().map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("fixed") => {
            let resource = parse_resource(words.get(1).ok_or("Missing resource.")?)?;
            Ok(RoundRequirement::single_fixed(resource, parse_count(words.get(2))?))
        }
        Some("asc") => {
            let resource = parse_resource(words.get(1).ok_or("Missing resource.")?)?;
            Ok(RoundRequirement::single_ascending(resource, parse_count(words.get(2))?))
        }
        Some("mixed") => Ok(RoundRequirement::mixed_ascending(parse_count(words.get(1))?)),
        _ => Err(String::from("Use: req fixed|asc <resource> <count>, or req mixed <count>.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn view(hand: Vec<Card>) -> GameStateView {
        GameStateView {
            phase: GamePhase::DealerSelection,
            self_player: 0,
            active_player: 0,
            dealer: 0,
            round: 1,
            completed_rounds: 0,
            requirement: None,
            stack: Vec::new(),
            players: Vec::new(),
            hand,
            winner: None,
        }
    }

    #[test]
    fn parses_play_by_slot() {
        let state = view(vec![
            Card::new(CardId(10), ResourceType::Farm, 2),
            Card::new(CardId(11), ResourceType::Ore, 5),
        ]);
        assert_eq!(
            parse_command("play 1 0", &state),
            Ok(Action::PlayCards(vec![CardId(11), CardId(10)]))
        );
        assert!(parse_command("play 4", &state).is_err());
        assert_eq!(parse_command("mash 0", &state), Ok(Action::MashCard(CardId(10))));
    }

    #[test]
    fn parses_requirements() {
        let state = view(Vec::new());
        assert_eq!(
            parse_command("req asc Tower 2", &state),
            Ok(Action::SubmitRequirement(RoundRequirement::single_ascending(
                ResourceType::Tower,
                2
            )))
        );
        assert_eq!(
            parse_command("req mixed 3", &state),
            Ok(Action::SubmitRequirement(RoundRequirement::mixed_ascending(3)))
        );
        assert!(parse_command("req fixed gold 1", &state).is_err());
        assert!(parse_command("req fixed farm 0", &state).is_err());
    }
}
