use std::error::Error;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use cardmash::visualize::render_state_with_options;
use cardmash::{
    Action, Bot, Game, GameBuilder, HumanBot, NUM_PLAYERS, Session, SessionConfig, TurnOutcome,
    VisualOptions, describe_action, render_log,
};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Play a four-seat game in the terminal, or run AI-only batches."
)]
struct Args {
    /// Base RNG seed (deal, mash and AI rolls are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Seat (1-4) played by a human on stdin; all seats are AI when omitted
    #[arg(long = "human")]
    human: Option<usize>,

    /// Run this many AI-only games and print a summary instead of playing
    #[arg(short = 'g', long = "games")]
    games: Option<usize>,

    /// AI thinking delay in milliseconds
    #[arg(long = "ai-delay-ms", default_value_t = 800)]
    ai_delay_ms: u64,

    /// Human turn budget in milliseconds before the turn is auto-resolved
    #[arg(long = "turn-timeout-ms", default_value_t = 20_000)]
    turn_timeout_ms: u64,

    /// Safety cap on scheduled actions per game
    #[arg(long = "max-steps", default_value_t = 5_000)]
    max_steps: usize,

    /// Skip the per-game event logs in batch mode
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(games) = args.games {
        return run_batch(&args, games);
    }
    let human = match args.human {
        Some(seat) if (1..=NUM_PLAYERS).contains(&seat) => Some(seat - 1),
        Some(seat) => return Err(format!("human seat must be 1-{NUM_PLAYERS}, got {seat}").into()),
        None => None,
    };
    let mut builder = GameBuilder::new().with_seed(args.seed);
    if let Some(seat) = human {
        builder = builder.with_human(seat);
    }
    let game = builder.build()?;
    let config = SessionConfig {
        ai_delay: Duration::from_millis(args.ai_delay_ms),
        turn_timeout: Duration::from_millis(args.turn_timeout_ms),
        ..SessionConfig::default()
    };
    play_interactive(Session::new(game, config, args.seed), human, args.max_steps)
}

fn play_interactive(
    mut session: Session,
    human: Option<usize>,
    max_steps: usize,
) -> Result<(), Box<dyn Error>> {
    let mut human_bot = HumanBot::new("You");
    let clock = Instant::now();
    let mut seen = 0;
    let mut steps = 0;
    session.start(clock.elapsed());

    while !session.game().is_finished() && steps < max_steps {
        seen = flush_log(session.game(), seen);
        let active = session.game().active_player();
        if Some(active) == human {
            let view = session.game().state_view(active)?;
            let seen = session.game().tag();
            let action = human_bot.select_action(&view);
            let now = clock.elapsed();
            // Anything overdue (the turn timeout) fires before late input lands,
            // and input chosen for the old state is then refused.
            if !session.advance(now).is_empty() {
                println!("Your turn timed out and was played automatically.");
            }
            if matches!(action, Action::MashCard(_)) {
                match session.submit(active, action, seen, now) {
                    Ok(TurnOutcome::Mashed(report)) => println!(
                        "Mash: {:?} ({} -> {})",
                        report.outcome, report.before, report.after
                    ),
                    Ok(_) => {}
                    Err(err) => println!("{err}"),
                }
            } else {
                let description = describe_action(&view, &action);
                match session.submit(active, action, seen, now) {
                    Ok(_) => println!("You: {description}"),
                    Err(err) => println!("Not applied: {err}"),
                }
            }
            steps += 1;
            continue;
        }
        let Some(due) = session.next_deadline() else {
            break;
        };
        let now = clock.elapsed();
        if due > now {
            thread::sleep(due - now);
        }
        steps += session.advance(clock.elapsed()).len().max(1);
    }
    flush_log(session.game(), seen);
    print_summary(session.game());
    Ok(())
}

fn run_batch(args: &Args, games: usize) -> Result<(), Box<dyn Error>> {
    let config = SessionConfig {
        ai_delay: Duration::ZERO,
        ..SessionConfig::default()
    };
    let mut wins = [0usize; NUM_PLAYERS];
    let mut medals = [0u32; NUM_PLAYERS];
    let mut rounds = 0u32;
    let mut unfinished = 0usize;
    for index in 0..games {
        let seed = args.seed.wrapping_add(index as u64);
        let game = GameBuilder::new().with_seed(seed).build()?;
        let mut session = Session::new(game, config, seed);
        session.start(Duration::ZERO);
        match session.run_to_end(args.max_steps) {
            Some(winner) => wins[winner] += 1,
            None => unfinished += 1,
        }
        for (seat, total) in medals.iter_mut().enumerate() {
            *total += session.game().medals(seat)?;
        }
        rounds += session.game().completed_rounds();
        if !args.quiet {
            print!("{}", render_log(session.game().log().entries()));
            print!("{}", final_table(session.game())?);
        }
    }
    println!("Played {games} games ({rounds} rounds, {unfinished} unfinished).");
    for seat in 0..NUM_PLAYERS {
        println!(
            "  Player {}: {} wins, {} medals",
            seat + 1,
            wins[seat],
            medals[seat]
        );
    }
    Ok(())
}

/// End-of-game table from the winner's seat, without slot numbers or the
/// unfinished round's stack.
fn final_table(game: &Game) -> Result<String, Box<dyn Error>> {
    let seat = game.winner().unwrap_or_else(|| game.active_player());
    let view = game.state_view(seat)?;
    let options = VisualOptions {
        show_stack: false,
        show_hand_slots: false,
    };
    Ok(render_state_with_options(&view, options))
}

fn flush_log(game: &Game, seen: usize) -> usize {
    print!("{}", render_log(game.log().since(seen)));
    game.log().len()
}

fn print_summary(game: &Game) {
    match game.winner() {
        Some(winner) => {
            let name = game
                .state_view(winner)
                .map(|view| view.players[winner].name.clone())
                .unwrap_or_else(|_| format!("Player {}", winner + 1));
            println!("Game finished. {name} emptied their hand.");
        }
        None => println!("Game stopped before completion."),
    }
    println!("Standings:");
    for (rank, standing) in game.standings().iter().enumerate() {
        println!(
            "  {}. {} - {} medals, {} cards left",
            rank + 1,
            standing.name,
            standing.medals,
            standing.cards_left
        );
    }
}
