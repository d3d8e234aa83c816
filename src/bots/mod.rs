pub mod heuristic;
pub mod human;

pub use heuristic::HeuristicBot;
pub use human::HumanBot;
