pub mod bot;
pub mod policy;

pub use bot::{BotAction, BotDifficulty, PlayPlanner, choose_action};
pub use policy::{HeuristicPolicy, Policy, PolicyContext};
