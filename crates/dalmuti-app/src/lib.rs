pub mod cli;
pub mod console;
pub mod controller;
pub mod logging;
pub mod scheduler;

pub use controller::{AutoplayStep, GameController, GameSettings};
pub use scheduler::{SharedController, TurnScheduler};
