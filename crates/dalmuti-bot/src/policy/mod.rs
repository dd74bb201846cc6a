mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::BotAction;
use dalmuti_core::model::hand::Hand;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::round::RoundState;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: PlayerId,
    pub hand: &'a Hand,
    pub round: &'a RoundState,
}

impl<'a> PolicyContext<'a> {
    /// Context for whoever is due to act in `round`.
    pub fn for_current(round: &'a RoundState) -> Self {
        let player = round.current_player();
        Self {
            seat: player.id(),
            hand: player.hand(),
            round,
        }
    }
}

/// Interface for computer seats; the bench seats several implementations.
pub trait Policy: Send {
    fn choose_action(&mut self, ctx: &PolicyContext) -> BotAction;

    fn name(&self) -> &str;
}
