use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cards", rename_all = "snake_case")]
pub enum TurnAction {
    Play(Vec<Rank>),
    Pass,
}

/// One accepted action plus a summary of the state it left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub player: PlayerId,
    pub action: TurnAction,
    pub revolution: bool,
    pub trick_closed: bool,
    pub cards_left: usize,
}
