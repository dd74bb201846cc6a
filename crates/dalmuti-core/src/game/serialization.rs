use crate::model::history::TurnRecord;
use crate::model::player::{Controller, PlayerId};
use crate::model::rank::Rank;
use crate::model::round::{FinishedPlayer, RoundState};
use crate::model::tax::TaxSummary;
use crate::model::trick::Play;
use serde::Serialize;

/// Read-only view of a round for a presentation layer. Only the viewer's own
/// hand is revealed; everyone else shows a card count.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoundSnapshot {
    pub viewer: PlayerId,
    pub players: Vec<PlayerSnapshot>,
    pub current_player: PlayerId,
    pub hand: Vec<Rank>,
    pub last_played: Option<Play>,
    pub passed_players: Vec<PlayerId>,
    pub finished_players: Vec<FinishedPlayer>,
    pub revolution: bool,
    pub round_finished: bool,
    pub tax: Option<TaxSummary>,
    pub last_turn: Option<TurnRecord>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub controller: Controller,
    pub cards: usize,
    pub finish_rank: Option<u8>,
}

impl RoundSnapshot {
    pub fn capture(round: &RoundState, viewer: PlayerId) -> Self {
        let players = round
            .players()
            .iter()
            .map(|player| PlayerSnapshot {
                id: player.id(),
                name: player.name().to_string(),
                controller: player.controller(),
                cards: player.hand().len(),
                finish_rank: player.finish_rank(),
            })
            .collect();

        let hand = round
            .player(viewer.index())
            .map(|player| player.hand().cards().to_vec())
            .unwrap_or_default();

        RoundSnapshot {
            viewer,
            players,
            current_player: PlayerId(round.current_player_index()),
            hand,
            last_played: round.last_played().cloned(),
            passed_players: round.passed_players().iter().copied().map(PlayerId).collect(),
            finished_players: round.finished_players().to_vec(),
            revolution: round.is_revolution(),
            round_finished: round.is_finished(),
            tax: round.tax_summary().cloned(),
            last_turn: round.history().last().cloned(),
        }
    }

    pub fn to_json(round: &RoundState, viewer: PlayerId) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(round, viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::RoundSnapshot;
    use crate::game::game_state::GameState;
    use crate::model::player::PlayerId;

    #[test]
    fn snapshot_hides_other_hands() {
        let game = GameState::with_seed(4, 5).unwrap();
        let snapshot = RoundSnapshot::capture(game.round(), PlayerId(0));
        assert_eq!(snapshot.hand, game.round().players()[0].hand().cards());
        assert_eq!(snapshot.players.len(), 4);
        let total: usize = snapshot.players.iter().map(|p| p.cards).sum();
        assert_eq!(total, 57);
        assert!(snapshot.last_played.is_none());
        assert!(!snapshot.round_finished);
    }

    #[test]
    fn json_export_names_fields() {
        let mut game = GameState::with_seed(4, 8).unwrap();
        let idx = game.round().current_player_index();
        let last = game.round().players()[idx].hand().len() - 1;
        game.round_mut().play_turn(&[last]).unwrap();
        let json = RoundSnapshot::to_json(game.round(), PlayerId(0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["revolution"], serde_json::Value::Bool(false));
        assert!(value["last_played"]["cards"].is_array());
        assert_eq!(value["last_turn"]["turn"], 1);
        assert_eq!(value["last_turn"]["action"]["kind"], "play");
    }
}
