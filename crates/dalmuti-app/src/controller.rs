use dalmuti_bot::{BotAction, BotDifficulty, HeuristicPolicy, Policy, PolicyContext};
use dalmuti_core::game::game_state::GameState;
use dalmuti_core::game::serialization::RoundSnapshot;
use dalmuti_core::model::combos::all_legal_plays;
use dalmuti_core::model::deck::SetupError;
use dalmuti_core::model::player::{Controller, Player, PlayerId};
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::round::{FinishedPlayer, PassOutcome, PlayError, RoundState, TurnOutcome};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub player_count: usize,
    pub difficulty: BotDifficulty,
    pub seed: Option<u64>,
    /// Seat a computer in the human chair as well.
    pub all_computer: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_count: 4,
            difficulty: BotDifficulty::default(),
            seed: None,
            all_computer: false,
        }
    }
}

/// Engine boundary for a presentation layer: owns the game exclusively and
/// applies human and computer actions one at a time.
pub struct GameController {
    game: GameState,
    settings: GameSettings,
    policy: HeuristicPolicy,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayStep {
    pub player: PlayerId,
    pub action: BotAction,
}

impl GameController {
    pub fn start_game(settings: GameSettings) -> Result<Self, SetupError> {
        let game = Self::deal(&settings)?;
        info!(
            players = settings.player_count,
            difficulty = %settings.difficulty,
            seed = game.seed(),
            "game started"
        );
        Ok(Self {
            policy: Self::policy_for(&settings, game.seed()),
            game,
            settings,
            generation: 0,
        })
    }

    /// Discards the current round and deals a new one. Any scheduler holding
    /// the previous generation stops before mutating the new round.
    pub fn restart(&mut self, settings: GameSettings) -> Result<(), SetupError> {
        let game = Self::deal(&settings)?;
        self.policy = Self::policy_for(&settings, game.seed());
        self.game = game;
        self.settings = settings;
        self.generation += 1;
        info!(generation = self.generation, seed = self.game.seed(), "game restarted");
        Ok(())
    }

    fn deal(settings: &GameSettings) -> Result<GameState, SetupError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        if settings.all_computer {
            let players = (0..settings.player_count)
                .map(|idx| Player::new(PlayerId(idx), format!("Computer {idx}"), Controller::Computer))
                .collect();
            GameState::with_players(players, seed)
        } else {
            GameState::with_seed(settings.player_count, seed)
        }
    }

    fn policy_for(settings: &GameSettings, game_seed: u64) -> HeuristicPolicy {
        match settings.seed {
            Some(_) => HeuristicPolicy::with_seed(settings.difficulty, game_seed.rotate_left(17)),
            None => HeuristicPolicy::new(settings.difficulty),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed(&self) -> u64 {
        self.game.seed()
    }

    pub fn round(&self) -> &RoundState {
        self.game.round()
    }

    pub fn snapshot(&self, viewer: PlayerId) -> RoundSnapshot {
        RoundSnapshot::capture(self.game.round(), viewer)
    }

    pub fn snapshot_json(&self, viewer: PlayerId) -> serde_json::Result<String> {
        RoundSnapshot::to_json(self.game.round(), viewer)
    }

    pub fn play_turn(&mut self, indices: &[usize]) -> Result<TurnOutcome, PlayError> {
        let seat = self.round().current_player_index();
        match self.game.round_mut().play_turn(indices) {
            Ok(outcome) => {
                debug!(
                    seat,
                    cards = ?outcome.cards,
                    revolution = self.round().is_revolution(),
                    "play accepted"
                );
                if outcome.round_finished {
                    info!(order = ?self.round().finished_players(), "round finished");
                }
                Ok(outcome)
            }
            Err(err) => {
                debug!(seat, ?indices, error = %err, "play rejected");
                Err(err)
            }
        }
    }

    pub fn pass_turn(&mut self) -> Result<PassOutcome, PlayError> {
        let outcome = self.game.round_mut().pass_turn()?;
        debug!(?outcome, "pass accepted");
        Ok(outcome)
    }

    pub fn is_human_turn(&self) -> bool {
        let round = self.round();
        !round.is_finished() && !round.current_player().is_computer()
    }

    pub fn computer_turn_pending(&self) -> bool {
        let round = self.round();
        !round.is_finished() && round.current_player().is_computer()
    }

    /// Legal plays for whoever is due to act, weakest last.
    pub fn legal_plays(&self) -> Vec<Vec<Rank>> {
        let round = self.round();
        all_legal_plays(round.current_player().hand(), round)
    }

    /// Applies one computer decision, computed from the current state.
    pub fn autoplay_one(&mut self) -> Option<AutoplayStep> {
        if !self.computer_turn_pending() {
            return None;
        }

        let (player, action) = {
            let ctx = PolicyContext::for_current(self.game.round());
            (ctx.seat, self.policy.choose_action(&ctx))
        };

        let applied = match &action {
            BotAction::Play { indices, .. } => self.play_turn(indices).map(|_| ()),
            BotAction::Pass => self.pass_turn().map(|_| ()),
        };

        match applied {
            Ok(()) => Some(AutoplayStep { player, action }),
            Err(err) => {
                tracing::warn!(%player, error = %err, "computer action rejected");
                None
            }
        }
    }

    pub fn round_finished(&self) -> Option<&[FinishedPlayer]> {
        let round = self.round();
        round.is_finished().then(|| round.finished_players())
    }
}
