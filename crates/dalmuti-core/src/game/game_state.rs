use crate::model::deck::{Deck, SetupError, check_player_count};
use crate::model::player::Player;
use crate::model::round::RoundState;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One game from setup to final ranking. Owns the round exclusively.
#[derive(Debug, Clone)]
pub struct GameState {
    current_round: RoundState,
    seed: u64,
}

impl GameState {
    pub fn new(player_count: usize) -> Result<Self, SetupError> {
        let seed: u64 = rand::random();
        Self::with_seed(player_count, seed)
    }

    pub fn with_seed(player_count: usize, seed: u64) -> Result<Self, SetupError> {
        Self::with_players(Player::roster(player_count), seed)
    }

    /// Seats a caller-supplied roster, e.g. all computer seats for simulation.
    pub fn with_players(players: Vec<Player>, seed: u64) -> Result<Self, SetupError> {
        check_player_count(players.len())?;
        let mut rng = StdRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&mut rng);
        let current_round = RoundState::deal(&deck, players)?;
        Ok(Self {
            current_round,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player_count(&self) -> usize {
        self.current_round.players().len()
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn is_finished(&self) -> bool {
        self.current_round.is_finished()
    }
}
