use crate::model::hand::Hand;
use crate::model::rank::{CATALOG, Rank};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 8;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Rank>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    PlayerCount {
        requested: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::PlayerCount {
                requested,
                min,
                max,
            } => write!(f, "player count {requested} is outside {min}..={max}"),
        }
    }
}

impl std::error::Error for SetupError {}

pub fn check_player_count(player_count: usize) -> Result<(), SetupError> {
    if (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        Ok(())
    } else {
        Err(SetupError::PlayerCount {
            requested: player_count,
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        })
    }
}

impl Deck {
    /// Expands every catalog entry into `quantity` copies, in catalog order.
    pub fn standard() -> Self {
        let cards = CATALOG
            .iter()
            .flat_map(|entry| std::iter::repeat_n(entry.rank, usize::from(entry.quantity)))
            .collect();
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn cards(&self) -> &[Rank] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deals round-robin: card `i` goes to player `i % player_count`.
    pub fn deal(&self, player_count: usize) -> Result<Vec<Hand>, SetupError> {
        check_player_count(player_count)?;
        let mut piles: Vec<Vec<Rank>> = vec![Vec::new(); player_count];
        for (index, card) in self.cards.iter().enumerate() {
            piles[index % player_count].push(*card);
        }
        Ok(piles.into_iter().map(Hand::with_cards).collect())
    }
}
