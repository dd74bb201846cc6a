mod play;

pub use play::PlayPlanner;

use dalmuti_core::model::combos::all_legal_plays;
use dalmuti_core::model::hand::Hand;
use dalmuti_core::model::rank::Rank;
use dalmuti_core::model::round::RoundState;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Uniformly random legal play.
    #[default]
    Easy,
    /// Weakest legal play.
    Medium,
    /// Strongest legal play.
    Hard,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 3] = [
        BotDifficulty::Easy,
        BotDifficulty::Medium,
        BotDifficulty::Hard,
    ];

    pub fn from_env() -> Self {
        static CACHED: OnceLock<BotDifficulty> = OnceLock::new();
        *CACHED.get_or_init(|| {
            std::env::var("DALMUTI_BOT_DIFFICULTY")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default()
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Easy => "easy",
            BotDifficulty::Medium => "medium",
            BotDifficulty::Hard => "hard",
        }
    }
}

impl FromStr for BotDifficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(BotDifficulty::Easy),
            "medium" | "normal" => Ok(BotDifficulty::Medium),
            "hard" => Ok(BotDifficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision, with the play already mapped to positions in the hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Play { cards: Vec<Rank>, indices: Vec<usize> },
    Pass,
}

impl BotAction {
    pub fn is_pass(&self) -> bool {
        matches!(self, BotAction::Pass)
    }
}

/// Picks a play or a pass for `hand`. Only `Easy` consults `rng`.
pub fn choose_action<R: Rng + ?Sized>(
    hand: &Hand,
    round: &RoundState,
    difficulty: BotDifficulty,
    rng: &mut R,
) -> BotAction {
    let legal = all_legal_plays(hand, round);
    match PlayPlanner::choose(&legal, difficulty, rng) {
        Some(cards) => match hand.indices_of(&cards) {
            Some(indices) => BotAction::Play { cards, indices },
            None => BotAction::Pass,
        },
        None => BotAction::Pass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dalmuti_core::model::player::Player;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ranks(values: &[u8]) -> Vec<Rank> {
        values.iter().map(|&v| Rank::from_value(v).unwrap()).collect()
    }

    fn build_round(hands: &[&[u8]], starting: usize) -> RoundState {
        let players = Player::roster(hands.len())
            .into_iter()
            .zip(hands)
            .map(|(player, cards)| player.with_hand(Hand::with_cards(ranks(cards))))
            .collect();
        RoundState::from_hands(players, starting)
    }

    #[test]
    fn difficulty_parses_case_insensitive_values() {
        assert_eq!("EASY".parse::<BotDifficulty>(), Ok(BotDifficulty::Easy));
        assert_eq!("normal".parse::<BotDifficulty>(), Ok(BotDifficulty::Medium));
        assert_eq!(" hard ".parse::<BotDifficulty>(), Ok(BotDifficulty::Hard));
        assert!("brutal".parse::<BotDifficulty>().is_err());
        for difficulty in BotDifficulty::ALL {
            assert_eq!(difficulty.as_str().parse::<BotDifficulty>(), Ok(difficulty));
        }
    }

    #[test]
    fn default_difficulty_is_easy() {
        assert_eq!(BotDifficulty::default(), BotDifficulty::Easy);
    }

    #[test]
    fn medium_plays_weakest_and_hard_plays_strongest() {
        let round = build_round(&[&[2, 6, 9], &[5], &[7], &[8]], 0);
        let hand = round.players()[0].hand().clone();
        let mut rng = StdRng::seed_from_u64(0);

        let medium = choose_action(&hand, &round, BotDifficulty::Medium, &mut rng);
        assert_eq!(
            medium,
            BotAction::Play {
                cards: ranks(&[9]),
                indices: vec![2]
            }
        );

        let hard = choose_action(&hand, &round, BotDifficulty::Hard, &mut rng);
        assert_eq!(
            hard,
            BotAction::Play {
                cards: ranks(&[2]),
                indices: vec![0]
            }
        );
    }

    #[test]
    fn passes_when_nothing_beats_the_pile() {
        let mut round = build_round(&[&[1, 9], &[5, 6], &[7], &[8]], 0);
        round.play_turn(&[0]).unwrap();
        let hand = round.players()[1].hand().clone();
        let mut rng = StdRng::seed_from_u64(0);
        for difficulty in BotDifficulty::ALL {
            assert!(choose_action(&hand, &round, difficulty, &mut rng).is_pass());
        }
    }

    #[test]
    fn easy_choice_is_always_legal() {
        let round = build_round(&[&[3, 3, 5, 8, 11], &[5], &[7], &[8]], 0);
        let hand = round.players()[0].hand();
        let legal = all_legal_plays(hand, &round);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            match choose_action(hand, &round, BotDifficulty::Easy, &mut rng) {
                BotAction::Play { cards, indices } => {
                    assert!(legal.contains(&cards));
                    assert_eq!(hand.indices_of(&cards), Some(indices));
                }
                BotAction::Pass => panic!("open trick always has a legal play"),
            }
        }
    }
}
