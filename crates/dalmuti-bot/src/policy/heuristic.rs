use super::{Policy, PolicyContext};
use crate::bot::{BotAction, BotDifficulty, choose_action};
use dalmuti_core::model::combos::all_legal_plays;
use dalmuti_core::model::trick::format_cards;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, event};

/// Rule-based opponent driven by a difficulty level.
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    rng: StdRng,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::Easy)
    }

    pub fn medium() -> Self {
        Self::new(BotDifficulty::Medium)
    }

    pub fn hard() -> Self {
        Self::new(BotDifficulty::Hard)
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn choose_action(&mut self, ctx: &PolicyContext) -> BotAction {
        let action = choose_action(ctx.hand, ctx.round, self.difficulty, &mut self.rng);
        log_play_decision(ctx, self.difficulty, &action);
        action
    }

    fn name(&self) -> &str {
        self.difficulty.as_str()
    }
}

fn log_play_decision(ctx: &PolicyContext, difficulty: BotDifficulty, action: &BotAction) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let legal = all_legal_plays(ctx.hand, ctx.round);
    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(|play| format_cards(play))
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} plays", legal.len())
    };
    let chosen = match action {
        BotAction::Play { cards, .. } => format_cards(cards),
        BotAction::Pass => "pass".to_string(),
    };

    event!(
        target: "dalmuti_bot::play",
        Level::INFO,
        seat = %ctx.seat,
        difficulty = %difficulty,
        hand_size = ctx.hand.len(),
        legal_count = legal.len(),
        legal_plays = %legal_preview,
        chosen = %chosen,
        revolution = ctx.round.is_revolution(),
        pile = ctx.round.last_played().map(|play| play.len()).unwrap_or(0),
    );
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::bot::{BotAction, BotDifficulty};
    use crate::policy::{Policy, PolicyContext};
    use dalmuti_core::game::game_state::GameState;

    #[test]
    fn seeded_easy_policy_is_reproducible() {
        let game = GameState::with_seed(5, 21).unwrap();
        let ctx = PolicyContext::for_current(game.round());
        let mut a = HeuristicPolicy::with_seed(BotDifficulty::Easy, 7);
        let mut b = HeuristicPolicy::with_seed(BotDifficulty::Easy, 7);
        for _ in 0..10 {
            assert_eq!(a.choose_action(&ctx), b.choose_action(&ctx));
        }
    }

    #[test]
    fn policies_drive_a_game_to_completion() {
        let mut game = GameState::with_seed(4, 5).unwrap();
        let mut seats: Vec<HeuristicPolicy> = BotDifficulty::ALL
            .iter()
            .cycle()
            .take(4)
            .enumerate()
            .map(|(idx, d)| HeuristicPolicy::with_seed(*d, idx as u64))
            .collect();
        let mut steps = 0;
        while !game.is_finished() {
            steps += 1;
            assert!(steps < 2_000);
            let seat = game.round().current_player_index();
            let action = {
                let ctx = PolicyContext::for_current(game.round());
                seats[seat].choose_action(&ctx)
            };
            match action {
                BotAction::Play { indices, .. } => {
                    game.round_mut().play_turn(&indices).expect("policy plays are legal");
                }
                BotAction::Pass => {
                    game.round_mut().pass_turn().unwrap();
                }
            }
        }
        assert_eq!(game.round().finished_players().len(), 4);
    }

    #[test]
    fn names_follow_difficulty() {
        assert_eq!(HeuristicPolicy::easy().name(), "easy");
        assert_eq!(HeuristicPolicy::medium().name(), "medium");
        assert_eq!(HeuristicPolicy::hard().difficulty(), BotDifficulty::Hard);
    }
}
