use super::BotDifficulty;
use dalmuti_core::model::rank::Rank;
use rand::Rng;
use rand::seq::SliceRandom;

pub struct PlayPlanner;

impl PlayPlanner {
    /// `legal` must be sorted ascending by group rank, as the combination
    /// generator returns it.
    pub fn choose<R: Rng + ?Sized>(
        legal: &[Vec<Rank>],
        difficulty: BotDifficulty,
        rng: &mut R,
    ) -> Option<Vec<Rank>> {
        let chosen = match difficulty {
            BotDifficulty::Easy => legal.choose(rng),
            BotDifficulty::Medium => legal.last(),
            BotDifficulty::Hard => legal.first(),
        };
        chosen.cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::PlayPlanner;
    use crate::bot::BotDifficulty;
    use dalmuti_core::model::rank::Rank;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn play(values: &[u8]) -> Vec<Rank> {
        values.iter().map(|&v| Rank::from_value(v).unwrap()).collect()
    }

    #[test]
    fn empty_legal_list_means_pass() {
        let mut rng = StdRng::seed_from_u64(1);
        for difficulty in BotDifficulty::ALL {
            assert_eq!(PlayPlanner::choose(&[], difficulty, &mut rng), None);
        }
    }

    #[test]
    fn easy_eventually_samples_every_option() {
        let legal = vec![play(&[2]), play(&[4, 4]), play(&[7])];
        let mut rng = StdRng::seed_from_u64(9);
        let seen: HashSet<Vec<Rank>> = (0..200)
            .filter_map(|_| PlayPlanner::choose(&legal, BotDifficulty::Easy, &mut rng))
            .collect();
        assert_eq!(seen.len(), legal.len());
    }

    #[test]
    fn deterministic_difficulties_pick_list_ends() {
        let legal = vec![play(&[2]), play(&[4, 4]), play(&[7])];
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            PlayPlanner::choose(&legal, BotDifficulty::Hard, &mut rng),
            Some(play(&[2]))
        );
        assert_eq!(
            PlayPlanner::choose(&legal, BotDifficulty::Medium, &mut rng),
            Some(play(&[7]))
        );
    }
}
