use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use serde::Serialize;

/// An accepted play: equal-rank cards, possibly padded with jokers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play {
    pub player: PlayerId,
    pub cards: Vec<Rank>,
}

impl Play {
    pub fn rank(&self) -> Rank {
        group_rank(&self.cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Rank a combination competes at: its non-joker rank, or the joker rank when
/// it is all jokers.
pub fn group_rank(cards: &[Rank]) -> Rank {
    cards
        .iter()
        .copied()
        .find(|card| !card.is_joker())
        .unwrap_or(Rank::JOKER)
}

/// Renders a combination as `[4 4 J]`.
pub fn format_cards(cards: &[Rank]) -> String {
    let parts: Vec<String> = cards.iter().map(Rank::to_string).collect();
    format!("[{}]", parts.join(" "))
}

/// Exactly two cards of one non-joker rank.
pub fn is_revolution_pair(cards: &[Rank]) -> bool {
    matches!(cards, [a, b] if a == b && !a.is_joker())
}
