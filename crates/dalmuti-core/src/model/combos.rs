use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::round::RoundState;
use crate::model::rules::{TrickView, check_against};
use crate::model::trick::group_rank;
use std::collections::BTreeMap;

/// Every play `hand` can legally make right now, sorted ascending by group
/// rank. Index 0 is the lowest rank regardless of revolution.
pub fn all_legal_plays(hand: &Hand, round: &RoundState) -> Vec<Vec<Rank>> {
    legal_plays_against(hand, TrickView::of(round))
}

pub fn legal_plays_against(hand: &Hand, view: TrickView<'_>) -> Vec<Vec<Rank>> {
    let mut plays: Vec<Vec<Rank>> = candidate_plays(hand)
        .into_iter()
        .filter(|cards| check_against(cards, view).is_ok())
        .collect();
    plays.sort_by_key(|cards| group_rank(cards));
    plays
}

/// Same-rank prefixes of every group, then the joker alone and every prefix
/// padded with one joker.
pub fn candidate_plays(hand: &Hand) -> Vec<Vec<Rank>> {
    let mut groups: BTreeMap<Rank, usize> = BTreeMap::new();
    for card in hand.iter().filter(|card| !card.is_joker()) {
        *groups.entry(*card).or_default() += 1;
    }

    let mut candidates: Vec<Vec<Rank>> = groups
        .iter()
        .flat_map(|(&rank, &held)| (1..=held).map(move |size| vec![rank; size]))
        .collect();

    if hand.contains(Rank::JOKER) {
        let padded: Vec<Vec<Rank>> = candidates
            .iter()
            .map(|cards| {
                let mut cards = cards.clone();
                cards.push(Rank::JOKER);
                cards
            })
            .collect();
        candidates.push(vec![Rank::JOKER]);
        candidates.extend(padded);
    }

    candidates
}
