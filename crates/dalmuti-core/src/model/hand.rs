use crate::model::rank::Rank;
use std::vec::Vec;

/// Cards held by one player, kept sorted ascending (jokers last).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Rank>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Rank>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn extend<I: IntoIterator<Item = Rank>>(&mut self, cards: I) {
        self.cards.extend(cards);
        self.sort();
    }

    /// Removes the cards at `indices`, returning them sorted ascending.
    /// Callers must have checked that the indices are distinct and in range.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Vec<Rank> {
        let mut ordered = indices.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        let mut removed: Vec<Rank> = ordered
            .into_iter()
            .map(|index| self.cards.remove(index))
            .collect();
        removed.sort();
        removed
    }

    /// Takes the `count` lowest (strongest) cards.
    pub fn take_lowest(&mut self, count: usize) -> Vec<Rank> {
        let count = count.min(self.cards.len());
        self.cards.drain(..count).collect()
    }

    /// Takes the `count` highest (weakest) cards.
    pub fn take_highest(&mut self, count: usize) -> Vec<Rank> {
        let start = self.cards.len().saturating_sub(count);
        self.cards.drain(start..).collect()
    }

    pub fn contains(&self, card: Rank) -> bool {
        self.cards.contains(&card)
    }

    pub fn count(&self, card: Rank) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Maps a combination back onto hand positions, consuming each position once.
    pub fn indices_of(&self, cards: &[Rank]) -> Option<Vec<usize>> {
        let mut used = vec![false; self.cards.len()];
        let mut indices = Vec::with_capacity(cards.len());
        for card in cards {
            let index = self
                .cards
                .iter()
                .enumerate()
                .position(|(idx, c)| !used[idx] && c == card)?;
            used[index] = true;
            indices.push(index);
        }
        Some(indices)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rank> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Rank] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::rank::Rank;

    fn ranks(values: &[u8]) -> Vec<Rank> {
        values.iter().map(|&v| Rank::from_value(v).unwrap()).collect()
    }

    #[test]
    fn cards_stay_sorted_with_jokers_last() {
        let mut hand = Hand::with_cards(ranks(&[11, 7, 2]));
        hand.extend(ranks(&[5]));
        assert_eq!(hand.cards(), ranks(&[2, 5, 7, 11]).as_slice());
    }

    #[test]
    fn remove_indices_returns_sorted_cards() {
        let mut hand = Hand::with_cards(ranks(&[1, 3, 3, 9, 11]));
        let removed = hand.remove_indices(&[4, 1]);
        assert_eq!(removed, ranks(&[3, 11]));
        assert_eq!(hand.cards(), ranks(&[1, 3, 9]).as_slice());
    }

    #[test]
    fn take_lowest_and_highest() {
        let mut hand = Hand::with_cards(ranks(&[4, 2, 10, 11, 6]));
        assert_eq!(hand.take_lowest(2), ranks(&[2, 4]));
        assert_eq!(hand.take_highest(2), ranks(&[10, 11]));
        assert_eq!(hand.cards(), ranks(&[6]).as_slice());
    }

    #[test]
    fn indices_of_consumes_duplicate_positions() {
        let hand = Hand::with_cards(ranks(&[2, 5, 5, 5, 11]));
        assert_eq!(hand.indices_of(&ranks(&[5, 5, 11])), Some(vec![1, 2, 4]));
        assert_eq!(hand.indices_of(&ranks(&[2, 2])), None);
    }
}
