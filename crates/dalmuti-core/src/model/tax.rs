use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use serde::Serialize;

pub const TAX_CARDS: usize = 2;

/// Record of the post-deal exchange between the ruler and the commoner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    pub ruler: PlayerId,
    pub commoner: PlayerId,
    /// The commoner's strongest cards, now in the ruler's hand.
    pub to_ruler: Vec<Rank>,
    /// The ruler's weakest cards, now in the commoner's hand.
    pub to_commoner: Vec<Rank>,
}

/// The ruler holds rank 1; the commoner is the first seat holding the weakest
/// normal rank. Returns `None` when either role is missing or both roles fall
/// on one player.
pub fn tax_roles(hands: &[Hand]) -> Option<(usize, usize)> {
    let ruler = hands.iter().position(|hand| hand.contains(Rank::RULER))?;
    let commoner = hands.iter().position(|hand| hand.contains(Rank::COMMONER))?;
    (ruler != commoner).then_some((ruler, commoner))
}

pub fn apply_tax(hands: &mut [Hand]) -> Option<TaxSummary> {
    let (ruler, commoner) = tax_roles(hands)?;
    let to_ruler = hands[commoner].take_lowest(TAX_CARDS);
    let to_commoner = hands[ruler].take_highest(TAX_CARDS);
    hands[ruler].extend(to_ruler.iter().copied());
    hands[commoner].extend(to_commoner.iter().copied());
    Some(TaxSummary {
        ruler: PlayerId(ruler),
        commoner: PlayerId(commoner),
        to_ruler,
        to_commoner,
    })
}

#[cfg(test)]
mod tests {
    use super::{apply_tax, tax_roles};
    use crate::model::hand::Hand;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;

    fn hand(values: &[u8]) -> Hand {
        Hand::with_cards(values.iter().map(|&v| Rank::from_value(v).unwrap()).collect())
    }

    fn ranks(values: &[u8]) -> Vec<Rank> {
        values.iter().map(|&v| Rank::from_value(v).unwrap()).collect()
    }

    #[test]
    fn exchange_moves_two_cards_each_way() {
        let mut hands = vec![
            hand(&[3, 4, 10, 10]),
            hand(&[1, 2, 9, 11]),
            hand(&[5, 6]),
            hand(&[7, 8]),
        ];
        let summary = apply_tax(&mut hands).expect("roles present");
        assert_eq!(summary.ruler, PlayerId(1));
        assert_eq!(summary.commoner, PlayerId(0));
        assert_eq!(summary.to_ruler, ranks(&[3, 4]));
        assert_eq!(summary.to_commoner, ranks(&[9, 11]));
        assert_eq!(hands[1].cards(), ranks(&[1, 2, 3, 4]).as_slice());
        assert_eq!(hands[0].cards(), ranks(&[9, 10, 10, 11]).as_slice());
    }

    #[test]
    fn same_holder_skips_exchange() {
        let mut hands = vec![hand(&[1, 10]), hand(&[2, 3]), hand(&[4]), hand(&[5])];
        let before = hands.clone();
        assert_eq!(tax_roles(&hands), None);
        assert!(apply_tax(&mut hands).is_none());
        assert_eq!(hands, before);
    }

    #[test]
    fn missing_commoner_skips_exchange() {
        let mut hands = vec![hand(&[1, 9]), hand(&[2, 3]), hand(&[4]), hand(&[5])];
        assert!(apply_tax(&mut hands).is_none());
    }
}
