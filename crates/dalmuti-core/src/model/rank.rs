use core::fmt;
use serde::{Deserialize, Serialize};

/// A card rank. Lower values are more powerful outside a revolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

/// Static catalog entry for one rank group.
#[derive(Debug, PartialEq, Eq)]
pub struct CardRank {
    pub rank: Rank,
    pub name: &'static str,
    pub quantity: u8,
}

pub const CATALOG: [CardRank; 11] = [
    CardRank { rank: Rank(1), name: "Dalmuti", quantity: 1 },
    CardRank { rank: Rank(2), name: "Archbishop", quantity: 2 },
    CardRank { rank: Rank(3), name: "Prime Minister", quantity: 3 },
    CardRank { rank: Rank(4), name: "Baroness", quantity: 4 },
    CardRank { rank: Rank(5), name: "Knight", quantity: 5 },
    CardRank { rank: Rank(6), name: "Seamstress", quantity: 6 },
    CardRank { rank: Rank(7), name: "Mason", quantity: 7 },
    CardRank { rank: Rank(8), name: "Cook", quantity: 8 },
    CardRank { rank: Rank(9), name: "Miner", quantity: 9 },
    CardRank { rank: Rank(10), name: "Peasant", quantity: 10 },
    CardRank { rank: Rank(11), name: "Jester", quantity: 2 },
];

impl Rank {
    pub const RULER: Rank = Rank(1);
    pub const COMMONER: Rank = Rank(10);
    pub const JOKER: Rank = Rank(11);

    pub const fn from_value(value: u8) -> Option<Self> {
        if value >= 1 && value <= Self::JOKER.0 {
            Some(Rank(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn is_joker(self) -> bool {
        self.0 == Self::JOKER.0
    }

    pub fn info(self) -> &'static CardRank {
        &CATALOG[usize::from(self.0 - 1)]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn quantity(self) -> u8 {
        self.info().quantity
    }

    /// True when `self` beats `other` under the current ordering.
    pub fn beats(self, other: Rank, revolution: bool) -> bool {
        if revolution { self > other } else { self < other }
    }
}

impl TryFrom<u8> for Rank {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::from_value(value).ok_or_else(|| format!("rank {value} is outside 1..=11"))
    }
}

impl From<Rank> for u8 {
    fn from(rank: Rank) -> u8 {
        rank.0
    }
}

/// Title for finishing `place` (1-based) at a table of `seats`. Titles follow
/// the catalog; last place is always the commoner.
pub fn title_for_place(place: u8, seats: usize) -> &'static str {
    if usize::from(place) >= seats {
        return Rank::COMMONER.name();
    }
    Rank::from_value(place)
        .filter(|rank| !rank.is_joker())
        .map(Rank::name)
        .unwrap_or_else(|| Rank::COMMONER.name())
}

/// Total number of cards produced by expanding the catalog.
pub fn deck_size() -> usize {
    CATALOG.iter().map(|entry| usize::from(entry.quantity)).sum()
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            f.write_str("J")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
