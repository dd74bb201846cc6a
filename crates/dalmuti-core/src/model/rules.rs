use crate::model::rank::Rank;
use crate::model::round::RoundState;
use crate::model::trick::group_rank;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalPlay {
    Empty,
    MixedRanks,
    SizeMismatch { expected: usize, actual: usize },
    NotStronger { played: Rank, against: Rank, revolution: bool },
}

impl fmt::Display for IllegalPlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalPlay::Empty => write!(f, "no cards selected"),
            IllegalPlay::MixedRanks => write!(f, "cards must share one rank (jokers excepted)"),
            IllegalPlay::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} cards to match the pile but got {actual}")
            }
            IllegalPlay::NotStronger {
                played,
                against,
                revolution,
            } => {
                let needed = if *revolution { "higher" } else { "lower" };
                write!(f, "rank {played} does not beat {against}; a {needed} rank is required")
            }
        }
    }
}

impl std::error::Error for IllegalPlay {}

/// The parts of a round the validator reads.
#[derive(Debug, Clone, Copy)]
pub struct TrickView<'a> {
    pub last_played: Option<&'a [Rank]>,
    pub everyone_else_passed: bool,
    pub revolution: bool,
}

impl<'a> TrickView<'a> {
    pub fn of(round: &'a RoundState) -> Self {
        Self {
            last_played: round.last_played().map(|play| play.cards.as_slice()),
            everyone_else_passed: round.everyone_else_passed(),
            revolution: round.is_revolution(),
        }
    }
}

pub fn check_play(selected: &[Rank], round: &RoundState) -> Result<(), IllegalPlay> {
    check_against(selected, TrickView::of(round))
}

pub fn is_legal(selected: &[Rank], round: &RoundState) -> bool {
    check_play(selected, round).is_ok()
}

pub fn check_against(selected: &[Rank], view: TrickView<'_>) -> Result<(), IllegalPlay> {
    if selected.is_empty() {
        return Err(IllegalPlay::Empty);
    }

    let played = group_rank(selected);
    if selected
        .iter()
        .any(|card| !card.is_joker() && *card != played)
    {
        return Err(IllegalPlay::MixedRanks);
    }

    if view.everyone_else_passed {
        return Ok(());
    }

    let Some(last) = view.last_played else {
        return Ok(());
    };

    if selected.len() != last.len() {
        return Err(IllegalPlay::SizeMismatch {
            expected: last.len(),
            actual: selected.len(),
        });
    }

    let against = group_rank(last);
    if !played.beats(against, view.revolution) {
        return Err(IllegalPlay::NotStronger {
            played,
            against,
            revolution: view.revolution,
        });
    }

    Ok(())
}
