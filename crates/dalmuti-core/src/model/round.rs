use crate::model::deck::{Deck, SetupError, check_player_count};
use crate::model::history::{TurnAction, TurnRecord};
use crate::model::player::{Player, PlayerId};
use crate::model::rank::Rank;
use crate::model::rules::{self, IllegalPlay};
use crate::model::tax::{TaxSummary, apply_tax};
use crate::model::trick::{Play, is_revolution_pair};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct RoundState {
    players: Vec<Player>,
    current: usize,
    last_played: Option<Play>,
    passed: BTreeSet<usize>,
    last_player: Option<usize>,
    finished: Vec<FinishedPlayer>,
    revolution: bool,
    phase: RoundPhase,
    tax: Option<TaxSummary>,
    history: Vec<TurnRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingPlay,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinishedPlayer {
    pub player: PlayerId,
    pub rank: u8,
}

impl RoundState {
    /// Deals `deck` to `players`, applies the tax exchange and seats the
    /// holder of rank 1 as the first to play.
    pub fn deal(deck: &Deck, players: Vec<Player>) -> Result<Self, SetupError> {
        check_player_count(players.len())?;
        let mut hands = deck.deal(players.len())?;
        let tax = apply_tax(&mut hands);

        let starting = hands
            .iter()
            .position(|hand| hand.contains(Rank::RULER))
            .unwrap_or(0);

        let players = players
            .into_iter()
            .zip(hands)
            .map(|(player, hand)| player.with_hand(hand))
            .collect();

        let mut round = Self::from_hands(players, starting);
        round.tax = tax;
        Ok(round)
    }

    /// Builds a round from players that already hold their cards. No dealing
    /// or tax exchange takes place.
    pub fn from_hands(players: Vec<Player>, starting: usize) -> Self {
        Self {
            players,
            current: starting,
            last_played: None,
            passed: BTreeSet::new(),
            last_player: None,
            finished: Vec::new(),
            revolution: false,
            phase: RoundPhase::AwaitingPlay,
            tax: None,
            history: Vec::new(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn current_player_index(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn last_played(&self) -> Option<&Play> {
        self.last_played.as_ref()
    }

    pub fn passed_players(&self) -> &BTreeSet<usize> {
        &self.passed
    }

    pub fn last_player_who_played(&self) -> Option<usize> {
        self.last_player
    }

    pub fn finished_players(&self) -> &[FinishedPlayer] {
        &self.finished
    }

    pub fn is_revolution(&self) -> bool {
        self.revolution
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RoundPhase::Finished)
    }

    pub fn tax_summary(&self) -> Option<&TaxSummary> {
        self.tax.as_ref()
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Number of accepted actions so far.
    pub fn turn_number(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn unfinished_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_finished()).count()
    }

    pub fn cards_in_hands(&self) -> usize {
        self.players.iter().map(|p| p.hand().len()).sum()
    }

    /// True when every player still in the round, other than whoever made the
    /// last play, has passed since that play.
    pub fn everyone_else_passed(&self) -> bool {
        let unfinished = self.unfinished_count();
        let required = match self.last_player {
            Some(idx) if self.players[idx].is_finished() => unfinished,
            _ => unfinished.saturating_sub(1),
        };
        required > 0 && self.passed.len() >= required
    }

    /// Resolves hand positions for the active player, validates and applies.
    pub fn play_turn(&mut self, indices: &[usize]) -> Result<TurnOutcome, PlayError> {
        if self.is_finished() {
            return Err(PlayError::RoundFinished);
        }

        let seat = self.current;
        let selection = self.resolve_selection(seat, indices)?;
        rules::check_play(&selection, self).map_err(PlayError::Illegal)?;

        let player = &mut self.players[seat];
        let cards = player.hand_mut().remove_indices(indices);
        debug_assert_eq!(cards, selection);

        let mut went_out = None;
        if player.hand().is_empty() && !player.is_finished() {
            let rank = self.finished.len() as u8 + 1;
            player.set_finish_rank(rank);
            self.finished.push(FinishedPlayer {
                player: PlayerId(seat),
                rank,
            });
            went_out = Some(rank);
        }

        let revolution_toggled = is_revolution_pair(&cards);
        if revolution_toggled {
            self.revolution = !self.revolution;
        }

        self.last_played = Some(Play {
            player: PlayerId(seat),
            cards: cards.clone(),
        });
        self.last_player = Some(seat);
        self.passed.clear();

        if self.finished.len() + 1 == self.players.len() {
            self.finish_round();
        } else {
            self.advance();
        }

        self.record(seat, TurnAction::Play(cards.clone()), false);

        Ok(TurnOutcome {
            player: PlayerId(seat),
            cards,
            revolution_toggled,
            finished_rank: went_out,
            round_finished: self.is_finished(),
            next: (!self.is_finished()).then_some(PlayerId(self.current)),
        })
    }

    /// The active player passes. Closes the trick once everyone else has.
    pub fn pass_turn(&mut self) -> Result<PassOutcome, PlayError> {
        if self.is_finished() {
            return Err(PlayError::RoundFinished);
        }

        let seat = self.current;
        self.passed.insert(seat);

        let outcome = if self.everyone_else_passed() {
            self.last_played = None;
            self.passed.clear();
            match self.last_player {
                Some(idx) if !self.players[idx].is_finished() => self.current = idx,
                Some(idx) => self.current = self.next_unfinished_after(idx),
                None => self.advance(),
            }
            PassOutcome::TrickClosed {
                leader: PlayerId(self.current),
            }
        } else {
            self.advance();
            PassOutcome::Passed {
                next: PlayerId(self.current),
            }
        };

        let closed = matches!(outcome, PassOutcome::TrickClosed { .. });
        self.record(seat, TurnAction::Pass, closed);
        Ok(outcome)
    }

    fn resolve_selection(&self, seat: usize, indices: &[usize]) -> Result<Vec<Rank>, PlayError> {
        let hand = self.players[seat].hand();
        let mut seen = BTreeSet::new();
        for &index in indices {
            if index >= hand.len() {
                return Err(PlayError::InvalidIndex {
                    index,
                    hand_size: hand.len(),
                });
            }
            if !seen.insert(index) {
                return Err(PlayError::DuplicateIndex(index));
            }
        }
        let mut selection: Vec<Rank> = indices.iter().map(|&idx| hand.cards()[idx]).collect();
        selection.sort();
        Ok(selection)
    }

    fn finish_round(&mut self) {
        let total = self.players.len() as u8;
        if let Some(idx) = self.players.iter().position(|p| !p.is_finished()) {
            self.players[idx].set_finish_rank(total);
            self.finished.push(FinishedPlayer {
                player: PlayerId(idx),
                rank: total,
            });
        }
        self.phase = RoundPhase::Finished;
    }

    fn advance(&mut self) {
        self.current = self.next_unfinished_after(self.current);
    }

    fn next_unfinished_after(&self, index: usize) -> usize {
        let count = self.players.len();
        (1..=count)
            .map(|step| (index + step) % count)
            .find(|&idx| !self.players[idx].is_finished())
            .unwrap_or(index)
    }

    fn record(&mut self, seat: usize, action: TurnAction, trick_closed: bool) {
        let turn = self.turn_number() + 1;
        self.history.push(TurnRecord {
            turn,
            player: PlayerId(seat),
            action,
            revolution: self.revolution,
            trick_closed,
            cards_left: self.players[seat].hand().len(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub player: PlayerId,
    pub cards: Vec<Rank>,
    pub revolution_toggled: bool,
    /// Finishing place if this play emptied the hand.
    pub finished_rank: Option<u8>,
    pub round_finished: bool,
    pub next: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Passed { next: PlayerId },
    TrickClosed { leader: PlayerId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    InvalidIndex { index: usize, hand_size: usize },
    DuplicateIndex(usize),
    Illegal(IllegalPlay),
    RoundFinished,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::InvalidIndex { index, hand_size } => {
                write!(f, "card index {index} is out of range for a hand of {hand_size}")
            }
            PlayError::DuplicateIndex(index) => write!(f, "card index {index} selected twice"),
            PlayError::Illegal(reason) => write!(f, "illegal play: {reason}"),
            PlayError::RoundFinished => write!(f, "the round has already finished"),
        }
    }
}

impl std::error::Error for PlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlayError::Illegal(reason) => Some(reason),
            _ => None,
        }
    }
}
