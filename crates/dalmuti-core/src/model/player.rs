use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable seat identity; equal to the player's index for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    Human,
    Computer,
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Hand,
    controller: Controller,
    finish_rank: Option<u8>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, controller: Controller) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::new(),
            controller,
            finish_rank: None,
        }
    }

    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = hand;
        self
    }

    /// Human seat 0 followed by computer seats.
    pub fn roster(player_count: usize) -> Vec<Player> {
        (0..player_count)
            .map(|idx| {
                if idx == 0 {
                    Player::new(PlayerId(idx), "You", Controller::Human)
                } else {
                    Player::new(PlayerId(idx), format!("Computer {idx}"), Controller::Computer)
                }
            })
            .collect()
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn controller(&self) -> Controller {
        self.controller
    }

    pub fn is_computer(&self) -> bool {
        self.controller == Controller::Computer
    }

    pub fn finish_rank(&self) -> Option<u8> {
        self.finish_rank
    }

    pub fn is_finished(&self) -> bool {
        self.finish_rank.is_some()
    }

    pub(crate) fn set_finish_rank(&mut self, rank: u8) {
        debug_assert!(self.finish_rank.is_none(), "finish rank is assigned once");
        self.finish_rank = Some(rank);
    }
}
