use crate::error::{Result, TshError};
use std::fmt;

/// Which side of a game a player was on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Moved first (flag 1)
    First,
    /// Replied (flag 2)
    Reply,
}

impl Side {
    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag {
            1 => Some(Side::First),
            2 => Some(Side::Reply),
            _ => None,
        }
    }
}

/// Composite ledger key: one player in one round, both 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub round: u32,
    pub player: u32,
}

impl SlotKey {
    pub fn new(round: u32, player: u32) -> Self {
        Self { round, player }
    }

    pub fn is_valid(&self) -> bool {
        self.round >= 1 && self.player >= 1
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.round, self.player)
    }
}

/// One player's participation in one round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerRoundRecord {
    /// Display name, "First Last" order
    pub name: String,
    /// Player id (line position in the report)
    pub player: u32,
    pub round: u32,
    /// Raw opponent reference; zero or non-numeric means a bye
    pub opponent: String,
    pub score: i32,
    pub board: u32,
    /// Start flag as written in the report (1 = moved first, 2 = replied)
    pub start: u32,
}

impl PlayerRoundRecord {
    pub fn new(name: &str, key: SlotKey) -> Self {
        Self {
            name: name.to_string(),
            player: key.player,
            round: key.round,
            ..Default::default()
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.round, self.player)
    }

    /// Opponent player id, or `None` for a bye.
    ///
    /// Empty, non-numeric and all-zero references are byes. A numeric
    /// reference too large for a player id is an error.
    pub fn opponent_id(&self) -> Result<Option<u32>> {
        let opponent = self.opponent.trim();
        if opponent.is_empty() || !opponent.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }

        let digits = opponent.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(None);
        }

        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| TshError::UnknownOpponent {
                round: self.round,
                player: self.player,
                opponent: opponent.to_string(),
            })
    }

    pub fn is_bye(&self) -> bool {
        matches!(self.opponent_id(), Ok(None))
    }

    pub fn side(&self) -> Option<Side> {
        Side::from_flag(self.start)
    }
}
