use crate::error::{Result, TshError};
use crate::model::{PlayerRoundRecord, SlotKey};
use std::collections::HashMap;

/// Round and player bounds found in a ledger, both 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub rounds: u32,
    pub players: u32,
}

/// Per-round, per-player records accumulated while reading one report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: HashMap<SlotKey, PlayerRoundRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the record for a slot, creating it with `name` if absent
    pub fn slot_mut(&mut self, key: SlotKey, name: &str) -> &mut PlayerRoundRecord {
        self.records
            .entry(key)
            .or_insert_with(|| PlayerRoundRecord::new(name, key))
    }

    pub fn insert(&mut self, record: PlayerRoundRecord) {
        self.records.insert(record.key(), record);
    }

    pub fn get(&self, key: SlotKey) -> Result<&PlayerRoundRecord> {
        self.records.get(&key).ok_or(TshError::MissingSlot {
            round: key.round,
            player: key.player,
        })
    }

    /// Scan every key for the highest round and player present
    pub fn dimensions(&self) -> Result<Dimensions> {
        let mut dims = Dimensions::default();

        for key in self.records.keys() {
            if !key.is_valid() {
                return Err(TshError::InvalidSlot {
                    round: key.round,
                    player: key.player,
                });
            }
            dims.rounds = dims.rounds.max(key.round);
            dims.players = dims.players.max(key.player);
        }

        Ok(dims)
    }
}
