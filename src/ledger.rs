//! Points ledger for one community: tournament awards plus staff adjustments.

use crate::models::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LedgerError {
    /// Adjustments must be non-zero.
    ZeroAmount,
    /// Removing more points than the player has.
    InsufficientPoints { available: u32 },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::ZeroAmount => write!(f, "Amount must not be zero"),
            LedgerError::InsufficientPoints { available } => {
                write!(f, "Player only has {available} points")
            }
        }
    }
}

impl std::error::Error for LedgerError {}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub player_id: PlayerId,
    pub name: String,
    pub points: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PointsLedger {
    rows: HashMap<PlayerId, LedgerRow>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total for a player. Players never seen have 0.
    pub fn points_of(&self, id: PlayerId) -> u32 {
        self.rows.get(&id).map_or(0, |row| row.points)
    }

    pub fn row(&self, id: PlayerId) -> Option<&LedgerRow> {
        self.rows.get(&id)
    }

    /// Add points, refreshing the stored display name.
    pub fn award(&mut self, player: &Player, amount: u32) -> u32 {
        let row = self.row_mut(player);
        row.points = row.points.saturating_add(amount);
        row.points
    }

    /// Staff adjustment. Positive adds, negative removes; removal may not go below 0.
    /// Returns the new total.
    pub fn adjust(&mut self, player: &Player, delta: i64) -> Result<u32, LedgerError> {
        if delta == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let amount = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
        if delta > 0 {
            return Ok(self.award(player, amount));
        }
        let available = self.points_of(player.id);
        if amount > available {
            return Err(LedgerError::InsufficientPoints { available });
        }
        let row = self.row_mut(player);
        row.points -= amount;
        log::debug!("removed {} points from {}", amount, player.name);
        Ok(row.points)
    }

    /// Highest points first; ties by name.
    pub fn leaderboard(&self) -> Vec<LedgerRow> {
        let mut rows: Vec<_> = self.rows.values().cloned().collect();
        rows.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    /// Leaderboard as CSV with a `player_id,name,points` header.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in self.leaderboard() {
            writer.serialize(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row_mut(&mut self, player: &Player) -> &mut LedgerRow {
        let row = self.rows.entry(player.id).or_insert_with(|| LedgerRow {
            player_id: player.id,
            name: player.name.clone(),
            points: 0,
        });
        if !player.name.is_empty() {
            row.name = player.name.clone();
        }
        row
    }
}
