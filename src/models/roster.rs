//! Roster: confirmed entrants of one tournament run.

use crate::models::game::Side;
use crate::models::player::{Entrant, EntrantId, PlaceholderCounter};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 1v1 (one player per side) or 2v2 (one team per side).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TournamentMode {
    #[default]
    #[serde(rename = "1v1")]
    Solo,
    #[serde(rename = "2v2")]
    Team,
}

impl fmt::Display for TournamentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentMode::Solo => write!(f, "1v1"),
            TournamentMode::Team => write!(f, "2v2"),
        }
    }
}

impl FromStr for TournamentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1v1" | "solo" => Ok(TournamentMode::Solo),
            "2v2" | "team" => Ok(TournamentMode::Team),
            other => Err(format!("unknown mode '{other}', expected 1v1 or 2v2")),
        }
    }
}

/// Entrants in registration order. In 2v2 the two members of a team are always adjacent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub mode: TournamentMode,
    /// Teams in 2v2, individuals in 1v1.
    pub capacity: usize,
    pub entrants: Vec<Entrant>,
}

impl Roster {
    pub fn new(mode: TournamentMode, capacity: usize) -> Self {
        Self {
            mode,
            capacity,
            entrants: Vec::new(),
        }
    }

    /// Individuals in 1v1, teams (entrants / 2) in 2v2.
    pub fn current_count(&self) -> usize {
        Self::count_for(self.mode, self.entrants.len())
    }

    /// Units still available before the roster is full.
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.current_count())
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.entrants.iter().any(|e| e.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn register(&mut self, side: Side) -> Result<(), TournamentError> {
        if side.len() != Self::side_len(self.mode) {
            return Err(TournamentError::SideMismatch(self.mode));
        }
        if side.members().iter().any(|e| self.contains(e.id())) {
            return Err(TournamentError::AlreadyRegistered);
        }
        let after = Self::count_for(self.mode, self.entrants.len() + side.len());
        if after > self.capacity {
            return Err(TournamentError::Full);
        }
        match side {
            Side::Single(e) => self.entrants.push(e),
            Side::Pair(a, b) => {
                self.entrants.push(a);
                self.entrants.push(b);
            }
        }
        Ok(())
    }

    /// Remove the registered unit of every member of `side` that is present. In 2v2 that
    /// is the whole team a member was entered with, even if `side` names only one of them.
    pub fn unregister(&mut self, side: &Side) -> Result<(), TournamentError> {
        let unit = Self::side_len(self.mode);
        let mut removed = false;
        while let Some(idx) = self.entrants.iter().position(|e| side.contains(e.id())) {
            let start = idx - idx % unit;
            let end = (start + unit).min(self.entrants.len());
            self.entrants.drain(start..end);
            removed = true;
        }
        if removed {
            Ok(())
        } else {
            Err(TournamentError::NotRegistered)
        }
    }

    /// Append `n` placeholder units (fillers in 1v1, filler teams in 2v2). Capacity is
    /// not checked here.
    pub fn add_placeholders(&mut self, n: usize, counter: &mut PlaceholderCounter) {
        for _ in 0..n {
            match Side::placeholder(self.mode, counter) {
                Side::Single(e) => self.entrants.push(e),
                Side::Pair(a, b) => {
                    self.entrants.push(a);
                    self.entrants.push(b);
                }
            }
        }
    }

    /// Entrants per registered unit.
    fn side_len(mode: TournamentMode) -> usize {
        match mode {
            TournamentMode::Solo => 1,
            TournamentMode::Team => 2,
        }
    }

    fn count_for(mode: TournamentMode, entrants: usize) -> usize {
        match mode {
            TournamentMode::Solo => entrants,
            TournamentMode::Team => entrants / 2,
        }
    }
}
