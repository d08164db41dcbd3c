//! Side, GameMatch and Round for 1v1 / 2v2 brackets.

use crate::models::player::{Entrant, EntrantId, Player, PlaceholderCounter};
use crate::models::roster::TournamentMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// What occupies one half of a match: one entrant (1v1, or a lone 2v2 entrant) or an
/// ordered pair of teammates.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Single(Entrant),
    Pair(Entrant, Entrant),
}

impl Side {
    /// A fresh placeholder unit for the given mode: one filler in 1v1, a filler team in 2v2.
    pub fn placeholder(mode: TournamentMode, counter: &mut PlaceholderCounter) -> Self {
        match mode {
            TournamentMode::Solo => Side::Single(counter.next_placeholder()),
            TournamentMode::Team => {
                let first = counter.next_placeholder();
                let second = counter.next_placeholder();
                Side::Pair(first, second)
            }
        }
    }

    /// Members in left-to-right order.
    pub fn members(&self) -> Vec<&Entrant> {
        match self {
            Side::Single(e) => vec![e],
            Side::Pair(a, b) => vec![a, b],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Side::Single(_) => 1,
            Side::Pair(..) => 2,
        }
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.members().iter().any(|e| e.id() == id)
    }

    /// True when every member is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.members().iter().all(|e| e.is_placeholder())
    }

    /// Real players on this side; placeholders are skipped.
    pub fn players(&self) -> Vec<&Player> {
        self.members().into_iter().filter_map(Entrant::player).collect()
    }
}

impl From<Player> for Side {
    fn from(p: Player) -> Self {
        Side::Single(Entrant::Player(p))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Single(e) => write!(f, "{e}"),
            Side::Pair(a, b) => write!(f, "{a} & {b}"),
        }
    }
}

/// Which side of a match won.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

/// A single head-to-head match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub side_1: Side,
    pub side_2: Side,
    /// None if not yet played.
    pub winner: Option<Slot>,
}

impl GameMatch {
    pub fn new(side_1: Side, side_2: Side) -> Self {
        Self {
            id: Uuid::new_v4(),
            side_1,
            side_2,
            winner: None,
        }
    }

    pub fn side(&self, slot: Slot) -> &Side {
        match slot {
            Slot::One => &self.side_1,
            Slot::Two => &self.side_2,
        }
    }

    /// Slot of the side containing `id`, if it plays in this match.
    pub fn slot_of(&self, id: EntrantId) -> Option<Slot> {
        if self.side_1.contains(id) {
            Some(Slot::One)
        } else if self.side_2.contains(id) {
            Some(Slot::Two)
        } else {
            None
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// One layer of simultaneous matches. `number` is 1-based.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: usize,
    pub matches: Vec<GameMatch>,
}

impl Round {
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(GameMatch::is_decided)
    }

    /// Index of the match a given entrant plays in.
    pub fn match_index_of(&self, id: EntrantId) -> Option<usize> {
        self.matches.iter().position(|m| m.slot_of(id).is_some())
    }
}
