//! Player, Entrant and the placeholder counter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat platform user id.
pub type PlayerId = u64;

/// A real community member taking part in a tournament.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Identity of an entrant. Placeholders live in their own id space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrantId {
    Player(PlayerId),
    Placeholder(u32),
}

impl From<PlayerId> for EntrantId {
    fn from(id: PlayerId) -> Self {
        EntrantId::Player(id)
    }
}

/// One participant unit: a real player or a synthesized filler used to even out counts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entrant {
    Player(Player),
    Placeholder { seq: u32 },
}

impl Entrant {
    pub fn id(&self) -> EntrantId {
        match self {
            Entrant::Player(p) => EntrantId::Player(p.id),
            Entrant::Placeholder { seq } => EntrantId::Placeholder(*seq),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Entrant::Player(p) => p.name.clone(),
            Entrant::Placeholder { seq } => format!("Bot{seq}"),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Entrant::Placeholder { .. })
    }

    /// The real player behind this entrant, if any.
    pub fn player(&self) -> Option<&Player> {
        match self {
            Entrant::Player(p) => Some(p),
            Entrant::Placeholder { .. } => None,
        }
    }
}

impl PartialEq for Entrant {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Entrant {}

impl From<Player> for Entrant {
    fn from(p: Player) -> Self {
        Entrant::Player(p)
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Hands out placeholder sequence numbers for one tournament run. Never hands out the same
/// number twice until the run is reset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderCounter {
    next: u32,
}

impl Default for PlaceholderCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl PlaceholderCounter {
    pub fn next_placeholder(&mut self) -> Entrant {
        let seq = self.next;
        self.next += 1;
        Entrant::Placeholder { seq }
    }

    /// Sequence number the next placeholder will get.
    pub fn peek(&self) -> u32 {
        self.next
    }
}
