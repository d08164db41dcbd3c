//! TournamentRun and TournamentState.

use crate::host::Action;
use crate::models::game::{Round, Side};
use crate::models::player::PlaceholderCounter;
use crate::models::roster::{Roster, TournamentMode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Most fillers a single `add_fillers` call may add.
pub const MAX_FILLERS_PER_CALL: usize = 16;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A member of the side is already on the roster.
    AlreadyRegistered,
    /// No member of the side is on the roster.
    NotRegistered,
    /// Adding the side would exceed capacity.
    Full,
    /// A single player in a 2v2 run, or a pair in a 1v1 run.
    SideMismatch(TournamentMode),
    /// The tournament has not been started.
    NotActive,
    /// The tournament is already running; the roster is frozen.
    AlreadyActive,
    /// Nobody on the winning side plays in the current round.
    SideNotInRound,
    /// That match already has a winner.
    MatchAlreadyDecided,
    /// Starting needs at least one entrant.
    InsufficientEntrants,
    /// Fillers must be added 1 to 16 at a time.
    InvalidFillerCount(usize),
    /// The host refused the action for this actor.
    PermissionDenied(Action),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::AlreadyRegistered => write!(f, "Already registered"),
            TournamentError::NotRegistered => write!(f, "Not registered"),
            TournamentError::Full => write!(f, "Tournament is full"),
            TournamentError::SideMismatch(TournamentMode::Team) => {
                write!(f, "2v2 tournaments are entered as a team of two")
            }
            TournamentError::SideMismatch(TournamentMode::Solo) => {
                write!(f, "1v1 tournaments are entered by single players")
            }
            TournamentError::NotActive => write!(f, "No active tournament"),
            TournamentError::AlreadyActive => write!(f, "Tournament already started"),
            TournamentError::SideNotInRound => {
                write!(f, "This player/team is not in the current round")
            }
            TournamentError::MatchAlreadyDecided => write!(f, "This match already has a winner"),
            TournamentError::InsufficientEntrants => {
                write!(f, "Not enough entrants to start tournament (minimum 1)")
            }
            TournamentError::InvalidFillerCount(n) => {
                write!(f, "Number of fillers must be between 1 and {MAX_FILLERS_PER_CALL} (got {n})")
            }
            TournamentError::PermissionDenied(action) => {
                write!(f, "You don't have permission to {action}")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

impl TournamentError {
    /// The refused action, when the host denied permission.
    pub fn denied_action(&self) -> Option<Action> {
        match self {
            TournamentError::PermissionDenied(action) => Some(*action),
            _ => None,
        }
    }
}

/// Unique identifier for a tournament run.
pub type RunId = Uuid;

/// Current phase of the run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Accepting registrations; not started.
    #[default]
    Registration,
    /// Bracket built; roster frozen; results being recorded.
    Active,
    /// A single side remains. Standings were produced; waiting for reset.
    Finished,
}

/// Display details shown when announcing the tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub abilities: String,
    #[serde(default)]
    pub prize: String,
}

/// Full state of one tournament run: roster, rounds, eliminations and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentRun {
    pub id: RunId,
    pub details: TournamentDetails,
    pub roster: Roster,
    /// Append-only; the last one is the round in progress.
    pub rounds: Vec<Round>,
    /// Winners recorded in the round in progress.
    pub survivors: Vec<Side>,
    /// Losing sides, oldest first.
    pub eliminated: Vec<Side>,
    pub state: TournamentState,
    pub placeholders: PlaceholderCounter,
}

impl TournamentRun {
    /// Create a new run in Registration state with an empty roster.
    pub fn new(mode: TournamentMode, capacity: usize) -> Self {
        Self::with_details(mode, capacity, TournamentDetails::default())
    }

    pub fn with_details(mode: TournamentMode, capacity: usize, details: TournamentDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            details,
            roster: Roster::new(mode, capacity),
            rounds: Vec::new(),
            survivors: Vec::new(),
            eliminated: Vec::new(),
            state: TournamentState::Registration,
            placeholders: PlaceholderCounter::default(),
        }
    }

    pub fn mode(&self) -> TournamentMode {
        self.roster.mode
    }

    pub fn capacity(&self) -> usize {
        self.roster.capacity
    }

    pub fn is_active(&self) -> bool {
        self.state == TournamentState::Active
    }

    /// The round in progress (or the final round once finished).
    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Register a player or team (only valid before start).
    pub fn register(&mut self, side: Side) -> Result<(), TournamentError> {
        self.ensure_registration()?;
        self.roster.register(side)
    }

    /// Remove a player or team (only valid before start).
    pub fn unregister(&mut self, side: &Side) -> Result<(), TournamentError> {
        self.ensure_registration()?;
        self.roster.unregister(side)
    }

    /// Add 1..=16 filler units before start. Fillers take real roster spots.
    pub fn add_fillers(&mut self, n: usize) -> Result<(), TournamentError> {
        self.ensure_registration()?;
        if n == 0 || n > MAX_FILLERS_PER_CALL {
            return Err(TournamentError::InvalidFillerCount(n));
        }
        if n > self.roster.available() {
            return Err(TournamentError::Full);
        }
        self.roster.add_placeholders(n, &mut self.placeholders);
        Ok(())
    }

    /// Back to an empty roster in Registration state. Mode, capacity and details are kept;
    /// the run gets a new id and the placeholder counter starts over.
    pub fn reset(&mut self) {
        let details = std::mem::take(&mut self.details);
        *self = Self::with_details(self.mode(), self.capacity(), details);
    }

    fn ensure_registration(&self) -> Result<(), TournamentError> {
        match self.state {
            TournamentState::Registration => Ok(()),
            TournamentState::Active | TournamentState::Finished => Err(TournamentError::AlreadyActive),
        }
    }
}
