//! Data structures for brackets: entrants, sides, matches, rosters and runs.

mod game;
mod player;
mod roster;
mod standings;
mod tournament;

pub use game::{GameMatch, MatchId, Round, Side, Slot};
pub use player::{Entrant, EntrantId, PlaceholderCounter, Player, PlayerId};
pub use roster::{Roster, TournamentMode};
pub use standings::{Placement, Standings};
pub use tournament::{
    RunId, TournamentDetails, TournamentError, TournamentRun, TournamentState,
    MAX_FILLERS_PER_CALL,
};
