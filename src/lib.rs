//! Single-elimination 1v1 / 2v2 tournament brackets for chat communities: library with
//! models, bracket logic and the host collaborator seam.

pub mod host;
pub mod ledger;
pub mod logic;
pub mod models;
pub mod registry;
pub mod teams;

pub use host::{Action, Host};
pub use ledger::{LedgerError, LedgerRow, PointsLedger};
pub use logic::{
    awards, build_first_round, build_first_round_with_rng, build_next_round,
    build_next_round_with_rng, compute_placements, group_units, pair_units, record_winner,
    session, MatchReport, RoundOutcome, PLACE_POINTS,
};
pub use models::{
    Entrant, EntrantId, GameMatch, MatchId, PlaceholderCounter, Placement, Player, PlayerId,
    Roster, Round, RunId, Side, Slot, Standings, TournamentDetails, TournamentError,
    TournamentMode, TournamentRun, TournamentState, MAX_FILLERS_PER_CALL,
};
pub use registry::{Community, CommunityId, Registry};
pub use teams::{Invitation, Team, TeamError, TeamId, TeamRegistry, Teammates};
