//! Collaborator seam between the bracket engine and the application hosting it.
//!
//! The engine never does I/O. Announcing rounds, keeping the points ledger and deciding who
//! may run a tournament are the host's job.

use crate::models::{Player, PlayerId, Round, Side, Standings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something an actor asks the engine to do.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Configure,
    Register,
    Unregister,
    AddFillers,
    Start,
    RecordWinner,
    Cancel,
    /// Adjust or reset the points ledger.
    ManagePoints,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Configure => "configure tournaments",
            Action::Register => "register entrants",
            Action::Unregister => "unregister entrants",
            Action::AddFillers => "add fake players",
            Action::Start => "start tournaments",
            Action::RecordWinner => "set winners",
            Action::Cancel => "cancel tournaments",
            Action::ManagePoints => "manage points",
        };
        write!(f, "{s}")
    }
}

/// The application the engine is invoked from.
pub trait Host {
    /// A new round was opened; `round.number` is 1-based.
    fn notify_round_published(&mut self, round: &Round);

    fn notify_match_decided(&mut self, round: &Round, match_index: usize, winner: &Side);

    fn notify_tournament_finalized(&mut self, standings: &Standings);

    /// Called once per real member per placement.
    fn award_points(&mut self, player: &Player, amount: u32);

    fn check_permission(&self, actor: PlayerId, action: Action) -> bool;
}
