//! Final placements of a finished run.

use crate::models::game::Side;
use crate::models::roster::TournamentMode;
use crate::models::tournament::{RunId, TournamentDetails};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One placed side and the points each of its real members earns.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// 1 to 4.
    pub place: u8,
    pub side: Side,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    pub run_id: RunId,
    pub mode: TournamentMode,
    pub details: TournamentDetails,
    pub placements: Vec<Placement>,
    pub completed_at: DateTime<Utc>,
}

impl Standings {
    pub fn winner(&self) -> Option<&Side> {
        self.placements.first().map(|p| &p.side)
    }
}
