//! Tournament business logic: bracket building, result recording, placements.

mod advance;
mod bracket;
mod placements;
pub mod session;

pub use advance::{record_winner, MatchReport, RoundOutcome};
pub use bracket::{
    build_first_round, build_first_round_with_rng, build_next_round, build_next_round_with_rng,
    group_units, pair_units,
};
pub use placements::{awards, compute_placements, PLACE_POINTS};
