//! Recording match results and detecting round / tournament completion.

use crate::logic::placements::compute_placements;
use crate::models::{
    EntrantId, Side, Standings, TournamentError, TournamentRun, TournamentState,
};
use chrono::Utc;
use serde::Serialize;

/// What recording a result did to the round in progress.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// Other matches of the round still need a winner.
    InProgress,
    /// Every match is decided and more than one side is left. The caller opens the next
    /// round from `survivors` with [`crate::logic::build_next_round`].
    RoundComplete { survivors: Vec<Side> },
    /// One side is left. The run is `Finished`.
    Finalized { standings: Standings },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchReport {
    pub round_number: usize,
    /// Position of the match within its round.
    pub match_index: usize,
    pub winner: Side,
    pub outcome: RoundOutcome,
}

/// Record that the side containing `entrant` won its match in the current round.
///
/// The losing side is appended to the elimination order and the winning side to the round's
/// survivors. Once every match of the round is decided the survivors are handed back (and
/// cleared), or the run finishes if only one is left.
pub fn record_winner(
    run: &mut TournamentRun,
    entrant: impl Into<EntrantId>,
) -> Result<MatchReport, TournamentError> {
    if !run.is_active() {
        return Err(TournamentError::NotActive);
    }
    let id = entrant.into();
    let round = run.rounds.last_mut().ok_or(TournamentError::NotActive)?;
    let (match_index, slot) = round
        .matches
        .iter()
        .enumerate()
        .find_map(|(i, m)| m.slot_of(id).map(|slot| (i, slot)))
        .ok_or(TournamentError::SideNotInRound)?;

    let game = &mut round.matches[match_index];
    if game.is_decided() {
        return Err(TournamentError::MatchAlreadyDecided);
    }
    game.winner = Some(slot);
    let winner = game.side(slot).clone();
    let loser = game.side(slot.other()).clone();
    let round_number = round.number;
    let match_count = round.matches.len();

    log::debug!(
        "round {} match {}: {} beat {}",
        round_number,
        match_index + 1,
        winner,
        loser
    );
    run.eliminated.push(loser);
    run.survivors.push(winner.clone());

    let outcome = if run.survivors.len() < match_count {
        RoundOutcome::InProgress
    } else if run.survivors.len() == 1 {
        run.state = TournamentState::Finished;
        let standings = Standings {
            run_id: run.id,
            mode: run.mode(),
            details: run.details.clone(),
            placements: compute_placements(&winner, &run.eliminated),
            completed_at: Utc::now(),
        };
        log::debug!("tournament {} won by {}", run.id, winner);
        RoundOutcome::Finalized { standings }
    } else {
        RoundOutcome::RoundComplete {
            survivors: std::mem::take(&mut run.survivors),
        }
    };

    Ok(MatchReport {
        round_number,
        match_index,
        winner,
        outcome,
    })
}
