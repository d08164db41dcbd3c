//! Bracket construction: group the roster into units, pad odd counts with fillers, shuffle
//! and pair.

use crate::models::{
    Entrant, EntrantId, GameMatch, PlaceholderCounter, Roster, Round, Side, TournamentError,
    TournamentMode, TournamentRun, TournamentState,
};
use crate::teams::Teammates;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Open round 1 and mark the run active.
///
/// 1. Group the roster into units (players in 1v1; teams in 2v2, see [`group_units`]).
/// 2. Pad with filler units until the unit count is even.
/// 3. Shuffle units and pair neighbours: (0, 1), (2, 3), ...
pub fn build_first_round<'a, T>(
    run: &'a mut TournamentRun,
    teammates: &T,
) -> Result<&'a Round, TournamentError>
where
    T: Teammates + ?Sized,
{
    build_first_round_with_rng(run, teammates, &mut rand::thread_rng())
}

pub fn build_first_round_with_rng<'a, T, R>(
    run: &'a mut TournamentRun,
    teammates: &T,
    rng: &mut R,
) -> Result<&'a Round, TournamentError>
where
    T: Teammates + ?Sized,
    R: Rng + ?Sized,
{
    if run.state != TournamentState::Registration {
        return Err(TournamentError::AlreadyActive);
    }
    let units = group_units(&run.roster, teammates);
    if units.is_empty() {
        return Err(TournamentError::InsufficientEntrants);
    }
    log::debug!(
        "starting {} tournament {} with {} unit(s)",
        run.mode(),
        run.id,
        units.len()
    );

    let mode = run.mode();
    let matches = pair_units(units, mode, &mut run.placeholders, rng);
    run.state = TournamentState::Active;
    run.survivors.clear();
    run.eliminated.clear();
    run.rounds.clear();
    Ok(push_round(run, matches))
}

/// Open the next round from the winners of a completed round.
pub fn build_next_round(
    run: &mut TournamentRun,
    survivors: Vec<Side>,
) -> Result<&Round, TournamentError> {
    build_next_round_with_rng(run, survivors, &mut rand::thread_rng())
}

pub fn build_next_round_with_rng<'a, R>(
    run: &'a mut TournamentRun,
    survivors: Vec<Side>,
    rng: &mut R,
) -> Result<&'a Round, TournamentError>
where
    R: Rng + ?Sized,
{
    if !run.is_active() {
        return Err(TournamentError::NotActive);
    }
    if survivors.is_empty() {
        return Err(TournamentError::InsufficientEntrants);
    }
    let mode = run.mode();
    let matches = pair_units(survivors, mode, &mut run.placeholders, rng);
    Ok(push_round(run, matches))
}

/// Split the roster into bracket units.
///
/// In 2v2 a player whose registered teammate is also on the roster is paired with them;
/// a player without a teammate on the roster (the team was dissolved after registering)
/// stays a lone unit of one. Roster fillers are paired in registration order.
pub fn group_units<T>(roster: &Roster, teammates: &T) -> Vec<Side>
where
    T: Teammates + ?Sized,
{
    if roster.mode == TournamentMode::Solo {
        return roster.entrants.iter().cloned().map(Side::Single).collect();
    }

    let mut units = Vec::new();
    let mut grouped: HashSet<EntrantId> = HashSet::new();
    let mut fillers: Vec<Entrant> = Vec::new();

    for entrant in &roster.entrants {
        if grouped.contains(&entrant.id()) {
            continue;
        }
        let player = match entrant {
            Entrant::Player(p) => p,
            Entrant::Placeholder { .. } => {
                fillers.push(entrant.clone());
                continue;
            }
        };
        grouped.insert(entrant.id());

        let mate = teammates
            .teammate_of(player.id)
            .map(|m| EntrantId::Player(m.id))
            .filter(|id| !grouped.contains(id))
            .and_then(|id| roster.entrants.iter().find(|e| e.id() == id));
        match mate {
            Some(mate) => {
                grouped.insert(mate.id());
                units.push(Side::Pair(entrant.clone(), mate.clone()));
            }
            None => units.push(Side::Single(entrant.clone())),
        }
    }

    let mut fillers = fillers.into_iter();
    while let Some(first) = fillers.next() {
        units.push(match fillers.next() {
            Some(second) => Side::Pair(first, second),
            None => Side::Single(first),
        });
    }
    units
}

/// Pad to an even unit count, shuffle, and pair neighbours into matches.
pub fn pair_units<R>(
    mut units: Vec<Side>,
    mode: TournamentMode,
    counter: &mut PlaceholderCounter,
    rng: &mut R,
) -> Vec<GameMatch>
where
    R: Rng + ?Sized,
{
    while units.len() % 2 != 0 {
        units.push(Side::placeholder(mode, counter));
    }
    units.shuffle(rng);

    let mut matches = Vec::with_capacity(units.len() / 2);
    let mut units = units.into_iter();
    while let (Some(side_1), Some(side_2)) = (units.next(), units.next()) {
        matches.push(GameMatch::new(side_1, side_2));
    }
    matches
}

fn push_round(run: &mut TournamentRun, matches: Vec<GameMatch>) -> &Round {
    let number = run.rounds.len() + 1;
    log::debug!("round {} opened with {} match(es)", number, matches.len());
    run.rounds.push(Round { number, matches });
    &run.rounds[number - 1]
}
