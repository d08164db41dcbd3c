//! Host-facing operations: permission check, engine call, then notifications in order.

use crate::host::{Action, Host};
use crate::logic::advance::{self, MatchReport, RoundOutcome};
use crate::logic::bracket::{build_first_round_with_rng, build_next_round_with_rng};
use crate::logic::placements::awards;
use crate::models::{
    EntrantId, PlayerId, Side, TournamentDetails, TournamentError, TournamentMode,
    TournamentRun, TournamentState,
};
use crate::teams::Teammates;
use rand::Rng;

fn ensure<H: Host + ?Sized>(host: &H, actor: PlayerId, action: Action) -> Result<(), TournamentError> {
    if host.check_permission(actor, action) {
        Ok(())
    } else {
        log::info!("actor {} denied: {}", actor, action);
        Err(TournamentError::PermissionDenied(action))
    }
}

/// Create a fresh run. Replaces whatever the host had for the community.
pub fn configure<H: Host + ?Sized>(
    host: &H,
    actor: PlayerId,
    mode: TournamentMode,
    capacity: usize,
    details: TournamentDetails,
) -> Result<TournamentRun, TournamentError> {
    ensure(host, actor, Action::Configure)?;
    Ok(TournamentRun::with_details(mode, capacity, details))
}

/// Register a player or team. Once the run has started only permitted actors get as far as
/// the (frozen) roster.
pub fn register<H: Host + ?Sized>(
    run: &mut TournamentRun,
    host: &H,
    actor: PlayerId,
    side: Side,
) -> Result<(), TournamentError> {
    if run.state != TournamentState::Registration {
        ensure(host, actor, Action::Register)?;
    }
    run.register(side)?;
    log::info!(
        "registration for {}: {}/{}",
        run.id,
        run.roster.current_count(),
        run.capacity()
    );
    Ok(())
}

pub fn unregister<H: Host + ?Sized>(
    run: &mut TournamentRun,
    host: &H,
    actor: PlayerId,
    side: &Side,
) -> Result<(), TournamentError> {
    if run.state != TournamentState::Registration {
        ensure(host, actor, Action::Unregister)?;
    }
    run.unregister(side)?;
    log::info!(
        "unregistration for {}: {}/{}",
        run.id,
        run.roster.current_count(),
        run.capacity()
    );
    Ok(())
}

pub fn add_fillers<H: Host + ?Sized>(
    run: &mut TournamentRun,
    host: &H,
    actor: PlayerId,
    n: usize,
) -> Result<(), TournamentError> {
    ensure(host, actor, Action::AddFillers)?;
    run.add_fillers(n)
}

/// Build round 1 and publish it.
pub fn start<H, T>(
    run: &mut TournamentRun,
    teammates: &T,
    host: &mut H,
    actor: PlayerId,
) -> Result<(), TournamentError>
where
    H: Host + ?Sized,
    T: Teammates + ?Sized,
{
    start_with_rng(run, teammates, host, actor, &mut rand::thread_rng())
}

pub fn start_with_rng<H, T, R>(
    run: &mut TournamentRun,
    teammates: &T,
    host: &mut H,
    actor: PlayerId,
    rng: &mut R,
) -> Result<(), TournamentError>
where
    H: Host + ?Sized,
    T: Teammates + ?Sized,
    R: Rng + ?Sized,
{
    ensure(host, actor, Action::Start)?;
    let round = build_first_round_with_rng(run, teammates, rng)?;
    host.notify_round_published(round);
    Ok(())
}

/// Record a winner and carry the bracket forward: the next round is opened and published
/// when the round completes; on the final, points are awarded, standings published and the
/// run reset.
pub fn record_winner<H>(
    run: &mut TournamentRun,
    host: &mut H,
    actor: PlayerId,
    entrant: impl Into<EntrantId>,
) -> Result<MatchReport, TournamentError>
where
    H: Host + ?Sized,
{
    record_winner_with_rng(run, host, actor, entrant, &mut rand::thread_rng())
}

pub fn record_winner_with_rng<H, R>(
    run: &mut TournamentRun,
    host: &mut H,
    actor: PlayerId,
    entrant: impl Into<EntrantId>,
    rng: &mut R,
) -> Result<MatchReport, TournamentError>
where
    H: Host + ?Sized,
    R: Rng + ?Sized,
{
    ensure(host, actor, Action::RecordWinner)?;
    let report = advance::record_winner(run, entrant)?;

    if let Some(round) = run.rounds.get(report.round_number - 1) {
        host.notify_match_decided(round, report.match_index, &report.winner);
    }

    match &report.outcome {
        RoundOutcome::InProgress => {}
        RoundOutcome::RoundComplete { survivors } => {
            let round = build_next_round_with_rng(run, survivors.clone(), rng)?;
            host.notify_round_published(round);
        }
        RoundOutcome::Finalized { standings } => {
            for (player, points) in awards(&standings.placements) {
                host.award_points(player, points);
            }
            host.notify_tournament_finalized(standings);
            log::info!("tournament {} finished", standings.run_id);
            run.reset();
        }
    }
    Ok(report)
}

/// Throw away the current run, keeping its configuration.
pub fn cancel<H: Host + ?Sized>(
    run: &mut TournamentRun,
    host: &H,
    actor: PlayerId,
) -> Result<(), TournamentError> {
    ensure(host, actor, Action::Cancel)?;
    log::info!("tournament {} cancelled by {}", run.id, actor);
    run.reset();
    Ok(())
}
