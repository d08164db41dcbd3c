//! Integration tests for host-driven tournament flows.

mod common;

use bracket_bot::{
    session, Action, EntrantId, Registry, RoundOutcome, Side, TeamRegistry, TournamentDetails,
    TournamentError, TournamentMode, TournamentRun, TournamentState,
};
use common::{make_team, pick_winner, player, solo_run, RecordingHost, STAFF};
use std::time::{Duration, Instant};

/// Decide matches until the run leaves the Active state. `favourite` wins every match it plays.
fn play_out(run: &mut TournamentRun, host: &mut RecordingHost, favourite: EntrantId) {
    while run.is_active() {
        let round = run.current_round().unwrap();
        let game = round.matches.iter().find(|m| !m.is_decided()).unwrap();
        let winner = if game.slot_of(favourite).is_some() {
            favourite
        } else {
            pick_winner(game)
        };
        session::record_winner(run, host, STAFF, winner).unwrap();
    }
}

#[test]
fn solo_tournament_with_an_odd_field() {
    let mut run = solo_run(4, 3);
    let teams = TeamRegistry::default();
    let mut host = RecordingHost::default();

    session::start(&mut run, &teams, &mut host, STAFF).unwrap();
    assert_eq!(run.current_round().unwrap().matches.len(), 2);
    play_out(&mut run, &mut host, EntrantId::Player(1));

    assert_eq!(host.published, vec![1, 2]);
    assert_eq!(host.decided.len(), 3);
    assert_eq!(host.finalized.len(), 1);

    let standings = &host.finalized[0];
    assert_eq!(standings.winner(), Some(&Side::from(player(1))));
    assert_eq!(standings.placements.len(), 4);

    assert_eq!(host.points.len(), 3);
    assert_eq!(host.points_for(1), 3);
    let mut others = vec![host.points_for(2), host.points_for(3)];
    others.sort();
    assert_eq!(others, vec![1, 2]);

    assert_eq!(run.state, TournamentState::Registration);
    assert!(run.roster.is_empty());
    assert_eq!(run.capacity(), 4);
}

#[test]
fn team_final_awards_both_members() {
    let mut teams = TeamRegistry::default();
    let a = make_team(&mut teams, player(10), player(11));
    let b = make_team(&mut teams, player(12), player(13));
    let mut run = TournamentRun::new(TournamentMode::Team, 2);
    let mut host = RecordingHost::default();
    session::register(&mut run, &host, 10, a.side()).unwrap();
    session::register(&mut run, &host, 12, b.side()).unwrap();

    session::start(&mut run, &teams, &mut host, STAFF).unwrap();
    let report = session::record_winner(&mut run, &mut host, STAFF, 11u64).unwrap();

    match report.outcome {
        RoundOutcome::Finalized { standings } => assert_eq!(standings.placements.len(), 2),
        other => panic!("expected a finished tournament, got {other:?}"),
    }
    assert_eq!(report.winner, a.side());
    assert_eq!(host.points_for(10), 3);
    assert_eq!(host.points_for(11), 3);
    assert_eq!(host.points_for(12), 2);
    assert_eq!(host.points_for(13), 2);
}

#[test]
fn lone_team_plays_a_filler_team() {
    let mut teams = TeamRegistry::default();
    let team = make_team(&mut teams, player(10), player(11));
    let mut run = TournamentRun::new(TournamentMode::Team, 2);
    let mut host = RecordingHost::default();
    session::register(&mut run, &host, 10, team.side()).unwrap();

    session::start(&mut run, &teams, &mut host, STAFF).unwrap();
    let round = run.current_round().unwrap();
    assert_eq!(round.matches.len(), 1);
    let game = &round.matches[0];
    assert!(game.side_1.is_placeholder() || game.side_2.is_placeholder());
    assert_eq!(game.side_1.len() + game.side_2.len(), 4);

    session::record_winner(&mut run, &mut host, STAFF, 10u64).unwrap();

    assert_eq!(host.published, vec![1]);
    assert_eq!(host.finalized.len(), 1);
    let standings = &host.finalized[0];
    assert_eq!(standings.placements.len(), 2);
    assert_eq!(standings.winner(), Some(&team.side()));
    assert!(standings.placements[1].side.is_placeholder());
    assert_eq!(host.points, vec![(10, 3), (11, 3)]);
    assert_eq!(run.state, TournamentState::Registration);
}

#[test]
fn staff_only_actions_are_refused() {
    let mut run = solo_run(4, 2);
    let teams = TeamRegistry::default();
    let mut host = RecordingHost::default();

    assert_eq!(
        session::configure(&host, 1, TournamentMode::Solo, 8, TournamentDetails::default())
            .map(|r| r.id),
        Err(TournamentError::PermissionDenied(Action::Configure))
    );
    assert_eq!(
        session::add_fillers(&mut run, &host, 1, 2),
        Err(TournamentError::PermissionDenied(Action::AddFillers))
    );
    assert_eq!(
        session::start(&mut run, &teams, &mut host, 1),
        Err(TournamentError::PermissionDenied(Action::Start))
    );
    assert!(host.published.is_empty());
    assert_eq!(run.state, TournamentState::Registration);

    session::start(&mut run, &teams, &mut host, STAFF).unwrap();
    assert_eq!(
        session::record_winner(&mut run, &mut host, 1, 1u64).map(|r| r.match_index),
        Err(TournamentError::PermissionDenied(Action::RecordWinner))
    );
    assert!(host.decided.is_empty());
    let denied = session::cancel(&mut run, &host, 2).unwrap_err();
    assert_eq!(denied, TournamentError::PermissionDenied(Action::Cancel));
    assert_eq!(denied.denied_action(), Some(Action::Cancel));
    assert_eq!(TournamentError::AlreadyActive.denied_action(), None);
    assert!(run.is_active());
}

#[test]
fn configure_carries_details() {
    let host = RecordingHost::default();
    let details = TournamentDetails {
        title: "Friday Cup".to_string(),
        prize: "Bragging rights".to_string(),
        ..Default::default()
    };
    let run = session::configure(&host, STAFF, TournamentMode::Team, 4, details.clone()).unwrap();
    assert_eq!(run.mode(), TournamentMode::Team);
    assert_eq!(run.capacity(), 4);
    assert_eq!(run.details, details);
    assert_eq!(run.state, TournamentState::Registration);
}

#[test]
fn roster_is_frozen_once_started() {
    let mut run = solo_run(4, 2);
    let teams = TeamRegistry::default();
    let mut host = RecordingHost::default();
    session::start(&mut run, &teams, &mut host, STAFF).unwrap();

    assert_eq!(
        session::register(&mut run, &host, 3, Side::from(player(3))),
        Err(TournamentError::AlreadyActive)
    );
    assert_eq!(
        session::unregister(&mut run, &host, 1, &Side::from(player(1))),
        Err(TournamentError::AlreadyActive)
    );
    assert_eq!(
        session::start(&mut run, &teams, &mut host, STAFF),
        Err(TournamentError::AlreadyActive)
    );
    assert_eq!(host.published, vec![1]);
}

#[test]
fn cancel_resets_the_run() {
    let mut run = solo_run(4, 3);
    run.details.title = "Weekly".to_string();
    let teams = TeamRegistry::default();
    let mut host = RecordingHost::default();
    session::start(&mut run, &teams, &mut host, STAFF).unwrap();
    let old_id = run.id;

    session::cancel(&mut run, &host, STAFF).unwrap();
    assert_eq!(run.state, TournamentState::Registration);
    assert!(run.roster.is_empty());
    assert!(run.rounds.is_empty());
    assert_ne!(run.id, old_id);
    assert_eq!(run.details.title, "Weekly");
    assert!(host.finalized.is_empty());
    assert!(host.points.is_empty());
}

#[test]
fn registry_keeps_runs_per_community() {
    let mut registry = Registry::new();
    assert!(registry.tournament(7).is_none());

    registry.install(7, TournamentRun::new(TournamentMode::Solo, 4));
    make_team(&mut registry.community_mut(7).teams, player(1), player(2));
    registry
        .tournament_mut(7)
        .unwrap()
        .register(Side::from(player(3)))
        .unwrap();

    assert_eq!(registry.tournament(7).unwrap().roster.current_count(), 1);
    assert!(registry.tournament(8).is_none());

    let removed = registry.remove_tournament(7).unwrap();
    assert_eq!(removed.roster.current_count(), 1);
    assert!(registry.tournament(7).is_none());
    assert!(registry.get(7).unwrap().teams.team_of(1).is_some());

    assert!(registry.remove(7).is_some());
    assert!(registry.is_empty());
}

#[test]
fn idle_communities_lose_their_tournament_but_keep_teams() {
    let mut registry = Registry::new();
    let start = Instant::now();
    let hour = Duration::from_secs(3600);

    registry.install(1, TournamentRun::new(TournamentMode::Team, 4));
    make_team(&mut registry.community_mut(1).teams, player(1), player(2));
    registry.touch(1, start);
    registry.install(2, TournamentRun::new(TournamentMode::Solo, 4));
    registry.touch(2, start + hour * 11);

    let idle = registry.drop_idle_tournaments(start + hour * 12, hour * 12);
    assert_eq!(idle, vec![1]);
    assert!(registry.tournament(1).is_none());
    assert!(registry.get(1).unwrap().teams.team_of(2).is_some());
    assert!(registry.tournament(2).is_some());

    // Already swept communities are not reported again.
    assert!(registry
        .drop_idle_tournaments(start + hour * 12, hour * 12)
        .is_empty());
}
