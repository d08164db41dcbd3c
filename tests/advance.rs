//! Integration tests for recording results and advancing rounds.

mod common;

use bracket_bot::{
    build_first_round, build_first_round_with_rng, build_next_round_with_rng, record_winner,
    EntrantId, RoundOutcome, TeamRegistry, TournamentError, TournamentMode, TournamentRun,
    TournamentState,
};
use common::{make_team, pick_winner, placeholder_seqs, player, solo_run};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// Decide every match of the current round with [`pick_winner`]; returns the last outcome.
fn decide_round(run: &mut TournamentRun) -> RoundOutcome {
    let winners: Vec<EntrantId> = run
        .current_round()
        .unwrap()
        .matches
        .iter()
        .map(pick_winner)
        .collect();
    let mut last = RoundOutcome::InProgress;
    for w in winners {
        last = record_winner(run, w).unwrap().outcome;
    }
    last
}

#[test]
fn recording_requires_an_active_tournament() {
    let mut run = solo_run(4, 2);
    assert_eq!(record_winner(&mut run, 1u64), Err(TournamentError::NotActive));
}

#[test]
fn unknown_entrant_is_not_in_round() {
    let mut run = solo_run(4, 2);
    build_first_round(&mut run, &TeamRegistry::default()).unwrap();
    assert_eq!(record_winner(&mut run, 42u64), Err(TournamentError::SideNotInRound));
}

#[test]
fn a_match_is_decided_once() {
    let mut run = solo_run(4, 4);
    build_first_round(&mut run, &TeamRegistry::default()).unwrap();
    let m = run.current_round().unwrap().matches[0].clone();
    let first = m.side_1.members()[0].id();
    let second = m.side_2.members()[0].id();

    record_winner(&mut run, first).unwrap();
    assert_eq!(record_winner(&mut run, first), Err(TournamentError::MatchAlreadyDecided));
    assert_eq!(record_winner(&mut run, second), Err(TournamentError::MatchAlreadyDecided));
    assert_eq!(run.eliminated.len(), 1);
}

#[test]
fn loser_is_eliminated_and_winner_survives() {
    let mut run = solo_run(4, 4);
    build_first_round(&mut run, &TeamRegistry::default()).unwrap();
    let m = run.current_round().unwrap().matches[1].clone();
    let winner = m.side_2.members()[0].id();

    let report = record_winner(&mut run, winner).unwrap();
    assert_eq!(report.round_number, 1);
    assert_eq!(report.match_index, 1);
    assert_eq!(report.winner, m.side_2);
    assert_eq!(report.outcome, RoundOutcome::InProgress);
    assert_eq!(run.eliminated, vec![m.side_1.clone()]);
    assert_eq!(run.survivors, vec![m.side_2.clone()]);
    assert!(run.current_round().unwrap().matches[1].is_decided());
    assert!(!run.current_round().unwrap().matches[0].is_decided());
}

#[test]
fn completed_rounds_open_exactly_one_new_round() {
    for n in 1..=12u64 {
        let mut run = solo_run(16, n);
        let mut rng = StdRng::seed_from_u64(n);
        build_first_round_with_rng(&mut run, &TeamRegistry::default(), &mut rng).unwrap();
        let mut seqs: Vec<u32> = placeholder_seqs(run.current_round().unwrap());

        loop {
            let rounds_before = run.rounds.len();
            match decide_round(&mut run) {
                RoundOutcome::RoundComplete { survivors } => {
                    let k = survivors.len();
                    assert!(k > 1);
                    assert!(run.survivors.is_empty());
                    let round = build_next_round_with_rng(&mut run, survivors, &mut rng).unwrap();
                    assert_eq!(round.number, rounds_before + 1);
                    assert_eq!(round.matches.len(), (k + 1) / 2);
                    seqs.extend(placeholder_seqs(round));
                }
                RoundOutcome::Finalized { standings } => {
                    assert_eq!(run.rounds.len(), rounds_before);
                    assert_eq!(run.state, TournamentState::Finished);
                    assert!(standings.winner().unwrap().players().len() == 1);
                    break;
                }
                RoundOutcome::InProgress => panic!("round left undecided"),
            }
        }

        let unique: HashSet<_> = seqs.iter().collect();
        assert_eq!(unique.len(), seqs.len(), "placeholder reused for n = {n}");
        assert_eq!(record_winner(&mut run, 1u64), Err(TournamentError::NotActive));
    }
}

#[test]
fn any_team_member_identifies_the_side() {
    let mut teams = TeamRegistry::default();
    let a = make_team(&mut teams, player(1), player(2));
    let b = make_team(&mut teams, player(3), player(4));
    let mut run = TournamentRun::new(TournamentMode::Team, 2);
    run.register(a.side()).unwrap();
    run.register(b.side()).unwrap();
    build_first_round(&mut run, &teams).unwrap();

    let report = record_winner(&mut run, 2u64).unwrap();
    assert_eq!(report.winner, a.side());
    // The losing pair is eliminated as one side, members in match order.
    assert_eq!(run.eliminated, vec![b.side()]);
    match report.outcome {
        RoundOutcome::Finalized { standings } => {
            assert_eq!(standings.placements.len(), 2);
            assert_eq!(standings.placements[0].side, a.side());
            assert_eq!(standings.placements[1].side, b.side());
        }
        other => panic!("expected final, got {other:?}"),
    }
}
