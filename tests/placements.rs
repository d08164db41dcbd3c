//! Integration tests for placements and point awards.

mod common;

use bracket_bot::{awards, compute_placements, Entrant, Side};
use common::player;

fn solo(id: u64) -> Side {
    Side::from(player(id))
}

#[test]
fn top_four_from_elimination_order() {
    let winner = solo(9);
    let eliminated = vec![solo(1), solo(2), solo(3), solo(4)];
    let placements = compute_placements(&winner, &eliminated);

    let got: Vec<_> = placements
        .iter()
        .map(|p| (p.place, p.side.clone(), p.points))
        .collect();
    assert_eq!(
        got,
        vec![
            (1, solo(9), 3),
            (2, solo(4), 2),
            (3, solo(3), 1),
            (4, solo(2), 1),
        ]
    );
}

#[test]
fn short_brackets_place_fewer_sides() {
    assert_eq!(compute_placements(&solo(1), &[]).len(), 1);
    let placements = compute_placements(&solo(1), &[solo(2), solo(3)]);
    assert_eq!(placements.len(), 3);
    assert_eq!(placements[1].side, solo(3));
    assert_eq!(placements[2].side, solo(2));
}

#[test]
fn placeholders_earn_nothing() {
    let bot = Side::Single(Entrant::Placeholder { seq: 1 });
    let placements = compute_placements(&solo(1), &[solo(2), bot, solo(3)]);
    assert_eq!(placements.len(), 4);

    let got: Vec<_> = awards(&placements)
        .into_iter()
        .map(|(p, pts)| (p.id, pts))
        .collect();
    assert_eq!(got, vec![(1, 3), (3, 2), (2, 1)]);
}

#[test]
fn both_team_members_get_the_full_reward() {
    let team = Side::Pair(player(1).into(), player(2).into());
    let filler_team = Side::Pair(
        Entrant::Placeholder { seq: 1 },
        Entrant::Placeholder { seq: 2 },
    );
    let placements = compute_placements(&team, &[filler_team]);

    let got: Vec<_> = awards(&placements)
        .into_iter()
        .map(|(p, pts)| (p.id, pts))
        .collect();
    assert_eq!(got, vec![(1, 3), (2, 3)]);
}
