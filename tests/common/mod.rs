//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use bracket_bot::{
    Action, EntrantId, GameMatch, Host, Player, PlayerId, Round, Side, Standings, Team,
    TeamRegistry, TournamentMode, TournamentRun,
};
use chrono::Utc;

/// Actor allowed to do everything in [`RecordingHost`].
pub const STAFF: PlayerId = 1000;

pub fn player(id: PlayerId) -> Player {
    Player::new(id, format!("P{id}"))
}

/// Solo run with players 1..=n registered.
pub fn solo_run(capacity: usize, n: u64) -> TournamentRun {
    let mut run = TournamentRun::new(TournamentMode::Solo, capacity);
    for id in 1..=n {
        run.register(Side::from(player(id))).unwrap();
    }
    run
}

/// Form a team through invite + accept.
pub fn make_team(teams: &mut TeamRegistry, a: Player, b: Player) -> Team {
    let now = Utc::now();
    let inviter = a.id;
    teams.invite(a, b.id, now).unwrap();
    teams.accept(b, inviter, now).unwrap().clone()
}

/// The first real player of the match wins; a filler-only match goes to side one.
pub fn pick_winner(m: &GameMatch) -> EntrantId {
    for side in [&m.side_1, &m.side_2] {
        if let Some(p) = side.players().first() {
            return EntrantId::Player(p.id);
        }
    }
    m.side_1.members()[0].id()
}

/// Placeholder sequence numbers appearing anywhere in the round.
pub fn placeholder_seqs(round: &Round) -> Vec<u32> {
    round
        .matches
        .iter()
        .flat_map(|m| [&m.side_1, &m.side_2])
        .flat_map(|s| s.members())
        .filter_map(|e| match e.id() {
            EntrantId::Placeholder(seq) => Some(seq),
            EntrantId::Player(_) => None,
        })
        .collect()
}

#[derive(Default)]
pub struct RecordingHost {
    pub published: Vec<usize>,
    pub decided: Vec<(usize, usize, Side)>,
    pub finalized: Vec<Standings>,
    pub points: Vec<(PlayerId, u32)>,
}

impl RecordingHost {
    pub fn points_for(&self, id: PlayerId) -> u32 {
        self.points
            .iter()
            .filter(|(p, _)| *p == id)
            .map(|(_, pts)| pts)
            .sum()
    }
}

impl Host for RecordingHost {
    fn notify_round_published(&mut self, round: &Round) {
        self.published.push(round.number);
    }

    fn notify_match_decided(&mut self, round: &Round, match_index: usize, winner: &Side) {
        self.decided.push((round.number, match_index, winner.clone()));
    }

    fn notify_tournament_finalized(&mut self, standings: &Standings) {
        self.finalized.push(standings.clone());
    }

    fn award_points(&mut self, player: &Player, amount: u32) {
        self.points.push((player.id, amount));
    }

    fn check_permission(&self, actor: PlayerId, action: Action) -> bool {
        actor == STAFF || matches!(action, Action::Register | Action::Unregister)
    }
}
