//! In-memory host for one community: announcement feed, points ledger and staff check.

use bracket_bot::{Action, Host, Player, PlayerId, PointsLedger, Round, Side, Standings};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Oldest announcements are dropped past this many.
const FEED_LIMIT: usize = 200;

#[derive(Clone, Debug, Serialize)]
pub struct Announcement {
    pub at: DateTime<Utc>,
    pub text: String,
}

pub struct WebHost {
    staff: Arc<HashSet<PlayerId>>,
    points: PointsLedger,
    feed: Vec<Announcement>,
}

impl WebHost {
    pub fn new(staff: Arc<HashSet<PlayerId>>) -> Self {
        Self {
            staff,
            points: PointsLedger::new(),
            feed: Vec::new(),
        }
    }

    pub fn feed(&self) -> &[Announcement] {
        &self.feed
    }

    pub fn clear_feed(&mut self) {
        self.feed.clear();
    }

    pub fn points(&self) -> &PointsLedger {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointsLedger {
        &mut self.points
    }

    pub fn announce(&mut self, text: String) {
        log::info!("{}", text);
        self.feed.push(Announcement {
            at: Utc::now(),
            text,
        });
        if self.feed.len() > FEED_LIMIT {
            let excess = self.feed.len() - FEED_LIMIT;
            self.feed.drain(..excess);
        }
    }
}

fn describe_match(side_1: &Side, side_2: &Side) -> String {
    format!("{side_1} vs {side_2}")
}

impl Host for WebHost {
    fn notify_round_published(&mut self, round: &Round) {
        let mut text = format!("Round {}", round.number);
        for (i, m) in round.matches.iter().enumerate() {
            text.push_str(&format!("\nMatch {}: {}", i + 1, describe_match(&m.side_1, &m.side_2)));
        }
        self.announce(text);
    }

    fn notify_match_decided(&mut self, round: &Round, match_index: usize, winner: &Side) {
        self.announce(format!(
            "Round {} match {}: {} wins",
            round.number,
            match_index + 1,
            winner
        ));
    }

    fn notify_tournament_finalized(&mut self, standings: &Standings) {
        let mut text = if standings.details.title.is_empty() {
            String::from("Tournament winners")
        } else {
            format!("{} winners", standings.details.title)
        };
        for p in &standings.placements {
            text.push_str(&format!("\n{}. {} ({} points)", p.place, p.side, p.points));
        }
        self.announce(text);
    }

    fn award_points(&mut self, player: &Player, amount: u32) {
        self.points.award(player, amount);
    }

    fn check_permission(&self, actor: PlayerId, action: Action) -> bool {
        match action {
            Action::Register | Action::Unregister => true,
            Action::Configure
            | Action::AddFillers
            | Action::Start
            | Action::RecordWinner
            | Action::Cancel
            | Action::ManagePoints => self.staff.contains(&actor),
        }
    }
}
