//! Per-community state owned by the host: the current run and the team registry.

use crate::models::TournamentRun;
use crate::teams::TeamRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Chat community (server / guild) id.
pub type CommunityId = u64;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Community {
    /// None until a tournament is configured, and again after cancel.
    pub tournament: Option<TournamentRun>,
    pub teams: TeamRegistry,
}

#[derive(Debug, Default)]
pub struct Registry {
    communities: HashMap<CommunityId, Community>,
    last_activity: HashMap<CommunityId, Instant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: CommunityId) -> Option<&Community> {
        self.communities.get(&id)
    }

    /// Community state, created empty on first use.
    pub fn community_mut(&mut self, id: CommunityId) -> &mut Community {
        self.communities.entry(id).or_default()
    }

    pub fn tournament(&self, id: CommunityId) -> Option<&TournamentRun> {
        self.get(id).and_then(|c| c.tournament.as_ref())
    }

    pub fn tournament_mut(&mut self, id: CommunityId) -> Option<&mut TournamentRun> {
        self.communities.get_mut(&id).and_then(|c| c.tournament.as_mut())
    }

    /// Install a freshly configured run, replacing any previous one.
    pub fn install(&mut self, id: CommunityId, run: TournamentRun) -> &mut TournamentRun {
        self.community_mut(id).tournament.insert(run)
    }

    /// Drop the community's run. Teams are kept.
    pub fn remove_tournament(&mut self, id: CommunityId) -> Option<TournamentRun> {
        self.communities.get_mut(&id).and_then(|c| c.tournament.take())
    }

    /// Forget a community entirely.
    pub fn remove(&mut self, id: CommunityId) -> Option<Community> {
        self.last_activity.remove(&id);
        self.communities.remove(&id)
    }

    /// Record activity in a community.
    pub fn touch(&mut self, id: CommunityId, at: Instant) {
        self.last_activity.insert(id, at);
    }

    /// Drop the tournaments of communities with no activity for `inactivity`. Teams stay.
    /// Returns the idle communities, which are no longer tracked until touched again.
    pub fn drop_idle_tournaments(&mut self, now: Instant, inactivity: Duration) -> Vec<CommunityId> {
        let idle: Vec<CommunityId> = self
            .last_activity
            .iter()
            .filter(|(_, at)| now.saturating_duration_since(**at) >= inactivity)
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            self.last_activity.remove(id);
            if let Some(run) = self.remove_tournament(*id) {
                if run.is_active() {
                    log::warn!("dropped active tournament {} in idle community {}", run.id, id);
                } else {
                    log::debug!("dropped tournament {} in idle community {}", run.id, id);
                }
            }
        }
        idle
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }
}
