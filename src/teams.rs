//! 2v2 team registry: invitations, team creation and dissolution for one community.

use crate::models::{Entrant, Player, PlayerId, Side, TournamentMode, TournamentRun};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Invitations expire after this many minutes.
pub const INVITATION_TTL_MINUTES: i64 = 5;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TeamError {
    SelfInvite,
    /// The acting player already has a team.
    AlreadyInTeam,
    /// The invited player already has a team.
    InviteeInTeam,
    InvitationExists,
    NoInvitation,
    InvitationExpired,
    NotInTeam,
    /// The team is registered in a tournament that has started.
    RegisteredInActiveTournament,
}

impl std::fmt::Display for TeamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamError::SelfInvite => write!(f, "You cannot invite yourself"),
            TeamError::AlreadyInTeam => write!(f, "You are already in a team"),
            TeamError::InviteeInTeam => write!(f, "That user is already in a team"),
            TeamError::InvitationExists => {
                write!(f, "You have already sent a team invitation to this user")
            }
            TeamError::NoInvitation => write!(f, "No pending invitation from this user"),
            TeamError::InvitationExpired => write!(f, "Team invitation expired"),
            TeamError::NotInTeam => write!(f, "You are not in a team"),
            TeamError::RegisteredInActiveTournament => {
                write!(f, "Cannot leave team while registered in an active tournament")
            }
        }
    }
}

impl std::error::Error for TeamError {}

/// Two players bound together for 2v2 registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub members: [Player; 2],
}

impl Team {
    pub fn name(&self) -> String {
        format!("{} & {}", self.members[0].name, self.members[1].name)
    }

    pub fn side(&self) -> Side {
        let [a, b] = self.members.clone();
        Side::Pair(Entrant::Player(a), Entrant::Player(b))
    }

    pub fn teammate_of(&self, id: PlayerId) -> Option<&Player> {
        match &self.members {
            [a, b] if a.id == id => Some(b),
            [a, b] if b.id == id => Some(a),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub inviter: Player,
    pub sent_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.sent_at > Duration::minutes(INVITATION_TTL_MINUTES)
    }
}

/// Looks up registered teammates. The bracket builder uses it to keep teams together.
pub trait Teammates {
    fn teammate_of(&self, id: PlayerId) -> Option<&Player>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamRegistry {
    teams: HashMap<TeamId, Team>,
    by_player: HashMap<PlayerId, TeamId>,
    /// Pending invitations keyed by invitee.
    invitations: HashMap<PlayerId, Vec<Invitation>>,
}

impl TeamRegistry {
    pub fn team_of(&self, id: PlayerId) -> Option<&Team> {
        self.by_player.get(&id).and_then(|t| self.teams.get(t))
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn pending_for(&self, invitee: PlayerId) -> &[Invitation] {
        self.invitations.get(&invitee).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record an invitation from `inviter` to `invitee`.
    pub fn invite(&mut self, inviter: Player, invitee: PlayerId, now: DateTime<Utc>) -> Result<(), TeamError> {
        if inviter.id == invitee {
            return Err(TeamError::SelfInvite);
        }
        if self.by_player.contains_key(&inviter.id) {
            return Err(TeamError::AlreadyInTeam);
        }
        if self.by_player.contains_key(&invitee) {
            return Err(TeamError::InviteeInTeam);
        }
        let pending = self.invitations.entry(invitee).or_default();
        pending.retain(|inv| !inv.is_expired(now));
        if pending.iter().any(|inv| inv.inviter.id == inviter.id) {
            return Err(TeamError::InvitationExists);
        }
        pending.push(Invitation {
            inviter,
            sent_at: now,
        });
        Ok(())
    }

    /// Accept a pending invitation, creating the team (inviter first).
    pub fn accept(&mut self, invitee: Player, inviter: PlayerId, now: DateTime<Utc>) -> Result<&Team, TeamError> {
        let expired = self
            .pending_for(invitee.id)
            .iter()
            .find(|inv| inv.inviter.id == inviter)
            .ok_or(TeamError::NoInvitation)?
            .is_expired(now);
        if expired {
            self.take_invitation(invitee.id, inviter)?;
            return Err(TeamError::InvitationExpired);
        }
        if self.by_player.contains_key(&invitee.id) {
            return Err(TeamError::AlreadyInTeam);
        }
        if self.by_player.contains_key(&inviter) {
            return Err(TeamError::InviteeInTeam);
        }
        let invitation = self.take_invitation(invitee.id, inviter)?;
        let team = Team {
            id: Uuid::new_v4(),
            members: [invitation.inviter, invitee],
        };
        let id = team.id;
        for member in &team.members {
            self.by_player.insert(member.id, id);
        }
        log::debug!("team {} created: {}", id, team.name());
        Ok(&*self.teams.entry(id).or_insert(team))
    }

    pub fn reject(&mut self, invitee: PlayerId, inviter: PlayerId) -> Result<(), TeamError> {
        self.take_invitation(invitee, inviter).map(|_| ())
    }

    /// Leave (and dissolve) the player's team. Refused while the team is entered in a
    /// running 2v2 tournament.
    pub fn leave(&mut self, player: PlayerId, tournament: Option<&TournamentRun>) -> Result<Team, TeamError> {
        let team = self.team_of(player).ok_or(TeamError::NotInTeam)?;
        if let Some(run) = tournament {
            let entered = team.members.iter().any(|m| run.roster.contains(m.id.into()));
            if run.is_active() && run.mode() == TournamentMode::Team && entered {
                return Err(TeamError::RegisteredInActiveTournament);
            }
        }
        let id = team.id;
        self.dissolve(id).ok_or(TeamError::NotInTeam)
    }

    /// Drop every trace of a player who left the community: their team and invitations.
    pub fn remove_member(&mut self, player: PlayerId) -> Option<Team> {
        self.invitations.remove(&player);
        for pending in self.invitations.values_mut() {
            pending.retain(|inv| inv.inviter.id != player);
        }
        let id = *self.by_player.get(&player)?;
        self.dissolve(id)
    }

    fn dissolve(&mut self, id: TeamId) -> Option<Team> {
        let team = self.teams.remove(&id)?;
        for member in &team.members {
            self.by_player.remove(&member.id);
        }
        log::debug!("team {} dissolved", id);
        Some(team)
    }

    fn take_invitation(&mut self, invitee: PlayerId, inviter: PlayerId) -> Result<Invitation, TeamError> {
        let pending = self.invitations.get_mut(&invitee).ok_or(TeamError::NoInvitation)?;
        let idx = pending
            .iter()
            .position(|inv| inv.inviter.id == inviter)
            .ok_or(TeamError::NoInvitation)?;
        let invitation = pending.remove(idx);
        if pending.is_empty() {
            self.invitations.remove(&invitee);
        }
        Ok(invitation)
    }
}

impl Teammates for TeamRegistry {
    fn teammate_of(&self, id: PlayerId) -> Option<&Player> {
        self.team_of(id).and_then(|t| t.teammate_of(id))
    }
}
