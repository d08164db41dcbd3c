//! Single binary host: runs the bracket engine per community behind a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! The acting user is taken from the `X-Actor-Id` header; STAFF_IDS lists who may run
//! tournaments.

mod config;
mod host;

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use bracket_bot::{
    session, Action, Community, CommunityId, Host, Player, PlayerId, Registry, RoundOutcome,
    Side, Team, TeamError, TeamRegistry, TournamentDetails, TournamentError, TournamentMode,
};
use chrono::Utc;
use config::Config;
use host::WebHost;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// In-memory state: per-community registry entries and their hosts.
struct AppInner {
    registry: Registry,
    hosts: HashMap<CommunityId, WebHost>,
    staff: Arc<HashSet<PlayerId>>,
}

type AppState = Data<RwLock<AppInner>>;

const ACTOR_HEADER: &str = "x-actor-id";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ConfigureBody {
    #[serde(default)]
    mode: TournamentMode,
    capacity: usize,
    #[serde(flatten)]
    details: TournamentDetails,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct FillersBody {
    #[serde(default = "default_fillers")]
    count: usize,
}

fn default_fillers() -> usize {
    1
}

#[derive(Deserialize)]
struct WinnerBody {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct AdjustBody {
    delta: i64,
    /// Display name of the member, kept on the ledger row.
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct InviteBody {
    invitee_id: PlayerId,
    /// Display name of the inviter.
    name: String,
}

/// Path segment: community id (e.g. /api/communities/{id})
#[derive(Deserialize)]
struct CommunityPath {
    id: CommunityId,
}

/// Path segments: community id and inviting player id.
#[derive(Deserialize)]
struct InvitationPath {
    id: CommunityId,
    inviter_id: PlayerId,
}

/// Path segments: community id and a member id.
#[derive(Deserialize)]
struct MemberPath {
    id: CommunityId,
    player_id: PlayerId,
}

fn actor_of(req: &HttpRequest) -> Option<PlayerId> {
    req.headers()
        .get(ACTOR_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn error(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Engine errors: refused permissions are 403, everything else 400.
fn tournament_error(e: TournamentError) -> HttpResponse {
    match e.denied_action() {
        Some(action) => forbidden(action),
        None => error(e),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament has been created yet" }))
}

fn no_actor() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Missing X-Actor-Id header" }))
}

fn forbidden(action: Action) -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": format!("You don't have permission to {action}")
    }))
}

/// Lock the state, refresh the community's activity time and hand its registry and host to `f`.
fn with_community<F>(state: &AppState, id: CommunityId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Registry, &mut WebHost) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let AppInner {
        registry,
        hosts,
        staff,
    } = &mut *g;
    registry.touch(id, Instant::now());
    let host = hosts
        .entry(id)
        .or_insert_with(|| WebHost::new(Arc::clone(staff)));
    f(registry, host)
}

/// The side an actor registers with: themselves in 1v1, their team in 2v2.
fn side_for(mode: TournamentMode, teams: &TeamRegistry, player: Player) -> Result<Side, TeamError> {
    match mode {
        TournamentMode::Solo => Ok(Side::from(player)),
        TournamentMode::Team => teams
            .team_of(player.id)
            .map(Team::side)
            .ok_or(TeamError::NotInTeam),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-bot",
    })
}

/// Configure a new tournament for the community, replacing any previous one.
#[post("/api/communities/{id}/tournament")]
async fn api_configure(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
    body: Json<ConfigureBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    let body = body.into_inner();
    if body.capacity == 0 {
        return error("Capacity must be at least 1");
    }
    with_community(&state, path.id, |registry, host| {
        match session::configure(&*host, actor, body.mode, body.capacity, body.details) {
            Ok(run) => {
                host.announce(format!(
                    "{} tournament created: {} {} max",
                    run.mode(),
                    run.capacity(),
                    if run.mode() == TournamentMode::Team { "teams" } else { "players" }
                ));
                HttpResponse::Ok().json(&*registry.install(path.id, run))
            }
            Err(e) => tournament_error(e),
        }
    })
}

#[get("/api/communities/{id}/tournament")]
async fn api_get_tournament(state: AppState, path: Path<CommunityPath>) -> HttpResponse {
    with_community(&state, path.id, |registry, _| match registry.tournament(path.id) {
        Some(run) => HttpResponse::Ok().json(run),
        None => no_tournament(),
    })
}

/// Cancel the tournament (staff).
#[delete("/api/communities/{id}/tournament")]
async fn api_cancel(state: AppState, req: HttpRequest, path: Path<CommunityPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Some(run) = registry.tournament_mut(path.id) else {
            return no_tournament();
        };
        match session::cancel(run, &*host, actor) {
            Ok(()) => {
                registry.remove_tournament(path.id);
                host.announce("Tournament cancelled".to_string());
                HttpResponse::Ok().json(serde_json::json!({ "cancelled": true }))
            }
            Err(e) => tournament_error(e),
        }
    })
}

/// Register the actor (1v1) or the actor's team (2v2).
#[post("/api/communities/{id}/tournament/register")]
async fn api_register(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Community { tournament, teams } = registry.community_mut(path.id);
        let Some(run) = tournament.as_mut() else {
            return no_tournament();
        };
        let side = match side_for(run.mode(), &*teams, Player::new(actor, body.name.trim())) {
            Ok(side) => side,
            Err(e) => return error(e),
        };
        match session::register(run, &*host, actor, side) {
            Ok(()) => HttpResponse::Ok().json(&*run),
            Err(e) => tournament_error(e),
        }
    })
}

#[post("/api/communities/{id}/tournament/unregister")]
async fn api_unregister(state: AppState, req: HttpRequest, path: Path<CommunityPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Some(run) = registry.tournament_mut(path.id) else {
            return no_tournament();
        };
        // In 2v2 the roster drops the whole team the actor was entered with.
        let side = Side::from(Player::new(actor, ""));
        match session::unregister(run, &*host, actor, &side) {
            Ok(()) => HttpResponse::Ok().json(&*run),
            Err(e) => tournament_error(e),
        }
    })
}

/// Add fake players / fake teams before start (staff).
#[post("/api/communities/{id}/tournament/fillers")]
async fn api_add_fillers(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
    body: Json<FillersBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Some(run) = registry.tournament_mut(path.id) else {
            return no_tournament();
        };
        match session::add_fillers(run, &*host, actor, body.count) {
            Ok(()) => HttpResponse::Ok().json(&*run),
            Err(e) => tournament_error(e),
        }
    })
}

/// Start the tournament: build and announce round 1 (staff).
#[post("/api/communities/{id}/tournament/start")]
async fn api_start(state: AppState, req: HttpRequest, path: Path<CommunityPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Community { tournament, teams } = registry.community_mut(path.id);
        let Some(run) = tournament.as_mut() else {
            return no_tournament();
        };
        match session::start(run, &*teams, host, actor) {
            Ok(()) => HttpResponse::Ok().json(&*run),
            Err(e) => tournament_error(e),
        }
    })
}

/// Record a match winner (staff). Finishing the final awards points and closes the tournament.
#[post("/api/communities/{id}/tournament/winner")]
async fn api_winner(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
    body: Json<WinnerBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Some(run) = registry.tournament_mut(path.id) else {
            return no_tournament();
        };
        match session::record_winner(run, host, actor, body.player_id) {
            Ok(report) => {
                if matches!(report.outcome, RoundOutcome::Finalized { .. }) {
                    registry.remove_tournament(path.id);
                }
                HttpResponse::Ok().json(report)
            }
            Err(e) => tournament_error(e),
        }
    })
}

#[get("/api/communities/{id}/announcements")]
async fn api_announcements(state: AppState, path: Path<CommunityPath>) -> HttpResponse {
    with_community(&state, path.id, |_, host| HttpResponse::Ok().json(host.feed()))
}

#[get("/api/communities/{id}/teams")]
async fn api_teams(state: AppState, path: Path<CommunityPath>) -> HttpResponse {
    with_community(&state, path.id, |registry, _| {
        let teams: Vec<&Team> = registry.community_mut(path.id).teams.teams().collect();
        HttpResponse::Ok().json(teams)
    })
}

/// Invite another member to form a 2v2 team.
#[post("/api/communities/{id}/teams/invitations")]
async fn api_invite(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
    body: Json<InviteBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    let inviter = Player::new(actor, body.name.trim());
    with_community(&state, path.id, |registry, host| {
        let teams = &mut registry.community_mut(path.id).teams;
        match teams.invite(inviter, body.invitee_id, Utc::now()) {
            Ok(()) => {
                host.announce(format!("Team invitation sent to {}", body.invitee_id));
                HttpResponse::Ok().json(teams.pending_for(body.invitee_id))
            }
            Err(e) => error(e),
        }
    })
}

/// Invitations waiting for the actor.
#[get("/api/communities/{id}/teams/invitations")]
async fn api_pending_invitations(
    state: AppState,
    req: HttpRequest,
    path: Path<CommunityPath>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, _| {
        HttpResponse::Ok().json(registry.community_mut(path.id).teams.pending_for(actor))
    })
}

#[post("/api/communities/{id}/teams/invitations/{inviter_id}/accept")]
async fn api_accept_invitation(
    state: AppState,
    req: HttpRequest,
    path: Path<InvitationPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    let invitee = Player::new(actor, body.name.trim());
    with_community(&state, path.id, |registry, host| {
        let teams = &mut registry.community_mut(path.id).teams;
        match teams.accept(invitee, path.inviter_id, Utc::now()) {
            Ok(team) => {
                let team = team.clone();
                host.announce(format!("Team created: {}", team.name()));
                HttpResponse::Ok().json(team)
            }
            Err(e) => error(e),
        }
    })
}

#[post("/api/communities/{id}/teams/invitations/{inviter_id}/reject")]
async fn api_reject_invitation(
    state: AppState,
    req: HttpRequest,
    path: Path<InvitationPath>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, _| {
        match registry.community_mut(path.id).teams.reject(actor, path.inviter_id) {
            Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "rejected": true })),
            Err(e) => error(e),
        }
    })
}

/// Leave (and dissolve) the actor's team.
#[delete("/api/communities/{id}/teams/mine")]
async fn api_leave_team(state: AppState, req: HttpRequest, path: Path<CommunityPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        let Community { tournament, teams } = registry.community_mut(path.id);
        match teams.leave(actor, tournament.as_ref()) {
            Ok(team) => {
                host.announce(format!("Team {} dissolved", team.name()));
                HttpResponse::Ok().json(team)
            }
            Err(e) => error(e),
        }
    })
}

/// A member left the community: dissolve their team and drop their invitations (staff).
#[delete("/api/communities/{id}/members/{player_id}")]
async fn api_remove_member(state: AppState, req: HttpRequest, path: Path<MemberPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |registry, host| {
        if !host.check_permission(actor, Action::Configure) {
            return forbidden(Action::Configure);
        }
        let removed = registry.community_mut(path.id).teams.remove_member(path.player_id);
        HttpResponse::Ok().json(serde_json::json!({ "dissolved_team": removed }))
    })
}

#[get("/api/communities/{id}/points")]
async fn api_points(state: AppState, path: Path<CommunityPath>) -> HttpResponse {
    with_community(&state, path.id, |_, host| HttpResponse::Ok().json(host.points().leaderboard()))
}

#[get("/api/communities/{id}/points.csv")]
async fn api_points_csv(state: AppState, path: Path<CommunityPath>) -> HttpResponse {
    with_community(&state, path.id, |_, host| match host.points().to_csv() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("points export failed: {}", e);
            HttpResponse::InternalServerError().body("export error")
        }
    })
}

/// One member's total; members with no points yet report 0.
#[get("/api/communities/{id}/points/{player_id}")]
async fn api_member_points(state: AppState, path: Path<MemberPath>) -> HttpResponse {
    with_community(&state, path.id, |_, host| {
        HttpResponse::Ok().json(serde_json::json!({
            "player_id": path.player_id,
            "points": host.points().points_of(path.player_id),
        }))
    })
}

/// Add (positive `delta`) or remove (negative) points for a member (staff).
#[post("/api/communities/{id}/points/{player_id}")]
async fn api_adjust_points(
    state: AppState,
    req: HttpRequest,
    path: Path<MemberPath>,
    body: Json<AdjustBody>,
) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    let member = Player::new(path.player_id, body.name.trim());
    with_community(&state, path.id, |_, host| {
        if !host.check_permission(actor, Action::ManagePoints) {
            return forbidden(Action::ManagePoints);
        }
        match host.points_mut().adjust(&member, body.delta) {
            Ok(total) => {
                let verb = if body.delta > 0 { "added to" } else { "removed from" };
                host.announce(format!(
                    "{} points {} {}. Total: {}",
                    body.delta.unsigned_abs(),
                    verb,
                    member.name,
                    total
                ));
                HttpResponse::Ok().json(serde_json::json!({
                    "player_id": member.id,
                    "points": total,
                }))
            }
            Err(e) => error(e),
        }
    })
}

/// Reset the points ledger (staff).
#[delete("/api/communities/{id}/points")]
async fn api_reset_points(state: AppState, req: HttpRequest, path: Path<CommunityPath>) -> HttpResponse {
    let Some(actor) = actor_of(&req) else {
        return no_actor();
    };
    with_community(&state, path.id, |_, host| {
        if !host.check_permission(actor, Action::ManagePoints) {
            return forbidden(Action::ManagePoints);
        }
        host.points_mut().reset();
        host.announce("Points have been reset".to_string());
        HttpResponse::Ok().json(host.points().leaderboard())
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppInner {
        registry: Registry::new(),
        hosts: HashMap::new(),
        staff: Arc::new(config.staff.clone()),
    }));

    // Background task: every 30 minutes, drop tournaments of communities with no activity
    // for a while. Teams and points ledgers are kept.
    let state_cleanup = state.clone();
    let inactivity = config.inactivity;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let AppInner { registry, hosts, .. } = &mut *g;
            let idle = registry.drop_idle_tournaments(Instant::now(), inactivity);
            for id in &idle {
                if let Some(host) = hosts.get_mut(id) {
                    host.clear_feed();
                }
            }
            if !idle.is_empty() {
                log::info!("Cleaned up {} inactive communities", idle.len());
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_configure)
            .service(api_get_tournament)
            .service(api_cancel)
            .service(api_register)
            .service(api_unregister)
            .service(api_add_fillers)
            .service(api_start)
            .service(api_winner)
            .service(api_announcements)
            .service(api_teams)
            .service(api_invite)
            .service(api_pending_invitations)
            .service(api_accept_invitation)
            .service(api_reject_invitation)
            .service(api_leave_team)
            .service(api_remove_member)
            .service(api_points_csv)
            .service(api_points)
            .service(api_member_points)
            .service(api_adjust_points)
            .service(api_reset_points)
    })
    .bind(bind)?
    .run()
    .await
}
