//! Single binary web server: JSON API over in-memory Swiss tournaments.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use swiss_pairing_web::{
    add_manual_pairing, find_competitor_in_round, generate_next_round, record_result, standings,
    tournament_stats, ColorChoice, CompetitorId, MatchResult, Tournament, TournamentError,
    TournamentId, TournamentSettings, DEFAULT_BOARDS_PER_BATCH, DEFAULT_TOTAL_ROUNDS,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default = "default_total_rounds")]
    total_rounds: u32,
    #[serde(default = "default_boards_per_batch")]
    boards_per_batch: u32,
    #[serde(default)]
    settings: TournamentSettings,
}

fn default_total_rounds() -> u32 {
    DEFAULT_TOTAL_ROUNDS
}

fn default_boards_per_batch() -> u32 {
    DEFAULT_BOARDS_PER_BATCH
}

#[derive(Deserialize)]
struct AddCompetitorBody {
    name: String,
    #[serde(default)]
    rating: u32,
}

#[derive(Deserialize)]
struct RecordResultBody {
    round: u32,
    index: usize,
    result: MatchResult,
}

#[derive(Deserialize)]
struct ManualPairingBody {
    round: u32,
    first: CompetitorId,
    second: CompetitorId,
    #[serde(default)]
    colors: ColorChoice,
}

#[derive(Deserialize)]
struct FindQuery {
    name: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and competitor id
#[derive(Deserialize)]
struct TournamentCompetitorPath {
    id: TournamentId,
    competitor_id: CompetitorId,
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Lock state, refresh last_activity and run `f` against the tournament (404 if missing).
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.tournament)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-pairing-web",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut tournament = match Tournament::with_format(body.name, body.total_rounds, body.boards_per_batch) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    if let Err(e) = tournament.set_settings(body.settings) {
        return bad_request(e);
    }
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(t))
}

/// Add a competitor (Setup only).
#[post("/api/tournaments/{id}/competitors")]
async fn api_add_competitor(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddCompetitorBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match t.add_competitor(body.name.trim(), body.rating) {
        Ok(_) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    })
}

/// Remove a competitor by id (Setup only).
#[delete("/api/tournaments/{id}/competitors/{competitor_id}")]
async fn api_remove_competitor(state: AppState, path: Path<TournamentCompetitorPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match t.remove_competitor(path.competitor_id) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    })
}

/// Replace pairing settings (Setup only).
#[put("/api/tournaments/{id}/settings")]
async fn api_set_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match t.set_settings(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    })
}

/// Generate and commit the next round; responds with the tournament and pairing warnings.
#[post("/api/tournaments/{id}/rounds")]
async fn api_generate_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match generate_next_round(t) {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "tournament": t,
            "warnings": result.warnings,
        })),
        Err(e) => bad_request(e),
    })
}

/// Record a result for one match of a committed round.
#[put("/api/tournaments/{id}/results")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match record_result(t, body.round, body.index, body.result) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => bad_request(e),
    })
}

/// Add an administrator pairing to an incomplete round.
#[post("/api/tournaments/{id}/pairings")]
async fn api_manual_pairing(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ManualPairingBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        match add_manual_pairing(t, body.round, body.first, body.second, body.colors) {
            Ok(()) => HttpResponse::Ok().json(t),
            Err(e) => bad_request(e),
        }
    })
}

/// Current standings with ranks and round-size figures.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        HttpResponse::Ok().json(serde_json::json!({
            "standings": standings(t),
            "stats": tournament_stats(t),
        }))
    })
}

/// Find a competitor's board in the latest round by name (case-insensitive substring).
#[get("/api/tournaments/{id}/find")]
async fn api_find_competitor(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<FindQuery>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let t: &Tournament = t;
        let found = t
            .latest_round()
            .and_then(|round| find_competitor_in_round(t, round, &query.name));
        match found {
            Some(info) => HttpResponse::Ok().json(info),
            None => HttpResponse::NotFound().json(serde_json::json!({ "error": "Competitor not found" })),
        }
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_competitor)
            .service(api_remove_competitor)
            .service(api_set_settings)
            .service(api_generate_round)
            .service(api_record_result)
            .service(api_manual_pairing)
            .service(api_standings)
            .service(api_find_competitor)
    })
    .bind(bind)?
    .run()
    .await
}
