//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_FILE (league snapshot, default castelar.json),
//! SNAPSHOT_INTERVAL_SECS (default 30).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{self, Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use castelar_web::logic::impostor;
use castelar_web::{
    import_players_csv, settle_match, standings, undo_match, write_snapshot, write_standings_csv,
    League, LeagueError, MatchId, Period, PlayerId, PlayerRow, UndoPolicy,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;

/// League data + whether it changed since the last snapshot.
struct LeagueEntry {
    league: League,
    dirty: bool,
}

/// In-memory state. The write lock serializes every settlement, so updates to
/// the same player never interleave.
type AppState = Data<RwLock<LeagueEntry>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetStageBody {
    stage_index: usize,
}

#[derive(Deserialize)]
struct SettleMatchBody {
    #[serde(default)]
    winners: Vec<PlayerId>,
    #[serde(default)]
    losers: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct InitialMatchNumberBody {
    initial_match_number: u64,
}

#[derive(Deserialize)]
struct DealBody {
    players: Vec<String>,
    words: Vec<String>,
    #[serde(default = "default_impostors")]
    impostors: usize,
}

fn default_impostors() -> usize {
    1
}

/// Query: ?year=2025&month=3 (both optional).
#[derive(Deserialize)]
struct PeriodQuery {
    year: Option<i32>,
    month: Option<u32>,
}

impl PeriodQuery {
    fn period(&self) -> Result<Period, LeagueError> {
        Period::checked(self.year, self.month)
    }
}

#[derive(Deserialize)]
struct UndoQuery {
    #[serde(default)]
    policy: UndoPolicy,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn current_year() -> i32 {
    Utc::now().year()
}

fn league_error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::PlayerNotFound(_) | LeagueError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "castelar-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Stored players ordered by name, with derived fields.
#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let rows: Vec<PlayerRow> = g.league.players_by_name().iter().map(PlayerRow::from_player).collect();
    HttpResponse::Ok().json(rows)
}

/// Add a player (names are unique, case-insensitive).
#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let row = match g.league.add_player(body.name.trim()) {
        Ok(p) => p.row(),
        Err(e) => return league_error_response(&e),
    };
    g.dirty = true;
    HttpResponse::Ok().json(row)
}

/// Remove a player by id. Logged matches are kept.
#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.league.remove_player(path.id) {
        Ok(p) => {
            g.dirty = true;
            log::info!("Removed player {}", p.name);
            HttpResponse::Ok().json(p)
        }
        Err(e) => league_error_response(&e),
    }
}

/// Manual stage correction; counters are left as they are.
#[put("/api/players/{id}/stage")]
async fn api_set_stage(state: AppState, path: Path<PlayerPath>, body: Json<SetStageBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let row = match g.league.set_stage(path.id, body.stage_index) {
        Ok(p) => p.row(),
        Err(e) => return league_error_response(&e),
    };
    g.dirty = true;
    log::info!("Stage override: {} -> {}", row.player.name, row.phase_label);
    HttpResponse::Ok().json(row)
}

/// Import players from a CSV body with a `name` column.
#[post("/api/players/import")]
async fn api_import_players(state: AppState, body: Bytes) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match import_players_csv(&mut g.league, body.as_ref()) {
        Ok(report) => {
            if !report.added.is_empty() {
                g.dirty = true;
            }
            HttpResponse::Ok().json(report)
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Settle a match: winners and losers by id. One side may be empty.
#[post("/api/matches")]
async fn api_settle_match(state: AppState, body: Json<SettleMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match settle_match(&mut g.league, &body.winners, &body.losers, Utc::now()) {
        Ok(settlement) => {
            g.dirty = true;
            HttpResponse::Ok().json(settlement)
        }
        Err(e) => league_error_response(&e),
    }
}

/// Match log for a period, newest first.
#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<PeriodQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let period = match query.period() {
        Ok(p) => p,
        Err(e) => return league_error_response(&e),
    };
    HttpResponse::Ok().json(g.league.matches_in(period, current_year()))
}

#[get("/api/matches/count")]
async fn api_match_count(state: AppState, query: Query<PeriodQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let period = match query.period() {
        Ok(p) => p,
        Err(e) => return league_error_response(&e),
    };
    let count = g.league.match_count(period, current_year());
    HttpResponse::Ok().json(serde_json::json!({ "count": count }))
}

/// Undo a match (?policy=reverse|replay, default reverse).
#[delete("/api/matches/{id}")]
async fn api_undo_match(state: AppState, path: Path<MatchPath>, query: Query<UndoQuery>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match undo_match(&mut g.league, path.id, query.policy) {
        Ok(players) => {
            g.dirty = true;
            HttpResponse::Ok().json(players)
        }
        Err(e) => league_error_response(&e),
    }
}

/// Set the match counter's starting offset.
#[put("/api/config/initial-match-number")]
async fn api_set_initial_match_number(state: AppState, body: Json<InitialMatchNumberBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.league.set_initial_match_number(body.initial_match_number);
    g.dirty = true;
    HttpResponse::Ok().json(g.league.counter)
}

#[get("/api/standings")]
async fn api_standings(state: AppState, query: Query<PeriodQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let period = match query.period() {
        Ok(p) => p,
        Err(e) => return league_error_response(&e),
    };
    HttpResponse::Ok().json(standings(&g.league, period, current_year()))
}

#[get("/api/standings.csv")]
async fn api_standings_csv(state: AppState, query: Query<PeriodQuery>) -> HttpResponse {
    let period = match query.period() {
        Ok(p) => p,
        Err(e) => return league_error_response(&e),
    };
    let rows = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        standings(&g.league, period, current_year())
    };
    let mut out = Vec::new();
    if let Err(e) = write_standings_csv(&rows, &mut out) {
        log::error!("Standings export failed: {}", e);
        return HttpResponse::InternalServerError().body("export error");
    }
    HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(out)
}

/// Deal an Impostor round.
#[post("/api/impostor/deal")]
async fn api_impostor_deal(body: Json<DealBody>) -> HttpResponse {
    match impostor::deal(&body.players, &body.words, body.impostors, &mut rand::thread_rng()) {
        Ok(deal) => HttpResponse::Ok().json(deal),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("castelar.json")
}

fn default_snapshot_interval() -> Duration {
    Duration::from_secs(30)
}

/// Write the snapshot if anything changed. The dirty flag is cleared before
/// writing and restored on failure.
async fn save_snapshot(state: &AppState, path: &std::path::Path) {
    let json = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => {
                log::error!("Snapshot skipped: lock error");
                return;
            }
        };
        if !g.dirty {
            return;
        }
        match g.league.to_json() {
            Ok(json) => {
                g.dirty = false;
                json
            }
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                return;
            }
        }
    };
    let target = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || write_snapshot(&target, &json)).await;
    match result {
        Ok(Ok(())) => log::debug!("Snapshot saved to {}", path.display()),
        Ok(Err(e)) => {
            log::error!("Snapshot write to {} failed: {}", path.display(), e);
            mark_dirty(state);
        }
        Err(e) => {
            log::error!("Snapshot task for {} failed: {}", path.display(), e);
            mark_dirty(state);
        }
    }
}

fn mark_dirty(state: &AppState) {
    match state.write() {
        Ok(mut g) => g.dirty = true,
        Err(_) => log::error!("Could not flag snapshot for retry: lock error"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_file = std::env::var("DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_data_file());
    let snapshot_interval = std::env::var("SNAPSHOT_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&s: &u64| s > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(default_snapshot_interval);

    let league = League::load(&data_file).map_err(|e| {
        log::error!("Could not load {}: {}", data_file.display(), e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;
    log::info!(
        "Loaded {} player(s) and {} match(es) from {}",
        league.players.len(),
        league.matches.len(),
        data_file.display()
    );

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(LeagueEntry { league, dirty: false }));

    // Background task: periodically persist the league when it changed
    let state_snapshot = state.clone();
    let snapshot_path = data_file.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(snapshot_interval);
        loop {
            interval.tick().await;
            save_snapshot(&state_snapshot, &snapshot_path).await;
        }
    });

    let state_server = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state_server.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_list_players)
            .service(api_import_players)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_set_stage)
            .service(api_match_count)
            .service(api_settle_match)
            .service(api_list_matches)
            .service(api_undo_match)
            .service(api_set_initial_match_number)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_impostor_deal)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await?;

    // Final snapshot on shutdown
    save_snapshot(&state, &data_file).await;
    Ok(())
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
