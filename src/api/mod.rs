use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::models::{ApiResponse, InjuryHeatmap, InjurySummaryRow, PlayerRecord, TeamResult};
use crate::services::{
    filter_options, team_dashboard, FilterOptions, PlayerFilter, PlayerOption, StatMode, Tables,
    TeamDashboard,
};

/// Derived tables are built once before serving and only ever read.
pub type SharedTables = Arc<Tables>;

pub async fn serve(tables: Tables, port: u16) -> anyhow::Result<()> {
    let app = create_router().with_state(Arc::new(tables));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("plstats API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router() -> Router<SharedTables> {
    Router::new()
        .route("/health", get(health_check))
        .route("/players", get(get_players_handler))
        .route("/players/options", get(get_player_options_handler))
        .route("/players/{id}", get(get_player_handler))
        .route("/teams", get(get_teams_handler))
        .route("/teams/{name}", get(get_team_handler))
        .route("/injuries/summary", get(get_injury_summary_handler))
        .route("/injuries/heatmap", get(get_injury_heatmap_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
        )
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("plstats API is running"))
}

// GET /players - Filtered player table plus the matching dropdown options
#[derive(Deserialize)]
struct PlayersQuery {
    team: Option<String>,     // comma separated
    position: Option<String>, // comma separated
    min_age: Option<u32>,
    max_age: Option<u32>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Serialize)]
struct PlayersView {
    players: Vec<PlayerRecord>,
    options: Vec<PlayerOption>,
}

async fn get_players_handler(
    State(tables): State<SharedTables>,
    Query(params): Query<PlayersQuery>,
) -> Json<ApiResponse<PlayersView>> {
    let filter = PlayerFilter {
        teams: split_list(params.team.as_deref()),
        positions: split_list(params.position.as_deref()),
        min_age: params.min_age,
        max_age: params.max_age,
    };

    let selected = filter.apply(&tables.players);
    let view = PlayersView {
        options: selected.iter().map(|p| PlayerOption::for_player(p)).collect(),
        players: selected.into_iter().cloned().collect(),
    };
    Json(ApiResponse::success(view))
}

// GET /players/options - Teams, positions and age range to filter on
async fn get_player_options_handler(
    State(tables): State<SharedTables>,
) -> Json<ApiResponse<FilterOptions>> {
    Json(ApiResponse::success(filter_options(&tables.players)))
}

type Lookup<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn not_found<T>(message: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(message)))
}

// GET /players/{id} - Player profile
async fn get_player_handler(
    State(tables): State<SharedTables>,
    Path(id): Path<u32>,
) -> Lookup<PlayerRecord> {
    match tables.player(id) {
        Some(player) => Ok(Json(ApiResponse::success(player.clone()))),
        None => Err(not_found(format!("No player with id {}", id))),
    }
}

// GET /teams - Aggregates and reconstructed results for every team
async fn get_teams_handler(
    State(tables): State<SharedTables>,
) -> Json<ApiResponse<Vec<TeamResult>>> {
    Json(ApiResponse::success(tables.teams.clone()))
}

// GET /teams/{name} - Team dashboard in defensive or attacking mode
#[derive(Deserialize)]
struct TeamQuery {
    #[serde(default)]
    mode: StatMode,
}

async fn get_team_handler(
    State(tables): State<SharedTables>,
    Path(name): Path<String>,
    Query(params): Query<TeamQuery>,
) -> Lookup<TeamDashboard> {
    match tables.team(&name) {
        Some(team) => Ok(Json(ApiResponse::success(team_dashboard(team, params.mode)))),
        None => {
            tracing::debug!("Unknown team requested: {}", name);
            Err(not_found(format!("No team named {}", name)))
        }
    }
}

// GET /injuries/summary - Team with most injuries per injury type (null when no data)
async fn get_injury_summary_handler(
    State(tables): State<SharedTables>,
) -> Json<ApiResponse<Vec<InjurySummaryRow>>> {
    match &tables.injuries {
        Some(report) => Json(ApiResponse::success(report.summary.clone())),
        None => Json(ApiResponse::empty()),
    }
}

// GET /injuries/heatmap - Team x injury type counts (null when no data)
async fn get_injury_heatmap_handler(
    State(tables): State<SharedTables>,
) -> Json<ApiResponse<InjuryHeatmap>> {
    match &tables.injuries {
        Some(report) => Json(ApiResponse::success(report.heatmap.clone())),
        None => Json(ApiResponse::empty()),
    }
}
