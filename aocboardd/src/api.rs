//! HTTP API for the aocboard daemon.
//!
//! The command surface of the bot. Provides REST endpoints for:
//! - Health check
//! - Refresh status
//! - Top-N leaderboard
//! - About / join information
//! - Reauthenticate (admin only)

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use aocboard_store::{CredentialStore, LeaderboardCache};

use crate::commands::{self, EntryCount, LeaderboardEntry};
use crate::refresher::{LeaderboardRefresher, RefreshStats};

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
pub struct ApiState {
    /// Leaderboard cache (read only from handlers)
    pub cache: Arc<LeaderboardCache>,
    /// Session cookie holder
    pub credentials: Arc<CredentialStore>,
    /// Background refresher, for status reporting
    pub refresher: Arc<LeaderboardRefresher>,
    /// Static command settings
    pub settings: CommandSettings,
}

/// Settings used to build command replies.
#[derive(Debug, Clone)]
pub struct CommandSettings {
    /// Event site base URL
    pub base_url: String,
    /// Browser link to the full private leaderboard
    pub leaderboard_link: String,
    /// Code for joining the private leaderboard
    pub join_code: String,
    /// Bearer token for administrative commands
    pub admin_token: Option<String>,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Refresh status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub has_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub refresh_interval_secs: u64,
    pub refresh: RefreshStats,
}

/// Query for the leaderboard command.
///
/// `n` is kept as text so that any value reaches the handler and gets clamped
/// there instead of being rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub n: Option<String>,
}

/// Leaderboard command response.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub table: String,
    pub entries: Vec<LeaderboardEntry>,
    pub event_year: i32,
    pub last_updated: DateTime<Utc>,
    pub leaderboard_link: String,
}

/// Plain text reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/leaderboard", get(leaderboard_handler))
        .route("/about", get(about_handler))
        .route("/join", get(join_handler))
        .route("/reauthenticate", post(reauthenticate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Cache and refresh loop status.
async fn status_handler(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        has_cache: state.cache.has_cache(),
        last_updated: state.cache.last_updated(),
        refresh_interval_secs: state.refresher.interval().as_secs(),
        refresh: state.refresher.stats(),
    })
}

/// Top-N members of the cached leaderboard.
async fn leaderboard_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    // One handle for the whole reply, so entries and timestamp agree.
    let snapshot = state
        .cache
        .read()
        .ok_or_else(|| error_response(StatusCode::SERVICE_UNAVAILABLE, commands::NO_CACHE_MESSAGE))?;

    let requested = query
        .n
        .as_deref()
        .map(EntryCount::parse)
        .unwrap_or_default();
    let notice = if requested.clamped {
        debug!(requested = ?query.n, "Invalid number of leaderboard entries requested");
        Some(commands::clamp_notice(&state.settings.leaderboard_link))
    } else {
        None
    };

    let members = snapshot.top_n(requested.count);

    Ok(Json(LeaderboardResponse {
        title: commands::title(requested.count),
        notice,
        table: commands::render_table(members),
        entries: LeaderboardEntry::from_members(members),
        event_year: snapshot.event_year(),
        last_updated: snapshot.last_updated(),
        leaderboard_link: state.settings.leaderboard_link.clone(),
    }))
}

/// Explanation of the event.
async fn about_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: commands::ABOUT_TEXT.to_string(),
    })
}

/// Join instructions.
async fn join_handler(State(state): State<Arc<ApiState>>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: commands::join_message(&state.settings.base_url, &state.settings.join_code),
    })
}

/// Reload the session cookie from the environment.
async fn reauthenticate_handler(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    authorize_admin(&state.settings, &headers)?;

    info!("Session cookie update forced");

    state.credentials.reload().map_err(|e| {
        warn!(error = %e, "Session cookie reload failed");
        error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    Ok(Json(MessageResponse {
        message: "Session cookie reloaded".to_string(),
    }))
}

// =============================================================================
// Helpers
// =============================================================================

fn authorize_admin(settings: &CommandSettings, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = settings.admin_token.as_deref() else {
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "Administrative commands are disabled",
        ));
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

    if provided != expected {
        warn!("Rejected administrative command with wrong token");
        return Err(error_response(StatusCode::FORBIDDEN, "Not authorized"));
    }

    Ok(())
}

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

// =============================================================================
// Tests
// =============================================================================
