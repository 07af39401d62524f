//! Admin endpoints

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;

/// POST /admin/cache/clear
///
/// Drop every cached listing page. The next index request re-renders
/// from the database regardless of remaining TTL.
async fn clear_page_cache(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<StatusCode, AppError> {
    state.page_cache.clear();

    tracing::info!(username = %session.username, "Page cache cleared");

    Ok(StatusCode::NO_CONTENT)
}

/// Create admin router
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/cache/clear", post(clear_page_cache))
}
