//! Follow/unfollow endpoints
//!
//! A follow edge is unique per (user, author) pair; creating it twice
//! is a no-op, deleting a missing edge is a 404.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use chrono::Utc;

use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{EntityId, Follow};
use crate::error::AppError;
use crate::metrics::{FOLLOWS_CREATED_TOTAL, HTTP_REQUESTS_TOTAL};

/// POST /profiles/:username/follow
///
/// Get-or-create the follow edge and redirect to the follow feed.
/// Following yourself is a no-op, not an error.
pub async fn follow_author(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, AppError> {
    let author = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    if author.id != session.user_id {
        let follow = Follow {
            id: EntityId::new().0,
            user_id: session.user_id.clone(),
            author_id: author.id.clone(),
            created_at: Utc::now(),
        };

        let created = state.db.insert_follow_if_absent(&follow).await?;
        if created {
            FOLLOWS_CREATED_TOTAL.inc();
            tracing::info!(
                follower = %session.username,
                author = %author.username,
                "Follow created"
            );
        }
    }

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/profiles/:username/follow", "303"])
        .inc();

    Ok(Redirect::to("/feed"))
}

/// POST /profiles/:username/unfollow
///
/// Delete the follow edge and redirect to the author's profile.
/// 404 when the edge (or the author) does not exist.
pub async fn unfollow_author(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, AppError> {
    let author = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    let deleted = state.db.delete_follow(&session.user_id, &author.id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(
        follower = %session.username,
        author = %author.username,
        "Follow removed"
    );

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/profiles/:username/unfollow", "303"])
        .inc();

    Ok(Redirect::to(&format!("/profiles/{}", author.username)))
}
