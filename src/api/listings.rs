//! Listing endpoints: index, group listing, profile, follow feed
//!
//! Each fetches a filtered, reverse-chronological page of posts
//! through the pagination helper. The index listing is additionally
//! wrapped by the page cache.

use axum::{
    extract::{Path, Query, State},
    http::{Uri, header},
    response::{IntoResponse, Json, Response},
};

use super::dto::{
    AuthorResponse, GroupListingResponse, GroupResponse, PostResponse, ProfileResponse,
};
use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::data::CachedPage;
use crate::error::AppError;
use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};
use crate::pagination::{Page, PageQuery, PageWindow};

const JSON_CONTENT_TYPE: &str = "application/json";

fn cached_body_response(content_type: &str, body: String) -> Response {
    ([(header::CONTENT_TYPE, content_type.to_string())], body).into_response()
}

/// GET /posts
///
/// All posts, newest first. The serialized page is cached for the
/// configured TTL keyed by path and query, so repeated requests are
/// byte-identical until the entry expires or is explicitly cleared.
pub async fn index(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<PageQuery>,
) -> Result<Response, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/posts"])
        .start_timer();

    let key = crate::data::PageCache::request_key(uri.path(), uri.query());
    if let Some(cached) = state.page_cache.get(&key).await {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/posts", "200"])
            .inc();
        return Ok(cached_body_response(&cached.content_type, cached.body.clone()));
    }

    let total = state.db.count_posts().await?;
    let window = PageWindow::new(total, params.number());
    let rows = state
        .db
        .get_posts_page(window.limit(), window.offset())
        .await?;

    let page: Page<PostResponse> = window.into_page(
        rows.iter()
            .map(|item| PostResponse::from_item(item, &state.media))
            .collect(),
    );
    let body = serde_json::to_string(&page).map_err(|e| AppError::Internal(e.into()))?;

    state
        .page_cache
        .insert(
            key,
            CachedPage {
                content_type: JSON_CONTENT_TYPE.to_string(),
                body: body.clone(),
            },
        )
        .await;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/posts", "200"])
        .inc();

    Ok(cached_body_response(JSON_CONTENT_TYPE, body))
}

/// GET /groups/:slug/posts
pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<GroupListingResponse>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/groups/:slug/posts"])
        .start_timer();

    let group = state
        .db
        .get_group_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let total = state.db.count_group_posts(&group.id).await?;
    let window = PageWindow::new(total, params.number());
    let rows = state
        .db
        .get_group_posts_page(&group.id, window.limit(), window.offset())
        .await?;

    let page = window.into_page(
        rows.iter()
            .map(|item| PostResponse::from_item(item, &state.media))
            .collect(),
    );

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/groups/:slug/posts", "200"])
        .inc();

    Ok(Json(GroupListingResponse {
        group: GroupResponse::from_group(&group),
        page,
    }))
}

/// GET /profiles/:username
///
/// An author's posts plus whether the current viewer follows them
/// (always false for anonymous viewers).
pub async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/profiles/:username"])
        .start_timer();

    let author = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    let following = match &viewer {
        Some(session) => state.db.is_following(&session.user_id, &author.id).await?,
        None => false,
    };

    let total = state.db.count_author_posts(&author.id).await?;
    let window = PageWindow::new(total, params.number());
    let rows = state
        .db
        .get_author_posts_page(&author.id, window.limit(), window.offset())
        .await?;

    let page = window.into_page(
        rows.iter()
            .map(|item| PostResponse::from_item(item, &state.media))
            .collect(),
    );

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/profiles/:username", "200"])
        .inc();

    Ok(Json(ProfileResponse {
        author: AuthorResponse::from_user(&author),
        following,
        page,
    }))
}

/// GET /feed
///
/// Posts by authors the current user follows.
pub async fn follow_feed(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(params): Query<PageQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/feed"])
        .start_timer();

    let total = state.db.count_feed_posts(&session.user_id).await?;
    let window = PageWindow::new(total, params.number());
    let rows = state
        .db
        .get_feed_posts_page(&session.user_id, window.limit(), window.offset())
        .await?;

    let page = window.into_page(
        rows.iter()
            .map(|item| PostResponse::from_item(item, &state.media))
            .collect(),
    );

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/feed", "200"])
        .inc();

    Ok(Json(page))
}
