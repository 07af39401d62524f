//! Post endpoints: detail, create, edit, comment submission

use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Json, Redirect, Response},
};

use super::dto::{
    CommentFormResponse, CommentResponse, PostDetailResponse, PostFormResponse, PostResponse,
};
use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::forms::{CommentForm, PostForm};
use crate::metrics::{HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};
use crate::service::PostService;

fn build_post_service(state: &AppState) -> PostService {
    PostService::new(state.db.clone(), state.media.clone())
}

fn detail_location(post_id: &str) -> String {
    format!("/posts/{}", post_id)
}

/// GET /posts/:id
///
/// Post plus its comments in creation order. Authenticated viewers
/// also get an empty comment form.
pub async fn post_detail(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["GET", "/posts/:id"])
        .start_timer();

    let post = state
        .db
        .get_post_detail(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    let comments = state.db.get_post_comments(&post.id).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["GET", "/posts/:id", "200"])
        .inc();

    Ok(Json(PostDetailResponse {
        post: PostResponse::from_item(&post, &state.media),
        comments: comments.iter().map(CommentResponse::from_item).collect(),
        comment_form: viewer.map(|_| CommentFormResponse::default()),
    }))
}

/// GET /posts/new
///
/// Empty post form for authenticated users.
pub async fn new_post_form(
    CurrentUser(_session): CurrentUser,
) -> Json<PostFormResponse> {
    Json(PostFormResponse::default())
}

/// POST /posts/new
///
/// Create a post from a multipart submission. The author is the
/// current user; success redirects to their profile.
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/posts/new"])
        .start_timer();

    let form = PostForm::from_multipart(multipart).await?;
    let service = build_post_service(&state);
    service.create(&session.user_id, form).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/posts/new", "303"])
        .inc();

    Ok(Redirect::to(&format!("/profiles/{}", session.username)))
}

/// GET /posts/:id/edit
///
/// The edit form prefilled with the post's current values. A
/// non-author is redirected to the detail page instead.
pub async fn edit_post_form(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let post = state
        .db
        .get_post_detail(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    if post.author_id != session.user_id {
        return Ok(Redirect::to(&detail_location(&post.id)).into_response());
    }

    let form = PostFormResponse {
        text: post.text.clone(),
        group: post.group_slug.clone(),
        image_url: post.image_path.as_deref().map(|path| state.media.public_url(path)),
    };

    Ok(Json(form).into_response())
}

/// POST /posts/:id/edit
///
/// Apply an edit. Only the author may modify a post; anyone else is
/// silently redirected to the detail page without changes.
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/posts/:id/edit"])
        .start_timer();

    let post = state.db.get_post(&id).await?.ok_or(AppError::NotFound)?;

    if post.author_id != session.user_id {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["POST", "/posts/:id/edit", "303"])
            .inc();
        return Ok(Redirect::to(&detail_location(&post.id)));
    }

    let form = PostForm::from_multipart(multipart).await?;
    let service = build_post_service(&state);
    service.update(&post, form).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/posts/:id/edit", "303"])
        .inc();

    Ok(Redirect::to(&detail_location(&post.id)))
}

/// POST /posts/:id/comments
///
/// Attach a comment to a post. A blank submission creates nothing
/// and redirects back to the detail page, mirroring how the form
/// page simply re-renders.
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/posts/:id/comments"])
        .start_timer();

    let post = state.db.get_post(&id).await?.ok_or(AppError::NotFound)?;

    if let Some(text) = form.normalized_text() {
        let service = build_post_service(&state);
        service.add_comment(&post.id, &session.user_id, text).await?;
    }

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/posts/:id/comments", "303"])
        .inc();

    Ok(Redirect::to(&detail_location(&post.id)))
}
