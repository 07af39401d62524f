//! API layer
//!
//! HTTP handlers for:
//! - Listings (index, group, profile, follow feed)
//! - Post detail, create, edit, comments
//! - Follow/unfollow
//! - Admin and metrics endpoints

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

mod admin;
mod dto;
mod follows;
mod listings;
pub mod metrics;
mod posts;

pub use dto::*;

pub use admin::admin_router;
pub use metrics::metrics_router;

/// Create the blog router
///
/// Routes are split into public reads and authenticated writes;
/// authentication is enforced by the `CurrentUser` extractor in the
/// individual handlers.
pub fn blog_router() -> Router<AppState> {
    // Public endpoints (no authentication required)
    let public_routes = Router::new()
        .route("/posts", get(listings::index))
        .route("/groups/:slug/posts", get(listings::group_posts))
        .route("/profiles/:username", get(listings::profile))
        .route("/posts/:id", get(posts::post_detail));

    // Authenticated endpoints
    let authenticated_routes = Router::new()
        .route(
            "/posts/new",
            get(posts::new_post_form).post(posts::create_post),
        )
        .route(
            "/posts/:id/edit",
            get(posts::edit_post_form).post(posts::update_post),
        )
        .route("/posts/:id/comments", post(posts::add_comment))
        .route("/feed", get(listings::follow_feed))
        .route("/profiles/:username/follow", post(follows::follow_author))
        .route(
            "/profiles/:username/unfollow",
            post(follows::unfollow_author),
        );

    public_routes.merge(authenticated_routes)
}
