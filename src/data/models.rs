//! Data models
//!
//! Rust structs representing database entities and joined read
//! models. All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered author
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Group
// =============================================================================

/// A named category posts can belong to
///
/// Stored in the `post_groups` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: String,
    pub title: String,
    /// URL-safe unique identifier
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Post
// =============================================================================

/// An authored text entry, optionally grouped and illustrated
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    /// Optional group membership
    pub group_id: Option<String>,
    pub text: String,
    /// Relative media path of the attached image, if any
    pub image_path: Option<String>,
    /// Auto-set at creation; listings order by this, descending
    pub published_at: DateTime<Utc>,
}

/// A post row joined with author and group display columns
///
/// Listings and the detail page read this shape so rendering never
/// needs follow-up queries per row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostListItem {
    pub id: String,
    pub text: String,
    pub image_path: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author_id: String,
    pub author_username: String,
    pub author_display_name: Option<String>,
    pub group_id: Option<String>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

// =============================================================================
// Comment
// =============================================================================

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A comment row joined with author display columns
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentListItem {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
    pub author_username: String,
    pub author_display_name: Option<String>,
}

// =============================================================================
// Follow
// =============================================================================

/// A directed subscription edge from one user to another
///
/// Unique per (user, author) pair; self-follow is rejected at the
/// handler level.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: String,
    /// The follower
    pub user_id: String,
    /// The followed author
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}
