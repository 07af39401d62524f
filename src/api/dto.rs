//! API response shapes
//!
//! Serialized payloads for listing and detail endpoints, plus the
//! form descriptors GET form pages return. Conversions from the
//! joined read models live here so handlers stay thin.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::{CommentListItem, Group, PostListItem, User};
use crate::storage::MediaStorage;

/// Author display info embedded in posts and comments
#[derive(Debug, Clone, Serialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

impl AuthorResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Group reference embedded in posts
#[derive(Debug, Clone, Serialize)]
pub struct GroupRef {
    pub slug: String,
    pub title: String,
}

/// Full group metadata for the group listing header
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl GroupResponse {
    pub fn from_group(group: &Group) -> Self {
        Self {
            id: group.id.clone(),
            slug: group.slug.clone(),
            title: group.title.clone(),
            description: group.description.clone(),
        }
    }
}

/// One post in a listing or detail payload
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub text: String,
    pub author: AuthorResponse,
    pub group: Option<GroupRef>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl PostResponse {
    pub fn from_item(item: &PostListItem, media: &MediaStorage) -> Self {
        let group = match (&item.group_slug, &item.group_title) {
            (Some(slug), Some(title)) => Some(GroupRef {
                slug: slug.clone(),
                title: title.clone(),
            }),
            _ => None,
        };

        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            author: AuthorResponse {
                id: item.author_id.clone(),
                username: item.author_username.clone(),
                display_name: item.author_display_name.clone(),
            },
            group,
            image_url: item.image_path.as_deref().map(|path| media.public_url(path)),
            published_at: item.published_at,
        }
    }
}

/// One comment on the detail page
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_item(item: &CommentListItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            author: AuthorResponse {
                id: item.author_id.clone(),
                username: item.author_username.clone(),
                display_name: item.author_display_name.clone(),
            },
            created_at: item.created_at,
        }
    }
}

/// Empty comment form shown to authenticated viewers
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentFormResponse {
    pub text: String,
}

/// Post form descriptor for the create/edit pages
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormResponse {
    pub text: String,
    /// Currently selected group slug
    pub group: Option<String>,
    /// URL of the currently attached image
    pub image_url: Option<String>,
}

/// Detail page payload
#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    /// Present only for authenticated viewers
    pub comment_form: Option<CommentFormResponse>,
}

/// Group listing payload
#[derive(Debug, Serialize)]
pub struct GroupListingResponse {
    pub group: GroupResponse,
    pub page: crate::pagination::Page<PostResponse>,
}

/// Profile payload
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    /// Whether the current viewer follows this author
    pub following: bool,
    pub page: crate::pagination::Page<PostResponse>,
}
