//! Post service
//!
//! Business logic for creating and editing posts and their comments:
//! form validation, group resolution, image storage, persistence.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Comment, Database, EntityId, Group, Post};
use crate::error::AppError;
use crate::forms::{FormErrors, ImageUpload, PostForm};
use crate::metrics::{COMMENTS_CREATED_TOTAL, POSTS_CREATED_TOTAL};
use crate::storage::MediaStorage;

/// Post service
pub struct PostService {
    db: Arc<Database>,
    media: Arc<MediaStorage>,
}

impl PostService {
    /// Create new post service
    pub fn new(db: Arc<Database>, media: Arc<MediaStorage>) -> Self {
        Self { db, media }
    }

    /// Resolve an optional group slug to the group row.
    ///
    /// An unknown slug is a field error, not a 404: the form is
    /// re-rendered with the problem attached to the group field.
    async fn resolve_group(
        &self,
        slug: Option<&str>,
        errors: &mut FormErrors,
    ) -> Result<Option<Group>, AppError> {
        let Some(slug) = slug else {
            return Ok(None);
        };

        match self.db.get_group_by_slug(slug).await? {
            Some(group) => Ok(Some(group)),
            None => {
                errors.add("group", format!("Unknown group: {}", slug));
                Ok(None)
            }
        }
    }

    /// Write the uploaded image and return its relative path.
    async fn store_image(&self, image: &ImageUpload) -> Result<String, AppError> {
        let extension = image.extension().ok_or_else(|| {
            AppError::Validation(format!("Unsupported image type: {}", image.content_type))
        })?;

        self.media
            .store_post_image(&EntityId::new().0, extension, &image.bytes)
            .await
    }

    /// Create a post from a validated submission.
    ///
    /// The author is always the current user; the publish timestamp
    /// is set here and never supplied by the client.
    pub async fn create(&self, author_id: &str, form: PostForm) -> Result<Post, AppError> {
        let mut errors = form.validate();
        let group = self.resolve_group(form.group.as_deref(), &mut errors).await?;
        errors.into_result()?;

        let image_path = match &form.image {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            group_id: group.map(|g| g.id),
            text: form.text.trim().to_string(),
            image_path,
            published_at: Utc::now(),
        };
        self.db.insert_post(&post).await?;

        POSTS_CREATED_TOTAL.inc();
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

        Ok(post)
    }

    /// Apply an edit submission to an existing post.
    ///
    /// Caller is responsible for the author check; this method only
    /// touches text, group and image. A replaced image file is
    /// deleted from storage.
    pub async fn update(&self, post: &Post, form: PostForm) -> Result<Post, AppError> {
        let mut errors = form.validate();
        let group = self.resolve_group(form.group.as_deref(), &mut errors).await?;
        errors.into_result()?;

        let mut updated = post.clone();
        updated.text = form.text.trim().to_string();
        updated.group_id = group.map(|g| g.id);

        if let Some(image) = &form.image {
            let new_path = self.store_image(image).await?;
            if let Some(old_path) = updated.image_path.replace(new_path) {
                self.media.delete(&old_path).await?;
            }
        }

        self.db.update_post(&updated).await?;

        tracing::info!(post_id = %updated.id, "Post updated");

        Ok(updated)
    }

    /// Attach a comment to a post.
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        text: String,
    ) -> Result<Comment, AppError> {
        let comment = Comment {
            id: EntityId::new().0,
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            text,
            created_at: Utc::now(),
        };
        self.db.insert_comment(&comment).await?;

        COMMENTS_CREATED_TOTAL.inc();

        Ok(comment)
    }
}
