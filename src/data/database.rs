//! SQLite database operations
//!
//! All database access goes through this module.
//! One method per query, in the style of a thin repository.

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::*;
use crate::error::AppError;

/// Shared column list for post listings.
///
/// Every listing joins author and group display columns so a page
/// renders without follow-up queries per row.
const POST_LIST_COLUMNS: &str = r#"
    p.id, p.text, p.image_path, p.published_at,
    p.author_id, u.username AS author_username, u.display_name AS author_display_name,
    p.group_id, g.slug AS group_slug, g.title AS group_title
"#;

/// Database connection pool wrapper
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, display_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check whether a username is already taken
    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Insert a new group
    pub async fn insert_group(&self, group: &Group) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO post_groups (id, title, slug, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&group.id)
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .bind(group.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get group by slug
    pub async fn get_group_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM post_groups WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Get post by ID
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Get post by ID with joined author and group columns
    pub async fn get_post_detail(&self, id: &str) -> Result<Option<PostListItem>, AppError> {
        let query = format!(
            r#"
            SELECT {POST_LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_groups g ON g.id = p.group_id
            WHERE p.id = ?
            "#
        );

        let post = sqlx::query_as::<_, PostListItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Insert a new post
    pub async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, group_id, text, image_path, published_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.group_id)
        .bind(&post.text)
        .bind(&post.image_path)
        .bind(post.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update a post's editable fields.
    ///
    /// The author column is deliberately not part of this statement;
    /// posts are never reassigned.
    pub async fn update_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE posts
            SET text = ?, group_id = ?, image_path = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.text)
        .bind(&post.group_id)
        .bind(&post.image_path)
        .bind(&post.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Total number of posts
    pub async fn count_posts(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    /// One page of all posts, newest first
    pub async fn get_posts_page(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostListItem>, AppError> {
        let query = format!(
            r#"
            SELECT {POST_LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_groups g ON g.id = p.group_id
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT ? OFFSET ?
            "#
        );

        let posts = sqlx::query_as::<_, PostListItem>(&query)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Number of posts in one group
    pub async fn count_group_posts(&self, group_id: &str) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    /// One page of a group's posts, newest first
    pub async fn get_group_posts_page(
        &self,
        group_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostListItem>, AppError> {
        let query = format!(
            r#"
            SELECT {POST_LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_groups g ON g.id = p.group_id
            WHERE p.group_id = ?
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT ? OFFSET ?
            "#
        );

        let posts = sqlx::query_as::<_, PostListItem>(&query)
            .bind(group_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Number of posts by one author
    pub async fn count_author_posts(&self, author_id: &str) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    /// One page of an author's posts, newest first
    pub async fn get_author_posts_page(
        &self,
        author_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostListItem>, AppError> {
        let query = format!(
            r#"
            SELECT {POST_LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_groups g ON g.id = p.group_id
            WHERE p.author_id = ?
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT ? OFFSET ?
            "#
        );

        let posts = sqlx::query_as::<_, PostListItem>(&query)
            .bind(author_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Number of posts by authors the user follows
    pub async fn count_feed_posts(&self, user_id: &str) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM posts p
            WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }

    /// One page of posts by authors the user follows, newest first
    pub async fn get_feed_posts_page(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<PostListItem>, AppError> {
        let query = format!(
            r#"
            SELECT {POST_LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN post_groups g ON g.id = p.group_id
            WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ?)
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT ? OFFSET ?
            "#
        );

        let posts = sqlx::query_as::<_, PostListItem>(&query)
            .bind(user_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Insert a new comment
    pub async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.author_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All comments on a post, oldest first
    pub async fn get_post_comments(&self, post_id: &str) -> Result<Vec<CommentListItem>, AppError> {
        let comments = sqlx::query_as::<_, CommentListItem>(
            r#"
            SELECT c.id, c.text, c.created_at,
                   c.author_id, u.username AS author_username,
                   u.display_name AS author_display_name
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    /// Total number of comments
    pub async fn count_comments(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    // =========================================================================
    // Follows
    // =========================================================================

    /// Create a follow edge unless it already exists.
    ///
    /// # Returns
    /// `true` if a new edge was created, `false` if the pair was
    /// already present (get-or-create semantics).
    pub async fn insert_follow_if_absent(&self, follow: &Follow) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (id, user_id, author_id, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(&follow.id)
        .bind(&follow.user_id)
        .bind(&follow.author_id)
        .bind(follow.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Delete a follow edge.
    ///
    /// # Returns
    /// `true` if an edge existed and was deleted.
    pub async fn delete_follow(&self, user_id: &str, author_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Whether `user_id` follows `author_id`
    pub async fn is_following(&self, user_id: &str, author_id: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Total number of follow edges
    pub async fn count_follows(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}
