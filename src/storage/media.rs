//! Media storage on the local filesystem
//!
//! Handles write, delete, and URL generation for uploaded images.
//! Files are served by a static file server or CDN pointed at the
//! media root; this process only writes them and records paths.

use std::path::PathBuf;

use crate::error::AppError;

/// Media storage service
///
/// Writes uploads beneath the configured root and returns relative
/// paths for persistence.
pub struct MediaStorage {
    /// Directory files are written to
    root: PathBuf,
    /// Public URL prefix, e.g. "https://media.example.com"
    public_url: String,
}

impl MediaStorage {
    /// Create new media storage.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if the root directory cannot be created
    pub fn new(config: &crate::config::MediaConfig) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.root)
            .map_err(|e| AppError::Storage(format!("failed to create media root: {}", e)))?;

        Ok(Self {
            root: config.root.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Store a post image.
    ///
    /// Files land under the posts/ prefix, named by entity ID.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the upload
    /// * `extension` - File extension derived from the MIME type
    /// * `data` - Image bytes
    ///
    /// # Returns
    /// Relative path like "posts/01ARZ3NDEKTSV4RRFFQ69G5FAV.png"
    pub async fn store_post_image(
        &self,
        id: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let relative = format!("posts/{}.{}", id, extension);
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("failed to create media dir: {}", e)))?;
        }

        tokio::fs::write(&target, data)
            .await
            .map_err(|e| AppError::Storage(format!("failed to write media file: {}", e)))?;

        use crate::metrics::MEDIA_UPLOADS_TOTAL;
        MEDIA_UPLOADS_TOTAL.inc();

        Ok(relative)
    }

    /// Delete a stored file.
    ///
    /// Missing files are ignored; a replaced image may already have
    /// been cleaned up out of band.
    pub async fn delete(&self, relative: &str) -> Result<(), AppError> {
        let target = self.root.join(relative);

        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "failed to delete media file: {}",
                e
            ))),
        }
    }

    /// Public URL for a stored relative path.
    pub fn public_url(&self, relative: &str) -> String {
        format!("{}/{}", self.public_url, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &std::path::Path) -> MediaStorage {
        MediaStorage::new(&crate::config::MediaConfig {
            root: dir.to_path_buf(),
            public_url: "https://media.test.example.com/".to_string(),
        })
        .expect("media storage")
    }

    #[tokio::test]
    async fn store_and_delete_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage_in(dir.path());

        let relative = storage
            .store_post_image("01TESTID", "png", b"not-really-a-png")
            .await
            .expect("store");
        assert_eq!(relative, "posts/01TESTID.png");
        assert!(dir.path().join(&relative).exists());

        storage.delete(&relative).await.expect("delete");
        assert!(!dir.path().join(&relative).exists());

        // Deleting again is not an error
        storage.delete(&relative).await.expect("idempotent delete");
    }

    #[tokio::test]
    async fn public_url_strips_trailing_slash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = storage_in(dir.path());

        assert_eq!(
            storage.public_url("posts/a.png"),
            "https://media.test.example.com/posts/a.png"
        );
    }
}
