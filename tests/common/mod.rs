//! Common test utilities for E2E tests

use chrono::Utc;
use inkpost::auth::session::{Session, create_session_token};
use inkpost::data::{EntityId, Group, Post, User};
use inkpost::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// 2x1 pixel GIF, the smallest upload the image field accepts
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server with the default 20s page cache TTL
    pub async fn new() -> Self {
        Self::with_cache_ttl(20).await
    }

    /// Create a new test server instance
    pub async fn with_cache_ttl(index_ttl_seconds: u64) -> Self {
        // Temporary directory for test database and media root
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let media_root = temp_dir.path().join("media");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            media: config::MediaConfig {
                root: media_root,
                public_url: "/media".to_string(),
            },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604800,
            },
            cache: config::CacheConfig { index_ttl_seconds },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config.clone()).await.unwrap();

        // HTTP client; redirects stay visible so tests can assert them
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = inkpost::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Create a test user directly in the database
    ///
    /// The stored hash is not a real argon2 hash; tests that need to
    /// exercise login go through POST /auth/signup instead.
    pub async fn create_user(&self, username: &str) -> User {
        let user = User {
            id: EntityId::new().0,
            username: username.to_string(),
            email: format!("{}@test.example.com", username),
            display_name: Some(format!("Test {}", username)),
            password_hash: "unusable-test-hash".to_string(),
            created_at: Utc::now(),
        };
        self.state.db.insert_user(&user).await.unwrap();
        user
    }

    /// Create a test group directly in the database
    pub async fn create_group(&self, slug: &str, title: &str) -> Group {
        let group = Group {
            id: EntityId::new().0,
            title: title.to_string(),
            slug: slug.to_string(),
            description: format!("Description for {}", title),
            created_at: Utc::now(),
        };
        self.state.db.insert_group(&group).await.unwrap();
        group
    }

    /// Create a test post directly in the database
    pub async fn create_post(&self, author: &User, group: Option<&Group>, text: &str) -> Post {
        let post = Post {
            id: EntityId::new().0,
            author_id: author.id.clone(),
            group_id: group.map(|g| g.id.clone()),
            text: text.to_string(),
            image_path: None,
            published_at: Utc::now(),
        };
        self.state.db.insert_post(&post).await.unwrap();
        post
    }

    /// Create a signed session token for a user
    pub fn token_for(&self, user: &User) -> String {
        let session = Session::for_user(user, self.state.config.auth.session_max_age);
        create_session_token(&session, &self.state.config.auth.session_secret)
            .expect("Failed to create test token")
    }

    /// Bearer header value for a user
    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }
}

/// Assert a response is a redirect to the given location.
pub fn assert_redirect(response: &reqwest::Response, location: &str) {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}

/// Assert a response redirects to the login page with a return path.
pub fn assert_login_redirect(response: &reqwest::Response) {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        location.starts_with("/auth/login?next="),
        "expected login redirect, got {}",
        location
    );
}
