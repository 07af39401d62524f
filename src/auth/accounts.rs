//! Account endpoints: signup, login, logout
//!
//! Credentials are argon2-hashed; successful signup or login sets the
//! signed session cookie. Password change/reset flows are delegated
//! to operators and intentionally absent.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::middleware::SESSION_COOKIE;
use super::session::{Session, create_session_token};
use crate::AppState;
use crate::data::{EntityId, User};
use crate::error::AppError;
use crate::forms::{FormErrors, SignupForm};

const POST_LOGIN_LOCATION: &str = "/posts";

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Return path from the login redirect
    pub next: Option<String>,
}

/// Query parameters on the login page
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub next: Option<String>,
}

/// Empty login form, echoing the return path for resubmission
#[derive(Debug, Default, Serialize)]
pub struct LoginFormResponse {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::{SaltString, rand_core::OsRng};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Encryption(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn session_cookie(state: &AppState, session: &Session) -> Result<Cookie<'static>, AppError> {
    let token = create_session_token(session, &state.config.auth.session_secret)?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.config.should_use_secure_cookies());
    Ok(cookie)
}

/// Only accept same-origin paths as a post-login destination.
fn sanitize_next(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => POST_LOGIN_LOCATION,
    }
}

/// POST /auth/signup
///
/// Validates the signup form, rejects taken usernames, then logs the
/// new user in by setting the session cookie.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let valid = form.validate()?;

    if state.db.username_exists(&valid.username).await? {
        let mut errors = FormErrors::new();
        errors.add("username", "This username is already taken.");
        return Err(AppError::Form(errors));
    }

    let user = User {
        id: EntityId::new().0,
        username: valid.username,
        email: valid.email,
        display_name: valid.display_name,
        password_hash: hash_password(&valid.password)?,
        created_at: Utc::now(),
    };
    state.db.insert_user(&user).await?;

    tracing::info!(username = %user.username, "User registered");

    let session = Session::for_user(&user, state.config.auth.session_max_age);
    let cookie = session_cookie(&state, &session)?;

    Ok((jar.add(cookie), Redirect::to(POST_LOGIN_LOCATION)))
}

/// GET /auth/login
///
/// Empty login form; the redirect target for unauthenticated access
/// to protected pages.
pub async fn login_form(Query(params): Query<LoginPageQuery>) -> Json<LoginFormResponse> {
    Json(LoginFormResponse {
        next: params.next,
        ..LoginFormResponse::default()
    })
}

/// POST /auth/login
///
/// Verifies credentials and sets the session cookie. The failure
/// message does not say which of username/password was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let username = form.username.as_deref().unwrap_or("").trim();
    let password = form.password.as_deref().unwrap_or("");

    let user = state
        .db
        .get_user_by_username(username)
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or(AppError::Unauthorized)?;

    let session = Session::for_user(&user, state.config.auth.session_max_age);
    let cookie = session_cookie(&state, &session)?;
    let destination = sanitize_next(form.next.as_deref()).to_string();

    Ok((jar.add(cookie), Redirect::to(&destination)))
}

/// POST /auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");

    (jar.remove(removal), Redirect::to(POST_LOGIN_LOCATION))
}

/// Create authentication router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", get(login_form).post(login))
        .route("/auth/logout", post(logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse").expect("hash");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn next_path_is_sanitized() {
        assert_eq!(sanitize_next(Some("/feed")), "/feed");
        assert_eq!(sanitize_next(Some("//evil.example.com")), "/posts");
        assert_eq!(sanitize_next(Some("https://evil.example.com")), "/posts");
        assert_eq!(sanitize_next(None), "/posts");
    }
}
