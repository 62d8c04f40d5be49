//! Registration, login, and bearer-token sessions.
//!
//! The trip aggregate never sees credentials; it only receives the
//! `user_id` carried by [`AuthenticatedUser`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        session::Session,
        user::{PublicUser, User},
    },
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub full_name: Option<String>,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;
        resolve_session(state, token).await
    }
}

pub async fn register_user(
    state: &AppState,
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<PublicUser, AppError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("email and password required"));
    }

    let existing = sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("user already exists".into()));
    }

    let password_hash = hash_password(password)?;
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, full_name, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(now)
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    Ok(user.into())
}

/// Unknown email and wrong password both come back as `Unauthorized`.
pub async fn authenticate_user(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<PublicUser, AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("email and password required"));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email.trim())
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::Unauthorized)?;

    verify_password(password, &user.password_hash)?;
    Ok(user.into())
}

pub async fn create_session(state: &AppState, user_id: i64) -> Result<Session, AppError> {
    let now = Utc::now();
    let session = Session {
        token: Uuid::new_v4().to_string(),
        user_id,
        created_at: now,
        expires_at: now + Duration::days(state.config.session_ttl_days),
    };

    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&state.db)
        .await?;

    Ok(session)
}

pub async fn resolve_session(
    state: &AppState,
    token: &str,
) -> Result<AuthenticatedUser, AppError> {
    let row = sqlx::query_as::<_, (i64, String, Option<String>)>(
        "SELECT u.user_id, u.email, u.full_name
         FROM sessions s
         JOIN users u ON u.user_id = s.user_id
         WHERE s.token = ? AND s.expires_at > ?",
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(&state.db)
    .await?;

    row.map(|(user_id, email, full_name)| AuthenticatedUser {
        user_id,
        email,
        full_name,
    })
    .ok_or(AppError::Unauthorized)
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| anyhow::anyhow!("stored password hash is malformed: {err}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn password_round_trip_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AppError::Unauthorized)
        ));
    }

    async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        let config = AppConfig {
            database_url: "sqlite::memory:".into(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            session_ttl_days: 7,
        };
        AppState::new(config, pool)
    }

    #[tokio::test]
    async fn session_tokens_resolve_to_their_user() {
        let state = test_state().await;
        let user = register_user(&state, "ana@example.com", "wanderlust", Some("Ana"))
            .await
            .unwrap();

        let session = create_session(&state, user.user_id).await.unwrap();
        let resolved = resolve_session(&state, &session.token).await.unwrap();
        assert_eq!(resolved.user_id, user.user_id);
        assert_eq!(resolved.email, "ana@example.com");

        assert!(matches!(
            resolve_session(&state, "no-such-token").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let state = test_state().await;
        register_user(&state, "ana@example.com", "wanderlust", None)
            .await
            .unwrap();
        assert!(matches!(
            register_user(&state, "ana@example.com", "other", None).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn login_hides_which_part_was_wrong() {
        let state = test_state().await;
        register_user(&state, "ana@example.com", "wanderlust", None)
            .await
            .unwrap();

        assert!(matches!(
            authenticate_user(&state, "ana@example.com", "wrong").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            authenticate_user(&state, "missing@example.com", "wanderlust").await,
            Err(AppError::Unauthorized)
        ));
        let user = authenticate_user(&state, "ana@example.com", "wanderlust")
            .await
            .unwrap();
        assert_eq!(user.email, "ana@example.com");
    }
}
