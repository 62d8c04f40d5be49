use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{auth, error::AppError, models::user::PublicUser, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    full_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: PublicUser,
}

async fn register(
    State(state): State<AppState>,
    Json(form): Json<Credentials>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = auth::register_user(
        &state,
        &form.email,
        &form.password,
        form.full_name.as_deref(),
    )
    .await?;
    let session = auth::create_session(&state, user.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: session.token,
            user,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(form): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = auth::authenticate_user(&state, &form.email, &form.password).await?;
    let session = auth::create_session(&state, user.user_id).await?;
    Ok(Json(AuthResponse {
        token: session.token,
        user,
    }))
}
