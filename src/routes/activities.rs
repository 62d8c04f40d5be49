use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::catalog::{Activity, ActivitySearch},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/categories", get(categories))
        .route("/:id", get(detail))
}

async fn search(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<ActivitySearch>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let activities = state.catalog.search_activities(&filter).await?;
    Ok(Json(activities))
}

async fn categories(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = state.catalog.activity_categories().await?;
    Ok(Json(categories))
}

async fn detail(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(activity_id): Path<i64>,
) -> Result<Json<Activity>, AppError> {
    let activity = state.catalog.get_activity(activity_id).await?;
    Ok(Json(activity))
}
