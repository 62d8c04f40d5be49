use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{
        budget::{BudgetLine, NewBudgetLine},
        stop::{NewStop, Stop},
        trip::{NewTrip, Trip, TripDetail, TripPatch, TripSummary},
        trip_activity::{NewScheduledActivity, ScheduledActivity},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/:id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:id/stops", post(add_stop))
        .route("/:id/budget", post(add_budget_line))
}

/// Mounted at `/api/stops`; activity scheduling addresses the stop directly.
pub fn stops_router() -> Router<AppState> {
    Router::new().route("/:id/activities", post(add_scheduled_activity))
}

async fn list_trips(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TripSummary>>, AppError> {
    let trips = state.trips.list_trips(user.user_id).await?;
    Ok(Json(trips))
}

async fn create_trip(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(new): Json<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = state.trips.create_trip(user.user_id, new).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn get_trip(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripDetail>, AppError> {
    let detail = state.trips.get_trip(user.user_id, trip_id).await?;
    Ok(Json(detail))
}

async fn update_trip(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trip_id): Path<i64>,
    Json(patch): Json<TripPatch>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.trips.update_trip(user.user_id, trip_id, patch).await?;
    Ok(Json(trip))
}

async fn delete_trip(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trip_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.trips.delete_trip(user.user_id, trip_id).await?;
    Ok(Json(json!({ "message": "Trip deleted successfully" })))
}

async fn add_stop(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trip_id): Path<i64>,
    Json(new): Json<NewStop>,
) -> Result<(StatusCode, Json<Stop>), AppError> {
    let stop = state.trips.add_stop(user.user_id, trip_id, new).await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

async fn add_budget_line(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trip_id): Path<i64>,
    Json(new): Json<NewBudgetLine>,
) -> Result<(StatusCode, Json<BudgetLine>), AppError> {
    let line = state
        .trips
        .add_budget_line(user.user_id, trip_id, new)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

async fn add_scheduled_activity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(stop_id): Path<i64>,
    Json(new): Json<NewScheduledActivity>,
) -> Result<(StatusCode, Json<ScheduledActivity>), AppError> {
    let activity = state
        .trips
        .add_scheduled_activity(user.user_id, stop_id, new)
        .await?;
    Ok((StatusCode::CREATED, Json(activity)))
}
