use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::catalog::{City, CityDetail, CitySearch},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/popular", get(popular))
        .route("/:id", get(detail))
}

async fn search(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(filter): Query<CitySearch>,
) -> Result<Json<Vec<City>>, AppError> {
    let cities = state.catalog.search_cities(&filter).await?;
    Ok(Json(cities))
}

async fn popular(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<City>>, AppError> {
    let cities = state.catalog.popular_cities().await?;
    Ok(Json(cities))
}

async fn detail(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(city_id): Path<i64>,
) -> Result<Json<CityDetail>, AppError> {
    let city = state.catalog.city_with_activities(city_id).await?;
    Ok(Json(city))
}
