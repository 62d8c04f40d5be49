pub mod activities;
pub mod auth;
pub mod cities;
pub mod trips;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/trips", trips::router())
        .nest("/api/stops", trips::stops_router())
        .nest("/api/cities", cities::router())
        .nest("/api/activities", activities::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
