use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub city_id: i64,
    pub city_name: String,
    pub country: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub cost_index: Option<f64>,
    pub popularity_score: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub activity_id: i64,
    pub activity_name: String,
    pub city_id: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub estimated_cost: Option<f64>,
    pub duration_hours: Option<f64>,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// City plus its catalog activities, for the city detail view.
#[derive(Debug, Serialize)]
pub struct CityDetail {
    #[serde(flatten)]
    pub city: City,
    pub activities: Vec<Activity>,
}

fn default_city_limit() -> i64 {
    20
}

fn default_activity_limit() -> i64 {
    50
}

#[derive(Debug, Clone, Deserialize)]
pub struct CitySearch {
    pub query: Option<String>,
    pub country: Option<String>,
    #[serde(default = "default_city_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySearch {
    pub city_id: Option<i64>,
    pub category: Option<String>,
    pub min_cost: Option<f64>,
    pub max_cost: Option<f64>,
    pub query: Option<String>,
    #[serde(default = "default_activity_limit")]
    pub limit: i64,
}
