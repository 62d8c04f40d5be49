use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::trip_activity::ScheduledActivityDetail;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stop {
    pub stop_id: i64,
    pub trip_id: i64,
    pub city_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub stop_order: i64,
    pub accommodation_cost: f64,
    pub transport_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// Stop row joined with its city's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StopWithCity {
    pub stop_id: i64,
    pub trip_id: i64,
    pub city_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub stop_order: i64,
    pub accommodation_cost: f64,
    pub transport_cost: f64,
    pub created_at: DateTime<Utc>,
    pub city_name: String,
    pub country: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StopDetail {
    #[serde(flatten)]
    pub stop: StopWithCity,
    pub activities: Vec<ScheduledActivityDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStop {
    pub city_id: Option<i64>,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub stop_order: Option<i64>,
    pub accommodation_cost: Option<f64>,
    pub transport_cost: Option<f64>,
}
