use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog activity scheduled into a trip stop.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduledActivity {
    pub trip_activity_id: i64,
    pub stop_id: i64,
    pub activity_id: i64,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub actual_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// Scheduled activity joined with its catalog activity's display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduledActivityDetail {
    pub trip_activity_id: i64,
    pub stop_id: i64,
    pub activity_id: i64,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub actual_cost: f64,
    pub created_at: DateTime<Utc>,
    pub activity_name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewScheduledActivity {
    pub activity_id: Option<i64>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub actual_cost: Option<f64>,
}
