use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{budget::BudgetLine, stop::StopDetail};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub trip_id: i64,
    pub user_id: i64,
    pub trip_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub cover_photo: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trip row annotated for list views: child stop count plus the summed
/// budget lines (0 when the trip has none).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TripSummary {
    pub trip_id: i64,
    pub user_id: i64,
    pub trip_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub cover_photo: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stop_count: i64,
    pub total_budget: f64,
}

/// Full read view of the aggregate: the trip, its ordered stops with their
/// scheduled activities, and the budget breakdown.
#[derive(Debug, Serialize)]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Trip,
    pub stops: Vec<StopDetail>,
    pub budget_breakdown: Vec<BudgetLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTrip {
    pub trip_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub cover_photo: Option<String>,
}

/// Partial update for a trip. The merge is field-presence based: an absent
/// field keeps the stored value, a present field applies even when falsy
/// (`is_public: false` must stick). The nullable columns use a double option
/// so `"description": null` clears the value while omitting it leaves it
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripPatch {
    pub trip_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub cover_photo: Option<Option<String>>,
    pub is_public: Option<bool>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        self.trip_name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
            && self.cover_photo.is_none()
            && self.is_public.is_none()
    }

    pub fn apply(&self, trip: &mut Trip) {
        if let Some(name) = &self.trip_name {
            trip.trip_name = name.clone();
        }
        if let Some(start) = self.start_date {
            trip.start_date = start;
        }
        if let Some(end) = self.end_date {
            trip.end_date = end;
        }
        if let Some(description) = &self.description {
            trip.description = description.clone();
        }
        if let Some(cover) = &self.cover_photo {
            trip.cover_photo = cover.clone();
        }
        if let Some(public) = self.is_public {
            trip.is_public = public;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trip() -> Trip {
        Trip {
            trip_id: 1,
            user_id: 1,
            trip_name: "Europe".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            description: Some("two weeks".into()),
            cover_photo: None,
            is_public: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn absent_fields_keep_stored_values() {
        let mut trip = sample_trip();
        let patch: TripPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        patch.apply(&mut trip);
        assert_eq!(trip.trip_name, "Europe");
        assert!(trip.is_public);
        assert_eq!(trip.description.as_deref(), Some("two weeks"));
    }

    #[test]
    fn false_is_public_still_applies() {
        let mut trip = sample_trip();
        let patch: TripPatch = serde_json::from_str(r#"{"is_public": false}"#).unwrap();
        patch.apply(&mut trip);
        assert!(!trip.is_public);
    }

    #[test]
    fn null_clears_nullable_field_but_omission_does_not() {
        let mut trip = sample_trip();
        let patch: TripPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        patch.apply(&mut trip);
        assert_eq!(trip.description, None);

        let mut other = sample_trip();
        let patch: TripPatch = serde_json::from_str(r#"{"trip_name": "Asia"}"#).unwrap();
        patch.apply(&mut other);
        assert_eq!(other.trip_name, "Asia");
        assert_eq!(other.description.as_deref(), Some("two weeks"));
    }
}
