//! Trip aggregate service.
//!
//! A trip owns its stops, their scheduled activities, and its budget lines;
//! together they form one consistency boundary. Every operation is scoped by
//! the owning `user_id`, and a trip that exists but belongs to someone else is
//! reported exactly like a trip that does not exist. Mutations run as single
//! statements or inside one transaction, so the aggregate never ends up
//! half-written.

use std::collections::HashMap;

use chrono::Utc;
use tracing::warn;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        budget::{BudgetLine, NewBudgetLine},
        stop::{NewStop, Stop, StopDetail, StopWithCity},
        trip::{NewTrip, Trip, TripDetail, TripPatch, TripSummary},
        trip_activity::{NewScheduledActivity, ScheduledActivity, ScheduledActivityDetail},
    },
    services::catalog::CatalogService,
};

#[derive(Clone)]
pub struct TripService {
    db: DbPool,
    catalog: CatalogService,
}

impl TripService {
    pub fn new(db: DbPool, catalog: CatalogService) -> Self {
        Self { db, catalog }
    }

    pub async fn create_trip(&self, user_id: i64, new: NewTrip) -> Result<Trip, AppError> {
        let trip_name = new
            .trip_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let (Some(trip_name), Some(start_date), Some(end_date)) =
            (trip_name, new.start_date, new.end_date)
        else {
            return Err(AppError::validation(
                "trip_name, start_date and end_date are required",
            ));
        };
        if start_date > end_date {
            return Err(AppError::validation(
                "start_date must not be after end_date",
            ));
        }

        let now = Utc::now();
        let trip = sqlx::query_as::<_, Trip>(
            "INSERT INTO trips (user_id, trip_name, start_date, end_date, description, cover_photo, is_public, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)
             RETURNING *",
        )
        .bind(user_id)
        .bind(trip_name)
        .bind(start_date)
        .bind(end_date)
        .bind(&new.description)
        .bind(&new.cover_photo)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(trip)
    }

    /// Trips owned by the user, newest start date first. The child counts and
    /// budget totals come from per-trip subqueries; a joined aggregate would
    /// multiply budget rows by the stop count.
    pub async fn list_trips(&self, user_id: i64) -> Result<Vec<TripSummary>, AppError> {
        let trips = sqlx::query_as::<_, TripSummary>(
            "SELECT t.*,
                (SELECT COUNT(*) FROM trip_stops ts WHERE ts.trip_id = t.trip_id) AS stop_count,
                COALESCE((SELECT SUM(bb.estimated_amount) FROM budget_breakdown bb
                          WHERE bb.trip_id = t.trip_id), 0.0) AS total_budget
             FROM trips t
             WHERE t.user_id = ?
             ORDER BY t.start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(trips)
    }

    pub async fn get_trip(&self, user_id: i64, trip_id: i64) -> Result<TripDetail, AppError> {
        let trip = self
            .find_owned_trip(user_id, trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))?;

        let stops = sqlx::query_as::<_, StopWithCity>(
            "SELECT ts.*, c.city_name, c.country, c.image_url
             FROM trip_stops ts
             JOIN cities c ON c.city_id = ts.city_id
             WHERE ts.trip_id = ?
             ORDER BY ts.stop_order, ts.stop_id",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;

        let activities = sqlx::query_as::<_, ScheduledActivityDetail>(
            "SELECT ta.*, a.activity_name, a.category, a.description, a.image_url
             FROM trip_activities ta
             JOIN trip_stops ts ON ts.stop_id = ta.stop_id
             JOIN activities a ON a.activity_id = ta.activity_id
             WHERE ts.trip_id = ?
             ORDER BY ta.scheduled_date, ta.scheduled_time",
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;

        let mut by_stop: HashMap<i64, Vec<ScheduledActivityDetail>> = HashMap::new();
        for activity in activities {
            by_stop.entry(activity.stop_id).or_default().push(activity);
        }

        let stops = stops
            .into_iter()
            .map(|stop| StopDetail {
                activities: by_stop.remove(&stop.stop_id).unwrap_or_default(),
                stop,
            })
            .collect();

        let budget_breakdown =
            sqlx::query_as::<_, BudgetLine>("SELECT * FROM budget_breakdown WHERE trip_id = ?")
                .bind(trip_id)
                .fetch_all(&self.db)
                .await?;

        Ok(TripDetail {
            trip,
            stops,
            budget_breakdown,
        })
    }

    /// Field-presence merge: only fields carried by the patch change, and a
    /// present-but-falsy value (`is_public: false`) still applies.
    pub async fn update_trip(
        &self,
        user_id: i64,
        trip_id: i64,
        patch: TripPatch,
    ) -> Result<Trip, AppError> {
        let mut tx = self.db.begin().await?;

        let mut trip =
            sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE trip_id = ? AND user_id = ?")
                .bind(trip_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::NotFound("trip"))?;

        patch.apply(&mut trip);
        if trip.start_date > trip.end_date {
            return Err(AppError::validation(
                "start_date must not be after end_date",
            ));
        }
        trip.updated_at = Utc::now();

        sqlx::query(
            "UPDATE trips
             SET trip_name = ?, start_date = ?, end_date = ?, description = ?,
                 cover_photo = ?, is_public = ?, updated_at = ?
             WHERE trip_id = ?",
        )
        .bind(&trip.trip_name)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(&trip.description)
        .bind(&trip.cover_photo)
        .bind(trip.is_public)
        .bind(trip.updated_at)
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(trip)
    }

    /// Removes the trip and every descendant stop, scheduled activity, and
    /// budget line in one transaction. Child-first, so a failure anywhere
    /// rolls the whole delete back.
    pub async fn delete_trip(&self, user_id: i64, trip_id: i64) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT trip_id FROM trips WHERE trip_id = ? AND user_id = ?",
        )
        .bind(trip_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        if owned.is_none() {
            return Err(AppError::NotFound("trip"));
        }

        sqlx::query(
            "DELETE FROM trip_activities
             WHERE stop_id IN (SELECT stop_id FROM trip_stops WHERE trip_id = ?)",
        )
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM trip_stops WHERE trip_id = ?")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM budget_breakdown WHERE trip_id = ?")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM trips WHERE trip_id = ?")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn add_stop(
        &self,
        user_id: i64,
        trip_id: i64,
        new: NewStop,
    ) -> Result<Stop, AppError> {
        let trip = self
            .find_owned_trip(user_id, trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))?;

        let (Some(city_id), Some(arrival_date), Some(departure_date), Some(stop_order)) = (
            new.city_id,
            new.arrival_date,
            new.departure_date,
            new.stop_order,
        ) else {
            return Err(AppError::validation(
                "city_id, arrival_date, departure_date and stop_order are required",
            ));
        };

        if self.catalog.resolve_city(city_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "city {city_id} does not exist in the catalog"
            )));
        }
        if arrival_date > departure_date {
            return Err(AppError::validation(
                "arrival_date must not be after departure_date",
            ));
        }

        let accommodation_cost = new.accommodation_cost.unwrap_or(0.0);
        let transport_cost = new.transport_cost.unwrap_or(0.0);
        if accommodation_cost < 0.0 || transport_cost < 0.0 {
            return Err(AppError::validation("costs must not be negative"));
        }

        // Stop dates outside the trip range are advisory only.
        if arrival_date < trip.start_date || departure_date > trip.end_date {
            warn!(
                trip_id,
                %arrival_date,
                %departure_date,
                "stop dates fall outside the trip's date range"
            );
        }

        let stop = sqlx::query_as::<_, Stop>(
            "INSERT INTO trip_stops (trip_id, city_id, arrival_date, departure_date, stop_order, accommodation_cost, transport_cost, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(trip_id)
        .bind(city_id)
        .bind(arrival_date)
        .bind(departure_date)
        .bind(stop_order)
        .bind(accommodation_cost)
        .bind(transport_cost)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(stop)
    }

    /// Ownership is resolved transitively: the stop must belong to a trip the
    /// user owns, checked with a single join. A stop reachable through someone
    /// else's trip is indistinguishable from a missing one.
    pub async fn add_scheduled_activity(
        &self,
        user_id: i64,
        stop_id: i64,
        new: NewScheduledActivity,
    ) -> Result<ScheduledActivity, AppError> {
        let owned_stop = sqlx::query_scalar::<_, i64>(
            "SELECT ts.stop_id
             FROM trip_stops ts
             JOIN trips t ON t.trip_id = ts.trip_id
             WHERE ts.stop_id = ? AND t.user_id = ?",
        )
        .bind(stop_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        if owned_stop.is_none() {
            return Err(AppError::NotFound("stop"));
        }

        let Some(activity_id) = new.activity_id else {
            return Err(AppError::validation("activity_id is required"));
        };
        if self.catalog.resolve_activity(activity_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "activity {activity_id} does not exist in the catalog"
            )));
        }

        let actual_cost = new.actual_cost.unwrap_or(0.0);
        if actual_cost < 0.0 {
            return Err(AppError::validation("actual_cost must not be negative"));
        }

        let activity = sqlx::query_as::<_, ScheduledActivity>(
            "INSERT INTO trip_activities (stop_id, activity_id, scheduled_date, scheduled_time, actual_cost, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(stop_id)
        .bind(activity_id)
        .bind(new.scheduled_date)
        .bind(new.scheduled_time)
        .bind(actual_cost)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(activity)
    }

    pub async fn add_budget_line(
        &self,
        user_id: i64,
        trip_id: i64,
        new: NewBudgetLine,
    ) -> Result<BudgetLine, AppError> {
        if self.find_owned_trip(user_id, trip_id).await?.is_none() {
            return Err(AppError::NotFound("trip"));
        }

        let category = new
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let Some(category) = category else {
            return Err(AppError::validation("category is required"));
        };
        let estimated_amount = new.estimated_amount.unwrap_or(0.0);
        if estimated_amount < 0.0 {
            return Err(AppError::validation(
                "estimated_amount must not be negative",
            ));
        }

        let line = sqlx::query_as::<_, BudgetLine>(
            "INSERT INTO budget_breakdown (trip_id, category, estimated_amount)
             VALUES (?, ?, ?)
             RETURNING *",
        )
        .bind(trip_id)
        .bind(category)
        .bind(estimated_amount)
        .fetch_one(&self.db)
        .await?;

        Ok(line)
    }

    async fn find_owned_trip(
        &self,
        user_id: i64,
        trip_id: i64,
    ) -> Result<Option<Trip>, AppError> {
        let trip =
            sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE trip_id = ? AND user_id = ?")
                .bind(trip_id)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        Ok(trip)
    }
}
