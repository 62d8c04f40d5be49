//! Read-only city and activity catalog.
//!
//! The trip aggregate consumes only `resolve_city` / `resolve_activity`; the
//! search surface backs the catalog browsing endpoints.

use sqlx::QueryBuilder;

use crate::{
    db::DbPool,
    error::AppError,
    models::catalog::{Activity, ActivitySearch, City, CityDetail, CitySearch},
};

#[derive(Clone)]
pub struct CatalogService {
    db: DbPool,
}

impl CatalogService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn resolve_city(&self, city_id: i64) -> Result<Option<City>, AppError> {
        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE city_id = ?")
            .bind(city_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(city)
    }

    pub async fn resolve_activity(&self, activity_id: i64) -> Result<Option<Activity>, AppError> {
        let activity = sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE activity_id = ?")
            .bind(activity_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(activity)
    }

    pub async fn search_cities(&self, filter: &CitySearch) -> Result<Vec<City>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM cities WHERE 1=1");

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!("%{query}%");
            builder.push(" AND (city_name LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR country LIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(country) = filter.country.as_deref().filter(|c| !c.is_empty()) {
            builder.push(" AND country = ");
            builder.push_bind(country.to_string());
        }

        builder.push(" ORDER BY popularity_score DESC, city_name LIMIT ");
        builder.push_bind(filter.limit.max(0));

        let cities = builder.build_query_as::<City>().fetch_all(&self.db).await?;
        Ok(cities)
    }

    pub async fn popular_cities(&self) -> Result<Vec<City>, AppError> {
        let cities =
            sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY popularity_score DESC LIMIT 10")
                .fetch_all(&self.db)
                .await?;
        Ok(cities)
    }

    pub async fn city_with_activities(&self, city_id: i64) -> Result<CityDetail, AppError> {
        let city = self
            .resolve_city(city_id)
            .await?
            .ok_or(AppError::NotFound("city"))?;

        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE city_id = ? ORDER BY category, activity_name",
        )
        .bind(city_id)
        .fetch_all(&self.db)
        .await?;

        Ok(CityDetail { city, activities })
    }

    pub async fn search_activities(&self, filter: &ActivitySearch) -> Result<Vec<Activity>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM activities WHERE 1=1");

        if let Some(city_id) = filter.city_id {
            builder.push(" AND city_id = ");
            builder.push_bind(city_id);
        }

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            builder.push(" AND category = ");
            builder.push_bind(category.to_string());
        }

        if let Some(min_cost) = filter.min_cost {
            builder.push(" AND estimated_cost >= ");
            builder.push_bind(min_cost);
        }

        if let Some(max_cost) = filter.max_cost {
            builder.push(" AND estimated_cost <= ");
            builder.push_bind(max_cost);
        }

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!("%{query}%");
            builder.push(" AND (activity_name LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description LIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY activity_name LIMIT ");
        builder.push_bind(filter.limit.max(0));

        let activities = builder
            .build_query_as::<Activity>()
            .fetch_all(&self.db)
            .await?;
        Ok(activities)
    }

    pub async fn activity_categories(&self) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM activities WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    pub async fn get_activity(&self, activity_id: i64) -> Result<Activity, AppError> {
        self.resolve_activity(activity_id)
            .await?
            .ok_or(AppError::NotFound("activity"))
    }
}
