use crate::{
    config::AppConfig,
    db::DbPool,
    services::{catalog::CatalogService, trips::TripService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub catalog: CatalogService,
    pub trips: TripService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let catalog = CatalogService::new(db.clone());
        let trips = TripService::new(db.clone(), catalog.clone());
        Self {
            config,
            db,
            catalog,
            trips,
        }
    }
}
