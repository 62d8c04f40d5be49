use std::{env, net::SocketAddr};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub session_ttl_days: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://globetrotter.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let session_ttl_days = env::var("SESSION_TTL_DAYS")
            .ok()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|err| AppError::Config(format!("invalid SESSION_TTL_DAYS: {err}")))
            })
            .transpose()?
            .unwrap_or(7);

        Ok(Self {
            database_url,
            listen_addr,
            session_ttl_days,
        })
    }
}
