//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    database::{self, DatabaseSettings, Db},
    domain::{
        carts::{CartsService, ValidatingCartsService},
        health::{HealthService, PgHealthService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub health: Arc<dyn HealthService>,
    pub db: Db,
}

impl AppContext {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            carts: Arc::new(ValidatingCartsService::postgres(db.clone())),
            health: Arc::new(PgHealthService::new(db.clone())),
            db,
        }
    }

    /// Build application context from connection settings, optionally migrating first.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn connect(
        settings: &DatabaseSettings,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let db = database::connect(settings)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&db)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        Ok(Self::new(db))
    }
}
