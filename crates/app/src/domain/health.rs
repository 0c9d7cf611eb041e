//! Health probes.

use async_trait::async_trait;
use mockall::automock;

use crate::{database::Db, domain::carts::PersistenceError};

#[derive(Debug, Clone)]
pub struct PgHealthService {
    db: Db,
}

impl PgHealthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthService for PgHealthService {
    async fn check_database(&self) -> Result<(), PersistenceError> {
        self.db
            .within_deadline("ping", async {
                self.db.ping().await?;

                Ok::<_, PersistenceError>(())
            })
            .await
    }
}

#[automock]
#[async_trait]
pub trait HealthService: Send + Sync {
    /// Confirm the database answers within the storage deadline.
    async fn check_database(&self) -> Result<(), PersistenceError>;
}
