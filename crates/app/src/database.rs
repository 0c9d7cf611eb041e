//! Database connection management

use std::{future::Future, time::Duration};

use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::{MigrateError, Migrator},
    postgres::{PgConnectOptions, PgPoolOptions},
    query,
};
use thiserror::Error;
use tokio::time::timeout;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// SQL used to bound every statement in the current transaction.
pub const SET_STATEMENT_TIMEOUT_SQL: &str =
    "SELECT set_config('statement_timeout', $1, true)";

/// Default bound for a single storage unit of work.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default bound for establishing the first connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings, resolved once at startup and passed to [`connect`].
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub options: PgConnectOptions,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub storage_timeout: Duration,
}

impl DatabaseSettings {
    #[must_use]
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            max_connections: 10,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            storage_timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }
}

/// A unit of storage work ran past its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{operation} did not complete within {after:?}")]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub after: Duration,
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
    timeout: Duration,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_STORAGE_TIMEOUT)
    }

    #[must_use]
    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction whose statements are cancelled server-side once the storage
    /// timeout elapses.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting the timeout fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(SET_STATEMENT_TIMEOUT_SQL)
            .bind(format!("{}ms", self.timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }

    /// Run `work` under the storage deadline. On expiry the future is dropped, which rolls
    /// back any transaction it still owns.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or [`DeadlineExceeded`] converted into `E`.
    pub async fn within_deadline<T, E, F>(&self, operation: &'static str, work: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DeadlineExceeded>,
    {
        match timeout(self.timeout, work).await {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis(),
                    "storage deadline exceeded"
                );

                Err(DeadlineExceeded {
                    operation,
                    after: self.timeout,
                }
                .into())
            }
        }
    }

    /// Round-trip a trivial query to prove the pool can reach the server.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or the query fails.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }

    /// Close every pooled connection, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connect to `PostgreSQL` and verify the connection with a ping bounded by
/// [`DatabaseSettings::connect_timeout`].
///
/// # Errors
///
/// Returns an error if the connection cannot be established in time.
pub async fn connect(settings: &DatabaseSettings) -> Result<Db, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.connect_timeout)
        .connect_with(settings.options.clone())
        .await?;

    let db = Db::with_timeout(pool, settings.storage_timeout);

    match timeout(settings.connect_timeout, db.ping()).await {
        Ok(result) => result?,
        Err(_elapsed) => return Err(sqlx::Error::PoolTimedOut),
    }

    Ok(db)
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns an error when a migration fails or the applied history diverges.
pub async fn migrate(db: &Db) -> Result<(), MigrateError> {
    MIGRATOR.run(db.pool()).await
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;
    use crate::test::TestDb;

    #[tokio::test]
    async fn within_deadline_passes_through_completed_work() -> testresult::TestResult {
        let test_db = TestDb::new().await;
        let db = Db::with_timeout(test_db.pool().clone(), Duration::from_millis(500));

        let value = db
            .within_deadline("answer", async { Ok::<_, DeadlineExceeded>(42) })
            .await?;

        assert_eq!(value, 42);

        Ok(())
    }

    #[tokio::test]
    async fn within_deadline_reports_expiry() {
        let test_db = TestDb::new().await;
        let db = Db::with_timeout(test_db.pool().clone(), Duration::from_millis(20));

        let result = db
            .within_deadline("stall", pending::<Result<(), DeadlineExceeded>>())
            .await;

        assert_eq!(
            result,
            Err(DeadlineExceeded {
                operation: "stall",
                after: Duration::from_millis(20),
            })
        );
    }

    #[tokio::test]
    async fn statement_timeout_is_applied_to_transactions() -> testresult::TestResult {
        let test_db = TestDb::new().await;
        let db = Db::with_timeout(test_db.pool().clone(), Duration::from_millis(1500));

        let mut tx = db.begin_transaction().await?;

        let setting: String = sqlx::query_scalar("SHOW statement_timeout")
            .fetch_one(&mut *tx)
            .await?;

        assert_eq!(setting, "1500ms");

        Ok(())
    }
}
