//! Throwaway `PostgreSQL` databases for integration tests.

use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

use crate::database::MIGRATOR;

const USER: &str = "trolley_test";
const PASSWORD: &str = "trolley_test_password";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);
static DROPPER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);
static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Database names are interpolated into DDL, so only plain identifiers are accepted.
fn validate_database_name(name: &str) -> Result<(), String> {
    let Some(first) = name.chars().next() else {
        return Err("database name cannot be empty".to_string());
    };

    if name.len() > 63 {
        return Err(format!("database name `{name}` exceeds 63 bytes"));
    }

    if !(first.is_ascii_lowercase() || first == '_') {
        return Err(format!("database name `{name}` must start with a-z or `_`"));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(format!("database name `{name}` contains invalid characters"));
    }

    Ok(())
}

fn host() -> String {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
}

async fn server_url(database: &str) -> String {
    let container = CONTAINER
        .get_or_init(|| async {
            PostgresImage::default()
                .with_user(USER)
                .with_password(PASSWORD)
                .with_db_name(USER)
                .with_tag("17-alpine")
                .start()
                .await
                .expect("postgres container should start")
        })
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("postgres port should be mapped");

    format!("postgresql://{USER}:{PASSWORD}@{}:{port}/{database}", host())
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if CONTAINER.get().is_none() || validate_database_name(name).is_err() {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

fn dropper() -> Option<&'static mpsc::UnboundedSender<String>> {
    DROPPER.get()
}

async fn init_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("failed to drop test database `{name}`: {error}");
            }
        }
    });

    sender
}

/// A freshly migrated database inside the shared test container.
///
/// Every test gets its own database, so services may commit freely. The database is
/// dropped in the background once the `TestDb` goes out of scope.
#[derive(Debug)]
pub struct TestDb {
    pub pool: PgPool,
    pub name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = dropper() {
            _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after the epoch")
            .as_nanos();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self::named(&format!("trolley_test_{nanos}_{sequence}")).await
    }

    pub async fn named(name: &str) -> Self {
        DROPPER.get_or_init(init_dropper).await;

        validate_database_name(name).expect("test database name should be valid");

        let mut admin = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("admin connection should open");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("test database should be created");

        admin.close().await.expect("admin connection should close");

        let pool = PgPool::connect(&server_url(name).await)
            .await
            .expect("test database pool should connect");

        MIGRATOR
            .run(&pool)
            .await
            .expect("migrations should apply to test database");

        Self {
            pool,
            name: name.to_string(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_generated_style_names() {
        assert!(validate_database_name("trolley_test_1700000000_3").is_ok());
        assert!(validate_database_name("_scratch").is_ok());
    }

    #[test]
    fn rejects_names_that_need_quoting() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("Upper").is_err());
        assert!(validate_database_name("quote\"d").is_err());
    }

    #[tokio::test]
    async fn fresh_database_has_cart_tables() {
        let test_db = TestDb::new().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name <> '_sqlx_migrations' \
             ORDER BY table_name",
        )
        .fetch_all(test_db.pool())
        .await
        .expect("table listing should succeed");

        assert_eq!(tables, ["cart_items", "carts", "products"]);
    }
}
