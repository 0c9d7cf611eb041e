//! Database Config

use std::time::Duration;

use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use trolley_app::database::DatabaseSettings;
use url::Url;

/// Database settings.
///
/// `DATABASE_URL` wins when set; otherwise the connection is built from the `POSTGRES_*`
/// parts, preferring the dedicated `APP_DB_*` credentials.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// `PostgreSQL` host
    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    /// `PostgreSQL` port
    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    /// `PostgreSQL` database name
    #[arg(long, env = "POSTGRES_DB", default_value = "simple_ecommerce")]
    pub postgres_db: String,

    /// Application role name; falls back to `POSTGRES_USER`
    #[arg(long, env = "APP_DB_USER")]
    pub app_db_user: Option<String>,

    /// Application role password; falls back to `POSTGRES_PASSWORD`
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    pub app_db_password: Option<String>,

    /// Superuser name used when no application role is configured
    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    /// Superuser password used when no application role is configured
    #[arg(
        long,
        env = "POSTGRES_PASSWORD",
        default_value = "postgres",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub postgres_password: String,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Bound for opening the pool and the startup ping, in milliseconds
    #[arg(long, env = "DATABASE_CONNECT_TIMEOUT_MS", default_value_t = 5_000)]
    pub connect_timeout_ms: u64,

    /// Bound for each storage operation, in milliseconds
    #[arg(long, env = "STORAGE_TIMEOUT_MS", default_value_t = 3_000)]
    pub storage_timeout_ms: u64,

    /// Apply pending migrations before serving
    #[arg(long, env = "RUN_MIGRATIONS", default_value_t = false)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    fn dsn(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    fn user(&self) -> &str {
        non_empty(self.app_db_user.as_deref()).unwrap_or(self.postgres_user.as_str())
    }

    fn password(&self) -> &str {
        non_empty(self.app_db_password.as_deref()).unwrap_or(self.postgres_password.as_str())
    }

    /// Connection options for the effective target.
    ///
    /// # Errors
    ///
    /// Returns an error when `DATABASE_URL` is set but cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(dsn) = self.dsn() {
            return dsn.parse();
        }

        Ok(PgConnectOptions::new()
            .host(&self.postgres_host)
            .port(self.postgres_port)
            .username(self.user())
            .password(self.password())
            .database(&self.postgres_db)
            .ssl_mode(PgSslMode::Disable))
    }

    /// The effective target as a URL with every credential masked, safe to log.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        if let Some(dsn) = self.dsn() {
            return redact(dsn);
        }

        let assembled = format!(
            "postgres://{}:{}/{}?sslmode=disable",
            self.postgres_host, self.postgres_port, self.postgres_db
        );

        match Url::parse(&assembled) {
            Ok(mut url) => {
                _ = url.set_username(self.user());
                _ = url.set_password(Some("***"));

                url.to_string()
            }
            Err(_) => "***".to_owned(),
        }
    }

    /// Resolve into the settings the storage layer is built from.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection options cannot be built.
    pub fn settings(&self) -> Result<DatabaseSettings, sqlx::Error> {
        Ok(DatabaseSettings {
            options: self.connect_options()?,
            max_connections: self.max_connections,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            storage_timeout: Duration::from_millis(self.storage_timeout_ms),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Mask the userinfo password and drop any `password` query parameter.
fn redact(dsn: &str) -> String {
    let Ok(mut url) = Url::parse(dsn) else {
        return "***".to_owned();
    };

    if url.password().is_some() {
        _ = url.set_password(Some("***"));
    }

    if url.query_pairs().any(|(key, _)| key == "password") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "password")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    url.to_string()
}
