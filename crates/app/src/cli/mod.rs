use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgConnectOptions;
use trolley_app::database::{self, DatabaseSettings, Db};

mod carts;
mod db;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Carts(carts::CartsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Carts(command) => carts::run(command).await,
        }
    }
}

/// Connection flags shared by every subcommand that talks to `PostgreSQL`.
#[derive(Debug, Args)]
pub(crate) struct ConnectionArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Upper bound for a single storage operation, in milliseconds
    #[arg(long, env = "STORAGE_TIMEOUT_MS", default_value_t = 3_000)]
    storage_timeout_ms: u64,
}

impl ConnectionArgs {
    pub(crate) async fn connect(&self) -> Result<Db, String> {
        let options = self
            .database_url
            .parse::<PgConnectOptions>()
            .map_err(|error| format!("invalid database url: {error}"))?;

        let settings = DatabaseSettings {
            storage_timeout: Duration::from_millis(self.storage_timeout_ms),
            ..DatabaseSettings::new(options)
        };

        database::connect(&settings)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}
