use clap::Args;
use trolley_app::database::{self, MIGRATOR};

use crate::cli::ConnectionArgs;

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let db = args.connection.connect().await?;

    database::migrate(&db)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    let latest = MIGRATOR
        .iter()
        .map(|migration| migration.version)
        .max()
        .unwrap_or_default();

    db.close().await;

    println!("schema is at version {latest}");

    Ok(())
}
