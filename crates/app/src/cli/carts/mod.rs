use clap::{Args, Subcommand};

mod show;

#[derive(Debug, Args)]
pub(crate) struct CartsCommand {
    #[command(subcommand)]
    command: CartsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartsSubcommand {
    /// Print a cart and its lines
    Show(show::ShowArgs),
}

pub(crate) async fn run(command: CartsCommand) -> Result<(), String> {
    match command.command {
        CartsSubcommand::Show(args) => show::run(args).await,
    }
}
