//! Arena - unified CLI entrypoint.
//!
//! Usage:
//!   arena list [--page N] [--json]
//!   arena status --contest <id> [--json]
//!   arena watch --contest <id> [--ticks N]
//!   arena register --contest <id>
//!   arena unregister --contest <id>

use anyhow::Result;
use arena::cli::commands::{run_list, run_registration_command, run_status, run_watch};
use arena::cli::{Cli, Commands};
use arena::contest::RegistrationAction;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::List(args) => run_list(config, args).await,
        Commands::Status(args) => run_status(config, args).await,
        Commands::Watch(args) => run_watch(config, args).await,
        Commands::Register(args) => {
            run_registration_command(config, args, RegistrationAction::Register).await
        }
        Commands::Unregister(args) => {
            run_registration_command(config, args, RegistrationAction::Unregister).await
        }
    }
}
