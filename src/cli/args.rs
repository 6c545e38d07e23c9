//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Arena - contest schedule, access state and registration from the terminal.
#[derive(Parser)]
#[command(name = "arena")]
#[command(version)]
#[command(about = "Contest access state and registration tools")]
pub struct Cli {
    /// Path to configuration file (defaults to ARENA_CONFIG or config/arena.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse contests with their registration and contest phases
    List(ListArgs),

    /// Fetch a contest and print what the signed-in user may do now
    Status(StatusArgs),

    /// Follow a contest countdown tick by tick
    Watch(WatchArgs),

    /// Register the signed-in user for a contest
    Register(RegistrationArgs),

    /// Withdraw the signed-in user's registration
    Unregister(RegistrationArgs),
}

// -----------------------------------------------------------------------------
// List command
// -----------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Zero-based page of the contest list
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

// -----------------------------------------------------------------------------
// Status command
// -----------------------------------------------------------------------------

#[derive(Args)]
pub struct StatusArgs {
    /// Contest identifier
    #[arg(long)]
    pub contest: String,

    /// Emit JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

// -----------------------------------------------------------------------------
// Watch command
// -----------------------------------------------------------------------------

#[derive(Args)]
pub struct WatchArgs {
    /// Contest identifier
    #[arg(long)]
    pub contest: String,

    /// Stop after this many ticks (runs until Ctrl+C when omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub ticks: Option<u64>,
}

// -----------------------------------------------------------------------------
// Register / unregister commands
// -----------------------------------------------------------------------------

#[derive(Args)]
pub struct RegistrationArgs {
    /// Contest identifier
    #[arg(long)]
    pub contest: String,

    /// Emit the outcome as JSON
    #[arg(long)]
    pub json: bool,
}
