//! Rollcall CLI - operator tool for the face-attendance roster.

use clap::{Parser, Subcommand};

mod commands;

use commands::{
    CheckinCommand, EnrollCommand, EventsCommand, IdentifyCommand, ImportCommand, ListCommand,
    RebindCommand, RemoveCommand,
};

/// Rollcall CLI - operator tool for the face-attendance roster.
///
/// Enrollment records and attendance events live in a single database file.
/// Descriptor vectors are read from files (JSON or YAML) produced by the
/// external extraction pipeline; this tool never touches images.
///
/// Thresholds, embedding dimensionality, and the check-in dedup window come
/// from an optional config file and default to calibration starting points.
#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Face-attendance roster tool")]
#[command(version)]
pub struct Cli {
    /// Roster database file
    #[arg(long, global = true, default_value = "rollcall.redb")]
    pub db: String,

    /// Config file with thresholds (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input embedding or roster file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enroll a new identity from an embedding file
    Enroll(EnrollCommand),
    /// Record a check-in from an embedding file
    Checkin(CheckinCommand),
    /// Score an embedding against the catalog without writing anything
    Identify(IdentifyCommand),
    /// List enrolled identities
    List(ListCommand),
    /// Replace an enrolled identity's embedding (photo re-capture)
    Rebind(RebindCommand),
    /// Remove an enrolled identity
    Remove(RemoveCommand),
    /// Show recent attendance events
    Events(EventsCommand),
    /// Bulk-enroll identities from a roster file
    Import(ImportCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Commands::Enroll(cmd) => cmd.run(&cli).await,
        Commands::Checkin(cmd) => cmd.run(&cli).await,
        Commands::Identify(cmd) => cmd.run(&cli).await,
        Commands::List(cmd) => cmd.run(&cli).await,
        Commands::Rebind(cmd) => cmd.run(&cli).await,
        Commands::Remove(cmd) => cmd.run(&cli).await,
        Commands::Events(cmd) => cmd.run(&cli).await,
        Commands::Import(cmd) => cmd.run(&cli).await,
    }
}
