//! Airsigner - QR transport for an airgapped signer
//!
//! CLI front end over the airsigner library: export bundles as QR frame
//! sequences, reassemble scanned frames, plan chunking, and drive the
//! external signer tools for key generation.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{CommandExecutor, ExportCommand, KeygenCommand, PlanCommand, ScanCommand};

/// Airsigner - move keys and spend bundles over QR codes
#[derive(Parser)]
#[command(name = "airsigner")]
#[command(version)]
#[command(about = "Multi-part QR transport for an airgapped key/bundle signer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a spend bundle as a sequence of QR frames
    Export(ExportCommand),
    /// Reassemble a transfer from scanned QR frames
    Scan(ScanCommand),
    /// Show the chunk plan for a payload without encoding it
    Plan(PlanCommand),
    /// Generate a key pair with the external signer tools
    Keygen(KeygenCommand),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Export(cmd) => cmd.execute(),
        Commands::Scan(cmd) => cmd.execute(),
        Commands::Plan(cmd) => cmd.execute(),
        Commands::Keygen(cmd) => cmd.execute(),
    }
}
