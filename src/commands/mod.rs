//! Command module - one submodule per CLI subcommand.
//!
//! Each command struct holds its parsed arguments and implements
//! [`CommandExecutor`] for its execution logic.

mod export;
mod keygen;
mod plan;
mod scan;

pub use export::ExportCommand;
pub use keygen::KeygenCommand;
pub use plan::PlanCommand;
pub use scan::ScanCommand;

use anyhow::{bail, Result};

use airsigner::chunk::EcLevel;

/// Trait for command execution.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self) -> Result<()>;
}

/// Parses an error-correction level name from the command line.
pub(crate) fn parse_ec_level(name: &str) -> Result<EcLevel> {
    match name.to_lowercase().as_str() {
        "low" | "l" => Ok(EcLevel::Low),
        "medium" | "m" => Ok(EcLevel::Medium),
        "quartile" | "q" => Ok(EcLevel::Quartile),
        "high" | "h" => Ok(EcLevel::High),
        other => bail!("unknown error-correction level: {other}. Use: low, medium, quartile, high"),
    }
}
