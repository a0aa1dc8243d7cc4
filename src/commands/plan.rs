//! Plan command: show how a payload would split across frames.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airsigner::chunk::{qr_capacity, ChunkPlan};
use airsigner::header::HEADER_LEN;

use super::{parse_ec_level, CommandExecutor};

/// Show the chunk plan for a payload without encoding it.
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// Payload length in characters (mutually exclusive with --input)
    #[arg(short, long, conflicts_with = "input")]
    pub length: Option<usize>,

    /// Payload file to measure
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// QR symbol version
    #[arg(long, default_value_t = 10)]
    pub qr_version: u32,

    /// Error-correction level: low, medium, quartile, high
    #[arg(long, default_value = "low")]
    pub ec_level: String,
}

impl CommandExecutor for PlanCommand {
    fn execute(&self) -> Result<()> {
        let payload_len = match (self.length, &self.input) {
            (Some(length), _) => length,
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?
                .trim()
                .chars()
                .count(),
            (None, None) => anyhow::bail!("provide --length or --input"),
        };

        let ec_level = parse_ec_level(&self.ec_level)?;
        let plan = ChunkPlan::compute(payload_len, self.qr_version, ec_level)?;

        println!("payload:         {payload_len} characters");
        println!(
            "symbol capacity: {} bytes (version {}, {:?})",
            qr_capacity(self.qr_version, ec_level),
            self.qr_version,
            ec_level
        );
        println!("header:          {HEADER_LEN} bytes per frame");
        println!("chunk capacity:  {} characters", plan.chunk_capacity);
        println!("total chunks:    {}", plan.total_chunks);

        Ok(())
    }
}
