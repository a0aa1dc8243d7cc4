//! Bundle export command: payload in, QR frame sequence out.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airsigner::encoder::BundleEncoder;
use airsigner::qr::{render_frame_ascii, render_frame_to_file, RenderConfig};

use super::{parse_ec_level, CommandExecutor};

/// Export a spend bundle as a sequence of QR frames.
#[derive(Args, Debug)]
pub struct ExportCommand {
    /// Bundle file to export - reads from stdin if not provided
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for frame images (frame-001.png, frame-002.png, ...)
    #[arg(short, long, conflicts_with = "ascii")]
    pub out_dir: Option<PathBuf>,

    /// Print frames as terminal ASCII art instead of writing images
    #[arg(long)]
    pub ascii: bool,

    /// QR symbol version for every frame
    #[arg(long, default_value_t = 10)]
    pub qr_version: u32,

    /// Error-correction level: low, medium, quartile, high
    #[arg(long, default_value = "low")]
    pub ec_level: String,

    /// Append an integrity-hash frame to the sequence
    #[arg(long)]
    pub with_hash: bool,
}

impl CommandExecutor for ExportCommand {
    fn execute(&self) -> Result<()> {
        let payload = match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read bundle from {}", path.display()))?,
            None => {
                eprintln!("Reading bundle from stdin (Ctrl+D to finish):");
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read bundle from stdin")?;
                buffer
            }
        };
        let payload = payload.trim();
        if payload.is_empty() {
            anyhow::bail!("bundle payload cannot be empty");
        }

        let ec_level = parse_ec_level(&self.ec_level)?;
        let encoder = BundleEncoder::new(payload, self.qr_version, ec_level, self.with_hash)
            .context("failed to build frame sequence")?;

        let plan = encoder.plan();
        eprintln!(
            "{} frames ({} payload characters per chunk)",
            encoder.total_parts(),
            plan.chunk_capacity
        );

        let config = RenderConfig {
            version: Some(self.qr_version),
            ec_level,
            ..Default::default()
        };

        if self.ascii {
            for (i, frame) in encoder.parts().iter().enumerate() {
                println!("--- frame {} of {} ---", i + 1, encoder.total_parts());
                println!("{}", render_frame_ascii(frame, &config)?);
            }
            return Ok(());
        }

        match &self.out_dir {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                for (i, frame) in encoder.parts().iter().enumerate() {
                    let path = dir.join(format!("frame-{:03}.png", i + 1));
                    render_frame_to_file(frame, &path, &config)
                        .with_context(|| format!("failed to render {}", path.display()))?;
                }
                eprintln!("Wrote {} frames to {}", encoder.total_parts(), dir.display());
            }
            None => {
                // No output target: print the raw frame strings.
                for frame in encoder.parts() {
                    println!("{frame}");
                }
            }
        }

        Ok(())
    }
}
