//! Scan command: frame images or strings in, reassembled payload out.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airsigner::decoder::{DecodeStatus, FrameDecoder, PayloadKind};
use airsigner::qr::scan_image_file;

use super::CommandExecutor;

/// Reassemble a transfer from scanned QR frames.
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Frame image files, in any order; frame strings are read from stdin
    /// (one per line) when no images are given
    pub images: Vec<PathBuf>,

    /// Write the reassembled payload here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Passphrase for decrypting an encrypted key export
    #[arg(short, long)]
    pub passphrase: Option<String>,
}

impl ScanCommand {
    fn collect_frames(&self) -> Result<Vec<String>> {
        if self.images.is_empty() {
            eprintln!("Reading frame strings from stdin (one per line, Ctrl+D to finish):");
            let mut frames = Vec::new();
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read frame from stdin")?;
                let line = line.trim();
                if !line.is_empty() {
                    frames.push(line.to_string());
                }
            }
            return Ok(frames);
        }

        let mut frames = Vec::new();
        for path in &self.images {
            match scan_image_file(path) {
                Ok(frame) => frames.push(frame),
                // Unreadable images are noise, same as on-device scanning.
                Err(e) => eprintln!("{}: {e}", path.display()),
            }
        }
        Ok(frames)
    }
}

impl CommandExecutor for ScanCommand {
    fn execute(&self) -> Result<()> {
        let frames = self.collect_frames()?;
        if frames.is_empty() {
            anyhow::bail!("no frames to decode");
        }

        let mut decoder = FrameDecoder::new();
        for frame in &frames {
            let status = decoder.add(frame);
            eprintln!("{status:?} ({:.0}%)", decoder.progress_percent());
            if status == DecodeStatus::Complete {
                break;
            }
        }

        if !decoder.is_complete() {
            anyhow::bail!(
                "transfer incomplete at {:.0}%; keep scanning",
                decoder.progress_percent()
            );
        }

        if let Some(verified) = decoder.verify_integrity() {
            if verified {
                eprintln!("Integrity hash verified");
            } else {
                anyhow::bail!("integrity hash mismatch: payload is corrupt");
            }
        }

        let payload = match (decoder.kind(), &self.passphrase) {
            (Some(PayloadKind::EncryptedKeyMaterial), Some(passphrase)) => decoder
                .decrypt_key(passphrase)
                .context("failed to decrypt key export")?,
            _ => decoder.payload(),
        };

        match &self.output {
            Some(path) => {
                fs::write(path, &payload)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Wrote payload to {}", path.display());
            }
            None => println!("{payload}"),
        }

        Ok(())
    }
}
