//! Keygen command: generate a key pair and optionally export it as a QR.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use airsigner::crypto::passphrase;
use airsigner::hsm::Key;
use airsigner::qr::{render_frame_to_file, RenderConfig};

use super::CommandExecutor;

/// Generate a key pair with the external signer tools.
#[derive(Args, Debug)]
pub struct KeygenCommand {
    /// Encrypt the private key export under this passphrase
    #[arg(short, long)]
    pub passphrase: Option<String>,

    /// Write the private key export as a QR image
    #[arg(short, long)]
    pub export_qr: Option<PathBuf>,

    /// Print the private key export to stdout
    #[arg(long)]
    pub show_private: bool,
}

impl CommandExecutor for KeygenCommand {
    fn execute(&self) -> Result<()> {
        let mut key = Key::generate().context("key generation failed")?;

        println!("fingerprint: {}", key.fingerprint());
        println!("public key:  {}", key.public_key());

        let export = match &self.passphrase {
            Some(pw) => {
                let private = key.private_key("").context("private key unavailable")?;
                let export = passphrase::encrypt(private, pw);
                key.protect(pw);
                export
            }
            None => key
                .private_key("")
                .context("private key unavailable")?
                .to_string(),
        };

        if self.show_private {
            println!("private key: {export}");
        }

        if let Some(path) = &self.export_qr {
            // Key exports are single-frame; let the library pick the symbol size.
            let config = RenderConfig {
                version: None,
                ..Default::default()
            };
            render_frame_to_file(&export, path, &config)
                .with_context(|| format!("failed to render {}", path.display()))?;
            println!("key QR:      {}", path.display());
        }

        Ok(())
    }
}
