//! External signer toolchain collaborators.
//!
//! Key generation, public-key derivation, bundle signing, and signature
//! merging are delegated to the `hsm*` command-line tools. This module only
//! shells out, feeds them input, and captures trimmed stdout; it never
//! interprets the key or bundle text beyond that.

use std::io::Write;
use std::process::{Command, Stdio};

use log::info;
use tempfile::NamedTempFile;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::integrity::{protected_key_hash, HASH_LEN};

const HSM_GENERATE: &str = "hsmgen";
const HSM_DERIVE: &str = "hsmpk";
const HSM_SIGN: &str = "hsms";
const HSM_MERGE: &str = "hsmmerge";

/// Errors from driving the external signer tools.
#[derive(Error, Debug)]
pub enum HsmError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    ToolFailure {
        tool: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("{tool} produced non-UTF-8 output")]
    BadOutput { tool: &'static str },

    #[error("signer tool I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bundle was not signed by this key pair.
    #[error("key pair did not sign this bundle")]
    KeyMismatch,

    #[error("passphrase does not match")]
    PassphraseMismatch,

    #[error("no signed bundle parts to merge")]
    NothingToMerge,
}

/// Runs one tool, optionally feeding `stdin_data`, and returns trimmed stdout.
fn run_tool(
    tool: &'static str,
    args: &[&str],
    stdin_data: Option<&str>,
) -> Result<String, HsmError> {
    let mut command = Command::new(tool);
    command.args(args).stdout(Stdio::piped());
    if stdin_data.is_some() {
        command.stdin(Stdio::piped());
    }

    let mut child = command
        .spawn()
        .map_err(|source| HsmError::Spawn { tool, source })?;
    if let Some(data) = stdin_data {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data.as_bytes())?;
        }
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(HsmError::ToolFailure {
            tool,
            status: output.status,
        });
    }

    String::from_utf8(output.stdout)
        .map(|text| text.trim().to_string())
        .map_err(|_| HsmError::BadOutput { tool })
}

/// A key pair held in device memory.
///
/// Private material is zeroized on drop. Passphrase protection stores a
/// check hash rather than deriving anything: the tools take the raw private
/// key, so protection is a gate, not an encryption layer.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Key {
    private_key: String,
    #[zeroize(skip)]
    public_key: String,
    protection_hash: Option<[u8; HASH_LEN]>,
}

impl Key {
    /// Generates a fresh key pair via `hsmgen` / `hsmpk`.
    pub fn generate() -> Result<Self, HsmError> {
        let private_key = run_tool(HSM_GENERATE, &[], None)?;
        let public_key = run_tool(HSM_DERIVE, &[&private_key], None)?;
        let key = Self {
            private_key,
            public_key,
            protection_hash: None,
        };
        info!("generated key {}", key.fingerprint());
        Ok(key)
    }

    /// Wraps an imported private key phrase, deriving its public key.
    pub fn from_private(private_key: String) -> Result<Self, HsmError> {
        let public_key = run_tool(HSM_DERIVE, &[&private_key], None)?;
        Ok(Self {
            private_key,
            public_key,
            protection_hash: None,
        })
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Short display form of the public key.
    pub fn fingerprint(&self) -> String {
        let head: String = self.public_key.chars().take(10).collect();
        format!("{head}...")
    }

    /// Gates private-key access behind `passphrase`.
    pub fn protect(&mut self, passphrase: &str) {
        self.protection_hash = Some(protected_key_hash(&self.private_key, passphrase));
    }

    pub fn is_protected(&self) -> bool {
        self.protection_hash.is_some()
    }

    /// The private key phrase, if `passphrase` matches the protection gate.
    pub fn private_key(&self, passphrase: &str) -> Result<&str, HsmError> {
        match &self.protection_hash {
            None => Ok(&self.private_key),
            Some(hash) if protected_key_hash(&self.private_key, passphrase) == *hash => {
                Ok(&self.private_key)
            }
            Some(_) => Err(HsmError::PassphraseMismatch),
        }
    }
}

/// A spend bundle moving through the signing flow.
#[derive(Debug, Default)]
pub struct Bundle {
    unsigned: String,
    signed_parts: Vec<String>,
    finalized: Option<String>,
}

impl Bundle {
    pub fn new(unsigned: String) -> Self {
        Self {
            unsigned,
            signed_parts: Vec::new(),
            finalized: None,
        }
    }

    pub fn unsigned(&self) -> &str {
        &self.unsigned
    }

    /// Short display form for menus.
    pub fn fingerprint(&self) -> String {
        let text = self.finalized.as_deref().unwrap_or(&self.unsigned);
        let head: String = text.chars().take(10).collect();
        format!("{head}...")
    }

    /// Signs the unsigned bundle with one private key via `hsms`.
    ///
    /// The bundle text goes to the tool's stdin; the key is handed over in a
    /// temp file that is removed as soon as the tool exits. Empty output
    /// means the key pair is not a party to this bundle.
    pub fn sign_with(&mut self, private_key: &str) -> Result<(), HsmError> {
        let mut key_file = NamedTempFile::new()?;
        key_file.write_all(private_key.as_bytes())?;
        let key_path = key_file.path().to_string_lossy().into_owned();

        let signed = run_tool(
            HSM_SIGN,
            &["-y", "--", "nochunks", &key_path],
            Some(&self.unsigned),
        )?;
        if signed.is_empty() {
            return Err(HsmError::KeyMismatch);
        }

        self.signed_parts.push(signed);
        Ok(())
    }

    pub fn has_signed_parts(&self) -> bool {
        !self.signed_parts.is_empty()
    }

    /// Drops partial signatures so a signing round can restart cleanly.
    pub fn clear_signed_parts(&mut self) {
        self.signed_parts.clear();
    }

    /// Merges the collected signature parts into the finalized bundle via
    /// `hsmmerge`.
    pub fn merge_signed(&mut self) -> Result<&str, HsmError> {
        if self.signed_parts.is_empty() {
            return Err(HsmError::NothingToMerge);
        }

        let args: Vec<&str> = self.signed_parts.iter().map(String::as_str).collect();
        let merged = run_tool(HSM_MERGE, &args, None)?;
        info!("merged {} signed bundle parts", args.len());
        self.finalized = Some(merged);
        Ok(self.finalized.as_deref().unwrap_or_default())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// The finalized signed bundle, once merged.
    pub fn finalized(&self) -> Option<&str> {
        self.finalized.as_deref()
    }
}
