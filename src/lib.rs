//! # Airsigner - QR transport for an airgapped signer
//!
//! Airsigner moves key material and spend bundles on and off an airgapped
//! signing device using nothing but QR codes. Long payloads are split into a
//! sequence of framed, base32-encoded chunks; the receiving side reassembles
//! frames scanned in any order, with duplicates, back into the original
//! payload and checks an optional end-to-end integrity hash.
//!
//! ## Overview
//!
//! - A payload is split by [`chunk::ChunkPlan`] according to the QR symbol
//!   version and error-correction level in use.
//! - Each chunk is prefixed with a fixed 15-byte binary [`header`] (mode,
//!   chunk index, total chunks) and encoded with the QR-safe [`alphabet`].
//! - [`encoder::BundleEncoder`] produces the frame sequence for display;
//!   [`decoder::FrameDecoder`] accumulates scanned frames until complete.
//! - Key exports are single-frame: either a bare 62-character key phrase or
//!   a passphrase-encrypted `Salted__` blob ([`crypto::passphrase`]).
//! - Key generation and bundle signing are delegated to the external `hsm*`
//!   command-line tools ([`hsm`]).
//!
//! The decoder is noise-tolerant: a camera feed delivers corrupt, duplicate,
//! and foreign frames, and none of them may poison an in-progress transfer.
//! Every [`decoder::FrameDecoder::add`] call returns a status instead of an
//! error.
//!
//! ## Example
//!
//! ```rust
//! use airsigner::chunk::EcLevel;
//! use airsigner::decoder::FrameDecoder;
//! use airsigner::encoder::BundleEncoder;
//!
//! let payload = "a".repeat(400) + &"b".repeat(400);
//! let encoder = BundleEncoder::new(&payload, 10, EcLevel::Low, false).unwrap();
//!
//! let mut decoder = FrameDecoder::new();
//! // Frames may arrive in any order; here: reversed.
//! for frame in encoder.parts().iter().rev() {
//!     decoder.add(frame);
//! }
//! assert!(decoder.is_complete());
//! assert_eq!(decoder.payload(), payload);
//! ```

pub mod alphabet;
pub mod chunk;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod hsm;
pub mod qr;

/// Recognition tag present in every exported key phrase.
///
/// Also used to validate that a passphrase decrypt actually produced key
/// material rather than well-padded garbage.
pub const KEY_TAG: &str = "se1";

/// Exact length of a plain single-frame key export, in characters.
pub const KEY_EXPORT_LEN: usize = 62;

/// Literal prefix of a passphrase-encrypted key export frame.
pub const ENCRYPTED_KEY_PREFIX: &str = "Salted__";

// Re-export commonly used types at the crate root.
pub use alphabet::AlphabetError;
pub use chunk::{ChunkPlan, EcLevel, PlanError};
pub use decoder::{DecodeStatus, FrameDecoder, PayloadKind};
pub use encoder::{BundleEncoder, EncodeError, KeyExportEncoder};
pub use header::{FrameHeader, FrameMode, HeaderError, HEADER_LEN};
