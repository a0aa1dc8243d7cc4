//! Integrity hashing for transfers and key protection.
//!
//! The companion app computes PBKDF2-HMAC-SHA512 with 2048 rounds for both
//! the bundle integrity frame (empty salt) and passphrase protection of a
//! held key (passphrase as salt). Both sides must produce identical bytes,
//! so the parameters here are wire constants.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;

/// PBKDF2 iteration count shared with the companion app.
pub const HASH_ROUNDS: u32 = 2048;

/// Hash output length in bytes.
pub const HASH_LEN: usize = 64;

/// Computes the end-to-end integrity hash of a bundle payload.
pub fn bundle_hash(payload: &str) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha512>(payload.as_bytes(), b"", HASH_ROUNDS, &mut out);
    out
}

/// Computes the check hash that passphrase-protects a private key.
pub fn protected_key_hash(private_key: &str, passphrase: &str) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha512>(
        private_key.as_bytes(),
        passphrase.as_bytes(),
        HASH_ROUNDS,
        &mut out,
    );
    out
}
