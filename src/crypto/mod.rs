//! Cryptographic helpers for key exports and transfer integrity.
//!
//! - [`passphrase`]: OpenSSL-compatible `Salted__` AES-256-CBC encryption of
//!   key phrases for the encrypted single-frame export format.
//! - [`integrity`]: the PBKDF2-HMAC-SHA512 hash carried by the optional
//!   integrity frame of a bundle transfer, also used for passphrase
//!   protection of in-memory keys.

pub mod integrity;
pub mod passphrase;

pub use integrity::{bundle_hash, protected_key_hash, HASH_LEN, HASH_ROUNDS};
pub use passphrase::{decrypt, encrypt, PassphraseError};
