//! Passphrase encryption for key exports.
//!
//! Produces the OpenSSL `enc` container the companion app expects: the
//! literal `Salted__` marker, an 8-byte random salt, AES-256-CBC with PKCS#7
//! padding, and the legacy `EVP_BytesToKey` derivation loop over SHA-256.
//! The whole salt+ciphertext blob is base64-encoded behind the marker so the
//! result stays a displayable single-frame string.
//!
//! CBC with this KDF is not authenticated, so a wrong passphrase can decrypt
//! to well-padded garbage. Decryption therefore also requires the key
//! recognition tag to appear in the plaintext before accepting it.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{ENCRYPTED_KEY_PREFIX, KEY_TAG};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Errors from decrypting an encrypted key export.
#[derive(Error, Debug)]
pub enum PassphraseError {
    /// Input does not start with the `Salted__` marker.
    #[error("ciphertext does not start with the Salted__ marker")]
    MissingPrefix,

    /// The blob behind the marker is not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    MalformedCiphertext(#[from] base64::DecodeError),

    /// The blob is too short to hold a salt and one cipher block.
    #[error("ciphertext too short")]
    CiphertextTooShort,

    /// Padding or tag validation failed; almost always a wrong passphrase.
    #[error("wrong passphrase")]
    WrongPassphrase,

    /// No encrypted key material has been collected yet.
    #[error("no encrypted key material collected")]
    NoCiphertext,
}

/// OpenSSL `EVP_BytesToKey` with SHA-256, no iteration: hash chaining until
/// enough material exists for key and IV.
fn derive_key_and_iv(passphrase: &str, salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material = Vec::with_capacity(KEY_LEN + IV_LEN + 32);
    let mut block = Vec::new();
    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Sha256::new();
        hasher.update(&block);
        hasher.update(passphrase.as_bytes());
        hasher.update(salt);
        block = hasher.finalize().to_vec();
        material.extend_from_slice(&block);
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}

fn encrypt_with_salt(plaintext: &str, passphrase: &str, salt: [u8; SALT_LEN]) -> String {
    let (key, iv) = derive_key_and_iv(passphrase, &salt);
    let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut blob = salt.to_vec();
    blob.extend_from_slice(&ciphertext);
    format!("{ENCRYPTED_KEY_PREFIX}{}", BASE64.encode(blob))
}

/// Encrypts a key phrase under `passphrase` into the single-frame
/// `Salted__...` export format.
pub fn encrypt(plaintext: &str, passphrase: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    encrypt_with_salt(plaintext, passphrase, salt)
}

/// Decrypts a `Salted__...` export back to the key phrase.
///
/// Succeeds only if padding is valid *and* the plaintext contains the key
/// recognition tag; both failure shapes report [`PassphraseError::WrongPassphrase`].
pub fn decrypt(ciphertext: &str, passphrase: &str) -> Result<String, PassphraseError> {
    let body = ciphertext
        .strip_prefix(ENCRYPTED_KEY_PREFIX)
        .ok_or(PassphraseError::MissingPrefix)?;
    let blob = BASE64.decode(body.trim())?;
    if blob.len() < SALT_LEN + IV_LEN {
        return Err(PassphraseError::CiphertextTooShort);
    }

    let (salt, encrypted) = blob.split_at(SALT_LEN);
    let (key, iv) = derive_key_and_iv(passphrase, salt);
    let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(encrypted)
        .map_err(|_| PassphraseError::WrongPassphrase)?;

    let text = String::from_utf8(plaintext).map_err(|_| PassphraseError::WrongPassphrase)?;
    if text.to_ascii_lowercase().contains(KEY_TAG) {
        Ok(text)
    } else {
        Err(PassphraseError::WrongPassphrase)
    }
}
