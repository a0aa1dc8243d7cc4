//! Byte-to-text transform for QR frame content.
//!
//! Frame bytes (header plus payload chunk) are base32-encoded so they stay
//! inside the character set a QR symbol encodes most densely. The standard
//! RFC 4648 `=` padding is swapped for `%` on the wire: `=` is outside the
//! QR alphanumeric set and would push the whole symbol into byte mode.

use base32::Alphabet;
use thiserror::Error;

/// Character substituted for the base32 `=` padding on the wire.
pub const PAD_SUBSTITUTE: char = '%';

const BASE32: Alphabet = Alphabet::Rfc4648 { padding: true };

/// Errors from decoding wire text back to bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// Input contains a character outside the transport alphabet.
    #[error("malformed encoding: {found:?} is not a transport alphabet character")]
    MalformedEncoding { found: char },

    /// Input is alphabet-clean but not decodable base32 (bad padding shape).
    #[error("malformed encoding: text is not valid base32")]
    Undecodable,
}

/// Encodes bytes as wire text: padded base32 with `=` replaced by [`PAD_SUBSTITUTE`].
pub fn encode(data: &[u8]) -> String {
    base32::encode(BASE32, data).replace('=', "%")
}

/// Decodes wire text back to bytes, reversing the pad substitution first.
///
/// Round-trip exact: `decode(&encode(b)) == b` for every byte string `b`.
pub fn decode(text: &str) -> Result<Vec<u8>, AlphabetError> {
    for found in text.chars() {
        let in_alphabet =
            found.is_ascii_uppercase() || ('2'..='7').contains(&found) || found == PAD_SUBSTITUTE;
        if !in_alphabet {
            return Err(AlphabetError::MalformedEncoding { found });
        }
    }

    let padded = text.replace(PAD_SUBSTITUTE, "=");
    base32::decode(BASE32, &padded).ok_or(AlphabetError::Undecodable)
}
