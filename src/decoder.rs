//! Reassembly state machine for scanned QR frames.
//!
//! One [`FrameDecoder`] owns one in-progress transfer. The scan loop feeds
//! every successfully extracted frame to [`FrameDecoder::add`], in whatever
//! order and with whatever duplicates the camera produces, and polls
//! [`is_complete`](FrameDecoder::is_complete) / [`progress_percent`](FrameDecoder::progress_percent).
//!
//! The payload kind is detected once, from the first frame, and fixed for
//! the life of the decoder. Frames that fail to parse or validate reject
//! only themselves: the optical channel is noisy and accumulated state must
//! survive garbage. `add` never panics and never returns an error type, only
//! a [`DecodeStatus`].
//!
//! Not thread-safe by design: single-writer, one scan thread per decoder.
//! Abandoning a transfer is dropping the decoder.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::{debug, info};

use crate::alphabet;
use crate::crypto::integrity::{bundle_hash, HASH_LEN};
use crate::crypto::passphrase::{self, PassphraseError};
use crate::header::{FrameHeader, FrameMode};
use crate::{ENCRYPTED_KEY_PREFIX, KEY_EXPORT_LEN, KEY_TAG};

/// Outcome of feeding one frame to [`FrameDecoder::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Frame accepted; transfer still incomplete.
    PartComplete,
    /// Frame was already collected; nothing changed.
    PartExisting,
    /// Transfer finished; payload available.
    Complete,
    /// Frame matched no recognized format or failed validation.
    Invalid,
    /// Frame declared a total-chunk count that disagrees with the transfer.
    InconsistentTotal,
}

/// Payload shape of a transfer, detected from the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Bare 62-character key phrase, single frame, no header.
    KeyMaterial,
    /// `Salted__`-prefixed encrypted key phrase, single frame.
    EncryptedKeyMaterial,
    /// Multi-frame chunked transfer with binary headers.
    Bundle,
    /// First frame matched nothing; decoder is inert.
    Invalid,
}

/// Accumulation state for a chunked bundle transfer.
#[derive(Debug, Default)]
struct BundleState {
    /// Established from the first framed chunk or hash, immutable afterwards.
    total_chunks: Option<usize>,
    /// Slot per chunk, index 0 holding chunk 1. `None` = unfilled, so an
    /// empty chunk payload still counts toward completion.
    slots: Vec<Option<String>>,
    filled: usize,
    integrity_hash: Option<Vec<u8>>,
}

#[derive(Debug)]
enum TransferState {
    Empty,
    Bundle(BundleState),
    Key { phrase: Option<String> },
    EncryptedKey { ciphertext: String },
    Invalid,
}

/// Upper bound on a believable declared chunk count.
///
/// The header field is seven bytes wide, but no displayable frame sequence
/// comes anywhere near this; a larger declaration is corruption, and the
/// decoder must refuse it before sizing any state after it.
pub const MAX_TOTAL_CHUNKS: u64 = 1 << 16;

/// A parsed bundle frame: header plus raw payload bytes.
struct BundleFrame {
    header: FrameHeader,
    payload: Vec<u8>,
}

/// Tries to read `frame` as an alphabet-encoded header+payload bundle frame.
///
/// Structural validation only: alphabet-clean, full header, known mode, a
/// believable declared total, and for chunk frames a chunk index within the
/// frame's own declared total.
fn parse_bundle_frame(frame: &str) -> Option<BundleFrame> {
    let bytes = alphabet::decode(frame).ok()?;
    let (header, payload) = FrameHeader::parse(&bytes).ok()?;
    if header.total_chunks == 0 || header.total_chunks > MAX_TOTAL_CHUNKS {
        return None;
    }
    if header.mode == FrameMode::Chunk
        && !(1..=header.total_chunks).contains(&header.chunk_index)
    {
        return None;
    }
    Some(BundleFrame {
        header,
        payload: payload.to_vec(),
    })
}

/// Detects the payload kind of a transfer from its first frame.
pub fn detect_kind(frame: &str) -> PayloadKind {
    if parse_bundle_frame(frame).is_some() {
        PayloadKind::Bundle
    } else if frame.starts_with(ENCRYPTED_KEY_PREFIX) {
        PayloadKind::EncryptedKeyMaterial
    } else if frame.to_ascii_lowercase().contains(KEY_TAG) {
        PayloadKind::KeyMaterial
    } else {
        PayloadKind::Invalid
    }
}

/// Reassembles one transfer from frames arriving in arbitrary order.
#[derive(Debug)]
pub struct FrameDecoder {
    state: TransferState,
    complete: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: TransferState::Empty,
            complete: false,
        }
    }

    /// Feeds one scanned frame to the transfer.
    ///
    /// Idempotent per frame content; malformed frames reject only
    /// themselves. Once complete, further calls keep reporting
    /// [`DecodeStatus::Complete`] without touching state.
    pub fn add(&mut self, frame: &str) -> DecodeStatus {
        if self.complete {
            return DecodeStatus::Complete;
        }

        match self.state {
            TransferState::Empty => self.first_frame(frame),
            TransferState::Bundle(_) => self.add_bundle_frame(frame),
            TransferState::Key { .. } => self.add_key_frame(frame),
            TransferState::EncryptedKey { .. } => self.add_encrypted_key_frame(frame),
            TransferState::Invalid => DecodeStatus::Invalid,
        }
    }

    fn first_frame(&mut self, frame: &str) -> DecodeStatus {
        match detect_kind(frame) {
            PayloadKind::Bundle => {
                self.state = TransferState::Bundle(BundleState::default());
                self.add_bundle_frame(frame)
            }
            PayloadKind::KeyMaterial => {
                self.state = TransferState::Key { phrase: None };
                self.add_key_frame(frame)
            }
            PayloadKind::EncryptedKeyMaterial => {
                self.state = TransferState::EncryptedKey {
                    ciphertext: String::new(),
                };
                self.add_encrypted_key_frame(frame)
            }
            PayloadKind::Invalid => {
                debug!("first frame matched no recognized format");
                self.state = TransferState::Invalid;
                DecodeStatus::Invalid
            }
        }
    }

    fn add_bundle_frame(&mut self, frame: &str) -> DecodeStatus {
        let Some(parsed) = parse_bundle_frame(frame) else {
            debug!("dropping malformed frame ({} chars)", frame.len());
            return DecodeStatus::Invalid;
        };
        let TransferState::Bundle(state) = &mut self.state else {
            return DecodeStatus::Invalid;
        };

        // Both frame modes declare the total; the first one establishes it
        // and every later frame must agree.
        let declared = parsed.header.total_chunks as usize;
        match state.total_chunks {
            None => {
                state.total_chunks = Some(declared);
                state.slots = vec![None; declared];
            }
            Some(total) if total != declared => {
                debug!("rejecting frame declaring {declared} chunks, transfer has {total}");
                return DecodeStatus::InconsistentTotal;
            }
            Some(_) => {}
        }

        match parsed.header.mode {
            FrameMode::Chunk => {
                let Ok(payload) = String::from_utf8(parsed.payload) else {
                    debug!("dropping chunk frame with non-UTF-8 payload");
                    return DecodeStatus::Invalid;
                };

                let slot = &mut state.slots[(parsed.header.chunk_index - 1) as usize];
                if slot.is_some() {
                    return DecodeStatus::PartExisting;
                }
                *slot = Some(payload);
                state.filled += 1;
                info!(
                    "collected {} of {} chunks",
                    state.filled,
                    parsed.header.total_chunks
                );
            }
            FrameMode::Hash => {
                if state.integrity_hash.is_some() {
                    return DecodeStatus::PartExisting;
                }
                if parsed.payload.len() != HASH_LEN {
                    debug!(
                        "dropping hash frame with {} payload bytes, expected {HASH_LEN}",
                        parsed.payload.len()
                    );
                    return DecodeStatus::Invalid;
                }
                // The hash fills the transfer's virtual chunk.
                state.integrity_hash = Some(parsed.payload);
                state.filled += 1;
                info!("collected integrity hash");
            }
        }

        if state.total_chunks == Some(state.filled) {
            self.complete = true;
            info!("transfer complete");
            return DecodeStatus::Complete;
        }
        DecodeStatus::PartComplete
    }

    fn add_key_frame(&mut self, frame: &str) -> DecodeStatus {
        let TransferState::Key { phrase } = &mut self.state else {
            return DecodeStatus::Invalid;
        };
        if frame.chars().count() != KEY_EXPORT_LEN {
            debug!(
                "key frame has {} characters, expected {KEY_EXPORT_LEN}",
                frame.chars().count()
            );
            return DecodeStatus::Invalid;
        }

        *phrase = Some(frame.to_string());
        self.complete = true;
        DecodeStatus::Complete
    }

    fn add_encrypted_key_frame(&mut self, frame: &str) -> DecodeStatus {
        let TransferState::EncryptedKey { ciphertext } = &mut self.state else {
            return DecodeStatus::Invalid;
        };
        let Some(body) = frame.strip_prefix(ENCRYPTED_KEY_PREFIX) else {
            return DecodeStatus::Invalid;
        };
        // Salt plus at least one cipher block must be present.
        match BASE64.decode(body.trim()) {
            Ok(blob) if blob.len() >= 24 => {}
            _ => {
                debug!("encrypted key frame has malformed base64 body");
                return DecodeStatus::Invalid;
            }
        }

        *ciphertext = frame.to_string();
        self.complete = true;
        DecodeStatus::Complete
    }

    /// Payload kind, once detection has happened.
    pub fn kind(&self) -> Option<PayloadKind> {
        match self.state {
            TransferState::Empty => None,
            TransferState::Bundle(_) => Some(PayloadKind::Bundle),
            TransferState::Key { .. } => Some(PayloadKind::KeyMaterial),
            TransferState::EncryptedKey { .. } => Some(PayloadKind::EncryptedKeyMaterial),
            TransferState::Invalid => Some(PayloadKind::Invalid),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_key(&self) -> bool {
        matches!(
            self.kind(),
            Some(PayloadKind::KeyMaterial | PayloadKind::EncryptedKeyMaterial)
        )
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self.kind(), Some(PayloadKind::Bundle))
    }

    /// Transfer progress, 0.0 to 100.0.
    ///
    /// 0 until the total chunk count is known; single-frame kinds jump
    /// straight from 0 to 100.
    pub fn progress_percent(&self) -> f32 {
        if self.complete {
            return 100.0;
        }
        match &self.state {
            TransferState::Bundle(state) => match state.total_chunks {
                Some(total) if total > 0 => 100.0 * state.filled as f32 / total as f32,
                _ => 0.0,
            },
            _ => 0.0,
        }
    }

    /// The reassembled payload.
    ///
    /// Empty until the transfer is complete; never a partial payload. Bundle
    /// slots are concatenated in descending chunk order, the wire contract
    /// shared with the companion app.
    pub fn payload(&self) -> String {
        if !self.complete {
            return String::new();
        }
        match &self.state {
            TransferState::Bundle(state) => {
                state.slots.iter().rev().flatten().map(String::as_str).collect()
            }
            TransferState::Key { phrase } => phrase.clone().unwrap_or_default(),
            TransferState::EncryptedKey { ciphertext } => ciphertext.clone(),
            TransferState::Empty | TransferState::Invalid => String::new(),
        }
    }

    /// The integrity hash received with a bundle transfer, if any.
    pub fn integrity_hash(&self) -> Option<&[u8]> {
        match &self.state {
            TransferState::Bundle(state) => state.integrity_hash.as_deref(),
            _ => None,
        }
    }

    /// Checks the reassembled payload against the received integrity hash.
    ///
    /// `None` when the transfer is incomplete or carried no hash frame.
    pub fn verify_integrity(&self) -> Option<bool> {
        if !self.complete {
            return None;
        }
        let hash = self.integrity_hash()?;
        Some(bundle_hash(&self.payload())[..] == *hash)
    }

    /// Decrypts a completed encrypted key export with `passphrase`.
    pub fn decrypt_key(&self, passphrase_text: &str) -> Result<String, PassphraseError> {
        match &self.state {
            TransferState::EncryptedKey { ciphertext } if self.complete => {
                passphrase::decrypt(ciphertext, passphrase_text)
            }
            _ => Err(PassphraseError::NoCiphertext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::EcLevel;
    use crate::encoder::BundleEncoder;
    use crate::header::HEADER_LEN;

    fn chunk_frame(index: u64, total: u64, payload: &str) -> String {
        let mut content = FrameHeader::chunk(index, total).pack().unwrap();
        content.extend_from_slice(payload.as_bytes());
        alphabet::encode(&content)
    }

    fn hash_frame(total: u64, hash: &[u8]) -> String {
        let mut content = FrameHeader::hash(total).pack().unwrap();
        content.extend_from_slice(hash);
        alphabet::encode(&content)
    }

    #[test]
    fn test_detect_bundle() {
        assert_eq!(detect_kind(&chunk_frame(1, 3, "abc")), PayloadKind::Bundle);
    }

    #[test]
    fn test_detect_key_material() {
        assert_eq!(detect_kind("se1somephrase"), PayloadKind::KeyMaterial);
        assert_eq!(detect_kind("PREFIXSE1TAIL"), PayloadKind::KeyMaterial);
    }

    #[test]
    fn test_detect_encrypted_key() {
        assert_eq!(
            detect_kind("Salted__AAAA"),
            PayloadKind::EncryptedKeyMaterial
        );
    }

    #[test]
    fn test_detect_invalid() {
        assert_eq!(detect_kind("not a frame"), PayloadKind::Invalid);
        assert_eq!(detect_kind(""), PayloadKind::Invalid);
    }

    #[test]
    fn test_bundle_in_order() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 2, "tail")), DecodeStatus::PartComplete);
        assert_eq!(decoder.progress_percent(), 50.0);
        assert_eq!(decoder.add(&chunk_frame(2, 2, "head")), DecodeStatus::Complete);
        // Descending chunk order: chunk 2, then chunk 1.
        assert_eq!(decoder.payload(), "headtail");
    }

    #[test]
    fn test_bundle_out_of_order() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(3, 3, "a")), DecodeStatus::PartComplete);
        assert_eq!(decoder.add(&chunk_frame(1, 3, "c")), DecodeStatus::PartComplete);
        assert_eq!(decoder.add(&chunk_frame(2, 3, "b")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "abc");
    }

    #[test]
    fn test_duplicate_frames_ignored() {
        let mut decoder = FrameDecoder::new();
        let frame = chunk_frame(1, 2, "dup");
        assert_eq!(decoder.add(&frame), DecodeStatus::PartComplete);
        assert_eq!(decoder.progress_percent(), 50.0);
        assert_eq!(decoder.add(&frame), DecodeStatus::PartExisting);
        assert_eq!(decoder.progress_percent(), 50.0);
    }

    #[test]
    fn test_inconsistent_total_rejected_frame_only() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 5, "a")), DecodeStatus::PartComplete);
        assert_eq!(
            decoder.add(&chunk_frame(2, 7, "b")),
            DecodeStatus::InconsistentTotal
        );
        // Established total and progress unchanged.
        assert_eq!(decoder.progress_percent(), 20.0);
        assert_eq!(decoder.add(&chunk_frame(2, 5, "b")), DecodeStatus::PartComplete);
    }

    #[test]
    fn test_garbage_does_not_poison_transfer() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 2, "x")), DecodeStatus::PartComplete);
        // Lowercase characters are outside the wire alphabet.
        assert_eq!(decoder.add("complete garbage!"), DecodeStatus::Invalid);
        // Truncated header.
        assert_eq!(
            decoder.add(&alphabet::encode(&[0u8; HEADER_LEN - 3])),
            DecodeStatus::Invalid
        );
        assert_eq!(decoder.add(&chunk_frame(2, 2, "y")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "yx");
    }

    #[test]
    fn test_huge_declared_total_rejected() {
        // A corrupt or hostile frame must not size decoder state; anything
        // past the plausibility bound is refused outright.
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 2, "x")), DecodeStatus::PartComplete);
        assert_eq!(
            decoder.add(&chunk_frame(1, 1 << 50, "boom")),
            DecodeStatus::Invalid
        );
        assert_eq!(
            decoder.add(&chunk_frame(1, MAX_TOTAL_CHUNKS + 1, "boom")),
            DecodeStatus::Invalid
        );
        // Transfer unharmed.
        assert_eq!(decoder.add(&chunk_frame(2, 2, "y")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "yx");
    }

    #[test]
    fn test_huge_total_on_first_frame_rejected() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(
            decoder.add(&chunk_frame(1, 1 << 50, "boom")),
            DecodeStatus::Invalid
        );
        assert!(!decoder.is_complete());
    }

    #[test]
    fn test_chunk_index_out_of_range_is_invalid() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 3, "a")), DecodeStatus::PartComplete);
        // Index 0 and index > total never parse as bundle frames; within an
        // established bundle transfer they are plain invalid frames.
        assert_eq!(decoder.add(&chunk_frame(4, 4, "b")), DecodeStatus::InconsistentTotal);
        let mut content = FrameHeader::chunk(0, 3).pack().unwrap();
        content.extend_from_slice(b"b");
        assert_eq!(decoder.add(&alphabet::encode(&content)), DecodeStatus::Invalid);
    }

    #[test]
    fn test_payload_empty_until_complete() {
        let mut decoder = FrameDecoder::new();
        decoder.add(&chunk_frame(1, 2, "x"));
        assert!(!decoder.is_complete());
        assert_eq!(decoder.payload(), "");
    }

    #[test]
    fn test_empty_chunk_counts_toward_completion() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 2, "")), DecodeStatus::PartComplete);
        assert_eq!(decoder.progress_percent(), 50.0);
        assert_eq!(decoder.add(&chunk_frame(2, 2, "tail")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "tail");
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let encoder = BundleEncoder::new("", 10, EcLevel::Low, false).unwrap();
        assert_eq!(encoder.total_parts(), 1);

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(encoder.part(1).unwrap()), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "");
    }

    #[test]
    fn test_hash_frame_counts_as_virtual_chunk() {
        let payload = "p".repeat(20);
        let hash = bundle_hash(&payload);

        let mut decoder = FrameDecoder::new();
        // Declared total 2 = one real chunk + the virtual hash chunk.
        assert_eq!(decoder.add(&hash_frame(2, &hash)), DecodeStatus::PartComplete);
        assert_eq!(decoder.add(&chunk_frame(1, 2, &payload)), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), payload);
        assert_eq!(decoder.verify_integrity(), Some(true));
    }

    #[test]
    fn test_hash_frame_total_mismatch_rejected() {
        let hash = bundle_hash("x");
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 2, "x")), DecodeStatus::PartComplete);
        // A foreign hash frame must not complete this transfer.
        assert_eq!(
            decoder.add(&hash_frame(99, &hash)),
            DecodeStatus::InconsistentTotal
        );
        assert!(!decoder.is_complete());
        assert_eq!(decoder.progress_percent(), 50.0);

        assert_eq!(decoder.add(&hash_frame(2, &hash)), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "x");
        assert_eq!(decoder.verify_integrity(), Some(true));
    }

    #[test]
    fn test_hash_frame_establishes_total() {
        let hash = bundle_hash("p");
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&hash_frame(2, &hash)), DecodeStatus::PartComplete);
        assert_eq!(decoder.progress_percent(), 50.0);
        // Chunk frames must now agree with the hash frame's declared total.
        assert_eq!(
            decoder.add(&chunk_frame(1, 99, "p")),
            DecodeStatus::InconsistentTotal
        );
        assert_eq!(decoder.add(&chunk_frame(1, 2, "p")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "p");
    }

    #[test]
    fn test_duplicate_hash_frame_ignored() {
        let hash = bundle_hash("x");
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&hash_frame(3, &hash)), DecodeStatus::PartComplete);
        assert_eq!(decoder.add(&hash_frame(3, &hash)), DecodeStatus::PartExisting);
    }

    #[test]
    fn test_wrong_length_hash_frame_invalid() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(
            decoder.add(&hash_frame(2, &[0u8; 32])),
            DecodeStatus::Invalid
        );
    }

    #[test]
    fn test_integrity_mismatch_detected() {
        let mut decoder = FrameDecoder::new();
        let bogus = [7u8; HASH_LEN];
        decoder.add(&hash_frame(2, &bogus));
        decoder.add(&chunk_frame(1, 2, "payload"));
        assert!(decoder.is_complete());
        assert_eq!(decoder.verify_integrity(), Some(false));
    }

    #[test]
    fn test_no_hash_means_no_verdict() {
        let mut decoder = FrameDecoder::new();
        decoder.add(&chunk_frame(1, 1, "only"));
        assert!(decoder.is_complete());
        assert_eq!(decoder.verify_integrity(), None);
    }

    #[test]
    fn test_key_frame_exact_length() {
        let phrase = format!("se1{}", "q".repeat(KEY_EXPORT_LEN - 3));
        assert_eq!(phrase.len(), KEY_EXPORT_LEN);

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&phrase), DecodeStatus::Complete);
        assert!(decoder.is_key());
        assert_eq!(decoder.payload(), phrase);
        assert_eq!(decoder.progress_percent(), 100.0);
    }

    #[test]
    fn test_key_frame_wrong_length_rejected() {
        for extra in [KEY_EXPORT_LEN - 4, KEY_EXPORT_LEN - 2] {
            let phrase = format!("se1{}", "q".repeat(extra));
            let mut decoder = FrameDecoder::new();
            assert_eq!(decoder.add(&phrase), DecodeStatus::Invalid);
            assert!(!decoder.is_complete());
            assert_eq!(decoder.payload(), "");
            assert_eq!(decoder.progress_percent(), 0.0);
        }
    }

    #[test]
    fn test_key_decoder_recovers_after_bad_frame() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add("se1tooshort"), DecodeStatus::Invalid);
        let phrase = format!("se1{}", "q".repeat(KEY_EXPORT_LEN - 3));
        assert_eq!(decoder.add(&phrase), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), phrase);
    }

    #[test]
    fn test_encrypted_key_roundtrip() {
        let phrase = format!("se1{}", "q".repeat(KEY_EXPORT_LEN - 3));
        let exported = crate::crypto::passphrase::encrypt(&phrase, "pw");

        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&exported), DecodeStatus::Complete);
        assert_eq!(decoder.kind(), Some(PayloadKind::EncryptedKeyMaterial));
        assert_eq!(decoder.payload(), exported);
        assert_eq!(decoder.decrypt_key("pw").unwrap(), phrase);
        assert!(decoder.decrypt_key("wrong").is_err());
    }

    #[test]
    fn test_encrypted_key_malformed_body_invalid() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add("Salted__%%%"), DecodeStatus::Invalid);
        assert!(!decoder.is_complete());
    }

    #[test]
    fn test_invalid_kind_is_terminal() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add("???"), DecodeStatus::Invalid);
        assert_eq!(decoder.kind(), Some(PayloadKind::Invalid));
        // Even a well-formed bundle frame is refused now.
        assert_eq!(decoder.add(&chunk_frame(1, 1, "x")), DecodeStatus::Invalid);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.add(&chunk_frame(1, 1, "done")), DecodeStatus::Complete);
        assert_eq!(decoder.add(&chunk_frame(1, 9, "late")), DecodeStatus::Complete);
        assert_eq!(decoder.payload(), "done");
    }

    #[test]
    fn test_end_to_end_with_encoder() {
        let payload = "n".repeat(700);
        let encoder = BundleEncoder::new(&payload, 10, EcLevel::Low, true).unwrap();

        let mut decoder = FrameDecoder::new();
        let mut last = DecodeStatus::Invalid;
        for frame in encoder.parts() {
            last = decoder.add(frame);
        }
        assert_eq!(last, DecodeStatus::Complete);
        assert_eq!(decoder.payload(), payload);
        assert_eq!(decoder.verify_integrity(), Some(true));
    }
}
