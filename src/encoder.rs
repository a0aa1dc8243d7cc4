//! Frame encoders for QR display.
//!
//! Key exports are single-frame (or headerless fixed-size pieces for
//! low-capacity displays). Bundles are chunked: each frame is the 15-byte
//! binary header plus one payload slice, alphabet-encoded; an optional
//! trailing frame carries the integrity hash. Encoding is pure, so the same
//! payload and parameters always yield byte-identical frames.
//!
//! Chunk indexes run *against* payload order: index 1 carries the last
//! payload slice. The receiver concatenates slots in descending index order,
//! and that wire contract is what restores the original payload.

use thiserror::Error;

use crate::alphabet;
use crate::chunk::{split_payload, ChunkPlan, EcLevel, PlanError};
use crate::crypto::integrity::bundle_hash;
use crate::header::{FrameHeader, HeaderError};

/// Errors raised while building a frame sequence.
///
/// Both cases are deterministic given the inputs, so they surface before any
/// frame is displayed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Header(#[from] HeaderError),
}

/// Single-frame (or fixed-size piecewise) encoder for a key phrase export.
///
/// With `chunk_size == 0` the whole phrase is one frame. With a positive
/// `chunk_size` the phrase is dealt out headerless piece by piece via
/// [`next_part`](Self::next_part); emitting the final short piece flips
/// [`is_complete`](Self::is_complete) and rewinds so the sequence can be
/// displayed again.
#[derive(Debug, Clone)]
pub struct KeyExportEncoder {
    phrase: String,
    remaining: String,
    chunk_size: usize,
    complete: bool,
}

impl KeyExportEncoder {
    pub fn new(phrase: &str) -> Self {
        Self::with_chunk_size(phrase, 0)
    }

    pub fn with_chunk_size(phrase: &str, chunk_size: usize) -> Self {
        Self {
            phrase: phrase.to_string(),
            remaining: phrase.to_string(),
            chunk_size,
            complete: false,
        }
    }

    /// Declared sequence length. Key exports are one QR at a time.
    pub fn total_parts(&self) -> usize {
        1
    }

    /// Next displayable piece of the phrase.
    pub fn next_part(&mut self) -> String {
        if self.chunk_size == 0 {
            self.complete = true;
            return self.phrase.clone();
        }

        if self.remaining.chars().count() >= self.chunk_size {
            let part: String = self.remaining.chars().take(self.chunk_size).collect();
            self.remaining = self.remaining.chars().skip(self.chunk_size).collect();
            self.complete = false;
            part
        } else {
            let part = std::mem::replace(&mut self.remaining, self.phrase.clone());
            self.complete = true;
            part
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Chunked frame encoder for a bundle transfer.
#[derive(Debug)]
pub struct BundleEncoder {
    frames: Vec<String>,
    plan: ChunkPlan,
    cursor: usize,
    complete: bool,
}

impl BundleEncoder {
    /// Builds the full frame sequence for `payload`.
    ///
    /// With `with_hash`, an integrity-hash frame is appended and the declared
    /// total counts it as one extra virtual chunk, keeping the receiver's
    /// completion logic uniform.
    pub fn new(
        payload: &str,
        version: u32,
        ec_level: EcLevel,
        with_hash: bool,
    ) -> Result<Self, EncodeError> {
        let plan = ChunkPlan::compute(payload.chars().count(), version, ec_level)?;
        let slices = split_payload(payload, plan.chunk_capacity);
        let chunk_count = slices.len();
        let declared_total = (chunk_count + usize::from(with_hash)) as u64;

        let mut frames = Vec::with_capacity(chunk_count + 1);
        for index in 1..=chunk_count {
            // Index 1 carries the last slice; descending reassembly on the
            // receiver restores payload order.
            let slice = &slices[chunk_count - index];
            let header = FrameHeader::chunk(index as u64, declared_total);
            let mut content = header.pack()?;
            content.extend_from_slice(slice.as_bytes());
            frames.push(alphabet::encode(&content));
        }

        if with_hash {
            let header = FrameHeader::hash(declared_total);
            let mut content = header.pack()?;
            content.extend_from_slice(&bundle_hash(payload));
            frames.push(alphabet::encode(&content));
        }

        Ok(Self {
            frames,
            plan,
            cursor: 0,
            complete: false,
        })
    }

    /// The chunk plan this sequence was built from.
    pub fn plan(&self) -> ChunkPlan {
        self.plan
    }

    /// Number of frames in the sequence, including any hash frame.
    pub fn total_parts(&self) -> usize {
        self.frames.len()
    }

    /// Frame for chunk `index` (1-based); the hash frame, if present, sits
    /// after the last chunk.
    pub fn part(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.frames.get(i))
            .map(String::as_str)
    }

    /// Next frame in display order, cycling for the animated display loop.
    /// [`is_complete`](Self::is_complete) flips once the last frame has been
    /// handed out.
    pub fn next_part(&mut self) -> String {
        let part = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        if self.cursor == 0 {
            self.complete = true;
        }
        part
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The full ordered frame sequence.
    pub fn parts(&self) -> &[String] {
        &self.frames
    }

    /// All frames joined into one content string, as consumed by the display
    /// path that re-renders them as separate symbols.
    pub fn concat(&self) -> String {
        self.frames.concat()
    }
}
