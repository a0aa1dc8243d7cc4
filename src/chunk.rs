//! Chunk planning for multi-frame transfers.
//!
//! Capacity is budgeted in the pre-expansion byte domain: header and payload
//! both count against the QR symbol's raw data capacity as bytes, before the
//! 8/5 inflation of the base32 wire encoding. Payloads are text, so the
//! planner and splitter work in characters.

use thiserror::Error;

use crate::header::HEADER_LEN;

/// QR error-correction level, ordered by redundancy cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcLevel {
    Low,
    Medium,
    Quartile,
    High,
}

impl EcLevel {
    /// Capacity units given up to error correction at this level.
    fn cost(self) -> i64 {
        match self {
            EcLevel::Low => 0,
            EcLevel::Medium => 1,
            EcLevel::Quartile => 2,
            EcLevel::High => 3,
        }
    }
}

/// Errors from chunk planning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The symbol cannot hold even the frame header at these parameters.
    #[error("QR version {version} at {ec_level:?} cannot hold a {header_len}-byte frame header")]
    ParametersTooSmall {
        version: u32,
        ec_level: EcLevel,
        header_len: usize,
    },
}

/// Raw data capacity of one QR symbol at the given version and EC level.
pub fn qr_capacity(version: u32, ec_level: EcLevel) -> i64 {
    i64::from(version) * 34 - 17 - 4 * ec_level.cost()
}

/// How a payload splits across frames for a given symbol configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Payload characters that fit in one frame alongside the header.
    pub chunk_capacity: usize,
    /// Number of chunks the payload splits into.
    pub total_chunks: usize,
}

impl ChunkPlan {
    /// Plans the transfer of a `payload_len`-character payload.
    ///
    /// An empty payload still occupies one (empty) chunk so that a frame
    /// sequence always exists.
    pub fn compute(
        payload_len: usize,
        version: u32,
        ec_level: EcLevel,
    ) -> Result<Self, PlanError> {
        let capacity = qr_capacity(version, ec_level) - HEADER_LEN as i64;
        if capacity <= 0 {
            return Err(PlanError::ParametersTooSmall {
                version,
                ec_level,
                header_len: HEADER_LEN,
            });
        }

        let chunk_capacity = capacity as usize;
        let total_chunks = payload_len.div_ceil(chunk_capacity).max(1);
        Ok(Self {
            chunk_capacity,
            total_chunks,
        })
    }
}

/// Splits `payload` into consecutive `chunk_capacity`-character slices, left
/// to right; the last slice may be shorter. An empty payload yields a single
/// empty slice.
pub fn split_payload(payload: &str, chunk_capacity: usize) -> Vec<String> {
    if payload.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = payload.chars().collect();
    chars
        .chunks(chunk_capacity)
        .map(|slice| slice.iter().collect())
        .collect()
}
