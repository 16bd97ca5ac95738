//! Communication substrate error types.

use std::fmt;

use verge_core::Rank;

/// Errors from the communication substrate.
///
/// The exchange treats every variant as unrecoverable for the current
/// run; there is no retry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// A rank outside `0..size` was addressed.
    RankOutOfRange {
        /// The offending rank.
        rank: Rank,
        /// The group size.
        size: usize,
    },
    /// A collective was called with the wrong per-rank element count.
    CountMismatch {
        /// Elements the group size requires.
        expected: usize,
        /// Elements supplied.
        got: usize,
    },
    /// A message's byte length disagrees with the posted receive.
    SizeMismatch {
        /// Bytes the receive was posted for.
        expected: usize,
        /// Bytes the message carried.
        got: usize,
    },
    /// A peer's endpoint is gone (its thread or process exited).
    Disconnected,
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankOutOfRange { rank, size } => {
                write!(f, "rank {rank} out of range for group of {size}")
            }
            Self::CountMismatch { expected, got } => {
                write!(f, "collective expects {expected} elements, got {got}")
            }
            Self::SizeMismatch { expected, got } => {
                write!(f, "posted receive for {expected} bytes, message has {got}")
            }
            Self::Disconnected => write!(f, "peer endpoint disconnected"),
        }
    }
}

impl std::error::Error for CommError {}
