//! Schema and wire-protocol error types.

use std::error::Error;
use std::fmt;

/// A record's shape disagrees with the configured schema.
///
/// Raised when encoding a particle whose extra-field counts do not
/// match the species schema. This is a configuration-class error:
/// fatal at the call site, never recoverable mid-exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaError {
    /// Extra reals the schema expects.
    pub expected_reals: usize,
    /// Extra ints the schema expects.
    pub expected_ints: usize,
    /// Extra reals the record carries.
    pub got_reals: usize,
    /// Extra ints the record carries.
    pub got_ints: usize,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record shape mismatch: schema has {} reals / {} ints, record has {} / {}",
            self.expected_reals, self.expected_ints, self.got_reals, self.got_ints
        )
    }
}

impl Error for SchemaError {}

/// Corruption detected in a transported buffer.
///
/// Any of these indicates a logic or transport fault; the exchange
/// round that produced it cannot be retried or resumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message carries a wire-format version this build does not speak.
    UnsupportedVersion {
        /// The version byte found in the message header.
        found: u8,
    },
    /// A payload's byte length is not a multiple of the record size.
    RecordSizeMismatch {
        /// Bytes in the offending payload.
        payload_bytes: usize,
        /// The schema's record size.
        record_bytes: usize,
    },
    /// A frame declares more payload bytes than the buffer holds.
    Truncated {
        /// Bytes the frame declared.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// A message had bytes left over after the last declared frame.
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported wire version: {found}")
            }
            Self::RecordSizeMismatch {
                payload_bytes,
                record_bytes,
            } => write!(
                f,
                "payload of {payload_bytes} bytes is not a multiple of the {record_bytes}-byte record"
            ),
            Self::Truncated { needed, available } => {
                write!(f, "truncated buffer: frame declares {needed} bytes, {available} available")
            }
            Self::TrailingBytes { remaining } => {
                write!(f, "{remaining} trailing bytes after last frame")
            }
        }
    }
}

impl Error for ProtocolError {}
