//! Error type for the halo-exchange subsystem.

use std::error::Error;
use std::fmt;

use verge_comm::CommError;
use verge_core::{PartitionKey, ProtocolError, SchemaError};
use verge_grid::GridError;

/// Errors from exchanger construction, refresh cycles, or list builds.
///
/// Configuration variants fail construction; the wrapped protocol and
/// communication variants are fatal to the refresh that raised them —
/// the exchange assumes a correct, available substrate and performs no
/// local recovery.
#[derive(Clone, Debug, PartialEq)]
pub enum HaloError {
    /// The halo width must be at least one cell.
    InvalidHaloWidth {
        /// The rejected width.
        halo: i32,
    },
    /// A partition key does not name a tile local to this rank.
    NotLocal {
        /// The offending key.
        key: PartitionKey,
    },
    /// A particle's cell lies outside the box of the tile holding it.
    ///
    /// Particles must be redistributed to their owning tiles before a
    /// refresh; a drifted particle cannot be classified.
    ParticleOutsideTile {
        /// The tile holding the particle.
        key: PartitionKey,
        /// The particle's id.
        id: u64,
    },
    /// A cached classification entry no longer names a particle.
    ///
    /// The position-only refresh is valid only while the particle set
    /// is unchanged from the full refresh that built the cache.
    StaleCache {
        /// The source tile whose cache is stale.
        key: PartitionKey,
        /// The out-of-range particle index.
        index: usize,
    },
    /// A record's shape disagrees with the configured schema.
    Schema(SchemaError),
    /// Corruption detected in a transported buffer.
    Protocol(ProtocolError),
    /// Partition geometry failure.
    Grid(GridError),
    /// Communication substrate failure.
    Comm(CommError),
}

impl fmt::Display for HaloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHaloWidth { halo } => {
                write!(f, "halo width must be at least 1 cell, got {halo}")
            }
            Self::NotLocal { key } => {
                write!(f, "partition {key} is not local to this rank")
            }
            Self::ParticleOutsideTile { key, id } => {
                write!(f, "particle {id} lies outside its tile {key}")
            }
            Self::StaleCache { key, index } => {
                write!(
                    f,
                    "classification cache for tile {key} names particle index {index}, \
                     which no longer exists"
                )
            }
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::Protocol(e) => write!(f, "protocol error: {e}"),
            Self::Grid(e) => write!(f, "grid error: {e}"),
            Self::Comm(e) => write!(f, "communication error: {e}"),
        }
    }
}

impl Error for HaloError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Protocol(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Comm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SchemaError> for HaloError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<ProtocolError> for HaloError {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<GridError> for HaloError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<CommError> for HaloError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}
