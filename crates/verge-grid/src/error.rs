//! Error types for partition geometry.

use std::fmt;

use verge_core::{GridId, PartitionKey};

/// Errors arising from domain or layout construction and queries.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// The domain dimension is not 2 or 3.
    InvalidDimension {
        /// The rejected dimension.
        dim: usize,
    },
    /// A cell size is zero or negative on an active axis.
    InvalidCellSize {
        /// The offending axis.
        axis: usize,
        /// The rejected size.
        size: f64,
    },
    /// A box is empty where a non-empty one is required.
    EmptyBox {
        /// What the box was for.
        role: &'static str,
    },
    /// A tile box extends outside the domain.
    TileOutsideDomain {
        /// The offending tile.
        key: PartitionKey,
    },
    /// Two tile boxes overlap.
    OverlappingTiles {
        /// First tile of the overlapping pair.
        a: PartitionKey,
        /// Second tile of the overlapping pair.
        b: PartitionKey,
    },
    /// The same partition key appears twice in a layout.
    DuplicateKey {
        /// The repeated key.
        key: PartitionKey,
    },
    /// Tiles of one grid are assigned to different ranks.
    InconsistentRank {
        /// The grid with conflicting ownership.
        grid: GridId,
    },
    /// A partition key names no tile in the layout.
    UnknownTile {
        /// The unresolved key.
        key: PartitionKey,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { dim } => {
                write!(f, "domain dimension must be 2 or 3, got {dim}")
            }
            Self::InvalidCellSize { axis, size } => {
                write!(f, "cell size on axis {axis} must be positive, got {size}")
            }
            Self::EmptyBox { role } => write!(f, "{role} box is empty"),
            Self::TileOutsideDomain { key } => {
                write!(f, "tile {key} extends outside the domain")
            }
            Self::OverlappingTiles { a, b } => {
                write!(f, "tiles {a} and {b} overlap")
            }
            Self::DuplicateKey { key } => write!(f, "duplicate partition key {key}"),
            Self::InconsistentRank { grid } => {
                write!(f, "grid {grid} has tiles on more than one rank")
            }
            Self::UnknownTile { key } => write!(f, "no tile with key {key}"),
        }
    }
}

impl std::error::Error for GridError {}
