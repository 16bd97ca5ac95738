//! Strongly-typed identifiers for partitions and processes.

use std::fmt;

/// Identifies a grid box within the spatial partition.
///
/// Grid ids are assigned by the layout at construction time. Negative
/// values never name a real grid — the owner mask uses them as the
/// "no owner" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridId(pub i32);

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for GridId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// Identifies a tile within a grid box.
///
/// Tiles are the thread-parallel sub-units of a grid: each tile owns its
/// classification cache and its slice of the neighbour-list output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub i32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TileId {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

/// A process rank within the communication group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The rank as a `usize`, for indexing per-process tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a disjoint spatial sub-region: one tile of one grid box.
///
/// Exactly one process owns each partition. Used as the key for the
/// neighbour store, the classification cache, and the neighbour-list
/// output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    /// The owning grid box.
    pub grid: GridId,
    /// The tile within that grid box.
    pub tile: TileId,
}

impl PartitionKey {
    /// Construct a key from raw grid and tile ids.
    pub fn new(grid: i32, tile: i32) -> Self {
        Self {
            grid: GridId(grid),
            tile: TileId(tile),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.grid, self.tile)
    }
}

/// Identifies one logical batch of replica particles in flight: the
/// destination process plus the destination partition on that process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommTag {
    /// The destination process.
    pub rank: Rank,
    /// The destination partition on that process.
    pub key: PartitionKey,
}

impl fmt::Display for CommTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_key_display() {
        let key = PartitionKey::new(3, 1);
        assert_eq!(key.to_string(), "(3, 1)");
    }

    #[test]
    fn comm_tag_orders_by_rank_first() {
        let a = CommTag {
            rank: Rank(0),
            key: PartitionKey::new(9, 9),
        };
        let b = CommTag {
            rank: Rank(1),
            key: PartitionKey::new(0, 0),
        };
        assert!(a < b);
    }
}
