//! The tile layout: which rank owns which region of the domain.

use verge_core::{GridId, PartitionKey, Rank};

use crate::cellbox::CellBox;
use crate::domain::Domain;
use crate::error::GridError;
use crate::vect::IntVect;

/// One tile's footprint and ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSpec {
    /// The tile's partition key.
    pub key: PartitionKey,
    /// The rank that owns the tile's grid.
    pub rank: Rank,
    /// The tile's cell box.
    pub bbox: CellBox,
}

/// The full spatial partition: every tile of every grid, with owners.
///
/// Validated once at construction; read-only afterwards. All tiles of
/// one grid live on one rank (the grid is the distribution unit; tiles
/// subdivide it for thread parallelism).
#[derive(Clone, Debug)]
pub struct Layout {
    domain: Domain,
    tiles: Vec<TileSpec>,
}

impl Layout {
    /// Create a layout over `domain` from tile specifications.
    ///
    /// Validates: at least one tile; every tile box non-empty, of the
    /// domain's dimension, and inside the domain; no duplicate keys; no
    /// overlapping boxes; a single rank per grid id.
    pub fn new(domain: Domain, tiles: Vec<TileSpec>) -> Result<Self, GridError> {
        if tiles.is_empty() {
            return Err(GridError::EmptyBox { role: "layout" });
        }
        let domain_box = domain.cells();
        for tile in &tiles {
            if tile.bbox.dim != domain.dim() || tile.bbox.is_empty() {
                return Err(GridError::EmptyBox { role: "tile" });
            }
            if !domain_box.contains(tile.bbox.lo) || !domain_box.contains(tile.bbox.hi) {
                return Err(GridError::TileOutsideDomain { key: tile.key });
            }
        }
        for (i, a) in tiles.iter().enumerate() {
            for b in &tiles[i + 1..] {
                if a.key == b.key {
                    return Err(GridError::DuplicateKey { key: a.key });
                }
                if !a.bbox.intersect(&b.bbox).is_empty() {
                    return Err(GridError::OverlappingTiles { a: a.key, b: b.key });
                }
                if a.key.grid == b.key.grid && a.rank != b.rank {
                    return Err(GridError::InconsistentRank { grid: a.key.grid });
                }
            }
        }
        Ok(Self { domain, tiles })
    }

    /// The domain this layout partitions.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// All tiles, in construction order.
    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    /// The tile with the given key.
    pub fn tile(&self, key: PartitionKey) -> Result<&TileSpec, GridError> {
        self.tiles
            .iter()
            .find(|t| t.key == key)
            .ok_or(GridError::UnknownTile { key })
    }

    /// The rank owning a grid, if the grid exists.
    pub fn rank_of(&self, grid: GridId) -> Option<Rank> {
        self.tiles.iter().find(|t| t.key.grid == grid).map(|t| t.rank)
    }

    /// The partition owning an in-domain cell, if any tile covers it.
    pub fn owner_at(&self, cell: IntVect) -> Option<PartitionKey> {
        self.tiles
            .iter()
            .find(|t| t.bbox.contains(cell))
            .map(|t| t.key)
    }

    /// Keys of the tiles owned by `rank`, in construction order.
    pub fn local_keys(&self, rank: Rank) -> Vec<PartitionKey> {
        self.tiles
            .iter()
            .filter(|t| t.rank == rank)
            .map(|t| t.key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vect::RealVect;

    fn domain8() -> Domain {
        Domain::new(
            CellBox::new2([0, 0], [7, 7]),
            RealVect::zero(),
            RealVect::new2(1.0, 1.0),
            [false; 3],
        )
        .unwrap()
    }

    fn tile(grid: i32, tile: i32, rank: u32, lo: [i32; 2], hi: [i32; 2]) -> TileSpec {
        TileSpec {
            key: PartitionKey::new(grid, tile),
            rank: Rank(rank),
            bbox: CellBox::new2(lo, hi),
        }
    }

    #[test]
    fn owner_lookup_finds_covering_tile() {
        let layout = Layout::new(
            domain8(),
            vec![
                tile(0, 0, 0, [0, 0], [3, 7]),
                tile(1, 0, 0, [4, 0], [7, 7]),
            ],
        )
        .unwrap();
        assert_eq!(
            layout.owner_at(IntVect::new2(2, 5)),
            Some(PartitionKey::new(0, 0))
        );
        assert_eq!(
            layout.owner_at(IntVect::new2(4, 0)),
            Some(PartitionKey::new(1, 0))
        );
        assert_eq!(layout.owner_at(IntVect::new2(8, 0)), None);
    }

    #[test]
    fn overlapping_tiles_rejected() {
        let err = Layout::new(
            domain8(),
            vec![
                tile(0, 0, 0, [0, 0], [4, 7]),
                tile(1, 0, 0, [4, 0], [7, 7]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::OverlappingTiles { .. }));
    }

    #[test]
    fn split_grid_must_stay_on_one_rank() {
        let err = Layout::new(
            domain8(),
            vec![
                tile(0, 0, 0, [0, 0], [3, 7]),
                tile(0, 1, 1, [4, 0], [7, 7]),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GridError::InconsistentRank { grid: GridId(0) }
        ));
    }

    #[test]
    fn tile_outside_domain_rejected() {
        let err = Layout::new(domain8(), vec![tile(0, 0, 0, [0, 0], [8, 7])]).unwrap_err();
        assert!(matches!(err, GridError::TileOutsideDomain { .. }));
    }

    #[test]
    fn local_keys_filter_by_rank() {
        let layout = Layout::new(
            domain8(),
            vec![
                tile(0, 0, 0, [0, 0], [3, 7]),
                tile(1, 0, 1, [4, 0], [7, 7]),
            ],
        )
        .unwrap();
        assert_eq!(layout.local_keys(Rank(0)), vec![PartitionKey::new(0, 0)]);
        assert_eq!(layout.local_keys(Rank(1)), vec![PartitionKey::new(1, 0)]);
    }
}
