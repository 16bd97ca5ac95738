//! The per-tile owner mask: halo-extended partition lookup.

use verge_core::PartitionKey;

use crate::cellbox::CellBox;
use crate::error::GridError;
use crate::layout::Layout;
use crate::vect::IntVect;

/// Sentinel stored in the grid channel for cells no partition owns.
const NO_OWNER: i32 = -1;

/// Two-channel integer field recording cell ownership over a tile's
/// halo-extended box.
///
/// Channel 0 holds the owning grid id, channel 1 the tile id; a
/// negative grid id means no owner (outside the active domain on a
/// non-periodic axis). Built once per layout change and read-only
/// during classification.
#[derive(Clone, Debug)]
pub struct OwnerMask {
    bbox: CellBox,
    grid_ch: Vec<i32>,
    tile_ch: Vec<i32>,
}

impl OwnerMask {
    /// Build the mask for tile `key`, grown by `halo` cells.
    ///
    /// Interior cells resolve to the tile itself; halo cells resolve
    /// through periodic wrap and layout ownership — the same answer a
    /// boundary-fill exchange would produce.
    pub fn build(layout: &Layout, key: PartitionKey, halo: i32) -> Result<Self, GridError> {
        let tile = layout.tile(key)?;
        let bbox = tile.bbox.grow(halo);
        let domain = layout.domain();
        let mut grid_ch = vec![NO_OWNER; bbox.volume()];
        let mut tile_ch = vec![NO_OWNER; bbox.volume()];
        for cell in bbox.cells() {
            let owner = domain.wrap_cell(cell).and_then(|w| layout.owner_at(w));
            if let Some(owner) = owner {
                let off = bbox.flat_offset(cell);
                grid_ch[off] = owner.grid.0;
                tile_ch[off] = owner.tile.0;
            }
        }
        Ok(Self {
            bbox,
            grid_ch,
            tile_ch,
        })
    }

    /// The halo-extended box this mask covers.
    pub fn bbox(&self) -> CellBox {
        self.bbox
    }

    /// The partition owning `cell`, or `None` for the sentinel.
    ///
    /// `cell` must lie inside [`bbox`](Self::bbox); classification
    /// guarantees this because destination cells never move more than
    /// the halo width from a cell inside the tile.
    pub fn owner_at(&self, cell: IntVect) -> Option<PartitionKey> {
        let off = self.bbox.flat_offset(cell);
        let grid = self.grid_ch[off];
        if grid < 0 {
            return None;
        }
        Some(PartitionKey::new(grid, self.tile_ch[off]))
    }
}
