//! Neighbour-list construction over merged local + replica particles.

use indexmap::IndexMap;
use verge_core::{Particle, PartitionKey};
use verge_grid::{CellBox, IntVect, RealVect};

use crate::error::HaloError;
use crate::exchange::HaloExchanger;

/// Per-tile candidate-interaction lists.
///
/// Each tile's list is a flat `i32` sequence: for every particle of
/// the merged array (locals first, replicas after), a leading count
/// followed by that many 1-based indices into the merged array. Index
/// `i` in `[0, local_count)` is a real particle; the rest are
/// replicas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighbourLists {
    lists: IndexMap<PartitionKey, Vec<i32>>,
}

impl NeighbourLists {
    /// The flat list for one tile, if the tile was built.
    pub fn tile(&self, key: PartitionKey) -> Option<&[i32]> {
        self.lists.get(&key).map(Vec::as_slice)
    }

    /// Keys with a built list, in build order.
    pub fn keys(&self) -> impl Iterator<Item = PartitionKey> + '_ {
        self.lists.keys().copied()
    }

    /// Iterate one tile's per-particle sublists (counts stripped).
    pub fn sublists(&self, key: PartitionKey) -> Option<Sublists<'_>> {
        self.tile(key).map(|rest| Sublists { rest })
    }
}

/// Iterator over the count-delimited sublists of one tile's flat list.
#[derive(Clone, Debug)]
pub struct Sublists<'a> {
    rest: &'a [i32],
}

impl<'a> Iterator for Sublists<'a> {
    type Item = &'a [i32];

    fn next(&mut self) -> Option<&'a [i32]> {
        let (&count, tail) = self.rest.split_first()?;
        let (sublist, rest) = tail.split_at(count as usize);
        self.rest = rest;
        Some(sublist)
    }
}

/// Cell-linked bins over a halo-grown box.
///
/// A preallocated arena of `next` indices chained from a per-cell
/// `head` field; pushing onto a cell makes the new particle the head
/// and links it to the previous one, so each chain walks in reverse
/// insertion order.
struct CellBins {
    bbox: CellBox,
    head: Vec<i32>,
    next: Vec<i32>,
}

impl CellBins {
    fn new(bbox: CellBox, particles: usize) -> Self {
        Self {
            bbox,
            head: vec![-1; bbox.volume()],
            next: vec![-1; particles],
        }
    }

    fn push(&mut self, cell: IntVect, index: usize) {
        let off = self.bbox.flat_offset(cell);
        self.next[index] = self.head[off];
        self.head[off] = index as i32;
    }

    fn head_at(&self, cell: IntVect) -> i32 {
        self.head[self.bbox.flat_offset(cell)]
    }

    fn next_of(&self, index: usize) -> i32 {
        self.next[index]
    }
}

impl HaloExchanger {
    /// Build candidate-interaction lists for every local tile.
    ///
    /// Merges each tile's local particles with its stored replicas,
    /// bins the merged array into the halo-grown cell grid, and scans
    /// the halo-width box around every particle's cell. `check_pair`
    /// decides inclusion; it is invoked as `check_pair(i, j)` and need
    /// not be symmetric. With `sort` set, each particle's sublist is
    /// sorted ascending — strictly within its own boundaries — for
    /// deterministic downstream iteration; otherwise sublists keep
    /// cell-scan discovery order.
    pub fn build_neighbour_list<F>(
        &self,
        sort: bool,
        mut check_pair: F,
    ) -> Result<NeighbourLists, HaloError>
    where
        F: FnMut(&Particle, &Particle) -> bool,
    {
        let domain = self.layout.domain();
        let mut lists = IndexMap::new();

        for (key, locals) in &self.tiles {
            let tile_box = self.layout.tile(*key)?.bbox;
            let grown = tile_box.grow(self.halo);

            let mut merged: Vec<Particle> = locals.clone();
            merged.extend(self.store.records(*key)?);
            let total = merged.len();

            let mut cells = Vec::with_capacity(total);
            let mut bins = CellBins::new(grown, total);
            for (index, p) in merged.iter().enumerate() {
                let cell = domain.cell_of(RealVect(p.pos));
                if !grown.contains(cell) {
                    return Err(HaloError::ParticleOutsideTile { key: *key, id: p.id });
                }
                cells.push(cell);
                bins.push(cell, index);
            }

            let mut flat: Vec<i32> = Vec::new();
            for i in 0..total {
                // Count placeholder, patched once the sublist is known.
                let count_slot = flat.len();
                flat.push(0);
                let mut count: i32 = 0;

                let scan = CellBox::point(cells[i], grown.dim)
                    .grow(self.halo)
                    .intersect(&grown);
                for cell in scan.cells() {
                    let mut j = bins.head_at(cell);
                    while j >= 0 {
                        let other = j as usize;
                        if other != i && check_pair(&merged[i], &merged[other]) {
                            flat.push(j + 1);
                            count += 1;
                        }
                        j = bins.next_of(other);
                    }
                }
                flat[count_slot] = count;
            }

            if sort {
                let mut at = 0;
                while at < flat.len() {
                    let count = flat[at] as usize;
                    flat[at + 1..at + 1 + count].sort_unstable();
                    at += count + 1;
                }
            }
            lists.insert(*key, flat);
        }

        Ok(NeighbourLists { lists })
    }
}
