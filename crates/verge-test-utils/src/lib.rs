//! Shared fixtures for Verge development and testing.
//!
//! Canonical layouts (the 8×8 quad split, the two-rank strip split),
//! a reference schema, particle placement helpers, and stock pair
//! predicates.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use verge_core::{Particle, ParticleSchema, PartitionKey, Rank};
use verge_grid::{CellBox, Domain, IntVect, Layout, RealVect, TileSpec};

/// The reference test schema: two extra reals, one extra int.
pub fn test_schema() -> ParticleSchema {
    ParticleSchema::new(2, 1)
}

/// An 8×8 unit-cell domain at the origin.
pub fn domain8(periodic: [bool; 3]) -> Domain {
    Domain::new(
        CellBox::new2([0, 0], [7, 7]),
        RealVect::zero(),
        RealVect::new2(1.0, 1.0),
        periodic,
    )
    .expect("8x8 domain is valid")
}

/// The 8×8 domain split into four 4×4 grids, one tile each.
///
/// Grid ids run low-low (0), high-low (1), low-high (2), high-high (3);
/// `ranks[i]` owns grid `i`.
pub fn quad_layout(periodic: [bool; 3], ranks: [u32; 4]) -> Layout {
    let quads = [
        ([0, 0], [3, 3]),
        ([4, 0], [7, 3]),
        ([0, 4], [3, 7]),
        ([4, 4], [7, 7]),
    ];
    let tiles = quads
        .iter()
        .enumerate()
        .map(|(i, (lo, hi))| TileSpec {
            key: PartitionKey::new(i as i32, 0),
            rank: Rank(ranks[i]),
            bbox: CellBox::new2(*lo, *hi),
        })
        .collect();
    Layout::new(domain8(periodic), tiles).expect("quad layout is valid")
}

/// The 8×8 domain split into two 4×8 strips along x.
///
/// Grid 0 (`x ∈ [0, 3]`) on rank 0, grid 1 (`x ∈ [4, 7]`) on rank 1.
pub fn strip_layout(periodic: [bool; 3]) -> Layout {
    let tiles = vec![
        TileSpec {
            key: PartitionKey::new(0, 0),
            rank: Rank(0),
            bbox: CellBox::new2([0, 0], [3, 7]),
        },
        TileSpec {
            key: PartitionKey::new(1, 0),
            rank: Rank(1),
            bbox: CellBox::new2([4, 0], [7, 7]),
        },
    ];
    Layout::new(domain8(periodic), tiles).expect("strip layout is valid")
}

/// The whole 8×8 domain as a single tile on rank 0.
pub fn single_tile_layout(periodic: [bool; 3]) -> Layout {
    let tiles = vec![TileSpec {
        key: PartitionKey::new(0, 0),
        rank: Rank(0),
        bbox: CellBox::new2([0, 0], [7, 7]),
    }];
    Layout::new(domain8(periodic), tiles).expect("single-tile layout is valid")
}

/// A particle centred in `cell` of a unit-cell domain at the origin.
///
/// Extra fields are filled deterministically from the id so transport
/// tests can verify them end to end.
pub fn particle_at_cell(schema: &ParticleSchema, id: u64, owner: u32, cell: IntVect) -> Particle {
    let mut p = Particle::new(
        schema,
        id,
        owner,
        [cell[0] as f64 + 0.5, cell[1] as f64 + 0.5, 0.0],
    );
    for (k, r) in p.reals.iter_mut().enumerate() {
        *r = id as f64 + k as f64 / 10.0;
    }
    for (k, i) in p.ints.iter_mut().enumerate() {
        *i = id as i32 * 100 + k as i32;
    }
    p
}

/// The constant-true pair predicate.
pub fn accept_all(_: &Particle, _: &Particle) -> bool {
    true
}

/// An asymmetric predicate: accepts only pairs with increasing ids.
pub fn accept_increasing_id(a: &Particle, b: &Particle) -> bool {
    a.id < b.id
}
