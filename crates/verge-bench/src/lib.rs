//! Benchmark profiles and utilities for the Verge framework.
//!
//! Provides pre-built layouts and deterministic particle clouds:
//!
//! - [`tiled_layout`]: an `n`×`n`-cell domain split into a square grid
//!   of equal tiles, all on rank 0
//! - [`uniform_cloud`]: seeded uniform particle placement via ChaCha

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;
use verge_core::{Particle, ParticleSchema, PartitionKey, Rank};
use verge_grid::{CellBox, Domain, Layout, RealVect, TileSpec};

/// An `n`×`n` unit-cell domain split into `split`×`split` grids of
/// equal tiles, one tile per grid, all on rank 0.
///
/// `n` must be divisible by `split`.
pub fn tiled_layout(n: i32, split: i32, periodic: bool) -> Layout {
    assert_eq!(n % split, 0, "domain side must divide evenly into tiles");
    let side = n / split;
    let domain = Domain::new(
        CellBox::new2([0, 0], [n - 1, n - 1]),
        RealVect::zero(),
        RealVect::new2(1.0, 1.0),
        [periodic, periodic, false],
    )
    .expect("benchmark domain is valid");

    let mut tiles = Vec::with_capacity((split * split) as usize);
    for ty in 0..split {
        for tx in 0..split {
            tiles.push(TileSpec {
                key: PartitionKey::new(ty * split + tx, 0),
                rank: Rank(0),
                bbox: CellBox::new2(
                    [tx * side, ty * side],
                    [(tx + 1) * side - 1, (ty + 1) * side - 1],
                ),
            });
        }
    }
    Layout::new(domain, tiles).expect("benchmark layout is valid")
}

/// Deterministic uniform particle placement: `per_tile` particles in
/// every tile of `layout`, positions seeded by `seed`.
pub fn uniform_cloud(
    layout: &Layout,
    schema: &ParticleSchema,
    per_tile: usize,
    seed: u64,
) -> Vec<(PartitionKey, Vec<Particle>)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut id: u64 = 0;
    layout
        .tiles()
        .iter()
        .map(|tile| {
            let particles = (0..per_tile)
                .map(|_| {
                    id += 1;
                    let x = tile.bbox.lo[0] as f64
                        + rng.random_range(0.0..tile.bbox.extent(0) as f64);
                    let y = tile.bbox.lo[1] as f64
                        + rng.random_range(0.0..tile.bbox.extent(1) as f64);
                    Particle::new(schema, id, 0, [x, y, 0.0])
                })
                .collect();
            (tile.key, particles)
        })
        .collect()
}
