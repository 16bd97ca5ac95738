//! Verge: distributed particle halo exchange and neighbour-list
//! construction for spatially decomposed simulations.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Verge sub-crates. For most users, adding `verge` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use verge::prelude::*;
//!
//! // An 8x8 unit-cell domain, one tile, one in-process rank.
//! let domain = Domain::new(
//!     CellBox::new2([0, 0], [7, 7]),
//!     RealVect::zero(),
//!     RealVect::new2(1.0, 1.0),
//!     [false; 3],
//! )
//! .unwrap();
//! let layout = Layout::new(
//!     domain,
//!     vec![TileSpec {
//!         key: PartitionKey::new(0, 0),
//!         rank: Rank(0),
//!         bbox: CellBox::new2([0, 0], [7, 7]),
//!     }],
//! )
//! .unwrap();
//! let comm: Arc<dyn Comm> = Arc::new(LocalComm::group(1).pop().unwrap());
//!
//! // Two particles one cell apart, schema with no extra fields.
//! let schema = ParticleSchema::bare();
//! let mut exchanger = HaloExchanger::new(layout, schema, 1, comm).unwrap();
//! let home = PartitionKey::new(0, 0);
//! exchanger
//!     .particles_mut(home)
//!     .unwrap()
//!     .push(Particle::new(&schema, 1, 0, [3.5, 3.5, 0.0]));
//! exchanger
//!     .particles_mut(home)
//!     .unwrap()
//!     .push(Particle::new(&schema, 2, 0, [4.5, 3.5, 0.0]));
//!
//! exchanger.fill_neighbours().unwrap();
//! let lists = exchanger
//!     .build_neighbour_list(true, |_, _| true)
//!     .unwrap();
//! // Each particle lists the other (1-based indices into the merged array).
//! assert_eq!(lists.tile(home).unwrap(), &[1, 2, 1, 1]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `verge-core` | IDs, particle record, schema, record codec |
//! | [`grid`] | `verge-grid` | Boxes, domain, layout, owner mask |
//! | [`comm`] | `verge-comm` | Communication substrate and in-process backend |
//! | [`halo`] | `verge-halo` | Exchanger, neighbour store, list builder |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, record codec, and protocol errors (`verge-core`).
pub use verge_core as types;

/// Partition geometry: boxes, domain, layout, owner mask (`verge-grid`).
pub use verge_grid as grid;

/// Communication substrate trait and in-process backend (`verge-comm`).
pub use verge_comm as comm;

/// Halo exchange, neighbour store, and list builder (`verge-halo`).
pub use verge_halo as halo;

/// Common imports for typical Verge usage.
///
/// ```rust
/// use verge::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use verge_core::{
        CommTag, GridId, Particle, ParticleSchema, PartitionKey, ProtocolError, Rank, SchemaError,
        TileId,
    };

    // Geometry
    pub use verge_grid::{CellBox, Domain, GridError, IntVect, Layout, OwnerMask, RealVect, TileSpec};

    // Communication
    pub use verge_comm::{Comm, CommError, LocalComm, RecvTicket};

    // Exchange
    pub use verge_halo::{
        ExchangeMetrics, HaloError, HaloExchanger, NeighbourLists, NeighbourStore,
    };
}
