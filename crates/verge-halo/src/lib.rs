//! Particle halo exchange and neighbour-list construction.
//!
//! This crate is the core of the Verge framework. It replicates
//! particles near tile boundaries to the partitions that own the
//! adjacent regions, transports the replicas between process ranks,
//! and builds per-particle candidate-interaction lists from the merged
//! local-plus-replica population.
//!
//! # Pipeline
//!
//! ```text
//! classify (shift vector → face/edge/vertex offsets)
//!   → owner mask lookup (sentinel = drop)
//!   → periodic wrap of the replica position
//!   → local append or per-tag outbound buffer
//!   → sizing all-to-all + framed exchange        (verge-comm)
//!   → NeighbourStore (partition key → record bytes)
//!   → cell-linked-list neighbour list builder
//! ```
//!
//! The entry point is [`HaloExchanger`]: one instance per level of the
//! partition hierarchy, constructed from a [`Layout`](verge_grid::Layout),
//! a [`ParticleSchema`](verge_core::ParticleSchema), the halo width,
//! and a [`Comm`](verge_comm::Comm) endpoint.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod classify;

pub mod error;
pub mod exchange;
pub mod list;
pub mod metrics;
pub mod store;

pub use error::HaloError;
pub use exchange::HaloExchanger;
pub use list::{NeighbourLists, Sublists};
pub use metrics::ExchangeMetrics;
pub use store::NeighbourStore;
