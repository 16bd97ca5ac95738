//! Spatial partition geometry for the Verge particle-exchange framework.
//!
//! This crate defines the integer/real vector types, inclusive cell
//! boxes, the problem [`Domain`] (bounds, periodicity, cell size), the
//! [`Layout`] of grid boxes and tiles across process ranks, and the
//! per-tile [`OwnerMask`] — the halo-extended, two-channel ownership
//! lookup that drives replica classification.
//!
//! Boxes use inclusive `lo..=hi` bounds on every axis; a box whose
//! `lo` exceeds `hi` on any active axis is empty and contains nothing.
//! The domain dimension (2 or 3) is carried at runtime; axes at or
//! beyond it are pinned to zero.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cellbox;
pub mod domain;
pub mod error;
pub mod layout;
pub mod mask;
pub mod vect;

pub use cellbox::CellBox;
pub use domain::Domain;
pub use error::GridError;
pub use layout::{Layout, TileSpec};
pub use mask::OwnerMask;
pub use vect::{IntVect, RealVect};
