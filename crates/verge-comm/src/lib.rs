//! Communication substrate for the Verge particle-exchange framework.
//!
//! Defines the [`Comm`] trait — the minimal point-to-point and
//! collective surface the halo exchange needs — and [`LocalComm`], an
//! in-process implementation backed by crossbeam channels for tests
//! and single-host multi-threaded runs. An MPI-backed implementation
//! plugs in behind the same trait.
//!
//! The exchange protocol is bulk-synchronous: every rank enters the
//! same sequence of collective and point-to-point calls. There is no
//! cancellation or timeout; a stalled peer stalls the round.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod error;
pub mod local;

pub use comm::{Comm, RecvTicket};
pub use error::CommError;
pub use local::LocalComm;
