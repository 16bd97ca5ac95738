//! Core types for the Verge particle-exchange framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Verge workspace:
//! partition and process identifiers, the particle record and its
//! schema, the binary record codec, and the protocol error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod id;
pub mod particle;
pub mod schema;

pub use codec::{decode_record, decode_records, encode_record, WIRE_VERSION};
pub use error::{ProtocolError, SchemaError};
pub use id::{CommTag, GridId, PartitionKey, Rank, TileId};
pub use particle::Particle;
pub use schema::ParticleSchema;
