//! The particle record type.

use smallvec::{smallvec, SmallVec};

use crate::schema::ParticleSchema;

/// A fixed-size particle record: the unit of serialization.
///
/// Holds a globally unique id, the rank that owned the particle at
/// creation time, a spatial position (three slots; unused axes are
/// zero), and the extra real/integer fields fixed by the species'
/// [`ParticleSchema`]. The `SmallVec` inline capacity of 4 keeps
/// typical species heap-free; larger schemas spill transparently.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Globally unique particle id.
    pub id: u64,
    /// Rank that owned this particle when it was created.
    pub owner: u32,
    /// Spatial position. Axes beyond the domain dimension are zero.
    pub pos: [f64; 3],
    /// Extra real fields; length fixed by the schema.
    pub reals: SmallVec<[f64; 4]>,
    /// Extra integer fields; length fixed by the schema.
    pub ints: SmallVec<[i32; 4]>,
}

impl Particle {
    /// Create a record with zeroed extra fields sized to `schema`.
    pub fn new(schema: &ParticleSchema, id: u64, owner: u32, pos: [f64; 3]) -> Self {
        Self {
            id,
            owner,
            pos,
            reals: smallvec![0.0; schema.extra_reals],
            ints: smallvec![0; schema.extra_ints],
        }
    }

    /// Whether this record's extra-field counts match `schema`.
    pub fn matches(&self, schema: &ParticleSchema) -> bool {
        self.reals.len() == schema.extra_reals && self.ints.len() == schema.extra_ints
    }
}
