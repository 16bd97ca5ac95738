//! The particle schema: per-species extra-field counts and record sizing.

/// Describes the shape of a particle species' records.
///
/// A schema is configured once, before any particles exist, and fixes
/// the number of extra real and integer fields each record carries.
/// The encoded record size follows from the schema alone and is the
/// unit of all buffer sizing in the exchange protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleSchema {
    /// Number of extra `f64` fields per record.
    pub extra_reals: usize,
    /// Number of extra `i32` fields per record.
    pub extra_ints: usize,
}

impl ParticleSchema {
    /// Bytes of the fixed record prefix: id (8) + owner (4) + position (3 × 8).
    pub const PREFIX_BYTES: usize = 8 + 4 + 24;

    /// Create a schema with the given extra-field counts.
    pub fn new(extra_reals: usize, extra_ints: usize) -> Self {
        Self {
            extra_reals,
            extra_ints,
        }
    }

    /// A schema with no extra fields.
    pub fn bare() -> Self {
        Self::new(0, 0)
    }

    /// The encoded size of one record in bytes.
    ///
    /// Every transported payload is an exact integer multiple of this.
    pub fn record_bytes(&self) -> usize {
        Self::PREFIX_BYTES + 8 * self.extra_reals + 4 * self.extra_ints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_record_is_prefix_only() {
        assert_eq!(ParticleSchema::bare().record_bytes(), 36);
    }

    #[test]
    fn extras_add_field_widths() {
        let schema = ParticleSchema::new(2, 3);
        assert_eq!(schema.record_bytes(), 36 + 16 + 12);
    }
}
