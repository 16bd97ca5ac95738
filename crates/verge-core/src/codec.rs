//! Binary encode/decode for particle records.
//!
//! All integers and floats are little-endian. The record layout is
//! fixed by the schema and carries no per-record framing:
//!
//! ```text
//! id (u64) | owner (u32) | pos (3 × f64) | reals (nr × f64) | ints (ni × i32)
//! ```
//!
//! Messages that carry records prefix a [`WIRE_VERSION`] byte so a
//! receiver can reject buffers from an incompatible build before
//! touching any payload.

use smallvec::SmallVec;

use crate::error::{ProtocolError, SchemaError};
use crate::particle::Particle;
use crate::schema::ParticleSchema;

/// Version tag for the record wire format.
pub const WIRE_VERSION: u8 = 1;

/// Append one encoded record to `buf`.
///
/// Fails if the record's extra-field counts disagree with `schema`;
/// on failure `buf` is unchanged.
pub fn encode_record(
    buf: &mut Vec<u8>,
    p: &Particle,
    schema: &ParticleSchema,
) -> Result<(), SchemaError> {
    if !p.matches(schema) {
        return Err(SchemaError {
            expected_reals: schema.extra_reals,
            expected_ints: schema.extra_ints,
            got_reals: p.reals.len(),
            got_ints: p.ints.len(),
        });
    }
    buf.reserve(schema.record_bytes());
    buf.extend_from_slice(&p.id.to_le_bytes());
    buf.extend_from_slice(&p.owner.to_le_bytes());
    for axis in 0..3 {
        buf.extend_from_slice(&p.pos[axis].to_le_bytes());
    }
    for &r in &p.reals {
        buf.extend_from_slice(&r.to_le_bytes());
    }
    for &i in &p.ints {
        buf.extend_from_slice(&i.to_le_bytes());
    }
    Ok(())
}

/// Decode one record from the front of `data`.
///
/// `data` must hold at least `schema.record_bytes()` bytes.
pub fn decode_record(data: &[u8], schema: &ParticleSchema) -> Result<Particle, ProtocolError> {
    let record = schema.record_bytes();
    if data.len() < record {
        return Err(ProtocolError::Truncated {
            needed: record,
            available: data.len(),
        });
    }

    let mut off = 0;
    let id = u64::from_le_bytes(data[off..off + 8].try_into().unwrap());
    off += 8;
    let owner = u32::from_le_bytes(data[off..off + 4].try_into().unwrap());
    off += 4;
    let mut pos = [0.0f64; 3];
    for slot in &mut pos {
        *slot = f64::from_le_bytes(data[off..off + 8].try_into().unwrap());
        off += 8;
    }
    let mut reals: SmallVec<[f64; 4]> = SmallVec::with_capacity(schema.extra_reals);
    for _ in 0..schema.extra_reals {
        reals.push(f64::from_le_bytes(data[off..off + 8].try_into().unwrap()));
        off += 8;
    }
    let mut ints: SmallVec<[i32; 4]> = SmallVec::with_capacity(schema.extra_ints);
    for _ in 0..schema.extra_ints {
        ints.push(i32::from_le_bytes(data[off..off + 4].try_into().unwrap()));
        off += 4;
    }

    Ok(Particle {
        id,
        owner,
        pos,
        reals,
        ints,
    })
}

/// Decode a concatenation of records.
///
/// The slice length must be an exact multiple of the record size.
pub fn decode_records(data: &[u8], schema: &ParticleSchema) -> Result<Vec<Particle>, ProtocolError> {
    let record = schema.record_bytes();
    if data.len() % record != 0 {
        return Err(ProtocolError::RecordSizeMismatch {
            payload_bytes: data.len(),
            record_bytes: record,
        });
    }
    let mut out = Vec::with_capacity(data.len() / record);
    for chunk in data.chunks_exact(record) {
        out.push(decode_record(chunk, schema)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    fn arb_particle(schema: ParticleSchema) -> impl Strategy<Value = Particle> {
        (
            any::<u64>(),
            any::<u32>(),
            prop::array::uniform3(any::<u64>()),
            prop::collection::vec(any::<u64>(), schema.extra_reals),
            prop::collection::vec(any::<i32>(), schema.extra_ints),
        )
            .prop_map(|(id, owner, pos_bits, real_bits, ints)| Particle {
                id,
                owner,
                pos: pos_bits.map(f64::from_bits),
                reals: real_bits.into_iter().map(f64::from_bits).collect(),
                ints: ints.into_iter().collect(),
            })
    }

    proptest! {
        #[test]
        fn roundtrip_bare(p in arb_particle(ParticleSchema::bare())) {
            let schema = ParticleSchema::bare();
            let mut buf = Vec::new();
            encode_record(&mut buf, &p, &schema).unwrap();
            prop_assert_eq!(buf.len(), schema.record_bytes());
            let got = decode_record(&buf, &schema).unwrap();
            // Bit-identical round trip, NaN payloads included.
            prop_assert_eq!(p.id, got.id);
            prop_assert_eq!(p.owner, got.owner);
            for axis in 0..3 {
                prop_assert_eq!(p.pos[axis].to_bits(), got.pos[axis].to_bits());
            }
        }

        #[test]
        fn roundtrip_with_extras(p in arb_particle(ParticleSchema::new(3, 2))) {
            let schema = ParticleSchema::new(3, 2);
            let mut buf = Vec::new();
            encode_record(&mut buf, &p, &schema).unwrap();
            let got = decode_record(&buf, &schema).unwrap();
            prop_assert_eq!(
                p.reals.iter().map(|r| r.to_bits()).collect::<Vec<_>>(),
                got.reals.iter().map(|r| r.to_bits()).collect::<Vec<_>>()
            );
            prop_assert_eq!(p.ints, got.ints);
        }

        #[test]
        fn concatenation_roundtrips(
            ps in prop::collection::vec(arb_particle(ParticleSchema::new(1, 1)), 0..8)
        ) {
            let schema = ParticleSchema::new(1, 1);
            let mut buf = Vec::new();
            for p in &ps {
                encode_record(&mut buf, p, &schema).unwrap();
            }
            let got = decode_records(&buf, &schema).unwrap();
            prop_assert_eq!(got.len(), ps.len());
            for (a, b) in ps.iter().zip(&got) {
                prop_assert_eq!(a.id, b.id);
            }
        }
    }

    #[test]
    fn shape_mismatch_rejected_and_buffer_untouched() {
        let schema = ParticleSchema::new(2, 0);
        let p = Particle {
            id: 1,
            owner: 0,
            pos: [0.0; 3],
            reals: smallvec![1.0],
            ints: smallvec![],
        };
        let mut buf = vec![0xAB];
        let err = encode_record(&mut buf, &p, &schema).unwrap_err();
        assert_eq!(err.expected_reals, 2);
        assert_eq!(err.got_reals, 1);
        assert_eq!(buf, vec![0xAB]);
    }

    #[test]
    fn short_buffer_is_truncated_error() {
        let schema = ParticleSchema::bare();
        let buf = vec![0u8; schema.record_bytes() - 1];
        assert!(matches!(
            decode_record(&buf, &schema),
            Err(ProtocolError::Truncated { .. })
        ));
    }

    #[test]
    fn ragged_concatenation_rejected() {
        let schema = ParticleSchema::bare();
        let buf = vec![0u8; schema.record_bytes() + 3];
        assert!(matches!(
            decode_records(&buf, &schema),
            Err(ProtocolError::RecordSizeMismatch {
                payload_bytes: 39,
                record_bytes: 36,
            })
        ));
    }
}
