//! The neighbour store: per-partition replica record buffers.

use indexmap::IndexMap;
use verge_core::{
    decode_records, encode_record, Particle, ParticleSchema, PartitionKey, ProtocolError,
    SchemaError,
};

/// Append-only accumulation of replica records, keyed by partition.
///
/// Process-wide state with a strict lifecycle: cleared at the start of
/// a full refresh, populated once (by local appends and transport
/// unpacking), then read-only until the next clear. Entries are never
/// selectively removed. Buffer lengths are exact multiples of the
/// schema's record size at all times.
#[derive(Clone, Debug)]
pub struct NeighbourStore {
    schema: ParticleSchema,
    slots: IndexMap<PartitionKey, Vec<u8>>,
}

impl NeighbourStore {
    /// An empty store for records of the given schema.
    pub fn new(schema: ParticleSchema) -> Self {
        Self {
            schema,
            slots: IndexMap::new(),
        }
    }

    /// The schema this store's records follow.
    pub fn schema(&self) -> ParticleSchema {
        self.schema
    }

    /// Encode one replica under `key`.
    pub fn append(&mut self, key: PartitionKey, p: &Particle) -> Result<(), SchemaError> {
        encode_record(self.slots.entry(key).or_default(), p, &self.schema)
    }

    /// Append already-encoded records under `key`.
    ///
    /// `bytes` must be an exact multiple of the record size.
    pub fn append_bytes(&mut self, key: PartitionKey, bytes: &[u8]) -> Result<(), ProtocolError> {
        if bytes.len() % self.schema.record_bytes() != 0 {
            return Err(ProtocolError::RecordSizeMismatch {
                payload_bytes: bytes.len(),
                record_bytes: self.schema.record_bytes(),
            });
        }
        self.slots.entry(key).or_default().extend_from_slice(bytes);
        Ok(())
    }

    /// The raw record bytes held for `key`, if any.
    pub fn bytes(&self, key: PartitionKey) -> Option<&[u8]> {
        self.slots.get(&key).map(Vec::as_slice)
    }

    /// Decode every record held for `key` (empty when the key is absent).
    pub fn records(&self, key: PartitionKey) -> Result<Vec<Particle>, ProtocolError> {
        match self.slots.get(&key) {
            Some(bytes) => decode_records(bytes, &self.schema),
            None => Ok(Vec::new()),
        }
    }

    /// Number of records held for `key`.
    pub fn record_count(&self, key: PartitionKey) -> usize {
        self.slots
            .get(&key)
            .map_or(0, |b| b.len() / self.schema.record_bytes())
    }

    /// Keys with an entry, in first-append order.
    pub fn keys(&self) -> impl Iterator<Item = PartitionKey> + '_ {
        self.slots.keys().copied()
    }

    /// Total bytes held across all keys.
    pub fn total_bytes(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether no records are held.
    pub fn is_empty(&self) -> bool {
        self.total_bytes() == 0
    }

    /// Discard every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(id: u64) -> Particle {
        Particle::new(&ParticleSchema::bare(), id, 0, [1.0, 2.0, 0.0])
    }

    #[test]
    fn append_then_decode_preserves_order() {
        let mut store = NeighbourStore::new(ParticleSchema::bare());
        let key = PartitionKey::new(0, 0);
        store.append(key, &particle(5)).unwrap();
        store.append(key, &particle(9)).unwrap();
        let got = store.records(key).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, 5);
        assert_eq!(got[1].id, 9);
        assert_eq!(store.record_count(key), 2);
    }

    #[test]
    fn absent_key_decodes_empty() {
        let store = NeighbourStore::new(ParticleSchema::bare());
        assert!(store.records(PartitionKey::new(1, 2)).unwrap().is_empty());
        assert_eq!(store.record_count(PartitionKey::new(1, 2)), 0);
    }

    #[test]
    fn ragged_bytes_rejected() {
        let mut store = NeighbourStore::new(ParticleSchema::bare());
        let err = store
            .append_bytes(PartitionKey::new(0, 0), &[0u8; 7])
            .unwrap_err();
        assert!(matches!(err, ProtocolError::RecordSizeMismatch { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn clear_discards_everything() {
        let mut store = NeighbourStore::new(ParticleSchema::bare());
        store.append(PartitionKey::new(0, 0), &particle(1)).unwrap();
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn shape_mismatch_rejected() {
        let mut store = NeighbourStore::new(ParticleSchema::new(2, 0));
        let err = store
            .append(PartitionKey::new(0, 0), &particle(1))
            .unwrap_err();
        assert_eq!(err.expected_reals, 2);
    }
}
