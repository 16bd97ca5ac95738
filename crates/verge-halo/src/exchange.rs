//! The halo exchanger: classification, packing, transport, unpacking.

use std::sync::Arc;

use indexmap::IndexMap;
use verge_comm::Comm;
use verge_core::{
    encode_record, CommTag, Particle, ParticleSchema, PartitionKey, ProtocolError, Rank,
    WIRE_VERSION,
};
use verge_grid::{Domain, IntVect, Layout, OwnerMask, RealVect};

use crate::classify;
use crate::error::HaloError;
use crate::metrics::ExchangeMetrics;
use crate::store::NeighbourStore;

/// One cached classification result: a particle index in its source
/// tile and the destination cell its replica targets.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CachedReplica {
    pub(crate) index: usize,
    pub(crate) dest_cell: IntVect,
}

/// Halo exchange context for one level of the spatial partition.
///
/// Owns the local tiles' particle sets, the per-tile owner masks, the
/// neighbour store, and the classification caches. Constructed
/// explicitly and threaded through calls; callers with a refined
/// hierarchy hold one exchanger per level.
///
/// A refresh cycle is `clear_neighbours` (when reusing) followed by
/// [`fill_neighbours`](Self::fill_neighbours); between full refreshes,
/// [`update_neighbours`](Self::update_neighbours) re-sends cached
/// replicas cheaply while only positions have changed.
pub struct HaloExchanger {
    pub(crate) schema: ParticleSchema,
    pub(crate) layout: Layout,
    pub(crate) halo: i32,
    pub(crate) comm: Arc<dyn Comm>,
    pub(crate) masks: IndexMap<PartitionKey, OwnerMask>,
    pub(crate) tiles: IndexMap<PartitionKey, Vec<Particle>>,
    pub(crate) store: NeighbourStore,
    pub(crate) cache: IndexMap<PartitionKey, Vec<CachedReplica>>,
    pub(crate) recv_counts: Vec<u64>,
    pub(crate) round_max: u64,
    pub(crate) metrics: ExchangeMetrics,
}

impl HaloExchanger {
    /// Create an exchanger over `layout` for this rank's tiles.
    ///
    /// Builds one halo-extended owner mask per local tile. Fails when
    /// the halo width is below one cell.
    pub fn new(
        layout: Layout,
        schema: ParticleSchema,
        halo: i32,
        comm: Arc<dyn Comm>,
    ) -> Result<Self, HaloError> {
        if halo < 1 {
            return Err(HaloError::InvalidHaloWidth { halo });
        }
        let rank = comm.rank();
        let mut masks = IndexMap::new();
        let mut tiles = IndexMap::new();
        for key in layout.local_keys(rank) {
            masks.insert(key, OwnerMask::build(&layout, key, halo)?);
            tiles.insert(key, Vec::new());
        }
        let size = comm.size();
        Ok(Self {
            schema,
            layout,
            halo,
            comm,
            masks,
            tiles,
            store: NeighbourStore::new(schema),
            cache: IndexMap::new(),
            recv_counts: vec![0; size],
            round_max: 0,
            metrics: ExchangeMetrics::default(),
        })
    }

    /// The record schema.
    pub fn schema(&self) -> ParticleSchema {
        self.schema
    }

    /// The halo width in cells.
    pub fn halo(&self) -> i32 {
        self.halo
    }

    /// The layout this exchanger partitions over.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Keys of this rank's tiles, in layout order.
    pub fn local_keys(&self) -> Vec<PartitionKey> {
        self.tiles.keys().copied().collect()
    }

    /// This tile's particles.
    pub fn particles(&self, key: PartitionKey) -> Result<&[Particle], HaloError> {
        self.tiles
            .get(&key)
            .map(Vec::as_slice)
            .ok_or(HaloError::NotLocal { key })
    }

    /// Mutable access to this tile's particles.
    ///
    /// Adding or removing particles invalidates any classification
    /// cache; follow structural changes with `clear_neighbours` and a
    /// full refresh.
    pub fn particles_mut(&mut self, key: PartitionKey) -> Result<&mut Vec<Particle>, HaloError> {
        self.tiles.get_mut(&key).ok_or(HaloError::NotLocal { key })
    }

    /// The neighbour store produced by the last refresh.
    pub fn store(&self) -> &NeighbourStore {
        &self.store
    }

    /// Metrics from the last refresh cycle.
    pub fn metrics(&self) -> &ExchangeMetrics {
        &self.metrics
    }

    /// Full refresh: classify, wrap, transport, and unpack replicas.
    ///
    /// Appends to the store and the classification caches; call
    /// [`clear_neighbours`](Self::clear_neighbours) first when reusing
    /// an exchanger that has already been filled. Every rank of the
    /// communication group must call this collectively.
    pub fn fill_neighbours(&mut self) -> Result<(), HaloError> {
        self.metrics = ExchangeMetrics::default();
        let rank = self.comm.rank();
        let mut outbound: IndexMap<CommTag, Vec<u8>> = IndexMap::new();

        for (key, particles) in &self.tiles {
            let mask = &self.masks[key];
            let tile_box = self.layout.tile(*key)?.bbox;
            let interior = tile_box.grow(-self.halo);
            let cache = self.cache.entry(*key).or_default();
            let domain = self.layout.domain();

            for (index, p) in particles.iter().enumerate() {
                let cell = domain.cell_of(RealVect(p.pos));
                if !tile_box.contains(cell) {
                    return Err(HaloError::ParticleOutsideTile { key: *key, id: p.id });
                }
                // More than a halo width from every face: nobody's neighbour.
                if interior.contains(cell) {
                    continue;
                }
                let shift = classify::shift_vector(cell, &tile_box, self.halo);
                if shift.is_zero() {
                    continue;
                }
                for dest_cell in classify::destination_cells(cell, shift, domain.dim()) {
                    if mask.owner_at(dest_cell).is_some() {
                        cache.push(CachedReplica { index, dest_cell });
                    }
                    pack_replica(
                        &self.layout,
                        mask,
                        rank,
                        self.schema,
                        &mut self.store,
                        &mut outbound,
                        &mut self.metrics,
                        dest_cell,
                        p,
                    )?;
                }
            }
        }

        self.transport(outbound, false)
    }

    /// Position-only refresh: re-send previously classified replicas.
    ///
    /// Rebuilds the store from the caches left by the last
    /// [`fill_neighbours`](Self::fill_neighbours), skipping both
    /// re-classification and the sizing phase — receive counts are
    /// reused, so byte volumes must be unchanged. Valid only while the
    /// set of near-boundary particles is unchanged (positions may
    /// move). Collective, like the full refresh.
    pub fn update_neighbours(&mut self) -> Result<(), HaloError> {
        self.metrics = ExchangeMetrics {
            sizing_skipped: true,
            ..ExchangeMetrics::default()
        };
        self.store.clear();
        let rank = self.comm.rank();
        let mut outbound: IndexMap<CommTag, Vec<u8>> = IndexMap::new();

        for (key, cached) in &self.cache {
            let particles = self.tiles.get(key).ok_or(HaloError::NotLocal { key: *key })?;
            let mask = &self.masks[key];
            for entry in cached {
                let p = particles.get(entry.index).ok_or(HaloError::StaleCache {
                    key: *key,
                    index: entry.index,
                })?;
                pack_replica(
                    &self.layout,
                    mask,
                    rank,
                    self.schema,
                    &mut self.store,
                    &mut outbound,
                    &mut self.metrics,
                    entry.dest_cell,
                    p,
                )?;
            }
        }

        self.transport(outbound, true)
    }

    /// Discard the store and the classification caches.
    pub fn clear_neighbours(&mut self) {
        self.store.clear();
        self.cache.clear();
    }

    /// Two-phase exchange of the outbound buffers.
    ///
    /// Frames one message per destination rank, optionally re-runs the
    /// sizing phase, posts every expected receive before sending, then
    /// waits and unpacks.
    fn transport(
        &mut self,
        outbound: IndexMap<CommTag, Vec<u8>>,
        reuse_recv_counts: bool,
    ) -> Result<(), HaloError> {
        // Message layout per destination rank:
        //   version (u8) | tile count (u32)
        //   then per tag: grid (i32) | tile (i32) | len (u32) | payload
        let mut tile_counts: IndexMap<Rank, u32> = IndexMap::new();
        for tag in outbound.keys() {
            *tile_counts.entry(tag.rank).or_insert(0) += 1;
        }
        let mut messages: IndexMap<Rank, Vec<u8>> = IndexMap::new();
        for (&rank, &count) in &tile_counts {
            let mut msg = Vec::new();
            msg.push(WIRE_VERSION);
            msg.extend_from_slice(&count.to_le_bytes());
            messages.insert(rank, msg);
        }
        for (tag, payload) in &outbound {
            let msg = messages
                .get_mut(&tag.rank)
                .expect("message framed for every outbound tag");
            msg.extend_from_slice(&tag.key.grid.0.to_le_bytes());
            msg.extend_from_slice(&tag.key.tile.0.to_le_bytes());
            msg.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            msg.extend_from_slice(payload);
        }

        if !reuse_recv_counts {
            self.gather_recv_counts(&messages)?;
        }
        if self.round_max == 0 {
            return Ok(());
        }

        let me = self.comm.rank();
        debug_assert_eq!(
            self.recv_counts[me.index()],
            0,
            "replicas for the local rank bypass transport"
        );

        // Post every expected receive before the first send.
        let mut tickets = Vec::new();
        for (src, &bytes) in self.recv_counts.iter().enumerate() {
            if bytes > 0 {
                tickets.push(self.comm.post_recv(Rank(src as u32), bytes as usize));
            }
        }
        for (rank, msg) in &messages {
            self.metrics.bytes_sent += msg.len() as u64;
            self.comm.send(*rank, msg)?;
        }
        for ticket in tickets {
            let data = self.comm.wait(ticket)?;
            self.metrics.bytes_received += data.len() as u64;
            self.unpack(&data)?;
        }
        Ok(())
    }

    /// Sizing phase: learn how many bytes arrive from every rank.
    ///
    /// The global maximum of per-rank send totals decides whether the
    /// round is a no-op; the all-to-all is skipped entirely when no
    /// rank has anything to send.
    fn gather_recv_counts(
        &mut self,
        messages: &IndexMap<Rank, Vec<u8>>,
    ) -> Result<(), HaloError> {
        let size = self.comm.size();
        let mut sends = vec![0u64; size];
        let mut local_total: u64 = 0;
        for (rank, msg) in messages {
            sends[rank.index()] = msg.len() as u64;
            local_total += msg.len() as u64;
        }
        self.recv_counts = vec![0; size];
        self.round_max = self.comm.max_all(local_total)?;
        if self.round_max == 0 {
            return Ok(());
        }
        self.recv_counts = self.comm.all_to_all(&sends)?;
        Ok(())
    }

    /// Unpack one received message into the store.
    fn unpack(&mut self, data: &[u8]) -> Result<(), HaloError> {
        let record = self.schema.record_bytes();
        if data.is_empty() {
            return Err(ProtocolError::Truncated {
                needed: 1,
                available: 0,
            }
            .into());
        }
        if data[0] != WIRE_VERSION {
            return Err(ProtocolError::UnsupportedVersion { found: data[0] }.into());
        }
        let mut off = 1;
        let tile_count = read_u32(data, &mut off)?;
        for _ in 0..tile_count {
            let grid = read_i32(data, &mut off)?;
            let tile = read_i32(data, &mut off)?;
            let len = read_u32(data, &mut off)? as usize;
            if len % record != 0 {
                return Err(ProtocolError::RecordSizeMismatch {
                    payload_bytes: len,
                    record_bytes: record,
                }
                .into());
            }
            if len == 0 {
                continue;
            }
            if off + len > data.len() {
                return Err(ProtocolError::Truncated {
                    needed: len,
                    available: data.len() - off,
                }
                .into());
            }
            self.store
                .append_bytes(PartitionKey::new(grid, tile), &data[off..off + len])?;
            off += len;
            self.metrics.frames_unpacked += 1;
        }
        if off != data.len() {
            return Err(ProtocolError::TrailingBytes {
                remaining: data.len() - off,
            }
            .into());
        }
        Ok(())
    }
}

/// Serialize one replica toward its destination partition.
///
/// The single dispatch point for both halves of the protocol: a
/// sentinel destination drops the replica, a local-rank destination
/// appends it to the store, and a remote destination appends it to
/// that tag's outbound buffer. The periodic wrap is applied to the
/// copy in every case.
#[allow(clippy::too_many_arguments)]
fn pack_replica(
    layout: &Layout,
    mask: &OwnerMask,
    local_rank: Rank,
    schema: ParticleSchema,
    store: &mut NeighbourStore,
    outbound: &mut IndexMap<CommTag, Vec<u8>>,
    metrics: &mut ExchangeMetrics,
    dest_cell: IntVect,
    p: &Particle,
) -> Result<(), HaloError> {
    let Some(dest) = mask.owner_at(dest_cell) else {
        return Ok(());
    };
    let dest_rank = layout
        .rank_of(dest.grid)
        .ok_or(verge_grid::GridError::UnknownTile { key: dest })?;
    let mut replica = p.clone();
    periodic_shift(layout.domain(), &mut replica, dest_cell);
    if dest_rank == local_rank {
        store.append(dest, &replica)?;
        metrics.local_appends += 1;
    } else {
        let buf = outbound
            .entry(CommTag {
                rank: dest_rank,
                key: dest,
            })
            .or_default();
        encode_record(buf, &replica, &schema)?;
        metrics.remote_buffered += 1;
    }
    Ok(())
}

/// Shift a replica's position across periodic domain faces.
///
/// One whole-domain-length shift per periodic axis the destination
/// cell crosses: subtract when beyond the high face, add when below
/// the low face. Other axes are untouched.
fn periodic_shift(domain: &Domain, p: &mut Particle, dest_cell: IntVect) {
    let cells = domain.cells();
    for axis in 0..domain.dim() {
        if !domain.is_periodic(axis) {
            continue;
        }
        if dest_cell[axis] < cells.lo[axis] {
            p.pos[axis] += domain.length(axis);
        } else if dest_cell[axis] > cells.hi[axis] {
            p.pos[axis] -= domain.length(axis);
        }
    }
}

/// Read a little-endian u32, advancing the offset.
fn read_u32(data: &[u8], off: &mut usize) -> Result<u32, ProtocolError> {
    if *off + 4 > data.len() {
        return Err(ProtocolError::Truncated {
            needed: 4,
            available: data.len() - *off,
        });
    }
    let v = u32::from_le_bytes(data[*off..*off + 4].try_into().unwrap());
    *off += 4;
    Ok(v)
}

/// Read a little-endian i32, advancing the offset.
fn read_i32(data: &[u8], off: &mut usize) -> Result<i32, ProtocolError> {
    if *off + 4 > data.len() {
        return Err(ProtocolError::Truncated {
            needed: 4,
            available: data.len() - *off,
        });
    }
    let v = i32::from_le_bytes(data[*off..*off + 4].try_into().unwrap());
    *off += 4;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verge_grid::CellBox;

    fn domain2(periodic: [bool; 3]) -> Domain {
        Domain::new(
            CellBox::new2([0, 0], [7, 7]),
            RealVect::zero(),
            RealVect::new2(1.0, 1.0),
            periodic,
        )
        .unwrap()
    }

    #[test]
    fn periodic_shift_moves_one_domain_length() {
        let domain = domain2([true, true, false]);
        let mut p = Particle::new(&ParticleSchema::bare(), 1, 0, [0.5, 7.5, 0.0]);
        // Crossing the low x face and the high y face.
        periodic_shift(&domain, &mut p, IntVect::new2(-2, 9));
        assert_eq!(p.pos, [8.5, -0.5, 0.0]);
    }

    #[test]
    fn periodic_shift_ignores_non_periodic_axes() {
        let domain = domain2([true, false, false]);
        let mut p = Particle::new(&ParticleSchema::bare(), 1, 0, [0.5, 0.5, 0.0]);
        periodic_shift(&domain, &mut p, IntVect::new2(-1, -1));
        assert_eq!(p.pos, [8.5, 0.5, 0.0]);
    }

    #[test]
    fn periodic_shift_is_identity_inside_domain() {
        let domain = domain2([true, true, false]);
        let mut p = Particle::new(&ParticleSchema::bare(), 1, 0, [3.5, 4.5, 0.0]);
        periodic_shift(&domain, &mut p, IntVect::new2(5, 4));
        assert_eq!(p.pos, [3.5, 4.5, 0.0]);
    }

    #[test]
    fn read_helpers_reject_short_buffers() {
        let mut off = 0;
        assert!(matches!(
            read_u32(&[1, 2], &mut off),
            Err(ProtocolError::Truncated {
                needed: 4,
                available: 2
            })
        ));
        let mut off = 1;
        assert!(matches!(
            read_i32(&[0, 1, 2, 3], &mut off),
            Err(ProtocolError::Truncated { .. })
        ));
    }
}
