//! Per-refresh exchange metrics.

/// Counters collected during one refresh cycle.
///
/// Reset at the start of every [`fill_neighbours`] and
/// [`update_neighbours`] call; consumers read them afterwards for
/// telemetry and load-balance diagnostics.
///
/// [`fill_neighbours`]: crate::HaloExchanger::fill_neighbours
/// [`update_neighbours`]: crate::HaloExchanger::update_neighbours
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeMetrics {
    /// Replicas appended directly to the store (destination on this rank).
    pub local_appends: u64,
    /// Replicas encoded into outbound per-tag buffers.
    pub remote_buffered: u64,
    /// Bytes handed to the substrate, framing included.
    pub bytes_sent: u64,
    /// Bytes received from the substrate, framing included.
    pub bytes_received: u64,
    /// Non-empty tile frames unpacked into the store.
    pub frames_unpacked: u64,
    /// Whether the sizing phase was skipped (receive counts reused).
    pub sizing_skipped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = ExchangeMetrics::default();
        assert_eq!(m.local_appends, 0);
        assert_eq!(m.remote_buffered, 0);
        assert_eq!(m.bytes_sent, 0);
        assert_eq!(m.bytes_received, 0);
        assert_eq!(m.frames_unpacked, 0);
        assert!(!m.sizing_skipped);
    }
}
