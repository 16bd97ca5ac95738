//! In-process communication group backed by crossbeam channels.

use std::collections::VecDeque;
use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};
use verge_core::Rank;

use crate::comm::{Comm, RecvTicket};
use crate::error::CommError;

/// One message in flight between two ranks.
#[derive(Debug)]
struct Packet {
    src: Rank,
    data: Vec<u8>,
}

/// An in-process rank endpoint.
///
/// Created in groups by [`LocalComm::group`]; each endpoint is moved
/// onto its own worker thread. Data traffic and collective traffic
/// travel on separate channel pairs so a collective can never consume
/// a particle message posted by an earlier round. Messages arriving
/// out of source order are stashed until a matching wait claims them;
/// per-source FIFO order is preserved because channels are FIFO and
/// the stash is scanned front to back.
pub struct LocalComm {
    rank: Rank,
    size: usize,
    data_tx: Vec<Sender<Packet>>,
    data_rx: Receiver<Packet>,
    ctl_tx: Vec<Sender<Packet>>,
    ctl_rx: Receiver<Packet>,
    data_stash: Mutex<VecDeque<Packet>>,
    ctl_stash: Mutex<VecDeque<Packet>>,
}

impl LocalComm {
    /// Create a fully connected group of `size` endpoints.
    ///
    /// The endpoint at index `r` has rank `r`.
    pub fn group(size: usize) -> Vec<LocalComm> {
        let mut data_txs = Vec::with_capacity(size);
        let mut data_rxs = Vec::with_capacity(size);
        let mut ctl_txs = Vec::with_capacity(size);
        let mut ctl_rxs = Vec::with_capacity(size);
        for _ in 0..size {
            let (tx, rx) = unbounded();
            data_txs.push(tx);
            data_rxs.push(rx);
            let (tx, rx) = unbounded();
            ctl_txs.push(tx);
            ctl_rxs.push(rx);
        }
        data_rxs
            .into_iter()
            .zip(ctl_rxs)
            .enumerate()
            .map(|(r, (data_rx, ctl_rx))| LocalComm {
                rank: Rank(r as u32),
                size,
                data_tx: data_txs.clone(),
                data_rx,
                ctl_tx: ctl_txs.clone(),
                ctl_rx,
                data_stash: Mutex::new(VecDeque::new()),
                ctl_stash: Mutex::new(VecDeque::new()),
            })
            .collect()
    }

    fn check_rank(&self, rank: Rank) -> Result<(), CommError> {
        if rank.index() >= self.size {
            return Err(CommError::RankOutOfRange {
                rank,
                size: self.size,
            });
        }
        Ok(())
    }

    /// Take the earliest stashed packet from `src`, if any.
    fn take_stashed(stash: &Mutex<VecDeque<Packet>>, src: Rank) -> Option<Packet> {
        let mut stash = stash.lock().expect("comm stash poisoned");
        let at = stash.iter().position(|p| p.src == src)?;
        stash.remove(at)
    }
}

impl Comm for LocalComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: Rank, msg: &[u8]) -> Result<(), CommError> {
        self.check_rank(dest)?;
        self.data_tx[dest.index()]
            .send(Packet {
                src: self.rank,
                data: msg.to_vec(),
            })
            .map_err(|_| CommError::Disconnected)
    }

    fn post_recv(&self, src: Rank, bytes: usize) -> RecvTicket {
        // The in-process substrate defers the transfer to the wait;
        // the ticket records what the wait must match.
        RecvTicket { src, bytes }
    }

    fn wait(&self, ticket: RecvTicket) -> Result<Vec<u8>, CommError> {
        self.check_rank(ticket.src)?;
        let packet = match Self::take_stashed(&self.data_stash, ticket.src) {
            Some(p) => p,
            None => loop {
                let p = self.data_rx.recv().map_err(|_| CommError::Disconnected)?;
                if p.src == ticket.src {
                    break p;
                }
                self.data_stash
                    .lock()
                    .expect("comm stash poisoned")
                    .push_back(p);
            },
        };
        if packet.data.len() != ticket.bytes {
            return Err(CommError::SizeMismatch {
                expected: ticket.bytes,
                got: packet.data.len(),
            });
        }
        Ok(packet.data)
    }

    fn all_to_all(&self, sends: &[u64]) -> Result<Vec<u64>, CommError> {
        if sends.len() != self.size {
            return Err(CommError::CountMismatch {
                expected: self.size,
                got: sends.len(),
            });
        }
        let me = self.rank.index();
        for r in 0..self.size {
            if r == me {
                continue;
            }
            self.ctl_tx[r]
                .send(Packet {
                    src: self.rank,
                    data: sends[r].to_le_bytes().to_vec(),
                })
                .map_err(|_| CommError::Disconnected)?;
        }

        let mut out = vec![0u64; self.size];
        out[me] = sends[me];
        let mut got = vec![false; self.size];
        got[me] = true;
        let mut remaining = self.size - 1;
        while remaining > 0 {
            let needed: Vec<Rank> = (0..self.size)
                .filter(|&r| !got[r])
                .map(|r| Rank(r as u32))
                .collect();
            let packet = needed
                .iter()
                .find_map(|&src| Self::take_stashed(&self.ctl_stash, src));
            let packet = match packet {
                Some(p) => p,
                None => self.ctl_rx.recv().map_err(|_| CommError::Disconnected)?,
            };
            let src = packet.src.index();
            if got[src] {
                // A value from the next collective round; keep it.
                self.ctl_stash
                    .lock()
                    .expect("comm stash poisoned")
                    .push_back(packet);
                continue;
            }
            let bytes: [u8; 8] =
                packet
                    .data
                    .as_slice()
                    .try_into()
                    .map_err(|_| CommError::SizeMismatch {
                        expected: 8,
                        got: packet.data.len(),
                    })?;
            out[src] = u64::from_le_bytes(bytes);
            got[src] = true;
            remaining -= 1;
        }
        Ok(out)
    }

    fn max_all(&self, value: u64) -> Result<u64, CommError> {
        let all = self.all_to_all(&vec![value; self.size])?;
        Ok(all.into_iter().max().unwrap_or(value))
    }
}
