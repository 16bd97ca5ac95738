//! The core `Comm` trait.

use verge_core::Rank;

use crate::error::CommError;

/// A posted (not yet completed) receive.
///
/// Returned by [`Comm::post_recv`] and redeemed by [`Comm::wait`]. The
/// halo exchange posts every expected receive before issuing any send,
/// then waits on each; an implementation may begin the transfer at
/// post time or defer it entirely to the wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecvTicket {
    /// The rank the message will come from.
    pub src: Rank,
    /// The exact byte length the message must have.
    pub bytes: usize,
}

/// Minimal communication surface for the halo exchange.
///
/// One instance per participating rank. Point-to-point sends are
/// blocking (complete when the message is handed off); receives are
/// posted then waited on. The two collectives are called by every rank
/// of the group in the same order — the substrate is bulk-synchronous
/// and a missing participant deadlocks the round.
pub trait Comm: Send + Sync {
    /// This process's rank.
    fn rank(&self) -> Rank;

    /// Number of ranks in the group.
    fn size(&self) -> usize;

    /// Blocking send of `msg` to `dest`.
    fn send(&self, dest: Rank, msg: &[u8]) -> Result<(), CommError>;

    /// Post a receive for an exactly `bytes`-long message from `src`.
    fn post_recv(&self, src: Rank, bytes: usize) -> RecvTicket;

    /// Block until the posted receive completes; returns the message.
    ///
    /// Fails with [`CommError::SizeMismatch`] if the arriving message's
    /// length disagrees with the ticket.
    fn wait(&self, ticket: RecvTicket) -> Result<Vec<u8>, CommError>;

    /// All-to-all exchange of one `u64` per rank.
    ///
    /// `sends[r]` is delivered to rank `r`; the result holds one value
    /// received from every rank (the local slot comes back unchanged).
    fn all_to_all(&self, sends: &[u64]) -> Result<Vec<u64>, CommError>;

    /// Global maximum of `value` across all ranks.
    fn max_all(&self, value: u64) -> Result<u64, CommError>;
}
