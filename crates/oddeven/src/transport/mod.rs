//! Pairwise exchange between participants.
//!
//! The engine only ever talks to one partner at a time, through a blocking
//! two-sided swap of whole partitions. Anything that offers that swap can
//! drive a sort: in-process channels ([`channel`]) or an MPI communicator
//! (`mpi` module, behind the `mpi` feature).
use crate::error::TransportError;

pub mod channel;
#[cfg(feature = "mpi")]
pub mod mpi;

pub trait Exchange<T> {
    /// Rank of this participant in `[0, size)`.
    fn rank(&self) -> usize;

    /// Number of participants reachable through this transport.
    fn size(&self) -> usize;

    /// Send `outgoing` to `partner` and receive the partner's buffer for the
    /// same `phase`. Both sides must call this for the swap to complete; the
    /// call blocks until it has.
    fn exchange(
        &mut self,
        phase: usize,
        partner: usize,
        outgoing: &[T],
    ) -> Result<Vec<T>, TransportError>;

    /// Wait until every participant reaches the barrier.
    fn barrier(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl<'a, T, X> Exchange<T> for &'a mut X
where
    X: Exchange<T> + ?Sized,
{
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn exchange(
        &mut self,
        phase: usize,
        partner: usize,
        outgoing: &[T],
    ) -> Result<Vec<T>, TransportError> {
        (**self).exchange(phase, partner, outgoing)
    }

    fn barrier(&mut self) -> Result<(), TransportError> {
        (**self).barrier()
    }
}
