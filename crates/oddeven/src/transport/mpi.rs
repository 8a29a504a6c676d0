//! MPI-backed transport.
//!
//! MPI's default error handler aborts the job on a failed send or receive, so
//! transport failures never come back as `Err` here: the whole run dies,
//! which satisfies the fail-fast contract.
use ::mpi::topology::Rank;
use ::mpi::traits::*;
use ::mpi::Tag;
use tracing::trace;

use super::Exchange;
use crate::error::TransportError;

/// Exchanges partitions over an MPI communicator. The phase index is used as
/// the message tag.
pub struct MpiExchange<'c, C> {
    comm: &'c C,
}

impl<'c, C: Communicator> MpiExchange<'c, C> {
    pub fn new(comm: &'c C) -> Self {
        MpiExchange { comm }
    }
}

impl<'c, C, T> Exchange<T> for MpiExchange<'c, C>
where
    C: Communicator,
    T: Equivalence,
{
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn exchange(
        &mut self,
        phase: usize,
        partner: usize,
        outgoing: &[T],
    ) -> Result<Vec<T>, TransportError> {
        let process = self.comm.process_at_rank(partner as Rank);
        let tag = phase as Tag;

        // Post the send first so both sides can block on their receive
        let received = ::mpi::request::scope(|scope| {
            let sreq = process.immediate_send_with_tag(scope, outgoing, tag);
            let (msg, _status) = process.receive_vec_with_tag::<T>(tag);
            sreq.wait();
            msg
        });

        trace!(
            rank = self.comm.rank(),
            partner,
            phase,
            len = received.len(),
            "received partition"
        );
        Ok(received)
    }

    fn barrier(&mut self) -> Result<(), TransportError> {
        self.comm.barrier();
        Ok(())
    }
}
