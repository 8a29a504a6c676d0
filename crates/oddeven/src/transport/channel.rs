//! In-process transport: one thread per participant, one channel per ordered
//! pair of participants.
use std::sync::{Arc, Barrier};

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::{trace, warn};

use super::Exchange;
use crate::error::TransportError;

struct Envelope<T> {
    phase: usize,
    payload: Vec<T>,
}

/// One participant's view of a fully connected channel mesh.
///
/// Messages from a given peer arrive on their own channel, so exchanges of a
/// pair are delivered in the order they were issued. Dropping an endpoint
/// disconnects it from every peer.
pub struct ChannelEndpoint<T> {
    rank: usize,
    outboxes: Vec<Option<Sender<Envelope<T>>>>,
    inboxes: Vec<Receiver<Envelope<T>>>,
    barrier: Arc<Barrier>,
    drop_at: Option<usize>,
}

/// Build `participants` connected endpoints, indexed by rank.
pub fn mesh<T>(participants: usize) -> Vec<ChannelEndpoint<T>> {
    let mut outboxes: Vec<Vec<Option<Sender<Envelope<T>>>>> =
        (0..participants).map(|_| Vec::with_capacity(participants)).collect();
    let mut inboxes: Vec<Vec<Receiver<Envelope<T>>>> =
        (0..participants).map(|_| Vec::with_capacity(participants)).collect();

    for from in 0..participants {
        for to in 0..participants {
            let (tx, rx) = unbounded();
            outboxes[from].push(Some(tx));
            inboxes[to].push(rx);
        }
    }

    let barrier = Arc::new(Barrier::new(participants.max(1)));
    outboxes
        .into_iter()
        .zip(inboxes)
        .enumerate()
        .map(|(rank, (outboxes, inboxes))| ChannelEndpoint {
            rank,
            outboxes,
            inboxes,
            barrier: Arc::clone(&barrier),
            drop_at: None,
        })
        .collect()
}

impl<T> ChannelEndpoint<T> {
    /// Make the exchange of `phase` fail as if the message were lost. The
    /// endpoint is disconnected from all peers at that point, so whoever
    /// waits on it fails too instead of hanging.
    pub fn drop_exchange_at(&mut self, phase: usize) {
        self.drop_at = Some(phase);
    }

    fn sever(&mut self) {
        for outbox in self.outboxes.iter_mut() {
            outbox.take();
        }
    }
}

impl<T: Clone + Send> Exchange<T> for ChannelEndpoint<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.inboxes.len()
    }

    fn exchange(
        &mut self,
        phase: usize,
        partner: usize,
        outgoing: &[T],
    ) -> Result<Vec<T>, TransportError> {
        let rank = self.rank;
        let disconnected = TransportError::Disconnected {
            rank,
            partner,
            phase,
        };

        if self.drop_at == Some(phase) {
            warn!(rank, partner, phase, "dropping exchange");
            self.sever();
            return Err(TransportError::Dropped {
                rank,
                partner,
                phase,
            });
        }

        let outbox = match self.outboxes.get(partner) {
            Some(Some(tx)) => tx,
            _ => return Err(disconnected),
        };
        outbox
            .send(Envelope {
                phase,
                payload: outgoing.to_vec(),
            })
            .map_err(|_| disconnected.clone())?;
        trace!(rank, partner, phase, len = outgoing.len(), "sent partition");

        let envelope = self.inboxes[partner].recv().map_err(|_| disconnected)?;
        if envelope.phase != phase {
            return Err(TransportError::OutOfOrder {
                rank,
                expected: phase,
                actual: envelope.phase,
            });
        }
        Ok(envelope.payload)
    }

    /// Blocks until all endpoints of the mesh arrive. A peer that never
    /// arrives stalls the barrier; callers only use it once every peer is
    /// known to be running.
    fn barrier(&mut self) -> Result<(), TransportError> {
        self.barrier.wait();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_swaps_buffers() {
        let mut endpoints = mesh::<u32>(2);
        let mut right = endpoints.pop().unwrap();
        let mut left = endpoints.pop().unwrap();

        let handle = std::thread::spawn(move || right.exchange(0, 0, &[3, 4]));
        let got_left = left.exchange(0, 1, &[1, 2]).unwrap();
        let got_right = handle.join().unwrap().unwrap();

        assert_eq!(got_left, vec![3, 4]);
        assert_eq!(got_right, vec![1, 2]);
    }

    #[test]
    fn dropped_peer_is_reported() {
        let mut endpoints = mesh::<u32>(2);
        let right = endpoints.pop().unwrap();
        let mut left = endpoints.pop().unwrap();
        drop(right);

        let err = left.exchange(0, 1, &[1]).unwrap_err();
        assert_eq!(
            err,
            TransportError::Disconnected {
                rank: 0,
                partner: 1,
                phase: 0
            }
        );
    }

    #[test]
    fn injected_drop_fails_both_sides() {
        let mut endpoints = mesh::<u32>(2);
        let mut right = endpoints.pop().unwrap();
        let mut left = endpoints.pop().unwrap();
        left.drop_exchange_at(0);

        let handle = std::thread::spawn(move || right.exchange(0, 0, &[9]));
        let err = left.exchange(0, 1, &[1]).unwrap_err();
        assert!(matches!(err, TransportError::Dropped { phase: 0, .. }));
        drop(left);

        let err = handle.join().unwrap().unwrap_err();
        assert!(matches!(err, TransportError::Disconnected { partner: 0, .. }));
    }

    #[test]
    fn mismatched_phase_is_rejected() {
        let mut endpoints = mesh::<u32>(2);
        let mut right = endpoints.pop().unwrap();
        let mut left = endpoints.pop().unwrap();

        let handle = std::thread::spawn(move || right.exchange(3, 0, &[9]));
        let err = left.exchange(2, 1, &[1]).unwrap_err();
        assert_eq!(
            err,
            TransportError::OutOfOrder {
                rank: 0,
                expected: 2,
                actual: 3
            }
        );
        let _ = handle.join();
    }
}
