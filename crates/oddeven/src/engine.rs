use std::marker::PhantomData;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{ConfigError, SortError};
use crate::kernel::SortKernel;
use crate::layout::Layout;
use crate::partner::partner;
use crate::transport::Exchange;

/// Time spent in each part of a run on one participant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseProfile {
    pub phases: usize,
    pub exchanges: usize,
    pub local_sort: Duration,
    pub communication: Duration,
    pub merge_split: Duration,
    pub total: Duration,
}

/// Odd-even transposition sort, driven from one participant.
///
/// Every participant builds its own `OddEvenSort` over the same [`Layout`] and
/// calls [`run`](OddEvenSort::run) with the partition it owns. The partition
/// is sorted in place; once all participants return, partitions read in rank
/// order form the sorted sequence.
pub struct OddEvenSort<T, X> {
    transport: X,
    layout: Layout,
    kernel: SortKernel,
    _elem: PhantomData<fn(T)>,
}

impl<T, X> OddEvenSort<T, X>
where
    T: Ord + Clone,
    X: Exchange<T>,
{
    pub fn new(transport: X, layout: Layout, kernel: SortKernel) -> Result<Self, SortError> {
        let size = transport.size();
        if size != layout.participants() {
            return Err(ConfigError::SizeMismatch {
                expected: layout.participants(),
                actual: size,
            }
            .into());
        }

        let rank = transport.rank();
        if rank >= size {
            return Err(ConfigError::RankOutOfRange {
                rank,
                participants: size,
            }
            .into());
        }

        Ok(OddEvenSort {
            transport,
            layout,
            kernel,
            _elem: PhantomData,
        })
    }

    pub fn rank(&self) -> usize {
        self.transport.rank()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn transport_mut(&mut self) -> &mut X {
        &mut self.transport
    }

    /// Sort across all participants: one phase per participant.
    pub fn run(&mut self, partition: &mut [T]) -> Result<PhaseProfile, SortError> {
        let phases = self.layout.participants();
        self.run_phases(partition, phases)
    }

    /// Run exactly `phases` phases. Fewer than the participant count does not
    /// guarantee a sorted result; more is redundant but harmless.
    pub fn run_phases(
        &mut self,
        partition: &mut [T],
        phases: usize,
    ) -> Result<PhaseProfile, SortError> {
        let expected = self.layout.partition_len();
        if partition.len() != expected {
            return Err(ConfigError::PartitionLength {
                expected,
                actual: partition.len(),
            }
            .into());
        }

        let rank = self.transport.rank();
        let participants = self.layout.participants();
        let mut profile = PhaseProfile::default();
        let start = Instant::now();

        for phase in 0..phases {
            let t = Instant::now();
            self.kernel.sort(partition);
            profile.local_sort += t.elapsed();
            profile.phases += 1;

            let other = match partner(phase, rank, participants) {
                Some(other) => other,
                None => {
                    debug!(rank, phase, "no partner this phase");
                    continue;
                }
            };

            let t = Instant::now();
            let received = self.transport.exchange(phase, other, partition)?;
            profile.communication += t.elapsed();

            if received.len() != expected {
                return Err(SortError::Protocol {
                    phase,
                    partner: other,
                    expected,
                    actual: received.len(),
                });
            }

            let t = Instant::now();
            merge_split(partition, received, rank < other, self.kernel);
            profile.merge_split += t.elapsed();
            profile.exchanges += 1;
            debug!(rank, phase, partner = other, "merge-split done");
        }

        profile.total = start.elapsed();
        info!(
            rank,
            phases = profile.phases,
            exchanges = profile.exchanges,
            total_ms = profile.total.as_millis() as u64,
            "odd-even sort finished"
        );
        Ok(profile)
    }
}

/// Merge `own` with `received`, sort the result and keep the lower half when
/// `keep_low`, the upper half otherwise.
fn merge_split<T: Ord + Clone>(
    own: &mut [T],
    received: Vec<T>,
    keep_low: bool,
    kernel: SortKernel,
) {
    let n = own.len();
    let mut merged = Vec::with_capacity(2 * n);
    merged.extend_from_slice(own);
    merged.extend(received);
    kernel.sort(&mut merged);

    let half = if keep_low {
        merged.truncate(n);
        merged
    } else {
        merged.split_off(n)
    };
    for (slot, value) in own.iter_mut().zip(half) {
        *slot = value;
    }
}
