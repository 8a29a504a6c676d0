//! Runs every participant of a sort as a thread of the current process.
use tracing::{debug, error};

use crate::engine::{OddEvenSort, PhaseProfile};
use crate::error::{ConfigError, SortError, TransportError};
use crate::kernel::SortKernel;
use crate::layout::Layout;
use crate::transport::channel::{mesh, ChannelEndpoint};
use crate::transport::Exchange;

/// Final state of one participant.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub rank: usize,
    pub partition: Vec<T>,
    pub profile: PhaseProfile,
}

/// Scatter `data` over `participants` threads, sort and gather the result.
pub fn sort_in_process<T>(
    data: Vec<T>,
    participants: usize,
    kernel: SortKernel,
) -> Result<Vec<T>, SortError>
where
    T: Ord + Clone + Send,
{
    let (sorted, _) = sort_in_process_profiled(data, participants, kernel)?;
    Ok(sorted)
}

/// Like [`sort_in_process`], also returning each participant's profile.
pub fn sort_in_process_profiled<T>(
    data: Vec<T>,
    participants: usize,
    kernel: SortKernel,
) -> Result<(Vec<T>, Vec<PhaseProfile>), SortError>
where
    T: Ord + Clone + Send,
{
    let layout = Layout::new(data.len(), participants)?;
    let partitions = layout.scatter(data)?;
    let outcomes = run_in_process_with(
        layout,
        partitions,
        mesh(participants),
        participants,
        kernel,
    )?;

    let profiles = outcomes.iter().map(|o| o.profile).collect();
    let sorted = layout.gather(outcomes.into_iter().map(|o| o.partition).collect())?;
    Ok((sorted, profiles))
}

/// Run `phases` phases on pre-placed partitions with caller-supplied
/// endpoints. Outcomes come back in rank order.
///
/// If any participant fails, the whole run fails. Errors caused only by a
/// peer going away are reported after the error that made it go away.
pub fn run_in_process_with<T>(
    layout: Layout,
    partitions: Vec<Vec<T>>,
    endpoints: Vec<ChannelEndpoint<T>>,
    phases: usize,
    kernel: SortKernel,
) -> Result<Vec<Outcome<T>>, SortError>
where
    T: Ord + Clone + Send,
{
    let participants = layout.participants();
    if partitions.len() != participants {
        return Err(ConfigError::SizeMismatch {
            expected: participants,
            actual: partitions.len(),
        }
        .into());
    }
    if let Some(part) = partitions
        .iter()
        .find(|p| p.len() != layout.partition_len())
    {
        return Err(ConfigError::PartitionLength {
            expected: layout.partition_len(),
            actual: part.len(),
        }
        .into());
    }
    if endpoints.len() != participants {
        return Err(ConfigError::SizeMismatch {
            expected: participants,
            actual: endpoints.len(),
        }
        .into());
    }
    for (rank, endpoint) in endpoints.iter().enumerate() {
        if endpoint.rank() != rank || endpoint.size() != participants {
            return Err(ConfigError::RankOutOfRange {
                rank: endpoint.rank(),
                participants,
            }
            .into());
        }
    }

    debug!(participants, phases, len = layout.len(), %kernel, "spawning participants");

    let joined = crossbeam::scope(|scope| {
        let handles: Vec<_> = partitions
            .into_iter()
            .zip(endpoints)
            .map(|(mut partition, endpoint)| {
                scope.spawn(move |_| -> Result<Outcome<T>, SortError> {
                    let mut engine = OddEvenSort::new(endpoint, layout, kernel)?;
                    engine.transport_mut().barrier()?;
                    let profile = engine.run_phases(&mut partition, phases)?;
                    Ok(Outcome {
                        rank: engine.rank(),
                        partition,
                        profile,
                    })
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(TransportError::WorkerPanicked { rank }.into()))
            })
            .collect::<Vec<_>>()
    });

    // Every handle was joined inside the scope, so this only trips if the
    // scope itself could not complete.
    let results = match joined {
        Ok(results) => results,
        Err(_) => return Err(TransportError::WorkerPanicked { rank: 0 }.into()),
    };

    let mut outcomes = Vec::with_capacity(participants);
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => failures.push(e),
        }
    }

    if failures.is_empty() {
        return Ok(outcomes);
    }
    for failure in failures.iter() {
        error!(error = %failure, "participant failed");
    }
    let root = failures
        .iter()
        .position(|e| !is_peer_loss(e))
        .unwrap_or(0);
    Err(failures.swap_remove(root))
}

fn is_peer_loss(err: &SortError) -> bool {
    matches!(
        err,
        SortError::Transport(TransportError::Disconnected { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_with_uneven_values() {
        let data = vec![5, -1, 5, 0, 12, 3, 3, -8, 7];
        let sorted = sort_in_process(data, 3, SortKernel::Unstable).unwrap();
        assert_eq!(sorted, vec![-8, -1, 0, 3, 3, 5, 5, 7, 12]);
    }

    #[test]
    fn indivisible_input_fails_before_spawning() {
        let err = sort_in_process(vec![1, 2, 3], 2, SortKernel::Unstable).unwrap_err();
        assert_eq!(
            err,
            SortError::Config(ConfigError::Indivisible {
                len: 3,
                participants: 2
            })
        );
    }

    #[test]
    fn mismatched_endpoints_are_rejected() {
        let layout = Layout::new(4, 2).unwrap();
        let err = run_in_process_with(
            layout,
            vec![vec![1, 2], vec![3, 4]],
            mesh(3),
            2,
            SortKernel::Unstable,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SortError::Config(ConfigError::SizeMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn profiles_count_exchanges() {
        let data: Vec<u32> = (0..12).rev().collect();
        let (sorted, profiles) = sort_in_process_profiled(data, 4, SortKernel::Bubble).unwrap();
        assert_eq!(sorted, (0..12).collect::<Vec<_>>());
        // ranks 0 and 3 sit out odd phases
        let exchanges: Vec<_> = profiles.iter().map(|p| p.exchanges).collect();
        assert_eq!(exchanges, vec![2, 4, 4, 2]);
    }
}
