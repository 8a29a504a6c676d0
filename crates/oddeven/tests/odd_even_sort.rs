/// End-to-end checks of the odd-even transposition sort over the channel mesh.
use rand::rngs::StdRng;
use rand::{distributions::Uniform, Rng, SeedableRng};

use oddeven::kernel::is_sorted;
use oddeven::runner::{run_in_process_with, Outcome};
use oddeven::transport::channel::mesh;
use oddeven::{sort_in_process, Layout, SortError, SortKernel, TransportError};

fn run_phases(partitions: Vec<Vec<u32>>, phases: usize) -> Vec<Vec<u32>> {
    let participants = partitions.len();
    let len = partitions.iter().map(Vec::len).sum();
    let layout = Layout::new(len, participants).unwrap();
    let outcomes = run_in_process_with(
        layout,
        partitions,
        mesh(participants),
        phases,
        SortKernel::Unstable,
    )
    .unwrap();
    outcomes.into_iter().map(|o: Outcome<u32>| o.partition).collect()
}

fn scenario() -> Vec<Vec<u32>> {
    vec![vec![8, 3], vec![1, 6], vec![5, 2], vec![7, 4]]
}

#[test]
fn four_participants_phase_by_phase() {
    assert_eq!(
        run_phases(scenario(), 1),
        vec![vec![1, 3], vec![6, 8], vec![2, 4], vec![5, 7]]
    );
    // ranks 0 and 3 are unpaired in odd phases, so only their local sort shows
    assert_eq!(
        run_phases(scenario(), 2),
        vec![vec![1, 3], vec![2, 4], vec![6, 8], vec![5, 7]]
    );
    assert_eq!(
        run_phases(scenario(), 3),
        vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]
    );
    assert_eq!(
        run_phases(scenario(), 4),
        vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]
    );
}

#[test]
fn random_inputs_sort_for_every_participant_count() {
    let mut rng = StdRng::seed_from_u64(2024);
    let range = Uniform::from(0..500u32);

    for participants in 1..=8 {
        for &chunk in [0usize, 1, 3, 17].iter() {
            let len = participants * chunk;
            let data: Vec<u32> = (0..len).map(|_| rng.sample(&range)).collect();
            let mut expected = data.clone();
            expected.sort();

            let sorted = sort_in_process(data, participants, SortKernel::Unstable).unwrap();
            assert_eq!(sorted, expected, "P={} chunk={}", participants, chunk);
        }
    }
}

#[test]
fn reversed_input_is_worst_case_but_still_sorts() {
    for participants in [2usize, 5, 8].iter().copied() {
        let data: Vec<i64> = (0..(participants as i64 * 6)).rev().collect();
        let sorted = sort_in_process(data, participants, SortKernel::Bubble).unwrap();
        assert!(is_sorted(&sorted));
        assert_eq!(sorted.first(), Some(&0));
    }
}

#[test]
fn sorted_partitions_are_left_alone_by_extra_phases() {
    let partitions = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
    for phases in [3usize, 4, 9].iter().copied() {
        assert_eq!(run_phases(partitions.clone(), phases), partitions);
    }
}

#[test]
fn duplicates_are_preserved() {
    let data = vec![4u32, 4, 1, 1, 4, 1, 2, 2];
    let sorted = sort_in_process(data, 4, SortKernel::Unstable).unwrap();
    assert_eq!(sorted, vec![1, 1, 1, 2, 2, 4, 4, 4]);
}

#[test]
fn indivisible_input_is_rejected() {
    let err = sort_in_process(vec![1u32; 10], 4, SortKernel::Unstable).unwrap_err();
    assert!(matches!(
        err,
        SortError::Config(oddeven::ConfigError::Indivisible {
            len: 10,
            participants: 4
        })
    ));
}

#[test]
fn dropped_exchange_fails_the_run() {
    let layout = Layout::new(8, 4).unwrap();
    let mut endpoints = mesh::<u32>(4);
    endpoints[2].drop_exchange_at(1);

    let err = run_in_process_with(layout, scenario(), endpoints, 4, SortKernel::Unstable)
        .unwrap_err();

    assert_eq!(
        err,
        SortError::Transport(TransportError::Dropped {
            rank: 2,
            partner: 1,
            phase: 1
        })
    );
}

#[test]
fn dropped_exchange_in_first_phase_fails_the_run() {
    let layout = Layout::new(8, 4).unwrap();
    let mut endpoints = mesh::<u32>(4);
    endpoints[0].drop_exchange_at(0);

    let err = run_in_process_with(layout, scenario(), endpoints, 4, SortKernel::Unstable)
        .unwrap_err();

    assert!(matches!(
        err,
        SortError::Transport(TransportError::Dropped { rank: 0, .. })
    ));
}
