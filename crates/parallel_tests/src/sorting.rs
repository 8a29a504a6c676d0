/// Tests for the partner rule and the odd-even transposition sort over MPI.
extern crate mpi;
extern crate oddeven;

use mpi::collective::SystemOperation;
use mpi::topology::{Rank, SystemCommunicator};
use mpi::traits::*;

use rand::{distributions::Uniform, Rng};

use oddeven::partner::partner;
use oddeven::transport::mpi::MpiExchange;
use oddeven::{Layout, OddEvenSort, SortKernel};

pub fn test_partner_exchange(world: &SystemCommunicator) {
    let size = world.size();
    let rank: Rank = world.rank();

    // Every rank swaps its rank with the computed partner; both sides must
    // agree on who they talked to.
    for phase in 0..(2 * size as usize) {
        if let Some(other) = partner(phase, rank as usize, size as usize) {
            let partner_process = world.process_at_rank(other as Rank);
            let mut got: Rank = -1;
            mpi::point_to_point::send_receive_into(
                &rank,
                &partner_process,
                &mut got,
                &partner_process,
            );
            assert_eq!(got as usize, other, "phase {}", phase);
        }
    }

    if rank == 0 {
        println!("... Partner Exchange Passed!")
    }
}

pub fn test_odd_even_sort(world: &SystemCommunicator) {
    let size = world.size();
    let rank: Rank = world.rank();

    // Sample nparticles randomly in range [min, max)
    let nparticles: u64 = 1000;
    let min = 0;
    let max = 10000000000;
    let range = Uniform::from(min..max);
    let mut arr: Vec<u64> = rand::thread_rng()
        .sample_iter(&range)
        .take(nparticles as usize)
        .collect();

    let layout = Layout::new((nparticles as usize) * (size as usize), size as usize).unwrap();
    let mut engine =
        OddEvenSort::new(MpiExchange::new(world), layout, SortKernel::Unstable).unwrap();
    let profile = engine.run(&mut arr).unwrap();
    assert_eq!(profile.phases, size as usize);

    // Test that the minimum on this process is greater than the maximum on the previous process
    if rank > 0 {
        let min: u64 = *arr.iter().min().unwrap();
        world.process_at_rank(rank - 1).send(&min);
    }

    if rank < (size - 1) {
        let (rec, _) = world.process_at_rank(rank + 1).receive_vec::<u64>();
        let max: u64 = *arr.iter().max().unwrap();
        assert!(max <= rec[0], "{:?} {:?}", max, rec);
    }

    // Test that array is sorted on each process
    let mut prev = arr[0];
    for &elem in arr.iter().skip(1) {
        assert!(elem >= prev);
        prev = elem;
    }

    // Test that no elements of the distributed array are lost
    let mut problem_size: u64 = 0;
    world.all_reduce_into(&(arr.len() as u64), &mut problem_size, SystemOperation::sum());
    assert_eq!(problem_size, (size as u64) * nparticles);

    if rank == 0 {
        println!("... Odd-Even Sort Passed!")
    }
}

pub fn test_sorted_input_is_stable(world: &SystemCommunicator) {
    let size = world.size();
    let rank: Rank = world.rank();
    let chunk = 16u64;

    let mut arr: Vec<u64> = (0..chunk).map(|i| (rank as u64) * chunk + i).collect();
    let expected = arr.clone();

    let layout = Layout::new((chunk as usize) * (size as usize), size as usize).unwrap();
    let mut engine =
        OddEvenSort::new(MpiExchange::new(world), layout, SortKernel::Unstable).unwrap();
    engine.run_phases(&mut arr, 2 * size as usize).unwrap();

    assert_eq!(arr, expected);

    if rank == 0 {
        println!("... Sorted Input Unchanged Passed!")
    }
}
