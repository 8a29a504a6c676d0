/// Test suite and runner for MPI based programs
use mpi::traits::*;
use parallel_tests::sorting::{
    test_odd_even_sort, test_partner_exchange, test_sorted_input_is_stable,
};

fn main() {
    tracing_subscriber::fmt::init();

    let universe = mpi::initialize().unwrap();
    let world = universe.world();
    let rank = world.rank();

    if rank == 0 {
        println!("Testing Partner Exchange: ");
    };
    test_partner_exchange(&world);

    if rank == 0 {
        println!("Testing Odd-Even Sort: ");
    };
    test_odd_even_sort(&world);

    if rank == 0 {
        println!("Testing Sorted Input: ");
    };
    test_sorted_input_is_stable(&world);
}
