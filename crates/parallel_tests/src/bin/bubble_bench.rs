/// Timed runs of the odd-even transposition sort with one MPI process per
/// participant, against a sequential sort on the root.
use std::error::Error;

use clap::Parser;
use mpi::collective::SystemOperation;
use mpi::topology::Rank;
use mpi::traits::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use oddeven::bench::random_input;
use oddeven::kernel::is_sorted;
use oddeven::transport::mpi::MpiExchange;
use oddeven::{Layout, OddEvenSort, SortKernel};

#[derive(Parser, Debug)]
#[command(about = "mpirun -np <procs> bubble_bench <runs>")]
struct Opts {
    #[arg(default_value_t = 100)]
    runs: usize,
    #[arg(long, default_value_t = 200_000)]
    len: usize,
    #[arg(long, default_value_t = 1000)]
    max_value: u32,
    #[arg(long, default_value_t = SortKernel::Unstable)]
    kernel: SortKernel,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let universe = mpi::initialize().ok_or("MPI is already initialized")?;
    let world = universe.world();
    let size = world.size();
    let rank: Rank = world.rank();
    let root = world.process_at_rank(0);

    if opts.runs == 0 || opts.max_value == 0 {
        if rank == 0 {
            eprintln!("runs and max value must be greater than 0");
        }
        return Err("invalid arguments".into());
    }

    // Every rank sees the same layout error, so all of them stop here
    let layout = match Layout::new(opts.len, size as usize) {
        Ok(layout) => layout,
        Err(e) => {
            if rank == 0 {
                eprintln!("{}", e);
            }
            return Err(e.into());
        }
    };

    let mut engine = OddEvenSort::new(MpiExchange::new(&world), layout, opts.kernel)?;
    let mut local = vec![0u32; layout.partition_len()];
    let mut full: Vec<u32> = Vec::new();

    let mut total_seq = 0.0;
    let mut local_par = 0.0;
    let mut failed = 0;

    for run in 0..opts.runs {
        if rank == 0 {
            let mut rng = match opts.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
                None => StdRng::from_entropy(),
            };
            full = random_input(opts.len, opts.max_value, &mut rng);

            let mut copy = full.clone();
            let start = mpi::time();
            opts.kernel.sort(&mut copy);
            total_seq += mpi::time() - start;

            root.scatter_into_root(&full[..], &mut local[..]);
        } else {
            root.scatter_into(&mut local[..]);
        }

        world.barrier();
        let start = mpi::time();

        engine.run(&mut local)?;

        world.barrier();
        local_par += mpi::time() - start;

        if rank == 0 {
            root.gather_into_root(&local[..], &mut full[..]);
            if !is_sorted(&full) {
                warn!(run, "parallel sort failed");
                failed += 1;
            }
        } else {
            root.gather_into(&local[..]);
        }
    }

    if rank == 0 {
        let mut max_par = 0.0;
        root.reduce_into_root(&local_par, &mut max_par, SystemOperation::max());

        let runs = opts.runs as f64;
        println!("Runs: {}", opts.runs);
        println!(" Mean sequential sort time {:.6} s", total_seq / runs);
        println!(
            " Mean parallel sort time with {} processes {:.6} s",
            size,
            max_par / runs
        );
        println!(" Failed runs {}", failed);
    } else {
        root.reduce_into(&local_par, SystemOperation::max());
    }

    Ok(())
}
