/// Benchmark of the odd-even transposition sort with one thread per participant
use std::error::Error;

use clap::Parser;
use tracing::info;

use oddeven::bench::{run_benchmark, BenchConfig};
use oddeven::SortKernel;

#[derive(Parser, Debug)]
#[command(version, about = "Sequential vs. odd-even transposition sort timings")]
struct Opts {
    /// Number of timed runs
    #[arg(default_value_t = 100)]
    runs: usize,
    /// Total number of elements, must be divisible by --workers
    #[arg(long, default_value_t = 200_000)]
    len: usize,
    #[arg(long, default_value_t = 4)]
    workers: usize,
    /// Values are drawn from [0, max-value)
    #[arg(long, default_value_t = 1000)]
    max_value: u32,
    /// Local sort: `unstable` or `bubble`
    #[arg(long, default_value_t = SortKernel::Unstable)]
    kernel: SortKernel,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    let config = BenchConfig {
        runs: opts.runs,
        len: opts.len,
        participants: opts.workers,
        max_value: opts.max_value,
        kernel: opts.kernel,
        seed: opts.seed,
    };
    info!(?config, "starting benchmark");

    let report = run_benchmark(&config)?;
    println!("{}", report);
    Ok(())
}
