//! Repeated timed runs comparing a sequential sort against the
//! odd-even transposition sort on random integer input.
use std::fmt;
use std::time::{Duration, Instant};

use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{ConfigError, SortError};
use crate::kernel::{is_sorted, SortKernel};
use crate::layout::Layout;
use crate::runner::sort_in_process_profiled;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("number of runs must be greater than 0")]
    NoRuns,
    #[error("max value must be greater than 0")]
    EmptyRange,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sort(#[from] SortError),
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub runs: usize,
    pub len: usize,
    pub participants: usize,
    /// Input values are drawn from `[0, max_value)`.
    pub max_value: u32,
    pub kernel: SortKernel,
    /// Base seed; run `i` uses `seed + i`. Fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            runs: 100,
            len: 200_000,
            participants: 4,
            max_value: 1000,
            kernel: SortKernel::default(),
            seed: None,
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<Layout, BenchError> {
        if self.runs == 0 {
            return Err(BenchError::NoRuns);
        }
        if self.max_value == 0 {
            return Err(BenchError::EmptyRange);
        }
        Ok(Layout::new(self.len, self.participants)?)
    }
}

/// Mean timings over all runs of a benchmark.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub runs: usize,
    pub len: usize,
    pub participants: usize,
    pub kernel: SortKernel,
    pub sequential: Duration,
    pub parallel: Duration,
    /// Mean over runs of the slowest participant's in-engine time.
    pub slowest_participant: Duration,
    pub failed_runs: usize,
}

impl BenchReport {
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.as_secs_f64();
        if parallel > 0.0 {
            self.sequential.as_secs_f64() / parallel
        } else {
            0.0
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "runs={} n={} participants={} kernel={}",
            self.runs, self.len, self.participants, self.kernel
        )?;
        writeln!(f, " Mean sequential time {:.6} s", self.sequential.as_secs_f64())?;
        writeln!(f, " Mean parallel time {:.6} s", self.parallel.as_secs_f64())?;
        writeln!(
            f,
            " Mean slowest participant {:.6} s",
            self.slowest_participant.as_secs_f64()
        )?;
        writeln!(f, " Speedup {:.2}x", self.speedup())?;
        write!(f, " Failed runs {}", self.failed_runs)
    }
}

/// `len` integers drawn uniformly from `[0, max_value)`.
pub fn random_input<R: Rng>(len: usize, max_value: u32, rng: &mut R) -> Vec<u32> {
    let range = Uniform::from(0..max_value);
    (0..len).map(|_| rng.sample(&range)).collect()
}

pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport, BenchError> {
    config.validate()?;

    let mut sequential = Duration::default();
    let mut parallel = Duration::default();
    let mut slowest = Duration::default();
    let mut failed_runs = 0;

    for run in 0..config.runs {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
            None => StdRng::from_entropy(),
        };
        let data = random_input(config.len, config.max_value, &mut rng);

        let mut baseline = data.clone();
        let t = Instant::now();
        config.kernel.sort(&mut baseline);
        let seq_time = t.elapsed();

        let t = Instant::now();
        let (sorted, profiles) =
            sort_in_process_profiled(data, config.participants, config.kernel)?;
        let par_time = t.elapsed();

        sequential += seq_time;
        parallel += par_time;
        slowest += profiles
            .iter()
            .map(|p| p.total)
            .max()
            .unwrap_or_default();

        if !is_sorted(&sorted) || sorted != baseline {
            warn!(run, "parallel sort produced a wrong result");
            failed_runs += 1;
        }
        debug!(
            run,
            seq_us = seq_time.as_micros() as u64,
            par_us = par_time.as_micros() as u64,
            "run complete"
        );
    }

    let runs = config.runs as u32;
    Ok(BenchReport {
        runs: config.runs,
        len: config.len,
        participants: config.participants,
        kernel: config.kernel,
        sequential: sequential / runs,
        parallel: parallel / runs,
        slowest_participant: slowest / runs,
        failed_runs,
    })
}
