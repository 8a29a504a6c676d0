//! Odd-even transposition sort over message-passing participants.
//!
//! Each participant owns one equal-sized partition of the input and runs the
//! same fixed sequence of compare-exchange phases against a neighbour chosen
//! by [`partner::partner`]. After as many phases as there are participants,
//! concatenating the partitions in rank order gives the sorted sequence.
//!
//! Exchanges go through the [`transport::Exchange`] trait: an in-process
//! channel mesh is always available, an MPI communicator backs it when the
//! `mpi` feature is enabled.
pub mod bench;
pub mod engine;
pub mod error;
pub mod kernel;
pub mod layout;
pub mod partner;
pub mod runner;
pub mod transport;

pub use engine::{OddEvenSort, PhaseProfile};
pub use error::{ConfigError, SortError, TransportError};
pub use kernel::SortKernel;
pub use layout::Layout;
pub use runner::sort_in_process;
