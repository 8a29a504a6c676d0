use thiserror::Error;

/// Problems with the shape of a run, detected before phase 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one participant is required")]
    NoParticipants,
    #[error("array size ({len}) is not divisible by the number of participants ({participants})")]
    Indivisible { len: usize, participants: usize },
    #[error("transport spans {actual} participants but the layout expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("rank {rank} is outside a world of {participants} participants")]
    RankOutOfRange { rank: usize, participants: usize },
    #[error("partition holds {actual} elements, expected {expected}")]
    PartitionLength { expected: usize, actual: usize },
}

/// An exchange that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("rank {rank}: partner {partner} disconnected during phase {phase}")]
    Disconnected {
        rank: usize,
        partner: usize,
        phase: usize,
    },
    #[error("rank {rank}: exchange with {partner} dropped during phase {phase}")]
    Dropped {
        rank: usize,
        partner: usize,
        phase: usize,
    },
    #[error("rank {rank}: expected a message for phase {expected}, got phase {actual}")]
    OutOfOrder {
        rank: usize,
        expected: usize,
        actual: usize,
    },
    #[error("rank {rank}: worker panicked")]
    WorkerPanicked { rank: usize },
}

/// Any fatal condition of a sort run. A run that returns an error leaves no
/// usable result behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("phase {phase}: partner {partner} sent {actual} elements, expected {expected}")]
    Protocol {
        phase: usize,
        partner: usize,
        expected: usize,
        actual: usize,
    },
}
