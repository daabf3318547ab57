use thiserror::Error;

/// Errors surfaced by counter construction and reconciliation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid configuration: replica {replica} out of range for {replica_count} replicas")]
    InvalidConfiguration { replica: usize, replica_count: usize },

    #[error("Incompatible replica count: {ours} here, {theirs} in snapshot")]
    IncompatibleReplicaCount { ours: usize, theirs: usize },

    #[error("Counter overflow in slot of replica {replica}")]
    CounterOverflow { replica: usize },
}

/// Result type alias for counter operations
pub type Result<T> = std::result::Result<T, Error>;
