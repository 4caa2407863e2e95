use hexaplex_model::{CorruptionError, StorageError};
use std::io;
use tokio::task::JoinError;

/// An error raised while computing or writing statistics.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Invalid options. Raised before any data is scanned.
    #[error("{0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Corruption(#[from] CorruptionError),
    /// A graph name read from the index is not a valid subject.
    #[error("Invalid graph name {0}")]
    InvalidGraphName(String),
    /// A scan task panicked or was aborted by the runtime.
    #[error("A statistics task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

impl StatsError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
