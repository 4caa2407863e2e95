use hexaplex_encoding::EncodingError;
use hexaplex_model::{InvalidLiteralError, StorageError};
use hexaplex_storage::PrepareTableError;
use oxrdfio::RdfSyntaxError;
use std::io;
use std::path::PathBuf;
use tokio::task::JoinError;

/// An error raised by a bulk load.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Invalid options or sources. Raised before any data is touched.
    #[error("{0}")]
    Configuration(String),
    /// The content of a source file is invalid.
    #[error("Failed to parse {}: {source}", file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: SourceError,
    },
    /// A source file could not be read.
    #[error("Failed to read {}: {source}", file.display())]
    Read {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A parsed statement cannot be stored in the indexes.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// A work unit task panicked or was aborted by the runtime.
    #[error("A bulk load task failed: {0}")]
    TaskFailed(#[from] JoinError),
    /// The other end of a work unit went away.
    #[error("The work unit was cancelled")]
    Cancelled,
}

impl IngestError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true for errors that only abandon the current file when invalid sources are
    /// skipped. Files that cannot be read or decompressed are invalid too.
    pub fn is_invalid_source(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Read { .. })
    }
}

impl From<PrepareTableError> for IngestError {
    fn from(error: PrepareTableError) -> Self {
        match error {
            PrepareTableError::InvalidSplitBits(error) => Self::Configuration(error.to_string()),
            PrepareTableError::Storage(error) => Self::Storage(error),
        }
    }
}

/// The reason a source file is invalid.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Syntax(#[from] RdfSyntaxError),
    #[error(transparent)]
    Literal(#[from] InvalidLiteralError),
}
