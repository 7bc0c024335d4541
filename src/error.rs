//! Error type shared by the discovery, parsing, storage and query layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = TuneError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TuneError {
    /// The corpus root handed to discovery does not exist.
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// A source file could not be opened or read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory for the database file could not be created.
    #[error("failed to create {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A record broke the parser/store contract, e.g. it has no `X:` field.
    #[error("invalid tune record: {reason}")]
    Validation { reason: String },

    /// Caller-supplied filter input was malformed.
    #[error("{reason}")]
    InvalidInput { reason: String },

    /// A rebuild stopped part way through.
    #[error("rebuild aborted after {files} files and {records} tunes")]
    Rebuild {
        files: usize,
        records: usize,
        #[source]
        source: Box<TuneError>,
    },
}
