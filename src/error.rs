use crate::summary::RunSummary;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("DATE_FORMAT {0:?} contains an unsupported specifier")]
    DateFormat(String),

    #[error("VALID_EXTENSIONS must list at least one extension")]
    NoExtensions,
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("couldn't open files in {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't open the destination at {path}: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An unrecoverable I/O error while copying. Files copied before it stay copied.
    #[error("copying {path} failed: {source}")]
    CopyAborted {
        path: PathBuf,
        summary: Box<RunSummary>,
        #[source]
        source: io::Error,
    },
}
