use std::io;
use std::path::{Path, PathBuf};

use ndarray_npy::{ReadNpyError, WriteNpyError};
use thiserror::Error;

// every failure aborts the run, the variants only carry enough context to
// point at the offending file and position
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed vector file {path:?} at byte {offset}: {reason}")]
    Format {
        path: PathBuf,
        offset: u64,
        reason: String,
    },

    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bad vector encoding: {reason}")]
    Encoding { reason: String },

    #[error("unknown word {0:?}")]
    UnknownWord(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot (de)serialize dataset: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write npy: {0}")]
    WriteNpy(#[from] WriteNpyError),

    #[error("cannot read npy: {0}")]
    ReadNpy(#[from] ReadNpyError),
}

impl DataError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        DataError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format(path: impl AsRef<Path>, offset: u64, reason: impl Into<String>) -> Self {
        DataError::Format {
            path: path.as_ref().to_path_buf(),
            offset,
            reason: reason.into(),
        }
    }

    pub fn encoding(reason: impl Into<String>) -> Self {
        DataError::Encoding {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
