use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a whole input from being read.
///
/// Malformed rows never surface here: decoders skip them and an empty
/// [`PointSet`](crate::PointSet) is the "nothing found" signal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}
