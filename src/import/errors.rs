use std::io;
use std::path::Path;

use thiserror::Error;

use crate::storage::StoreError;

/// Failures that abort an import run. Nothing is committed when one occurs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Source file [{path}] is unavailable: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Failed reading source at line [{line}]: {source}")]
    SourceRead {
        line: usize,
        #[source]
        source: io::Error
    },
    #[error(transparent)]
    Store(#[from] StoreError)
}

impl ImportError {
    pub fn source_unavailable(path: &Path, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.display().to_string(),
            source
        }
    }

    pub fn source_read(line: usize, source: io::Error) -> Self {
        Self::SourceRead { line, source }
    }
}
