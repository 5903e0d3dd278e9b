//! Error type for the fallible edges of the crate (file loading, parsing).
//!
//! Normalization, geometry and dispatch never fail; only I/O and user-supplied
//! text can.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid period expression `{0}` (expected YYYY, YYYY-MM, YYYY-Qn, YYYY-MM..MM or YYYY-Qn..Qn)")]
    InvalidPeriod(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
