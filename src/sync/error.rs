use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("File system error during {operation} on {}: {source}", path.display())]
    FileSystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk destination directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to write dry-run output: {0}")]
    Report(#[source] io::Error),
}

impl SyncError {
    pub fn file_system(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::FileSystem {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
