use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiphonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to create chunk log {path}: {source}")]
    LogCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SiphonError>,
    },
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SiphonError {
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
