pub mod chunk;
pub mod error;
pub mod status;
pub mod types;

pub use chunk::{ChunkId, DOWNLOAD_WAIT_REASONS, UPLOAD_WAIT_REASONS, WaitReason};
pub use error::SiphonError;
pub use status::{
    BottleneckThresholds, ChunkStatusLogger, ChunkStatusLoggerCloser, ChunkStatusTracker,
    PENDING_EVENT_CAPACITY,
};
pub use types::{ChunkStatusCount, JobId, Result};
