pub mod bottleneck;
pub mod tracker;
mod writer;

pub use bottleneck::BottleneckThresholds;
pub use tracker::{
    ChunkStatusLogger, ChunkStatusLoggerCloser, ChunkStatusTracker, PENDING_EVENT_CAPACITY,
};
