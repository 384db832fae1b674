use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chunk::WaitReason;
use crate::error::SiphonError;

pub type Result<T> = std::result::Result<T, SiphonError>;

/// Opaque stable identifier for one transfer job.
///
/// The tracker only needs it to derive the per-job chunk log file name;
/// it carries no further meaning inside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Current number of chunks waiting on one reason.
///
/// Produced by [`crate::ChunkStatusTracker::get_counts`] in lifecycle
/// order, so reporting layers can render states left to right in the
/// sequence chunks actually visit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkStatusCount {
    pub reason: WaitReason,
    pub count: i64,
}
