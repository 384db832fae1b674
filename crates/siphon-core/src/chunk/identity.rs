use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::chunk::wait_reason::WaitReason;

/// Identifies one chunk: the owning file's name plus the chunk's byte
/// offset within that file. The pair is unique within a job.
///
/// The id also carries the chunk's current wait state. Cloning shares the
/// underlying cell, so every copy of an id observes the same state and the
/// status tracker can swap it without any lookup table. Ids constructed
/// independently, even for the same `(name, offset)`, get distinct cells.
#[derive(Debug, Clone)]
pub struct ChunkId {
    pub name: String,
    pub offset: i64,
    wait_reason_index: Arc<AtomicI32>,
}

impl ChunkId {
    /// Creates an id with a fresh wait-reason cell initialized to
    /// [`WaitReason::NOTHING`].
    pub fn new(name: impl Into<String>, offset: i64) -> Self {
        Self {
            name: name.into(),
            offset,
            wait_reason_index: Arc::new(AtomicI32::new(WaitReason::NOTHING.index())),
        }
    }

    /// Index of the reason this chunk is currently waiting on.
    pub fn current_reason_index(&self) -> i32 {
        self.wait_reason_index.load(Ordering::Acquire)
    }

    /// Flips the cell to `reason`, returning the previous index in the
    /// same atomic step. Swap rather than read-then-write, so concurrent
    /// callers racing on the same chunk can never lose an update.
    pub(crate) fn swap_reason_index(&self, reason: WaitReason) -> i32 {
        self.wait_reason_index.swap(reason.index(), Ordering::AcqRel)
    }
}
