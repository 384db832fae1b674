use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// The one thing a chunk's progress is waiting on at a given moment.
///
/// Effectively the chunk's state, phrased as "the resource I'm blocked
/// behind". The set is a closed constant table; equality and hashing go
/// by index so the hot path never compares names.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WaitReason {
    index: i32,
    name: &'static str,
}

impl WaitReason {
    /// Not waiting on anything; the initial cell value of a new chunk.
    pub const NOTHING: Self = Self::new(0, "Nothing");
    /// Waiting for enough RAM to schedule the chunk.
    pub const RAM_TO_SCHEDULE: Self = Self::new(1, "RAM");
    /// Waiting for a worker slot to pick up the scheduled chunk.
    pub const WORKER_SLOT: Self = Self::new(2, "Worker");
    /// Waiting to finish receiving the response headers.
    pub const HEADER_RESPONSE: Self = Self::new(3, "Head");
    /// Waiting to finish sending/receiving the body.
    pub const BODY: Self = Self::new(4, "Body");
    /// Waiting to re-read the body after a forced retry under low memory.
    pub const BODY_REREAD_LOW_MEMORY: Self = Self::new(5, "BodyReRead-LowRam");
    /// Waiting to re-read the body after a forced retry of a slow read.
    pub const BODY_REREAD_SLOW: Self = Self::new(6, "BodyReRead-TooSlow");
    /// Waiting for the reordering writer to sort the chunk into sequence.
    pub const SORTING: Self = Self::new(7, "Sorting");
    /// Waiting on a prior chunk to arrive before this one can be saved.
    pub const PRIOR_CHUNK: Self = Self::new(8, "Prior");
    /// Sorted into sequence but not yet written out to disk.
    pub const QUEUE_TO_WRITE: Self = Self::new(9, "Queue");
    /// Waiting on a disk read or write to complete.
    pub const DISK_IO: Self = Self::new(10, "DiskIO");
    /// Terminal: the chunk is done.
    pub const CHUNK_DONE: Self = Self::new(11, "Done");
    /// Terminal: the transfer was cancelled. Every chunk ends with
    /// either `CHUNK_DONE` or `CANCELLED`.
    pub const CANCELLED: Self = Self::new(12, "Cancelled");

    /// Number of wait reasons. Sizes the tracker's counter array, so
    /// `CANCELLED` must keep the highest index.
    pub const COUNT: usize = Self::CANCELLED.index as usize + 1;

    /// Every reason, indexed by its own `index`.
    pub const ALL: [Self; Self::COUNT] = [
        Self::NOTHING,
        Self::RAM_TO_SCHEDULE,
        Self::WORKER_SLOT,
        Self::HEADER_RESPONSE,
        Self::BODY,
        Self::BODY_REREAD_LOW_MEMORY,
        Self::BODY_REREAD_SLOW,
        Self::SORTING,
        Self::PRIOR_CHUNK,
        Self::QUEUE_TO_WRITE,
        Self::DISK_IO,
        Self::CHUNK_DONE,
        Self::CANCELLED,
    ];

    const fn new(index: i32, name: &'static str) -> Self {
        Self { index, name }
    }

    /// Stable identity of this reason; also its counter-array slot.
    pub const fn index(self) -> i32 {
        self.index
    }

    /// Display label, fixed 1:1 with the index.
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Terminal reasons take a chunk out of the live set.
    pub const fn is_terminal(self) -> bool {
        self.index == Self::CHUNK_DONE.index || self.index == Self::CANCELLED.index
    }
}

impl PartialEq for WaitReason {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for WaitReason {}

impl Hash for WaitReason {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Display for WaitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Wait states an upload chunk moves through, in lifecycle order.
///
/// [`crate::ChunkStatusTracker::get_counts`] reports over this sequence,
/// so consumers see counts left to right in the order the states actually
/// happen. States with no relevance to uploads are absent; so are the
/// terminal states, which are not "waiting".
pub const UPLOAD_WAIT_REASONS: [WaitReason; 4] = [
    // These two happen while the chunk work is being generated, so their
    // total is bounded by the size of the pool running the generation.
    WaitReason::RAM_TO_SCHEDULE,
    WaitReason::DISK_IO,
    // Chunks in this state are effectively a queue of work waiting to be
    // sent over the network.
    WaitReason::WORKER_SLOT,
    // The actual network activity. Headers are not separated out for
    // uploads, so they are implicitly included here.
    WaitReason::BODY,
];

/// Wait states a download chunk moves through, in lifecycle order.
///
/// Downloads visit more states than uploads because chunks must be
/// re-assembled into sequential order before the disk commit. The two
/// body re-read states are deliberately absent: reporting folds them
/// into [`WaitReason::BODY`].
pub const DOWNLOAD_WAIT_REASONS: [WaitReason; 8] = [
    WaitReason::RAM_TO_SCHEDULE,
    // A queue of work waiting for its network download to be initiated.
    WaitReason::WORKER_SLOT,
    // The actual network activity.
    WaitReason::HEADER_RESPONSE,
    WaitReason::BODY,
    // Sorting and QueueToWrite together form the queue of work waiting
    // to be written to disk; the former unsorted, the latter already in
    // sequential order. PriorChunk is the odd one out: those chunks are
    // waiting on some prior chunk still arriving over the network.
    WaitReason::SORTING,
    WaitReason::PRIOR_CHUNK,
    WaitReason::QUEUE_TO_WRITE,
    // The actual disk write.
    WaitReason::DISK_IO,
];
