use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::thread::JoinHandle;

use chrono::Utc;
use crossbeam_channel::{Sender, bounded};

use crate::chunk::{ChunkId, DOWNLOAD_WAIT_REASONS, UPLOAD_WAIT_REASONS, WaitReason};
use crate::status::bottleneck::{self, BottleneckThresholds};
use crate::status::writer::{self, ChunkWaitState, LogMessage};
use crate::types::{ChunkStatusCount, JobId, Result};

/// Capacity of the pending-event queue feeding the log writer. Sized so
/// workers never wait on the writer in normal operation; it bounds
/// worst-case memory, not steady-state behavior.
pub const PENDING_EVENT_CAPACITY: usize = 1_000_000;

/// Hot-path contract: transfer workers call this at every chunk
/// lifecycle boundary.
pub trait ChunkStatusLogger: Send + Sync {
    fn record_transition(&self, id: &ChunkId, reason: WaitReason);
}

/// Full tracker surface: hot-path logging plus the aggregate queries and
/// shutdown hook used by reporting and throttling layers.
pub trait ChunkStatusLoggerCloser: ChunkStatusLogger {
    fn get_counts(&self, is_download: bool) -> Vec<ChunkStatusCount>;
    fn is_disk_constrained(&self, is_upload: bool, is_download: bool) -> bool;
    fn close_log(&self);
}

/// Records every chunk state transition and keeps live per-state counts
/// immediately available for performance diagnostics. Optionally also
/// persists each transition to a per-job CSV log through a dedicated
/// writer thread, off the hot path.
///
/// `record_transition` never blocks: the per-chunk state cell and every
/// counter slot are adjusted with atomic operations, and the log record
/// is handed off with a non-blocking send.
pub struct ChunkStatusTracker {
    counts: Vec<AtomicI64>,
    output_enabled: bool,
    thresholds: BottleneckThresholds,
    pending: Option<Sender<LogMessage>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl ChunkStatusTracker {
    /// Creates a tracker for one job with the default heuristic
    /// thresholds.
    ///
    /// When `enable_output` is set, `<log_folder>/<job id>-chunks.log`
    /// is created immediately (fresh, not appended) and a writer thread
    /// starts consuming the pending-event queue. Failure to create the
    /// file is an error: the operator explicitly asked for output.
    /// When unset, no file, queue, or thread is allocated at all.
    pub fn new(job_id: &JobId, log_folder: &Path, enable_output: bool) -> Result<Self> {
        Self::with_thresholds(
            job_id,
            log_folder,
            enable_output,
            BottleneckThresholds::default(),
        )
    }

    /// Creates a tracker with overridden heuristic thresholds.
    pub fn with_thresholds(
        job_id: &JobId,
        log_folder: &Path,
        enable_output: bool,
        thresholds: BottleneckThresholds,
    ) -> Result<Self> {
        let counts = (0..WaitReason::COUNT).map(|_| AtomicI64::new(0)).collect();

        if !enable_output {
            return Ok(Self {
                counts,
                output_enabled: false,
                thresholds,
                pending: None,
                writer: Mutex::new(None),
            });
        }

        let log_path = log_folder.join(format!("{job_id}-chunks.log"));
        let (pending_tx, pending_rx) = bounded(PENDING_EVENT_CAPACITY);
        let handle = writer::spawn(log_path, pending_rx)?;

        Ok(Self {
            counts,
            output_enabled: true,
            thresholds,
            pending: Some(pending_tx),
            writer: Mutex::new(Some(handle)),
        })
    }

    /// Records that `id` is now waiting on `reason`.
    ///
    /// Always updates the in-memory counts, even when output is
    /// disabled. The log record is best effort: a full queue, or one
    /// already closed by [`Self::close_log`] racing a late transition,
    /// drops the record silently rather than stalling or failing the
    /// worker.
    pub fn record_transition(&self, id: &ChunkId, reason: WaitReason) {
        self.count_state_transition(id, reason);

        let Some(pending) = &self.pending else {
            return;
        };

        let _ = pending.try_send(LogMessage::Transition(ChunkWaitState {
            name: id.name.clone(),
            offset: id.offset,
            reason,
            wait_start: Utc::now(),
        }));
    }

    // We track the old state inside the chunk id itself. The
    // alternative, a shared map from chunk to state, would cost a lock
    // or a hash lookup on every call.
    fn count_state_transition(&self, id: &ChunkId, new_reason: WaitReason) {
        // Flip the chunk's cell to the new state, learning the old state
        // in the same atomic step.
        let old_index = id.swap_reason_index(new_reason);

        // No lock on the array itself; each slot is adjusted with an
        // independent atomic add. Index 0 is the initial "Nothing"
        // sentinel, which is never counted down.
        if old_index > 0 && (old_index as usize) < self.counts.len() {
            let prev = self.counts[old_index as usize].fetch_sub(1, Ordering::Relaxed);
            debug_assert!(prev > 0, "count for reason index {old_index} went negative");
        }
        let new_index = new_reason.index();
        if (new_index as usize) < self.counts.len() {
            self.counts[new_index as usize].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current number of chunks whose last-known wait state is `reason`.
    /// Safe to call concurrently with any number of transitions.
    pub fn get_count(&self, reason: WaitReason) -> i64 {
        self.counts[reason.index() as usize].load(Ordering::Relaxed)
    }

    /// Current counts of chunks in each wait state, in lifecycle order
    /// for the given transfer direction.
    ///
    /// For simplicity in consuming the results, both body re-read states
    /// are rolled into [`WaitReason::BODY`]: callers should see re-read
    /// waits as ordinary body-transfer waiting, not a separate category.
    pub fn get_counts(&self, is_download: bool) -> Vec<ChunkStatusCount> {
        let reasons: &[WaitReason] = if is_download {
            &DOWNLOAD_WAIT_REASONS
        } else {
            &UPLOAD_WAIT_REASONS
        };

        reasons
            .iter()
            .map(|&reason| {
                debug_assert!(
                    reason != WaitReason::BODY_REREAD_LOW_MEMORY
                        && reason != WaitReason::BODY_REREAD_SLOW,
                    "body re-reads are folded into Body and must not appear in a reporting sequence"
                );

                let mut count = self.get_count(reason);
                if reason == WaitReason::BODY {
                    count += self.get_count(WaitReason::BODY_REREAD_LOW_MEMORY);
                    count += self.get_count(WaitReason::BODY_REREAD_SLOW);
                }

                ChunkStatusCount { reason, count }
            })
            .collect()
    }

    /// Classifies whether local disk is currently the limiting resource
    /// for this job. Returns `false` when the job has no local disk leg
    /// (service-to-service transfers).
    ///
    /// The heuristics read individual counter slots without a consistent
    /// whole-array snapshot; they are designed to tolerate that skew.
    pub fn is_disk_constrained(&self, is_upload: bool, is_download: bool) -> bool {
        if is_upload {
            bottleneck::is_upload_disk_constrained(&self.thresholds, |reason| {
                self.get_count(reason)
            })
        } else if is_download {
            bottleneck::is_download_disk_constrained(&self.thresholds, |reason| {
                self.get_count(reason)
            })
        } else {
            false
        }
    }

    /// Stops the log writer after persisting every record successfully
    /// enqueued so far, then returns. No-op when output is disabled or
    /// the log was already closed.
    ///
    /// Transitions recorded after this point still update the live
    /// counts; only their log rows are lost, which is the accepted cost
    /// of keeping the hot path free of shutdown synchronization.
    pub fn close_log(&self) {
        if !self.output_enabled {
            return;
        }

        let handle = {
            let mut guard = match self.writer.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.take()
        };
        let Some(handle) = handle else {
            return;
        };

        if let Some(pending) = &self.pending {
            // The channel is FIFO, so every record enqueued before the
            // sentinel is drained and written before the writer exits.
            let _ = pending.send(LogMessage::Close);
        }
        if handle.join().is_err() {
            tracing::error!("chunk log writer thread panicked during shutdown");
        }
    }

    /// Whether per-transition output was requested at construction.
    pub fn is_output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// Number of records awaiting persistence, or `None` when output is
    /// disabled and no queue exists.
    pub fn pending_log_records(&self) -> Option<usize> {
        self.pending.as_ref().map(Sender::len)
    }
}

impl ChunkStatusLogger for ChunkStatusTracker {
    fn record_transition(&self, id: &ChunkId, reason: WaitReason) {
        ChunkStatusTracker::record_transition(self, id, reason);
    }
}

impl ChunkStatusLoggerCloser for ChunkStatusTracker {
    fn get_counts(&self, is_download: bool) -> Vec<ChunkStatusCount> {
        ChunkStatusTracker::get_counts(self, is_download)
    }

    fn is_disk_constrained(&self, is_upload: bool, is_download: bool) -> bool {
        ChunkStatusTracker::is_disk_constrained(self, is_upload, is_download)
    }

    fn close_log(&self) {
        ChunkStatusTracker::close_log(self);
    }
}
