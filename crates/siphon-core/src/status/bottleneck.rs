use serde::{Deserialize, Serialize};

use crate::chunk::WaitReason;

/// Tunable cut-offs for the disk-constraint heuristics.
///
/// The defaults are carried over from the original tuning unchanged.
/// They are guesses rather than measured values, which is exactly why
/// they live here as named, overridable fields instead of being baked
/// into the comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleneckThresholds {
    /// Below this, the queue of chunks waiting for a worker slot counts
    /// as "near empty".
    pub near_zero_queue_size: i64,
    /// Floor the disk-side queue must clear before a download counts as
    /// disk-constrained at all. Guards against false positives when both
    /// queues are near zero, as they are toward the end of a job.
    pub active_disk_queue: i64,
    /// How many times larger the disk-side queue must be than the
    /// network-side queue before disk is called dominant.
    pub disk_dominance_factor: i64,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self {
            near_zero_queue_size: 10,
            active_disk_queue: 10,
            disk_dominance_factor: 5,
        }
    }
}

/// Is disk the bottleneck in an upload?
///
/// If chunks are still being read off the source disk yet almost nothing
/// is queued up for the network, the disk is not producing fast enough.
/// The earlier states cannot help here: they happen while chunk work is
/// being generated, so their counts just mirror the size of the pool
/// running the generation. Uploads expose only one useful queue-like
/// state, so this is a single-threshold test rather than a comparison of
/// two queues.
pub fn is_upload_disk_constrained<F>(thresholds: &BottleneckThresholds, get_count: F) -> bool
where
    F: Fn(WaitReason) -> i64,
{
    let queue_for_network_is_small =
        get_count(WaitReason::WORKER_SLOT) < thresholds.near_zero_queue_size;

    // Once nothing is being read off disk any more, nothing new enters
    // the network queue and its size stops meaning anything.
    let before_worker_queue =
        get_count(WaitReason::RAM_TO_SCHEDULE) + get_count(WaitReason::DISK_IO);
    let still_reading_disk = before_worker_queue > 0;

    still_reading_disk && queue_for_network_is_small
}

/// Is disk the bottleneck in a download?
///
/// Compares the queue ahead of the disk-write states with the queue ahead
/// of the network states. `PriorChunk` is left out of the disk side: a
/// chunk waiting for a prior chunk to arrive may really be blocked on the
/// network or on the remote service, and there is no way to tell which,
/// so it must not be attributed to disk.
pub fn is_download_disk_constrained<F>(thresholds: &BottleneckThresholds, get_count: F) -> bool
where
    F: Fn(WaitReason) -> i64,
{
    let waiting_on_disk =
        get_count(WaitReason::SORTING) + get_count(WaitReason::QUEUE_TO_WRITE);
    let waiting_on_network = get_count(WaitReason::WORKER_SLOT);

    waiting_on_disk > thresholds.active_disk_queue
        && waiting_on_disk > thresholds.disk_dominance_factor * waiting_on_network
}
