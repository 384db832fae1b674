use std::path::Path;

use siphon_core::status::bottleneck::{
    is_download_disk_constrained, is_upload_disk_constrained,
};
use siphon_core::{BottleneckThresholds, ChunkId, ChunkStatusTracker, JobId, WaitReason};

fn tracker() -> ChunkStatusTracker {
    ChunkStatusTracker::new(&JobId::new("bottleneck-test"), Path::new("."), false)
        .expect("tracker without output needs no filesystem")
}

/// Parks `n` fresh chunks in the given wait state.
fn park(tracker: &ChunkStatusTracker, reason: WaitReason, n: i64) {
    for i in 0..n {
        let id = ChunkId::new(format!("{}.dat", reason.name()), i * 8 * 1024 * 1024);
        tracker.record_transition(&id, reason);
    }
}

#[test]
fn upload_without_disk_activity_is_never_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::WORKER_SLOT, 50);

    // No chunks reading disk, so queue size is irrelevant.
    assert!(!tracker.is_disk_constrained(true, false));
}

#[test]
fn upload_with_disk_activity_and_small_network_queue_is_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::RAM_TO_SCHEDULE, 1);
    park(&tracker, WaitReason::WORKER_SLOT, 5);

    assert!(tracker.is_disk_constrained(true, false));
}

#[test]
fn upload_network_queue_at_threshold_is_not_small() {
    let tracker = tracker();
    park(&tracker, WaitReason::DISK_IO, 3);
    park(&tracker, WaitReason::WORKER_SLOT, 10);

    // the default near-zero cut-off is a strict less-than at 10
    assert!(!tracker.is_disk_constrained(true, false));
}

#[test]
fn download_above_floor_and_dominance_is_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::SORTING, 11);
    park(&tracker, WaitReason::WORKER_SLOT, 1);

    assert!(tracker.is_disk_constrained(false, true));
}

#[test]
fn download_at_the_floor_is_not_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::SORTING, 10);
    park(&tracker, WaitReason::WORKER_SLOT, 1);

    // fails the strict > 10 floor
    assert!(!tracker.is_disk_constrained(false, true));
}

#[test]
fn download_without_disk_dominance_is_not_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::SORTING, 6);
    park(&tracker, WaitReason::QUEUE_TO_WRITE, 5);
    park(&tracker, WaitReason::WORKER_SLOT, 3);

    // 11 clears the floor but not 5x the network queue of 3
    assert!(!tracker.is_disk_constrained(false, true));
}

#[test]
fn prior_chunk_waits_are_not_attributed_to_disk() {
    let tracker = tracker();
    park(&tracker, WaitReason::PRIOR_CHUNK, 100);
    park(&tracker, WaitReason::SORTING, 1);

    assert!(!tracker.is_disk_constrained(false, true));
}

#[test]
fn service_to_service_is_never_disk_constrained() {
    let tracker = tracker();
    park(&tracker, WaitReason::SORTING, 50);
    park(&tracker, WaitReason::RAM_TO_SCHEDULE, 50);

    assert!(!tracker.is_disk_constrained(false, false));
}

#[test]
fn thresholds_are_overridable() {
    let thresholds = BottleneckThresholds {
        near_zero_queue_size: 2,
        ..BottleneckThresholds::default()
    };
    let tracker = ChunkStatusTracker::with_thresholds(
        &JobId::new("bottleneck-test"),
        Path::new("."),
        false,
        thresholds,
    )
    .expect("tracker without output needs no filesystem");

    park(&tracker, WaitReason::RAM_TO_SCHEDULE, 1);
    park(&tracker, WaitReason::WORKER_SLOT, 5);

    // 5 is "small" under the defaults but not under the tighter cut-off
    assert!(!tracker.is_disk_constrained(true, false));
}

#[test]
fn heuristics_are_pure_over_a_count_snapshot() {
    let thresholds = BottleneckThresholds::default();

    let upload_counts = |reason: WaitReason| {
        if reason == WaitReason::DISK_IO {
            7
        } else {
            0
        }
    };
    assert!(is_upload_disk_constrained(&thresholds, upload_counts));

    let download_counts = |reason: WaitReason| {
        if reason == WaitReason::QUEUE_TO_WRITE {
            40
        } else if reason == WaitReason::WORKER_SLOT {
            2
        } else {
            0
        }
    };
    assert!(is_download_disk_constrained(&thresholds, download_counts));
}
