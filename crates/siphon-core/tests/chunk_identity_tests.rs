use std::path::Path;

use siphon_core::{ChunkId, ChunkStatusTracker, JobId, WaitReason};

fn tracker() -> ChunkStatusTracker {
    ChunkStatusTracker::new(&JobId::new("identity-test"), Path::new("."), false)
        .expect("tracker without output needs no filesystem")
}

#[test]
fn new_chunk_starts_at_nothing() {
    let id = ChunkId::new("file.dat", 0);
    assert_eq!(id.current_reason_index(), WaitReason::NOTHING.index());
}

#[test]
fn clones_share_the_wait_reason_cell() {
    let tracker = tracker();
    let id = ChunkId::new("file.dat", 8 * 1024 * 1024);
    let copy = id.clone();

    tracker.record_transition(&id, WaitReason::BODY);

    assert_eq!(copy.current_reason_index(), WaitReason::BODY.index());
    assert_eq!(id.current_reason_index(), copy.current_reason_index());
}

#[test]
fn independent_ids_for_the_same_chunk_have_distinct_cells() {
    let tracker = tracker();
    let first = ChunkId::new("file.dat", 0);
    let second = ChunkId::new("file.dat", 0);

    tracker.record_transition(&first, WaitReason::DISK_IO);

    assert_eq!(first.current_reason_index(), WaitReason::DISK_IO.index());
    assert_eq!(second.current_reason_index(), WaitReason::NOTHING.index());
}
