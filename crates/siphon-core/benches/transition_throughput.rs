use std::path::Path;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use siphon_core::{ChunkId, ChunkStatusTracker, JobId, WaitReason};

fn bench_record_transition(c: &mut Criterion) {
    let tracker = ChunkStatusTracker::new(&JobId::new("bench"), Path::new("."), false)
        .expect("tracker without output needs no filesystem");
    let id = ChunkId::new("bench.dat", 0);

    let mut group = c.benchmark_group("chunk_status");

    group.throughput(Throughput::Elements(2));
    group.bench_function("record_transition_pair", |b| {
        b.iter(|| {
            tracker.record_transition(black_box(&id), WaitReason::BODY);
            tracker.record_transition(black_box(&id), WaitReason::DISK_IO);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_record_transition);
criterion_main!(benches);
