/// Benchmarks for seqtrace frame instrumentation.
///
/// Run with: `cargo bench`
///
/// Measures the cost of entering/leaving instrumented frames with no
/// observer installed and with an active session recording every call.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqtrace::{enter_fn, enter_method, TraceSession};

struct Node {
    _id: u32,
}

fn descend(node: &Node, depth: u32) {
    let _frame = enter_method(node, "descend");
    if depth > 0 {
        let child = Node { _id: depth };
        descend(black_box(&child), depth - 1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Frame Overhead
// ═══════════════════════════════════════════════════════════════════════════

fn bench_unobserved_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames/unobserved");

    for depth in [1u32, 8, 64].iter() {
        group.throughput(Throughput::Elements(u64::from(*depth) + 1));
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let root = Node { _id: 0 };
            b.iter(|| descend(&root, depth));
        });
    }

    group.finish();
}

fn bench_recorded_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames/recorded");

    for depth in [1u32, 8, 64].iter() {
        group.throughput(Throughput::Elements(u64::from(*depth) + 1));
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let _main = enter_fn("main");
            let root = Node { _id: 0 };
            b.iter_batched(
                TraceSession::new,
                |mut session| {
                    session.start().unwrap();
                    descend(&root, depth);
                    session.stop().unwrap();
                    session
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════

fn bench_render(c: &mut Criterion) {
    let _main = enter_fn("main");
    let root = Node { _id: 0 };
    let mut session = TraceSession::new();
    session.start().unwrap();
    for _ in 0..100 {
        descend(&root, 16);
    }
    session.stop().unwrap();

    c.bench_function("render/3400_events", |b| {
        b.iter(|| black_box(session.render()));
    });
}

criterion_group!(benches, bench_unobserved_frames, bench_recorded_frames, bench_render);
criterion_main!(benches);
