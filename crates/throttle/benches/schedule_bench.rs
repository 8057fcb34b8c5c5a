//! Hot-path benchmarks for throttled scheduling

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use throttle::{ThrottledFunc, ThrottledSignal};

fn bench_schedule(c: &mut Criterion) {
    // Long interval so every iteration after the first takes the coalescing path
    let func = ThrottledFunc::trailing(Duration::from_secs(3600), |args: (u64, String)| {
        black_box(args);
    });
    let mut i = 0u64;

    c.bench_function("schedule_coalesced_args", |b| {
        b.iter(|| {
            i += 1;
            func.schedule(black_box((i, String::new())));
        });
    });

    let signal = ThrottledSignal::trailing(Duration::from_secs(3600), |()| {});

    c.bench_function("schedule_coalesced_signal", |b| {
        b.iter(|| signal.call());
    });
}

fn bench_modify_pending(c: &mut Criterion) {
    let func = ThrottledFunc::trailing(Duration::from_secs(3600), |n: u64| {
        black_box(n);
    });
    func.schedule(0);

    c.bench_function("modify_pending", |b| {
        b.iter(|| func.modify_pending(|n| *n = n.wrapping_add(1)));
    });
}

criterion_group!(benches, bench_schedule, bench_modify_pending);
criterion_main!(benches);
