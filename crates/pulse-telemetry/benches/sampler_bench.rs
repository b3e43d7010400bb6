use criterion::{criterion_group, criterion_main, Criterion};
use pulse_core::FrameSampler;
use pulse_telemetry::{FpsMonitor, FpsMonitorConfig, MeasurementProfile, PrecisionFrameSampler, ProfileKind, RawFrameSampler};
use std::hint::black_box;
use std::time::Duration;

fn bench_samplers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Frame Sampling");

    group.bench_function("Raw record_frame", |b| {
        let mut sampler = RawFrameSampler::default();
        let mut t = Duration::ZERO;
        b.iter(|| {
            t += Duration::from_micros(16_667);
            sampler.record_frame(black_box(t));
        });
    });

    group.bench_function("Precision record_frame", |b| {
        let mut sampler =
            PrecisionFrameSampler::with_profile(MeasurementProfile::for_kind(ProfileKind::Desktop))
                .unwrap();
        let mut t = Duration::ZERO;
        b.iter(|| {
            t += Duration::from_micros(16_667);
            sampler.record_frame(black_box(t));
        });
    });

    group.bench_function("Monitor recompute (240 samples)", |b| {
        let mut monitor = FpsMonitor::new(FpsMonitorConfig::default(), None);
        let mut t = Duration::ZERO;
        for _ in 0..=240 {
            monitor.record_frame(t);
            t += Duration::from_micros(16_667);
        }
        b.iter(|| black_box(monitor.recompute()));
    });

    group.finish();
}

criterion_group!(benches, bench_samplers);
criterion_main!(benches);
