use core::time::Duration;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use texdecode_common::pixel_format::PixelFormat;
use texdecode_tiling::{
    from_dreamcast_square_twiddled16, from_dreamcast_vq16, from_dxt1_gcn, from_gcn16,
    from_n3ds_tiled_rgb565, from_xbox_swizzled, VqKind,
};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

const SIZE: u32 = 512;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tiled Decode");
    // Enough for a 32bpp image, which covers every layout below.
    let input: Vec<u8> = (0..SIZE as usize * SIZE as usize * 4)
        .map(|i| ((i as u32).wrapping_mul(2654435761) >> 13) as u8)
        .collect();
    let palette = &input[..2048];
    let size = format!("{SIZE}x{SIZE}");

    group.throughput(criterion::Throughput::Elements(SIZE as u64 * SIZE as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function(BenchmarkId::new("dreamcast_twiddled_rgb565", &size), |b| {
        b.iter(|| from_dreamcast_square_twiddled16(PixelFormat::Rgb565, SIZE, SIZE, black_box(&input)))
    });
    group.bench_function(BenchmarkId::new("dreamcast_vq_rgb565", &size), |b| {
        b.iter(|| {
            from_dreamcast_vq16(
                PixelFormat::Rgb565,
                VqKind::Full,
                SIZE,
                SIZE,
                black_box(&input),
                black_box(palette),
            )
        })
    });
    group.bench_function(BenchmarkId::new("xbox_swizzled_argb8888", &size), |b| {
        b.iter(|| from_xbox_swizzled(PixelFormat::Argb8888, SIZE, SIZE, black_box(&input)))
    });
    group.bench_function(BenchmarkId::new("gcn_rgb5a3", &size), |b| {
        b.iter(|| from_gcn16(PixelFormat::Rgb5A3, SIZE, SIZE, black_box(&input)))
    });
    group.bench_function(BenchmarkId::new("gcn_dxt1", &size), |b| {
        b.iter(|| from_dxt1_gcn(SIZE, SIZE, black_box(&input)))
    });
    group.bench_function(BenchmarkId::new("n3ds_rgb565", &size), |b| {
        b.iter(|| from_n3ds_tiled_rgb565(SIZE, SIZE, black_box(&input)))
    });

    group.finish();
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
