use core::{alloc::Layout, time::Duration};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use safe_allocator_api::RawAlloc;
use std::hint::black_box;
use texdecode_bcn::{decode, Bc1Alpha, BcnFormat};

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

fn allocate_align_64(num_bytes: usize) -> RawAlloc {
    let layout = Layout::from_size_align(num_bytes, 64).unwrap();
    RawAlloc::new(layout).unwrap()
}

const SIZE: u32 = 512;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Block Decode");
    let blocks = (SIZE as usize / 4) * (SIZE as usize / 4);
    let mut input = allocate_align_64(blocks * 16);
    for (i, byte) in input.as_mut_slice().iter_mut().enumerate() {
        *byte = ((i as u32).wrapping_mul(2654435761) >> 13) as u8;
    }

    group.throughput(criterion::Throughput::Elements(SIZE as u64 * SIZE as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    for format in [
        BcnFormat::Dxt1,
        BcnFormat::Dxt3,
        BcnFormat::Dxt5,
        BcnFormat::Bc4,
        BcnFormat::Bc5,
        BcnFormat::Bc7,
    ] {
        group.bench_with_input(
            BenchmarkId::new(format.name(), format!("{SIZE}x{SIZE}")),
            &format,
            |b, &format| {
                b.iter(|| {
                    decode(
                        black_box(format),
                        SIZE,
                        SIZE,
                        black_box(input.as_slice()),
                        Bc1Alpha::Opaque,
                    )
                })
            },
        );
    }

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
