use core::{alloc::Layout, time::Duration};
use criterion::{criterion_group, criterion_main, Criterion};
use safe_allocator_api::RawAlloc;

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

mod portable;
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
mod sse2;
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
mod ssse3;

pub(crate) fn allocate_align_64(num_bytes: usize) -> RawAlloc {
    let layout = Layout::from_size_align(num_bytes, 64).unwrap();
    RawAlloc::new(layout).unwrap()
}

/// One 4096 pixel row, converted repeatedly so the source stays in cache.
pub(crate) const ROW_PIXELS: usize = 4096;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Linear Unpack");
    let mut input = allocate_align_64(ROW_PIXELS * 4);
    for (i, byte) in input.as_mut_slice().iter_mut().enumerate() {
        *byte = (i * 31 + 7) as u8;
    }
    let mut output = vec![0u32; ROW_PIXELS];

    group.throughput(criterion::Throughput::Elements(ROW_PIXELS as u64));
    group.warm_up_time(Duration::from_secs(3));
    group.measurement_time(Duration::from_secs(5));

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
        use texdecode_common::cpu_detect::*;
        if has_sse2() {
            sse2::run_benchmarks(&mut group, &input, &mut output);
        }
        if has_ssse3() {
            ssse3::run_benchmarks(&mut group, &input, &mut output);
        }
    }

    portable::run_benchmarks(&mut group, &input, &mut output);

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
