use criterion::BenchmarkId;
use safe_allocator_api::RawAlloc;
use std::hint::black_box;
use texdecode_common::PixelFormat;
use texdecode_linear::bench::convert_row;

pub(crate) fn run_benchmarks(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    input: &RawAlloc,
    output: &mut [u32],
) {
    for format in [
        PixelFormat::L8,
        PixelFormat::Rgb565,
        PixelFormat::Rgb5A3,
        PixelFormat::Rgb888,
        PixelFormat::Argb8888,
        PixelFormat::A2R10G10B10,
    ] {
        group.bench_with_input(
            BenchmarkId::new("portable", format.name()),
            &format,
            |b, &format| b.iter(|| convert_row(black_box(format), black_box(input.as_slice()), &mut *output)),
        );
    }
}
