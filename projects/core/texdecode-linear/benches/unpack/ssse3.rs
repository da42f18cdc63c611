use criterion::BenchmarkId;
use safe_allocator_api::RawAlloc;
use std::hint::black_box;
use texdecode_common::pixel_format::{BitDepth, PixelFormat};
use texdecode_linear::bench::{byte_shuffle, convert_row_24_ssse3, convert_row_32_ssse3, ByteShuffle};

pub(crate) fn run_benchmarks(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    input: &RawAlloc,
    output: &mut [u32],
) {
    for format in [
        PixelFormat::Rgb888,
        PixelFormat::Argb8888,
        PixelFormat::Rgba8888,
        PixelFormat::G16R16,
    ] {
        let Some(shuffle) = byte_shuffle(format) else {
            continue;
        };
        let kernel: unsafe fn(&ByteShuffle, &[u8], &mut [u32]) = match format.depth() {
            BitDepth::Bits24 => convert_row_24_ssse3,
            _ => convert_row_32_ssse3,
        };
        group.bench_with_input(BenchmarkId::new("ssse3", format.name()), &shuffle, |b, shuffle| {
            b.iter(|| unsafe { kernel(black_box(shuffle), black_box(input.as_slice()), &mut *output) })
        });
    }
}
