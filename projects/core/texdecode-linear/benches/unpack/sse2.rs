use criterion::BenchmarkId;
use safe_allocator_api::RawAlloc;
use std::hint::black_box;
use texdecode_common::pixel_format::{Conversion, PixelFormat};
use texdecode_linear::bench::convert_row_bitfield16_sse2;

pub(crate) fn run_benchmarks(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    input: &RawAlloc,
    output: &mut [u32],
) {
    for format in [PixelFormat::Rgb565, PixelFormat::Argb1555, PixelFormat::Argb4444] {
        let Conversion::BitField(layout) = format.conversion() else {
            continue;
        };
        group.bench_with_input(BenchmarkId::new("sse2", format.name()), &layout, |b, layout| {
            b.iter(|| unsafe {
                convert_row_bitfield16_sse2(black_box(layout), black_box(input.as_slice()), &mut *output)
            })
        });
    }
}
