#![no_main]

// Checks that the vectorized linear unpackers selected for this CPU produce the same raster
// as the portable implementation, for every format and stride.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texdecode_common::{CapabilitySet, PixelFormat};
use texdecode_linear::{strategies, unpack_with, StrategyTable};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct LinearInput {
    pub format_index: u8,
    pub width: u8,
    pub height: u8,
    pub stride_padding: u8,
    pub data: Vec<u8>,
}

fuzz_target!(|input: LinearInput| {
    let formats = PixelFormat::all_values();
    let format = formats[input.format_index as usize % formats.len()];
    let width = u32::from(input.width % 64) + 1;
    let height = u32::from(input.height % 16) + 1;
    let stride = match input.stride_padding {
        0 => 0,
        pad => width as usize * format.bytes_per_pixel() + usize::from(pad % 16),
    };

    let portable = StrategyTable::for_capabilities(CapabilitySet::empty());
    let expected = unpack_with(&portable, format, width, height, &input.data, stride);
    let actual = unpack_with(strategies(), format, width, height, &input.data, stride);

    match (expected, actual) {
        (Ok(expected), Ok(actual)) => {
            assert_eq!(expected.to_packed_argb32(), actual.to_packed_argb32(), "{format:?}");
            assert_eq!(expected.sbit(), actual.sbit());
        }
        (expected, actual) => assert_eq!(expected.err(), actual.err()),
    }
});
