#![no_main]

// Compares our DXT5 decoder against bcdec_rs.
// bcdec always decodes the color half in four-color mode, while we honor three-color mode
// when c0 <= c1, so those blocks are skipped.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texdecode_bcn::decode_dxt5_block;
use texdecode_common::argb32::{alpha, blue, green, red};
use texdecode_common::color_565::Color565;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Bc3Block {
    pub bytes: [u8; 16],
}

fuzz_target!(|block: Bc3Block| {
    // Color data starts at offset 8.
    let c0 = Color565::from_le_bytes([block.bytes[8], block.bytes[9]]);
    let c1 = Color565::from_le_bytes([block.bytes[10], block.bytes[11]]);
    if !c0.greater_than(&c1) {
        return;
    }

    let ours = decode_dxt5_block(&block.bytes);

    let mut rgba = [0u8; 4 * 16];
    bcdec_rs::bc3(&block.bytes, &mut rgba, 4 * 4);

    for (i, (&px, theirs)) in ours.iter().zip(rgba.chunks_exact(4)).enumerate() {
        let channels = [red(px), green(px), blue(px), alpha(px)];
        for (c, (&a, &b)) in channels.iter().zip(theirs).enumerate() {
            assert!(
                a.abs_diff(b) <= 1,
                "pixel {i} channel {c}: ours {px:08X}, bcdec {theirs:?}"
            );
        }
    }
});
