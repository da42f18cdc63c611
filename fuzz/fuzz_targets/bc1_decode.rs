#![no_main]

// Compares our DXT1 decoder against bcdec_rs.
// bcdec interpolates from 8-bit endpoints with its own rounding, so channels may differ by one.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texdecode_bcn::{decode_dxt1_block, Bc1Alpha};
use texdecode_common::argb32::{alpha, blue, green, red};
use texdecode_common::Argb32;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Bc1Block {
    pub bytes: [u8; 8],
}

fuzz_target!(|block: Bc1Block| {
    // bcdec decodes index 3 of a three-color block to transparent black.
    let ours = decode_dxt1_block(&block.bytes, Bc1Alpha::Transparent);

    let mut rgba = [0u8; 4 * 16];
    bcdec_rs::bc1(&block.bytes, &mut rgba, 4 * 4);

    assert_close(&ours, &rgba, 1);
});

fn assert_close(ours: &[Argb32; 16], rgba: &[u8; 64], tolerance: u8) {
    for (i, (&px, theirs)) in ours.iter().zip(rgba.chunks_exact(4)).enumerate() {
        let channels = [red(px), green(px), blue(px), alpha(px)];
        for (c, (&a, &b)) in channels.iter().zip(theirs).enumerate() {
            assert!(
                a.abs_diff(b) <= tolerance,
                "pixel {i} channel {c}: ours {px:08X}, bcdec {theirs:?}"
            );
        }
    }
}
