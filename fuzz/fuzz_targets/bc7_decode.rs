#![no_main]

// Compares our BC7 decoder against bcdec_rs. BC7 interpolation is fully specified, so the
// results must match exactly, including the transparent black of reserved mode bytes.

use libfuzzer_sys::{arbitrary, fuzz_target};
use texdecode_bcn::decode_bc7_block;
use texdecode_common::argb32::argb;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Bc7Block {
    pub bytes: [u8; 16],
}

fuzz_target!(|block: Bc7Block| {
    let ours = decode_bc7_block(&block.bytes);

    let mut rgba = [0u8; 4 * 16];
    bcdec_rs::bc7(&block.bytes, &mut rgba, 4 * 4);
    let theirs: Vec<u32> = rgba
        .chunks_exact(4)
        .map(|p| argb(p[3], p[0], p[1], p[2]))
        .collect();

    assert_eq!(&ours[..], &theirs[..], "Decoded blocks don't match");
});
