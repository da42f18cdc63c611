//! Integer sequence encoding and unquantization.
//!
//! A sequence of values in `0..levels` is packed as plain bits, or as a low bit field per value
//! plus base-3 (trit) or base-5 (quint) digits shared between groups of 5 or 3 values.

/// A quantization range used by color endpoints and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Quant {
    pub levels: u16,
    pub trits: bool,
    pub quints: bool,
    /// Low bits stored per value.
    pub bits: u32,
}

const fn q(levels: u16, trits: bool, quints: bool, bits: u32) -> Quant {
    Quant {
        levels,
        trits,
        quints,
        bits,
    }
}

/// Every range, from 2 to 256 levels.
#[rustfmt::skip]
pub(crate) const QUANTS: [Quant; 21] = [
    q(2,   false, false, 1),
    q(3,   true,  false, 0),
    q(4,   false, false, 2),
    q(5,   false, true,  0),
    q(6,   true,  false, 1),
    q(8,   false, false, 3),
    q(10,  false, true,  1),
    q(12,  true,  false, 2),
    q(16,  false, false, 4),
    q(20,  false, true,  2),
    q(24,  true,  false, 3),
    q(32,  false, false, 5),
    q(40,  false, true,  3),
    q(48,  true,  false, 4),
    q(64,  false, false, 6),
    q(80,  false, true,  4),
    q(96,  true,  false, 5),
    q(128, false, false, 7),
    q(160, false, true,  5),
    q(192, true,  false, 6),
    q(256, false, false, 8),
];

/// Index of the smallest color range endpoints may use (6 levels).
pub(crate) const MIN_COLOR_QUANT: usize = 4;

impl Quant {
    /// Number of bits `count` values occupy.
    pub fn ise_bits(self, count: usize) -> usize {
        let base = self.bits as usize * count;
        if self.trits {
            base + (8 * count).div_ceil(5)
        } else if self.quints {
            base + (7 * count).div_ceil(3)
        } else {
            base
        }
    }
}

/// Reads `count`-bit fields from a 128-bit value, least significant first. Bits past the end
/// read as zero.
pub(crate) struct BitReader {
    bits: u128,
    pos: u32,
}

impl BitReader {
    pub fn new(bits: u128) -> Self {
        Self { bits, pos: 0 }
    }

    #[inline(always)]
    pub fn read(&mut self, count: u32) -> u32 {
        let value = field(self.bits, self.pos, count);
        self.pos += count;
        value
    }
}

/// `count` bits of `bits` starting at bit `start`. `count` must be at most 32.
#[inline(always)]
pub(crate) fn field(bits: u128, start: u32, count: u32) -> u32 {
    if start >= 128 || count == 0 {
        return 0;
    }
    ((bits >> start) & ((1u128 << count) - 1)) as u32
}

/// Keeps the low `len` bits of `bits`.
#[inline(always)]
pub(crate) fn low_bits(bits: u128, len: usize) -> u128 {
    if len >= 128 {
        bits
    } else {
        bits & ((1u128 << len) - 1)
    }
}

#[inline(always)]
fn bit(value: u32, index: u32) -> u32 {
    (value >> index) & 1
}

/// Splits 8 packed bits into 5 trits.
pub(crate) fn unpack_trits(t: u32) -> [u32; 5] {
    let (c, t3, t4);
    if (t >> 2) & 0x7 == 0x7 {
        c = ((t >> 5) & 0x7) << 2 | (t & 0x3);
        t4 = 2;
        t3 = 2;
    } else {
        c = t & 0x1F;
        if (t >> 5) & 0x3 == 0x3 {
            t4 = 2;
            t3 = bit(t, 7);
        } else {
            t4 = bit(t, 7);
            t3 = (t >> 5) & 0x3;
        }
    }
    let (t0, t1, t2);
    if c & 0x3 == 0x3 {
        t2 = 2;
        t1 = bit(c, 4);
        t0 = bit(c, 3) << 1 | (bit(c, 2) & !bit(c, 3) & 1);
    } else if (c >> 2) & 0x3 == 0x3 {
        t2 = 2;
        t1 = 2;
        t0 = c & 0x3;
    } else {
        t2 = bit(c, 4);
        t1 = (c >> 2) & 0x3;
        t0 = bit(c, 1) << 1 | (bit(c, 0) & !bit(c, 1) & 1);
    }
    [t0, t1, t2, t3, t4]
}

/// Splits 7 packed bits into 3 quints.
pub(crate) fn unpack_quints(q: u32) -> [u32; 3] {
    if (q >> 1) & 0x3 == 0x3 && (q >> 5) & 0x3 == 0 {
        let q0 = bit(q, 0);
        let q2 = q0 << 2 | (bit(q, 4) & !q0 & 1) << 1 | (bit(q, 3) & !q0 & 1);
        return [4, 4, q2];
    }
    let (q2, c) = if (q >> 1) & 0x3 == 0x3 {
        (4, ((q >> 3) & 0x3) << 3 | (!(q >> 5) & 0x3) << 1 | bit(q, 0))
    } else {
        ((q >> 5) & 0x3, q & 0x1F)
    };
    let (q0, q1) = if c & 0x7 == 0x5 {
        ((c >> 3) & 0x3, 4)
    } else {
        (c & 0x7, (c >> 3) & 0x3)
    };
    [q0, q1, q2]
}

/// Decodes `out.len()` values of range `quant` from `bits`, least significant bit first.
pub(crate) fn decode_ise(quant: Quant, bits: u128, out: &mut [u8]) {
    let mut reader = BitReader::new(bits);
    let m = quant.bits;
    if quant.trits {
        // m bits, T[1:0], m bits, T[3:2], m bits, T[4], m bits, T[6:5], m bits, T[7]
        const SPLITS: [(u32, u32); 5] = [(0, 2), (2, 2), (4, 1), (5, 2), (7, 1)];
        for group in out.chunks_mut(5) {
            let mut low = [0; 5];
            let mut packed = 0;
            for (i, (shift, count)) in SPLITS.into_iter().enumerate() {
                low[i] = reader.read(m);
                packed |= reader.read(count) << shift;
            }
            let trits = unpack_trits(packed);
            for (i, value) in group.iter_mut().enumerate() {
                *value = (trits[i] << m | low[i]) as u8;
            }
        }
    } else if quant.quints {
        // m bits, Q[2:0], m bits, Q[4:3], m bits, Q[6:5]
        const SPLITS: [(u32, u32); 3] = [(0, 3), (3, 2), (5, 2)];
        for group in out.chunks_mut(3) {
            let mut low = [0; 3];
            let mut packed = 0;
            for (i, (shift, count)) in SPLITS.into_iter().enumerate() {
                low[i] = reader.read(m);
                packed |= reader.read(count) << shift;
            }
            let quints = unpack_quints(packed);
            for (i, value) in group.iter_mut().enumerate() {
                *value = (quints[i] << m | low[i]) as u8;
            }
        }
    } else {
        for value in out.iter_mut() {
            *value = reader.read(m) as u8;
        }
    }
}

/// Maps a color endpoint value of range `quant` to `0..=255`.
pub(crate) fn unquantize_color(quant: Quant, value: u8) -> u8 {
    let v = value as u32;
    let m = quant.bits;
    if !quant.trits && !quant.quints {
        // Replicate the bits until 8 are filled.
        let mut out = 0;
        let mut filled = 0;
        while filled < 8 {
            out = out << m | v;
            filled += m;
        }
        return (out >> (filled - 8)) as u8;
    }

    let digit = v >> m;
    let low = v & ((1 << m) - 1);
    let a = if low & 1 != 0 { 0x1FF } else { 0 };
    let b = low >> 1;
    let (bb, c) = match (quant.trits, m) {
        (true, 1) => (0, 204),
        (true, 2) => (b * 0x116, 93),
        (true, 3) => (b << 7 | b << 2 | b, 44),
        (true, 4) => (b << 6 | b, 22),
        (true, 5) => (b << 5 | b >> 2, 11),
        (true, _) => (b << 4 | b >> 4, 5),
        (false, 1) => (0, 113),
        (false, 2) => (b * 0x10C, 54),
        (false, 3) => (b << 7 | b << 1 | b >> 1, 26),
        (false, 4) => (b << 6 | b >> 1, 13),
        (false, _) => (b << 5 | b >> 3, 6),
    };
    let t = (digit * c + bb) ^ a;
    ((a & 0x80) | (t >> 2)) as u8
}

/// Maps a weight value of range `quant` to `0..=64`.
pub(crate) fn unquantize_weight(quant: Quant, value: u8) -> u8 {
    let v = value as u32;
    let m = quant.bits;
    let unquantized = if !quant.trits && !quant.quints {
        // Replicate to 6 bits.
        let mut out = 0;
        let mut filled = 0;
        while filled < 6 {
            out = out << m | v;
            filled += m;
        }
        out >> (filled - 6)
    } else if m == 0 {
        let step = if quant.trits { 32 } else { 16 };
        return (v * step) as u8;
    } else {
        let digit = v >> m;
        let low = v & ((1 << m) - 1);
        let a = if low & 1 != 0 { 0x7F } else { 0 };
        let b = low >> 1;
        let (bb, c) = match (quant.trits, m) {
            (true, 1) => (0, 50),
            (true, 2) => (b * 0x45, 23),
            (true, _) => (b << 5 | b, 11),
            (false, 1) => (0, 28),
            (false, _) => (b * 0x42, 13),
        };
        let t = (digit * c + bb) ^ a;
        (a & 0x20) | (t >> 2)
    };
    if unquantized > 32 {
        unquantized as u8 + 1
    } else {
        unquantized as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn quant(levels: u16) -> Quant {
        *QUANTS.iter().find(|q| q.levels == levels).unwrap()
    }

    #[rstest]
    #[case(0b000_000_00, [0, 0, 0, 0, 0])]
    #[case(214, [2, 1, 1, 2, 1])]
    #[case(0b000_111_00, [0, 0, 0, 2, 2])]
    #[case(0b000_000_11, [0, 0, 2, 0, 0])]
    #[case(0b000_011_01, [1, 2, 2, 0, 0])]
    fn unpacks_trits(#[case] packed: u32, #[case] expected: [u32; 5]) {
        assert_eq!(unpack_trits(packed), expected);
    }

    #[rstest]
    #[case(0, [0, 0, 0])]
    #[case(92, [4, 3, 2])]
    #[case(0b00_00_110, [4, 4, 0])]
    #[case(0b00_11_110, [4, 4, 3])]
    #[case(0b01_10_101, [2, 4, 1])]
    fn unpacks_quints(#[case] packed: u32, #[case] expected: [u32; 3]) {
        assert_eq!(unpack_quints(packed), expected);
    }

    #[test]
    fn trit_groups_interleave_low_bits_and_packed_bits() {
        // Range 6: one low bit per value. Packed trits 214 are [2, 1, 1, 2, 1].
        let low = [1u128, 0, 1, 1, 0];
        let t = 214u128;
        let stream = low[0]
            | (t & 0x3) << 1
            | low[1] << 3
            | ((t >> 2) & 0x3) << 4
            | low[2] << 6
            | ((t >> 4) & 0x1) << 7
            | low[3] << 8
            | ((t >> 5) & 0x3) << 9
            | low[4] << 11
            | ((t >> 7) & 0x1) << 12;
        let mut out = [0; 5];
        decode_ise(quant(6), stream, &mut out);
        assert_eq!(out, [5, 2, 3, 5, 2]);
    }

    #[test]
    fn quint_groups_interleave_low_bits_and_packed_bits() {
        // Range 20: two low bits per value. Packed quints 92 are [4, 3, 2].
        let q = 92u128;
        let stream =
            0b01 | (q & 0x7) << 2 | 0b10 << 5 | ((q >> 3) & 0x3) << 7 | 0b11 << 9 | (q >> 5) << 11;
        let mut out = [0; 3];
        decode_ise(quant(20), stream, &mut out);
        assert_eq!(out, [4 << 2 | 1, 3 << 2 | 2, 2 << 2 | 3]);
    }

    #[test]
    fn partial_groups_read_missing_bits_as_zero() {
        let mut out = [0xAA; 2];
        decode_ise(quant(3), 0, &mut out);
        assert_eq!(out, [0, 0]);
    }

    #[rstest]
    #[case(2, 16, 16)]
    #[case(3, 5, 8)]
    #[case(3, 6, 10)]
    #[case(5, 3, 7)]
    #[case(6, 16, 16 + 26)]
    #[case(20, 8, 16 + 19)]
    #[case(256, 2, 16)]
    fn counts_sequence_bits(#[case] levels: u16, #[case] count: usize, #[case] expected: usize) {
        assert_eq!(quant(levels).ise_bits(count), expected);
    }

    #[rstest]
    #[case(6, [0, 255, 51, 204, 102, 153].as_slice())]
    #[case(8, [0, 36, 73, 109, 146, 182, 219, 255].as_slice())]
    #[case(10, [0, 255, 28, 227, 56, 199, 84, 171, 113, 142].as_slice())]
    fn unquantizes_colors(#[case] levels: u16, #[case] expected: &[u8]) {
        let values: Vec<u8> = (0..levels as u8).map(|v| unquantize_color(quant(levels), v)).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn eight_bit_colors_are_unchanged() {
        for v in 0..=255u8 {
            assert_eq!(unquantize_color(quant(256), v), v);
        }
    }

    #[rstest]
    #[case(2, [0, 64].as_slice())]
    #[case(3, [0, 32, 64].as_slice())]
    #[case(4, [0, 21, 43, 64].as_slice())]
    #[case(5, [0, 16, 32, 48, 64].as_slice())]
    #[case(6, [0, 64, 12, 52, 25, 39].as_slice())]
    #[case(8, [0, 9, 18, 27, 37, 46, 55, 64].as_slice())]
    fn unquantizes_weights(#[case] levels: u16, #[case] expected: &[u8]) {
        let values: Vec<u8> = (0..levels as u8).map(|v| unquantize_weight(quant(levels), v)).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn weight_ranges_end_at_64() {
        for quant in QUANTS.iter().take(12) {
            let max = (0..quant.levels as u8)
                .map(|v| unquantize_weight(*quant, v))
                .max();
            assert_eq!(max, Some(64), "{} levels", quant.levels);
        }
    }
}
