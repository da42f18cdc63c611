//! Color endpoint modes: turning unquantized endpoint values into two RGBA colors.

/// An endpoint color, in RGBA order.
pub(crate) type Rgba = [u8; 4];

/// Number of endpoint values color endpoint mode `cem` consumes.
#[inline(always)]
pub(crate) const fn value_count(cem: u32) -> usize {
    2 * ((cem as usize >> 2) + 1)
}

/// Whether `cem` is a high dynamic range mode.
#[inline(always)]
pub(crate) const fn is_hdr(cem: u32) -> bool {
    matches!(cem, 2 | 3 | 7 | 11 | 14 | 15)
}

/// Moves the top bit of `a` into `b` and turns `a` into a signed 6-bit offset.
#[inline(always)]
fn bit_transfer_signed(a: i32, b: i32) -> (i32, i32) {
    let b = (b >> 1) | (a & 0x80);
    let mut a = (a >> 1) & 0x3F;
    if a & 0x20 != 0 {
        a -= 0x40;
    }
    (a, b)
}

#[inline(always)]
fn blue_contract(r: i32, g: i32, b: i32, a: i32) -> [i32; 4] {
    [(r + b) >> 1, (g + b) >> 1, b, a]
}

#[inline(always)]
fn clamp(color: [i32; 4]) -> Rgba {
    color.map(|c| c.clamp(0, 255) as u8)
}

/// Decodes the endpoint pair of LDR mode `cem` from `values`, which must hold at least
/// [`value_count`] entries. Returns `None` for HDR modes.
pub(crate) fn decode_endpoints(cem: u32, values: &[u8]) -> Option<(Rgba, Rgba)> {
    let mut v = [0i32; 8];
    for (dst, &src) in v.iter_mut().zip(values) {
        *dst = src as i32;
    }

    let (e0, e1) = match cem {
        // Luminance, direct.
        0 => ([v[0], v[0], v[0], 255], [v[1], v[1], v[1], 255]),
        // Luminance, base and offset.
        1 => {
            let l0 = (v[0] >> 2) | (v[1] & 0xC0);
            let l1 = l0 + (v[1] & 0x3F);
            ([l0, l0, l0, 255], [l1, l1, l1, 255])
        }
        // Luminance and alpha, direct.
        4 => ([v[0], v[0], v[0], v[2]], [v[1], v[1], v[1], v[3]]),
        // Luminance and alpha, base and offset.
        5 => {
            let (l_off, l) = bit_transfer_signed(v[1], v[0]);
            let (a_off, a) = bit_transfer_signed(v[3], v[2]);
            let l1 = l + l_off;
            ([l, l, l, a], [l1, l1, l1, a + a_off])
        }
        // RGB, base and scale.
        6 => (
            [v[0] * v[3] >> 8, v[1] * v[3] >> 8, v[2] * v[3] >> 8, 255],
            [v[0], v[1], v[2], 255],
        ),
        // RGB(A), direct.
        8 | 12 => {
            let (a0, a1) = if cem == 12 { (v[6], v[7]) } else { (255, 255) };
            if v[1] + v[3] + v[5] >= v[0] + v[2] + v[4] {
                ([v[0], v[2], v[4], a0], [v[1], v[3], v[5], a1])
            } else {
                (
                    blue_contract(v[1], v[3], v[5], a1),
                    blue_contract(v[0], v[2], v[4], a0),
                )
            }
        }
        // RGB(A), base and offset.
        9 | 13 => {
            let (r_off, r) = bit_transfer_signed(v[1], v[0]);
            let (g_off, g) = bit_transfer_signed(v[3], v[2]);
            let (b_off, b) = bit_transfer_signed(v[5], v[4]);
            let (a, a_off) = if cem == 13 {
                let (a_off, a) = bit_transfer_signed(v[7], v[6]);
                (a, a_off)
            } else {
                (255, 0)
            };
            if r_off + g_off + b_off >= 0 {
                (
                    [r, g, b, a],
                    [r + r_off, g + g_off, b + b_off, a + a_off],
                )
            } else {
                (
                    blue_contract(r + r_off, g + g_off, b + b_off, a + a_off),
                    blue_contract(r, g, b, a),
                )
            }
        }
        // RGB base and scale, plus two alphas.
        10 => (
            [v[0] * v[3] >> 8, v[1] * v[3] >> 8, v[2] * v[3] >> 8, v[4]],
            [v[0], v[1], v[2], v[5]],
        ),
        _ => return None,
    };
    Some((clamp(e0), clamp(e1)))
}
