//! Element-at-a-time fallback kernels.
//!
//! These handle any width and any element count. The dispatcher uses them
//! for the leading elements that bring the stream to a byte boundary, for
//! the tail after the last whole group, and for inputs too small to be
//! worth a vector pass.

use crate::element::{BitOrder, Element, low_mask};
use crate::swap::keep_leading;

/// Packs `src` into `dst` starting at bit `start_bit` (in `0..16`).
///
/// Writes exactly `ceil((src.len() * bit_width + start_bit) / 8)` bytes.
/// Bits of the first byte before `start_bit` are preserved, padding after
/// the last element is zero. Values must already fit in `bit_width` bits.
pub fn pack_nu<T: Element>(
    src: &[T],
    bit_width: u32,
    dst: &mut [u8],
    start_bit: u32,
    order: BitOrder,
) {
    if src.is_empty() {
        return;
    }
    let dst = &mut dst[(start_bit / 8) as usize..];
    let start_bit = start_bit % 8;
    match order {
        BitOrder::Little => pack_le(src, bit_width, dst, start_bit),
        BitOrder::Big => pack_be(src, bit_width, dst, start_bit),
    }
}

fn pack_le<T: Element>(src: &[T], bit_width: u32, dst: &mut [u8], start_bit: u32) {
    // acc holds `bits` pending bits, oldest in the low positions.
    let mut acc = u64::from(keep_leading(dst[0], start_bit, BitOrder::Little));
    let mut bits = start_bit;
    let mut out = 0;
    for &value in src {
        acc |= u64::from(value.to_u32()) << bits;
        bits += bit_width;
        while bits >= 8 {
            dst[out] = acc as u8;
            out += 1;
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        dst[out] = acc as u8;
    }
}

fn pack_be<T: Element>(src: &[T], bit_width: u32, dst: &mut [u8], start_bit: u32) {
    // acc holds `bits` pending bits, oldest in the high positions.
    let mut acc = u64::from(keep_leading(dst[0], start_bit, BitOrder::Big) >> ((8 - start_bit) % 8));
    let mut bits = start_bit;
    let mut out = 0;
    for &value in src {
        acc = (acc << bit_width) | u64::from(value.to_u32());
        bits += bit_width;
        while bits >= 8 {
            bits -= 8;
            dst[out] = (acc >> bits) as u8;
            out += 1;
        }
        acc &= (1u64 << bits) - 1;
    }
    if bits > 0 {
        dst[out] = (acc << (8 - bits)) as u8;
    }
}

/// Unpacks `dst.len()` elements of `bit_width` bits starting at bit `start_bit`.
///
/// Reads exactly `ceil((dst.len() * bit_width + start_bit) / 8)` bytes.
/// `bit_width` must not exceed `T::BITS`.
pub fn unpack_nu<T: Element>(
    src: &[u8],
    start_bit: u32,
    bit_width: u32,
    dst: &mut [T],
    order: BitOrder,
) {
    if dst.is_empty() {
        return;
    }
    let src = &src[(start_bit / 8) as usize..];
    let start_bit = start_bit % 8;
    match order {
        BitOrder::Little => unpack_le(src, start_bit, bit_width, dst),
        BitOrder::Big => unpack_be(src, start_bit, bit_width, dst),
    }
}

fn unpack_le<T: Element>(src: &[u8], start_bit: u32, bit_width: u32, dst: &mut [T]) {
    let mask = u64::from(low_mask(bit_width));
    let mut acc = u64::from(src[0] >> start_bit);
    let mut bits = 8 - start_bit;
    let mut pos = 1;
    for slot in dst {
        while bits < bit_width {
            acc |= u64::from(src[pos]) << bits;
            pos += 1;
            bits += 8;
        }
        *slot = T::from_u32((acc & mask) as u32);
        acc >>= bit_width;
        bits -= bit_width;
    }
}

fn unpack_be<T: Element>(src: &[u8], start_bit: u32, bit_width: u32, dst: &mut [T]) {
    let mask = u64::from(low_mask(bit_width));
    let mut acc = u64::from(src[0] & (0xff >> start_bit));
    let mut bits = 8 - start_bit;
    let mut pos = 1;
    for slot in dst {
        while bits < bit_width {
            acc = (acc << 8) | u64::from(src[pos]);
            pos += 1;
            bits += 8;
        }
        bits -= bit_width;
        *slot = T::from_u32(((acc >> bits) & mask) as u32);
        acc &= (1u64 << bits) - 1;
    }
}
