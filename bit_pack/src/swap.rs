//! Byte swapping and partial-byte merging.
//!
//! Big-endian streams keep every 32-bit word most significant byte first.
//! The kernels build words as plain integers and convert them through the
//! helpers here, so the produced bytes are the same on every host.

use crate::element::BitOrder;

#[inline(always)]
pub const fn swap_bytes_16u(value: u16) -> u16 {
    value.rotate_left(8)
}

#[inline(always)]
pub const fn swap_bytes_32u(value: u32) -> u32 {
    ((value & 0x0000_00ff) << 24)
        | ((value & 0x0000_ff00) << 8)
        | ((value & 0x00ff_0000) >> 8)
        | ((value & 0xff00_0000) >> 24)
}

/// Reads a stream word in `order`.
#[inline(always)]
pub fn load_32u(bytes: [u8; 4], order: BitOrder) -> u32 {
    let word = u32::from_le_bytes(bytes);
    match order {
        BitOrder::Little => word,
        BitOrder::Big => swap_bytes_32u(word),
    }
}

/// Lays out a stream word in `order`.
#[inline(always)]
pub fn store_32u(word: u32, order: BitOrder) -> [u8; 4] {
    match order {
        BitOrder::Little => word.to_le_bytes(),
        BitOrder::Big => swap_bytes_32u(word).to_le_bytes(),
    }
}

/// Reads a 16-bit element in `order`.
#[inline(always)]
pub fn load_16u(bytes: [u8; 2], order: BitOrder) -> u16 {
    let value = u16::from_le_bytes(bytes);
    match order {
        BitOrder::Little => value,
        BitOrder::Big => swap_bytes_16u(value),
    }
}

/// Lays out a 16-bit element in `order`.
#[inline(always)]
pub fn store_16u(value: u16, order: BitOrder) -> [u8; 2] {
    match order {
        BitOrder::Little => value.to_le_bytes(),
        BitOrder::Big => swap_bytes_16u(value).to_le_bytes(),
    }
}

/// Bits of `existing` that precede `start_bit` (in `0..8`) and must survive a write.
///
/// Little order keeps the low `start_bit` bits, big order keeps the high
/// ones. New data is OR-ed onto the result over the complementary range.
#[inline(always)]
pub const fn keep_leading(existing: u8, start_bit: u32, order: BitOrder) -> u8 {
    if start_bit == 0 {
        return 0;
    }
    match order {
        BitOrder::Little => existing & (0xffu8 >> (8 - start_bit)),
        BitOrder::Big => existing & !(0xffu8 >> start_bit),
    }
}
