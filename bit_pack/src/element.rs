//! Source element types and bit order.

use bytemuck::Pod;

/// Placement of bits within the packed byte stream.
///
/// `Little` fills each byte from its least significant bit and stores the
/// low bits of every element first. `Big` fills each byte from its most
/// significant bit and stores the high bits of every element first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitOrder {
    #[default]
    Little,
    Big,
}

impl BitOrder {
    #[inline]
    pub const fn is_big(self) -> bool {
        matches!(self, BitOrder::Big)
    }

    #[inline]
    pub(crate) const fn from_big(big: bool) -> Self {
        if big { BitOrder::Big } else { BitOrder::Little }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A natural-width unpacked integer: `u8`, `u16` or `u32`.
pub trait Element: Pod + Default + sealed::Sealed + 'static {
    const BITS: u32;

    fn to_u32(self) -> u32;

    /// Keeps the low `Self::BITS` bits of `value`.
    fn from_u32(value: u32) -> Self;
}

impl Element for u8 {
    const BITS: u32 = 8;

    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value as u8
    }
}

impl Element for u16 {
    const BITS: u32 = 16;

    #[inline(always)]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value as u16
    }
}

impl Element for u32 {
    const BITS: u32 = 32;

    #[inline(always)]
    fn to_u32(self) -> u32 {
        self
    }

    #[inline(always)]
    fn from_u32(value: u32) -> Self {
        value
    }
}

/// Runtime tag for element buffers handed over as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementWidth {
    U8,
    U16,
    U32,
}

impl ElementWidth {
    pub const fn bits(self) -> u32 {
        match self {
            ElementWidth::U8 => 8,
            ElementWidth::U16 => 16,
            ElementWidth::U32 => 32,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

/// Mask of the low `bit_width` bits, `bit_width` in `1..=32`.
#[inline(always)]
pub const fn low_mask(bit_width: u32) -> u32 {
    if bit_width >= 32 {
        u32::MAX
    } else {
        (1u32 << bit_width) - 1
    }
}
