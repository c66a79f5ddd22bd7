//! Validating entry points.
//!
//! [`crate::pack`] and [`crate::unpack`] trust their caller and panic on a
//! broken contract. The functions here check every precondition first and
//! report violations as [`BitPackError`].

use crate::dispatch;
use crate::element::{BitOrder, Element, ElementWidth, low_mask};
use crate::error::{BitPackError, Result};

/// Bytes touched when `n` elements of `bit_width` bits start at `start_bit`.
#[inline]
pub const fn packed_len(n: usize, bit_width: u32, start_bit: u32) -> usize {
    (n * bit_width as usize + start_bit as usize).div_ceil(8)
}

#[inline]
fn validate_width(bit_width: u32) -> Result<()> {
    if (1..=32).contains(&bit_width) {
        Ok(())
    } else {
        Err(BitPackError::InvalidBitWidth(bit_width))
    }
}

#[inline]
fn validate_start(start_bit: u32) -> Result<()> {
    if start_bit < 16 {
        Ok(())
    } else {
        Err(BitPackError::InvalidStartBit(start_bit))
    }
}

#[inline]
fn validate_room(needed: usize, available: usize) -> Result<()> {
    if available >= needed {
        Ok(())
    } else {
        Err(BitPackError::InsufficientBytes { needed, available })
    }
}

/// Checked [`crate::pack`]. Returns the number of bytes touched.
///
/// ```rust
/// use bit_pack::{BitOrder, BitPackError, try_pack};
///
/// let mut dst = [0u8; 2];
/// assert_eq!(try_pack(&[5u8, 2, 7], 3, &mut dst, 0, BitOrder::Little), Ok(2));
///
/// let err = try_pack(&[8u8], 3, &mut dst, 0, BitOrder::Little);
/// assert!(matches!(err, Err(BitPackError::ValueOverflow { index: 0, value: 8, .. })));
/// ```
pub fn try_pack<T: Element>(
    src: &[T],
    bit_width: u32,
    dst: &mut [u8],
    start_bit: u32,
    order: BitOrder,
) -> Result<usize> {
    validate_width(bit_width)?;
    validate_start(start_bit)?;
    if src.is_empty() {
        return Ok(0);
    }
    let needed = packed_len(src.len(), bit_width, start_bit);
    validate_room(needed, dst.len())?;

    let max = low_mask(bit_width);
    if let Some((index, value)) = src
        .iter()
        .map(|v| v.to_u32())
        .enumerate()
        .find(|&(_, v)| v > max)
    {
        return Err(BitPackError::ValueOverflow {
            index,
            value,
            bit_width,
        });
    }

    dispatch::pack(src, bit_width, dst, start_bit, order);
    Ok(needed)
}

/// Checked [`crate::unpack`]. Returns the number of bytes consumed.
pub fn try_unpack<T: Element>(
    src: &[u8],
    start_bit: u32,
    bit_width: u32,
    dst: &mut [T],
    order: BitOrder,
) -> Result<usize> {
    validate_width(bit_width)?;
    if bit_width > T::BITS {
        return Err(BitPackError::UnsupportedWidth {
            bit_width,
            element_bits: T::BITS,
        });
    }
    validate_start(start_bit)?;
    if dst.is_empty() {
        return Ok(0);
    }
    let needed = packed_len(dst.len(), bit_width, start_bit);
    validate_room(needed, src.len())?;

    dispatch::unpack(src, start_bit, bit_width, dst, order);
    Ok(needed)
}

fn cast_error(width: ElementWidth) -> impl Fn(bytemuck::PodCastError) -> BitPackError {
    move |reason| BitPackError::Cast {
        bits: width.bits(),
        reason,
    }
}

/// [`try_pack`] over elements handed in as raw bytes.
///
/// `src` must hold whole, suitably aligned `width` elements in host byte
/// order.
pub fn pack_raw(
    src: &[u8],
    width: ElementWidth,
    bit_width: u32,
    dst: &mut [u8],
    start_bit: u32,
    order: BitOrder,
) -> Result<usize> {
    match width {
        ElementWidth::U8 => try_pack(src, bit_width, dst, start_bit, order),
        ElementWidth::U16 => {
            let src: &[u16] = bytemuck::try_cast_slice(src).map_err(cast_error(width))?;
            try_pack(src, bit_width, dst, start_bit, order)
        }
        ElementWidth::U32 => {
            let src: &[u32] = bytemuck::try_cast_slice(src).map_err(cast_error(width))?;
            try_pack(src, bit_width, dst, start_bit, order)
        }
    }
}

/// [`try_unpack`] into elements handed in as raw bytes.
pub fn unpack_raw(
    src: &[u8],
    start_bit: u32,
    bit_width: u32,
    dst: &mut [u8],
    width: ElementWidth,
    order: BitOrder,
) -> Result<usize> {
    match width {
        ElementWidth::U8 => try_unpack(src, start_bit, bit_width, dst, order),
        ElementWidth::U16 => {
            let dst: &mut [u16] = bytemuck::try_cast_slice_mut(dst).map_err(cast_error(width))?;
            try_unpack(src, start_bit, bit_width, dst, order)
        }
        ElementWidth::U32 => {
            let dst: &mut [u32] = bytemuck::try_cast_slice_mut(dst).map_err(cast_error(width))?;
            try_unpack(src, start_bit, bit_width, dst, order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths() {
        assert_eq!(packed_len(0, 9, 0), 0);
        assert_eq!(packed_len(0, 9, 5), 1);
        assert_eq!(packed_len(11, 9, 0), 13);
        assert_eq!(packed_len(1, 9, 7), 2);
        assert_eq!(packed_len(4, 32, 15), 18);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut dst = [0u8; 4];
        assert_eq!(
            try_pack(&[1u8], 0, &mut dst, 0, BitOrder::Little),
            Err(BitPackError::InvalidBitWidth(0))
        );
        assert_eq!(
            try_pack(&[1u8], 33, &mut dst, 0, BitOrder::Little),
            Err(BitPackError::InvalidBitWidth(33))
        );
        assert_eq!(
            try_pack(&[1u8], 4, &mut dst, 16, BitOrder::Big),
            Err(BitPackError::InvalidStartBit(16))
        );
        assert_eq!(
            try_pack(&[1u32; 3], 11, &mut dst, 0, BitOrder::Big),
            Err(BitPackError::InsufficientBytes {
                needed: 5,
                available: 4
            })
        );
        let mut out = [0u8; 2];
        assert_eq!(
            try_unpack(&dst, 0, 9, &mut out, BitOrder::Little),
            Err(BitPackError::UnsupportedWidth {
                bit_width: 9,
                element_bits: 8
            })
        );
    }

    #[test]
    fn overflow_is_reported_before_writing() {
        let mut dst = [0xeeu8; 4];
        let result = try_pack(&[1u16, 2, 600], 9, &mut dst, 0, BitOrder::Little);
        assert_eq!(
            result,
            Err(BitPackError::ValueOverflow {
                index: 2,
                value: 600,
                bit_width: 9
            })
        );
        assert_eq!(dst, [0xee; 4]);
    }

    #[test]
    fn raw_roundtrip() -> Result<()> {
        let values: Vec<u16> = (0..100).map(|i| i * 37 % 2048).collect();
        let raw: &[u8] = bytemuck::cast_slice(&values);
        let mut packed = vec![0u8; packed_len(values.len(), 11, 5)];
        let written = pack_raw(raw, ElementWidth::U16, 11, &mut packed, 5, BitOrder::Big)?;
        assert_eq!(written, packed.len());

        let mut restored = vec![0u16; values.len()];
        let read = unpack_raw(
            &packed,
            5,
            11,
            bytemuck::cast_slice_mut(&mut restored),
            ElementWidth::U16,
            BitOrder::Big,
        )?;
        assert_eq!(read, written);
        assert_eq!(restored, values);
        Ok(())
    }

    #[test]
    fn ragged_raw_bytes() {
        let mut dst = [0u8; 8];
        let err = pack_raw(&[1, 2, 3], ElementWidth::U16, 4, &mut dst, 0, BitOrder::Little);
        assert!(matches!(err, Err(BitPackError::Cast { bits: 16, .. })));
    }
}
