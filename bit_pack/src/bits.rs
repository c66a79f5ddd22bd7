//! Single-field bit access, one bit at a time.
//!
//! Slow but easy to trust. Random access into packed streams goes through
//! here, and the test suites use it as the model the kernels are checked
//! against.

use crate::element::BitOrder;

#[inline(always)]
fn stream_bit(pos: usize, order: BitOrder) -> (usize, u8) {
    let shift = match order {
        BitOrder::Little => pos % 8,
        BitOrder::Big => 7 - pos % 8,
    };
    (pos / 8, 1u8 << shift)
}

/// Overwrites the `bit_width`-bit field at stream bit `bit_pos`.
///
/// Value bits above `bit_width` are ignored.
pub fn write_bits(buf: &mut [u8], bit_pos: usize, bit_width: u32, value: u32, order: BitOrder) {
    let width = bit_width as usize;
    for i in 0..width {
        // Little order streams the low bit first, big order the high bit.
        let value_bit = match order {
            BitOrder::Little => i,
            BitOrder::Big => width - 1 - i,
        };
        let (byte, mask) = stream_bit(bit_pos + i, order);
        if (value >> value_bit) & 1 == 1 {
            buf[byte] |= mask;
        } else {
            buf[byte] &= !mask;
        }
    }
}

/// Reads the `bit_width`-bit field at stream bit `bit_pos`.
pub fn read_bits(buf: &[u8], bit_pos: usize, bit_width: u32, order: BitOrder) -> u32 {
    let width = bit_width as usize;
    let mut value = 0u32;
    for i in 0..width {
        let (byte, mask) = stream_bit(bit_pos + i, order);
        if buf[byte] & mask != 0 {
            let value_bit = match order {
                BitOrder::Little => i,
                BitOrder::Big => width - 1 - i,
            };
            value |= 1 << value_bit;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bits() {
        for order in [BitOrder::Little, BitOrder::Big] {
            let mut buf = [0u8; 8];
            write_bits(&mut buf, 3, 5, 0b10101, order);
            assert_eq!(read_bits(&buf, 3, 5, order), 0b10101);
            write_bits(&mut buf, 13, 32, 0xdead_beef, order);
            assert_eq!(read_bits(&buf, 13, 32, order), 0xdead_beef);
            assert_eq!(read_bits(&buf, 3, 5, order), 0b10101);
        }
    }

    #[test]
    fn layouts() {
        let mut le = [0u8; 2];
        write_bits(&mut le, 0, 9, 0x1ff, BitOrder::Little);
        assert_eq!(le, [0xff, 0x01]);

        let mut be = [0u8; 2];
        write_bits(&mut be, 0, 9, 0x1ff, BitOrder::Big);
        assert_eq!(be, [0xff, 0x80]);

        let mut be = [0u8; 1];
        write_bits(&mut be, 1, 3, 0b101, BitOrder::Big);
        assert_eq!(be, [0b0101_0000]);
    }

    #[test]
    fn untouched_neighbours() {
        let mut buf = [0xffu8; 3];
        write_bits(&mut buf, 5, 10, 0, BitOrder::Little);
        assert_eq!(buf, [0x1f, 0x80, 0xff]);
    }
}
