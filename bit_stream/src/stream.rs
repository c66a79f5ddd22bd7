//! Growable packed stream with a persisted header.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use bit_stream::{BitOrder, PackedStream};
//!
//! let mut stream = PackedStream::<7>::new(BitOrder::Little).expect("valid width");
//! stream.push(100).unwrap();
//! stream.extend_from_slice(&[1u8, 2, 3]).unwrap();
//!
//! assert_eq!(stream.get(0), Some(100));
//! assert_eq!(stream.get(3), Some(3));
//! assert_eq!(stream.len(), 4);
//! ```
//!
//! ## Persistence
//!
//! ```rust
//! use bit_stream::{BitOrder, PackedStream};
//!
//! let mut stream = PackedStream::<10>::new(BitOrder::Big).unwrap();
//! stream.extend_from_slice(&[512u16, 3, 1023]).unwrap();
//!
//! let bytes = stream.to_bytes();
//! let restored = PackedStream::<10>::from_bytes(&bytes).unwrap();
//! assert_eq!(restored.to_vec(), vec![512, 3, 1023]);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use bit_pack::{BitOrder, Element, bits, packed_len, scalar, try_pack, try_unpack};
use bytemuck_derive::{Pod, Zeroable};
use log::{debug, trace};

use crate::error::{Result, StreamError};

const MAGIC: &[u8; 4] = b"PKST";
pub const HEADER_SIZE: usize = 16;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct Header {
    magic: [u8; 4],
    bit_width: u8,
    order: u8,
    reserved: [u8; 2],
    len: [u8; 8],
}

const fn order_tag(order: BitOrder) -> u8 {
    match order {
        BitOrder::Little => 0,
        BitOrder::Big => 1,
    }
}

/// Validates the bit width N.
#[inline(always)]
fn validate_n<const N: usize>() -> Result<()> {
    if (1..=32).contains(&N) {
        Ok(())
    } else {
        Err(StreamError::InvalidBitWidth(N))
    }
}

/// `N`-bit values packed back to back in a byte vector.
///
/// Appends resume in the middle of the last byte, so a stream built from
/// many small batches is byte-for-byte the stream a single batch produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedStream<const N: usize> {
    data: Vec<u8>,
    len: usize,
    order: BitOrder,
}

impl<const N: usize> PackedStream<N> {
    const MAX_VALUE: u32 = if N >= 32 { u32::MAX } else { (1u32 << N) - 1 };

    pub fn new(order: BitOrder) -> Result<Self> {
        validate_n::<N>()?;
        Ok(Self {
            data: Vec::new(),
            len: 0,
            order,
        })
    }

    /// Creates an empty stream with room for `capacity` values.
    pub fn with_capacity(order: BitOrder, capacity: usize) -> Result<Self> {
        validate_n::<N>()?;
        Ok(Self {
            data: Vec::with_capacity(packed_len(capacity, N as u32, 0)),
            len: 0,
            order,
        })
    }

    /// Wraps an already packed payload, taking as many whole values as fit.
    pub fn from_raw(mut data: Vec<u8>, order: BitOrder) -> Result<Self> {
        validate_n::<N>()?;
        let len = data.len() * 8 / N;
        data.truncate(packed_len(len, N as u32, 0));
        Ok(Self { data, len, order })
    }

    pub fn order(&self) -> BitOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of meaningful bits in the payload.
    pub fn bit_len(&self) -> usize {
        self.len * N
    }

    /// Values the current allocation holds without growing.
    pub fn capacity(&self) -> usize {
        self.data.capacity() * 8 / N
    }

    /// Packed payload, without a header.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.len = 0;
    }

    pub fn push(&mut self, value: u32) -> Result<()> {
        if value > Self::MAX_VALUE {
            return Err(StreamError::ValueOverflow(value, N));
        }
        self.extend_from_slice(&[value])
    }

    /// Appends `values`, each of which must fit in `N` bits.
    ///
    /// On error the stream is left unchanged.
    pub fn extend_from_slice<T: Element>(&mut self, values: &[T]) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let bit_pos = self.bit_len();
        let old_bytes = self.data.len();
        self.data
            .resize(packed_len(self.len + values.len(), N as u32, 0), 0);

        let start_bit = (bit_pos % 8) as u32;
        if let Err(err) = try_pack(values, N as u32, &mut self.data[bit_pos / 8..], start_bit, self.order) {
            self.data.truncate(old_bytes);
            return Err(err.into());
        }
        self.len += values.len();
        trace!(
            "appended {} values at bit {} ({} bytes)",
            values.len(),
            bit_pos,
            self.data.len()
        );
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        if index >= self.len {
            return None;
        }
        let bit_pos = index * N;
        let mut value = [0u32; 1];
        scalar::unpack_nu(
            &self.data[bit_pos / 8..],
            (bit_pos % 8) as u32,
            N as u32,
            &mut value,
            self.order,
        );
        Some(value[0])
    }

    /// Overwrites the value at `index`.
    pub fn set(&mut self, index: usize, value: u32) -> Result<()> {
        if index >= self.len {
            return Err(StreamError::IndexOutOfBounds(index, self.len));
        }
        if value > Self::MAX_VALUE {
            return Err(StreamError::ValueOverflow(value, N));
        }
        bits::write_bits(&mut self.data, index * N, N as u32, value, self.order);
        Ok(())
    }

    /// Decodes values `start..start + dst.len()` into `dst`.
    pub fn decode_range<T: Element>(&self, start: usize, dst: &mut [T]) -> Result<()> {
        let end = start.saturating_add(dst.len());
        if end > self.len {
            return Err(StreamError::IndexOutOfBounds(end, self.len));
        }
        let bit_pos = start * N;
        try_unpack(
            &self.data[bit_pos / 8..],
            (bit_pos % 8) as u32,
            N as u32,
            dst,
            self.order,
        )?;
        Ok(())
    }

    /// Decodes the first `dst.len()` values.
    pub fn decode_into<T: Element>(&self, dst: &mut [T]) -> Result<()> {
        self.decode_range(0, dst)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        let mut out = vec![0u32; self.len];
        // A u32 destination holds any width, and the range is in bounds.
        bit_pack::unpack(&self.data, 0, N as u32, &mut out, self.order);
        out
    }

    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            stream: self,
            index: 0,
        }
    }

    /// Header followed by the packed payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = Header {
            magic: *MAGIC,
            bit_width: N as u8,
            order: order_tag(self.order),
            reserved: [0; 2],
            len: (self.len as u64).to_le_bytes(),
        };
        let mut out = Vec::with_capacity(HEADER_SIZE + self.data.len());
        out.extend_from_slice(bytemuck::bytes_of(&header));
        out.extend_from_slice(&self.data);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        validate_n::<N>()?;
        if bytes.len() < HEADER_SIZE {
            return Err(StreamError::StorageTooSmall);
        }
        let header: Header = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
        if &header.magic != MAGIC {
            return Err(StreamError::InvalidMagic);
        }
        if header.bit_width as usize != N {
            return Err(StreamError::InvalidN {
                expected: N,
                found: header.bit_width as u32,
            });
        }
        let order = match header.order {
            0 => BitOrder::Little,
            1 => BitOrder::Big,
            tag => return Err(StreamError::InvalidOrder(tag)),
        };

        let payload = &bytes[HEADER_SIZE..];
        let truncated = |needed| StreamError::Truncated {
            needed,
            available: payload.len(),
        };
        let len = usize::try_from(u64::from_le_bytes(header.len)).map_err(|_| truncated(usize::MAX))?;
        let needed = len
            .checked_mul(N)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| truncated(usize::MAX))?;
        if payload.len() < needed {
            return Err(truncated(needed));
        }

        debug!("decoded {}-bit stream: {} values, {:?} order", N, len, order);
        Ok(Self {
            data: payload[..needed].to_vec(),
            len,
            order,
        })
    }
}

pub struct Iter<'a, const N: usize> {
    stream: &'a PackedStream<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = u32;
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.stream.get(self.index)?;
        self.index += 1;
        Some(value)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stream.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, const N: usize> ExactSizeIterator for Iter<'a, N> {}

impl<'a, const N: usize> IntoIterator for &'a PackedStream<N> {
    type Item = u32;
    type IntoIter = Iter<'a, N>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
