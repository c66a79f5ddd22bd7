//! # bit_pack
//!
//! Bit-packing and unpacking of `u8`, `u16` and `u32` arrays at any width
//! from 1 to 32 bits, in little or big bit order, with an arbitrary start
//! bit in the first byte. `no_std` compatible.
//!
//! ```rust
//! use bit_pack::{BitOrder, pack, packed_len, unpack};
//!
//! // 12-bit samples, 1.5 bytes each instead of 2
//! let samples: Vec<u16> = (0..1000).map(|i| (i * 7) % 4096).collect();
//! let mut packed = vec![0u8; packed_len(samples.len(), 12, 0)];
//! pack(&samples, 12, &mut packed, 0, BitOrder::Little);
//! assert_eq!(packed.len(), 1500);
//!
//! let mut restored = vec![0u16; samples.len()];
//! unpack(&packed, 0, 12, &mut restored, BitOrder::Little);
//! assert_eq!(restored, samples);
//! ```
//!
//! ## Resuming a partial byte
//!
//! ```rust
//! use bit_pack::{BitOrder, pack};
//!
//! let mut dst = [0b0101_0101u8, 0];
//! // bits 0..7 already hold data, the new element starts at bit 7
//! pack(&[511u16], 9, &mut dst, 7, BitOrder::Little);
//! assert_eq!(dst[0] & 0x7f, 0b101_0101);
//! ```
//!

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

pub mod error;
pub use error::{BitPackError, Result};

pub mod bits;
pub mod element;
pub use element::{BitOrder, Element, ElementWidth};

pub mod scalar;
pub mod swap;
pub mod tables;

mod kernel;
pub use kernel::Backend;
#[cfg(feature = "std")]
pub use kernel::BACKEND_ENV;

mod dispatch;
pub use dispatch::{pack, pack_with, unpack, unpack_with};

pub mod checked;
pub use checked::{pack_raw, packed_len, try_pack, try_unpack, unpack_raw};
