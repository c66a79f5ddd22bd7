//! # bit_stream
//!
//! Growable bit-packed streams built on the `bit_pack` kernels.
//!
//! ```rust
//! use bit_stream::{BitOrder, PackedStream};
//!
//! // Store 12-bit values (0-4095)
//! let mut stream = PackedStream::<12>::new(BitOrder::Little).expect("valid width");
//! stream.push(0xABC).unwrap();
//! stream.extend_from_slice(&[0x123u16, 0x456]).unwrap();
//!
//! assert_eq!(stream.get(0), Some(0xABC));
//! assert_eq!(stream.get(2), Some(0x456));
//! assert_eq!(stream.as_bytes().len(), 5);
//! ```
//!
//! ## Memory Savings Example
//!
//! ```rust
//! use bit_stream::{BitOrder, PackedStream};
//!
//! // Vec<u32>: 1000 elements × 4 bytes = 4000 bytes
//! let standard: Vec<u32> = (0..1000).map(|i| i % 1024).collect();
//!
//! // PackedStream<10>: 1000 elements × 10 bits = 1250 bytes
//! let mut packed = PackedStream::<10>::with_capacity(BitOrder::Big, 1000).unwrap();
//! packed.extend_from_slice(&standard).unwrap();
//! assert_eq!(packed.as_bytes().len(), 1250);
//! assert_eq!(packed.to_vec(), standard);
//! ```
//!

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod error;
pub use error::StreamError;

pub mod stream;
pub use stream::{HEADER_SIZE, Iter, PackedStream};

pub use bit_pack::BitOrder;
