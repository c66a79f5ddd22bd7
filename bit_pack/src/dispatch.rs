//! Per-width kernels and the lead / bulk / tail split.
//!
//! Every `(bit width, bit order)` pair has its own monomorphized kernel.
//! A kernel packs the first few elements with the scalar code until the
//! stream reaches a byte boundary, hands whole 32-element groups to the
//! vector backend, and finishes the tail with the scalar code again.
//!
//! ```rust
//! use bit_pack::{BitOrder, pack, unpack};
//!
//! let values: Vec<u16> = (0..300).map(|i| i % 512).collect();
//! let mut packed = vec![0u8; bit_pack::packed_len(values.len(), 9, 3)];
//! pack(&values, 9, &mut packed, 3, BitOrder::Big);
//!
//! let mut restored = vec![0u16; values.len()];
//! unpack(&packed, 3, 9, &mut restored, BitOrder::Big);
//! assert_eq!(restored, values);
//! ```

use log::trace;

use crate::checked::packed_len;
use crate::element::{BitOrder, Element};
use crate::kernel::{self, Backend};
use crate::scalar;
use crate::swap::{load_16u, load_32u, store_16u, store_32u};
use crate::tables::{ALIGN, GROUP, NO_ALIGN};

type PackFn<T> = fn(Backend, &[T], &mut [u8], u32);
type UnpackFn<T> = fn(Backend, &[u8], u32, &mut [T]);

/// Packs `src` at `bit_width` bits per element into `dst`, from bit `start_bit`.
///
/// Writes exactly [`packed_len`] bytes. Bits of the first byte before
/// `start_bit` are kept. Values must fit in `bit_width` bits; wider values
/// corrupt their neighbours. Use [`crate::try_pack`] for untrusted input.
///
/// # Panics
///
/// Panics if `bit_width` is outside `1..=32`, `start_bit >= 16`, or `dst`
/// is too short.
pub fn pack<T: Element>(src: &[T], bit_width: u32, dst: &mut [u8], start_bit: u32, order: BitOrder) {
    pack_with(Backend::active(), src, bit_width, dst, start_bit, order);
}

/// [`pack`] on an explicit backend. Unsupported backends fall back to
/// [`Backend::Portable`].
pub fn pack_with<T: Element>(
    backend: Backend,
    src: &[T],
    bit_width: u32,
    dst: &mut [u8],
    start_bit: u32,
    order: BitOrder,
) {
    assert!(start_bit < 16, "start bit must be below 16, got {start_bit}");
    let Some(kernel) = pack_kernel::<T>(bit_width, order) else {
        panic!("bit width must be in 1..=32, got {bit_width}");
    };
    if src.is_empty() {
        return;
    }
    let needed = packed_len(src.len(), bit_width, start_bit);
    assert!(dst.len() >= needed, "destination holds {} bytes, {needed} required", dst.len());
    kernel(backend.supported_or_portable(), src, dst, start_bit);
}

/// Unpacks `dst.len()` elements of `bit_width` bits from `src`, from bit `start_bit`.
///
/// Reads exactly [`packed_len`] bytes. Output values are masked to
/// `bit_width` bits.
///
/// # Panics
///
/// Panics if `bit_width` is outside `1..=T::BITS`, `start_bit >= 16`, or
/// `src` is too short.
pub fn unpack<T: Element>(src: &[u8], start_bit: u32, bit_width: u32, dst: &mut [T], order: BitOrder) {
    unpack_with(Backend::active(), src, start_bit, bit_width, dst, order);
}

/// [`unpack`] on an explicit backend.
pub fn unpack_with<T: Element>(
    backend: Backend,
    src: &[u8],
    start_bit: u32,
    bit_width: u32,
    dst: &mut [T],
    order: BitOrder,
) {
    assert!(start_bit < 16, "start bit must be below 16, got {start_bit}");
    let Some(kernel) = unpack_kernel::<T>(bit_width, order) else {
        panic!("bit width must be in 1..={}, got {bit_width}", T::BITS);
    };
    if dst.is_empty() {
        return;
    }
    let needed = packed_len(dst.len(), bit_width, start_bit);
    assert!(src.len() >= needed, "source holds {} bytes, {needed} required", src.len());
    kernel(backend.supported_or_portable(), src, start_bit, dst);
}

macro_rules! kernel_table {
    ($(#[$meta:meta])* $name:ident -> $fn_ty:ident, $kernel:ident, $limit:expr; $($w:literal)*) => {
        $(#[$meta])*
        fn $name<T: Element>(bit_width: u32, order: BitOrder) -> Option<$fn_ty<T>> {
            if bit_width > $limit {
                return None;
            }
            let kernel: $fn_ty<T> = match (bit_width, order) {
                $(
                    ($w, BitOrder::Little) => $kernel::<T, $w, false>,
                    ($w, BitOrder::Big) => $kernel::<T, $w, true>,
                )*
                _ => return None,
            };
            Some(kernel)
        }
    };
}

kernel_table!(
    /// Dedicated pack kernel for any width in `1..=32`, whatever the element type.
    pack_kernel -> PackFn, pack_width, 32;
    1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
);

kernel_table!(
    /// Dedicated unpack kernel for widths in `1..=T::BITS`.
    unpack_kernel -> UnpackFn, unpack_width, T::BITS;
    1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
);

/// Byte-multiple widths from a byte-aligned start copy whole elements.
#[inline(always)]
const fn takes_natural_path(w: usize, start_bit: u32) -> bool {
    w % 8 == 0 && start_bit % 8 == 0
}

/// Number of leading elements for the scalar kernel, or `None` when the
/// whole call should stay scalar.
#[inline(always)]
fn vector_lead(backend: Backend, w: usize, n: usize, start_bit: u32) -> Option<usize> {
    if backend == Backend::Scalar {
        return None;
    }
    let align = ALIGN[w][(start_bit % 8) as usize];
    if align == NO_ALIGN || align as usize + GROUP > n {
        return None;
    }
    Some(align as usize)
}

fn pack_width<T: Element, const W: usize, const BIG: bool>(
    backend: Backend,
    src: &[T],
    dst: &mut [u8],
    start_bit: u32,
) {
    let order = BitOrder::from_big(BIG);
    let n = src.len();
    if n == 0 {
        return;
    }
    if takes_natural_path(W, start_bit) {
        let at = (start_bit / 8) as usize;
        pack_natural::<T, W, BIG>(src, &mut dst[at..at + n * W / 8]);
        return;
    }
    let Some(align) = vector_lead(backend, W, n, start_bit) else {
        scalar::pack_nu(src, W as u32, dst, start_bit, order);
        return;
    };

    let (lead, rest) = src.split_at(align);
    scalar::pack_nu(lead, W as u32, dst, start_bit, order);
    let mut at = (start_bit as usize + align * W) / 8;

    let groups = rest.len() / GROUP;
    let (bulk, tail) = rest.split_at(groups * GROUP);
    let bulk_bytes = groups * 4 * W;
    kernel::pack_groups::<T, W, BIG>(backend, bulk, &mut dst[at..at + bulk_bytes]);
    at += bulk_bytes;

    scalar::pack_nu(tail, W as u32, &mut dst[at..], 0, order);
    trace!(
        "pack w={} {:?}: lead {} bulk {} tail {} ({})",
        W,
        order,
        align,
        bulk.len(),
        tail.len(),
        backend.name()
    );
}

fn unpack_width<T: Element, const W: usize, const BIG: bool>(
    backend: Backend,
    src: &[u8],
    start_bit: u32,
    dst: &mut [T],
) {
    let order = BitOrder::from_big(BIG);
    let n = dst.len();
    if n == 0 {
        return;
    }
    if takes_natural_path(W, start_bit) {
        let at = (start_bit / 8) as usize;
        unpack_natural::<T, W, BIG>(&src[at..at + n * W / 8], dst);
        return;
    }
    let Some(align) = vector_lead(backend, W, n, start_bit) else {
        scalar::unpack_nu(src, start_bit, W as u32, dst, order);
        return;
    };

    let (lead, rest) = dst.split_at_mut(align);
    scalar::unpack_nu(src, start_bit, W as u32, lead, order);
    let mut at = (start_bit as usize + align * W) / 8;

    let groups = rest.len() / GROUP;
    let (bulk, tail) = rest.split_at_mut(groups * GROUP);
    let bulk_bytes = groups * 4 * W;
    kernel::unpack_groups::<T, W, BIG>(backend, &src[at..at + bulk_bytes], bulk);
    at += bulk_bytes;

    let tail_len = tail.len();
    scalar::unpack_nu(&src[at..], 0, W as u32, tail, order);
    trace!(
        "unpack w={} {:?}: lead {} bulk {} tail {} ({})",
        W,
        order,
        align,
        groups * GROUP,
        tail_len,
        backend.name()
    );
}

/// Whole-byte elements: passthrough, byte swap, or widening to 16/32 bits.
fn pack_natural<T: Element, const W: usize, const BIG: bool>(src: &[T], dst: &mut [u8]) {
    let order = BitOrder::from_big(BIG);
    let bytes = W / 8;
    for (&value, out) in src.iter().zip(dst.chunks_exact_mut(bytes)) {
        let value = value.to_u32();
        if bytes == 2 {
            out.copy_from_slice(&store_16u(value as u16, order));
        } else {
            let word = store_32u(value, order);
            if BIG {
                out.copy_from_slice(&word[4 - bytes..]);
            } else {
                out.copy_from_slice(&word[..bytes]);
            }
        }
    }
}

fn unpack_natural<T: Element, const W: usize, const BIG: bool>(src: &[u8], dst: &mut [T]) {
    let order = BitOrder::from_big(BIG);
    let bytes = W / 8;
    for (slot, input) in dst.iter_mut().zip(src.chunks_exact(bytes)) {
        let value = if bytes == 2 {
            u32::from(load_16u([input[0], input[1]], order))
        } else {
            let mut word = [0u8; 4];
            if BIG {
                word[4 - bytes..].copy_from_slice(input);
            } else {
                word[..bytes].copy_from_slice(input);
            }
            load_32u(word, order)
        };
        *slot = T::from_u32(value);
    }
}
