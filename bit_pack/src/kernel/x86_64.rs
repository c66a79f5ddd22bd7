//! AVX2 group kernels.
//!
//! Eight output words (or eight elements) per vector: lane indices come
//! from the tables, `vpgatherdd` fetches the contributing values,
//! `vpsrlvd`/`vpsllvd` place them, and `vpshufb` reverses bytes for big
//! order. Variable shifts of 32 or more produce zero, which is what the
//! tables rely on for absent contributions.
//!
//! # Safety
//!
//! Every function here requires AVX2. The dispatcher only selects this
//! backend after the CPU reported support.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use crate::element::{Element, low_mask};
use crate::tables::{GROUP, PACK, SUPER_GROUP, UNPACK};

/// Eight table bytes widened to eight 32-bit lanes.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load_u8x8(ptr: *const u8) -> __m256i {
    _mm256_cvtepu8_epi32(_mm_loadl_epi64(ptr.cast::<__m128i>()))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn bswap_32x8(v: __m256i) -> __m256i {
    let mask = _mm256_setr_epi8(
        3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12, //
        3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12,
    );
    _mm256_shuffle_epi8(v, mask)
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn pack_groups<T: Element, const W: usize, const BIG: bool>(
    src: &[T],
    dst: &mut [u8],
) {
    let group_bytes = 4 * W;
    let mut blocks = src.chunks_exact(GROUP * SUPER_GROUP);
    let mut outs = dst.chunks_exact_mut(group_bytes * SUPER_GROUP);
    for (block, out) in (&mut blocks).zip(&mut outs) {
        for (group, out) in block.chunks_exact(GROUP).zip(out.chunks_exact_mut(group_bytes)) {
            pack_group::<T, W, BIG>(group, out);
        }
    }
    let rest = blocks.remainder();
    for (group, out) in rest
        .chunks_exact(GROUP)
        .zip(outs.into_remainder().chunks_exact_mut(group_bytes))
    {
        pack_group::<T, W, BIG>(group, out);
    }
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pack_group<T: Element, const W: usize, const BIG: bool>(group: &[T], out: &mut [u8]) {
    let mut values = [0u32; GROUP];
    for (slot, &value) in values.iter_mut().zip(group) {
        *slot = value.to_u32();
    }

    let layout = PACK.layout[W];
    let shifts = BIG as usize;
    let index = PACK.index.as_ptr();
    let shr = PACK.shr[shifts].as_ptr();
    let shl = PACK.shl[shifts].as_ptr();
    let base = values.as_ptr().cast::<i32>();

    let mut words = [0u32; GROUP];
    let mut lane = 0;
    while lane < layout.lanes {
        let mut acc = _mm256_setzero_si256();
        for plane in 0..layout.planes {
            let k = layout.entry(plane, lane);
            let gathered = _mm256_i32gather_epi32::<4>(base, load_u8x8(index.add(k)));
            let placed = _mm256_sllv_epi32(
                _mm256_srlv_epi32(gathered, load_u8x8(shr.add(k))),
                load_u8x8(shl.add(k)),
            );
            acc = _mm256_or_si256(acc, placed);
        }
        if BIG {
            acc = bswap_32x8(acc);
        }
        _mm256_storeu_si256(words.as_mut_ptr().add(lane).cast::<__m256i>(), acc);
        lane += 8;
    }

    out.copy_from_slice(&bytemuck::cast_slice::<u32, u8>(&words)[..4 * W]);
}

#[target_feature(enable = "avx2")]
pub(super) unsafe fn unpack_groups<T: Element, const W: usize, const BIG: bool>(
    src: &[u8],
    dst: &mut [T],
) {
    let group_bytes = 4 * W;
    let mut blocks = src.chunks_exact(group_bytes * SUPER_GROUP);
    let mut outs = dst.chunks_exact_mut(GROUP * SUPER_GROUP);
    for (block, out) in (&mut blocks).zip(&mut outs) {
        for (input, group) in block.chunks_exact(group_bytes).zip(out.chunks_exact_mut(GROUP)) {
            unpack_group::<T, W, BIG>(input, group);
        }
    }
    let rest = blocks.remainder();
    for (input, group) in rest
        .chunks_exact(group_bytes)
        .zip(outs.into_remainder().chunks_exact_mut(GROUP))
    {
        unpack_group::<T, W, BIG>(input, group);
    }
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn unpack_group<T: Element, const W: usize, const BIG: bool>(input: &[u8], out: &mut [T]) {
    // One spare zero word so element 31 can always gather `word + 1`.
    let mut words = [0u32; GROUP + 1];
    bytemuck::cast_slice_mut::<u32, u8>(&mut words[..W]).copy_from_slice(input);

    let plan = &UNPACK[BIG as usize][W];
    let mask = _mm256_set1_epi32(low_mask(W as u32) as i32);
    let one = _mm256_set1_epi32(1);
    let base = words.as_ptr().cast::<i32>();

    let mut values = [0u32; GROUP];
    let mut e = 0;
    while e < GROUP {
        let j0 = load_u8x8(plan.word.as_ptr().add(e));
        let mut w0 = _mm256_i32gather_epi32::<4>(base, j0);
        let mut w1 = _mm256_i32gather_epi32::<4>(base, _mm256_add_epi32(j0, one));
        if BIG {
            w0 = bswap_32x8(w0);
            w1 = bswap_32x8(w1);
        }
        let lo = _mm256_sllv_epi32(
            _mm256_srlv_epi32(w0, load_u8x8(plan.shr0.as_ptr().add(e))),
            load_u8x8(plan.shl0.as_ptr().add(e)),
        );
        let hi = _mm256_sllv_epi32(
            _mm256_srlv_epi32(w1, load_u8x8(plan.shr1.as_ptr().add(e))),
            load_u8x8(plan.shl1.as_ptr().add(e)),
        );
        let v = _mm256_and_si256(_mm256_or_si256(lo, hi), mask);
        _mm256_storeu_si256(values.as_mut_ptr().add(e).cast::<__m256i>(), v);
        e += 8;
    }

    for (slot, &value) in out.iter_mut().zip(&values) {
        *slot = T::from_u32(value);
    }
}
