use crate::element::{BitOrder, Element, low_mask};
use crate::swap::{load_32u, store_32u};
use crate::tables::{GROUP, PACK, UNPACK, shl, shr};

pub(super) fn pack_groups<T: Element, const W: usize, const BIG: bool>(src: &[T], dst: &mut [u8]) {
    for (group, out) in src.chunks_exact(GROUP).zip(dst.chunks_exact_mut(4 * W)) {
        let mut values = [0u32; GROUP];
        for (slot, &value) in values.iter_mut().zip(group) {
            *slot = value.to_u32();
        }
        pack_group::<W, BIG>(&values, out);
    }
}

#[inline(always)]
fn pack_group<const W: usize, const BIG: bool>(values: &[u32; GROUP], out: &mut [u8]) {
    let layout = PACK.layout[W];
    let shifts = BIG as usize;
    let mut words = [0u32; GROUP];
    for plane in 0..layout.planes {
        for (j, word) in words[..W].iter_mut().enumerate() {
            let k = layout.entry(plane, j);
            let value = values[PACK.index[k] as usize];
            *word |= shl(shr(value, PACK.shr[shifts][k]), PACK.shl[shifts][k]);
        }
    }
    let order = BitOrder::from_big(BIG);
    for (bytes, &word) in out.chunks_exact_mut(4).zip(&words[..W]) {
        bytes.copy_from_slice(&store_32u(word, order));
    }
}

pub(super) fn unpack_groups<T: Element, const W: usize, const BIG: bool>(src: &[u8], dst: &mut [T]) {
    for (input, group) in src.chunks_exact(4 * W).zip(dst.chunks_exact_mut(GROUP)) {
        unpack_group::<T, W, BIG>(input, group);
    }
}

#[inline(always)]
fn unpack_group<T: Element, const W: usize, const BIG: bool>(input: &[u8], out: &mut [T]) {
    let order = BitOrder::from_big(BIG);
    // One spare zero word so element 31 can always read `word + 1`.
    let mut words = [0u32; GROUP + 1];
    for (word, bytes) in words.iter_mut().zip(input.chunks_exact(4)) {
        *word = load_32u([bytes[0], bytes[1], bytes[2], bytes[3]], order);
    }

    let plan = &UNPACK[BIG as usize][W];
    let mask = low_mask(W as u32);
    for (e, slot) in out.iter_mut().enumerate() {
        let j = plan.word[e] as usize;
        let lo = shl(shr(words[j], plan.shr0[e]), plan.shl0[e]);
        let hi = shl(shr(words[j + 1], plan.shr1[e]), plan.shl1[e]);
        *slot = T::from_u32((lo | hi) & mask);
    }
}
