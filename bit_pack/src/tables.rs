//! Constant tables driving the group kernels.
//!
//! A group is 32 elements. At width `w` it packs into exactly `w` 32-bit
//! words, so every group starts and ends on a byte boundary once the
//! stream itself is byte aligned.
//!
//! Pack tables describe output word `j` as an OR over planes: plane `p`
//! contributes `(v[index] >> shr) << shl`. Unpack tables describe element
//! `e` as a combination of words `word[e]` and `word[e] + 1`. In both, a
//! shift of [`ZERO_SHIFT`] yields zero, matching the behaviour of variable
//! vector shifts, so absent contributions need no special casing.
//!
//! Shift and index tables are indexed `[order]` with 0 for little and 1 for
//! big order, then by bit width.

pub const GROUP: usize = 32;

/// Groups per unrolled kernel iteration.
pub const SUPER_GROUP: usize = 4;

pub const NO_ALIGN: u8 = u8::MAX;

pub const ZERO_SHIFT: u8 = 32;

/// `ALIGN[w][s]` is the smallest element count `a` with `(s + a * w) % 8 == 0`.
///
/// [`NO_ALIGN`] when no count reaches a byte boundary.
pub static ALIGN: [[u8; 8]; 33] = build_align();

const fn build_align() -> [[u8; 8]; 33] {
    let mut table = [[NO_ALIGN; 8]; 33];
    let mut w = 1;
    while w <= 32 {
        let mut s = 0;
        while s < 8 {
            let mut a = 0;
            while a < 8 {
                if (s + a * w) % 8 == 0 {
                    table[w][s] = a as u8;
                    break;
                }
                a += 1;
            }
            s += 1;
        }
        w += 1;
    }
    table
}

#[inline(always)]
const fn first_element(word: usize, w: usize) -> usize {
    32 * word / w
}

#[inline(always)]
const fn last_element(word: usize, w: usize) -> usize {
    (32 * word + 31) / w
}

/// Most elements touching any single output word at width `w`.
pub const fn pack_planes(w: usize) -> usize {
    let mut most = 0;
    let mut j = 0;
    while j < w {
        let n = last_element(j, w) - first_element(j, w) + 1;
        if n > most {
            most = n;
        }
        j += 1;
    }
    most
}

/// Output words computed per plane, rounded up to whole 8-lane vectors.
pub const fn pack_lanes(w: usize) -> usize {
    w.div_ceil(8) * 8
}

const fn pack_entries() -> usize {
    let mut total = 0;
    let mut w = 1;
    while w <= 32 {
        total += pack_planes(w) * pack_lanes(w);
        w += 1;
    }
    total
}

pub const PACK_ENTRIES: usize = pack_entries();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackLayout {
    pub planes: usize,
    pub lanes: usize,
    pub offset: usize,
}

impl PackLayout {
    /// Position of `(plane, word)` in the flat entry arrays.
    #[inline(always)]
    pub const fn entry(&self, plane: usize, word: usize) -> usize {
        self.offset + plane * self.lanes + word
    }
}

pub struct PackTables {
    pub layout: [PackLayout; 33],
    pub index: [u8; PACK_ENTRIES],
    pub shr: [[u8; PACK_ENTRIES]; 2],
    pub shl: [[u8; PACK_ENTRIES]; 2],
}

pub static PACK: PackTables = build_pack();

const fn build_pack() -> PackTables {
    let mut t = PackTables {
        layout: [PackLayout {
            planes: 0,
            lanes: 0,
            offset: 0,
        }; 33],
        index: [0; PACK_ENTRIES],
        shr: [[0; PACK_ENTRIES]; 2],
        shl: [[ZERO_SHIFT; PACK_ENTRIES]; 2],
    };
    let mut offset = 0;
    let mut w = 1;
    while w <= 32 {
        let layout = PackLayout {
            planes: pack_planes(w),
            lanes: pack_lanes(w),
            offset,
        };
        t.layout[w] = layout;
        let mut p = 0;
        while p < layout.planes {
            let mut j = 0;
            while j < w {
                let e = first_element(j, w) + p;
                if e <= last_element(j, w) {
                    let k = layout.entry(p, j);
                    let start = e * w;
                    let word_start = 32 * j;
                    t.index[k] = e as u8;

                    if start >= word_start {
                        t.shr[0][k] = 0;
                        t.shl[0][k] = (start - word_start) as u8;
                    } else {
                        t.shr[0][k] = (word_start - start) as u8;
                        t.shl[0][k] = 0;
                    }

                    // Stream bit where the element ends, counted from the
                    // word's most significant bit.
                    let end = start + w - word_start;
                    if end <= 32 {
                        t.shr[1][k] = 0;
                        t.shl[1][k] = (32 - end) as u8;
                    } else {
                        t.shr[1][k] = (end - 32) as u8;
                        t.shl[1][k] = 0;
                    }
                }
                j += 1;
            }
            p += 1;
        }
        offset += layout.planes * layout.lanes;
        w += 1;
    }
    t
}

/// Per-element extraction recipe for one width and order.
///
/// `value = ((W[word] >> shr0) << shl0 | (W[word + 1] >> shr1) << shl1) & mask`
/// over the group's words `W`, padded with one zero word.
#[derive(Debug, Clone, Copy)]
pub struct UnpackPlan {
    pub word: [u8; GROUP],
    pub shr0: [u8; GROUP],
    pub shl0: [u8; GROUP],
    pub shr1: [u8; GROUP],
    pub shl1: [u8; GROUP],
}

pub static UNPACK: [[UnpackPlan; 33]; 2] = build_unpack();

const fn build_unpack() -> [[UnpackPlan; 33]; 2] {
    let empty = UnpackPlan {
        word: [0; GROUP],
        shr0: [0; GROUP],
        shl0: [0; GROUP],
        shr1: [ZERO_SHIFT; GROUP],
        shl1: [0; GROUP],
    };
    let mut t = [[empty; 33]; 2];
    let mut w = 1;
    while w <= 32 {
        let mut e = 0;
        while e < GROUP {
            let start = e * w;
            let word = start / 32;
            let off = start % 32;

            let le = &mut t[0][w];
            le.word[e] = word as u8;
            le.shr0[e] = off as u8;
            le.shl0[e] = 0;
            le.shr1[e] = 0;
            le.shl1[e] = (32 - off) as u8;

            let be = &mut t[1][w];
            be.word[e] = word as u8;
            let end = off + w;
            if end <= 32 {
                be.shr0[e] = (32 - end) as u8;
                be.shl0[e] = 0;
                be.shr1[e] = ZERO_SHIFT;
                be.shl1[e] = 0;
            } else {
                be.shr0[e] = 0;
                be.shl0[e] = (end - 32) as u8;
                be.shr1[e] = (64 - end) as u8;
                be.shl1[e] = 0;
            }
            e += 1;
        }
        w += 1;
    }
    t
}

/// `value >> shift`, zero once the shift reaches the word size.
#[inline(always)]
pub const fn shr(value: u32, shift: u8) -> u32 {
    if shift >= 32 { 0 } else { value >> shift }
}

/// `value << shift`, zero once the shift reaches the word size.
#[inline(always)]
pub const fn shl(value: u32, shift: u8) -> u32 {
    if shift >= 32 { 0 } else { value << shift }
}
