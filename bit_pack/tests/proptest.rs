//! Property-based tests for the pack / unpack kernels

use bit_pack::bits::{read_bits, write_bits};
use bit_pack::element::low_mask;
use bit_pack::{Backend, BitOrder, pack_with, packed_len, scalar, unpack_with};
use proptest::prelude::*;

const GUARD: u8 = 0xa5;

fn order_strategy() -> impl Strategy<Value = BitOrder> {
    prop_oneof![Just(BitOrder::Little), Just(BitOrder::Big)]
}

// (bit width, start bit, order, values that fit the width)
fn case_strategy(max_width: u32, max_len: usize) -> impl Strategy<Value = (u32, u32, BitOrder, Vec<u32>)> {
    (1..=max_width, 0u32..16, order_strategy()).prop_flat_map(move |(w, s, order)| {
        (
            Just(w),
            Just(s),
            Just(order),
            prop::collection::vec(0..=low_mask(w), 0..max_len),
        )
    })
}

fn narrow<T: TryFrom<u32>>(values: &[u32]) -> Vec<T>
where
    T::Error: core::fmt::Debug,
{
    values.iter().map(|&v| T::try_from(v).unwrap()).collect()
}

proptest! {
    // -------------------------------------------------------------
    // 1. Unpacking what was packed returns the source (32-bit elements).
    // -------------------------------------------------------------
    #[test]
    fn prop_roundtrip_u32((w, s, order, values) in case_strategy(32, 1500)) {
        for backend in Backend::available() {
            let mut packed = vec![0u8; packed_len(values.len(), w, s)];
            pack_with(backend, &values, w, &mut packed, s, order);

            let mut restored = vec![0u32; values.len()];
            unpack_with(backend, &packed, s, w, &mut restored, order);
            prop_assert_eq!(&restored, &values, "backend {}", backend.name());
        }
    }

    // -------------------------------------------------------------
    // 2. Same for the 16-bit and 8-bit families.
    // -------------------------------------------------------------
    #[test]
    fn prop_roundtrip_u16((w, s, order, values) in case_strategy(16, 1500)) {
        let values: Vec<u16> = narrow(&values);
        for backend in Backend::available() {
            let mut packed = vec![0u8; packed_len(values.len(), w, s)];
            pack_with(backend, &values, w, &mut packed, s, order);

            let mut restored = vec![0u16; values.len()];
            unpack_with(backend, &packed, s, w, &mut restored, order);
            prop_assert_eq!(&restored, &values, "backend {}", backend.name());
        }
    }

    #[test]
    fn prop_roundtrip_u8((w, s, order, values) in case_strategy(8, 1500)) {
        let values: Vec<u8> = narrow(&values);
        for backend in Backend::available() {
            let mut packed = vec![0u8; packed_len(values.len(), w, s)];
            pack_with(backend, &values, w, &mut packed, s, order);

            let mut restored = vec![0u8; values.len()];
            unpack_with(backend, &packed, s, w, &mut restored, order);
            prop_assert_eq!(&restored, &values, "backend {}", backend.name());
        }
    }

    // -------------------------------------------------------------
    // 3. Exactly ceil((n*w + s)/8) bytes are written, guards survive,
    //    and padding after the last element is zero.
    // -------------------------------------------------------------
    #[test]
    fn prop_exact_byte_count((w, s, order, values) in case_strategy(32, 700)) {
        let needed = packed_len(values.len(), w, s);
        for backend in Backend::available() {
            let mut buf = vec![GUARD; needed + 8];
            pack_with(backend, &values, w, &mut buf[4..4 + needed], s, order);

            prop_assert!(buf[..4].iter().all(|&b| b == GUARD));
            prop_assert!(buf[4 + needed..].iter().all(|&b| b == GUARD));

            let end = s as usize + values.len() * w as usize;
            let pad = needed * 8 - end;
            if !values.is_empty() && pad > 0 {
                prop_assert_eq!(read_bits(&buf[4..], end, pad as u32, order), 0);
            }
        }
    }

    // -------------------------------------------------------------
    // 4. Every vector backend produces the scalar kernel's bytes,
    //    including the merge into a dirty first byte.
    // -------------------------------------------------------------
    #[test]
    fn prop_backends_match_scalar(
        (w, s, order, values) in case_strategy(32, 1500),
        head in any::<[u8; 2]>(),
    ) {
        let needed = packed_len(values.len(), w, s);
        let mut reference = vec![0u8; needed.max(2)];
        reference[..2].copy_from_slice(&head);
        let seeded = reference.clone();
        scalar::pack_nu(&values, w, &mut reference, s, order);

        for backend in Backend::available() {
            let mut dst = seeded.clone();
            pack_with(backend, &values, w, &mut dst, s, order);
            prop_assert_eq!(&dst, &reference, "backend {}", backend.name());
        }
    }

    // -------------------------------------------------------------
    // 5. Bits before the start bit are left alone.
    // -------------------------------------------------------------
    #[test]
    fn prop_merge_preserves_prefix(
        (w, s, order, values) in case_strategy(32, 300),
        head in any::<[u8; 2]>(),
    ) {
        prop_assume!(s > 0 && !values.is_empty());
        let needed = packed_len(values.len(), w, s);
        let mut dst = vec![0u8; needed.max(2)];
        dst[..2].copy_from_slice(&head);
        let before = read_bits(&dst, 0, s, order);

        pack_with(Backend::active(), &values, w, &mut dst, s, order);
        prop_assert_eq!(read_bits(&dst, 0, s, order), before);
    }

    // -------------------------------------------------------------
    // 6. The packed layout matches the bit-by-bit model.
    // -------------------------------------------------------------
    #[test]
    fn prop_matches_bit_model((w, s, order, values) in case_strategy(32, 400)) {
        let needed = packed_len(values.len(), w, s);
        let mut model = vec![0u8; needed];
        for (i, &v) in values.iter().enumerate() {
            write_bits(&mut model, s as usize + i * w as usize, w, v, order);
        }

        let mut packed = vec![0u8; needed];
        pack_with(Backend::active(), &values, w, &mut packed, s, order);
        prop_assert_eq!(packed, model);
    }
}
