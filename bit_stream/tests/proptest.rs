//! Property-based tests for PackedStream

use bit_stream::{BitOrder, PackedStream};
use proptest::prelude::*;

fn order_strategy() -> impl Strategy<Value = BitOrder> {
    prop_oneof![Just(BitOrder::Little), Just(BitOrder::Big)]
}

fn mask(n: usize) -> u32 {
    if n == 32 { u32::MAX } else { (1u32 << n) - 1 }
}

fn build_in_batches<const N: usize>(values: &[u32], cuts: &[usize], order: BitOrder) -> PackedStream<N> {
    let mut stream = PackedStream::<N>::new(order).unwrap();
    let mut at = 0;
    for &cut in cuts {
        let end = (at + cut).min(values.len());
        stream.extend_from_slice(&values[at..end]).unwrap();
        at = end;
    }
    stream.extend_from_slice(&values[at..]).unwrap();
    stream
}

fn check_batches<const N: usize>(raw: &[u32], cuts: &[usize], order: BitOrder) -> Result<(), TestCaseError> {
    let values: Vec<u32> = raw.iter().map(|v| v & mask(N)).collect();
    let batched = build_in_batches::<N>(&values, cuts, order);

    let mut single = PackedStream::<N>::new(order).unwrap();
    single.extend_from_slice(&values).unwrap();

    prop_assert_eq!(batched.as_bytes(), single.as_bytes());
    prop_assert_eq!(batched.to_vec(), values.clone());
    for (i, &v) in values.iter().enumerate() {
        prop_assert_eq!(batched.get(i), Some(v));
    }
    Ok(())
}

proptest! {
    // -------------------------------------------------------------
    // 1. Appending in batches produces the bytes of one big append.
    // -------------------------------------------------------------
    #[test]
    fn prop_batches_match_single_append(
        raw in prop::collection::vec(any::<u32>(), 0..600),
        cuts in prop::collection::vec(0usize..80, 0..12),
        order in order_strategy(),
    ) {
        check_batches::<1>(&raw, &cuts, order)?;
        check_batches::<3>(&raw, &cuts, order)?;
        check_batches::<9>(&raw, &cuts, order)?;
        check_batches::<13>(&raw, &cuts, order)?;
        check_batches::<24>(&raw, &cuts, order)?;
        check_batches::<31>(&raw, &cuts, order)?;
    }

    // -------------------------------------------------------------
    // 2. set() touches only its own slot.
    // -------------------------------------------------------------
    #[test]
    fn prop_set_is_local(
        values in prop::collection::vec(0u32..2048, 1..300),
        index in any::<prop::sample::Index>(),
        new_value in 0u32..2048,
        order in order_strategy(),
    ) {
        let mut stream = PackedStream::<11>::new(order).unwrap();
        stream.extend_from_slice(&values).unwrap();

        let idx = index.index(values.len());
        stream.set(idx, new_value).unwrap();

        let mut expected = values.clone();
        expected[idx] = new_value;
        prop_assert_eq!(stream.to_vec(), expected);
    }

    // -------------------------------------------------------------
    // 3. Serialized streams decode to the same stream.
    // -------------------------------------------------------------
    #[test]
    fn prop_bytes_roundtrip(
        values in prop::collection::vec(0u32..(1 << 19), 0..500),
        order in order_strategy(),
    ) {
        let mut stream = PackedStream::<19>::new(order).unwrap();
        stream.extend_from_slice(&values).unwrap();

        let restored = PackedStream::<19>::from_bytes(&stream.to_bytes()).unwrap();
        prop_assert_eq!(restored.order(), order);
        prop_assert_eq!(restored.iter().collect::<Vec<_>>(), values);
    }
}
