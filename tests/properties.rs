mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest::sample::subsequence;

use shamir_gf256::field::{div, mult};
use shamir_gf256::{Gf256, combine, combine_tagged, interpolate, split_tagged_with_rng, split_with_rng};

use common::seeded;

/// `(shares, threshold)` with `2 <= threshold <= shares <= 20`.
fn params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..=20).prop_flat_map(|n| (Just(n), 2usize..=n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn threshold_subset_recovers_secret(
        secret in proptest::collection::vec(any::<u8>(), 1..128),
        (n, t) in params(),
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let shares = split_with_rng(&secret, n, t, &mut seeded(seed)).unwrap();
        prop_assert_eq!(shares.len(), n);

        // rotate the key list by a random amount before taking t of them
        let mut keys: Vec<u8> = shares.keys().copied().collect();
        keys.rotate_left(pick.index(n));
        let parts: BTreeMap<u8, Vec<u8>> = keys[..t].iter().map(|x| (*x, shares[x].clone())).collect();

        prop_assert_eq!(combine(&parts).unwrap(), secret);
    }

    #[test]
    fn tagged_subsequence_recovers_secret(
        secret in proptest::collection::vec(any::<u8>(), 1..64),
        seed in any::<u64>(),
        indices in subsequence((0..8usize).collect::<Vec<_>>(), 3..=8),
    ) {
        let shares = split_tagged_with_rng(&secret, 8, 3, &mut seeded(seed)).unwrap();
        let picked: Vec<&Vec<u8>> = indices.iter().map(|&i| &shares[i]).collect();

        prop_assert_eq!(combine_tagged(&picked).unwrap(), secret);
    }

    #[test]
    fn coordinates_are_distinct_and_nonzero((n, t) in params(), seed in any::<u64>()) {
        let shares = split_with_rng(b"x", n, t, &mut seeded(seed)).unwrap();

        prop_assert!(!shares.contains_key(&0));
        prop_assert_eq!(shares.len(), n);
    }

    #[test]
    fn division_inverts_multiplication(a in any::<u8>(), b in 1u8..=255) {
        prop_assert_eq!(div(mult(a, b), b), a);
        prop_assert_eq!(mult(div(a, b), b), a);
    }

    #[test]
    fn interpolation_passes_through_samples(
        ys in proptest::collection::vec(any::<u8>(), 2..10),
    ) {
        let samples: Vec<(Gf256, Gf256)> = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| (Gf256::new(i as u8 + 1), Gf256::new(y)))
            .collect();

        for &(x, y) in &samples {
            prop_assert_eq!(interpolate(&samples, x), y);
        }
    }
}
