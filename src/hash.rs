// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::key::Key;
use rand::{rngs::StdRng, seq::SliceRandom};

/// A family of `W` independent hash functions mapping keys to bank indices
///
/// Each output bit of each function is the XOR reduction of a random subset of
/// about half of the key's bits. Correlated keys (sequential addresses, shared
/// prefixes) are thereby spread across banks and ways, so pathological
/// collision chains are rare.
///
/// The subsets are drawn once from a seeded PRNG and stay fixed for the
/// table's lifetime: a key's candidate banks never change, not even across
/// [`crate::Table::clear`].
pub struct HashFamily<K> {
    /// `masks[way][bit]` selects the key bits feeding output bit `bit`
    masks: Vec<Vec<K>>,

    /// log2 of the bank count
    bank_bits: u32,
}

impl<K: Key> HashFamily<K> {
    /// Draws `way_count` independent functions over `log2(bank_count)` output
    /// bits.
    ///
    /// `bank_count` must be a power of two and `log2(bank_count)` must not
    /// exceed the key width; the caller validates both.
    pub fn generate(bank_count: usize, way_count: usize, rng: &mut StdRng) -> Self {
        debug_assert!(bank_count.is_power_of_two());

        let bank_bits = bank_count.trailing_zeros();
        debug_assert!(bank_bits <= K::BITS);

        let mut positions = (0..K::BITS).collect::<Vec<_>>();

        let masks = (0..way_count)
            .map(|_| {
                (0..bank_bits)
                    .map(|_| {
                        positions.shuffle(rng);

                        let mut mask = K::ZERO;
                        for &idx in positions.iter().take((K::BITS / 2) as usize) {
                            mask = mask.with_bit(idx);
                        }
                        mask
                    })
                    .collect()
            })
            .collect();

        Self { masks, bank_bits }
    }

    /// Bank index of `key` under hash function `way`
    pub fn bank_of(&self, key: K, way: usize) -> usize {
        let mut bank = 0;

        #[allow(clippy::expect_used)]
        let masks = self.masks.get(way).expect("way should be in range");

        for (bit, &mask) in masks.iter().enumerate() {
            if key.masked_parity(mask) {
                bank |= 1 << bit;
            }
        }

        bank
    }

    pub fn bank_count(&self) -> usize {
        1 << self.bank_bits
    }

    pub fn way_count(&self) -> usize {
        self.masks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use test_log::test;

    #[test]
    fn hash_in_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let family = HashFamily::<u32>::generate(64, 3, &mut rng);

        for key in 0..10_000u32 {
            for way in 0..3 {
                assert!(family.bank_of(key, way) < 64);
            }
        }
    }

    #[test]
    fn hash_deterministic() {
        let family_a = HashFamily::<u64>::generate(256, 4, &mut StdRng::seed_from_u64(42));
        let family_b = HashFamily::<u64>::generate(256, 4, &mut StdRng::seed_from_u64(42));

        for key in [0u64, 1, 0xFFFF, u64::MAX, 0xDEAD_BEEF] {
            for way in 0..4 {
                assert_eq!(family_a.bank_of(key, way), family_b.bank_of(key, way));
            }
        }
    }

    #[test]
    fn hash_ways_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        let family = HashFamily::<u32>::generate(64, 2, &mut rng);

        // the two ways must disagree on at least one key, otherwise a key
        // would not really have two candidate homes
        assert!((0..1_000u32).any(|key| family.bank_of(key, 0) != family.bank_of(key, 1)));
    }

    #[test]
    fn hash_spreads_sequential_keys() {
        let mut rng = StdRng::seed_from_u64(99);
        let family = HashFamily::<u16>::generate(16, 1, &mut rng);

        let mut seen = std::collections::HashSet::new();
        for key in 0..4096u16 {
            seen.insert(family.bank_of(key, 0));
        }

        // sequential keys must not collapse onto one or two banks
        assert!(seen.len() >= 4, "only {} distinct banks", seen.len());
    }

    #[test]
    fn hash_single_bank_degenerates_to_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let family = HashFamily::<u8>::generate(1, 2, &mut rng);

        assert_eq!(0, family.bank_of(0xAB, 0));
        assert_eq!(0, family.bank_of(0xAB, 1));
        assert_eq!(1, family.bank_count());
    }
}
