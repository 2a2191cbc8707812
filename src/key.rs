// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// A fixed-width unsigned integer key
///
/// Bank indices are derived from structural hashes over the key's bits
/// (subset-XOR, see [`crate::Config`]), so keys are restricted to the
/// primitive unsigned integer types.
pub trait Key: Copy + Eq + std::fmt::Debug {
    /// Width of the key type in bits
    const BITS: u32;

    /// The all-zero key
    const ZERO: Self;

    /// Returns the key with bit `idx` additionally set
    #[must_use]
    fn with_bit(self, idx: u32) -> Self;

    /// XOR reduction of the bits selected by `mask`
    #[must_use]
    fn masked_parity(self, mask: Self) -> bool;
}

macro_rules! impl_key {
    ($($int:ty),+) => {
        $(
            impl Key for $int {
                const BITS: u32 = <$int>::BITS;
                const ZERO: Self = 0;

                fn with_bit(self, idx: u32) -> Self {
                    self | (1 << idx)
                }

                fn masked_parity(self, mask: Self) -> bool {
                    (self & mask).count_ones() & 1 == 1
                }
            }
        )+
    };
}

impl_key!(u8, u16, u32, u64, u128);
