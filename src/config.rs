// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bank::BankTable;
use crate::error::Error;
use crate::hash::HashFamily;
use crate::key::Key;
use crate::staging::StagingBuffer;
use crate::table::Table;
use rand::{rngs::StdRng, SeedableRng};

const DEFAULT_STAGING_CAPACITY: usize = 4;

// Fixed by default so that two tables built from the same config agree on
// every bank index; override with [`Config::seed`] to vary the spread.
const DEFAULT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Table configuration builder
///
/// ```
/// use hashcam::Config;
///
/// let table = Config::new(64, 4)
///     .staging_capacity(8)
///     .open::<u32, u64>()?;
///
/// assert!(table.can_insert());
/// # Ok::<_, hashcam::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of banks (rows) of the backing table
    ///
    /// Must be a power of two; a bank index is `log2(bank_count)` hash output
    /// bits.
    pub bank_count: usize,

    /// Number of ways (independent hash functions)
    ///
    /// Total capacity is `bank_count * way_count` plus the staging buffer.
    pub way_count: usize,

    /// Capacity of the write staging buffer
    ///
    /// Bounds how many writes can be outstanding before sweeps must catch up,
    /// and thereby the worst-case drain latency of a single write.
    ///
    /// Default: 4.
    pub staging_capacity: usize,

    /// Seed for drawing the hash functions' bit-subset masks
    pub seed: u64,
}

impl Config {
    /// Creates a config for a table with `bank_count * way_count` backing
    /// slots.
    pub fn new(bank_count: usize, way_count: usize) -> Self {
        Self {
            bank_count,
            way_count,
            staging_capacity: DEFAULT_STAGING_CAPACITY,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the staging buffer capacity.
    #[must_use]
    pub fn staging_capacity(mut self, capacity: usize) -> Self {
        self.staging_capacity = capacity;
        self
    }

    /// Sets the hash mask seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the table. All sizes are fixed for the table's lifetime.
    ///
    /// # Errors
    ///
    /// Fails if the bank count is not a power of two, if any capacity is
    /// zero, or if the key type is too narrow to address `bank_count` banks.
    pub fn open<K: Key, V>(self) -> crate::Result<Table<K, V>> {
        if self.bank_count == 0 || !self.bank_count.is_power_of_two() {
            return Err(Error::InvalidBankCount(self.bank_count));
        }
        if self.way_count == 0 {
            return Err(Error::InvalidWayCount(self.way_count));
        }
        if self.staging_capacity == 0 {
            return Err(Error::InvalidStagingCapacity(self.staging_capacity));
        }

        let bank_bits = self.bank_count.trailing_zeros();
        if bank_bits > K::BITS {
            return Err(Error::KeyTooNarrow(bank_bits, K::BITS));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let hashes = HashFamily::generate(self.bank_count, self.way_count, &mut rng);

        log::debug!(
            "opening table: {} banks x {} ways, staging capacity {}",
            self.bank_count,
            self.way_count,
            self.staging_capacity,
        );

        Ok(Table::from_parts(
            StagingBuffer::new(self.staging_capacity),
            BankTable::new(hashes),
        ))
    }
}
