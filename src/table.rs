// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bank::BankTable;
use crate::config::Config;
use crate::key::Key;
use crate::staging::StagingBuffer;
use std::collections::VecDeque;

/// A fixed-capacity associative memory
///
/// Lookups, inserts and deletes all complete in a bounded number of steps
/// regardless of fill state. Writes land in a small staging buffer and are
/// relocated into the banked backing table by [`Table::sweep`], one entry per
/// call; see the crate docs for the full execution model.
///
/// A key is authoritative in exactly one place: the staging buffer if present
/// there (most recent truth), else the bank table, else absent. The caller is
/// expected to serialize all operations onto one logical tick stream; there
/// is no interior mutability and no blocking anywhere.
pub struct Table<K, V> {
    pub(crate) staging: StagingBuffer<K, V>,
    pub(crate) banks: BankTable<K, V>,

    /// Tombstones awaiting resolution by a sweep, oldest first
    pub(crate) pending_deletes: VecDeque<K>,
}

impl<K: Key, V> Table<K, V> {
    /// Creates a table with `bank_count * way_count` backing slots behind a
    /// `staging_capacity`-slot write buffer.
    ///
    /// Shorthand for [`Config::open`], which allows overriding the hash seed.
    ///
    /// # Errors
    ///
    /// Fails if the bank count is not a power of two, if any capacity is
    /// zero, or if the key type is too narrow to address `bank_count` banks.
    pub fn new(
        staging_capacity: usize,
        bank_count: usize,
        way_count: usize,
    ) -> crate::Result<Self> {
        Config::new(bank_count, way_count)
            .staging_capacity(staging_capacity)
            .open()
    }

    pub(crate) fn from_parts(staging: StagingBuffer<K, V>, banks: BankTable<K, V>) -> Self {
        Self {
            staging,
            banks,
            pending_deletes: VecDeque::new(),
        }
    }

    /// Returns the value associated with `key`.
    ///
    /// The staging buffer is consulted first, so a write is visible to the
    /// very next lookup even before any sweep has run. `None` is a normal
    /// outcome, not a fault: a resolver typically treats it as "resolution
    /// in progress" and falls back to its own protocol.
    #[must_use]
    pub fn get(&self, key: K) -> Option<&V> {
        self.staging.get(key).or_else(|| self.banks.get(key))
    }

    /// Whether an [`Table::insert`] of a fresh key can currently succeed.
    #[must_use]
    pub fn can_insert(&self) -> bool {
        self.staging.can_insert()
    }

    /// Writes a key→value binding.
    ///
    /// Only touches the staging buffer; the binding migrates into the bank
    /// table through later sweeps. A staged entry for the same key is
    /// replaced, so writes to one key apply in call order.
    ///
    /// Returns `false` iff the staging buffer is full, which is recoverable
    /// by sweeping (or slowing down writes) and retrying.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        // A fresh write supersedes any queued tombstone for the key;
        // resolving such a tombstone later would destroy this value once it
        // reaches the bank table.
        self.pending_deletes.retain(|pending| *pending != key);

        self.staging.insert(key, value)
    }

    /// Removes the binding for `key`.
    ///
    /// Any staged copy is invalidated immediately; a copy that already
    /// reached the bank table is marked with a tombstone and reaped by a
    /// later sweep, so the key may remain visible to [`Table::get`] until
    /// sweeps catch up.
    ///
    /// Always succeeds, whether or not the key is present.
    pub fn remove(&mut self, key: K) -> bool {
        self.staging.remove(key);
        self.pending_deletes.push_back(key);
        true
    }

    /// Count of live entries across the staging buffer and the bank table.
    ///
    /// A key staged over an older bank copy is counted once.
    #[must_use]
    pub fn len(&self) -> usize {
        let staged_only = self
            .staging
            .iter()
            .filter(|entry| self.banks.get(entry.key).is_none())
            .count();

        self.banks.len() + staged_only
    }

    /// Returns `true` if the table holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staging.is_empty() && self.banks.len() == 0
    }

    /// Resets every slot to invalid and drops pending tombstones.
    ///
    /// The hash functions are kept, so a cleared table places keys exactly
    /// where the uncleared one would have.
    pub fn clear(&mut self) {
        self.staging.clear();
        self.banks.clear();
        self.pending_deletes.clear();
    }

    /// Number of banks.
    #[must_use]
    pub fn bank_count(&self) -> usize {
        self.banks.bank_count()
    }

    /// Number of ways.
    #[must_use]
    pub fn way_count(&self) -> usize {
        self.banks.way_count()
    }

    /// Capacity of the staging buffer.
    #[must_use]
    pub fn staging_capacity(&self) -> usize {
        self.staging.capacity()
    }

    #[doc(hidden)]
    #[must_use]
    pub fn bank_index(&self, key: K, way: usize) -> usize {
        self.banks.hashes().bank_of(key, way)
    }

    #[doc(hidden)]
    #[must_use]
    pub fn staging_len(&self) -> usize {
        self.staging.len()
    }

    #[doc(hidden)]
    #[must_use]
    pub fn live_copies(&self, key: K) -> usize {
        let staged = self.staging.iter().filter(|entry| entry.key == key).count();
        let resident = self.banks.iter().filter(|entry| entry.key == key).count();
        staged + resident
    }
}

impl<K: Key, V: std::fmt::Debug> std::fmt::Debug for Table<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();

        for entry in self.staging.iter() {
            map.entry(&entry.key, &entry.value);
        }
        for entry in self.banks.iter() {
            map.entry(&entry.key, &entry.value);
        }

        map.finish()
    }
}
