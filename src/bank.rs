// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::entry::Entry;
use crate::hash::HashFamily;
use crate::key::Key;

/// Result of probing one candidate home of a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WayProbe {
    /// Bank index produced by this way's hash function
    pub bank: usize,

    /// The slot holds exactly the probed key
    pub found: bool,

    /// The slot holds some entry
    pub occupied: bool,
}

/// Placement decision for a key whose candidate homes have been probed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Way to write
    pub way: usize,

    /// The chosen slot holds a foreign key that must be displaced first
    pub collision: bool,
}

/// Picks the slot a probed key should be written to.
///
/// Priority order: the way already holding the key (update in place), else the
/// lowest-indexed empty way, else way 0, whose occupant then has to be
/// displaced back into the staging buffer.
pub fn pick_evict(probe: &[WayProbe]) -> Placement {
    if let Some(way) = probe.iter().position(|way| way.found) {
        return Placement {
            way,
            collision: false,
        };
    }

    if let Some(way) = probe.iter().position(|way| !way.occupied) {
        return Placement {
            way,
            collision: false,
        };
    }

    Placement {
        way: 0,
        collision: true,
    }
}

/// The backing store: `B` banks of `W` ways each
///
/// An entry for key `k` may only ever sit at `(hash_w(k), w)` for the way `w`
/// that produced its bank index, so any lookup touches exactly `W` slots no
/// matter how full the table is. When all `W` candidate homes hold foreign
/// keys the table behaves like a bounded cuckoo table: one victim is chosen
/// and pushed out to be re-homed on a later sweep.
pub struct BankTable<K, V> {
    hashes: HashFamily<K>,

    /// Bank-major: the slot for `(bank, way)` lives at `bank * W + way`
    slots: Box<[Option<Entry<K, V>>]>,

    way_count: usize,
}

impl<K: Key, V> BankTable<K, V> {
    /// Creates an empty table shaped by the given hash family.
    pub fn new(hashes: HashFamily<K>) -> Self {
        let way_count = hashes.way_count();

        let mut slots = Vec::new();
        slots.resize_with(hashes.bank_count() * way_count, || None);

        Self {
            hashes,
            slots: slots.into_boxed_slice(),
            way_count,
        }
    }

    pub fn hashes(&self) -> &HashFamily<K> {
        &self.hashes
    }

    pub fn way_count(&self) -> usize {
        self.way_count
    }

    pub fn bank_count(&self) -> usize {
        self.hashes.bank_count()
    }

    /// Count of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Reads the entry at one bank/way slot.
    #[allow(clippy::expect_used)]
    pub fn slot(&self, bank: usize, way: usize) -> Option<&Entry<K, V>> {
        self.slots
            .get(self.slot_index(bank, way))
            .expect("bank and way should be in range")
            .as_ref()
    }

    /// Probes all `W` candidate homes of `key` without side effects.
    pub fn probe(&self, key: K) -> Vec<WayProbe> {
        (0..self.way_count)
            .map(|way| {
                let bank = self.hashes.bank_of(key, way);
                let slot = self.slot(bank, way);

                WayProbe {
                    bank,
                    found: slot.is_some_and(|entry| entry.key == key),
                    occupied: slot.is_some(),
                }
            })
            .collect()
    }

    /// Returns the value stored for `key`, if one of its candidate homes
    /// holds it.
    pub fn get(&self, key: K) -> Option<&V> {
        (0..self.way_count).find_map(|way| {
            let bank = self.hashes.bank_of(key, way);

            self.slot(bank, way)
                .filter(|entry| entry.key == key)
                .map(|entry| &entry.value)
        })
    }

    /// Unconditionally writes one bank/way slot.
    pub fn place(&mut self, bank: usize, way: usize, entry: Option<Entry<K, V>>) {
        *self.slot_mut(bank, way) = entry;
    }

    /// Removes and returns the entry at one bank/way slot.
    pub fn take(&mut self, bank: usize, way: usize) -> Option<Entry<K, V>> {
        self.slot_mut(bank, way).take()
    }

    /// Invalidates all slots. The hash family is untouched.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Iterates over occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.slots.iter().flatten()
    }

    fn slot_index(&self, bank: usize, way: usize) -> usize {
        debug_assert!(way < self.way_count);
        bank * self.way_count + way
    }

    #[allow(clippy::expect_used)]
    fn slot_mut(&mut self, bank: usize, way: usize) -> &mut Option<Entry<K, V>> {
        let idx = self.slot_index(bank, way);
        self.slots.get_mut(idx).expect("bank and way should be in range")
    }
}
