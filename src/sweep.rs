// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::bank::pick_evict;
use crate::entry::Entry;
use crate::key::Key;
use crate::table::Table;
use log::trace;

impl<K: Key, V> Table<K, V> {
    /// Performs one step of background relocation.
    ///
    /// Exactly one of the following happens per call:
    ///
    /// 1. The oldest staged entry is drained and placed into the bank table.
    ///    If all of its candidate homes hold foreign keys, the occupant of
    ///    way 0 is displaced back into the staging buffer to be re-homed by a
    ///    later sweep (its other `W-1` candidate homes are unaffected).
    /// 2. If nothing drained and a tombstone is pending, it is resolved
    ///    against the bank table.
    /// 3. Otherwise the staging buffer compacts so older entries keep moving
    ///    toward the drain slot.
    ///
    /// Callers must invoke this once per processing cycle (idle cycles
    /// included) to guarantee forward progress.
    ///
    /// Returns `true` iff the bank table was written this call (a relocation
    /// or a deletion took effect).
    pub fn sweep(&mut self) -> bool {
        if let Some(entry) = self.staging.sweep_out() {
            return self.relocate(entry);
        }

        if let Some(key) = self.pending_deletes.pop_front() {
            return self.resolve_delete(key);
        }

        false
    }

    /// Places one drained entry at the slot [`pick_evict`] chooses for it.
    fn relocate(&mut self, entry: Entry<K, V>) -> bool {
        let probe = self.banks.probe(entry.key);
        let placement = pick_evict(&probe);

        #[allow(clippy::expect_used)]
        let target = probe.get(placement.way).expect("way should be in range");

        if placement.collision {
            #[allow(clippy::expect_used)]
            let displaced = self
                .banks
                .take(target.bank, placement.way)
                .expect("collision slot should be occupied");

            trace!(
                "sweep: {:?} displaces {:?} at bank={} way={}",
                entry.key,
                displaced.key,
                target.bank,
                placement.way,
            );

            if self.staging.get(displaced.key).is_some() {
                // A newer write for the displaced key is already staged;
                // restaging the old copy would clobber it.
                trace!("sweep: dropping stale copy of {:?}", displaced.key);
            } else if self.pending_deletes.contains(&displaced.key) {
                // The displaced key has a queued tombstone; restaging it
                // would resurrect it after the tombstone resolves.
                trace!("sweep: dropping removed key {:?}", displaced.key);
            } else {
                // The drain above freed one staging slot, so the victim
                // always fits.
                let restaged =
                    self.staging
                        .swap(displaced.key, displaced.key, displaced.value, true);
                debug_assert!(restaged, "staging buffer should have room for the victim");
            }
        } else {
            trace!(
                "sweep: placing {:?} at bank={} way={}",
                entry.key,
                target.bank,
                placement.way,
            );
        }

        self.banks.place(target.bank, placement.way, Some(entry));
        true
    }

    /// Resolves one tombstone, matching on key equality only.
    fn resolve_delete(&mut self, key: K) -> bool {
        let probe = self.banks.probe(key);

        let Some((way, target)) = probe.iter().enumerate().find(|(_, way)| way.found) else {
            trace!("sweep: tombstone for absent key {key:?}");
            return false;
        };

        trace!("sweep: deleting {:?} from bank={} way={}", key, target.bank, way);
        self.banks.place(target.bank, way, None);
        true
    }
}
