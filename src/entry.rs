// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// A live key→value binding
///
/// Slots in both the staging buffer and the bank table hold `Option<Entry>`;
/// `None` is an invalid (free) slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// Lookup key
    pub key: K,

    /// Opaque payload
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}
