// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A fixed-capacity associative memory engine (a software CAM).
//!
//! ##### About
//!
//! This crate exports a [`Table`] mapping fixed-width unsigned integer keys to
//! opaque values, with lookup, insert and delete all bounded by a fixed number
//! of steps regardless of fill state or recent write traffic. It is meant for
//! the kind of lookup tables that sit on a hot path with a hard step budget:
//! address-resolution caches, MAC tables, session lookup tables.
//!
//! Writes never touch the backing store directly. [`Table::insert`] and
//! [`Table::remove`] only go through a small, fully-associative, recency-ordered
//! staging buffer, so they complete in _O(1)_. A background [`Table::sweep`]
//! step, meant to be called once per processing cycle (idle cycles included),
//! drains the oldest staged entry into a banked, multi-hash backing table.
//! Every key has exactly `W` candidate homes there (one per hash function);
//! when all of them are taken by foreign keys, the sweep displaces one occupant
//! back into the staging buffer to be re-homed later (incremental cuckoo
//! insertion). Deletes are tombstones, resolved opportunistically by sweeps.
//!
//! Because the relocation work is amortized across sweep calls, a reader never
//! observes a partially-moved entry: a key is always fully resolvable from
//! exactly one of the staging buffer or the bank table.
//!
//! Capacity is fixed at construction; there is no resizing.
//!
//! ```
//! use hashcam::Table;
//!
//! let mut table = Table::new(4, 64, 4)?;
//!
//! assert!(table.insert(0xDEAD_u32, 100u64));
//! assert_eq!(Some(&100), table.get(0xDEAD));
//!
//! // drain the staging buffer into the bank table
//! for _ in 0..8 {
//!     table.sweep();
//! }
//! assert_eq!(Some(&100), table.get(0xDEAD));
//!
//! table.remove(0xDEAD);
//! table.sweep();
//! assert_eq!(None, table.get(0xDEAD));
//! # Ok::<_, hashcam::Error>(())
//! ```

#![deny(clippy::all, missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bank;
mod config;
mod entry;
mod error;
mod hash;
mod key;
mod staging;
mod sweep;
mod table;

pub use config::Config;
pub use error::{Error, Result};
pub use key::Key;
pub use table::Table;
