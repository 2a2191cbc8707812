// Copyright (c) 2025-present, hashcam
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur when constructing a table
///
/// All steady-state outcomes (lookup miss, staging buffer full) are
/// communicated through return values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bank count is zero or not a power of two
    InvalidBankCount(usize),

    /// Way count is zero
    InvalidWayCount(usize),

    /// Staging buffer capacity is zero
    InvalidStagingCapacity(usize),

    /// The key type has fewer bits than a bank index needs (needed, available)
    KeyTooNarrow(u32, u32),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashcamError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
