//! Error types for list operations.

use core::fmt;

use crate::Full;

/// Broad classification of list failures.
///
/// Lets callers that handle several failure types branch on a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A new block could not be allocated.
    NoMemory,
    /// An index was outside `0..len`.
    BadIndex,
    /// The list's internal structure is inconsistent.
    ///
    /// Never returned as a value; reaching this state panics.
    DataError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NoMemory => "no memory",
            ErrorCode::BadIndex => "bad index",
            ErrorCode::DataError => "data error",
        };
        f.write_str(s)
    }
}

/// Index outside the list's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The rejected index.
    pub index: usize,
    /// Length of the list at the time of the call.
    pub len: usize,
}

impl OutOfRange {
    /// Returns [`ErrorCode::BadIndex`].
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::BadIndex
    }
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index {} out of range for BList of length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for OutOfRange {}

impl<T> Full<T> {
    /// Returns [`ErrorCode::NoMemory`].
    #[inline]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::NoMemory
    }
}
