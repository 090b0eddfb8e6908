//! Error type shared by the bit vector and the byte-buffer primitives.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by fallible operations of this crate. None of them are transient: the data
/// structures perform no I/O, so an operation that fails will fail again with the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An index was outside of `[0, len)`, or a copy target did not have enough room.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index (for copies, the end of the requested range).
        index: usize,
        /// The length the index was checked against.
        len: usize,
    },

    /// An argument violated a precondition of the called function.
    #[error("invalid argument {name}: {message}")]
    InvalidArgument {
        /// Name of the parameter.
        name: &'static str,
        /// Human readable description of the violated precondition.
        message: String,
    },

    /// Growing the word storage would exceed the addressable size.
    #[error("capacity overflow: cannot hold {requested} bits")]
    CapacityOverflow {
        /// The number of bits that was requested.
        requested: usize,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(index: usize, len: usize) -> Error {
        Error::IndexOutOfBounds { index, len }
    }

    pub(crate) fn invalid_arg(name: &'static str, message: impl Into<String>) -> Error {
        Error::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn capacity_overflow(requested: usize) -> Error {
        Error::CapacityOverflow { requested }
    }
}
