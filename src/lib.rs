#![warn(missing_docs)]

//! This crate provides a dynamic bit vector that supports cheap inserts and removals at
//! arbitrary positions, and a set of bitwise primitives over raw byte buffers.
//!
//! # Data structures
//!  - [Bit-Vector][bit_vec::BitVec] packing bits into 64-bit words. The live bits occupy a
//!    window of the words that can slide in both directions, so inserting or removing a bit
//!    only moves the shorter side of the vector.
//!  - [Synchronized Bit-Vector][bit_vec::SyncBitVec], a shared handle that serializes all
//!    operations on a bit vector behind one lock.
//!
//! # Byte buffers
//! The [`bytes`] module combines byte buffers with boolean operators, tiles masks across them,
//! and shifts them by arbitrary bit counts, treating each buffer as one big-endian bit string.
//! These functions do not depend on the bit vector.
//!
//! # Errors
//! Fallible operations return [`Error`]. Index errors and invalid arguments are reported
//! immediately, and nothing is retried, since no operation performs I/O.
//!
//! # Logging
//! Storage reallocations and window shifts are reported through the [`log`] facade at `trace`
//! level, and [`BitVec::trim_to_size`] reports released words at `debug` level. The crate does
//! not install a logger.
//!
//! # Features
//!  - `serde`: derive `Serialize` and `Deserialize` for [`BitVec`] and the operator enums of
//!    [`bytes`].
//!
//! # Safety
//! This crate uses no unsafe code.

#![forbid(unsafe_code)]

pub use bit_vec::{BitVec, SyncBitVec};
pub use error::{Error, Result};

pub mod bit_vec;
pub mod bytes;
pub mod error;

pub(crate) mod util;
