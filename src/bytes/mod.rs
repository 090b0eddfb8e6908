//! Bitwise primitives over raw byte buffers: combining two buffers with a boolean operator,
//! tiling a mask across a buffer, and shifting a whole buffer by an arbitrary number of bits.
//!
//! All functions are pure. Each operation comes in two forms: one writing into a distinct
//! output buffer, and an `_in_place` form that mutates its first argument. Partially
//! overlapping input and output buffers cannot be expressed through these signatures.
//!
//! Buffers are processed in chunks of [`CHUNK_BYTES`] bytes, so that one machine word is
//! handled per step. A trailing chunk that is shorter than a full word is processed with a
//! correspondingly narrower width.

use std::mem::size_of;

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

/// Number of bytes processed as one unit by the chunked loops.
pub const CHUNK_BYTES: usize = size_of::<u64>();

/// A binary boolean operator that can be applied bytewise to two buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitOp {
    /// `a & b`
    And,
    /// `a | b`
    Or,
    /// `!(a & b)`
    Nand,
    /// `!(a | b)`
    Nor,
    /// `a ^ b`
    Xor,
    /// `!(a ^ b)`
    Xnor,
}

impl BitOp {
    /// Apply the operator to two words. Bytes are handled by widening them, since every
    /// operator acts on each bit position independently.
    #[inline]
    #[must_use]
    pub fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Nand => !(a & b),
            BitOp::Nor => !(a | b),
            BitOp::Xor => a ^ b,
            BitOp::Xnor => !(a ^ b),
        }
    }
}

/// The operators a mask can be applied with, see [`apply_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskOp {
    /// Clear every bit that is not set in the mask.
    And,
    /// Set every bit that is set in the mask.
    Or,
}

impl From<MaskOp> for BitOp {
    fn from(op: MaskOp) -> Self {
        match op {
            MaskOp::And => BitOp::And,
            MaskOp::Or => BitOp::Or,
        }
    }
}

/// Direction of a shift over a buffer. The buffer is treated as one big-endian bit string,
/// so a left shift moves bits towards byte 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftDirection {
    /// Towards the most significant bit (byte 0).
    Left,
    /// Towards the least significant bit (the last byte).
    Right,
}

/// Unsigned integers that can be tiled across a buffer by [`apply_mask`].
/// Implemented for `u8`, `u32` and `u64`.
pub trait Mask: Copy + private::Sealed {
    /// Width of the mask in bytes, which is also the chunk width used when tiling it.
    const BYTES: usize;

    /// The mask value zero-extended to a word.
    fn widen(self) -> u64;
}

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

macro_rules! impl_mask {
    ($($t:ty),*) => {
        $(
            impl Mask for $t {
                const BYTES: usize = size_of::<$t>();

                #[inline]
                fn widen(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

impl_mask!(u8, u32, u64);

/// Read up to eight bytes as a big-endian integer. The first byte ends up in the most
/// significant position of the `bytes.len() * 8` low bits of the result.
#[inline]
fn load_be(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= CHUNK_BYTES);
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

/// Store the low `bytes.len() * 8` bits of `value` as a big-endian integer. Higher bits
/// are discarded.
#[inline]
fn store_be(value: u64, bytes: &mut [u8]) {
    debug_assert!(bytes.len() <= CHUNK_BYTES);
    let last = bytes.len().saturating_sub(1);
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = (value >> (8 * (last - i))) as u8;
    }
}

/// Read a full chunk in native byte order. Only used for operators that treat every bit
/// position the same, so the byte order does not matter.
#[inline]
fn load_ne(bytes: &[u8]) -> u64 {
    let mut word = [0u8; CHUNK_BYTES];
    word.copy_from_slice(bytes);
    u64::from_ne_bytes(word)
}

/// Combine `a` and `b` bytewise with `op` and write the result to `out`.
///
/// Only the first `min(a.len(), b.len())` bytes are processed: surplus bytes of the longer
/// operand are ignored and the corresponding bytes of `out` are left untouched. The same holds
/// if `out` is shorter than both operands. Length mismatches are not reported.
///
/// # Example
/// ```rust
/// use slidebits::bytes::{combine, BitOp};
///
/// let mut out = [0xFF; 3];
/// combine(BitOp::Xor, &[0b1100, 0b1010], &[0b1010, 0b1010, 0b1111], &mut out);
/// assert_eq!(out, [0b0110, 0, 0xFF]);
/// ```
pub fn combine(op: BitOp, a: &[u8], b: &[u8], out: &mut [u8]) {
    let len = a.len().min(b.len()).min(out.len());
    out[..len].copy_from_slice(&a[..len]);
    combine_in_place(op, &mut out[..len], b);
}

/// Combine `a` and `b` bytewise with `op`, storing the result in `a`. Follows the same
/// truncation rules as [`combine`].
pub fn combine_in_place(op: BitOp, a: &mut [u8], b: &[u8]) {
    let len = a.len().min(b.len());
    let (a, b) = (&mut a[..len], &b[..len]);

    let mut a_chunks = a.chunks_exact_mut(CHUNK_BYTES);
    let mut b_chunks = b.chunks_exact(CHUNK_BYTES);
    for (x, y) in (&mut a_chunks).zip(&mut b_chunks) {
        let word = op.apply(load_ne(x), load_ne(y));
        x.copy_from_slice(&word.to_ne_bytes());
    }

    for (x, &y) in a_chunks
        .into_remainder()
        .iter_mut()
        .zip(b_chunks.remainder())
    {
        *x = op.apply(u64::from(*x), u64::from(y)) as u8;
    }
}

/// Write the bitwise complement of `buf` into `out`. Processes `min(buf.len(), out.len())`
/// bytes.
pub fn invert(buf: &[u8], out: &mut [u8]) {
    let len = buf.len().min(out.len());
    out[..len].copy_from_slice(&buf[..len]);
    invert_in_place(&mut out[..len]);
}

/// Complement every bit of `buf`.
pub fn invert_in_place(buf: &mut [u8]) {
    let mut chunks = buf.chunks_exact_mut(CHUNK_BYTES);
    for chunk in &mut chunks {
        let word = !load_ne(chunk);
        chunk.copy_from_slice(&word.to_ne_bytes());
    }
    for byte in chunks.into_remainder() {
        *byte = !*byte;
    }
}

/// Tile `mask` across `buf` and combine each chunk with it, writing the result to `out`.
///
/// The mask is laid out big-endian: the chunk width equals the width of `M`, and the most
/// significant byte of the mask lines up with the first byte of every chunk. If the length of
/// the buffer is not a multiple of the mask width, the trailing partial chunk is combined with
/// the high-order bytes of the mask only.
///
/// Processes `min(buf.len(), out.len())` bytes.
///
/// # Example
/// ```rust
/// use slidebits::bytes::{apply_mask, MaskOp};
///
/// let mut out = [0; 6];
/// apply_mask(MaskOp::And, &[0xFF; 6], 0xF0F0_00FFu32, &mut out);
/// assert_eq!(out, [0xF0, 0xF0, 0x00, 0xFF, 0xF0, 0xF0]);
/// ```
pub fn apply_mask<M: Mask>(op: MaskOp, buf: &[u8], mask: M, out: &mut [u8]) {
    let len = buf.len().min(out.len());
    out[..len].copy_from_slice(&buf[..len]);
    apply_mask_in_place(op, &mut out[..len], mask);
}

/// Tile `mask` across `buf` and combine each chunk with it in place. See [`apply_mask`].
pub fn apply_mask_in_place<M: Mask>(op: MaskOp, buf: &mut [u8], mask: M) {
    let op = BitOp::from(op);
    let mask = mask.widen();

    let mut chunks = buf.chunks_exact_mut(M::BYTES);
    for chunk in &mut chunks {
        store_be(op.apply(load_be(chunk), mask), chunk);
    }

    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let partial_mask = mask >> (8 * (M::BYTES - tail.len()));
        store_be(op.apply(load_be(tail), partial_mask), tail);
    }
}

/// Shift the bits of `buf` by `n` positions in direction `dir` and write the result into the
/// first `buf.len()` bytes of `out`. Bits shifted out are lost, vacated positions are filled
/// with zeros. The buffer is read as one big-endian bit string: byte 0 holds the most
/// significant bits, and the most significant bit of each byte comes first.
///
/// Returns the written prefix of `out`.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `out` is shorter than `buf`.
///
/// # Example
/// ```rust
/// use slidebits::bytes::{shift, ShiftDirection};
///
/// let mut out = [0; 2];
/// shift(ShiftDirection::Left, &[0xBE, 0xEF], 4, &mut out).unwrap();
/// assert_eq!(out, [0xEE, 0xF0]);
/// ```
pub fn shift<'a>(
    dir: ShiftDirection,
    buf: &[u8],
    n: usize,
    out: &'a mut [u8],
) -> Result<&'a mut [u8]> {
    if out.len() < buf.len() {
        return Err(Error::invalid_arg(
            "out",
            format!(
                "output buffer of {} bytes cannot hold {} input bytes",
                out.len(),
                buf.len()
            ),
        ));
    }

    let len = buf.len();
    let out = &mut out[..len];

    if n == 0 {
        out.copy_from_slice(buf);
        return Ok(out);
    }
    if n >= len * 8 {
        out.fill(0);
        return Ok(out);
    }

    let bytes = n / 8;
    match dir {
        ShiftDirection::Left => {
            out[..len - bytes].copy_from_slice(&buf[bytes..]);
            out[len - bytes..].fill(0);
        }
        ShiftDirection::Right => {
            out[bytes..].copy_from_slice(&buf[..len - bytes]);
            out[..bytes].fill(0);
        }
    }
    shift_bits_in_place(dir, out, (n % 8) as u32);

    Ok(out)
}

/// Shift the bits of `buf` by `n` positions in direction `dir` in place. See [`shift`] for the
/// bit order. Shifting by `buf.len() * 8` or more clears the buffer.
pub fn shift_in_place(dir: ShiftDirection, buf: &mut [u8], n: usize) {
    let len = buf.len();
    if n == 0 {
        return;
    }
    if n >= len * 8 {
        buf.fill(0);
        return;
    }

    let bytes = n / 8;
    match dir {
        ShiftDirection::Left => {
            buf.copy_within(bytes.., 0);
            buf[len - bytes..].fill(0);
        }
        ShiftDirection::Right => {
            buf.copy_within(..len - bytes, bytes);
            buf[..bytes].fill(0);
        }
    }
    shift_bits_in_place(dir, buf, (n % 8) as u32);
}

/// Shift the buffer by less than a byte. Every chunk is shifted as one integer, and the bits
/// leaving a chunk enter the neighbouring chunk. Since fewer than eight bits move, the carry
/// into a chunk only ever comes from the adjacent byte of its neighbour.
///
/// Left shifts walk front to back and right shifts back to front, so the neighbouring byte
/// read for the carry has not been overwritten yet.
fn shift_bits_in_place(dir: ShiftDirection, buf: &mut [u8], k: u32) {
    debug_assert!(k < 8);
    if k == 0 {
        return;
    }

    let len = buf.len();
    let chunk_count = len.div_ceil(CHUNK_BYTES);
    let bounds = |chunk: usize| (chunk * CHUNK_BYTES, ((chunk + 1) * CHUNK_BYTES).min(len));

    match dir {
        ShiftDirection::Left => {
            for chunk in 0..chunk_count {
                let (start, end) = bounds(chunk);
                let carry = if end < len {
                    u64::from(buf[end] >> (8 - k))
                } else {
                    0
                };
                let value = load_be(&buf[start..end]);
                store_be((value << k) | carry, &mut buf[start..end]);
            }
        }
        ShiftDirection::Right => {
            for chunk in (0..chunk_count).rev() {
                let (start, end) = bounds(chunk);
                let width = ((end - start) * 8) as u32;
                let carry = if start > 0 {
                    u64::from(buf[start - 1]) << (width - k)
                } else {
                    0
                };
                let value = load_be(&buf[start..end]);
                store_be((value >> k) | carry, &mut buf[start..end]);
            }
        }
    }
}
