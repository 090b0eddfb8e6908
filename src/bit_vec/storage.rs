//! Word storage of [`BitVec`] with a sliding window of live bits.
//!
//! The live bits of the vector do not have to start at bit 0 of the first word. The window
//! begins at bit `lo` of `words[0]` and ends at bit `hi` (inclusive) of
//! `words[word_count - 1]`, so logical bit `i` lives at the physical position `i + lo`.
//! Moving `lo` down by one bit makes room for a bit at the front without touching the rest of
//! the vector, which is what makes inserts and removals near the front cheap.
//!
//! Between operations both offsets are kept in `[0, WORD_SIZE)`. Operations may push them
//! outside of that range temporarily; [`WordWindow::enforce_offset_range`] restores it.
//!
//! Bits of the storage outside of the window are unspecified. Every operation that grows the
//! window writes the newly covered bits explicitly.
//!
//! [`BitVec`]: super::BitVec

use std::mem::size_of;

use crate::error::{Error, Result};

use super::WORD_SIZE;

/// Default number of words the storage grows by.
pub const DEFAULT_GROWTH_WORDS: usize = 4;

/// Word width as a signed offset, for offset arithmetic that may temporarily underflow.
const WORD_BITS: i32 = WORD_SIZE as i32;

/// A mask with the bits `[from, to)` set. `to` may be `WORD_SIZE`.
#[inline]
fn range_mask(from: usize, to: usize) -> u64 {
    debug_assert!(from <= to && to <= WORD_SIZE);
    if to - from == WORD_SIZE {
        u64::MAX
    } else {
        ((1u64 << (to - from)) - 1) << from
    }
}

#[derive(Clone, Debug)]
pub(super) struct WordWindow {
    /// Allocated words. Only the first `word_count` of them are part of the window.
    words: Vec<u64>,
    word_count: usize,
    lo: i32,
    hi: i32,
    len: usize,
    /// Minimum number of words the storage grows by.
    growth: usize,
}

impl WordWindow {
    pub(super) fn new(growth: usize) -> Self {
        Self {
            words: Vec::new(),
            word_count: 0,
            lo: 0,
            hi: WORD_BITS - 1,
            len: 0,
            growth: growth.max(1),
        }
    }

    pub(super) fn with_capacity(bits: usize, growth: usize) -> Result<Self> {
        let mut window = Self::new(growth);
        window.ensure_capacity(bits)?;
        Ok(window)
    }

    /// Pack a sequence of bits into words in a single pass. The window starts at bit 0.
    pub(super) fn from_bits<I: IntoIterator<Item = bool>>(bits: I, growth: usize) -> Self {
        let bits = bits.into_iter();
        let mut words = Vec::with_capacity(bits.size_hint().0.div_ceil(WORD_SIZE));
        let mut len = 0;
        let mut current = 0u64;

        for bit in bits {
            current |= u64::from(bit) << (len % WORD_SIZE);
            len += 1;
            if len % WORD_SIZE == 0 {
                words.push(current);
                current = 0;
            }
        }
        if len % WORD_SIZE != 0 {
            words.push(current);
        }

        Self::from_words(words, len, growth)
    }

    /// Create a window over the first `len` bits of `words`, starting at bit 0.
    pub(super) fn from_words(words: Vec<u64>, len: usize, growth: usize) -> Self {
        debug_assert!(len <= words.len() * WORD_SIZE);
        let word_count = len.div_ceil(WORD_SIZE);
        let hi = if len == 0 {
            WORD_BITS - 1
        } else {
            ((len - 1) % WORD_SIZE) as i32
        };

        Self {
            words,
            word_count,
            lo: 0,
            hi,
            len,
            growth: growth.max(1),
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(super) fn word_count(&self) -> usize {
        self.word_count
    }

    #[cfg(feature = "serde")]
    pub(super) fn growth(&self) -> usize {
        self.growth
    }

    /// Number of bits the window can hold without reallocating, given its current start.
    #[inline]
    pub(super) fn capacity(&self) -> usize {
        (self.words.len() * WORD_SIZE).saturating_sub(self.lo as usize)
    }

    #[inline]
    pub(super) fn heap_size(&self) -> usize {
        self.words.len() * size_of::<u64>()
    }

    /// Physical bit position of a logical index.
    #[inline]
    pub(super) fn physical(&self, index: usize) -> usize {
        index + self.lo as usize
    }

    /// Make sure the window can hold `n` bits without reallocating.
    pub(super) fn ensure_capacity(&mut self, n: usize) -> Result<()> {
        let required = n
            .checked_add(self.lo as usize)
            .ok_or_else(|| Error::capacity_overflow(n))?;
        let needed = required.div_ceil(WORD_SIZE);
        if needed > self.words.len() {
            self.grow_to(needed)?;
        }
        Ok(())
    }

    /// Reallocate the storage to at least `needed` words. The new size is a multiple of the
    /// growth increment, and at least double the old size, so appends stay amortized O(1).
    fn grow_to(&mut self, needed: usize) -> Result<()> {
        let overflow = || Error::capacity_overflow(needed.saturating_mul(WORD_SIZE));

        let increments = needed.div_ceil(self.growth);
        let target = increments
            .checked_mul(self.growth)
            .ok_or_else(overflow)?
            .max(self.words.len().saturating_mul(2));
        if target.checked_mul(WORD_SIZE).is_none() {
            return Err(overflow());
        }

        log::trace!(
            "growing bit vector storage from {} to {} words",
            self.words.len(),
            target
        );
        self.words.resize(target, 0);
        Ok(())
    }

    /// Bring `lo` and `hi` back into `[0, WORD_SIZE)`. An offset leaves that range by at most
    /// one word per operation. If `lo` runs past the first word, the whole array is shifted by
    /// one word, which happens at most once every `WORD_SIZE` front operations. A shift towards
    /// the back needs one spare word, which the caller must have reserved.
    pub(super) fn enforce_offset_range(&mut self) {
        if self.hi >= WORD_BITS {
            self.word_count += 1;
            self.hi -= WORD_BITS;
        } else if self.hi < 0 {
            self.word_count -= 1;
            self.hi += WORD_BITS;
        }

        if self.lo >= WORD_BITS {
            log::trace!("dropping leading word of {} word window", self.word_count);
            self.words.copy_within(1..self.word_count, 0);
            self.word_count -= 1;
            self.lo -= WORD_BITS;
        } else if self.lo < 0 {
            debug_assert!(self.word_count < self.words.len());
            log::trace!("prepending word to {} word window", self.word_count);
            self.words.copy_within(0..self.word_count, 1);
            self.word_count += 1;
            self.lo += WORD_BITS;
        }

        debug_assert!((0..WORD_BITS).contains(&self.lo));
        debug_assert!((0..WORD_BITS).contains(&self.hi));
    }

    /// Grow the window by one bit at the back.
    pub(super) fn extend_back(&mut self) -> Result<()> {
        self.ensure_capacity(self.len + 1)?;
        self.hi += 1;
        self.enforce_offset_range();
        self.len += 1;
        Ok(())
    }

    /// Grow the window by one bit at the front.
    pub(super) fn extend_front(&mut self) -> Result<()> {
        if self.lo == 0 && self.word_count == self.words.len() {
            self.grow_to(self.word_count + 1)?;
        }
        self.lo -= 1;
        self.enforce_offset_range();
        self.len += 1;
        Ok(())
    }

    /// Shrink the window by one bit at the back.
    pub(super) fn shrink_back(&mut self) {
        debug_assert!(self.len > 0);
        self.hi -= 1;
        self.len -= 1;
        self.normalize_after_shrink()
    }

    /// Shrink the window by one bit at the front.
    pub(super) fn shrink_front(&mut self) {
        debug_assert!(self.len > 0);
        self.lo += 1;
        self.len -= 1;
        self.normalize_after_shrink()
    }

    /// Once the last bit is gone, the offsets no longer describe a window and are reset.
    fn normalize_after_shrink(&mut self) {
        if self.len == 0 {
            self.reset();
        } else {
            self.enforce_offset_range();
        }
    }

    /// Empty the window. The allocation is kept.
    pub(super) fn reset(&mut self) {
        self.word_count = 0;
        self.lo = 0;
        self.hi = WORD_BITS - 1;
        self.len = 0;
    }

    #[inline]
    pub(super) fn read_bit(&self, pos: usize) -> bool {
        self.words[pos / WORD_SIZE] & (1 << (pos % WORD_SIZE)) != 0
    }

    #[inline]
    pub(super) fn write_bit(&mut self, pos: usize, value: bool) {
        let word = &mut self.words[pos / WORD_SIZE];
        if value {
            *word |= 1 << (pos % WORD_SIZE);
        } else {
            *word &= !(1 << (pos % WORD_SIZE));
        }
    }

    #[inline]
    pub(super) fn flip_bit(&mut self, pos: usize) {
        self.words[pos / WORD_SIZE] ^= 1 << (pos % WORD_SIZE);
    }

    /// Move the physical bits `[from, to)` one position down, to `[from - 1, to - 1)`.
    /// The bit at `to - 1` keeps its old value.
    pub(super) fn move_bits_down(&mut self, from: usize, to: usize) {
        debug_assert!(from >= 1 && from <= to);
        if from == to {
            return;
        }

        let (target_start, target_end) = (from - 1, to - 1);
        for k in target_start / WORD_SIZE..=(target_end - 1) / WORD_SIZE {
            let base = k * WORD_SIZE;
            let mut shifted = self.words[k] >> 1;
            if base + WORD_SIZE < to {
                shifted |= self.words[k + 1] << (WORD_SIZE - 1);
            }

            let mask = range_mask(
                target_start.max(base) - base,
                target_end.min(base + WORD_SIZE) - base,
            );
            self.words[k] = (self.words[k] & !mask) | (shifted & mask);
        }
    }

    /// Move the physical bits `[from, to)` one position up, to `[from + 1, to + 1)`.
    /// The bit at `from` keeps its old value.
    pub(super) fn move_bits_up(&mut self, from: usize, to: usize) {
        debug_assert!(from <= to);
        if from == to {
            return;
        }

        let (target_start, target_end) = (from + 1, to + 1);
        for k in (target_start / WORD_SIZE..=to / WORD_SIZE).rev() {
            let base = k * WORD_SIZE;
            let mut shifted = self.words[k] << 1;
            if base > from {
                shifted |= self.words[k - 1] >> (WORD_SIZE - 1);
            }

            let mask = range_mask(
                target_start.max(base) - base,
                target_end.min(base + WORD_SIZE) - base,
            );
            self.words[k] = (self.words[k] & !mask) | (shifted & mask);
        }
    }

    /// The `k`-th word of the logical bit sequence: logical bits `k * WORD_SIZE` and up, with
    /// bits past the end of the vector cleared.
    #[inline]
    pub(super) fn logical_word(&self, k: usize) -> u64 {
        let start = k * WORD_SIZE;
        debug_assert!(start < self.len);
        let pos = self.physical(start);
        let offset = pos % WORD_SIZE;

        let mut word = self.words[pos / WORD_SIZE] >> offset;
        if offset != 0 && pos / WORD_SIZE + 1 < self.word_count {
            word |= self.words[pos / WORD_SIZE + 1] << (WORD_SIZE - offset);
        }

        let remaining = self.len - start;
        if remaining < WORD_SIZE {
            word & ((1 << remaining) - 1)
        } else {
            word
        }
    }

    /// Number of logical words, i.e. words needed to hold the vector with the window at bit 0.
    #[inline]
    pub(super) fn logical_word_count(&self) -> usize {
        self.len.div_ceil(WORD_SIZE)
    }

    /// Move the window to bit 0 of the first word and release all words it does not cover.
    pub(super) fn trim_to_size(&mut self) {
        let shift = self.lo as usize;
        if shift > 0 {
            for k in 0..self.word_count {
                let next = if k + 1 < self.word_count {
                    self.words[k + 1]
                } else {
                    0
                };
                self.words[k] = (self.words[k] >> shift) | (next << (WORD_SIZE - shift));
            }
        }

        let len = self.len;
        let before = self.words.len();
        let word_count = len.div_ceil(WORD_SIZE);
        self.words.truncate(word_count);
        self.words.shrink_to_fit();

        if len == 0 {
            self.reset();
        } else {
            self.lo = 0;
            self.word_count = word_count;
            self.hi = ((len - 1) % WORD_SIZE) as i32;
        }

        log::debug!(
            "trimmed bit vector storage from {} to {} words",
            before,
            self.words.len()
        );
    }

    /// Check the window invariants.
    #[cfg(test)]
    pub(super) fn check_invariants(&self) {
        assert!((0..WORD_BITS).contains(&self.lo), "lo out of range: {}", self.lo);
        assert!((0..WORD_BITS).contains(&self.hi), "hi out of range: {}", self.hi);
        let expected =
            ((self.word_count as i64 - 1) * WORD_SIZE as i64 + 1 + i64::from(self.hi)
                - i64::from(self.lo))
            .max(0) as usize;
        assert_eq!(self.len, expected, "length does not match offsets");
        assert!(self.len + self.lo as usize <= self.word_count * WORD_SIZE);
        assert!(self.word_count <= self.words.len());
    }
}
