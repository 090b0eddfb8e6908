//! A dynamic bit vector with cheap inserts and removals at both ends, and a thread-safe
//! wrapper around it.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::util::impl_vector_iterator;

use storage::WordWindow;

pub use storage::DEFAULT_GROWTH_WORDS;
pub use sync::SyncBitVec;

mod storage;
mod sync;


/// Size of a word in bitvectors. All vectors operate on 64-bit words.
pub const WORD_SIZE: usize = 64;

/// A growable vector of bits, packed into 64-bit words.
///
/// Appending is amortized O(1). Unlike a plain packed vector, the bits do not have to start at
/// the beginning of the first word: the vector keeps a window into its words that can slide
/// in both directions. Inserting or removing a bit only moves the bits on the shorter side of
/// the affected index, so operations near either end are cheap, and operations in the middle
/// move at most half of the vector.
///
/// Cloning a `BitVec` copies its words. The clone and the original are fully independent.
///
/// With the `serde` feature, a vector serializes as its length, its growth increment and its
/// bits packed from bit 0 of the first word, independent of where the window currently sits.
/// Deserialization rejects a word count that does not match the length, set bits past the
/// end, and a zero growth increment.
///
/// # Example
/// ```rust
/// use slidebits::BitVec;
///
/// let mut bits = BitVec::new();
/// bits.push(true);
/// bits.push(false);
/// bits.push(true);
/// bits.insert(1, false).unwrap();
/// assert_eq!(bits.iter().collect::<Vec<_>>(), [true, false, false, true]);
///
/// assert_eq!(bits.remove(0), Ok(true));
/// assert_eq!(bits.index_of(true), Some(2));
/// ```
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "PackedBits", try_from = "PackedBits")
)]
pub struct BitVec {
    storage: WordWindow,
}

/// Serialized form of a [`BitVec`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PackedBits {
    len: usize,
    growth: usize,
    words: Vec<u64>,
}

#[cfg(feature = "serde")]
impl From<BitVec> for PackedBits {
    fn from(vec: BitVec) -> Self {
        let words = (0..vec.storage.logical_word_count())
            .map(|k| vec.storage.logical_word(k))
            .collect();
        Self {
            len: vec.len(),
            growth: vec.storage.growth(),
            words,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<PackedBits> for BitVec {
    type Error = Error;

    fn try_from(packed: PackedBits) -> Result<Self> {
        if packed.growth == 0 {
            return Err(Error::invalid_arg("growth", "growth increment must be positive"));
        }

        let expected = packed.len.div_ceil(WORD_SIZE);
        if packed.words.len() != expected {
            return Err(Error::invalid_arg(
                "words",
                format!(
                    "{} bits need {} words, found {}",
                    packed.len,
                    expected,
                    packed.words.len()
                ),
            ));
        }

        let unused = expected * WORD_SIZE - packed.len;
        if unused > 0
            && packed
                .words
                .last()
                .is_some_and(|&last| last >> (WORD_SIZE - unused) != 0)
        {
            return Err(Error::invalid_arg("words", "bits past the end must be zero"));
        }

        Ok(Self {
            storage: WordWindow::from_words(packed.words, packed.len, packed.growth),
        })
    }
}

impl BitVec {
    /// Create a new empty bit vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: WordWindow::new(DEFAULT_GROWTH_WORDS),
        }
    }

    /// Create a new empty bit vector that can hold `capacity` bits without reallocating.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `capacity` is zero, and
    /// [`Error::CapacityOverflow`] if the storage cannot be addressed.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_arg("capacity", "capacity must be positive"));
        }
        Ok(Self {
            storage: WordWindow::with_capacity(capacity, DEFAULT_GROWTH_WORDS)?,
        })
    }

    /// Create a new empty bit vector whose storage grows by at least `words` 64-bit words
    /// at a time, instead of [`DEFAULT_GROWTH_WORDS`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `words` is zero.
    pub fn with_growth(words: usize) -> Result<Self> {
        if words == 0 {
            return Err(Error::invalid_arg("words", "growth increment must be positive"));
        }
        Ok(Self {
            storage: WordWindow::new(words),
        })
    }

    /// Create a new bit vector with all zeros and the given length. The length is measured in bits.
    #[must_use]
    pub fn from_zeros(len: usize) -> Self {
        let words = vec![0; len.div_ceil(WORD_SIZE)];
        Self {
            storage: WordWindow::from_words(words, len, DEFAULT_GROWTH_WORDS),
        }
    }

    /// Create a new bit vector with all ones and the given length. The length is measured in bits.
    #[must_use]
    pub fn from_ones(len: usize) -> Self {
        let words = vec![u64::MAX; len.div_ceil(WORD_SIZE)];
        Self {
            storage: WordWindow::from_words(words, len, DEFAULT_GROWTH_WORDS),
        }
    }

    /// Return the length of the bit vector. The length is measured in bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Return whether the vector contains no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the number of words the live bits currently span. Because the bits may start
    /// in the middle of a word, this can be one more than `len().div_ceil(64)`.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.storage.word_count()
    }

    /// Return the number of bits the vector can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the number of bytes on the heap for this vector. Does not include allocated memory
    /// that isn't used.
    #[must_use]
    pub fn heap_size(&self) -> usize {
        self.storage.heap_size()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::out_of_bounds(index, self.len()))
        }
    }

    /// Return the bit at the given position.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.get_unchecked(index))
    }

    /// Return the bit at the given position.
    ///
    /// # Panics
    /// If the position is larger than the length of the vector,
    /// the function will either return unpredictable data, or panic.
    /// Use [`get`] to properly handle this case.
    ///
    /// [`get`]: BitVec::get
    #[inline]
    #[must_use]
    pub fn get_unchecked(&self, index: usize) -> bool {
        self.storage.read_bit(self.storage.physical(index))
    }

    /// Set the bit at the given position.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        self.check_index(index)?;
        self.storage.write_bit(self.storage.physical(index), value);
        Ok(())
    }

    /// Flip the bit at the given position.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn flip_bit(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.storage.flip_bit(self.storage.physical(index));
        Ok(())
    }

    /// Return the first bit, or `None` if the vector is empty.
    #[must_use]
    pub fn first(&self) -> Option<bool> {
        self.get(0).ok()
    }

    /// Return the last bit, or `None` if the vector is empty.
    #[must_use]
    pub fn last(&self) -> Option<bool> {
        self.len().checked_sub(1).map(|i| self.get_unchecked(i))
    }

    /// Append a bit to the bit vector.
    ///
    /// # Panics
    /// Panics if the storage would exceed the addressable size. Use [`try_push`] to handle
    /// this case.
    ///
    /// [`try_push`]: BitVec::try_push
    pub fn push(&mut self, value: bool) {
        if let Err(err) = self.try_push(value) {
            panic!("{err}");
        }
    }

    /// Append a bit to the bit vector.
    ///
    /// # Errors
    /// Returns [`Error::CapacityOverflow`] if the storage would exceed the addressable size.
    pub fn try_push(&mut self, value: bool) -> Result<()> {
        self.storage.extend_back()?;
        let pos = self.storage.physical(self.len() - 1);
        self.storage.write_bit(pos, value);
        Ok(())
    }

    /// Remove the last bit and return it, or `None` if the vector is empty.
    pub fn pop(&mut self) -> Option<bool> {
        let last = self.last()?;
        self.storage.shrink_back();
        Some(last)
    }

    /// Insert a bit at position `index`, moving all bits after it one position back.
    /// If `index` lies in the front half of the vector, the bits before it are moved one
    /// position to the front instead, so at most half of the vector is moved.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index > len()`, and
    /// [`Error::CapacityOverflow`] if the storage cannot grow.
    pub fn insert(&mut self, index: usize, value: bool) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::out_of_bounds(index, len));
        }
        if index == len {
            return self.try_push(value);
        }

        if index < len / 2 {
            self.storage.extend_front()?;
            let start = self.storage.physical(0);
            self.storage.move_bits_down(start + 1, start + 1 + index);
        } else {
            let end = self.storage.physical(len);
            self.storage.extend_back()?;
            self.storage.move_bits_up(self.storage.physical(index), end);
        }

        self.storage.write_bit(self.storage.physical(index), value);
        Ok(())
    }

    /// Remove the bit at position `index` and return it. The first and the last bit are
    /// removed in constant time. Otherwise the shorter side of the vector is moved to close
    /// the gap.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<bool> {
        let value = self.get(index)?;
        let len = self.len();

        if index == len - 1 {
            self.storage.shrink_back();
        } else if index == 0 {
            self.storage.shrink_front();
        } else if index < len / 2 {
            let start = self.storage.physical(0);
            self.storage.move_bits_up(start, start + index);
            self.storage.shrink_front();
        } else {
            let from = self.storage.physical(index + 1);
            self.storage.move_bits_down(from, self.storage.physical(len));
            self.storage.shrink_back();
        }

        Ok(value)
    }

    /// Mask of the bits of logical word `k` that lie inside the vector.
    fn live_mask(&self, k: usize) -> u64 {
        let remaining = self.len() - k * WORD_SIZE;
        if remaining >= WORD_SIZE {
            u64::MAX
        } else {
            (1 << remaining) - 1
        }
    }

    /// Return the position of the first bit equal to `value`, or `None` if there is none.
    /// The vector is scanned a word at a time.
    #[must_use]
    pub fn index_of(&self, value: bool) -> Option<usize> {
        (0..self.storage.logical_word_count()).find_map(|k| {
            let word = self.storage.logical_word(k);
            let candidates = if value {
                word
            } else {
                !word & self.live_mask(k)
            };
            (candidates != 0).then(|| k * WORD_SIZE + candidates.trailing_zeros() as usize)
        })
    }

    /// Return whether the vector contains a bit equal to `value`.
    #[must_use]
    pub fn contains(&self, value: bool) -> bool {
        self.index_of(value).is_some()
    }

    /// Return the number of ones in the bit vector.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        (0..self.storage.logical_word_count())
            .map(|k| self.storage.logical_word(k).count_ones() as usize)
            .sum()
    }

    /// Return the number of zeros in the bit vector.
    #[must_use]
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Remove all bits. The allocated storage is kept.
    pub fn clear(&mut self) {
        self.storage.reset();
    }

    /// Move the bits to the start of the storage and release all words they do not need.
    pub fn trim_to_size(&mut self) {
        self.storage.trim_to_size();
    }

    /// Copy the bits into `target`, one bit per slot, starting at `target[start]`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `target` has fewer than `start + len()` slots.
    pub fn copy_to(&self, target: &mut [bool], start: usize) -> Result<()> {
        let end = start
            .checked_add(self.len())
            .filter(|&end| end <= target.len())
            .ok_or_else(|| Error::out_of_bounds(start.saturating_add(self.len()), target.len()))?;

        for (slot, bit) in target[start..end].iter_mut().zip(self.iter()) {
            *slot = bit;
        }
        Ok(())
    }

    /// Copy the bits into `target` as packed words, starting at `target[start]`. Bit `i` of
    /// the vector ends up in bit `i % 64` of `target[start + i / 64]`. Unused bits of the last
    /// word are cleared.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `target` has fewer than
    /// `start + len().div_ceil(64)` words.
    pub fn copy_to_words(&self, target: &mut [u64], start: usize) -> Result<()> {
        let words = self.storage.logical_word_count();
        let end = start
            .checked_add(words)
            .filter(|&end| end <= target.len())
            .ok_or_else(|| Error::out_of_bounds(start.saturating_add(words), target.len()))?;

        for (k, slot) in target[start..end].iter_mut().enumerate() {
            *slot = self.storage.logical_word(k);
        }
        Ok(())
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        self.storage.check_invariants();
    }
}

impl_vector_iterator!(BitVec, BitVecIntoIter, BitVecIter, bool);

impl Default for BitVec {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BitVec {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && (0..self.storage.logical_word_count())
                .all(|k| self.storage.logical_word(k) == other.storage.logical_word(k))
    }
}

impl Eq for BitVec {}

impl Hash for BitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for k in 0..self.storage.logical_word_count() {
            self.storage.logical_word(k).hash(state);
        }
    }
}

impl fmt::Debug for BitVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self {
            storage: WordWindow::from_bits(iter, DEFAULT_GROWTH_WORDS),
        }
    }
}

impl Extend<bool> for BitVec {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl From<&[bool]> for BitVec {
    fn from(bits: &[bool]) -> Self {
        bits.iter().copied().collect()
    }
}

impl From<Vec<bool>> for BitVec {
    fn from(bits: Vec<bool>) -> Self {
        bits.into_iter().collect()
    }
}
