//! A thread-safe handle to a [`BitVec`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

use super::{BitVec, BitVecIntoIter};

/// A shared, thread-safe handle to a [`BitVec`].
///
/// Every operation takes one exclusive lock for its whole duration and releases it before
/// returning, so exactly one operation runs at a time per vector. Cloning the handle does not
/// copy the vector: all clones operate on the same bits. Use [`snapshot`] to obtain an
/// independent copy.
///
/// The lock is not reentrant, and no references into the vector escape an operation.
///
/// # Example
/// ```rust
/// use slidebits::SyncBitVec;
/// use std::thread;
///
/// let bits = SyncBitVec::default();
/// let workers: Vec<_> = (0..4)
///     .map(|_| {
///         let bits = bits.clone();
///         thread::spawn(move || (0..100).for_each(|i| bits.push(i % 2 == 0)))
///     })
///     .collect();
/// workers.into_iter().for_each(|w| w.join().unwrap());
///
/// assert_eq!(bits.len(), 400);
/// assert_eq!(bits.count_ones(), 200);
/// ```
///
/// [`snapshot`]: SyncBitVec::snapshot
#[derive(Clone, Debug, Default)]
pub struct SyncBitVec {
    inner: Arc<Mutex<BitVec>>,
}

impl SyncBitVec {
    /// Wrap `vec` in a new handle.
    #[must_use]
    pub fn new(vec: BitVec) -> Self {
        Self {
            inner: Arc::new(Mutex::new(vec)),
        }
    }

    /// Acquire the lock. Operations never leave the vector in an inconsistent state when they
    /// panic, so a poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, BitVec> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("recovering bit vector lock poisoned by a panicking thread");
            poisoned.into_inner()
        })
    }

    /// See [`BitVec::len`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// See [`BitVec::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// See [`BitVec::word_count`].
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lock().word_count()
    }

    /// See [`BitVec::get`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.lock().get(index)
    }

    /// See [`BitVec::set`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `index >= len()`.
    pub fn set(&self, index: usize, value: bool) -> Result<()> {
        self.lock().set(index, value)
    }

    /// See [`BitVec::flip_bit`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `index >= len()`.
    pub fn flip_bit(&self, index: usize) -> Result<()> {
        self.lock().flip_bit(index)
    }

    /// See [`BitVec::push`].
    pub fn push(&self, value: bool) {
        self.lock().push(value);
    }

    /// See [`BitVec::try_push`].
    ///
    /// # Errors
    /// Returns [`Error::CapacityOverflow`](crate::Error::CapacityOverflow) if the storage
    /// cannot grow.
    pub fn try_push(&self, value: bool) -> Result<()> {
        self.lock().try_push(value)
    }

    /// See [`BitVec::pop`].
    pub fn pop(&self) -> Option<bool> {
        self.lock().pop()
    }

    /// See [`BitVec::insert`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `index > len()`.
    pub fn insert(&self, index: usize, value: bool) -> Result<()> {
        self.lock().insert(index, value)
    }

    /// See [`BitVec::remove`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `index >= len()`.
    pub fn remove(&self, index: usize) -> Result<bool> {
        self.lock().remove(index)
    }

    /// See [`BitVec::index_of`].
    #[must_use]
    pub fn index_of(&self, value: bool) -> Option<usize> {
        self.lock().index_of(value)
    }

    /// See [`BitVec::contains`].
    #[must_use]
    pub fn contains(&self, value: bool) -> bool {
        self.lock().contains(value)
    }

    /// See [`BitVec::count_ones`].
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.lock().count_ones()
    }

    /// See [`BitVec::count_zeros`].
    #[must_use]
    pub fn count_zeros(&self) -> usize {
        self.lock().count_zeros()
    }

    /// See [`BitVec::clear`].
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// See [`BitVec::trim_to_size`].
    pub fn trim_to_size(&self) {
        self.lock().trim_to_size();
    }

    /// See [`BitVec::copy_to`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `target` is
    /// too short.
    pub fn copy_to(&self, target: &mut [bool], start: usize) -> Result<()> {
        self.lock().copy_to(target, start)
    }

    /// See [`BitVec::copy_to_words`].
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`](crate::Error::IndexOutOfBounds) if `target` is
    /// too short.
    pub fn copy_to_words(&self, target: &mut [u64], start: usize) -> Result<()> {
        self.lock().copy_to_words(target, start)
    }

    /// Return an independent copy of the current bits.
    #[must_use]
    pub fn snapshot(&self) -> BitVec {
        self.lock().clone()
    }

    /// Iterate over a snapshot of the current bits. Later modifications through any handle
    /// are not observed by the iterator.
    #[must_use]
    pub fn iter(&self) -> BitVecIntoIter {
        self.snapshot().into_iter()
    }

    /// Return the wrapped vector if this is the only handle to it. Otherwise the handle is
    /// returned unchanged.
    ///
    /// # Errors
    /// Returns `self` if other handles to the same vector exist.
    pub fn into_inner(self) -> std::result::Result<BitVec, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex
                .into_inner()
                .unwrap_or_else(std::sync::PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl From<BitVec> for SyncBitVec {
    fn from(vec: BitVec) -> Self {
        Self::new(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_poisoned_lock() {
        let bits = SyncBitVec::new(BitVec::from_ones(3));
        let other = bits.clone();

        let result = std::thread::spawn(move || {
            let mut guard = other.inner.lock().unwrap();
            guard.push(false);
            panic!("worker failed while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(bits.inner.is_poisoned());

        assert_eq!(bits.len(), 4);
        bits.push(true);
        assert_eq!(bits.len(), 5);
        assert_eq!(bits.get(3), Ok(false));
        assert_eq!(bits.count_ones(), 4);
        assert!(bits.into_inner().unwrap().iter().eq([true, true, true, false, true]));
    }
}
