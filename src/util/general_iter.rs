// This macro generates the implementations for the iterator trait and relevant other traits for the
// vector types.
macro_rules! gen_vector_iter_impl {
    ($($life:lifetime, )? $name:ident, $type:ty, $item:ty) => {
        impl $(<$life>)? $name $(<$life>)? {
            #[must_use]
            fn new(vec: $(&$life)? $type) -> Self {
                let back_index = vec.len();
                Self {
                    vec,
                    index: 0,
                    back_index,
                }
            }

            fn is_iter_empty(&self) -> bool {
                self.index >= self.back_index
            }
        }

        impl $(<$life>)? Iterator for $name $(<$life>)? {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                if self.is_iter_empty() {
                    return None;
                }
                let item = self.vec.get_unchecked(self.index);
                self.index += 1;
                Some(item)
            }

            /// Returns the number of elements that this iterator will iterate over. The size is
            /// precise.
            fn size_hint(&self) -> (usize, Option<usize>) {
                (self.len(), Some(self.len()))
            }

            /// Returns the exact number of elements that this iterator would iterate over. Does not
            /// call `next` internally.
            fn count(self) -> usize
            where
                Self: Sized,
            {
                self.len()
            }

            /// Returns the last element of the iterator. Does not call `next` internally.
            fn last(self) -> Option<Self::Item>
            where
                Self: Sized,
            {
                if self.is_iter_empty() {
                    return None;
                }
                Some(self.vec.get_unchecked(self.back_index - 1))
            }

            /// Returns the nth element of the iterator. Does not call `next` for the skipped
            /// elements. If fewer than `n + 1` elements remain, the iterator is exhausted.
            fn nth(&mut self, n: usize) -> Option<Self::Item> {
                self.index = self.index.saturating_add(n).min(self.back_index);
                self.next()
            }
        }

        impl $(<$life>)? std::iter::ExactSizeIterator for $name $(<$life>)? {
            fn len(&self) -> usize {
                self.back_index.saturating_sub(self.index)
            }
        }

        impl $(<$life>)? std::iter::FusedIterator for $name $(<$life>)? {}

        impl $(<$life>)? std::iter::DoubleEndedIterator for $name $(<$life>)? {
            fn next_back(&mut self) -> Option<Self::Item> {
                if self.is_iter_empty() {
                    return None;
                }
                self.back_index -= 1;
                Some(self.vec.get_unchecked(self.back_index))
            }

            fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
                self.back_index = self.back_index.saturating_sub(n).max(self.index);
                self.next_back()
            }
        }
    };
}

/// Internal macro to implement the `IntoIterator` traits for a vector type.
/// The macro accepts the name of the data structure, the owning and borrowing iterator types,
/// and the item type.
///
/// It expects that the iterator types have a constructor named `new` that takes only a
/// reference to / value of the data structure and returns an iterator.
///
/// The macro generates the following items:
/// - An `impl` block that implements `IntoIterator<Item = $item>` for `VecType`.
/// - An `impl` block that implements `IntoIterator<Item = $item>` for `&VecType`.
/// - An `impl` block that implements `IntoIterator<Item = $item>` for `&mut VecType`.
macro_rules! impl_into_iterator_impls {
    ($type:ty, $own:ident, $bor:ident, $item:ty) => {
        impl IntoIterator for $type {
            type Item = $item;
            type IntoIter = $own;

            fn into_iter(self) -> Self::IntoIter {
                $own::new(self)
            }
        }

        impl<'a> IntoIterator for &'a $type {
            type Item = $item;
            type IntoIter = $bor<'a>;

            fn into_iter(self) -> Self::IntoIter {
                $bor::new(self)
            }
        }

        // mutable references iterate by value as well, there is no iterator over mutable bits
        #[allow(clippy::into_iter_without_iter)]
        impl<'a> IntoIterator for &'a mut $type {
            type Item = $item;
            type IntoIter = $bor<'a>;

            fn into_iter(self) -> Self::IntoIter {
                $bor::new(self)
            }
        }
    };
}

/// Internal macro to implement iterators for vector types.
/// The macro accepts the name of the vector type, two identifiers for the owning and the
/// borrowing iterator type, and the item type.
///
/// The macro expects the vector type to implement a function `get_unchecked` that returns an
/// `$item` and a function `len()`. Iterators are double-ended and restartable: every call to
/// `iter()` starts a fresh traversal.
///
/// The macro generates the following items:
/// - A struct named `$own` that implements `Iterator<Item = $item>` for `VecType`.
/// - A struct named `$bor` that implements `Iterator<Item = $item>` for `&VecType` and `&mut VecType`.
/// - An `iter()` method on `VecType`.
macro_rules! impl_vector_iterator {
    ($type:ty, $own:ident, $bor:ident, $item:ty) => {
        #[doc = concat!("An owning iterator for `", stringify!($type), "`.")]
        #[doc = concat!("This struct is created by the `into_iter` trait implementation of `", stringify!($type), "`.")]
        #[derive(Clone, Debug)]
        pub struct $own {
            vec: $type,
            index: usize,
            // exclusive end of the remaining range
            back_index: usize,
        }

        impl $type {
            #[doc = concat!("Returns an iterator over the elements of `", stringify!($type), "`.")]
            #[must_use]
            pub fn iter(&self) -> $bor<'_> {
                $bor::new(self)
            }
        }

        #[doc = concat!("A borrowing iterator for `", stringify!($type), "`.")]
        #[doc = concat!("This struct is created by the `iter` method of `", stringify!($type), "`.")]
        #[derive(Clone, Debug)]
        pub struct $bor<'a> {
            vec: &'a $type,
            index: usize,
            // exclusive end of the remaining range
            back_index: usize,
        }

        crate::util::impl_into_iterator_impls!($type, $own, $bor, $item);

        crate::util::gen_vector_iter_impl!($own, $type, $item);

        crate::util::gen_vector_iter_impl!('a, $bor, $type, $item);
    };
}

pub(crate) use gen_vector_iter_impl;
pub(crate) use impl_into_iterator_impls;
pub(crate) use impl_vector_iterator;
