use alloc::vec;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;

use super::AvlTree;
use crate::error::{Error, Result};
use crate::raw::{Dir, Link, RawAvlTree};

/// An iterator over the keys of an [`AvlTree`], in ascending order.
///
/// Created by [`AvlTree::iter`] and [`AvlTree::iter_range`]. Each step follows
/// child or parent links to the in-order neighbour, so the iterator holds no
/// stack and costs O(1) amortized per key.
pub struct Iter<'a, T> {
    raw: &'a RawAvlTree<T>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(raw: &'a RawAvlTree<T>, range: Range<usize>) -> Self {
        let remaining = range.len();
        let (front, back) = match range.end.checked_sub(1) {
            Some(last) if remaining > 0 => (raw.select(range.start), raw.select(last)),
            _ => (None, None),
        };
        Iter {
            raw,
            front,
            back,
            remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.remaining -= 1;
        self.front = self.raw.step(handle, Dir::Right);
        Some(self.raw.key(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.remaining -= 1;
        self.back = self.raw.step(handle, Dir::Left);
        Some(self.raw.key(handle))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the keys of an [`AvlTree`], in ascending order.
///
/// Created by the [`IntoIterator`] implementation on `AvlTree`.
#[derive(Clone, Debug)]
pub struct IntoIter<T> {
    inner: vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, C> AvlTree<T, C> {
    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// Every call starts a fresh traversal; iterating never changes the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.len(), 1);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw, 0..self.len())
    }

    /// Gets an iterator over the keys at positions `range`.
    ///
    /// Unlike [`slice`](AvlTree::slice), the bounds are not clamped.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `range.end` exceeds the length or
    /// `range.start` exceeds `range.end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree: AvlTree<u32> = (0..10).map(|x| x * 10).collect();
    /// let middle: Vec<_> = tree.iter_range(3..6).unwrap().copied().collect();
    /// assert_eq!(middle, [30, 40, 50]);
    /// assert!(tree.iter_range(8..11).is_err());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to start, then O(1) amortized per key.
    pub fn iter_range(&self, range: Range<usize>) -> Result<Iter<'_, T>> {
        let len = self.len();
        let bad = if range.end > len {
            Some(range.end)
        } else if range.start > range.end {
            Some(range.start)
        } else {
            None
        };
        if let Some(index) = bad {
            return Err(Error::IndexOutOfRange {
                index: isize::try_from(index).unwrap_or(isize::MAX),
                len,
            });
        }
        Ok(Iter::new(&self.raw, range))
    }
}

impl<T, C> IntoIterator for AvlTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the tree, yielding its keys in ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.into_vec().into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = AvlTree::<i32>::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.iter_range(0..0).map(Iterator::count), Ok(0));
    }

    #[test]
    fn ends_meet_in_the_middle() {
        let tree = AvlTree::from([1, 2, 3, 4]);
        let mut iter = tree.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn range_errors_name_the_offending_bound() {
        let tree = AvlTree::from([1, 2, 3]);
        assert_eq!(tree.iter_range(0..4).err(), Some(Error::IndexOutOfRange { index: 4, len: 3 }));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert_eq!(tree.iter_range(reversed).err(), Some(Error::IndexOutOfRange { index: 2, len: 3 }));
        assert_eq!(tree.iter_range(3..3).map(Iterator::count), Ok(0));
    }

    #[test]
    fn owned_iteration_moves_keys_out() {
        let tree = AvlTree::from([3, 1, 2]);
        let keys: Vec<i32> = tree.into_iter().rev().collect();
        assert_eq!(keys, [3, 2, 1]);
    }

    proptest! {
        #[test]
        fn range_matches_sorted_slice(
            mut values in prop::collection::vec(0i32..100, 0..120),
            a in 0usize..130,
            b in 0usize..130,
        ) {
            let tree: AvlTree<i32> = values.iter().copied().collect();
            values.sort_unstable();
            let (lo, hi) = (a.min(b).min(values.len()), a.max(b).min(values.len()));

            let forward: Vec<i32> = tree.iter_range(lo..hi).unwrap().copied().collect();
            prop_assert_eq!(&forward[..], &values[lo..hi]);

            let mut backward: Vec<i32> = tree.iter_range(lo..hi).unwrap().rev().copied().collect();
            backward.reverse();
            prop_assert_eq!(&backward[..], &values[lo..hi]);
            prop_assert_eq!(tree.iter_range(lo..hi).unwrap().len(), hi - lo);
        }
    }
}
