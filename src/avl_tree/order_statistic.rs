use alloc::vec::Vec;
use core::ops::Index;

use super::AvlTree;
use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::raw::RawAvlTree;

impl<T, C> AvlTree<T, C> {
    /// Returns the key at position `index` in sorted order.
    ///
    /// Negative indices count from the end: `-1` is the largest key.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] unless `-len <= index < len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::{AvlTree, Error};
    ///
    /// let tree = AvlTree::from([10, 20, 30]);
    /// assert_eq!(tree.select(1), Ok(&20));
    /// assert_eq!(tree.select(-3), Ok(&10));
    /// assert_eq!(tree.select(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn select(&self, index: isize) -> Result<&T> {
        let position = self.position(index)?;
        self.get(position).ok_or(self.out_of_range(index))
    }

    /// Returns the key at zero-based position `index`, or `None` if it is out
    /// of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.raw.select(index).map(|handle| self.raw.key(handle))
    }

    /// Removes and returns the key at position `index`; negative indices count
    /// from the end.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] unless `-len <= index < len`; the tree is
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::from([5, 1, 4, 2]);
    /// assert_eq!(tree.remove_at(1), Ok(2));
    /// assert_eq!(tree.remove_at(-1), Ok(5));
    /// assert_eq!(tree.to_vec(), [1, 4]);
    /// ```
    pub fn remove_at(&mut self, index: isize) -> Result<T> {
        let position = self.position(index)?;
        self.raw.remove_at(position).ok_or(self.out_of_range(index))
    }

    /// Returns the keys at positions `[lo, hi)` as a new, independent tree.
    ///
    /// Negative bounds count from the end. Bounds are clamped to `0..=len`
    /// and an empty tree is returned when `lo >= hi`, so slicing never fails.
    /// Equal keys keep their relative order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 2, 3, 4, 5]);
    /// assert_eq!(tree.slice(1, 3).to_vec(), [2, 3]);
    /// assert_eq!(tree.slice(-2, 100).to_vec(), [4, 5]);
    /// assert!(tree.slice(4, 1).is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k sliced keys; the result is built balanced without
    /// any comparisons.
    #[must_use]
    pub fn slice(&self, lo: isize, hi: isize) -> Self
    where
        T: Clone,
        C: Clone,
    {
        AvlTree {
            raw: RawAvlTree::from_sorted(self.slice_to_vec(lo, hi)),
            cmp: self.cmp.clone(),
        }
    }

    /// Like [`slice`](AvlTree::slice), but returns the keys as a vector.
    #[must_use]
    pub fn slice_to_vec(&self, lo: isize, hi: isize) -> Vec<T>
    where
        T: Clone,
    {
        self.raw.cloned_run(self.clamp(lo), self.clamp(hi))
    }

    // Resolves a possibly negative index to a position inside the tree.
    fn position(&self, index: isize) -> Result<usize> {
        let len = self.len();
        let position = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };
        position.filter(|&position| position < len).ok_or(self.out_of_range(index))
    }

    fn clamp(&self, index: isize) -> usize {
        let len = self.len();
        if index < 0 {
            len.saturating_sub(index.unsigned_abs())
        } else {
            index.unsigned_abs().min(len)
        }
    }

    fn out_of_range(&self, index: isize) -> Error {
        Error::IndexOutOfRange { index, len: self.len() }
    }
}

impl<T, C: Comparator<T>> AvlTree<T, C> {
    /// Returns the position of the first key equal to `key`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no key compares equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::{AvlTree, Error};
    ///
    /// let tree = AvlTree::from([7, 3, 7, 1]);
    /// assert_eq!(tree.index_of(&7), Ok(2));
    /// assert_eq!(tree.index_of(&4), Err(Error::NotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn index_of(&self, key: &T) -> Result<usize> {
        match self.raw.equal_range(key, &self.cmp) {
            (lo, hi) if lo < hi => Ok(lo),
            _ => Err(Error::NotFound),
        }
    }
}

/// Indexes into the tree by sorted position.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
///
/// # Examples
///
/// ```
/// use rank_avl::AvlTree;
///
/// let tree = AvlTree::from([10, 20, 30]);
/// assert_eq!(tree[2], 30);
/// ```
impl<T, C> Index<usize> for AvlTree<T, C> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(key) => key,
            None => panic!("index {index} out of bounds for tree of length {}", self.len()),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn negative_select_counts_from_end() {
        let tree = AvlTree::from([4, 8, 15, 16, 23, 42]);
        assert_eq!(tree.select(-1), Ok(&42));
        assert_eq!(tree.select(-6), Ok(&4));
        assert_eq!(tree.select(-7), Err(Error::IndexOutOfRange { index: -7, len: 6 }));
        assert_eq!(tree.select(isize::MIN), Err(Error::IndexOutOfRange { index: isize::MIN, len: 6 }));
    }

    #[test]
    fn select_on_empty_tree_fails() {
        let tree = AvlTree::<u8>::new();
        assert_eq!(tree.select(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));
        assert_eq!(tree.select(-1), Err(Error::IndexOutOfRange { index: -1, len: 0 }));
    }

    #[test]
    fn failed_remove_at_leaves_tree_alone() {
        let mut tree = AvlTree::from([1, 2]);
        assert!(tree.remove_at(2).is_err());
        assert_eq!(tree.to_vec(), [1, 2]);
    }

    #[test]
    #[should_panic(expected = "index 3 out of bounds")]
    fn index_past_end_panics() {
        let tree = AvlTree::from([1, 2, 3]);
        let _ = tree[3];
    }

    #[test]
    fn slice_keeps_duplicates_in_insertion_order() {
        let mut tree = AvlTree::with_comparator(|a: &(u8, u8), b: &(u8, u8)| a.0.cmp(&b.0));
        tree.extend([(2, 0), (1, 0), (2, 1), (2, 2), (3, 0)]);
        let slice = tree.slice(1, 4);
        assert_eq!(slice.to_vec(), [(2, 0), (2, 1), (2, 2)]);
        assert!(slice.verify());
    }

    #[test]
    fn slice_does_not_alias_source() {
        let tree: AvlTree<u32> = (0..32).collect();
        let mut slice = tree.slice(8, 16);
        slice.insert(100);
        slice.remove(&8).unwrap();
        assert_eq!(tree.len(), 32);
        assert_eq!(tree[8], 8);
        assert_eq!(slice.to_vec(), vec![9, 10, 11, 12, 13, 14, 15, 100]);
    }

    proptest! {
        #[test]
        fn slice_matches_clamped_vec_slice(
            values in prop::collection::vec(-50i32..50, 0..100),
            lo in -120isize..120,
            hi in -120isize..120,
        ) {
            let tree: AvlTree<i32> = values.iter().copied().collect();
            let mut sorted = values;
            sorted.sort_unstable();
            let len = isize::try_from(sorted.len()).unwrap();
            let clamp = |i: isize| usize::try_from(if i < 0 { (i + len).max(0) } else { i.min(len) }).unwrap();
            let (start, end) = (clamp(lo), clamp(hi));
            let expected: &[i32] = if start < end { &sorted[start..end] } else { &[] };

            let slice = tree.slice(lo, hi);
            prop_assert_eq!(slice.to_vec(), expected);
            prop_assert!(slice.verify());
        }

        #[test]
        fn index_of_finds_first_equal(values in prop::collection::vec(0u8..20, 0..80), probe in 0u8..20) {
            let tree: AvlTree<u8> = values.iter().copied().collect();
            let mut sorted = values;
            sorted.sort_unstable();
            let expected = sorted.iter().position(|&v| v == probe).ok_or(Error::NotFound);
            prop_assert_eq!(tree.index_of(&probe), expected);
        }
    }
}
