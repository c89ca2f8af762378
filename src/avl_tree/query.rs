use super::AvlTree;
use crate::compare::Comparator;
use crate::error::{Error, Result};

impl<T, C: Comparator<T>> AvlTree<T, C> {
    /// Returns the half-open range of positions holding keys equal to `key`.
    ///
    /// When no key is equal the range is empty and starts where `key` would
    /// be inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 2, 3, 4, 5]);
    /// assert_eq!(tree.span(&4), (3, 4));
    ///
    /// let tree = AvlTree::from([1, 3, 3, 3, 5]);
    /// assert_eq!(tree.span(&3), (1, 4));
    /// assert_eq!(tree.span(&4), (4, 4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn span(&self, key: &T) -> (usize, usize) {
        self.raw.equal_range(key, &self.cmp)
    }

    /// Returns the half-open range of positions holding keys in `lo..=hi`.
    ///
    /// The bounds are swapped first if `lo` orders after `hi`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([864, 394, 776, 911, 430, 41, 265, 988, 523, 497]);
    /// assert_eq!(tree.span_between(&200, &500), (1, 5));
    /// assert_eq!(tree.span_between(&500, &200), (1, 5));
    /// assert_eq!(tree.span_between(&0, &10), (0, 0));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn span_between<'a>(&self, mut lo: &'a T, mut hi: &'a T) -> (usize, usize) {
        if self.cmp.compare(lo, hi).is_gt() {
            core::mem::swap(&mut lo, &mut hi);
        }
        (self.raw.lower_bound(lo, &self.cmp), self.raw.upper_bound(hi, &self.cmp))
    }

    /// Returns the smallest key not less than `key` (its ceiling).
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if every key is less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::{AvlTree, Error};
    ///
    /// let tree = AvlTree::from([864, 394, 776, 911, 430, 41, 265, 988, 523, 497]);
    /// assert_eq!(tree.at_least(&400), Ok(&430));
    /// assert_eq!(tree.at_least(&430), Ok(&430));
    /// assert_eq!(tree.at_least(&989), Err(Error::NotFound));
    /// ```
    pub fn at_least(&self, key: &T) -> Result<&T> {
        self.raw.ceiling(key, &self.cmp).map(|handle| self.raw.key(handle)).ok_or(Error::NotFound)
    }

    /// Returns the largest key not greater than `key` (its floor).
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if every key is greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::{AvlTree, Error};
    ///
    /// let tree = AvlTree::from([864, 394, 776, 911, 430, 41, 265, 988, 523, 497]);
    /// assert_eq!(tree.at_most(&800), Ok(&776));
    /// assert_eq!(tree.at_most(&40), Err(Error::NotFound));
    /// ```
    pub fn at_most(&self, key: &T) -> Result<&T> {
        self.raw.floor(key, &self.cmp).map(|handle| self.raw.key(handle)).ok_or(Error::NotFound)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn empty_tree_misses_everything() {
        let tree = AvlTree::<i32>::new();
        assert_eq!(tree.span(&1), (0, 0));
        assert_eq!(tree.span_between(&1, &2), (0, 0));
        assert_eq!(tree.at_least(&1), Err(Error::NotFound));
        assert_eq!(tree.at_most(&1), Err(Error::NotFound));
    }

    #[test]
    fn ceiling_and_floor_pick_ends_of_equal_runs() {
        let mut tree = AvlTree::with_comparator(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        tree.extend([(5, 'a'), (5, 'b'), (9, 'c'), (5, 'd'), (1, 'e')]);
        assert_eq!(tree.at_least(&(5, ' ')), Ok(&(5, 'a')));
        assert_eq!(tree.at_most(&(5, ' ')), Ok(&(5, 'd')));
        assert_eq!(tree.at_least(&(6, ' ')), Ok(&(9, 'c')));
        assert_eq!(tree.at_most(&(4, ' ')), Ok(&(1, 'e')));
    }

    proptest! {
        #[test]
        fn queries_match_linear_scans(values in prop::collection::vec(0i32..40, 0..100), a in -2i32..42, b in -2i32..42) {
            let tree: AvlTree<i32> = values.iter().copied().collect();
            let mut sorted: Vec<i32> = values;
            sorted.sort_unstable();
            let (lo, hi) = (a.min(b), a.max(b));

            let equal = (sorted.partition_point(|&v| v < a), sorted.partition_point(|&v| v <= a));
            prop_assert_eq!(tree.span(&a), equal);

            let between = (sorted.partition_point(|&v| v < lo), sorted.partition_point(|&v| v <= hi));
            prop_assert_eq!(tree.span_between(&a, &b), between);

            prop_assert_eq!(tree.at_least(&a).ok(), sorted.iter().find(|&&v| v >= a));
            prop_assert_eq!(tree.at_most(&a).ok(), sorted.iter().rev().find(|&&v| v <= a));
        }
    }
}
