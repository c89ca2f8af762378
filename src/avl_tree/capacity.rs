use super::AvlTree;
use crate::compare::Natural;
use crate::raw::RawAvlTree;

impl<T> AvlTree<T> {
    /// Creates an empty tree with room for at least `capacity` keys before
    /// its node store reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree: AvlTree<i32> = AvlTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTree::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<T, C> AvlTree<T, C> {
    /// Creates an empty tree ordered by `cmp` with room for at least
    /// `capacity` keys.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        AvlTree {
            raw: RawAvlTree::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns how many keys the tree can hold without reallocating.
    ///
    /// Slots freed by removals are reused before the store grows.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn removals_free_room_for_inserts() {
        let mut tree = AvlTree::with_capacity(8);
        tree.extend(0..8);
        let capacity = tree.capacity();
        for key in 0..4 {
            tree.remove(&key).unwrap();
        }
        tree.extend(10..14);
        assert_eq!(tree.capacity(), capacity);
        assert_eq!(tree.to_vec(), [4, 5, 6, 7, 10, 11, 12, 13]);
    }

    #[test]
    fn comparator_survives_clear() {
        let mut tree = AvlTree::with_capacity_and_comparator(4, |a: &i32, b: &i32| b.cmp(a));
        tree.extend([1, 2]);
        tree.clear();
        tree.extend([1, 3, 2]);
        assert_eq!(tree.to_vec(), [3, 2, 1]);
    }
}
