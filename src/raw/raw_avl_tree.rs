use alloc::vec::Vec;
use core::cmp::Ordering;
use core::iter;

use log::debug;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{Balance, Dir, Node};
use crate::compare::Comparator;

/// The arena-backed AVL engine behind [`AvlTree`](crate::AvlTree).
///
/// The engine never stores a comparator; every operation that orders keys
/// borrows one from the caller.
#[derive(Clone)]
pub(crate) struct RawAvlTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Link,
    /// Total number of keys in the tree.
    len: usize,
}

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of live slots in the arena; equals `len` unless the engine is broken.
    pub(crate) const fn allocated(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) const fn root(&self) -> Link {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &T {
        &self.nodes.get(handle).key
    }

    // Points `parent`'s link to `old` at `new`, or makes `new` the root.
    //
    // `new`'s parent link is not updated.
    pub(crate) fn replace_child_or_set_root(&mut self, parent: Link, old: Handle, new: Handle) {
        match parent {
            Some(parent) => {
                let side = self.node(parent).side_of(old);
                self.node_mut(parent).set_child(side, Some(new));
            }
            None => self.root = Some(new),
        }
    }

    /// The outermost node toward `dir` in the subtree at `start`.
    pub(crate) fn extreme(&self, start: Handle, dir: Dir) -> Handle {
        let mut current = start;
        while let Some(next) = self.node(current).child(dir) {
            current = next;
        }
        current
    }

    pub(crate) fn first(&self) -> Link {
        self.root.map(|root| self.extreme(root, Dir::Left))
    }

    pub(crate) fn last(&self) -> Link {
        self.root.map(|root| self.extreme(root, Dir::Right))
    }

    /// The in-order neighbour of `handle` toward `dir` (successor for `Right`).
    pub(crate) fn step(&self, handle: Handle, dir: Dir) -> Link {
        if let Some(child) = self.node(handle).child(dir) {
            return Some(self.extreme(child, !dir));
        }

        let mut current = handle;
        while let Some(parent) = self.node(current).parent() {
            if self.node(parent).child(!dir) == Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// All handles in ascending key order.
    pub(crate) fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        iter::successors(self.first(), move |&handle| self.step(handle, Dir::Right))
    }

    /// The handle at zero-based position `index`.
    pub(crate) fn select(&self, index: usize) -> Link {
        if index >= self.len {
            return None;
        }

        let mut remaining = index + 1;
        let mut current = self.root?;
        loop {
            let node = self.node(current);
            let rank = node.rank();
            match remaining.cmp(&rank) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current = node.left()?,
                Ordering::Greater => {
                    remaining -= rank;
                    current = node.right()?;
                }
            }
        }
    }

    // Adds one to (or takes one from) the rank of every ancestor that has
    // `start` in its left subtree.
    fn adjust_ranks_above(&mut self, start: Handle, grew: bool) {
        let mut child = start;
        while let Some(parent) = self.node(child).parent() {
            if self.node(parent).left() == Some(child) {
                let rank = self.node(parent).rank();
                self.node_mut(parent).set_rank(if grew { rank + 1 } else { rank - 1 });
            }
            child = parent;
        }
    }

    /// Unlinks and frees the node at `handle`, returning its key.
    ///
    /// A node with two children trades keys with its in-order predecessor,
    /// which is then the node physically removed.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> T {
        let mut target = handle;
        let node = self.node(handle);
        if let (Some(left), Some(_)) = (node.left(), node.right()) {
            let predecessor = self.extreme(left, Dir::Right);
            let (a, b) = self.nodes.pair_mut(handle, predecessor);
            core::mem::swap(&mut a.key, &mut b.key);
            target = predecessor;
        }

        self.adjust_ranks_above(target, false);

        let node = self.node(target);
        let child = node.left().or(node.right());
        let parent = node.parent();
        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
        }

        let removed = match parent {
            Some(parent) => {
                let side = self.node(parent).side_of(target);
                self.node_mut(parent).set_child(side, child);
                let removed = self.nodes.take(target);
                self.rebalance_after_remove(parent, side);
                removed
            }
            None => {
                self.root = child;
                self.nodes.take(target)
            }
        };

        self.len -= 1;
        removed.key
    }

    /// Removes and returns the key at `index`.
    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        let handle = self.select(index)?;
        Some(self.remove_handle(handle))
    }

    /// Clones the keys at positions `[lo, hi)`.
    pub(crate) fn cloned_run(&self, lo: usize, hi: usize) -> Vec<T>
    where
        T: Clone,
    {
        let Some(start) = self.select(lo) else {
            return Vec::new();
        };
        let count = hi.min(self.len).saturating_sub(lo);
        iter::successors(Some(start), |&handle| self.step(handle, Dir::Right))
            .take(count)
            .map(|handle| self.key(handle).clone())
            .collect()
    }

    /// Moves every key out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let order: Vec<Handle> = self.handles().collect();
        let keys = order.into_iter().map(|handle| self.nodes.take(handle).key).collect();
        self.clear();
        keys
    }

    /// Builds a height-balanced tree from keys that are already in sorted order.
    ///
    /// The shape is chosen so that every left subtree holds as many keys as its
    /// sibling or one more, which keeps every balance factor at 0 or -1.
    pub(crate) fn from_sorted(keys: Vec<T>) -> Self {
        let len = keys.len();
        let mut tree = Self::with_capacity(len);
        let mut keys = keys.into_iter();
        let (root, height) = tree.build(len, &mut keys);
        tree.root = root;
        tree.len = len;
        debug!("bulk-built tree of {len} keys, height {height}");
        tree
    }

    fn build(&mut self, count: usize, keys: &mut impl Iterator<Item = T>) -> (Link, usize) {
        if count == 0 {
            return (None, 0);
        }

        let left_count = count / 2;
        let (left, left_height) = self.build(left_count, keys);
        let key = keys.next().expect("sorted run shorter than its declared length");
        let handle = self.nodes.alloc(Node::leaf(key, None));
        let (right, right_height) = self.build(count - left_count - 1, keys);

        for (dir, child) in [(Dir::Left, left), (Dir::Right, right)] {
            if let Some(child) = child {
                self.node_mut(child).set_parent(Some(handle));
            }
            self.node_mut(handle).set_child(dir, child);
        }

        let node = self.node_mut(handle);
        node.set_rank(left_count + 1);
        node.set_balance(if right_height < left_height { Balance::LeftHeavy } else { Balance::Balanced });

        (Some(handle), left_height.max(right_height) + 1)
    }
}

impl<T> RawAvlTree<T> {
    /// Inserts `key` after every key that compares equal to it and returns its index.
    pub(crate) fn insert<C: Comparator<T>>(&mut self, key: T, cmp: &C) -> usize {
        let Some(mut current) = self.root else {
            self.root = Some(self.nodes.alloc(Node::leaf(key, None)));
            self.len = 1;
            return 0;
        };

        // All comparisons happen before the first mutation.
        let mut index = 0;
        let dir = loop {
            let node = self.node(current);
            let dir = if cmp.compare(&key, &node.key) == Ordering::Less {
                Dir::Left
            } else {
                index += node.rank();
                Dir::Right
            };
            match node.child(dir) {
                Some(child) => current = child,
                None => break dir,
            }
        };

        let leaf = self.nodes.alloc(Node::leaf(key, Some(current)));
        self.node_mut(current).set_child(dir, Some(leaf));
        self.len += 1;

        self.adjust_ranks_above(leaf, true);
        self.rebalance_after_insert(leaf);
        index
    }

    /// The first node found on the search path that compares equal to `key`,
    /// with its index.
    pub(crate) fn find<C: Comparator<T>>(&self, key: &T, cmp: &C) -> Option<(Handle, usize)> {
        let mut current = self.root;
        let mut before = 0;

        while let Some(handle) = current {
            let node = self.node(handle);
            match cmp.compare(key, &node.key) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => {
                    before += node.rank();
                    current = node.right();
                }
                Ordering::Equal => return Some((handle, before + node.rank() - 1)),
            }
        }
        None
    }

    /// Removes the first node found on the search path that compares equal to `key`.
    pub(crate) fn remove<C: Comparator<T>>(&mut self, key: &T, cmp: &C) -> Option<T> {
        let (handle, _) = self.find(key, cmp)?;
        Some(self.remove_handle(handle))
    }

    /// Number of keys in the subtree at `start` that order before `key`, or
    /// at-or-before it when `inclusive`.
    fn count_before<C: Comparator<T>>(&self, start: Link, key: &T, cmp: &C, inclusive: bool) -> usize {
        let mut current = start;
        let mut count = 0;

        while let Some(handle) = current {
            let node = self.node(handle);
            let go_right = match cmp.compare(key, &node.key) {
                Ordering::Less => false,
                Ordering::Equal => inclusive,
                Ordering::Greater => true,
            };
            if go_right {
                count += node.rank();
                current = node.right();
            } else {
                current = node.left();
            }
        }
        count
    }

    /// Index of the first key not less than `key`.
    pub(crate) fn lower_bound<C: Comparator<T>>(&self, key: &T, cmp: &C) -> usize {
        self.count_before(self.root, key, cmp, false)
    }

    /// Index of the first key greater than `key`.
    pub(crate) fn upper_bound<C: Comparator<T>>(&self, key: &T, cmp: &C) -> usize {
        self.count_before(self.root, key, cmp, true)
    }

    /// Half-open index interval of the keys equal to `key`.
    ///
    /// Descends once; at the first equal node the search forks into its two
    /// subtrees to find the ends of the run.
    pub(crate) fn equal_range<C: Comparator<T>>(&self, key: &T, cmp: &C) -> (usize, usize) {
        let mut current = self.root;
        let mut before = 0;

        while let Some(handle) = current {
            let node = self.node(handle);
            match cmp.compare(key, &node.key) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => {
                    before += node.rank();
                    current = node.right();
                }
                Ordering::Equal => {
                    let lo = before + self.count_before(node.left(), key, cmp, false);
                    let hi = before + node.rank() + self.count_before(node.right(), key, cmp, true);
                    return (lo, hi);
                }
            }
        }
        (before, before)
    }

    /// Node holding the smallest key that is not less than `key`.
    pub(crate) fn ceiling<C: Comparator<T>>(&self, key: &T, cmp: &C) -> Link {
        let mut current = self.root;
        let mut found = None;

        while let Some(handle) = current {
            let node = self.node(handle);
            if cmp.compare(key, &node.key) == Ordering::Greater {
                current = node.right();
            } else {
                found = Some(handle);
                current = node.left();
            }
        }
        found
    }

    /// Node holding the largest key that is not greater than `key`.
    pub(crate) fn floor<C: Comparator<T>>(&self, key: &T, cmp: &C) -> Link {
        let mut current = self.root;
        let mut found = None;

        while let Some(handle) = current {
            let node = self.node(handle);
            if cmp.compare(key, &node.key) == Ordering::Less {
                current = node.left();
            } else {
                found = Some(handle);
                current = node.right();
            }
        }
        found
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<T> RawAvlTree<T> {
        /// Position of `handle` in the sorted sequence, from its rank and the ranks above it.
        pub(crate) fn index_of_handle(&self, handle: Handle) -> usize {
            let mut index = self.node(handle).rank() - 1;
            let mut child = handle;
            while let Some(parent) = self.node(child).parent() {
                if self.node(parent).right() == Some(child) {
                    index += self.node(parent).rank();
                }
                child = parent;
            }
            index
        }
    }

    fn keys<T: Copy>(tree: &RawAvlTree<T>) -> Vec<T> {
        tree.handles().map(|h| *tree.key(h)).collect()
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveAt(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..200).prop_map(Op::Insert),
            3 => (0i32..200).prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveAt),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_after_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = RawAvlTree::new();
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let index = tree.insert(key, &Natural);
                        let expected = model.partition_point(|&k| k <= key);
                        prop_assert_eq!(index, expected);
                        model.insert(expected, key);
                    }
                    Op::Remove(key) => {
                        let removed = tree.remove(&key, &Natural);
                        match model.binary_search(&key) {
                            Ok(_) => {
                                prop_assert_eq!(removed, Some(key));
                                let at = model.iter().position(|&k| k == key).unwrap();
                                model.remove(at);
                            }
                            Err(_) => prop_assert_eq!(removed, None),
                        }
                    }
                    Op::RemoveAt(which) => {
                        if model.is_empty() {
                            prop_assert_eq!(tree.remove_at(which), None);
                            continue;
                        }
                        let index = which % model.len();
                        prop_assert_eq!(tree.remove_at(index), Some(model.remove(index)));
                    }
                }

                tree.validate_invariants(&Natural);
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(keys(&tree), model.clone());
            }
        }

        #[test]
        fn select_and_index_agree(values in prop::collection::vec(0i32..50, 1..200)) {
            let mut tree = RawAvlTree::new();
            for &v in &values {
                tree.insert(v, &Natural);
            }
            let mut sorted = values.clone();
            sorted.sort();

            for (index, expected) in sorted.iter().enumerate() {
                let handle = tree.select(index).unwrap();
                prop_assert_eq!(tree.key(handle), expected);
                prop_assert_eq!(tree.index_of_handle(handle), index);
            }
            prop_assert!(tree.select(sorted.len()).is_none());
        }

        #[test]
        fn bounds_match_partition_points(values in prop::collection::vec(0i32..60, 0..150), probe in -5i32..65) {
            let mut tree = RawAvlTree::new();
            for &v in &values {
                tree.insert(v, &Natural);
            }
            let mut sorted = values.clone();
            sorted.sort();

            let lo = sorted.partition_point(|&k| k < probe);
            let hi = sorted.partition_point(|&k| k <= probe);
            prop_assert_eq!(tree.lower_bound(&probe, &Natural), lo);
            prop_assert_eq!(tree.upper_bound(&probe, &Natural), hi);
            prop_assert_eq!(tree.equal_range(&probe, &Natural), (lo, hi));
            prop_assert_eq!(tree.ceiling(&probe, &Natural).map(|h| *tree.key(h)), sorted.get(lo).copied());
            prop_assert_eq!(tree.floor(&probe, &Natural).map(|h| *tree.key(h)), hi.checked_sub(1).map(|i| sorted[i]));
        }

        #[test]
        fn from_sorted_is_balanced(len in 0usize..300) {
            let tree = RawAvlTree::from_sorted((0..len as i32).collect());
            tree.validate_invariants(&Natural);
            prop_assert_eq!(keys(&tree), (0..len as i32).collect::<Vec<_>>());
        }
    }

    #[test]
    fn empty_tree_queries() {
        let tree: RawAvlTree<i32> = RawAvlTree::new();
        tree.validate_invariants(&Natural);
        assert!(tree.select(0).is_none());
        assert!(tree.first().is_none());
        assert!(tree.find(&3, &Natural).is_none());
        assert_eq!(tree.equal_range(&3, &Natural), (0, 0));
        assert!(tree.ceiling(&3, &Natural).is_none());
        assert!(tree.floor(&3, &Natural).is_none());
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut tree = RawAvlTree::new();
        let by_first = |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0);
        for pair in [(2, 'a'), (1, 'b'), (2, 'c'), (2, 'd'), (1, 'e')] {
            tree.insert(pair, &by_first);
        }
        tree.validate_invariants(&by_first);
        assert_eq!(keys(&tree), [(1, 'b'), (1, 'e'), (2, 'a'), (2, 'c'), (2, 'd')]);
        assert_eq!(tree.equal_range(&(2, 'z'), &by_first), (2, 5));
    }

    #[test]
    fn two_child_removal_uses_predecessor() {
        let mut tree = RawAvlTree::new();
        for key in [20, 10, 30, 5, 15, 25, 35] {
            tree.insert(key, &Natural);
        }
        let root = tree.root().unwrap();
        assert_eq!(tree.remove(&20, &Natural), Some(20));
        // The root slot now carries the predecessor's key.
        assert_eq!(tree.root(), Some(root));
        assert_eq!(*tree.key(root), 15);
        assert_eq!(tree.node(root).rank(), 3);
        tree.validate_invariants(&Natural);
    }

    #[test]
    fn remove_missing_key_leaves_tree_untouched() {
        let mut tree = RawAvlTree::new();
        for key in [5, 1, 9] {
            tree.insert(key, &Natural);
        }
        assert_eq!(tree.remove(&4, &Natural), None);
        tree.validate_invariants(&Natural);
        assert_eq!(keys(&tree), [1, 5, 9]);
    }

    #[test]
    fn cloned_run_clamps_to_len() {
        let mut tree = RawAvlTree::new();
        for key in 0..10 {
            tree.insert(key, &Natural);
        }
        assert_eq!(tree.cloned_run(3, 6), vec![3, 4, 5]);
        assert_eq!(tree.cloned_run(8, 20), vec![8, 9]);
        assert!(tree.cloned_run(10, 12).is_empty());
    }

    #[test]
    fn drain_empties_tree() {
        let mut tree = RawAvlTree::new();
        for key in [3, 1, 2] {
            tree.insert(key, &Natural);
        }
        assert_eq!(tree.drain_to_vec(), vec![1, 2, 3]);
        assert!(tree.is_empty());
        assert_eq!(tree.allocated(), 0);
    }
}
