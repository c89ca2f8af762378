use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Add;

use crate::compare::{Comparator, Natural};
use crate::error::{Error, Result};
use crate::raw::RawAvlTree;

mod capacity;
mod iter;
mod order_statistic;
mod query;

pub use iter::{IntoIter, Iter};

/// A sorted multiset backed by a rank-augmented AVL tree.
///
/// Keys are kept in the order given by the tree's [`Comparator`] (their
/// [`Ord`] implementation unless another comparator is supplied). Keys that
/// compare equal are all kept, in the order they were inserted. Besides the
/// usual insert/remove/lookup, every node records the size of its left
/// subtree, which makes positional access ([`select`](AvlTree::select)),
/// slicing ([`slice`](AvlTree::slice)) and index-based range queries
/// ([`span`](AvlTree::span)) O(log n).
///
/// It is a logic error for a key to be modified in such a way that its
/// ordering relative to any other key changes while it is in the tree. The
/// behavior resulting from such a logic error is not specified, but will be
/// encapsulated to the `AvlTree` that observed it; [`check`](AvlTree::check)
/// reports it as [`Error::InvalidComparator`].
///
/// # Examples
///
/// ```
/// use rank_avl::AvlTree;
///
/// let mut tree = AvlTree::new();
/// tree.insert(50);
/// tree.insert(45);
/// assert_eq!(tree.to_vec(), [45, 50]);
///
/// tree.remove(&50).unwrap();
/// assert_eq!(tree.to_vec(), [45]);
/// ```
///
/// Trees index like sorted arrays, including from the end:
///
/// ```
/// use rank_avl::AvlTree;
///
/// let tree = AvlTree::from([30, 10, 20]);
/// assert_eq!(tree.select(0), Ok(&10));
/// assert_eq!(tree.select(-1), Ok(&30));
/// assert_eq!(tree[1], 20);
/// ```
#[derive(Clone)]
pub struct AvlTree<T, C = Natural> {
    raw: RawAvlTree<T>,
    cmp: C,
}

impl<T> AvlTree<T> {
    /// Makes a new, empty tree ordered by [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        AvlTree {
            raw: RawAvlTree::new(),
            cmp: Natural,
        }
    }
}

impl<T, C> AvlTree<T, C> {
    /// Makes a new, empty tree ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.to_vec(), [3, 2, 1]);
    /// ```
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        AvlTree {
            raw: RawAvlTree::new(),
            cmp,
        }
    }

    /// Returns the comparator this tree was built with.
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.len(), 0);
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key, keeping the comparator.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([3, 1, 2]);
    /// assert_eq!(tree.first(), Some(&1));
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.key(handle))
    }

    /// Returns the largest key, if any. Among equal largest keys this is the
    /// one inserted last.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.key(handle))
    }

    /// Removes and returns the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut queue = AvlTree::from([5, 1, 3]);
    /// assert_eq!(queue.pop_first(), Some(1));
    /// assert_eq!(queue.pop_first(), Some(3));
    /// assert_eq!(queue.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.remove_at(0)
    }

    /// Removes and returns the largest key.
    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        self.raw.remove_at(last)
    }

    /// Returns the keys in ascending order as a vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([2, 3, 1, 2]);
    /// assert_eq!(tree.to_vec(), [1, 2, 2, 3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consumes the tree, returning its keys in ascending order.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<T> {
        self.raw.drain_to_vec()
    }

    /// Renders the node structure as a sideways ASCII diagram.
    ///
    /// Right subtrees are drawn above their parent and left subtrees below.
    /// Each node shows its balance (`\` left-heavy, `-` balanced, `/`
    /// right-heavy), its key, and its rank (one more than the size of its left
    /// subtree). Meant for debugging; the layout is not stable.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([1, 2, 3]);
    /// print!("{}", tree.diagram());
    /// //             +-[- 3 001]
    /// // +-[- 2 002]-|
    /// //             +-[- 1 001]
    /// ```
    #[must_use]
    pub fn diagram(&self) -> String
    where
        T: fmt::Debug,
    {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.raw.write_diagram(&mut out);
        out
    }
}

impl<T, C: Comparator<T>> AvlTree<T, C> {
    /// Inserts `key` and returns the index it now occupies.
    ///
    /// A key equal to keys already present goes after all of them, so equal
    /// keys stay in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.insert(10), 0);
    /// assert_eq!(tree.insert(5), 0);
    /// assert_eq!(tree.insert(10), 2);
    /// assert_eq!(tree.to_vec(), [5, 10, 10]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n); at most one rotation.
    pub fn insert(&mut self, key: T) -> usize {
        self.raw.insert(key, &self.cmp)
    }

    /// Removes and returns a key equal to `key`.
    ///
    /// When several keys compare equal, the first one met while descending
    /// from the root is removed; which one that is depends on the tree's shape.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no key compares equal; the tree is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::from([50, 45]);
    /// assert_eq!(tree.remove(&50), Ok(50));
    /// assert_eq!(tree.remove(&50), Err(Error::NotFound));
    /// assert_eq!(tree.to_vec(), [45]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n); rotations may cascade up to the root.
    pub fn remove(&mut self, key: &T) -> Result<T> {
        self.raw.remove(key, &self.cmp).ok_or(Error::NotFound)
    }

    /// Returns the first stored key met while descending from the root that
    /// compares equal to `key`.
    ///
    /// The result is only equal to `key` under the comparator; it need not be
    /// identical to it.
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
    /// let mut tree = AvlTree::with_comparator(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// tree.insert((1, 'a'));
    /// assert_eq!(tree.lookup(&(1, 'z')), Ok(&(1, 'a')));
    /// assert_eq!(tree.lookup(&(2, 'a')), Err(Error::NotFound));
    /// ```
    pub fn lookup(&self, key: &T) -> Result<&T> {
        self.raw.find(key, &self.cmp).map(|(handle, _)| self.raw.key(handle)).ok_or(Error::NotFound)
    }

    /// Returns `true` if some stored key compares equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let tree = AvlTree::from([5, 8, 9]);
    /// assert!(tree.contains(&5));
    /// assert!(!tree.contains(&34));
    /// ```
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.raw.find(key, &self.cmp).is_some()
    }

    /// Walks the whole tree and reports the first broken invariant.
    ///
    /// Checks parent links, that every rank is one more than the size of the
    /// left subtree, that every balance factor matches the subtree heights and
    /// lies in `-1..=1`, that the length matches the node count, and that the
    /// keys are in non-decreasing order under the comparator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidComparator`] if keys are out of order (an inconsistent
    /// comparator, or keys mutated while stored); [`Error::Invariant`] for any
    /// structural inconsistency.
    ///
    /// # Complexity
    ///
    /// O(n log n)
    pub fn check(&self) -> Result<()> {
        self.raw.check(&self.cmp)
    }

    /// Returns `true` if [`check`](AvlTree::check) finds nothing wrong.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let mut tree: AvlTree<u32> = (0..100).rev().collect();
    /// for key in (0..100).step_by(3) {
    ///     tree.remove(&key).unwrap();
    /// }
    /// assert!(tree.verify());
    /// ```
    #[must_use]
    pub fn verify(&self) -> bool {
        self.check().is_ok()
    }

    /// Returns a new tree holding a copy of `self` followed by every key of
    /// `other`, inserted in `other`'s order.
    ///
    /// All duplicates from both trees are kept. The result uses `self`'s
    /// comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_avl::AvlTree;
    ///
    /// let a = AvlTree::from([5, 8, 9]);
    /// let b = AvlTree::from([1, 8]);
    /// let both = a.concat(&b);
    /// assert_eq!(both.to_vec(), [1, 5, 8, 8, 9]);
    /// assert_eq!(&a + &b, both);
    /// ```
    ///
    /// # Complexity
    ///
    /// O((n + m) log(n + m))
    #[must_use]
    pub fn concat<D>(&self, other: &AvlTree<T, D>) -> Self
    where
        T: Clone,
        C: Clone,
    {
        let mut tree = self.clone();
        tree.extend(other.iter().cloned());
        tree
    }
}

impl<T, C: Default> Default for AvlTree<T, C> {
    fn default() -> Self {
        AvlTree::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the keys as a list, `[1, 2, 3]`.
impl<T: fmt::Display, C> fmt::Display for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(key, f)?;
        }
        f.write_str("]")
    }
}

impl<T: PartialEq, C, D> PartialEq<AvlTree<T, D>> for AvlTree<T, C> {
    fn eq(&self, other: &AvlTree<T, D>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for AvlTree<T, C> {}

impl<T, C: Comparator<T> + Default> FromIterator<T> for AvlTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::default();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Comparator<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, T: 'a + Copy, C: Comparator<T>> Extend<&'a T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTree<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Clone, C: Comparator<T> + Clone> Add<&AvlTree<T, C>> for &AvlTree<T, C> {
    type Output = AvlTree<T, C>;

    /// Concatenates two trees; see [`AvlTree::concat`].
    fn add(self, rhs: &AvlTree<T, C>) -> AvlTree<T, C> {
        self.concat(rhs)
    }
}
