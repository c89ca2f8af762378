//! Orderings used to arrange keys in a tree.

use core::cmp::Ordering;

/// A three-way ordering over keys, bound to a tree for its whole lifetime.
///
/// Any `Fn(&T, &T) -> Ordering` is a comparator, so closures can carry state
/// (a projection, a locale, a [`Cell`](core::cell::Cell) counting calls, ...).
/// Implement the trait on your own type when the state deserves a name.
///
/// The ordering must be a total order and must not change while keys are
/// stored. Violating this is a logic error: operations keep memory safety and
/// never leave half-finished rotations behind, but their results are
/// unspecified. [`AvlTree::check`](crate::AvlTree::check) reports keys that
/// ended up out of order.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use rank_avl::{AvlTree, Comparator};
///
/// struct ByLength;
///
/// impl Comparator<&str> for ByLength {
///     fn compare(&self, a: &&str, b: &&str) -> Ordering {
///         a.len().cmp(&b.len())
///     }
/// }
///
/// let mut words: AvlTree<&str, _> = AvlTree::with_comparator(ByLength);
/// words.extend(["ccc", "a", "bb", "dd"]);
/// assert_eq!(words.to_vec(), ["a", "bb", "dd", "ccc"]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural order of keys, given by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
