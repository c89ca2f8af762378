use thiserror::Error;

/// Errors reported by [`AvlTree`](crate::AvlTree) operations.
///
/// A failed operation never leaves the tree partially modified.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// No stored key compares equal to (or, for the range queries, bounds) the argument.
    #[error("key not found")]
    NotFound,

    /// A position lies outside the tree.
    #[error("index {index} out of range for tree of length {len}")]
    IndexOutOfRange {
        /// The offending index, as given by the caller.
        index: isize,
        /// The length of the tree at the time of the call.
        len: usize,
    },

    /// Stored keys are out of order under the tree's comparator.
    ///
    /// Only [`AvlTree::check`](crate::AvlTree::check) reports this; it means the
    /// comparator is not a consistent total order, or that keys were mutated in a
    /// way that changed their ordering while stored.
    #[error("keys at position {index} are out of order under the tree's comparator")]
    InvalidComparator {
        /// Position of the first key found out of order.
        index: usize,
    },

    /// The tree's structural bookkeeping is inconsistent.
    #[error("tree invariant violated: {0}")]
    Invariant(#[from] Violation),
}

/// A structural inconsistency found by [`AvlTree::check`](crate::AvlTree::check).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Violation {
    /// A node's rank is not one more than the size of its left subtree.
    #[error("node at position {index} has rank {found}, expected {expected}")]
    Rank { index: usize, found: usize, expected: usize },

    /// A node's recorded balance factor disagrees with its subtree heights.
    #[error("node at position {index} records balance {recorded}, actual {actual}")]
    Balance { index: usize, recorded: isize, actual: isize },

    /// A node's subtrees differ in height by more than one.
    #[error("node at position {index} has subtree heights differing by {difference}")]
    Height { index: usize, difference: isize },

    /// A node's parent link does not point at the node that owns it.
    #[error("node at position {index} has a stale parent link")]
    ParentLink { index: usize },

    /// The stored length disagrees with the number of reachable nodes.
    #[error("tree records {recorded} keys but {counted} are reachable")]
    Length { recorded: usize, counted: usize },
}

/// Result alias for tree operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;
