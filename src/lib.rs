//! A sorted multiset with sequence-like random access.
//!
//! This crate provides [`AvlTree`], a self-balancing binary search tree in
//! which every node also records its rank (one more than the size of its left
//! subtree). Keys are kept in comparator order, duplicates included, and the
//! tree can be used like a sorted array:
//!
//! - [`insert`](AvlTree::insert), [`remove`](AvlTree::remove) and
//!   [`lookup`](AvlTree::lookup) by key
//! - [`select`](AvlTree::select) by position, negative positions counting from the end
//! - [`slice`](AvlTree::slice) a run of positions into a new tree
//! - [`span`](AvlTree::span), [`at_least`](AvlTree::at_least) and
//!   [`at_most`](AvlTree::at_most) range queries
//!
//! all in O(log n).
//!
//! # Example
//!
//! ```
//! use rank_avl::AvlTree;
//!
//! let mut tree = AvlTree::from([25, 26, 28, 30, 40, 42, 48, 50, 51, 58]);
//! tree.insert(91);
//! tree.insert(91);
//!
//! // The key at a position, and the position of a key.
//! assert_eq!(tree.select(4), Ok(&40));
//! assert_eq!(tree.index_of(&91), Ok(10));
//!
//! // Both copies of 91 are kept.
//! assert_eq!(tree.span(&91), (10, 12));
//!
//! // A run of positions as a new, independent tree.
//! assert_eq!(tree.slice(3, 8).to_vec(), [30, 40, 42, 48, 50]);
//!
//! // Ceiling and floor.
//! assert_eq!(tree.at_least(&45), Ok(&48));
//! assert_eq!(tree.at_most(&45), Ok(&42));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Custom orderings** - Any [`Comparator`], including closures, orders the keys
//! - **Stable duplicates** - Equal keys stay in insertion order
//! - **Self-checking** - [`AvlTree::check`] walks the tree and reports the first broken invariant
//!
//! # Implementation
//!
//! Nodes live in a contiguous arena and refer to their children and parent by
//! index, so parent links never own anything. Insertion rebalances with at
//! most one rotation; removal may rotate at every level up to the root. Every
//! rotation fixes the ranks of the nodes it moves in constant time.
//!
//! Structural repairs are reported through the [`log`] facade at `trace`
//! level; the crate never installs a logger.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod compare;
mod error;
mod raw;

pub mod avl_tree;

pub use avl_tree::AvlTree;
pub use compare::{Comparator, Natural};
pub use error::{Error, Result, Violation};
