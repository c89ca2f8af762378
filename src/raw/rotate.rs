//! Rotations and the upward repair walks that use them.
//!
//! Every rotation relinks at most three nodes and fixes their ranks from the
//! ranks they already carry, so each one is O(1). Balance factors are set by
//! [`RawAvlTree::repair`], which knows the heights involved.

use log::trace;

use super::handle::Handle;
use super::node::{Balance, Dir};
use super::raw_avl_tree::RawAvlTree;

impl<T> RawAvlTree<T> {
    /// Moves `down` one level toward `dir`; its `!dir` child takes its place.
    ///
    /// `rotate_single(x, Dir::Left)` is a left rotation. Returns the new subtree root.
    pub(crate) fn rotate_single(&mut self, down: Handle, dir: Dir) -> Handle {
        let up = self.node(down).child(!dir).expect("rotation needs a child on the rising side");
        let across = self.node(up).child(dir);

        self.node_mut(down).set_child(!dir, across);
        if let Some(across) = across {
            self.node_mut(across).set_parent(Some(down));
        }

        self.node_mut(up).set_child(dir, Some(down));
        let parent = self.node_mut(down).set_parent(Some(up));
        self.node_mut(up).set_parent(parent);
        self.replace_child_or_set_root(parent, down, up);

        // Only the node that gains or loses a left subtree changes rank.
        let down_rank = self.node(down).rank();
        let up_rank = self.node(up).rank();
        match dir {
            // `down` and its left subtree join `up`'s left subtree.
            Dir::Left => self.node_mut(up).set_rank(up_rank + down_rank),
            // `down` loses `up` and `up`'s left subtree from its own left subtree.
            Dir::Right => self.node_mut(down).set_rank(down_rank - up_rank),
        }

        up
    }

    /// Left-right (`dir == Dir::Right`) or right-left (`dir == Dir::Left`) rotation at `down`.
    ///
    /// The grandchild on the inner side rises two levels. Returns the new subtree root.
    pub(crate) fn rotate_double(&mut self, down: Handle, dir: Dir) -> Handle {
        let child = self.node(down).child(!dir).expect("double rotation needs a child on the rising side");
        self.rotate_single(child, !dir);
        self.rotate_single(down, dir)
    }

    /// Restores balance at `node`, whose `heavy` subtree is two levels taller
    /// than the other one.
    ///
    /// Returns the new subtree root and whether the subtree got shorter than it
    /// was before the height change that unbalanced it.
    pub(crate) fn repair(&mut self, node: Handle, heavy: Dir) -> (Handle, bool) {
        let child = self.node(node).child(heavy).expect("the heavy side cannot be empty");
        let child_balance = self.node(child).balance();

        if child_balance == Balance::heavy(!heavy) {
            let grandchild = self.node(child).child(!heavy).expect("inner-heavy child has an inner child");
            let (node_balance, child_after) = match self.node(grandchild).balance() {
                b if b == Balance::heavy(heavy) => (Balance::heavy(!heavy), Balance::Balanced),
                b if b == Balance::heavy(!heavy) => (Balance::Balanced, Balance::heavy(heavy)),
                _ => (Balance::Balanced, Balance::Balanced),
            };

            trace!("double rotation at {node:?} ({heavy:?}-heavy)");
            let root = self.rotate_double(node, !heavy);
            self.node_mut(node).set_balance(node_balance);
            self.node_mut(child).set_balance(child_after);
            self.node_mut(root).set_balance(Balance::Balanced);
            (root, true)
        } else {
            trace!("single rotation at {node:?} ({heavy:?}-heavy)");
            let root = self.rotate_single(node, !heavy);
            if child_balance == Balance::Balanced {
                // Only reachable after a removal; the height is unchanged.
                self.node_mut(node).set_balance(Balance::heavy(heavy));
                self.node_mut(root).set_balance(Balance::heavy(!heavy));
                (root, false)
            } else {
                self.node_mut(node).set_balance(Balance::Balanced);
                self.node_mut(root).set_balance(Balance::Balanced);
                (root, true)
            }
        }
    }

    /// Walks up from a freshly linked leaf, updating balance factors.
    ///
    /// Stops at the first ancestor whose height does not change, or after the
    /// single rotation an insertion can need.
    pub(crate) fn rebalance_after_insert(&mut self, leaf: Handle) {
        let mut child = leaf;

        while let Some(parent) = self.node(child).parent() {
            let side = self.node(parent).side_of(child);
            match self.node(parent).balance() {
                Balance::Balanced => {
                    self.node_mut(parent).set_balance(Balance::heavy(side));
                    child = parent;
                }
                b if b == Balance::heavy(!side) => {
                    self.node_mut(parent).set_balance(Balance::Balanced);
                    return;
                }
                _ => {
                    self.repair(parent, side);
                    return;
                }
            }
        }
    }

    /// Walks up from `parent`, whose `side` subtree just lost one level.
    ///
    /// Unlike insertion, a removal can need a rotation at every level up to the root.
    pub(crate) fn rebalance_after_remove(&mut self, parent: Handle, side: Dir) {
        let (mut node, mut side) = (parent, side);
        let mut depth = 0_usize;

        loop {
            let subtree = match self.node(node).balance() {
                Balance::Balanced => {
                    self.node_mut(node).set_balance(Balance::heavy(!side));
                    break;
                }
                b if b == Balance::heavy(side) => {
                    self.node_mut(node).set_balance(Balance::Balanced);
                    node
                }
                _ => match self.repair(node, !side) {
                    (root, true) => root,
                    (_, false) => break,
                },
            };

            let Some(parent) = self.node(subtree).parent() else {
                break;
            };
            side = self.node(parent).side_of(subtree);
            node = parent;
            depth += 1;
        }

        if depth > 0 {
            trace!("removal rebalance climbed {depth} levels");
        }
    }
}
