use core::cmp::Ordering;

use super::handle::{Handle, Link};
use super::raw_avl_tree::RawAvlTree;
use crate::compare::Comparator;
use crate::error::{Error, Result, Violation};

impl<T> RawAvlTree<T> {
    /// Walks the whole tree and reports the first broken invariant.
    ///
    /// Structure (parent links, ranks, balance factors, heights, length) is
    /// checked before ordering, so an ordering failure always means the
    /// comparator, not the engine, is at fault.
    pub(crate) fn check<C: Comparator<T>>(&self, cmp: &C) -> Result<()> {
        let (counted, _) = match self.root() {
            Some(root) => self.check_structure(root, None)?,
            None => (0, 0),
        };
        if counted != self.len() || self.allocated() != self.len() {
            return Err(Violation::Length {
                recorded: self.len(),
                counted,
            }
            .into());
        }

        self.check_order(cmp)
    }

    // Returns (size, height) of the subtree at `handle`.
    fn check_structure(&self, handle: Handle, parent: Link) -> Result<(usize, isize)> {
        let node = self.node(handle);
        if node.parent() != parent {
            return Err(Violation::ParentLink {
                index: self.before_subtree(handle),
            }
            .into());
        }

        let (left_size, left_height) = match node.left() {
            Some(left) => self.check_structure(left, Some(handle))?,
            None => (0, 0),
        };
        let (right_size, right_height) = match node.right() {
            Some(right) => self.check_structure(right, Some(handle))?,
            None => (0, 0),
        };

        let index = left_size + self.before_subtree(handle);
        if node.rank() != left_size + 1 {
            return Err(Violation::Rank {
                index,
                found: node.rank(),
                expected: left_size + 1,
            }
            .into());
        }

        let actual = right_height - left_height;
        if !(-1..=1).contains(&actual) {
            return Err(Violation::Height {
                index,
                difference: actual,
            }
            .into());
        }
        if node.balance().factor() != actual {
            return Err(Violation::Balance {
                index,
                recorded: node.balance().factor(),
                actual,
            }
            .into());
        }

        Ok((left_size + right_size + 1, left_height.max(right_height) + 1))
    }

    // Keys ordered before the subtree rooted at `handle`, counted from the
    // ranks of the ancestors it hangs right of. Children are checked before
    // their parents, so those ranks may not be trusted yet; the result is only
    // used to label a violation.
    fn before_subtree(&self, handle: Handle) -> usize {
        let mut before = 0;
        let mut child = handle;
        while let Some(parent) = self.node(child).parent() {
            if self.node(parent).right() == Some(child) {
                before += self.node(parent).rank();
            }
            child = parent;
        }
        before
    }

    // In-order keys must never decrease. Insertion routes equal keys right,
    // but a later rotation may lift a key above an equal one that was
    // inserted before it, so a left subtree can hold keys equal to its root.
    fn check_order<C: Comparator<T>>(&self, cmp: &C) -> Result<()> {
        let mut previous: Option<Handle> = None;
        for (index, handle) in self.handles().enumerate() {
            let key = self.key(handle);
            if previous.is_some_and(|previous| cmp.compare(key, self.key(previous)) == Ordering::Less) {
                return Err(Error::InvalidComparator { index });
            }
            previous = Some(handle);
        }
        Ok(())
    }
}
