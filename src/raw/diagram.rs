use alloc::string::String;
use core::fmt::{self, Write};

use smallvec::SmallVec;

use super::handle::Handle;
use super::node::Dir;
use super::raw_avl_tree::RawAvlTree;

// One step of the path from the root to the node being drawn.
#[derive(Clone, Copy)]
struct Segment {
    dir: Dir,
    width: usize,
}

type Trail = SmallVec<[Segment; 32]>;

// "+-[", balance, space, space, three rank digits, "]", "-|".
const FRAME_WIDTH: usize = 11;

impl<T: fmt::Debug> RawAvlTree<T> {
    /// Draws the tree sideways: right subtrees above their parent, left below.
    ///
    /// Each node prints as `+-[<balance> <key> <rank>]`.
    pub(crate) fn write_diagram<W: Write>(&self, out: &mut W) -> fmt::Result {
        match self.root() {
            Some(root) => self.write_subtree(out, root, &mut Trail::new()),
            None => out.write_str("<empty tree>\n"),
        }
    }

    fn write_subtree<W: Write>(&self, out: &mut W, handle: Handle, trail: &mut Trail) -> fmt::Result {
        let node = self.node(handle);
        let mut label = String::new();
        write!(label, "{:?}", node.key)?;
        let width = label.chars().count() + FRAME_WIDTH;

        if let Some(right) = node.right() {
            trail.push(Segment { dir: Dir::Right, width });
            self.write_subtree(out, right, trail)?;
            trail.pop();
        }

        // A vertical bar marks every place where the path changes direction.
        for (i, segment) in trail.iter().enumerate() {
            if i > 0 && trail[i - 1].dir != segment.dir {
                out.write_char('|')?;
                write!(out, "{:1$}", "", segment.width - 1)?;
            } else {
                write!(out, "{:1$}", "", segment.width)?;
            }
        }
        write!(out, "+-[{} {label} {:03}]", node.balance().symbol(), node.rank())?;
        out.write_str(if node.is_leaf() { "\n" } else { "-|\n" })?;

        if let Some(left) = node.left() {
            trail.push(Segment { dir: Dir::Left, width });
            self.write_subtree(out, left, trail)?;
            trail.pop();
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use pretty_assertions::assert_eq;

    fn draw(keys: &[i32]) -> String {
        let mut tree = RawAvlTree::new();
        for &key in keys {
            tree.insert(key, &Natural);
        }
        let mut out = String::new();
        tree.write_diagram(&mut out).unwrap();
        out
    }

    #[test]
    fn empty() {
        assert_eq!(draw(&[]), "<empty tree>\n");
    }

    #[test]
    fn balanced_three() {
        let expected = concat!(
            "            +-[- 3 001]\n",
            "+-[- 2 002]-|\n",
            "            +-[- 1 001]\n",
        );
        assert_eq!(draw(&[1, 2, 3]), expected);
    }

    #[test]
    fn bar_marks_turns() {
        let expected = concat!(
            "            +-[- 6 001]\n",
            "+-[\\ 4 003]-|\n",
            "            |           +-[- 3 001]\n",
            "            +-[/ 2 001]-|\n",
        );
        assert_eq!(draw(&[4, 2, 6, 3]), expected);
    }
}
