mod arena;
mod diagram;
mod handle;
mod node;
mod raw_avl_tree;
mod rotate;
mod verify;

pub(crate) use handle::Link;
pub(crate) use node::Dir;
pub(crate) use raw_avl_tree::RawAvlTree;
