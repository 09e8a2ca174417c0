mod arena;
mod handle;
mod node;
mod raw_rbtree;

pub(crate) use raw_rbtree::{Iter, RawRBTree};
