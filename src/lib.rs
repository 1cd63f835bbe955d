//! A red-black tree with parent links and order-statistic traversal.
//!
//! `RedBlackTree<T>` stores keys in arena-owned nodes and hands out `NodeHandle`s, so callers can
//! search for a node, walk to its successor or predecessor, and delete exactly that node.
//! `RedBlackSet<T>` wraps the tree in a key-addressed set.

#[macro_use]
extern crate serde_derive;

pub mod arena;
mod error;
pub mod red_black_tree;

pub use crate::error::{Error, Result};
pub use crate::red_black_tree::{Color, NodeHandle, RedBlackSet, RedBlackTree, Stats};
