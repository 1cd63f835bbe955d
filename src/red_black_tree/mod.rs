//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes keep a link to their parent, so successor and predecessor are found without an
//! auxiliary stack and callers can hold `NodeHandle`s to individual nodes.

mod iter;
mod node;
mod set;
mod stats;
mod tree;

pub use self::iter::{Iter, RevIter};
pub use self::node::Color;
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::stats::Stats;
pub use self::tree::{NodeHandle, RedBlackTree};
