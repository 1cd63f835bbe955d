use std::error;
use std::fmt;
use std::result;

/// An enum representing the errors reported by a red-black tree.
///
/// `ForeignHandle` and `StaleHandle` report misuse of a `NodeHandle` through the fallible API.
/// The remaining variants are produced by `RedBlackTree::validate` when a red-black invariant does
/// not hold; seeing any of them means the tree is corrupt.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The handle was issued by a different tree.
    ForeignHandle,
    /// The handle refers to a node that has already been removed.
    StaleHandle,
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    ConsecutiveReds,
    /// Two paths from the same node reach a leaf through a different number of black nodes.
    UnbalancedBlacks { left: usize, right: usize },
    /// An in-order neighbour compares out of order.
    SortError,
    /// A child does not point back at its parent.
    BrokenParentLink,
    /// The number of reachable nodes differs from the recorded size.
    SizeMismatch { expected: usize, found: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ForeignHandle => write!(f, "node handle belongs to another tree"),
            Error::StaleHandle => write!(f, "node handle refers to a removed node"),
            Error::RedRoot => write!(f, "root node is red"),
            Error::ConsecutiveReds => write!(f, "red node has a red child"),
            Error::UnbalancedBlacks { left, right } => {
                write!(f, "unbalanced black height: left {} right {}", left, right)
            },
            Error::SortError => write!(f, "keys are not in sorted order"),
            Error::BrokenParentLink => write!(f, "child does not link back to its parent"),
            Error::SizeMismatch { expected, found } => {
                write!(f, "size mismatch: expected {} found {}", expected, found)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
