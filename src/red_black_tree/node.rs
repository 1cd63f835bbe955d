use crate::arena::Entry;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// One of the two child links of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A struct representing an internal node of a red black tree.
///
/// Links are arena entries. An absent link stands for the black, keyless leaf that terminates
/// every branch; an absent `parent` marks the root.
pub struct Node<T> {
    pub key: T,
    pub color: Color,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
    pub parent: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(key: T, parent: Option<Entry>) -> Self {
        Node {
            key,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn child(&self, side: Side) -> Option<Entry> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<Entry> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
