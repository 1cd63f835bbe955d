use crate::arena::Entry;
use crate::red_black_tree::node::Side;
use crate::red_black_tree::tree::RedBlackTree;

// Walks the tree one in-order step at a time towards `side`.
struct Walk<'a, T> {
    tree: &'a RedBlackTree<T>,
    next: Option<Entry>,
    remaining: usize,
    side: Side,
}

impl<'a, T> Walk<'a, T> {
    fn new(tree: &'a RedBlackTree<T>, start: Option<Entry>, side: Side) -> Self {
        Walk {
            tree,
            next: start,
            remaining: tree.len(),
            side,
        }
    }

    fn next(&mut self) -> Option<&'a T> {
        let entry = self.next?;
        self.next = self.tree.step(entry, self.side);
        self.remaining -= 1;
        Some(&self.tree.node(entry).key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// An iterator for `RedBlackTree<T>`.
///
/// This iterator walks the tree from its minimum through successor links and yields immutable
/// references to the keys in ascending order.
pub struct Iter<'a, T> {
    walk: Walk<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RedBlackTree<T>, start: Option<Entry>) -> Self {
        Iter {
            walk: Walk::new(tree, start, Side::Right),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> where T: 'a {}

/// A reverse iterator for `RedBlackTree<T>`.
///
/// This iterator walks the tree from its maximum through predecessor links and yields immutable
/// references to the keys in descending order.
pub struct RevIter<'a, T> {
    walk: Walk<'a, T>,
}

impl<'a, T> RevIter<'a, T> {
    pub(crate) fn new(tree: &'a RedBlackTree<T>, start: Option<Entry>) -> Self {
        RevIter {
            walk: Walk::new(tree, start, Side::Left),
        }
    }
}

impl<'a, T> Iterator for RevIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for RevIter<'a, T> where T: 'a {}

#[cfg(test)]
mod tests {
    use crate::red_black_tree::tree::RedBlackTree;

    #[test]
    fn test_iter_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter_rev().next(), None);
    }

    #[test]
    fn test_iter_len() {
        let mut tree = RedBlackTree::new();
        for key in 0..10 {
            tree.insert(key);
        }

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        assert_eq!(iter.len(), 9);
        assert_eq!(tree.iter_rev().len(), 10);
    }

    #[test]
    fn test_iter_rev_is_reverse_of_iter() {
        let mut tree = RedBlackTree::new();
        for key in &[9, 2, 7, 2, 5, 0, 9] {
            tree.insert(*key);
        }

        let mut forward: Vec<&u32> = tree.iter().collect();
        forward.reverse();
        assert_eq!(tree.iter_rev().collect::<Vec<&u32>>(), forward);
    }

    #[test]
    fn test_into_iter_ref() {
        let mut tree = RedBlackTree::new();
        tree.insert(3);
        tree.insert(1);

        let mut keys = Vec::new();
        for key in &tree {
            keys.push(*key);
        }
        assert_eq!(keys, vec![1, 3]);
    }
}
