//! Chunked slab that owns the nodes of a tree.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object allocated in a `TypedArena<T>`.
///
/// Every slot carries a generation that is bumped when the slot is freed, so an `Entry` that
/// outlives its object never resolves to whatever is allocated in that slot afterwards.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
    generation: u64,
}

enum Block<T> {
    Occupied { generation: u64, value: T },
    Vacant { generation: u64, next: Option<(usize, usize)> },
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// All objects inside the arena are dropped when the arena is dropped or cleared. Freed slots are
/// threaded onto a free list and reused by later allocations. The arena grows one chunk at a
/// time, so existing objects are never moved by a reallocation of the backing storage of another
/// chunk.
///
/// # Examples
///
/// ```
/// use rbtree_index::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<(usize, usize)>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_position(&self, entry: &Entry) -> bool {
        entry.chunk_index < self.chunks.len()
            && entry.block_index < self.chunks[entry.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::arena::TypedArena;
    ///
    /// // creates a new TypedArena<T> that contains a maximum of 1024 u32's per chunk
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be positive.");
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            size: 0,
            capacity: 0,
        }
    }

    /// Allocates an object in the typed arena and returns an `Entry`. The `Entry` can later be
    /// used to retrieve mutable and immutable references to the object, and to deallocate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Entry {
        match self.head.take() {
            None => {
                if self.size == self.capacity {
                    self.chunks.push(Vec::with_capacity(self.chunk_size));
                    self.capacity += self.chunk_size;
                }
                self.size += 1;

                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied { generation: 0, value });
                Entry {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                    generation: 0,
                }
            },
            Some((chunk_index, block_index)) => {
                self.size += 1;
                let block = &mut self.chunks[chunk_index][block_index];
                let generation = match *block {
                    Block::Vacant { generation, next } => {
                        self.head = next;
                        generation
                    },
                    Block::Occupied { .. } => panic!("Error: free list points at an occupied block."),
                };
                *block = Block::Occupied { generation, value };
                Entry {
                    chunk_index,
                    block_index,
                    generation,
                }
            },
        }
    }

    /// Deallocates an object in the typed arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if entry corresponds to an invalid, vacant or reused slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        if !self.contains(entry) {
            panic!("Error: attempting to free invalid block.");
        }
        let vacant = Block::Vacant {
            generation: entry.generation.wrapping_add(1),
            next: self.head.take(),
        };
        let old_block = mem::replace(&mut self.chunks[entry.chunk_index][entry.block_index], vacant);
        self.head = Some((entry.chunk_index, entry.block_index));
        self.size -= 1;
        match old_block {
            Block::Occupied { value, .. } => value,
            Block::Vacant { .. } => unreachable!(),
        }
    }

    /// Returns `true` if the entry refers to a live object in this arena.
    pub fn contains(&self, entry: &Entry) -> bool {
        self.get(entry).is_some()
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_index::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        if !self.is_valid_position(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied { generation, ref value } if generation == entry.generation => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        if !self.is_valid_position(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied { generation, ref mut value } if generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drops every object. Chunks are kept for reuse and every outstanding `Entry` goes stale.
    pub fn clear(&mut self) {
        self.head = None;
        for (chunk_index, chunk) in self.chunks.iter_mut().enumerate() {
            for (block_index, block) in chunk.iter_mut().enumerate() {
                let generation = match *block {
                    Block::Occupied { generation, .. } => generation.wrapping_add(1),
                    Block::Vacant { generation, .. } => generation,
                };
                *block = Block::Vacant {
                    generation,
                    next: self.head,
                };
                self.head = Some((chunk_index, block_index));
            }
        }
        self.size = 0;
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use super::TypedArena;

    fn entry(chunk_index: usize, block_index: usize, generation: u64) -> Entry {
        Entry {
            chunk_index,
            block_index,
            generation,
        }
    }

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(&entry(0, 0, 0));
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        arena.free(&x);
        arena.free(&x);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        assert_eq!(arena.allocate(0), entry(0, 0, 0));
        assert_eq!(arena.allocate(0), entry(0, 1, 0));
        assert_eq!(arena.allocate(0), entry(1, 0, 0));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_free_reuses_slot_with_new_generation() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(7);
        assert_eq!(arena.free(&x), 7);
        assert!(arena.is_empty());

        let y = arena.allocate(8);
        assert_eq!(y, entry(0, 0, 1));
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.get(&y), Some(&8));
    }

    #[test]
    #[should_panic]
    fn test_free_stale_entry() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        arena.free(&x);
        arena.allocate(1);
        arena.free(&x);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(1024);
        let x = arena.allocate(0);
        *arena.get_mut(&x).unwrap() = 1;
        assert_eq!(arena.get(&x), Some(&1));
        assert_eq!(arena.get_mut(&entry(0, 1, 0)), None);
    }

    #[test]
    fn test_clear() {
        let mut arena = TypedArena::new(2);
        let x = arena.allocate(0);
        arena.allocate(1);
        arena.allocate(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.allocate(3), entry(1, 0, 1));
        assert_eq!(arena.allocate(4), entry(0, 1, 1));
        assert_eq!(arena.allocate(5), entry(0, 0, 1));
        assert_eq!(arena.get(&x), None);
        assert_eq!(arena.allocate(6), entry(1, 1, 0));
    }
}
