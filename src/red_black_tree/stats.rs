/// Shape statistics gathered by `RedBlackTree::validate`.
///
/// Depths are measured at the empty links that terminate every branch, so a tree with `n` keys
/// contributes `n + 1` samples.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Stats {
    entries: usize,
    black_height: usize,
    samples: usize,
    min_depth: usize,
    max_depth: usize,
    total_depth: usize,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn count_entry(&mut self) {
        self.entries += 1;
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        if self.samples == 0 || depth < self.min_depth {
            self.min_depth = depth;
        }
        if depth > self.max_depth {
            self.max_depth = depth;
        }
        self.samples += 1;
        self.total_depth += depth;
    }

    pub(crate) fn set_black_height(&mut self, black_height: usize) {
        self.black_height = black_height;
    }

    /// Return number of keys in the tree.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return number of black nodes on every path from the root to a leaf.
    pub fn black_height(&self) -> usize {
        self.black_height
    }

    /// Return minimum leaf depth.
    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    /// Return maximum leaf depth, which is the height of the tree.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the average leaf depth, rounded down.
    pub fn mean_depth(&self) -> usize {
        if self.samples == 0 {
            0
        } else {
            self.total_depth / self.samples
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Stats;

    #[test]
    fn test_sample() {
        let mut stats = Stats::new();
        stats.sample(3);
        stats.sample(1);
        stats.sample(2);
        assert_eq!(stats.min_depth(), 1);
        assert_eq!(stats.max_depth(), 3);
        assert_eq!(stats.mean_depth(), 2);
    }

    #[test]
    fn test_empty() {
        let stats = Stats::new();
        assert_eq!(stats.entries(), 0);
        assert_eq!(stats.mean_depth(), 0);
    }
}
