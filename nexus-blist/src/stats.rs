//! Structural snapshot of a list.

use core::fmt;

/// Shape of a [`BList`](crate::BList) at one point in time.
///
/// Returned by [`BList::stats`](crate::BList::stats). `Default` is all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BListStats {
    /// Size of one block in bytes.
    pub node_size: usize,
    /// Number of blocks in the chain.
    pub node_count: usize,
    /// Values each block can hold.
    pub array_size: usize,
    /// Number of values in the list.
    pub item_count: usize,
}

impl BListStats {
    /// Fraction of block slots in use, `0.0` for an empty list.
    pub fn fill_ratio(&self) -> f64 {
        let slots = self.node_count * self.array_size;
        if slots == 0 {
            return 0.0;
        }
        self.item_count as f64 / slots as f64
    }
}

impl fmt::Display for BListStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items in {} nodes ({} slots, {} bytes each)",
            self.item_count, self.node_count, self.array_size, self.node_size
        )
    }
}
