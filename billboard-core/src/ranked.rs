//! Popularity ordering over a set of items.

use crate::Item;

/// Items ordered by descending `times_requested`.
///
/// Ordering is rebuilt in full from each new input; the sort is stable, so
/// items with equal counts keep their input order.
#[derive(Debug, Default, Clone)]
pub struct RankedSet {
    items: Vec<Item>,
}

impl RankedSet {
    /// Build a ranked set from `items`.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut ranked = Self::default();
        ranked.rebuild(items);
        ranked
    }

    /// Replace the contents with `items` and re-sort.
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items = items.into_iter().collect();
        self.items
            .sort_by(|a, b| b.times_requested().cmp(&a.times_requested()));
    }

    /// Borrow the `k` most requested items, or all of them if fewer exist.
    #[must_use]
    pub fn top_k(&self, k: usize) -> &[Item] {
        let end = k.min(self.items.len());
        self.items.get(..end).unwrap_or(&[])
    }

    /// Consume the set, keeping the `k` most requested items.
    #[must_use]
    pub fn into_top_k(mut self, k: usize) -> Vec<Item> {
        self.items.truncate(k);
        self.items
    }

    /// Number of ranked items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are ranked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over every item, most requested first.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}
