//! Durable per-tenant storage for [`Item`] records.
//!
//! The [`ItemStore`] trait is the seam between leaderboards and storage.
//! [`FileItemStore`] keeps one JSON record per item under a directory;
//! tests can substitute an in-memory store from `test_support`.

mod error;
mod file;
mod record;

pub use error::ItemStoreError;
pub use file::FileItemStore;
pub use record::ItemRecord;

use crate::{Item, ItemId};

/// Create-or-load persistence for items keyed by id.
///
/// # Examples
/// ```
/// use billboard_core::{FileItemStore, ItemId, ItemStore};
/// use camino::Utf8PathBuf;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 path");
/// let store = FileItemStore::open(root.join("items")).expect("open store");
/// let id = ItemId::new("v1").expect("valid id");
/// let mut item = store.get_or_create(&id, Some("Song")).expect("load");
/// item.record_request();
/// store.persist(&item).expect("persist");
/// assert_eq!(store.list_all().expect("list").len(), 1);
/// ```
pub trait ItemStore: Send + Sync {
    /// Load the stored record for `id`, if any.
    fn load(&self, id: &ItemId) -> Result<Option<Item>, ItemStoreError>;

    /// Return every stored item in ascending id order.
    fn list_all(&self) -> Result<Vec<Item>, ItemStoreError>;

    /// Durably write the full record for `item`.
    fn persist(&self, item: &Item) -> Result<(), ItemStoreError>;

    /// Load `id`, or start a fresh record, then apply the sticky-title rule.
    ///
    /// Nothing is written; callers persist after mutating.
    fn get_or_create(
        &self,
        id: &ItemId,
        fallback_title: Option<&str>,
    ) -> Result<Item, ItemStoreError> {
        let mut item = self
            .load(id)?
            .unwrap_or_else(|| Item::new(id.clone(), None));
        item.resolve_title(fallback_title);
        Ok(item)
    }
}

#[cfg(test)]
mod tests;
