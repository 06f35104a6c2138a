//! Test doubles for item storage and time.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use crate::{Clock, Item, ItemId, ItemStore, ItemStoreError};

/// In-memory `ItemStore` used in tests.
///
/// Items are kept in a `BTreeMap`, so `list_all` returns them in id order
/// like the file store does.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: Mutex<BTreeMap<ItemId, Item>>,
}

impl MemoryItemStore {
    /// Create a store pre-populated with `items`.
    #[must_use]
    pub fn with_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Self {
            items: Mutex::new(
                items
                    .into_iter()
                    .map(|item| (item.id().clone(), item))
                    .collect(),
            ),
        }
    }
}

impl ItemStore for MemoryItemStore {
    fn load(&self, id: &ItemId) -> Result<Option<Item>, ItemStoreError> {
        Ok(self.items.lock().get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Item>, ItemStoreError> {
        Ok(self.items.lock().values().cloned().collect())
    }

    fn persist(&self, item: &Item) -> Result<(), ItemStoreError> {
        self.items.lock().insert(item.id().clone(), item.clone());
        Ok(())
    }
}

/// Clock whose time only changes when a test moves it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Start the clock at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(crate::clock::truncate_to_seconds(start))),
        }
    }

    /// Jump to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = crate::clock::truncate_to_seconds(instant);
    }

    /// Move forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
