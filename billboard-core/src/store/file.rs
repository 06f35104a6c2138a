//! JSON-file implementation of [`ItemStore`].

use camino::{Utf8Path, Utf8PathBuf};

use super::{ItemRecord, ItemStore, ItemStoreError};
use crate::{Item, ItemId};

const RECORD_EXTENSION: &str = "json";

/// Item store keeping one `<id>.json` record per item in a directory.
#[derive(Debug, Clone)]
pub struct FileItemStore {
    dir: Utf8PathBuf,
}

impl FileItemStore {
    /// Open the store rooted at `dir`, creating the directory if absent.
    pub fn open(dir: impl Into<Utf8PathBuf>) -> Result<Self, ItemStoreError> {
        let root = dir.into();
        billboard_fs::ensure_dir(&root).map_err(|source| ItemStoreError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { dir: root })
    }

    /// Directory holding the records.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Location of the record for `id`.
    #[must_use]
    pub fn record_path(&self, id: &ItemId) -> Utf8PathBuf {
        self.dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    fn read_record(&self, id: &ItemId) -> Result<Option<Item>, ItemStoreError> {
        let path = self.record_path(id);
        let exists =
            billboard_fs::file_is_file(&path).or_else(|err| match err.kind() {
                std::io::ErrorKind::NotFound => Ok(false),
                _ => Err(ItemStoreError::Read {
                    path: path.clone(),
                    source: err,
                }),
            })?;
        if !exists {
            return Ok(None);
        }
        let raw = billboard_fs::read_to_string(&path).map_err(|source| ItemStoreError::Read {
            path: path.clone(),
            source,
        })?;
        let record: ItemRecord = serde_json::from_str(&raw)
            .map_err(|source| ItemStoreError::Decode { path, source })?;
        Ok(Some(record.into_item(id.clone())))
    }
}

impl ItemStore for FileItemStore {
    fn load(&self, id: &ItemId) -> Result<Option<Item>, ItemStoreError> {
        self.read_record(id)
    }

    fn list_all(&self) -> Result<Vec<Item>, ItemStoreError> {
        let stems = billboard_fs::list_file_stems(&self.dir, RECORD_EXTENSION).map_err(
            |source| ItemStoreError::List {
                path: self.dir.clone(),
                source,
            },
        )?;
        let mut items = Vec::with_capacity(stems.len());
        for stem in stems {
            let id = match ItemId::new(stem.as_str()) {
                Ok(id) => id,
                Err(err) => {
                    log::warn!("skipping item record `{stem}` in {}: {err}", self.dir);
                    continue;
                }
            };
            if let Some(item) = self.read_record(&id)? {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn persist(&self, item: &Item) -> Result<(), ItemStoreError> {
        let path = self.record_path(item.id());
        let record = ItemRecord::from(item);
        let encoded = serde_json::to_vec_pretty(&record).map_err(|source| {
            ItemStoreError::Encode {
                path: path.clone(),
                source,
            }
        })?;
        billboard_fs::write_atomic(&path, &encoded)
            .map_err(|source| ItemStoreError::Write { path, source })
    }
}
