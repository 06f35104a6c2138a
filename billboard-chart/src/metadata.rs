//! Persisted leaderboard metadata.

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use billboard_core::ItemId;
use billboard_core::clock::{compact_timestamp, never};

use crate::LeaderboardError;

/// State written to a board's `info.json` after each recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMetadata {
    /// When the ranking was last rebuilt; the Unix epoch means never.
    #[serde(
        with = "compact_timestamp",
        default = "never",
        alias = "date_last_calculated"
    )]
    pub last_recomputed_at: DateTime<Utc>,
    /// Charted item ids, most requested first.
    #[serde(
        default,
        deserialize_with = "valid_ids",
        alias = "song_ids_ordered_by_most_to_least_queued"
    )]
    pub ordered_item_ids: Vec<ItemId>,
}

impl Default for BoardMetadata {
    fn default() -> Self {
        Self {
            last_recomputed_at: never(),
            ordered_item_ids: Vec::new(),
        }
    }
}

impl BoardMetadata {
    /// Read metadata from `path`, or `None` when the file is absent.
    pub(crate) fn load(path: &Utf8Path) -> Result<Option<Self>, LeaderboardError> {
        let exists = billboard_fs::file_is_file(path).or_else(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Ok(false)
            } else {
                Err(LeaderboardError::ReadMetadata {
                    path: path.to_owned(),
                    source: err,
                })
            }
        })?;
        if !exists {
            return Ok(None);
        }
        let raw =
            billboard_fs::read_to_string(path).map_err(|source| LeaderboardError::ReadMetadata {
                path: path.to_owned(),
                source,
            })?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| LeaderboardError::DecodeMetadata {
                path: path.to_owned(),
                source,
            })
    }

    /// Atomically write metadata to `path`.
    pub(crate) fn save(&self, path: &Utf8Path) -> Result<(), LeaderboardError> {
        let encoded =
            serde_json::to_vec_pretty(self).map_err(|source| LeaderboardError::EncodeMetadata {
                path: path.to_owned(),
                source,
            })?;
        billboard_fs::write_atomic(path, &encoded).map_err(|source| {
            LeaderboardError::WriteMetadata {
                path: path.to_owned(),
                source,
            }
        })
    }
}

fn valid_ids<'de, D>(deserializer: D) -> Result<Vec<ItemId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match ItemId::new(value) {
            Ok(id) => Some(id),
            Err(err) => {
                log::warn!("dropping charted item id: {err}");
                None
            }
        })
        .collect())
}
