//! On-disk item record.
//!
//! Uncharted integer fields are written as `-1` and any value `<= 0` reads
//! back as "never charted". Older field names (`times_queued` and friends)
//! are accepted as aliases; only the field names are shared with older data,
//! not its directory layout.

use serde::{Deserialize, Serialize};

use crate::{Item, ItemId};

const UNCHARTED: i64 = -1;

/// Serialised form of an [`Item`], without its id (the id is the file stem).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Display title; `null` or `"null"` mean unknown.
    #[serde(default)]
    pub title: Option<String>,
    /// Request counter.
    #[serde(default, alias = "times_queued")]
    pub times_requested: u64,
    /// Charted periods after the first, or `-1`.
    #[serde(default = "uncharted", alias = "number_of_weeks_on_chart")]
    pub weeks_on_chart: i64,
    /// Current 1-based position, or `-1`.
    #[serde(default = "uncharted", alias = "position_this_week")]
    pub position_this_period: i64,
    /// Previous 1-based position, or `-1`.
    #[serde(default = "uncharted", alias = "position_last_week")]
    pub position_last_period: i64,
    /// Best 1-based position, or `-1`.
    #[serde(default = "uncharted")]
    pub peak_position: i64,
}

const fn uncharted() -> i64 {
    UNCHARTED
}

impl Default for ItemRecord {
    fn default() -> Self {
        Self {
            title: None,
            times_requested: 0,
            weeks_on_chart: UNCHARTED,
            position_this_period: UNCHARTED,
            position_last_period: UNCHARTED,
            peak_position: UNCHARTED,
        }
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            title: item.title().map(str::to_owned),
            times_requested: item.times_requested(),
            weeks_on_chart: encode(item.weeks_on_chart()),
            position_this_period: encode(item.position_this_period()),
            position_last_period: encode(item.position_last_period()),
            peak_position: encode(item.peak_position()),
        }
    }
}

impl ItemRecord {
    /// Attach `id` and convert to a domain item.
    #[must_use]
    pub fn into_item(self, id: ItemId) -> Item {
        Item::from_parts(
            id,
            self.title,
            self.times_requested,
            decode_weeks(self.weeks_on_chart),
            decode_position(self.position_this_period),
            decode_position(self.position_last_period),
            decode_position(self.peak_position),
        )
    }
}

fn encode(value: Option<u32>) -> i64 {
    value.map_or(UNCHARTED, i64::from)
}

fn decode_weeks(raw: i64) -> Option<u32> {
    u32::try_from(raw).ok()
}

// Positions are 1-based; zero never names a chart slot.
fn decode_position(raw: i64) -> Option<u32> {
    u32::try_from(raw).ok().filter(|position| *position > 0)
}
