//! Trackable items and their chart history.

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Legacy placeholder title meaning "unknown".
const PLACEHOLDER_TITLE: &str = "null";

/// Description of a requested item as delivered by the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Stable identifier of the requested item.
    pub id: ItemId,
    /// Display title, if the event source knows one.
    pub title: Option<String>,
}

impl ItemInfo {
    /// Build an event for `id` with an optional title.
    #[must_use]
    pub const fn new(id: ItemId, title: Option<String>) -> Self {
        Self { id, title }
    }
}

/// Direction an item moved between two charted periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// No previous position: the item is new to the chart.
    New,
    /// The item climbed to a better (numerically smaller) position.
    Up,
    /// The item fell to a worse position.
    Down,
    /// The position did not change.
    Steady,
}

/// Persisted state for one trackable entity.
///
/// Positions are 1-based and lower is better. Chart fields stay `None` until
/// a recompute places the item in a leaderboard's top entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    title: Option<String>,
    times_requested: u64,
    weeks_on_chart: Option<u32>,
    position_this_period: Option<u32>,
    position_last_period: Option<u32>,
    peak_position: Option<u32>,
}

impl Item {
    /// Create a fresh, never-requested item.
    #[must_use]
    pub fn new(id: ItemId, title: Option<String>) -> Self {
        Self {
            id,
            title: title.and_then(normalise_title),
            times_requested: 0,
            weeks_on_chart: None,
            position_this_period: None,
            position_last_period: None,
            peak_position: None,
        }
    }

    /// Set the request counter, for seeding tests and migrations.
    #[must_use]
    pub fn with_times_requested(mut self, times_requested: u64) -> Self {
        self.times_requested = times_requested;
        self
    }

    /// Restore every field from persisted storage.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the persisted record one field at a time"
    )]
    pub(crate) fn from_parts(
        id: ItemId,
        title: Option<String>,
        times_requested: u64,
        weeks_on_chart: Option<u32>,
        position_this_period: Option<u32>,
        position_last_period: Option<u32>,
        peak_position: Option<u32>,
    ) -> Self {
        Self {
            id,
            title: title.and_then(normalise_title),
            times_requested,
            weeks_on_chart,
            position_this_period,
            position_last_period,
            peak_position,
        }
    }

    /// Adopt `fallback` as the title unless a real title is already stored.
    ///
    /// Returns `true` when the title changed.
    pub fn resolve_title(&mut self, fallback: Option<&str>) -> bool {
        if self.title.is_some() {
            return false;
        }
        self.title = fallback.and_then(|raw| normalise_title(raw.to_owned()));
        self.title.is_some()
    }

    /// Count one request.
    pub fn record_request(&mut self) {
        self.times_requested = self.times_requested.saturating_add(1);
    }

    /// Record this period's 1-based chart position.
    ///
    /// The previous position rolls into `position_last_period`, weeks on chart
    /// starts at zero on first entry and increments afterwards, and the peak
    /// keeps the best position seen.
    pub fn record_chart_position(&mut self, position: u32) {
        self.position_last_period = self.position_this_period;
        self.position_this_period = Some(position);
        self.weeks_on_chart = Some(self.weeks_on_chart.map_or(0, |weeks| weeks.saturating_add(1)));
        self.peak_position = Some(
            self.peak_position
                .map_or(position, |peak| peak.min(position)),
        );
    }

    /// Compare this period's position against the last one.
    #[must_use]
    pub const fn movement(&self) -> Movement {
        match (self.position_this_period, self.position_last_period) {
            (_, None) | (None, Some(_)) => Movement::New,
            (Some(this), Some(last)) if this < last => Movement::Up,
            (Some(this), Some(last)) if this > last => Movement::Down,
            _ => Movement::Steady,
        }
    }

    /// Title for display, falling back to the item id.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Item identifier.
    #[must_use]
    pub const fn id(&self) -> &ItemId {
        &self.id
    }

    /// Stored title, if known.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Total number of recorded requests.
    #[must_use]
    pub const fn times_requested(&self) -> u64 {
        self.times_requested
    }

    /// Charted periods after the first; `None` until first charted.
    #[must_use]
    pub const fn weeks_on_chart(&self) -> Option<u32> {
        self.weeks_on_chart
    }

    /// Position at the most recent recompute that charted the item.
    #[must_use]
    pub const fn position_this_period(&self) -> Option<u32> {
        self.position_this_period
    }

    /// Position at the charted period before that.
    #[must_use]
    pub const fn position_last_period(&self) -> Option<u32> {
        self.position_last_period
    }

    /// Best position ever recorded.
    #[must_use]
    pub const fn peak_position(&self) -> Option<u32> {
        self.peak_position
    }
}

fn normalise_title(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_TITLE {
        None
    } else {
        Some(raw)
    }
}
