//! Display helpers for charted items.

use billboard_core::{Item, Movement};

const TITLE_HEADERS: [&str; 3] = ["Video Title", "Title", "t"];
const COUNT_HEADERS: [&str; 3] = ["Times Queued", "Queue", "q"];
const ELLIPSIS: &str = "...";

/// Fixed-width two-column text chart of titles and request counts.
///
/// ```
/// use billboard_chart::ChartTable;
///
/// let table = ChartTable::new(10, 7);
/// assert_eq!(table.header(), "--Title---|-Queue-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTable {
    /// Width of the title column, in characters.
    pub title_width: usize,
    /// Width of the count column, in characters.
    pub count_width: usize,
}

impl Default for ChartTable {
    fn default() -> Self {
        Self::new(40, 14)
    }
}

impl ChartTable {
    /// Build a table with the given column widths.
    #[must_use]
    pub const fn new(title_width: usize, count_width: usize) -> Self {
        Self {
            title_width,
            count_width,
        }
    }

    /// Header line: both column names centred and padded with `-`.
    #[must_use]
    pub fn header(&self) -> String {
        format!(
            "{:-^tw$}|{:-^cw$}",
            fitting_header(&TITLE_HEADERS, self.title_width),
            fitting_header(&COUNT_HEADERS, self.count_width),
            tw = self.title_width,
            cw = self.count_width,
        )
    }

    /// One row: the title left-aligned and cut to fit, the count centred.
    #[must_use]
    pub fn row(&self, title: &str, times_requested: u64) -> String {
        format!(
            "{:<tw$}|{:^cw$}",
            self.cut_title(title),
            times_requested,
            tw = self.title_width,
            cw = self.count_width,
        )
    }

    /// Render the header and one row per item, each line ending in `\n`.
    #[must_use]
    pub fn render(&self, items: &[Item]) -> String {
        let mut out = self.header();
        out.push('\n');
        for item in items {
            out.push_str(&self.row(item.display_title(), item.times_requested()));
            out.push('\n');
        }
        out
    }

    fn cut_title(&self, title: &str) -> String {
        if title.chars().count() < self.title_width {
            return title.to_owned();
        }
        let dots = ELLIPSIS.len().min(self.title_width);
        let keep = self.title_width.saturating_sub(dots);
        title
            .chars()
            .take(keep)
            .chain(ELLIPSIS.chars().take(dots))
            .collect()
    }
}

fn fitting_header<'a>(candidates: &[&'a str], width: usize) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|candidate| candidate.len() < width)
        .or_else(|| candidates.last().copied())
        .unwrap_or_default()
}

/// Display data for one place on a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    /// 1-based place in the listing.
    pub place: usize,
    /// Title, or the item id when no title is known.
    pub title: String,
    /// Total requests.
    pub times_requested: u64,
    /// `New!` for a first charted period, otherwise the count.
    pub weeks_on_chart: String,
    /// Previous position, or `-` when the item was not charted.
    pub position_last_period: String,
    /// Direction of travel since the previous period.
    pub movement: Movement,
}

impl ChartEntry {
    /// Describe `item` at `place`.
    #[must_use]
    pub fn new(place: usize, item: &Item) -> Self {
        let weeks_on_chart = match item.weeks_on_chart() {
            Some(weeks) if weeks > 0 => weeks.to_string(),
            _ => String::from("New!"),
        };
        let position_last_period = item
            .position_last_period()
            .map_or_else(|| String::from("-"), |position| position.to_string());
        Self {
            place,
            title: item.display_title().to_owned(),
            times_requested: item.times_requested(),
            weeks_on_chart,
            position_last_period,
            movement: item.movement(),
        }
    }

    /// Entries for `items`, numbered from 1.
    #[must_use]
    pub fn list(items: &[Item]) -> Vec<Self> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Self::new(index.saturating_add(1), item))
            .collect()
    }

    /// Whether this entry holds first place.
    #[must_use]
    pub const fn is_leader(&self) -> bool {
        self.place == 1
    }
}
