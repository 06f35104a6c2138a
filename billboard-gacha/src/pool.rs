//! Weighted outcome pools and the cumulative-ceiling draw.

use rand::Rng;
use serde_json::{Map, Value};

/// One outcome in a [`WeightedPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    label: String,
    weight: u64,
    ceiling: u64,
}

impl Outcome {
    /// Outcome label, usually a command line.
    #[must_use]
    pub const fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Relative weight; zero means the outcome is never drawn.
    #[must_use]
    pub const fn weight(&self) -> u64 {
        self.weight
    }

    /// Sum of this weight and every weight before it.
    #[must_use]
    pub const fn ceiling(&self) -> u64 {
        self.ceiling
    }
}

/// Ordered outcomes with cumulative weight ceilings.
///
/// A draw rolls a uniform integer in `0..maximum_value` and returns the first
/// outcome whose ceiling exceeds the roll.
///
/// ```
/// use billboard_gacha::WeightedPool;
///
/// let pool = WeightedPool::new([("play", 1), ("skip", 9)]);
/// assert_eq!(pool.maximum_value(), 10);
/// assert_eq!(pool.select(0), Some("play"));
/// assert_eq!(pool.select(1), Some("skip"));
/// assert_eq!(pool.select(10), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedPool {
    outcomes: Vec<Outcome>,
    maximum_value: u64,
}

impl WeightedPool {
    /// Build a pool from `(label, weight)` pairs, keeping their order.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut ceiling: u64 = 0;
        let mut outcomes = Vec::new();
        for (label, weight) in entries {
            ceiling = ceiling.saturating_add(weight);
            outcomes.push(Outcome {
                label: label.into(),
                weight,
                ceiling,
            });
        }
        Self {
            outcomes,
            maximum_value: ceiling,
        }
    }

    /// Build pool `name` from a JSON object of `label: weight` entries.
    ///
    /// Weights that are not non-negative integers (or strings holding one)
    /// are logged and counted as zero.
    pub(crate) fn from_json(name: &str, entries: &Map<String, Value>) -> Self {
        Self::new(
            entries
                .iter()
                .map(|(label, raw)| (label.as_str(), parse_weight(name, label, raw))),
        )
    }

    /// Total weight of every outcome.
    #[must_use]
    pub const fn maximum_value(&self) -> u64 {
        self.maximum_value
    }

    /// Outcomes in draw order.
    #[must_use]
    pub const fn outcomes(&self) -> &[Outcome] {
        self.outcomes.as_slice()
    }

    /// Whether any outcome can be drawn.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        self.maximum_value > 0
    }

    /// Outcome for a roll in `0..maximum_value`; `None` when out of range.
    #[must_use]
    pub fn select(&self, rolled: u64) -> Option<&str> {
        if rolled >= self.maximum_value {
            return None;
        }
        let index = self
            .outcomes
            .partition_point(|outcome| outcome.ceiling <= rolled);
        self.outcomes.get(index).map(Outcome::label)
    }

    /// Draw one outcome; `None` when the pool has no weight.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if !self.is_drawable() {
            return None;
        }
        let rolled = rng.gen_range(0..self.maximum_value);
        log::debug!("rolled {rolled} of {}", self.maximum_value);
        self.select(rolled)
    }
}

fn parse_weight(pool: &str, label: &str, raw: &Value) -> u64 {
    let parsed = match raw {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        log::warn!("unable to parse weight {raw} for `{label}` in pool `{pool}`; using 0");
        0
    })
}
