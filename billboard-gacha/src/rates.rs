//! Odds tables for display.

use std::fmt;

use crate::WeightedPool;

const HUNDREDTHS_PER_WHOLE: u64 = 10_000;

/// Chance of one outcome, in hundredths of a percent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rate {
    /// Outcome label.
    pub label: String,
    /// Outcome weight.
    pub weight: u64,
    /// `weight / maximum_value` as a percentage rounded to two places,
    /// stored in hundredths (`7500` is `75.00%`).
    pub hundredths_of_percent: u64,
}

impl Rate {
    /// The percentage formatted with two decimals, e.g. `33.33%`.
    #[must_use]
    pub fn percentage(&self) -> String {
        let whole = self.hundredths_of_percent.checked_div(100).unwrap_or_default();
        let fraction = self.hundredths_of_percent.checked_rem(100).unwrap_or_default();
        format!("{whole}.{fraction:02}%")
    }
}

/// Every outcome of one pool with its weight and chance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    /// Pool name.
    pub pool: String,
    /// Total weight of the pool.
    pub maximum_value: u64,
    /// One entry per outcome, in draw order.
    pub rates: Vec<Rate>,
}

impl RateTable {
    /// Describe `pool` under `name`.
    #[must_use]
    pub fn new(name: &str, pool: &WeightedPool) -> Self {
        let maximum_value = pool.maximum_value();
        let rates = pool
            .outcomes()
            .iter()
            .map(|outcome| Rate {
                label: outcome.label().to_owned(),
                weight: outcome.weight(),
                hundredths_of_percent: rounded_share(outcome.weight(), maximum_value),
            })
            .collect();
        Self {
            pool: name.to_owned(),
            maximum_value,
            rates,
        }
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gacha rate: {}", self.pool)?;
        for rate in &self.rates {
            writeln!(f, "{}\t{}\t{}", rate.label, rate.weight, rate.percentage())?;
        }
        write!(f, "Maximum weight: {}", self.maximum_value)
    }
}

/// `weight / total` in hundredths of a percent, rounded half up.
fn rounded_share(weight: u64, total: u64) -> u64 {
    let doubled = weight
        .saturating_mul(HUNDREDTHS_PER_WHOLE)
        .saturating_mul(2)
        .saturating_add(total);
    doubled
        .checked_div(total.saturating_mul(2))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn percentages(table: &RateTable) -> Vec<String> {
        table.rates.iter().map(Rate::percentage).collect()
    }

    #[rstest]
    fn shares_round_to_two_places() {
        let pool = WeightedPool::new([("a", 1), ("b", 2)]);

        let table = RateTable::new("thirds", &pool);

        assert_eq!(table.maximum_value, 3);
        assert_eq!(percentages(&table), vec!["33.33%", "66.67%"]);
    }

    #[rstest]
    #[case(1, 10, 1_000)]
    #[case(9, 10, 9_000)]
    #[case(3, 4, 7_500)]
    #[case(1, 8, 1_250)]
    #[case(0, 5, 0)]
    #[case(0, 0, 0)]
    fn rounded_share_cases(#[case] weight: u64, #[case] total: u64, #[case] expected: u64) {
        assert_eq!(rounded_share(weight, total), expected);
    }

    #[rstest]
    fn display_lists_every_outcome() {
        let pool = WeightedPool::new([("play", 1), ("skip", 9)]);

        let rendered = RateTable::new("gacha_example", &pool).to_string();

        assert_eq!(
            rendered,
            "Gacha rate: gacha_example\nplay\t1\t10.00%\nskip\t9\t90.00%\nMaximum weight: 10"
        );
    }
}
