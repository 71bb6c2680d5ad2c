use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Allocation strategy used to spread contributions across a plan year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// A single percentage for every paycheck, with one-point bumps for leftover budget.
    Uniform,
    /// Contribute as much as possible as early as possible.
    Frontload,
    /// Dollar-cost averaging: an even dollar target across remaining paychecks.
    Dca,
}

impl Strategy {
    /// Every recognized strategy, in the order they are presented to users.
    pub const ALL: [Self; 3] = [Self::Frontload, Self::Dca, Self::Uniform];

    /// The identifier used on the command line, in configuration and in JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Frontload => "frontload",
            Self::Dca => "dca",
        }
    }

    /// Human-readable summary of what the strategy tries to achieve.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Frontload => {
                "Frontloading attempts to contribute as much as possible, as early in the \
                 year as possible, while maximizing the employer match."
            }
            Self::Dca => {
                "Dollar-cost averaging attempts to make roughly equal contributions \
                 throughout the year, while maximizing the employer match."
            }
            Self::Uniform => {
                "Uniform-percentage contribution attempts to invest a consistent portion of \
                 gross pay. This is useful for choosing and setting a single deduction rate \
                 at the beginning of the year."
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a strategy identifier is not one of `uniform`, `frontload` or `dca`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized strategy '{value}' (expected uniform, frontload or dca)")]
pub struct ParseStrategyError {
    /// The rejected identifier, as supplied.
    pub value: String,
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "frontload" => Ok(Self::Frontload),
            "dca" => Ok(Self::Dca),
            _ => Err(ParseStrategyError { value: s.to_string() }),
        }
    }
}

/// How often paychecks are issued during the plan year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayFrequency {
    /// 52 paychecks.
    Weekly,
    /// 26 paychecks.
    Biweekly,
    /// 24 paychecks.
    Semimonthly,
    /// 12 paychecks.
    Monthly,
    /// 4 paychecks.
    #[default]
    Quarterly,
}

impl PayFrequency {
    /// Number of paychecks in one plan year.
    pub const fn periods(self) -> usize {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Semimonthly => 24,
            Self::Monthly => 12,
            Self::Quarterly => 4,
        }
    }

    /// The identifier used on the command line and in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Semimonthly => "semimonthly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a pay frequency identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized pay frequency '{value}'")]
pub struct ParseFrequencyError {
    /// The rejected identifier, as supplied.
    pub value: String,
}

impl FromStr for PayFrequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "semimonthly" => Ok(Self::Semimonthly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            _ => Err(ParseFrequencyError { value: s.to_string() }),
        }
    }
}

/// Inputs to one allocation request, apart from the paychecks themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationParameters {
    /// Annual elective-deferral ceiling, in cents.
    pub annual_limit_cents: i64,
    /// Minimum percentage the employer matches on every paycheck.
    pub match_rate_percent: i64,
    /// Largest percentage any single paycheck may have withheld.
    pub max_rate_percent: i64,
    /// How contributions are spread across the year.
    pub strategy: Strategy,
}

impl AllocationParameters {
    /// Bundles the allocation inputs. Validation happens when the engine runs.
    pub const fn new(
        annual_limit_cents: i64,
        match_rate_percent: i64,
        max_rate_percent: i64,
        strategy: Strategy,
    ) -> Self {
        Self { annual_limit_cents, match_rate_percent, max_rate_percent, strategy }
    }
}

impl Default for AllocationParameters {
    fn default() -> Self {
        Self::new(2_450_000, 4, 75, Strategy::Frontload)
    }
}

/// Errors raised while assembling a [`PaycheckSeries`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// A plan year needs at least one paycheck.
    #[error("a paycheck series needs at least one period")]
    Empty,
    /// More amounts were supplied than there are pay periods.
    #[error("{supplied} paycheck amounts supplied for {periods} pay periods")]
    TooManyAmounts {
        /// Number of amounts supplied.
        supplied: usize,
        /// Number of pay periods requested.
        periods: usize,
    },
}

/// Ordered paycheck amounts in cents; index 0 is the first paycheck of the plan year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaycheckSeries(Vec<i64>);

impl PaycheckSeries {
    /// Wraps amounts that are already in pay-period order.
    pub const fn new(amounts_cents: Vec<i64>) -> Self {
        Self(amounts_cents)
    }

    /// Builds a series of `periods` paychecks, carrying each supplied amount forward into
    /// the following blank (missing or zero) periods. Blank periods before the first
    /// supplied amount stay at zero.
    pub fn fill_forward(amounts_cents: &[Option<i64>], periods: usize) -> Result<Self, SeriesError> {
        if periods == 0 {
            return Err(SeriesError::Empty);
        }
        if amounts_cents.len() > periods {
            return Err(SeriesError::TooManyAmounts { supplied: amounts_cents.len(), periods });
        }

        let mut previous = 0;
        let amounts = (0..periods)
            .map(|i| {
                match amounts_cents.get(i).copied().flatten().filter(|&cents| cents != 0) {
                    Some(cents) => {
                        previous = cents;
                        cents
                    }
                    None => previous,
                }
            })
            .collect();

        Ok(Self(amounts))
    }

    /// The amounts as a slice.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Number of paychecks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the series holds no paychecks.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all paycheck amounts, or `None` when it leaves the i64 range.
    pub fn total_cents(&self) -> Option<i64> {
        self.0.iter().try_fold(0i64, |total, &amount| total.checked_add(amount))
    }

    /// Consumes the series, returning the amounts.
    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }
}

impl From<Vec<i64>> for PaycheckSeries {
    fn from(amounts_cents: Vec<i64>) -> Self {
        Self(amounts_cents)
    }
}

impl AsRef<[i64]> for PaycheckSeries {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

/// One reconciled row of a contribution schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycheckLine {
    /// Zero-based pay period index.
    pub index: usize,
    /// Eligible compensation for the period, in cents.
    pub amount_cents: i64,
    /// Whole-number contribution percentage.
    pub percentage: i64,
    /// Employee contribution, in cents.
    pub contribution_cents: i64,
    /// Employer matching contribution, in cents.
    pub match_cents: i64,
}

/// Sums across a contribution schedule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationTotals {
    /// Total eligible compensation, in cents.
    pub gross_cents: i64,
    /// Total employee contribution, in cents.
    pub contribution_cents: i64,
    /// Total employer match, in cents.
    pub match_cents: i64,
    /// Effective contribution rate rounded to two decimal places. Display only.
    pub contribution_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Frontload".parse::<Strategy>(), Ok(Strategy::Frontload));
        assert_eq!(" dca ".parse::<Strategy>(), Ok(Strategy::Dca));
        assert_eq!("UNIFORM".parse::<Strategy>(), Ok(Strategy::Uniform));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = "greedy".parse::<Strategy>().unwrap_err();
        assert_eq!(err.value, "greedy");
        assert!(err.to_string().contains("greedy"));
    }

    #[test]
    fn strategy_round_trips_through_display() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
            assert!(!strategy.description().is_empty());
        }
    }

    #[test]
    fn strategy_serializes_lowercase() {
        let json = serde_json::to_string(&Strategy::Dca).unwrap();
        assert_eq!(json, "\"dca\"");
        let parsed: Strategy = serde_json::from_str("\"frontload\"").unwrap();
        assert_eq!(parsed, Strategy::Frontload);
    }

    #[test]
    fn pay_frequency_periods() {
        assert_eq!(PayFrequency::Weekly.periods(), 52);
        assert_eq!(PayFrequency::Biweekly.periods(), 26);
        assert_eq!(PayFrequency::Semimonthly.periods(), 24);
        assert_eq!(PayFrequency::Monthly.periods(), 12);
        assert_eq!(PayFrequency::default().periods(), 4);
        assert_eq!("monthly".parse::<PayFrequency>(), Ok(PayFrequency::Monthly));
        assert!("fortnightly".parse::<PayFrequency>().is_err());
    }

    #[test]
    fn fill_forward_carries_amounts_into_blank_periods() {
        let series =
            PaycheckSeries::fill_forward(&[Some(2_333_333), Some(833_333)], 4).unwrap();
        assert_eq!(series.as_slice(), &[2_333_333, 833_333, 833_333, 833_333]);
    }

    #[test]
    fn fill_forward_treats_zero_as_blank_and_keeps_leading_zeros() {
        let series =
            PaycheckSeries::fill_forward(&[None, Some(50_000), Some(0), Some(70_000)], 5).unwrap();
        assert_eq!(series.as_slice(), &[0, 50_000, 50_000, 70_000, 70_000]);
    }

    #[test]
    fn fill_forward_rejects_bad_shapes() {
        assert_eq!(PaycheckSeries::fill_forward(&[], 0), Err(SeriesError::Empty));
        assert_eq!(
            PaycheckSeries::fill_forward(&[Some(1), Some(2), Some(3)], 2),
            Err(SeriesError::TooManyAmounts { supplied: 3, periods: 2 })
        );
    }

    #[test]
    fn series_totals() {
        let series = PaycheckSeries::from(vec![100_000, 250_050]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.total_cents(), Some(350_050));
        assert_eq!(series.into_inner(), vec![100_000, 250_050]);
    }

    #[test]
    fn series_total_reports_overflow() {
        let series = PaycheckSeries::from(vec![i64::MAX, 1]);
        assert_eq!(series.total_cents(), None);
    }
}
