//! Derived-field reconciliation
//!
//! Keeps paycheck amount, contribution percentage, contribution amount and employer
//! match consistent with each other. Every per-paycheck cent value is a floor
//! division; only the aggregate percentage in [`summarize`] rounds to nearest.

use crate::error::{AllocationError, AllocationResult};
use matchplan_types::{AllocationTotals, PaycheckLine};

/// Highest percentage a single paycheck can contribute.
pub const MAX_PERCENTAGE: i64 = 100;

fn saturate(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// `floor(cents * 100 / amount_cents)`. Callers guarantee `amount_cents > 0`.
pub(crate) fn floor_rate(cents: i64, amount_cents: i64) -> i64 {
    saturate((i128::from(cents) * 100).div_euclid(i128::from(amount_cents)))
}

/// Contribution for a paycheck at a whole percentage: `floor(amount * percentage / 100)`.
pub fn contribution(amount_cents: i64, percentage: i64) -> i64 {
    saturate((i128::from(amount_cents) * i128::from(percentage)).div_euclid(100))
}

/// A percentage derived from a contribution amount, together with the contribution that
/// percentage actually yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedPercentage {
    pub percentage: i64,
    pub contribution_cents: i64,
}

/// Derives the contribution percentage for a paycheck.
///
/// A zero amount yields 0%. Anything above 100% is pinned to 100% and the contribution is
/// recomputed from the pinned percentage; otherwise the contribution is returned as given.
pub fn percentage(amount_cents: i64, contribution_cents: i64) -> DerivedPercentage {
    if amount_cents == 0 {
        return DerivedPercentage { percentage: 0, contribution_cents };
    }

    let raw = floor_rate(contribution_cents, amount_cents);
    if raw > MAX_PERCENTAGE {
        return DerivedPercentage {
            percentage: MAX_PERCENTAGE,
            contribution_cents: contribution(amount_cents, MAX_PERCENTAGE),
        };
    }

    DerivedPercentage { percentage: raw, contribution_cents }
}

/// Employer match for a paycheck. Never more than the employee contributed.
pub fn match_amount(amount_cents: i64, contribution_cents: i64, match_rate_percent: i64) -> i64 {
    contribution(amount_cents, match_rate_percent).min(contribution_cents)
}

/// Smallest paycheck amount whose contribution at `percentage` equals `contribution_cents`.
///
/// Returns `None` at 0%, where every amount contributes nothing.
pub fn paycheck_amount(contribution_cents: i64, percentage: i64) -> Option<i64> {
    if percentage == 0 {
        return None;
    }

    let numerator = i128::from(contribution_cents) * 100;
    let denominator = i128::from(percentage);
    Some(saturate(-(-numerator).div_euclid(denominator)))
}

/// Builds one reconciled line per paycheck from an allocation.
pub fn derive_lines(
    paychecks_cents: &[i64],
    percentages: &[i64],
    match_rate_percent: i64,
) -> AllocationResult<Vec<PaycheckLine>> {
    if paychecks_cents.len() != percentages.len() {
        return Err(AllocationError::invalid_parameter(
            "percentages",
            format!(
                "{} percentages supplied for {} paychecks",
                percentages.len(),
                paychecks_cents.len()
            ),
        ));
    }

    Ok(paychecks_cents
        .iter()
        .zip(percentages)
        .enumerate()
        .map(|(index, (&amount_cents, &percentage))| {
            let contribution_cents = contribution(amount_cents, percentage);
            PaycheckLine {
                index,
                amount_cents,
                percentage,
                contribution_cents,
                match_cents: match_amount(amount_cents, contribution_cents, match_rate_percent),
            }
        })
        .collect())
}

/// Effective contribution rate for a whole schedule, rounded to two decimal places.
pub fn aggregate_percentage(contribution_cents: i64, gross_cents: i64) -> f64 {
    if gross_cents <= 0 {
        return 0.0;
    }

    let rate = contribution_cents as f64 * 100.0 / gross_cents as f64;
    (rate * 100.0).round() / 100.0
}

/// Sums gross pay, contributions and match independently across a schedule.
pub fn summarize(lines: &[PaycheckLine]) -> AllocationTotals {
    let (gross_cents, contribution_cents, match_cents) =
        lines.iter().fold((0i64, 0i64, 0i64), |(gross, contributed, matched), line| {
            (
                gross.saturating_add(line.amount_cents),
                contributed.saturating_add(line.contribution_cents),
                matched.saturating_add(line.match_cents),
            )
        });

    AllocationTotals {
        gross_cents,
        contribution_cents,
        match_cents,
        contribution_percentage: aggregate_percentage(contribution_cents, gross_cents),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_floors() {
        assert_eq!(contribution(2_333_333, 75), 1_749_999);
        assert_eq!(contribution(833_333, 4), 33_333);
        assert_eq!(contribution(0, 50), 0);
    }

    #[test]
    fn percentage_of_zero_amount_is_zero() {
        let derived = percentage(0, 5_000);
        assert_eq!(derived.percentage, 0);
        assert_eq!(derived.contribution_cents, 5_000);
    }

    #[test]
    fn percentage_pins_contribution_at_one_hundred() {
        let derived = percentage(100_000, 250_000);
        assert_eq!(derived, DerivedPercentage { percentage: 100, contribution_cents: 100_000 });
    }

    #[test]
    fn percentage_floors_and_keeps_contribution() {
        let derived = percentage(833_333, 100_000);
        assert_eq!(derived, DerivedPercentage { percentage: 12, contribution_cents: 100_000 });
    }

    #[test]
    fn match_is_capped_by_contribution() {
        assert_eq!(match_amount(1_000_000, 20_000, 4), 20_000);
        assert_eq!(match_amount(1_000_000, 50_000, 4), 40_000);
        assert_eq!(match_amount(1_000_000, 0, 4), 0);
    }

    #[test]
    fn paycheck_amount_inverts_contribution() {
        assert_eq!(paycheck_amount(5_000, 0), None);
        assert_eq!(paycheck_amount(5_000, 5), Some(100_000));
        let amount = paycheck_amount(1_749_999, 75).unwrap();
        assert_eq!(contribution(amount, 75), 1_749_999);
        assert_eq!(contribution(amount - 1, 75), 1_749_998);
    }

    #[test]
    fn aggregate_percentage_rounds_to_nearest_hundredth() {
        assert_eq!(aggregate_percentage(0, 0), 0.0);
        assert_eq!(aggregate_percentage(1, 3), 33.33);
        assert_eq!(aggregate_percentage(2, 3), 66.67);
        assert_eq!(aggregate_percentage(2_449_997, 4_833_332), 50.69);
    }

    #[test]
    fn derive_lines_rejects_mismatched_lengths() {
        let err = derive_lines(&[100_000, 100_000], &[5], 4).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
    }
}
