//! Allocation engine
//!
//! Turns a plan year of paychecks into one whole-number contribution percentage per
//! paycheck. Three strategies are supported:
//!
//! - **uniform**: the largest single percentage whose floor-rounded contributions fit the
//!   annual limit, followed by a left-to-right pass that bumps paychecks by one point
//!   while budget remains.
//! - **frontload**: each paycheck takes as much as the remaining budget allows once the
//!   minimum match for every later paycheck has been reserved.
//! - **dca**: like frontload, but each paycheck aims at an even share of what is left.
//!
//! The engine is a pure function. Working arrays are local to each call.

use crate::error::{AllocationError, AllocationResult};
use crate::reconciliation::{MAX_PERCENTAGE, contribution, floor_rate};
use matchplan_types::{AllocationParameters, Strategy};
use tracing::{debug, instrument, trace};

/// Computes one contribution percentage per paycheck.
///
/// Every returned percentage lies in `[0, max_rate_percent]`. For `frontload` and `dca`
/// the floor-rounded contributions never exceed `annual_limit_cents`. The `uniform`
/// bump pass charges `floor(amount / 100)` cents per extra point, which can undercount
/// the true cost by one cent per bumped paycheck.
///
/// # Errors
///
/// - [`AllocationError::InvalidParameter`] for an empty series, a negative limit or rate,
///   a max rate above 100 or below the match rate.
/// - [`AllocationError::InvalidPaycheckAmount`] for a negative paycheck, or a zero paycheck
///   under `frontload`/`dca`, which divide by the paycheck amount.
#[instrument(
    level = "debug",
    skip(paychecks_cents),
    fields(strategy = %params.strategy, paychecks = paychecks_cents.len())
)]
pub fn allocate(
    params: &AllocationParameters,
    paychecks_cents: &[i64],
) -> AllocationResult<Vec<i64>> {
    validate(params, paychecks_cents)?;

    let percentages = match params.strategy {
        Strategy::Uniform => allocate_uniform(params, paychecks_cents)?,
        Strategy::Frontload => {
            let reserved = reservation_table(paychecks_cents, params.match_rate_percent)?;
            allocate_greedy(params, paychecks_cents, &reserved, |available, amount, _| {
                floor_rate(available, amount)
            })
        }
        Strategy::Dca => {
            let reserved = reservation_table(paychecks_cents, params.match_rate_percent)?;
            allocate_greedy(params, paychecks_cents, &reserved, |available, amount, left| {
                floor_rate(available.div_euclid(left), amount)
            })
        }
    };

    debug!(?percentages, "allocation complete");
    Ok(percentages)
}

fn validate(params: &AllocationParameters, paychecks_cents: &[i64]) -> AllocationResult<()> {
    if paychecks_cents.is_empty() {
        return Err(AllocationError::invalid_parameter(
            "paychecks",
            "at least one paycheck is required",
        ));
    }
    if params.annual_limit_cents < 0 {
        return Err(AllocationError::invalid_parameter(
            "annual_limit_cents",
            format!("must not be negative, got {}", params.annual_limit_cents),
        ));
    }
    if params.match_rate_percent < 0 {
        return Err(AllocationError::invalid_parameter(
            "match_rate_percent",
            format!("must not be negative, got {}", params.match_rate_percent),
        ));
    }
    if params.max_rate_percent > MAX_PERCENTAGE {
        return Err(AllocationError::invalid_parameter(
            "max_rate_percent",
            format!("must not exceed {MAX_PERCENTAGE}, got {}", params.max_rate_percent),
        ));
    }
    if params.max_rate_percent < params.match_rate_percent {
        return Err(AllocationError::invalid_parameter(
            "max_rate_percent",
            format!(
                "must be at least the match rate {}, got {}",
                params.match_rate_percent, params.max_rate_percent
            ),
        ));
    }

    let divides_by_amount = params.strategy != Strategy::Uniform;
    if let Some((index, &amount_cents)) = paychecks_cents
        .iter()
        .enumerate()
        .find(|&(_, &amount)| amount < 0 || (divides_by_amount && amount == 0))
    {
        return Err(AllocationError::InvalidPaycheckAmount { index, amount_cents });
    }

    Ok(())
}

/// Cents that must stay under the limit after paycheck `i` so every later paycheck can
/// still receive the minimum match. The last entry is always 0.
pub fn reservation_table(
    paychecks_cents: &[i64],
    match_rate_percent: i64,
) -> AllocationResult<Vec<i64>> {
    let mut reserved = vec![0i64; paychecks_cents.len()];

    for i in (0..paychecks_cents.len().saturating_sub(1)).rev() {
        reserved[i] = reserved[i + 1]
            .checked_add(contribution(paychecks_cents[i + 1], match_rate_percent))
            .ok_or(AllocationError::Overflow { operation: "reservation table" })?;
    }

    Ok(reserved)
}

fn uniform_total(paychecks_cents: &[i64], percentage: i64) -> AllocationResult<i64> {
    paychecks_cents.iter().try_fold(0i64, |total, &amount| {
        total
            .checked_add(contribution(amount, percentage))
            .ok_or(AllocationError::Overflow { operation: "uniform total" })
    })
}

fn allocate_uniform(
    params: &AllocationParameters,
    paychecks_cents: &[i64],
) -> AllocationResult<Vec<i64>> {
    let limit = params.annual_limit_cents;
    let max_rate = params.max_rate_percent;

    // The match rate is the starting point, but never at the cost of breaking the limit.
    let mut base = params.match_rate_percent;
    while base > 0 && uniform_total(paychecks_cents, base)? > limit {
        base -= 1;
    }
    while base < max_rate && uniform_total(paychecks_cents, base + 1)? <= limit {
        base += 1;
    }

    let mut remaining = limit - uniform_total(paychecks_cents, base)?;
    debug!(base, remaining, "uniform base percentage selected");

    let mut percentages = vec![base; paychecks_cents.len()];
    for (percentage, &amount) in percentages.iter_mut().zip(paychecks_cents) {
        if remaining <= 0 {
            break;
        }

        let extra = amount / 100;
        if *percentage < max_rate && extra <= remaining {
            *percentage += 1;
            remaining -= extra;
        }
    }

    Ok(percentages)
}

/// Shared single pass for `frontload` and `dca`. `candidate` maps the budget available
/// after reservations, the paycheck amount and the number of paychecks left (including
/// this one) to an unclamped percentage.
fn allocate_greedy<F>(
    params: &AllocationParameters,
    paychecks_cents: &[i64],
    reserved: &[i64],
    candidate: F,
) -> Vec<i64>
where
    F: Fn(i64, i64, i64) -> i64,
{
    let count = paychecks_cents.len();
    let mut percentages = vec![0i64; count];
    let mut remaining = params.annual_limit_cents;

    for (i, &amount) in paychecks_cents.iter().enumerate() {
        let available = remaining - reserved[i];
        let left = (count - i) as i64;

        let ceiling = floor_rate(remaining, amount);
        let percentage = candidate(available, amount, left)
            .min(params.max_rate_percent)
            .max(params.match_rate_percent)
            .min(ceiling);

        percentages[i] = percentage;
        remaining -= contribution(amount, percentage);
        trace!(index = i, available, percentage, remaining, "paycheck allocated");

        if remaining <= 0 {
            break;
        }
    }

    percentages
}
