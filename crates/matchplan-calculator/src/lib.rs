//! The contribution calculator for matchplan.
//!
//! This crate provides the allocation engine, which spreads an annual contribution
//! limit over a plan year of paychecks, plus the two helpers every caller needs around
//! it:
//!
//! - [`reconciliation`] keeps paycheck amount, percentage, contribution and match in
//!   step using floor-division cents.
//! - [`currency`] converts between user-entered dollar text and integer cents.
//!
//! ```
//! use matchplan_calculator::{allocate, derive_lines, summarize};
//! use matchplan_types::{AllocationParameters, Strategy};
//!
//! let paychecks = [2_333_333, 833_333, 833_333, 833_333];
//! let params = AllocationParameters::new(2_450_000, 4, 75, Strategy::Frontload);
//!
//! let percentages = allocate(&params, &paychecks).unwrap();
//! let lines = derive_lines(&paychecks, &percentages, params.match_rate_percent).unwrap();
//! let totals = summarize(&lines);
//! assert!(totals.contribution_cents <= params.annual_limit_cents);
//! ```

/// Allocation strategies and the reservation pass
pub mod allocation;
/// Currency text normalization
pub mod currency;
/// Error types
pub mod error;
/// Derived-field reconciliation and aggregation
pub mod reconciliation;

pub use allocation::{allocate, reservation_table};
pub use currency::{format_cents, format_optional_cents, normalize, parse_cents};
pub use error::{AllocationError, AllocationResult};
pub use reconciliation::{
    DerivedPercentage, MAX_PERCENTAGE, aggregate_percentage, contribution, derive_lines, match_amount,
    paycheck_amount, percentage, summarize,
};
