//! Matchplan Types
//!
//! This crate defines the domain vocabulary shared by the matchplan crates
//! (currently `matchplan-calculator` and `matchplan-cli`). It keeps the
//! allocation parameters, strategies and per-paycheck results in one place so
//! the calculator and its collaborators agree on a single representation.
//!
//! All money is carried as integer cents (`i64`). Percentages are whole
//! integers, except the aggregate contribution percentage reported in
//! [`AllocationTotals`], which is a display-only value.

#![deny(clippy::all)]
#![deny(missing_docs)]

mod types;

pub use types::{
    AllocationParameters, AllocationTotals, ParseFrequencyError, ParseStrategyError,
    PayFrequency, PaycheckLine, PaycheckSeries, SeriesError, Strategy,
};
