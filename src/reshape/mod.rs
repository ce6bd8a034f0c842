//! Generation-aware projections of a [`Dataset`](crate::dataset::Dataset).
//!
//! Everything here is a pure function of the dataset: recomputed on demand,
//! never cached.

pub mod filter;
pub mod long_form;
pub mod totals;

pub use filter::{filter_generation, FilteredRow, FilteredView};
pub use long_form::{long_form, LongFormEntry};
pub use totals::{check_totals, totals_series, GenerationTotal, TotalsMismatch};
