//! Quality-control stages for rainfall time series
//!
//! Each stage is a pure function from a series to a new series (or to a
//! derived number), with no shared state, so stations can be cleaned
//! independently and in any order.
//!
//! # Architecture
//!
//! - [`deduplication`] - duplicate station codes and duplicate timestamps
//! - [`value_filters`] - sign filter and rainfall-ceiling outlier filter
//! - [`representativeness`] - drops months with too few present days
//! - [`coverage`] - failure fraction, monthly means, years of record, percentiles
//! - [`period`] - inclusive date-range clipping
//! - [`pipeline`] - [`QualityPipeline`] running the stages in their fixed order
//! - [`stats`] - per-stage counters and the cleaned result
//!
//! # Stage Order
//!
//! Duplicate timestamps must be removed before the representativeness
//! filter counts days per month, otherwise a repeated date would be counted
//! twice. The sign and outlier filters only null values and commute.

pub mod coverage;
pub mod deduplication;
pub mod period;
pub mod pipeline;
pub mod representativeness;
pub mod stats;
pub mod value_filters;

#[cfg(test)]
pub mod tests;

pub use coverage::{MonthlyMean, failure_fraction, monthly_means, percentile, years_available};
pub use deduplication::{
    remove_duplicate_keys, remove_duplicate_keys_by, remove_duplicate_timestamps,
};
pub use period::{clip, clip_to};
pub use pipeline::QualityPipeline;
pub use representativeness::drop_unrepresentative_months;
pub use stats::{CleanedSeries, CleaningStats};
pub use value_filters::{null_above, null_negative};
