//! Calculation kernel for statutory interest on a principal sum.
//!
//! The kernel splits a query date range into sub-intervals aligned with
//! key-rate change dates and prorates interest over each sub-interval at a
//! fixed days/365 basis. It knows nothing about HTTP or where the rate
//! schedule comes from; see `adapter_rates` for ingestion.

pub mod accrual;
pub mod day_count;
pub mod schedule;
pub mod segment;

pub use accrual::{accrue, round2, statutory_interest, AccruedPeriod, InterestBreakdown};
pub use day_count::{DayCountBasis, DayCountParseError};
pub use schedule::{RateSchedule, RateStep};
pub use segment::{split_by_steps, RateSegment};
