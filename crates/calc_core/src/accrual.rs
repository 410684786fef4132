//! Interest accrual over rate segments.

use chrono::NaiveDate;
use serde::Serialize;

use crate::day_count::DayCountBasis;
use crate::schedule::RateSchedule;
use crate::segment::{split_by_steps, RateSegment};

/// Interest accrued over one segment of the query range.
///
/// Serialises with exactly the field names of the `/calc395` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccruedPeriod {
    /// First day of the period, inclusive.
    pub start: NaiveDate,
    /// First day after the period, exclusive.
    pub end: NaiveDate,
    /// Key rate in force, percent per annum.
    pub rate: f64,
    /// Whole days in `[start, end)`.
    pub days: i64,
    /// Prorated interest, rounded to 2 decimal places.
    pub interest: f64,
}

/// A complete calculation: per-period breakdown plus the total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterestBreakdown {
    /// Per-segment breakdown, in range order.
    pub periods: Vec<AccruedPeriod>,
    /// Sum of the rounded period interests, itself rounded to 2 decimals.
    pub total: f64,
}

/// Rounds a monetary amount to 2 decimal places, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Converts segments into day counts and prorated interest amounts.
///
/// Segments with a non-positive day count are skipped silently; the
/// segmenter never produces them, but the contract tolerates them. Rounding
/// is applied per period first, then the total is the independently rounded
/// sum of the rounded period amounts. The order is fixed: summing unrounded
/// values first produces different totals for some inputs.
pub fn accrue(
    principal: f64,
    segments: &[RateSegment],
    basis: DayCountBasis,
) -> InterestBreakdown {
    let mut periods = Vec::with_capacity(segments.len());
    for seg in segments {
        let days = (seg.end - seg.start).num_days();
        if days <= 0 {
            continue;
        }
        let fraction = basis.year_fraction(days);
        let interest = round2(principal * (seg.rate / 100.0) * fraction);
        periods.push(AccruedPeriod {
            start: seg.start,
            end: seg.end,
            rate: seg.rate,
            days,
            interest,
        });
    }

    let total = round2(periods.iter().map(|p| p.interest).sum::<f64>());
    InterestBreakdown { periods, total }
}

/// Computes statutory interest on `principal` over `[start, end)`.
///
/// The caller must guarantee `start < end`. An empty schedule yields an
/// empty breakdown; surfacing that as "no data" rather than zero interest is
/// the caller's responsibility.
///
/// When segmentation yields nothing because the whole range precedes the
/// earliest known step, that step's rate is applied to the entire range.
/// This is the single special case; everywhere else segmentation follows
/// schedule boundaries.
pub fn statutory_interest(
    principal: f64,
    start: NaiveDate,
    end: NaiveDate,
    schedule: &RateSchedule,
    basis: DayCountBasis,
) -> InterestBreakdown {
    let mut segments = split_by_steps(start, end, schedule);

    if segments.is_empty() {
        if let Some(first) = schedule.first() {
            if first.date_from > start {
                segments.push(RateSegment {
                    start,
                    end,
                    rate: first.key_rate,
                });
            }
        }
    }

    accrue(principal, &segments, basis)
}
