//! Key-rate schedule types.
//!
//! A schedule is an ordered list of rate steps. Each step fixes the annual
//! key rate from its effective date (inclusive) until the next step's
//! effective date (exclusive).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single key-rate change.
///
/// Field names are the wire names: they appear both in the `GET /rates`
/// payload and as the required columns of the ingestion source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStep {
    /// First calendar date the rate is effective.
    pub date_from: NaiveDate,
    /// Annual key rate, percent per annum.
    pub key_rate: f64,
}

impl RateStep {
    /// Creates a new rate step.
    pub fn new(date_from: NaiveDate, key_rate: f64) -> Self {
        Self { date_from, key_rate }
    }
}

/// An immutable snapshot of the key-rate schedule.
///
/// Steps are sorted ascending by `date_from` with no duplicate dates; both
/// invariants are enforced by [`RateSchedule::from_steps`]. A schedule with
/// zero steps is valid and means "no rate data known".
///
/// A published snapshot is never mutated in place; the ingestion layer
/// rebuilds a fresh schedule wholesale on every successful refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSchedule {
    steps: Vec<RateStep>,
}

impl RateSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from arbitrary steps.
    ///
    /// Sorts ascending by `date_from` and collapses duplicate dates. On a
    /// duplicate, the first occurrence in input order wins (the sort is
    /// stable).
    pub fn from_steps(mut steps: Vec<RateStep>) -> Self {
        steps.sort_by_key(|s| s.date_from);
        steps.dedup_by(|a, b| a.date_from == b.date_from);
        Self { steps }
    }

    /// Returns the steps, sorted ascending by effective date.
    #[inline]
    pub fn steps(&self) -> &[RateStep] {
        &self.steps
    }

    /// Returns the number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns whether the schedule has no steps.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the earliest step, if any.
    #[inline]
    pub fn first(&self) -> Option<&RateStep> {
        self.steps.first()
    }

    /// Returns the step in force on `date`: the one with the greatest
    /// `date_from` that is `<= date`.
    ///
    /// `None` if `date` precedes every known step or the schedule is empty.
    pub fn step_at(&self, date: NaiveDate) -> Option<&RateStep> {
        let idx = self.steps.partition_point(|s| s.date_from <= date);
        idx.checked_sub(1).map(|i| &self.steps[i])
    }

    /// Returns an iterator over the steps.
    pub fn iter(&self) -> impl Iterator<Item = &RateStep> {
        self.steps.iter()
    }
}
