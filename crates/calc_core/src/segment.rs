//! Interval segmentation against the key-rate schedule.

use chrono::NaiveDate;

use crate::schedule::RateSchedule;

/// A sub-interval of a query range carrying exactly one applicable rate.
///
/// `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSegment {
    /// First day of the segment, inclusive.
    pub start: NaiveDate,
    /// First day after the segment, exclusive.
    pub end: NaiveDate,
    /// Key rate in force over the segment, percent per annum.
    pub rate: f64,
}

/// Splits `[range_start, range_end)` at the schedule's rate-change dates.
///
/// The caller must guarantee `range_start < range_end`. Returned segments are
/// contiguous, sorted, non-overlapping, cover exactly
/// `[range_start, range_end)` and each carries the single rate in force over
/// it. Zero-length segments never occur: the cursor strictly advances on
/// every iteration.
///
/// Returns an empty vector when the schedule is empty or when `range_start`
/// precedes every known step; in the latter case the caller substitutes the
/// earliest known rate for the whole range (see
/// [`crate::statutory_interest`]).
pub fn split_by_steps(
    range_start: NaiveDate,
    range_end: NaiveDate,
    schedule: &RateSchedule,
) -> Vec<RateSegment> {
    let steps = schedule.steps();

    // Index of the step in force at range_start.
    let idx = steps.partition_point(|s| s.date_from <= range_start);
    let Some(start_idx) = idx.checked_sub(1) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cur = range_start;
    let mut i = start_idx;
    while cur < range_end && i < steps.len() {
        let boundary = match steps.get(i + 1) {
            Some(next) => next.date_from.min(range_end),
            None => range_end,
        };
        out.push(RateSegment {
            start: cur,
            end: boundary,
            rate: steps[i].key_rate,
        });
        cur = boundary;
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::RateStep;
    use chrono::Days;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn two_step_schedule() -> RateSchedule {
        RateSchedule::from_steps(vec![
            RateStep::new(d(2024, 3, 1), 16.0),
            RateStep::new(d(2024, 7, 26), 15.0),
        ])
    }

    #[test]
    fn test_range_spanning_one_boundary() {
        let segments = split_by_steps(d(2024, 3, 1), d(2024, 9, 1), &two_step_schedule());

        assert_eq!(
            segments,
            vec![
                RateSegment {
                    start: d(2024, 3, 1),
                    end: d(2024, 7, 26),
                    rate: 16.0
                },
                RateSegment {
                    start: d(2024, 7, 26),
                    end: d(2024, 9, 1),
                    rate: 15.0
                },
            ]
        );
    }

    #[test]
    fn test_range_inside_single_step() {
        let segments = split_by_steps(d(2024, 4, 1), d(2024, 5, 1), &two_step_schedule());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, d(2024, 4, 1));
        assert_eq!(segments[0].end, d(2024, 5, 1));
        assert_eq!(segments[0].rate, 16.0);
    }

    #[test]
    fn test_range_past_last_step_extends_to_range_end() {
        let segments = split_by_steps(d(2024, 8, 1), d(2025, 8, 1), &two_step_schedule());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, d(2025, 8, 1));
        assert_eq!(segments[0].rate, 15.0);
    }

    #[test]
    fn test_range_ending_exactly_on_boundary() {
        let segments = split_by_steps(d(2024, 3, 1), d(2024, 7, 26), &two_step_schedule());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, d(2024, 7, 26));
        assert_eq!(segments[0].rate, 16.0);
    }

    #[test]
    fn test_empty_schedule_yields_no_segments() {
        let segments = split_by_steps(d(2024, 3, 1), d(2024, 9, 1), &RateSchedule::new());
        assert!(segments.is_empty());
    }

    #[test]
    fn test_range_before_earliest_step_yields_no_segments() {
        let segments = split_by_steps(d(2024, 1, 1), d(2024, 2, 1), &two_step_schedule());
        assert!(segments.is_empty());
    }

    proptest! {
        // Segments tile [start, end): contiguous, sorted, non-overlapping,
        // covering the whole range, with no zero-length pieces.
        #[test]
        fn prop_segments_tile_the_range(
            offsets in proptest::collection::btree_set(0u64..720, 1..6),
            start_offset in 0u64..720,
            len in 1u64..360,
        ) {
            let origin = d(2020, 1, 1);
            let steps: Vec<RateStep> = offsets
                .iter()
                .enumerate()
                .map(|(i, off)| RateStep::new(origin + Days::new(*off), 5.0 + i as f64))
                .collect();
            let schedule = RateSchedule::from_steps(steps);

            let start = origin + Days::new(start_offset);
            let end = start + Days::new(len);
            let segments = split_by_steps(start, end, &schedule);

            if schedule.first().unwrap().date_from <= start {
                prop_assert!(!segments.is_empty());
                prop_assert_eq!(segments.first().unwrap().start, start);
                prop_assert_eq!(segments.last().unwrap().end, end);
                for seg in &segments {
                    prop_assert!(seg.start < seg.end);
                }
                for pair in segments.windows(2) {
                    prop_assert_eq!(pair[0].end, pair[1].start);
                }
            } else {
                prop_assert!(segments.is_empty());
            }
        }
    }
}
