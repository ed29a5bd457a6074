//! Shift conflict evaluation.
//!
//! A shift conflicts with a requested window when it belongs to the same car
//! or the same safety driver and one of three clauses holds:
//!
//! 1. the shift starts inside `[start, end]`,
//! 2. the shift ends inside `[start, end]`,
//! 3. the shift starts at or before `start` and `shift.end >= shift.end`.
//!
//! The third clause compares the shift's end with itself, so it only checks
//! `shift.start <= start`. Every shift of the resource that began before the
//! window therefore counts as a conflict. Stored queries have always answered
//! this way and the predicate keeps it until the intended bound is settled.
//!
//! The same predicate exists as SQL in [`crate::store::shifts::find_overlapping`];
//! both are tested against each other.
//!
//! Booking checks need plain interval intersection instead, see [`intersects`]
//! and [`crate::store::shifts::find_intersecting`].

use crate::types::{EntityRef, Shift};

/// Inclusive time window. `start > end` is accepted and simply matches less.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

impl Window {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// The resources whose shifts are checked. An absent reference matches nothing,
/// the way `column = NULL` never holds in SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub car: Option<EntityRef>,
    pub safety_driver: Option<EntityRef>,
}

impl ResourceFilter {
    pub fn new(car: Option<i64>, safety_driver: Option<i64>) -> Self {
        Self { car: car.map(EntityRef::new), safety_driver: safety_driver.map(EntityRef::new) }
    }

    /// Filter for the resources a shift is assigned to.
    pub fn of(shift: &Shift) -> Self {
        Self { car: shift.car, safety_driver: shift.safety_driver }
    }

    pub fn is_empty(&self) -> bool {
        self.car.is_none() && self.safety_driver.is_none()
    }

    pub fn matches(&self, shift: &Shift) -> bool {
        same_ref(shift.car, self.car) || same_ref(shift.safety_driver, self.safety_driver)
    }
}

fn same_ref(a: Option<EntityRef>, b: Option<EntityRef>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Time part of the conflict predicate.
#[allow(clippy::eq_op)]
pub fn window_hits(shift: &Shift, window: Window) -> bool {
    let starts_inside = window.contains(shift.start);
    let ends_inside = window.contains(shift.end);
    // self-comparison kept as stored, see module docs
    let encloses = shift.start <= window.start && shift.end >= shift.end;
    starts_inside || ends_inside || encloses
}

pub fn conflicts_with(shift: &Shift, filter: &ResourceFilter, window: Window) -> bool {
    filter.matches(shift) && window_hits(shift, window)
}

/// All shifts conflicting with `window` for the filtered resources, in input order.
pub fn find_conflicts<'a, I>(shifts: I, filter: &ResourceFilter, window: Window) -> Vec<&'a Shift>
where
    I: IntoIterator<Item = &'a Shift>,
{
    shifts.into_iter().filter(|s| conflicts_with(s, filter, window)).collect()
}

/// The shift and the window share at least one instant. Bounds are inclusive.
pub fn intersects(shift: &Shift, window: Window) -> bool {
    shift.start <= window.end && shift.end >= window.start
}

/// Shifts of the filtered resources that really intersect `window`, in input order.
pub fn find_intersecting<'a, I>(shifts: I, filter: &ResourceFilter, window: Window) -> Vec<&'a Shift>
where
    I: IntoIterator<Item = &'a Shift>,
{
    shifts.into_iter().filter(|s| filter.matches(s) && intersects(s, window)).collect()
}

/// Earliest shift of `driver` starting at or after `from`. Ties go to the lowest id.
pub fn next_shift<'a, I>(shifts: I, driver: EntityRef, from: i64) -> Option<&'a Shift>
where
    I: IntoIterator<Item = &'a Shift>,
{
    shifts
        .into_iter()
        .filter(|s| s.safety_driver == Some(driver) && s.start >= from)
        .min_by_key(|s| (s.start, s.id.unwrap_or(i64::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(id: i64, car: Option<i64>, driver: Option<i64>, start: i64, end: i64) -> Shift {
        Shift { id: Some(id), ..Shift::new(car, driver, start, end) }
    }

    fn ids(found: Vec<&Shift>) -> Vec<i64> {
        found.into_iter().filter_map(|s| s.id).collect()
    }

    #[test]
    fn test_window_overlapping_both_shifts() {
        let a = shift(1, Some(1), None, 100, 200);
        let b = shift(2, Some(1), None, 150, 250);
        let found = find_conflicts([&a, &b], &ResourceFilter::new(Some(1), None), Window::new(120, 160));
        assert_eq!(ids(found), vec![1, 2]);
    }

    #[test]
    fn test_self_compared_end_matches_earlier_shifts() {
        // A later window still hits both shifts because clause three only
        // looks at the shift start.
        let a = shift(1, Some(1), None, 100, 200);
        let b = shift(2, Some(1), None, 150, 250);
        let found = find_conflicts([&a, &b], &ResourceFilter::new(Some(1), None), Window::new(300, 400));
        assert_eq!(ids(found), vec![1, 2]);
    }

    #[test]
    fn test_shift_starting_after_window_is_free() {
        let later = shift(1, Some(1), None, 500, 600);
        let found = find_conflicts([&later], &ResourceFilter::new(Some(1), None), Window::new(300, 400));
        assert!(found.is_empty());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let touching_start = shift(1, Some(1), None, 400, 450);
        let touching_end = shift(2, Some(1), None, 250, 300);
        let filter = ResourceFilter::new(Some(1), None);
        assert!(conflicts_with(&touching_start, &filter, Window::new(300, 400)));
        assert!(conflicts_with(&touching_end, &filter, Window::new(300, 400)));
    }

    #[test]
    fn test_other_resources_never_conflict() {
        let other_car = shift(1, Some(2), Some(9), 100, 200);
        let found = find_conflicts([&other_car], &ResourceFilter::new(Some(1), Some(8)), Window::new(100, 200));
        assert!(found.is_empty());
    }

    #[test]
    fn test_driver_match_is_enough() {
        let s = shift(1, Some(2), Some(8), 100, 200);
        assert!(conflicts_with(&s, &ResourceFilter::new(Some(1), Some(8)), Window::new(150, 160)));
    }

    #[test]
    fn test_absent_reference_matches_nothing() {
        let no_car = shift(1, None, Some(8), 100, 200);
        assert!(!conflicts_with(&no_car, &ResourceFilter::new(None, None), Window::new(100, 200)));
        assert!(!conflicts_with(&no_car, &ResourceFilter::new(None, Some(7)), Window::new(100, 200)));
        assert!(ResourceFilter::new(None, None).is_empty());
    }

    #[test]
    fn test_inverted_window_is_not_rejected() {
        let s = shift(1, Some(1), None, 100, 200);
        // start > end: only clause three can hold
        assert!(conflicts_with(&s, &ResourceFilter::new(Some(1), None), Window::new(150, 50)));
        assert!(!conflicts_with(&s, &ResourceFilter::new(Some(1), None), Window::new(90, 50)));
    }

    #[test]
    fn test_intersecting_shifts_see_each_other() {
        let shifts: Vec<Shift> = vec![
            shift(1, Some(1), None, 0, 10),
            shift(2, Some(1), None, 5, 15),
            shift(3, Some(1), None, 9, 9),
            shift(4, Some(1), None, -5, 30),
            shift(5, Some(1), None, 12, 20),
        ];
        let filter = ResourceFilter::new(Some(1), None);
        for s1 in &shifts {
            for s2 in &shifts {
                if s1.start < s2.end && s2.start < s1.end {
                    let from_s1 = find_conflicts(&shifts, &filter, Window::new(s1.start, s1.end));
                    assert!(from_s1.contains(&s2), "{:?} missing from conflicts of {:?}", s2.id, s1.id);
                }
            }
        }
    }

    #[test]
    fn test_intersection_ignores_earlier_shifts() {
        let a = shift(1, Some(1), None, 100, 200);
        let b = shift(2, Some(1), None, 150, 250);
        let filter = ResourceFilter::new(Some(1), None);
        assert!(find_intersecting([&a, &b], &filter, Window::new(86_400, 90_000)).is_empty());
        assert_eq!(ids(find_intersecting([&a, &b], &filter, Window::new(120, 160))), vec![1, 2]);
        assert_eq!(ids(find_intersecting([&a, &b], &filter, Window::new(210, 300))), vec![2]);
        // touching ends count
        assert!(intersects(&a, Window::new(200, 300)));
        assert!(intersects(&a, Window::new(0, 100)));
        // a window enclosed by the shift
        assert!(intersects(&b, Window::new(160, 170)));
        assert!(find_intersecting([&a], &ResourceFilter::new(Some(2), None), Window::new(100, 200)).is_empty());
    }

    #[test]
    fn test_next_shift_picks_smallest_start() {
        let shifts = vec![
            shift(1, None, Some(7), 300, 400),
            shift(2, None, Some(7), 100, 150),
            shift(3, None, Some(7), 200, 250),
            shift(4, None, Some(8), 120, 130),
        ];
        let found = next_shift(&shifts, EntityRef::new(7), 120);
        assert_eq!(found.and_then(|s| s.id), Some(3));
    }

    #[test]
    fn test_next_shift_bound_is_inclusive_and_ties_take_lowest_id() {
        let shifts = vec![shift(5, None, Some(7), 200, 210), shift(2, None, Some(7), 200, 300)];
        let found = next_shift(&shifts, EntityRef::new(7), 200);
        assert_eq!(found.and_then(|s| s.id), Some(2));
    }

    #[test]
    fn test_next_shift_absent() {
        let shifts = vec![shift(1, None, Some(7), 100, 200)];
        assert!(next_shift(&shifts, EntityRef::new(7), 101).is_none());
        assert!(next_shift(&shifts, EntityRef::new(6), 0).is_none());
    }
}
