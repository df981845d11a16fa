use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A range of days, possibly open-ended.
///
/// A range with only `from` set is a single anchor day waiting for its other
/// endpoint. The endpoints may be stored in either order; containment checks
/// normalize locally instead of mutating the stored fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Whether `date` falls inside the range, endpoints included.
    ///
    /// A range without `from` never matches. A range with only `from`
    /// matches exactly that day. Inverted endpoints are swapped before
    /// comparing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let Some(from) = self.from else {
            return false;
        };
        let Some(to) = self.to else {
            return from == date;
        };
        let (start, end) = if to < from { (to, from) } else { (from, to) };
        date >= start && date <= end
    }
}

/// Fold one clicked day into an existing range selection.
///
/// Endpoints are assigned chronologically: clicking before the anchor makes
/// the new day `from`, after it makes it `to`. Clicking a single-day range's
/// only day completes it (`{from: X, to: X}`); clicking it again clears the
/// selection entirely.
pub fn add_to_range(day: NaiveDate, range: Option<DateRange>) -> Option<DateRange> {
    let DateRange { from, to } = range.unwrap_or_default();
    let Some(from) = from else {
        return Some(DateRange::new(Some(day), None));
    };
    let Some(to) = to else {
        if day == from {
            return Some(DateRange::new(Some(from), Some(day)));
        }
        if day < from {
            return Some(DateRange::new(Some(day), Some(from)));
        }
        return Some(DateRange::new(Some(from), Some(day)));
    };
    if to == day && from == day {
        return None;
    }
    if to == day {
        return Some(DateRange::new(Some(to), None));
    }
    if from == day {
        return None;
    }
    if from > day {
        return Some(DateRange::new(Some(day), Some(to)));
    }
    Some(DateRange::new(Some(from), Some(day)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn contains_is_inverted_safe() {
        let range = DateRange::new(Some(d(2022, 8, 20)), Some(d(2022, 8, 10)));
        assert!(range.contains(d(2022, 8, 15)));
        assert!(range.contains(d(2022, 8, 10)));
        assert!(range.contains(d(2022, 8, 20)));
        assert!(!range.contains(d(2022, 8, 21)));
    }

    #[test]
    fn open_range_matches_only_anchor() {
        let range = DateRange::new(Some(d(2022, 8, 10)), None);
        assert!(range.contains(d(2022, 8, 10)));
        assert!(!range.contains(d(2022, 8, 11)));
    }

    #[test]
    fn range_without_from_never_matches() {
        let range = DateRange::new(None, Some(d(2022, 8, 10)));
        assert!(!range.contains(d(2022, 8, 10)));
    }

    #[test]
    fn first_click_opens_range() {
        let x = d(2022, 8, 10);
        assert_eq!(add_to_range(x, None), Some(DateRange::new(Some(x), None)));
    }

    #[test]
    fn second_click_on_same_day_completes_range() {
        let x = d(2022, 8, 10);
        let range = add_to_range(x, add_to_range(x, None));
        assert_eq!(range, Some(DateRange::new(Some(x), Some(x))));
    }

    #[test]
    fn third_click_on_same_day_clears() {
        let x = d(2022, 8, 10);
        let range = add_to_range(x, add_to_range(x, add_to_range(x, None)));
        assert_eq!(range, None);
    }

    #[test]
    fn clicking_before_anchor_swaps_endpoints() {
        let range = add_to_range(d(2022, 8, 5), add_to_range(d(2022, 8, 10), None));
        assert_eq!(
            range,
            Some(DateRange::new(Some(d(2022, 8, 5)), Some(d(2022, 8, 10))))
        );
    }

    #[test]
    fn clicking_outside_completed_range_extends_it() {
        let range = Some(DateRange::new(Some(d(2022, 8, 5)), Some(d(2022, 8, 10))));
        assert_eq!(
            add_to_range(d(2022, 8, 1), range),
            Some(DateRange::new(Some(d(2022, 8, 1)), Some(d(2022, 8, 10))))
        );
        assert_eq!(
            add_to_range(d(2022, 8, 15), range),
            Some(DateRange::new(Some(d(2022, 8, 5)), Some(d(2022, 8, 15))))
        );
    }

    #[test]
    fn clicking_an_endpoint_collapses_it() {
        let range = Some(DateRange::new(Some(d(2022, 8, 5)), Some(d(2022, 8, 10))));
        assert_eq!(add_to_range(d(2022, 8, 5), range), None);
        assert_eq!(
            add_to_range(d(2022, 8, 10), range),
            Some(DateRange::new(Some(d(2022, 8, 10)), None))
        );
    }
}
