use chrono::NaiveDate;
use log::debug;

use crate::domain::dateops::{add_months, diff_months, is_same_month, start_of_month};

/// Navigation-relevant configuration, owned by the caller and passed by
/// reference into every computation.
#[derive(Debug, Clone)]
pub struct NavOptions {
    pub number_of_months: usize,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub paged_navigation: bool,
    pub reverse_months: bool,
    pub disable_navigation: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            number_of_months: 1,
            from_date: None,
            to_date: None,
            paged_navigation: false,
            reverse_months: false,
            disable_navigation: false,
        }
    }
}

impl NavOptions {
    fn step(&self) -> i32 {
        if self.paged_navigation {
            self.number_of_months.max(1) as i32
        } else {
            1
        }
    }
}

/// The months to display for the given pivot month: exactly
/// `number_of_months` consecutive months starting at the pivot's month,
/// reversed when `reverse_months` is set.
pub fn display_months(month: NaiveDate, options: &NavOptions) -> Vec<NaiveDate> {
    let start = start_of_month(month);
    let mut months: Vec<NaiveDate> = (0..options.number_of_months)
        .map(|i| add_months(start, i as i32))
        .collect();
    if options.reverse_months {
        months.reverse();
    }
    months
}

/// The next month the user can navigate to, if any.
///
/// Not always the next calendar month: paged navigation jumps by the number
/// of displayed months, and the result is `None` once fewer than
/// `number_of_months` months remain before `to_date`.
pub fn next_month(month: NaiveDate, options: &NavOptions) -> Option<NaiveDate> {
    if options.disable_navigation {
        return None;
    }
    let start = start_of_month(month);
    let Some(to_date) = options.to_date else {
        return Some(add_months(start, options.step()));
    };
    if diff_months(to_date, month) < options.number_of_months.max(1) as i32 {
        return None;
    }
    Some(add_months(start, options.step()))
}

/// The previous month the user can navigate to, if any.
///
/// `None` once the current month is at or before `from_date`'s month.
pub fn previous_month(month: NaiveDate, options: &NavOptions) -> Option<NaiveDate> {
    if options.disable_navigation {
        return None;
    }
    let start = start_of_month(month);
    let Some(from_date) = options.from_date else {
        return Some(add_months(start, -options.step()));
    };
    if diff_months(start, from_date) <= 0 {
        return None;
    }
    Some(add_months(start, -options.step()))
}

/// Inputs for the initial-month computation.
#[derive(Debug, Clone, Default)]
pub struct InitialMonth {
    /// Explicit controlled month, wins over everything else.
    pub month: Option<NaiveDate>,
    /// Uncontrolled default month.
    pub default_month: Option<NaiveDate>,
    /// The day considered "today"; falls back to the real current date.
    pub today: Option<NaiveDate>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub number_of_months: usize,
}

/// The first month to display.
///
/// Precedence: `month`, then `default_month`, then `today`. The candidate
/// is pulled back so the last displayed month is `to_date`'s month when it
/// would overshoot, then snapped forward to `from_date`'s month; the
/// from-clamp is applied last and wins.
pub fn initial_month(context: &InitialMonth) -> NaiveDate {
    let today = context
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut month = context.month.or(context.default_month).unwrap_or(today);
    let number_of_months = context.number_of_months.max(1);

    if let Some(to_date) = context.to_date {
        if diff_months(to_date, month) < 0 {
            let offset = -(number_of_months as i32 - 1);
            month = add_months(to_date, offset);
        }
    }
    if let Some(from_date) = context.from_date {
        if diff_months(month, from_date) < 0 {
            month = from_date;
        }
    }
    start_of_month(month)
}

/// The currently displayed pivot month.
///
/// Transitions are pure with respect to everything but the pivot itself;
/// display months, next/previous targets and containment are derived on
/// demand from the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_month: NaiveDate,
}

impl NavigationState {
    pub fn new(initial: NaiveDate) -> Self {
        Self {
            current_month: start_of_month(initial),
        }
    }

    pub fn current_month(&self) -> NaiveDate {
        self.current_month
    }

    pub fn display_months(&self, options: &NavOptions) -> Vec<NaiveDate> {
        display_months(self.current_month, options)
    }

    pub fn next_month(&self, options: &NavOptions) -> Option<NaiveDate> {
        next_month(self.current_month, options)
    }

    pub fn previous_month(&self, options: &NavOptions) -> Option<NaiveDate> {
        previous_month(self.current_month, options)
    }

    /// Jump straight to the given month.
    ///
    /// Deliberately not re-validated against `from_date`/`to_date`: only
    /// `next_month`/`previous_month` gate paging, and callers offering
    /// direct month targets are responsible for keeping them in range.
    pub fn goto_month(&mut self, month: NaiveDate) {
        let month = start_of_month(month);
        if month != self.current_month {
            debug!("navigation: {} -> {}", self.current_month, month);
            self.current_month = month;
        }
    }

    /// Bring `date` into view, moving as little as possible.
    ///
    /// When the target lies before `ref_date` the grid is positioned so the
    /// target's month is the last one displayed; otherwise it becomes the
    /// first.
    pub fn goto_date(&mut self, date: NaiveDate, ref_date: Option<NaiveDate>, options: &NavOptions) {
        if self.is_date_displayed(date, options) {
            return;
        }
        let backwards = ref_date.is_some_and(|r| date < r);
        if backwards {
            self.goto_month(add_months(date, -(options.number_of_months.max(1) as i32 - 1)));
        } else {
            self.goto_month(date);
        }
    }

    /// Whether `date` falls within any of the displayed months.
    pub fn is_date_displayed(&self, date: NaiveDate, options: &NavOptions) -> bool {
        self.display_months(options)
            .iter()
            .any(|month| is_same_month(date, *month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn opts(n: usize) -> NavOptions {
        NavOptions {
            number_of_months: n,
            ..NavOptions::default()
        }
    }

    #[test]
    fn display_months_yields_exactly_n_consecutive_months() {
        let months = display_months(d(2022, 8, 17), &opts(3));
        assert_eq!(months, vec![d(2022, 8, 1), d(2022, 9, 1), d(2022, 10, 1)]);
    }

    #[test]
    fn display_months_reversed() {
        let options = NavOptions {
            number_of_months: 2,
            reverse_months: true,
            ..NavOptions::default()
        };
        let months = display_months(d(2022, 11, 5), &options);
        assert_eq!(months, vec![d(2022, 12, 1), d(2022, 11, 1)]);
    }

    #[test]
    fn display_months_can_be_empty() {
        let options = NavOptions {
            number_of_months: 0,
            ..NavOptions::default()
        };
        assert!(display_months(d(2022, 8, 1), &options).is_empty());
    }

    #[test]
    fn next_month_without_bound_always_advances() {
        assert_eq!(next_month(d(2022, 12, 5), &opts(1)), Some(d(2023, 1, 1)));
    }

    #[test]
    fn next_month_stops_at_to_date() {
        let mut options = opts(1);
        options.to_date = Some(d(2020, 8, 31));
        assert_eq!(next_month(d(2020, 5, 1), &options), Some(d(2020, 6, 1)));
        options.to_date = Some(d(2020, 5, 31));
        assert_eq!(next_month(d(2020, 5, 1), &options), None);
    }

    #[test]
    fn next_month_requires_room_for_every_displayed_month() {
        let mut options = opts(2);
        options.to_date = Some(d(2020, 7, 31));
        // Advancing to June would leave June+July displayable, exactly 2
        assert_eq!(next_month(d(2020, 5, 1), &options), Some(d(2020, 6, 1)));
        options.to_date = Some(d(2020, 6, 30));
        assert_eq!(next_month(d(2020, 5, 1), &options), None);
    }

    #[test]
    fn paged_navigation_steps_by_page() {
        let mut options = opts(3);
        options.paged_navigation = true;
        assert_eq!(next_month(d(2020, 5, 1), &options), Some(d(2020, 8, 1)));
        assert_eq!(previous_month(d(2020, 5, 1), &options), Some(d(2020, 2, 1)));
    }

    #[test]
    fn previous_month_stops_at_from_date() {
        let mut options = opts(1);
        options.from_date = Some(d(2020, 5, 1));
        assert_eq!(previous_month(d(2020, 6, 15), &options), Some(d(2020, 5, 1)));
        assert_eq!(previous_month(d(2020, 5, 15), &options), None);
    }

    #[test]
    fn disable_navigation_blocks_both_directions() {
        let options = NavOptions {
            disable_navigation: true,
            ..NavOptions::default()
        };
        assert_eq!(next_month(d(2020, 5, 1), &options), None);
        assert_eq!(previous_month(d(2020, 5, 1), &options), None);
    }

    #[test]
    fn next_and_previous_are_inverses_away_from_bounds() {
        let options = opts(1);
        let m = d(2021, 3, 1);
        let next = next_month(m, &options).unwrap();
        assert_eq!(previous_month(next, &options), Some(m));
    }

    #[test]
    fn initial_month_precedence() {
        let context = InitialMonth {
            month: Some(d(2022, 3, 10)),
            default_month: Some(d(2022, 5, 10)),
            today: Some(d(2022, 7, 10)),
            number_of_months: 1,
            ..InitialMonth::default()
        };
        assert_eq!(initial_month(&context), d(2022, 3, 1));

        let context = InitialMonth {
            default_month: Some(d(2022, 5, 10)),
            today: Some(d(2022, 7, 10)),
            number_of_months: 1,
            ..InitialMonth::default()
        };
        assert_eq!(initial_month(&context), d(2022, 5, 1));

        let context = InitialMonth {
            today: Some(d(2022, 7, 10)),
            number_of_months: 1,
            ..InitialMonth::default()
        };
        assert_eq!(initial_month(&context), d(2022, 7, 1));
    }

    #[test]
    fn initial_month_clamps_back_to_fit_to_date() {
        let context = InitialMonth {
            month: Some(d(2012, 11, 12)),
            to_date: Some(d(2012, 9, 20)),
            number_of_months: 3,
            today: Some(d(2012, 11, 12)),
            ..InitialMonth::default()
        };
        assert_eq!(initial_month(&context), d(2012, 7, 1));
    }

    #[test]
    fn initial_month_from_clamp_wins() {
        let context = InitialMonth {
            month: Some(d(2012, 11, 12)),
            from_date: Some(d(2012, 10, 1)),
            to_date: Some(d(2012, 9, 20)),
            number_of_months: 3,
            today: Some(d(2012, 11, 12)),
            ..InitialMonth::default()
        };
        assert_eq!(initial_month(&context), d(2012, 10, 1));
    }

    #[test]
    fn goto_date_minimal_motion() {
        let options = opts(2);
        let mut nav = NavigationState::new(d(2022, 8, 1));
        // Already displayed: no movement
        nav.goto_date(d(2022, 9, 10), Some(d(2022, 8, 31)), &options);
        assert_eq!(nav.current_month(), d(2022, 8, 1));
        // Moving forward shows the target as the first month
        nav.goto_date(d(2022, 10, 2), Some(d(2022, 9, 30)), &options);
        assert_eq!(nav.current_month(), d(2022, 10, 1));
        // Moving backward shows the target as the last month
        nav.goto_date(d(2022, 9, 30), Some(d(2022, 10, 1)), &options);
        assert_eq!(nav.current_month(), d(2022, 8, 1));
    }

    #[test]
    fn is_date_displayed_spans_all_display_months() {
        let nav = NavigationState::new(d(2022, 8, 1));
        let options = opts(2);
        assert!(nav.is_date_displayed(d(2022, 8, 31), &options));
        assert!(nav.is_date_displayed(d(2022, 9, 1), &options));
        assert!(!nav.is_date_displayed(d(2022, 10, 1), &options));
    }
}
