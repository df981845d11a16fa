use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Calendar arithmetic helpers shared by navigation and focus traversal.
///
/// All functions are pure and return new dates. Weeks are parameterized by
/// their starting weekday (Sunday unless configured otherwise).

pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_sunday()
        - week_start.num_days_from_sunday())
        % 7;
    date - Duration::days(offset as i64)
}

pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(6)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    add_months(start_of_month(date), 1)
        .pred_opt()
        .expect("month end is representable")
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("Jan 1 exists in every year")
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).expect("Dec 31 exists in every year")
}

/// Add (or subtract, for negative `n`) whole calendar months, clamping the
/// day-of-month to the target month's length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n as u32))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.expect("month arithmetic within calendar range")
}

pub fn add_years(date: NaiveDate, n: i32) -> NaiveDate {
    add_months(date, n * 12)
}

/// Signed difference in calendar months (`a - b`), ignoring the day
/// component. Zero when both dates fall in the same month.
pub fn diff_months(a: NaiveDate, b: NaiveDate) -> i32 {
    (a.year() - b.year()) * 12 + (a.month() as i32 - b.month() as i32)
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
