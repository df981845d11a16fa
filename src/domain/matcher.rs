use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::range::DateRange;

/// A declarative rule tested against a day.
///
/// Matchers are stateless configuration values; classifying a day against
/// one never mutates anything. Lists of matchers combine with logical OR.
#[derive(Clone)]
pub enum Matcher {
    /// Matches exactly this day.
    Day(NaiveDate),
    /// Matches any day in the list.
    Days(Vec<NaiveDate>),
    /// Matches days inside the range, endpoints included (inverted-safe).
    Range(DateRange),
    /// Matches days strictly earlier than the given day.
    Before(NaiveDate),
    /// Matches days strictly later than the given day.
    After(NaiveDate),
    /// Matches days whose weekday is in the set.
    DayOfWeek(Vec<Weekday>),
    /// Delegates to an arbitrary predicate.
    Predicate(Arc<dyn Fn(NaiveDate) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            Self::Day(d) => *d == day,
            Self::Days(days) => days.contains(&day),
            Self::Range(range) => range.contains(day),
            Self::Before(d) => day < *d,
            Self::After(d) => day > *d,
            Self::DayOfWeek(weekdays) => weekdays.contains(&day.weekday()),
            Self::Predicate(f) => f(day),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(d) => f.debug_tuple("Day").field(d).finish(),
            Self::Days(days) => f.debug_tuple("Days").field(days).finish(),
            Self::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Self::Before(d) => f.debug_tuple("Before").field(d).finish(),
            Self::After(d) => f.debug_tuple("After").field(d).finish(),
            Self::DayOfWeek(w) => f.debug_tuple("DayOfWeek").field(w).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Whether `day` satisfies any of the given matchers.
pub fn is_match(day: NaiveDate, matchers: &[Matcher]) -> bool {
    matchers.iter().any(|m| m.matches(day))
}

/// An invalid picker configuration, reported at load time.
///
/// The matcher union is closed, so malformed shapes can only arrive through
/// untyped configuration (JSON files, CLI arguments); they are rejected
/// here instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A matcher read from configuration does not describe a valid rule.
    InvalidMatcher(String),
    /// The configured from/to bounds are not a valid interval.
    InvalidBounds(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMatcher(msg) => write!(f, "invalid matcher: {}", msg),
            Self::InvalidBounds(msg) => write!(f, "invalid date bounds: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
