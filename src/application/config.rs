use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::dateops::{end_of_month, start_of_month};
use crate::domain::{ConfigError, DateRange, Matcher, ModifierKey, Modifiers, SelectionMode};

/// A matcher as it appears in untyped configuration (JSON file, CLI).
///
/// Covers the declarative matcher shapes; predicates are code and can only
/// be attached through [`PickerConfig::custom_matchers`] directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherSpec {
    Day(NaiveDate),
    Days(Vec<NaiveDate>),
    Range { from: Option<NaiveDate>, to: Option<NaiveDate> },
    Before(NaiveDate),
    After(NaiveDate),
    /// Weekday numbers, 0 = Sunday through 6 = Saturday.
    DayOfWeek(Vec<u8>),
}

impl MatcherSpec {
    pub fn to_matcher(&self) -> Result<Matcher, ConfigError> {
        match self {
            Self::Day(d) => Ok(Matcher::Day(*d)),
            Self::Days(days) => Ok(Matcher::Days(days.clone())),
            Self::Range { from, to } => Ok(Matcher::Range(DateRange::new(*from, *to))),
            Self::Before(d) => Ok(Matcher::Before(*d)),
            Self::After(d) => Ok(Matcher::After(*d)),
            Self::DayOfWeek(numbers) => {
                let mut weekdays = Vec::with_capacity(numbers.len());
                for &n in numbers {
                    let weekday = match n {
                        0 => Weekday::Sun,
                        1 => Weekday::Mon,
                        2 => Weekday::Tue,
                        3 => Weekday::Wed,
                        4 => Weekday::Thu,
                        5 => Weekday::Fri,
                        6 => Weekday::Sat,
                        other => {
                            return Err(ConfigError::InvalidMatcher(format!(
                                "day_of_week value {} is not in 0..=6",
                                other
                            )));
                        }
                    };
                    weekdays.push(weekday);
                }
                Ok(Matcher::DayOfWeek(weekdays))
            }
        }
    }
}

fn default_number_of_months() -> usize {
    1
}

fn default_week_start() -> Weekday {
    Weekday::Sun
}

/// Declarative picker configuration.
///
/// Everything the core needs is carried here explicitly and passed by
/// reference; there is no ambient/global lookup. Loadable from JSON, with
/// every field optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Controlled initial month; wins over `default_month` and today.
    pub month: Option<NaiveDate>,
    pub default_month: Option<NaiveDate>,
    /// Override for the day considered "today" (mainly for tests).
    pub today: Option<NaiveDate>,

    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Month-granular bound; overrides `from_date` with the month's start.
    pub from_month: Option<NaiveDate>,
    /// Month-granular bound; overrides `to_date` with the month's end.
    pub to_month: Option<NaiveDate>,
    /// Year-granular bound, used when `from_month` is absent.
    pub from_year: Option<i32>,
    /// Year-granular bound, used when `to_month` is absent.
    pub to_year: Option<i32>,

    #[serde(default = "default_number_of_months")]
    pub number_of_months: usize,
    pub paged_navigation: bool,
    pub reverse_months: bool,
    pub disable_navigation: bool,
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    pub show_outside_days: bool,

    pub mode: SelectionMode,

    pub disabled: Vec<MatcherSpec>,
    pub hidden: Vec<MatcherSpec>,
    /// User-defined modifier keys with their matchers.
    pub modifiers: HashMap<String, Vec<MatcherSpec>>,

    /// Predicate and other code-only matchers, attached programmatically.
    #[serde(skip)]
    pub custom_matchers: Vec<(ModifierKey, Matcher)>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            month: None,
            default_month: None,
            today: None,
            from_date: None,
            to_date: None,
            from_month: None,
            to_month: None,
            from_year: None,
            to_year: None,
            number_of_months: default_number_of_months(),
            paged_navigation: false,
            reverse_months: false,
            disable_navigation: false,
            week_start: default_week_start(),
            show_outside_days: false,
            mode: SelectionMode::default(),
            disabled: Vec::new(),
            hidden: Vec::new(),
            modifiers: HashMap::new(),
            custom_matchers: Vec::new(),
        }
    }
}

impl PickerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.bounds()?;
        config.user_modifiers()?;
        Ok(config)
    }

    /// The day-granular navigation bounds, normalized from whichever of the
    /// date/month/year fields are set. Month bounds override date bounds;
    /// year bounds apply when no month bound is given (`from_year` means
    /// Jan 1, `to_year` means Dec 31).
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ConfigError> {
        let from = if let Some(month) = self.from_month {
            Some(start_of_month(month))
        } else if let Some(year) = self.from_year {
            Some(
                NaiveDate::from_ymd_opt(year, 1, 1)
                    .ok_or_else(|| ConfigError::InvalidBounds(format!("from_year {}", year)))?,
            )
        } else {
            self.from_date
        };
        let to = if let Some(month) = self.to_month {
            Some(end_of_month(month))
        } else if let Some(year) = self.to_year {
            Some(
                NaiveDate::from_ymd_opt(year, 12, 31)
                    .ok_or_else(|| ConfigError::InvalidBounds(format!("to_year {}", year)))?,
            )
        } else {
            self.to_date
        };
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(ConfigError::InvalidBounds(format!(
                    "to bound {} precedes from bound {}",
                    to, from
                )));
            }
        }
        Ok((from, to))
    }

    /// The user-supplied modifier table (without the synthesized bound and
    /// selection entries, which the picker merges per event).
    pub fn user_modifiers(&self) -> Result<Modifiers, ConfigError> {
        let mut modifiers = Modifiers::new();
        for (key, specs) in [
            (ModifierKey::Disabled, &self.disabled),
            (ModifierKey::Hidden, &self.hidden),
        ] {
            if !specs.is_empty() {
                let matchers = specs
                    .iter()
                    .map(MatcherSpec::to_matcher)
                    .collect::<Result<Vec<_>, _>>()?;
                modifiers.insert(key, matchers);
            }
        }
        for (name, specs) in &self.modifiers {
            let matchers = specs
                .iter()
                .map(MatcherSpec::to_matcher)
                .collect::<Result<Vec<_>, _>>()?;
            modifiers.insert(ModifierKey::Custom(name.clone()), matchers);
        }
        for (key, matcher) in &self.custom_matchers {
            modifiers.entry(key.clone()).or_default().push(matcher.clone());
        }
        Ok(modifiers)
    }
}
