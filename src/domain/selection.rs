use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::matcher::Matcher;
use crate::domain::modifiers::{ModifierKey, Modifiers};
use crate::domain::range::{DateRange, add_to_range};

/// How day clicks build a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionMode {
    /// One day at a time; clicking the selected day clears it unless
    /// `required`.
    Single {
        #[serde(default)]
        required: bool,
    },
    /// Any number of days between `min` and `max`.
    Multiple {
        #[serde(default)]
        min: usize,
        #[serde(default)]
        max: Option<usize>,
    },
    /// A `from`/`to` range with an optional length window in days.
    Range {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Single { required: false }
    }
}

/// The current selection, shaped by the mode that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Single(Option<NaiveDate>),
    Multiple(Vec<NaiveDate>),
    Range(Option<DateRange>),
}

impl Selection {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single { .. } => Self::Single(None),
            SelectionMode::Multiple { .. } => Self::Multiple(Vec::new()),
            SelectionMode::Range { .. } => Self::Range(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(day) => day.is_none(),
            Self::Multiple(days) => days.is_empty(),
            Self::Range(range) => range.is_none(),
        }
    }

    /// Apply one day click. Clicks that would violate the mode's
    /// constraints (deselecting below `min`, selecting beyond `max`) are
    /// ignored; the matching days are already marked disabled by
    /// [`Selection::contribution`], so this is a second line of defense for
    /// callers that skip the modifier check.
    pub fn click(&mut self, day: NaiveDate, mode: SelectionMode) {
        match (self, mode) {
            (Self::Single(selected), SelectionMode::Single { required }) => {
                if *selected == Some(day) {
                    if !required {
                        *selected = None;
                    }
                } else {
                    *selected = Some(day);
                }
            }
            (Self::Multiple(days), SelectionMode::Multiple { min, max }) => {
                if let Some(pos) = days.iter().position(|&d| d == day) {
                    if days.len() > min {
                        days.remove(pos);
                    }
                } else if max.is_none_or(|max| days.len() < max) {
                    days.push(day);
                    days.sort_unstable();
                }
            }
            (Self::Range(range), SelectionMode::Range { .. }) => {
                *range = add_to_range(day, *range);
            }
            (selection, mode) => {
                // Selection and mode were constructed together; reaching
                // here means the caller rebuilt one without the other.
                unreachable!("selection {:?} does not fit mode {:?}", selection, mode);
            }
        }
    }

    /// The modifiers this selection contributes to the day classification:
    /// `Selected` always, the range anatomy keys in range mode, and the
    /// mode-specific `Disabled` entries (unselected days at the `max` count
    /// in multiple mode, days breaking the length window while a range is
    /// open in range mode).
    pub fn contribution(&self, mode: SelectionMode) -> Modifiers {
        let mut modifiers = Modifiers::new();
        match (self, mode) {
            (Self::Single(selected), _) => {
                if let Some(day) = *selected {
                    modifiers.insert(ModifierKey::Selected, vec![Matcher::Day(day)]);
                }
            }
            (Self::Multiple(days), SelectionMode::Multiple { max, .. }) => {
                if !days.is_empty() {
                    modifiers.insert(ModifierKey::Selected, vec![Matcher::Days(days.clone())]);
                }
                if max.is_some_and(|max| days.len() >= max) {
                    let selected = days.clone();
                    modifiers.insert(
                        ModifierKey::Disabled,
                        vec![Matcher::predicate(move |day| !selected.contains(&day))],
                    );
                }
            }
            (Self::Range(Some(range)), SelectionMode::Range { min, max }) => {
                modifiers.insert(ModifierKey::Selected, vec![Matcher::Range(*range)]);
                if let Some(from) = range.from {
                    modifiers.insert(ModifierKey::RangeStart, vec![Matcher::Day(from)]);
                    let to = range.to.unwrap_or(from);
                    modifiers.insert(ModifierKey::RangeEnd, vec![Matcher::Day(to)]);
                    if to > from.succ_opt().unwrap_or(to) {
                        modifiers.insert(
                            ModifierKey::RangeMiddle,
                            vec![Matcher::Range(DateRange::new(
                                from.succ_opt(),
                                to.pred_opt(),
                            ))],
                        );
                    }
                    // While the range is open, disable days that could not
                    // legally become the other endpoint.
                    if range.to.is_none() {
                        let mut disabled = Vec::new();
                        // `min`/`max` count days inclusively, so a valid
                        // other endpoint sits min-1..=max-1 days away. The
                        // anchor itself stays clickable so the selection
                        // can be completed or restarted.
                        if let Some(min) = min.filter(|&min| min > 2) {
                            disabled.push(Matcher::Range(DateRange::new(
                                Some(from.succ_opt().unwrap_or(from)),
                                Some(from + Duration::days(min - 2)),
                            )));
                            disabled.push(Matcher::Range(DateRange::new(
                                Some(from - Duration::days(min - 2)),
                                from.pred_opt(),
                            )));
                        }
                        if let Some(max) = max.filter(|&max| max > 0) {
                            disabled.push(Matcher::Before(from - Duration::days(max - 1)));
                            disabled.push(Matcher::After(from + Duration::days(max - 1)));
                        }
                        if !disabled.is_empty() {
                            modifiers.insert(ModifierKey::Disabled, disabled);
                        }
                    }
                }
            }
            _ => {}
        }
        modifiers
    }
}
