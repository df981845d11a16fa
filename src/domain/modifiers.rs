use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::dateops;
use crate::domain::matcher::{Matcher, is_match};

/// Names a boolean classification of a day.
///
/// The built-ins drive focus eligibility and built-in styling; `Custom`
/// keys are opaque to the core and only surface through
/// [`ActiveModifiers`] for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    Selected,
    Disabled,
    Hidden,
    Today,
    Outside,
    RangeStart,
    RangeMiddle,
    RangeEnd,
    Custom(String),
}

/// The full modifier table: every named modifier with its matchers.
pub type Modifiers = HashMap<ModifierKey, Vec<Matcher>>;

/// The set of modifiers active for one day.
///
/// Absence means false; no modifier is ever stored as explicitly false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveModifiers(HashSet<ModifierKey>);

impl ActiveModifiers {
    pub fn is(&self, key: &ModifierKey) -> bool {
        self.0.contains(key)
    }

    pub fn insert(&mut self, key: ModifierKey) {
        self.0.insert(key);
    }

    pub fn is_focusable(&self) -> bool {
        !self.is(&ModifierKey::Disabled) && !self.is(&ModifierKey::Hidden)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModifierKey> {
        self.0.iter()
    }
}

/// Classify `day` against every modifier in the table.
///
/// When `display_month` is given and `day` belongs to a different month,
/// `Outside` is forced on regardless of any configured matcher.
pub fn active_modifiers(
    day: NaiveDate,
    modifiers: &Modifiers,
    display_month: Option<NaiveDate>,
) -> ActiveModifiers {
    let mut active = ActiveModifiers::default();
    for (key, matchers) in modifiers {
        if is_match(day, matchers) {
            active.insert(key.clone());
        }
    }
    if let Some(month) = display_month {
        if !dateops::is_same_month(day, month) {
            active.insert(ModifierKey::Outside);
        }
    }
    active
}

/// Build the modifier table the picker evaluates days against.
///
/// Starts from the user-configured table, synthesizes `Disabled` entries
/// for the navigation bounds (days strictly outside `from_date..=to_date`),
/// marks `today`, and merges the selection-mode contribution on top.
pub fn assemble_modifiers(
    user: &Modifiers,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    today: NaiveDate,
    contribution: Modifiers,
) -> Modifiers {
    let mut modifiers = user.clone();
    if let Some(from) = from_date {
        modifiers
            .entry(ModifierKey::Disabled)
            .or_default()
            .push(Matcher::Before(from));
    }
    if let Some(to) = to_date {
        modifiers
            .entry(ModifierKey::Disabled)
            .or_default()
            .push(Matcher::After(to));
    }
    modifiers
        .entry(ModifierKey::Today)
        .or_default()
        .push(Matcher::Day(today));
    for (key, matchers) in contribution {
        modifiers.entry(key).or_default().extend(matchers);
    }
    modifiers
}
