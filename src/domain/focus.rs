use chrono::{Duration, NaiveDate, Weekday};
use log::trace;

use crate::domain::dateops::{
    add_months, add_years, end_of_month, end_of_week, start_of_month, start_of_week,
};
use crate::domain::modifiers::{ModifierKey, Modifiers, active_modifiers};

/// The unit a focus movement steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Day,
    Week,
    Month,
    Year,
    StartOfWeek,
    EndOfWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Before,
    After,
}

/// Everything the traversal needs besides the focused day itself.
#[derive(Debug, Clone)]
pub struct FocusContext<'a> {
    pub modifiers: &'a Modifiers,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub week_start: Weekday,
}

/// Hard cap on skip-search iterations; a year of daily steps is more than
/// any reachable grid.
const MAX_SKIP_STEPS: usize = 366;

fn step(
    day: NaiveDate,
    move_by: FocusMove,
    direction: FocusDirection,
    week_start: Weekday,
) -> NaiveDate {
    let sign = match direction {
        FocusDirection::Before => -1,
        FocusDirection::After => 1,
    };
    match move_by {
        FocusMove::Day => day + Duration::days(sign),
        FocusMove::Week => day + Duration::days(sign * 7),
        FocusMove::Month => add_months(day, sign as i32),
        FocusMove::Year => add_years(day, sign as i32),
        FocusMove::StartOfWeek => start_of_week(day, week_start),
        FocusMove::EndOfWeek => end_of_week(day, week_start),
    }
}

fn clamp(day: NaiveDate, direction: FocusDirection, context: &FocusContext<'_>) -> NaiveDate {
    match direction {
        FocusDirection::Before => match context.from_date {
            Some(from) if day < from => from,
            _ => day,
        },
        FocusDirection::After => match context.to_date {
            Some(to) if day > to => to,
            _ => day,
        },
    }
}

/// Find the day that should receive focus after moving from `focused`.
///
/// Applies the step, clamps to the configured bounds, then keeps stepping
/// past days matched as disabled or hidden. The bound day itself is a
/// legitimate landing spot (the synthesized bound matchers are strict, so
/// they never disable it). The search is bounded: when a step stops making
/// progress, or the step budget runs out, the original day is returned
/// unchanged.
pub fn next_focus(
    focused: NaiveDate,
    move_by: FocusMove,
    direction: FocusDirection,
    context: &FocusContext<'_>,
) -> NaiveDate {
    let mut current = focused;
    for _ in 0..MAX_SKIP_STEPS {
        let candidate = clamp(step(current, move_by, direction, context.week_start), direction, context);
        if candidate == current {
            // Clamped back onto ourselves (or an idempotent start/end-of-week
            // step): nothing further is reachable in this direction.
            return focused;
        }
        if is_focusable(candidate, context) {
            return candidate;
        }
        trace!("focus: skipping {}", candidate);
        current = candidate;
    }
    focused
}

fn is_focusable(day: NaiveDate, context: &FocusContext<'_>) -> bool {
    active_modifiers(day, context.modifiers, None).is_focusable()
}

/// The day keyboard focus should land on when the grid is first rendered:
/// the first selected day in the displayed range, else the first day marked
/// today, else the first focusable day, scanning chronologically. `None`
/// when no displayed day can take focus.
pub fn initial_focus_target(
    display_months: &[NaiveDate],
    modifiers: &Modifiers,
) -> Option<NaiveDate> {
    let first = start_of_month(*display_months.iter().min()?);
    let last = end_of_month(*display_months.iter().max()?);

    let mut first_focusable = None;
    let mut today = None;
    let mut date = first;
    while date <= last {
        let active = active_modifiers(date, modifiers, None);
        if active.is_focusable() {
            if active.is(&ModifierKey::Selected) {
                return Some(date);
            }
            if active.is(&ModifierKey::Today) && today.is_none() {
                today = Some(date);
            }
            if first_focusable.is_none() {
                first_focusable = Some(date);
            }
        }
        date = date.succ_opt()?;
    }
    today.or(first_focusable)
}

/// Keyboard-focus bookkeeping for one grid instance.
///
/// `blur` remembers the day that had focus so tabbing back in can restore
/// position while that day is still displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    focused_day: Option<NaiveDate>,
    last_focused_day: Option<NaiveDate>,
}

impl FocusState {
    pub fn focused_day(&self) -> Option<NaiveDate> {
        self.focused_day
    }

    pub fn focus(&mut self, day: NaiveDate) {
        self.focused_day = Some(day);
    }

    pub fn blur(&mut self) {
        if let Some(day) = self.focused_day.take() {
            self.last_focused_day = Some(day);
        }
    }

    /// The day that should receive focus when none currently has it:
    /// the focused day, else the last focused day while it remains
    /// displayed, else the initial scan over the displayed range.
    pub fn focus_target(
        &self,
        display_months: &[NaiveDate],
        modifiers: &Modifiers,
        is_displayed: impl Fn(NaiveDate) -> bool,
    ) -> Option<NaiveDate> {
        if let Some(day) = self.focused_day {
            return Some(day);
        }
        if let Some(day) = self.last_focused_day {
            if is_displayed(day) {
                return Some(day);
            }
        }
        initial_focus_target(display_months, modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::matcher::Matcher;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn ctx(modifiers: &Modifiers) -> FocusContext<'_> {
        FocusContext {
            modifiers,
            from_date: None,
            to_date: None,
            week_start: Weekday::Sun,
        }
    }

    #[test]
    fn unconstrained_moves() {
        let modifiers = Modifiers::new();
        let context = ctx(&modifiers);
        let day = d(2022, 8, 17);
        let cases = [
            (FocusMove::Day, FocusDirection::After, d(2022, 8, 18)),
            (FocusMove::Day, FocusDirection::Before, d(2022, 8, 16)),
            (FocusMove::Week, FocusDirection::After, d(2022, 8, 24)),
            (FocusMove::Week, FocusDirection::Before, d(2022, 8, 10)),
            (FocusMove::Month, FocusDirection::After, d(2022, 9, 17)),
            (FocusMove::Month, FocusDirection::Before, d(2022, 7, 17)),
            (FocusMove::Year, FocusDirection::After, d(2023, 8, 17)),
            (FocusMove::Year, FocusDirection::Before, d(2021, 8, 17)),
        ];
        for (move_by, direction, expected) in cases {
            assert_eq!(next_focus(day, move_by, direction, &context), expected);
        }
    }

    #[test]
    fn week_edges_honor_week_start() {
        let modifiers = Modifiers::new();
        let mut context = ctx(&modifiers);
        context.week_start = Weekday::Mon;
        let day = d(2022, 8, 17);
        assert_eq!(
            next_focus(day, FocusMove::StartOfWeek, FocusDirection::Before, &context),
            d(2022, 8, 15)
        );
        assert_eq!(
            next_focus(day, FocusMove::EndOfWeek, FocusDirection::After, &context),
            d(2022, 8, 21)
        );
    }

    #[test]
    fn clamps_to_bounds() {
        let modifiers = Modifiers::new();
        let mut context = ctx(&modifiers);
        let day = d(2022, 8, 17);
        context.from_date = Some(d(2022, 8, 16));
        assert_eq!(
            next_focus(day, FocusMove::Week, FocusDirection::Before, &context),
            d(2022, 8, 16)
        );
        context.from_date = None;
        context.to_date = Some(d(2022, 8, 18));
        assert_eq!(
            next_focus(day, FocusMove::Week, FocusDirection::After, &context),
            d(2022, 8, 18)
        );
    }

    #[test]
    fn skips_disabled_and_hidden_days() {
        for key in [ModifierKey::Disabled, ModifierKey::Hidden] {
            let mut modifiers = Modifiers::new();
            modifiers.insert(key, vec![Matcher::Day(d(2022, 8, 18))]);
            let context = ctx(&modifiers);
            assert_eq!(
                next_focus(d(2022, 8, 17), FocusMove::Day, FocusDirection::After, &context),
                d(2022, 8, 19)
            );
        }
    }

    #[test]
    fn skipping_backward_lands_on_clamped_bound() {
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKey::Disabled, vec![Matcher::Day(d(2022, 8, 16))]);
        let mut context = ctx(&modifiers);
        context.from_date = Some(d(2022, 8, 1));
        // Month step back from Aug 17 clamps to Aug 1, which is focusable
        assert_eq!(
            next_focus(d(2022, 8, 17), FocusMove::Month, FocusDirection::Before, &context),
            d(2022, 8, 1)
        );
        context.from_date = None;
        context.to_date = Some(d(2022, 8, 31));
        assert_eq!(
            next_focus(d(2022, 8, 17), FocusMove::Month, FocusDirection::After, &context),
            d(2022, 8, 31)
        );
    }

    #[test]
    fn terminates_when_all_future_days_are_disabled() {
        let focused = d(2022, 8, 17);
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKey::Disabled, vec![Matcher::After(focused)]);
        let context = ctx(&modifiers);
        assert_eq!(
            next_focus(focused, FocusMove::Day, FocusDirection::After, &context),
            focused
        );
    }

    #[test]
    fn returns_original_when_clamped_bound_is_disabled_too() {
        let mut modifiers = Modifiers::new();
        modifiers.insert(
            ModifierKey::Disabled,
            vec![Matcher::Range(crate::domain::range::DateRange::new(
                Some(d(2022, 8, 18)),
                Some(d(2022, 8, 20)),
            ))],
        );
        let mut context = ctx(&modifiers);
        context.to_date = Some(d(2022, 8, 20));
        assert_eq!(
            next_focus(d(2022, 8, 17), FocusMove::Week, FocusDirection::After, &context),
            d(2022, 8, 17)
        );
    }

    #[test]
    fn focus_never_regresses_past_from_date() {
        let modifiers = Modifiers::new();
        let mut context = ctx(&modifiers);
        context.from_date = Some(d(2022, 8, 10));
        let mut day = d(2022, 8, 14);
        for _ in 0..10 {
            day = next_focus(day, FocusMove::Day, FocusDirection::Before, &context);
            assert!(day >= d(2022, 8, 10));
        }
        assert_eq!(day, d(2022, 8, 10));
    }

    #[test]
    fn initial_target_prefers_selected_then_today() {
        let months = [d(2022, 8, 1)];
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKey::Today, vec![Matcher::Day(d(2022, 8, 10))]);
        assert_eq!(initial_focus_target(&months, &modifiers), Some(d(2022, 8, 10)));

        modifiers.insert(ModifierKey::Selected, vec![Matcher::Day(d(2022, 8, 20))]);
        assert_eq!(initial_focus_target(&months, &modifiers), Some(d(2022, 8, 20)));
    }

    #[test]
    fn initial_target_falls_back_to_first_focusable() {
        let months = [d(2022, 8, 1)];
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKey::Disabled, vec![Matcher::Before(d(2022, 8, 4))]);
        assert_eq!(initial_focus_target(&months, &modifiers), Some(d(2022, 8, 4)));
    }

    #[test]
    fn initial_target_none_when_nothing_focusable() {
        let months = [d(2022, 8, 1)];
        let mut modifiers = Modifiers::new();
        modifiers.insert(ModifierKey::Hidden, vec![Matcher::predicate(|_| true)]);
        assert_eq!(initial_focus_target(&months, &modifiers), None);
    }

    #[test]
    fn blur_remembers_last_focused_day() {
        let mut state = FocusState::default();
        state.focus(d(2022, 8, 17));
        state.blur();
        assert_eq!(state.focused_day(), None);

        let months = [d(2022, 8, 1)];
        let modifiers = Modifiers::new();
        // Still displayed: restore position
        let target = state.focus_target(&months, &modifiers, |_| true);
        assert_eq!(target, Some(d(2022, 8, 17)));
        // No longer displayed: fall back to the initial scan
        let target = state.focus_target(&months, &modifiers, |_| false);
        assert_eq!(target, Some(d(2022, 8, 1)));
    }

    #[test]
    fn focused_day_wins_over_everything() {
        let mut state = FocusState::default();
        state.focus(d(2022, 8, 17));
        let months = [d(2022, 9, 1)];
        let modifiers = Modifiers::new();
        let target = state.focus_target(&months, &modifiers, |_| false);
        assert_eq!(target, Some(d(2022, 8, 17)));
    }
}
