use chrono::NaiveDate;
use log::debug;

use crate::application::config::PickerConfig;
use crate::domain::{
    ConfigError, FocusContext, FocusDirection, FocusMove, FocusState, Modifiers, NavOptions,
    NavigationState, Selection, SelectionMode, assemble_modifiers, initial_month,
    next_focus, InitialMonth,
};
use crate::domain::modifiers::{ActiveModifiers, ModifierKey, active_modifiers};

/// One date-picker instance: configuration plus the navigation and focus
/// state machines and the current selection.
///
/// Every user event funnels through one method here, and each method
/// updates focus and navigation together, so the two can never be derived
/// from different events.
pub struct DatePicker {
    config: PickerConfig,
    user_modifiers: Modifiers,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    today: NaiveDate,
    nav: NavigationState,
    focus: FocusState,
    selection: Selection,
}

impl DatePicker {
    pub fn new(config: PickerConfig) -> Result<Self, ConfigError> {
        let (from_date, to_date) = config.bounds()?;
        let user_modifiers = config.user_modifiers()?;
        let today = config
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let initial = initial_month(&InitialMonth {
            month: config.month,
            default_month: config.default_month,
            today: Some(today),
            from_date,
            to_date,
            number_of_months: config.number_of_months,
        });
        let selection = Selection::empty(config.mode);
        Ok(Self {
            nav: NavigationState::new(initial),
            focus: FocusState::default(),
            selection,
            user_modifiers,
            from_date,
            to_date,
            today,
            config,
        })
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn mode(&self) -> SelectionMode {
        self.config.mode
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn nav_options(&self) -> NavOptions {
        NavOptions {
            number_of_months: self.config.number_of_months,
            from_date: self.from_date,
            to_date: self.to_date,
            paged_navigation: self.config.paged_navigation,
            reverse_months: self.config.reverse_months,
            disable_navigation: self.config.disable_navigation,
        }
    }

    /// The full modifier table for the current selection state.
    pub fn modifiers(&self) -> Modifiers {
        assemble_modifiers(
            &self.user_modifiers,
            self.from_date,
            self.to_date,
            self.today,
            self.selection.contribution(self.config.mode),
        )
    }

    /// Classify one day; `display_month` marks days rendered outside their
    /// own month.
    pub fn active_modifiers(
        &self,
        day: NaiveDate,
        display_month: Option<NaiveDate>,
    ) -> ActiveModifiers {
        active_modifiers(day, &self.modifiers(), display_month)
    }

    // Navigation surface

    pub fn display_months(&self) -> Vec<NaiveDate> {
        self.nav.display_months(&self.nav_options())
    }

    pub fn current_month(&self) -> NaiveDate {
        self.nav.current_month()
    }

    pub fn next_month(&self) -> Option<NaiveDate> {
        self.nav.next_month(&self.nav_options())
    }

    pub fn previous_month(&self) -> Option<NaiveDate> {
        self.nav.previous_month(&self.nav_options())
    }

    pub fn goto_month(&mut self, month: NaiveDate) {
        self.nav.goto_month(month);
    }

    pub fn goto_date(&mut self, date: NaiveDate, ref_date: Option<NaiveDate>) {
        let options = self.nav_options();
        self.nav.goto_date(date, ref_date, &options);
    }

    pub fn is_date_displayed(&self, date: NaiveDate) -> bool {
        self.nav.is_date_displayed(date, &self.nav_options())
    }

    // Focus surface

    pub fn focused_day(&self) -> Option<NaiveDate> {
        self.focus.focused_day()
    }

    /// The day that should receive keyboard focus when none has it.
    pub fn focus_target(&self) -> Option<NaiveDate> {
        let months = self.display_months();
        let modifiers = self.modifiers();
        self.focus
            .focus_target(&months, &modifiers, |day| self.is_date_displayed(day))
    }

    pub fn focus(&mut self, day: NaiveDate) {
        self.focus.focus(day);
    }

    pub fn blur(&mut self) {
        self.focus.blur();
    }

    /// Move the focused day by one unit, skipping disabled/hidden days and
    /// pulling the grid along when the landing day is not displayed. A
    /// no-op when nothing is focused or no further day is focusable.
    pub fn move_focus(&mut self, move_by: FocusMove, direction: FocusDirection) {
        let Some(focused) = self.focus.focused_day() else {
            return;
        };
        let modifiers = self.modifiers();
        let context = FocusContext {
            modifiers: &modifiers,
            from_date: self.from_date,
            to_date: self.to_date,
            week_start: self.config.week_start,
        };
        let next = next_focus(focused, move_by, direction, &context);
        if next == focused {
            return;
        }
        debug!("focus: {} -> {}", focused, next);
        if !self.is_date_displayed(next) {
            let options = self.nav_options();
            self.nav.goto_date(next, Some(focused), &options);
        }
        self.focus.focus(next);
    }

    // Selection surface

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Apply a click on a day. Disabled days are inert; any other day takes
    /// focus and feeds the mode's selection algorithm.
    pub fn click_day(&mut self, day: NaiveDate) {
        let active = self.active_modifiers(day, None);
        if active.is(&ModifierKey::Disabled) {
            debug!("click ignored on disabled day {}", day);
            return;
        }
        self.selection.click(day, self.config.mode);
        self.focus.focus(day);
    }
}
