use std::io::{self, Stdout, stdout};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, poll};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::tty::IsTty;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use super::theme::Theme;
use crate::application::picker::DatePicker;
use crate::domain::dateops::{end_of_month, end_of_week, start_of_month, start_of_week};
use crate::domain::{FocusDirection, FocusMove, ModifierKey, Selection, SelectionMode};

const CELL_WIDTH: u16 = 4;
const MONTH_WIDTH: u16 = 7 * CELL_WIDTH + 6;
const MONTH_HEIGHT: u16 = 9; // title + weekday header + up to 6 week rows + border slack
const HELP_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
pub enum MonthViewResult {
    /// User left without committing a selection.
    Cancelled,
    /// User committed the current selection.
    Committed(Selection),
}

/// One prepared grid cell: the day, its label, and how to paint it.
struct DayCell {
    label: String,
    style: Style,
}

pub struct MonthView<'a> {
    picker: &'a mut DatePicker,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    should_exit: bool,
    committed: bool,
    show_help: bool,
    theme: Theme,
}

impl<'a> MonthView<'a> {
    pub fn new(picker: &'a mut DatePicker, theme: Theme) -> io::Result<Self> {
        if !IsTty::is_tty(&stdout()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Not running in a TTY, cannot initialize terminal interface",
            ));
        }

        enable_raw_mode().map_err(|e| {
            io::Error::other(format!("Failed to enable raw mode: {}", e))
        })?;

        stdout().execute(EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode();
            io::Error::other(format!("Failed to enter alternate screen: {}", e))
        })?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend).map_err(|e| {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            io::Error::other(format!("Failed to create terminal: {}", e))
        })?;

        // Give keyboard focus its starting day before the first draw
        if picker.focused_day().is_none() {
            if let Some(target) = picker.focus_target() {
                picker.focus(target);
            }
        }

        Ok(Self {
            picker,
            terminal,
            should_exit: false,
            committed: false,
            show_help: false,
            theme,
        })
    }

    /// The weeks covering a month's grid, from the week of the 1st through
    /// the week of the last day.
    fn grid_weeks(month: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
        let first = start_of_week(start_of_month(month), week_start);
        let last = end_of_week(end_of_month(month), week_start);
        let mut weeks = Vec::new();
        let mut week = first;
        while week <= last {
            weeks.push(week);
            week += Duration::days(7);
        }
        weeks
    }

    fn weekday_header(week_start: Weekday, theme: &Theme) -> Row<'static> {
        let mut weekday = week_start;
        let mut cells = Vec::with_capacity(7);
        for _ in 0..7 {
            let color = if matches!(weekday, Weekday::Sat | Weekday::Sun) {
                theme.colors.weekend
            } else {
                theme.colors.weekday
            };
            let label = match weekday {
                Weekday::Mon => "Mon",
                Weekday::Tue => "Tue",
                Weekday::Wed => "Wed",
                Weekday::Thu => "Thu",
                Weekday::Fri => "Fri",
                Weekday::Sat => "Sat",
                Weekday::Sun => "Sun",
            };
            cells.push(Cell::from(label).style(Style::default().fg(color)));
            weekday = weekday.succ();
        }
        Row::new(cells).height(1)
    }

    fn day_cell(
        picker: &DatePicker,
        day: NaiveDate,
        display_month: NaiveDate,
        theme: &Theme,
    ) -> DayCell {
        let active = picker.active_modifiers(day, Some(display_month));
        let outside = active.is(&ModifierKey::Outside);
        if active.is(&ModifierKey::Hidden)
            || (outside && !picker.config().show_outside_days)
        {
            return DayCell {
                label: String::new(),
                style: Style::default(),
            };
        }

        let focused = picker.focused_day() == Some(day);
        let mut style = Style::default().fg(theme.colors.day);
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            style = style.fg(theme.colors.weekend);
        }
        if outside {
            style = style.fg(theme.colors.outside);
        }
        if active.is(&ModifierKey::Today) {
            style = theme.today_style();
        }
        if active.is(&ModifierKey::Disabled) {
            style = Style::default()
                .fg(theme.colors.disabled)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        if active.is(&ModifierKey::RangeMiddle) {
            style = style.bg(theme.colors.range_middle_bg);
        }
        if active.is(&ModifierKey::Selected) && !active.is(&ModifierKey::RangeMiddle) {
            style = Style::default()
                .fg(theme.colors.selected_fg)
                .bg(theme.colors.selected_bg);
        }
        if focused {
            style = style.bg(theme.colors.focused_bg).add_modifier(Modifier::BOLD);
        }

        DayCell {
            label: format!("{:>2}", day.day()),
            style,
        }
    }

    fn month_table(
        picker: &DatePicker,
        month: NaiveDate,
        theme: &Theme,
    ) -> Table<'static> {
        let week_start = picker.config().week_start;
        let rows: Vec<Row> = Self::grid_weeks(month, week_start)
            .into_iter()
            .map(|week| {
                let cells: Vec<Cell> = (0..7)
                    .map(|i| {
                        let day = week + Duration::days(i);
                        let cell = Self::day_cell(picker, day, month, theme);
                        Cell::from(cell.label).style(cell.style)
                    })
                    .collect();
                Row::new(cells)
            })
            .collect();

        let widths = [Constraint::Length(CELL_WIDTH - 1); 7];
        Table::new(rows, widths)
            .header(Self::weekday_header(week_start, theme))
            .block(
                Block::default()
                    .borders(Borders::NONE)
                    .title(format!("{}", month.format("%B %Y")))
                    .title_style(Style::default().fg(theme.colors.header))
                    .title_alignment(Alignment::Center),
            )
            .column_spacing(1)
    }

    fn calculate_centered_area(available: Rect, needed_width: u16, needed_height: u16) -> Rect {
        let width = std::cmp::min(available.width, needed_width);
        let height = std::cmp::min(available.height, needed_height);
        let left_margin = available.width.saturating_sub(width) / 2;
        let top_margin = available.height.saturating_sub(height) / 2;
        Rect {
            x: available.x + left_margin,
            y: available.y + top_margin,
            width,
            height,
        }
    }

    fn status_line(picker: &DatePicker, theme: &Theme) -> Paragraph<'static> {
        let selection = match picker.selection() {
            Selection::Single(None) | Selection::Range(None) => "nothing selected".to_string(),
            Selection::Single(Some(day)) => day.format("%A, %B %d, %Y").to_string(),
            Selection::Multiple(days) if days.is_empty() => "nothing selected".to_string(),
            Selection::Multiple(days) => format!("{} days selected", days.len()),
            Selection::Range(Some(range)) => match (range.from, range.to) {
                (Some(from), Some(to)) => format!("{} .. {}", from, to),
                (Some(from), None) => format!("{} .. ?", from),
                _ => "nothing selected".to_string(),
            },
        };
        let lines = vec![
            Line::from(vec![Span::styled(
                "←→↑↓=Move • Home/End=Week edge • PgUp/PgDn=Month • n/p=Page • t=Today • Space=Pick • Enter=Accept • q=Quit",
                Style::default().fg(theme.colors.help_text),
            )]),
            Line::from(vec![Span::styled(
                selection,
                Style::default().fg(theme.colors.day),
            )]),
        ];
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Center)
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                self.should_exit = true;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                self.should_exit = true;
            }

            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => {
                self.picker.move_focus(FocusMove::Day, FocusDirection::Before);
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => {
                self.picker.move_focus(FocusMove::Day, FocusDirection::After);
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                self.picker.move_focus(FocusMove::Week, FocusDirection::Before);
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                self.picker.move_focus(FocusMove::Week, FocusDirection::After);
            }
            (KeyCode::PageUp, KeyModifiers::SHIFT) => {
                self.picker.move_focus(FocusMove::Year, FocusDirection::Before);
            }
            (KeyCode::PageDown, KeyModifiers::SHIFT) => {
                self.picker.move_focus(FocusMove::Year, FocusDirection::After);
            }
            (KeyCode::PageUp, _) => {
                self.picker.move_focus(FocusMove::Month, FocusDirection::Before);
            }
            (KeyCode::PageDown, _) => {
                self.picker.move_focus(FocusMove::Month, FocusDirection::After);
            }
            (KeyCode::Home, _) => {
                self.picker
                    .move_focus(FocusMove::StartOfWeek, FocusDirection::Before);
            }
            (KeyCode::End, _) => {
                self.picker
                    .move_focus(FocusMove::EndOfWeek, FocusDirection::After);
            }

            // Month paging without moving focus
            (KeyCode::Char('n'), _) => {
                if let Some(month) = self.picker.next_month() {
                    self.picker.goto_month(month);
                }
            }
            (KeyCode::Char('p'), _) => {
                if let Some(month) = self.picker.previous_month() {
                    self.picker.goto_month(month);
                }
            }

            (KeyCode::Char('t'), _) => {
                let today = self.picker.today();
                self.picker.goto_date(today, self.picker.focused_day());
                self.picker.focus(today);
            }

            (KeyCode::Char(' '), _) => {
                if let Some(day) = self.picker.focused_day() {
                    self.picker.click_day(day);
                }
            }
            (KeyCode::Enter, _) => {
                // In single mode Enter both picks and accepts; in the other
                // modes it accepts whatever has been picked so far.
                if let Some(day) = self.picker.focused_day() {
                    if matches!(self.picker.mode(), SelectionMode::Single { .. }) {
                        self.picker.click_day(day);
                    }
                }
                if !self.picker.selection().is_empty() {
                    self.committed = true;
                    self.should_exit = true;
                }
            }

            (KeyCode::Char('?'), _) => {
                self.show_help = !self.show_help;
            }

            _ => {}
        }
    }

    pub fn run(&mut self) -> io::Result<MonthViewResult> {
        loop {
            if self.should_exit {
                break;
            }

            let months = self.picker.display_months();
            let theme = self.theme.clone();
            let tables: Vec<Table<'static>> = months
                .iter()
                .map(|&month| Self::month_table(self.picker, month, &theme))
                .collect();
            let status = Self::status_line(self.picker, &theme);
            let month_count = months.len().max(1) as u16;

            self.terminal.draw(|frame| {
                let size = frame.area();
                let needed_width = month_count * (MONTH_WIDTH + 2);
                let needed_height = MONTH_HEIGHT + HELP_HEIGHT;
                let centered = Self::calculate_centered_area(size, needed_width, needed_height);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(MONTH_HEIGHT),
                        Constraint::Length(HELP_HEIGHT),
                    ])
                    .split(centered);

                let month_areas = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(vec![Constraint::Length(MONTH_WIDTH + 2); month_count as usize])
                    .split(chunks[0]);

                for (table, area) in tables.into_iter().zip(month_areas.iter()) {
                    frame.render_widget(table, *area);
                }
                frame.render_widget(status, chunks[1]);
            })?;

            match poll(std::time::Duration::from_millis(100))? {
                true => match event::read()? {
                    Event::Key(key) => {
                        self.handle_key_event(key);
                    }
                    Event::Resize(_, _) => {
                        continue;
                    }
                    _ => {
                        continue;
                    }
                },
                false => {
                    continue;
                }
            }
        }

        self.cleanup()?;

        if self.committed {
            Ok(MonthViewResult::Committed(self.picker.selection().clone()))
        } else {
            Ok(MonthViewResult::Cancelled)
        }
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

impl<'a> Drop for MonthView<'a> {
    fn drop(&mut self) {
        // Fallback cleanup if explicit cleanup wasn't called
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn grid_weeks_cover_the_whole_month() {
        let weeks = MonthView::grid_weeks(d(2022, 8, 1), Weekday::Sun);
        assert_eq!(weeks.first(), Some(&d(2022, 7, 31)));
        assert_eq!(weeks.len(), 5);
        // A Monday-start grid shifts the leading edge
        let weeks = MonthView::grid_weeks(d(2022, 8, 1), Weekday::Mon);
        assert_eq!(weeks.first(), Some(&d(2022, 8, 1)));
    }

    #[test]
    fn grid_weeks_handles_six_week_months() {
        let weeks = MonthView::grid_weeks(d(2022, 10, 1), Weekday::Sun);
        assert_eq!(weeks.len(), 6);
    }
}
