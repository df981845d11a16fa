use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, Weekday};
use clap::{Parser, ValueEnum};

use crate::application::config::PickerConfig;
use crate::application::picker::DatePicker;
use crate::application::tui::{MonthView, MonthViewResult, Theme};
use crate::domain::{Selection, SelectionMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Single,
    Multiple,
    Range,
}

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(about = "A keyboard-driven month-grid date picker for the terminal")]
#[command(version)]
pub struct Cli {
    /// Month to open on (YYYY-MM-DD, defaults to the current month)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Number of months shown side by side
    #[arg(short, long)]
    pub months: Option<usize>,

    /// Earliest selectable day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest selectable day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Selection mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// First day of the week (e.g. "sun", "monday")
    #[arg(long)]
    pub week_start: Option<String>,

    /// Page by the full number of displayed months
    #[arg(long)]
    pub paged: bool,

    /// JSON configuration file; CLI flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color theme (dark, light)
    #[arg(long, default_value = "dark")]
    pub theme: String,

    /// Print the committed selection as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_date(value: &str, what: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{} is not a valid {} date (expected YYYY-MM-DD)", value, what))
}

impl Cli {
    pub fn run() -> anyhow::Result<()> {
        let cli = Self::parse();

        let mut config = match &cli.config {
            Some(path) => PickerConfig::load(path)?,
            None => PickerConfig::default(),
        };

        if let Some(date) = &cli.date {
            config.default_month = Some(parse_date(date, "--date")?);
        }
        if let Some(from) = &cli.from {
            config.from_date = Some(parse_date(from, "--from")?);
        }
        if let Some(to) = &cli.to {
            config.to_date = Some(parse_date(to, "--to")?);
        }
        if let Some(months) = cli.months {
            config.number_of_months = months.max(1);
        }
        if cli.paged {
            config.paged_navigation = true;
        }
        if let Some(mode) = cli.mode {
            config.mode = match mode {
                ModeArg::Single => SelectionMode::Single { required: false },
                ModeArg::Multiple => SelectionMode::Multiple { min: 0, max: None },
                ModeArg::Range => SelectionMode::Range { min: None, max: None },
            };
        }
        if let Some(week_start) = &cli.week_start {
            config.week_start = Weekday::from_str(week_start)
                .map_err(|_| anyhow::anyhow!("{} is not a weekday name", week_start))?;
        }

        let mut picker = DatePicker::new(config)?;
        let result = {
            let mut view = MonthView::new(&mut picker, Theme::by_name(&cli.theme))?;
            view.run()?
        };

        match result {
            MonthViewResult::Committed(selection) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&selection)?);
                } else {
                    print_selection(&selection);
                }
            }
            MonthViewResult::Cancelled => {
                std::process::exit(1);
            }
        }

        Ok(())
    }
}

fn print_selection(selection: &Selection) {
    match selection {
        Selection::Single(Some(day)) => println!("{}", day),
        Selection::Multiple(days) => {
            for day in days {
                println!("{}", day);
            }
        }
        Selection::Range(Some(range)) => match (range.from, range.to) {
            (Some(from), Some(to)) => println!("{} {}", from, to),
            (Some(from), None) => println!("{}", from),
            _ => {}
        },
        _ => {}
    }
}
