use ratatui::style::{Color, Modifier, Style};

/// Colors for the month grid.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub header: Color,
    pub weekday: Color,
    pub weekend: Color,
    pub day: Color,
    pub outside: Color,
    pub disabled: Color,
    pub today: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub range_middle_bg: Color,
    pub focused_bg: Color,
    pub help_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            colors: ThemeColors {
                header: Color::Cyan,
                weekday: Color::Cyan,
                weekend: Color::Rgb(150, 150, 150),
                day: Color::White,
                outside: Color::DarkGray,
                disabled: Color::DarkGray,
                today: Color::Yellow,
                selected_bg: Color::Blue,
                selected_fg: Color::White,
                range_middle_bg: Color::Rgb(30, 50, 90),
                focused_bg: Color::Rgb(60, 60, 60),
                help_text: Color::DarkGray,
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                header: Color::Blue,
                weekday: Color::Blue,
                weekend: Color::Gray,
                day: Color::Black,
                outside: Color::Gray,
                disabled: Color::Gray,
                today: Color::Red,
                selected_bg: Color::Blue,
                selected_fg: Color::White,
                range_middle_bg: Color::Rgb(200, 215, 245),
                focused_bg: Color::Rgb(220, 220, 220),
                help_text: Color::Gray,
            },
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn today_style(&self) -> Style {
        Style::default()
            .fg(self.colors.today)
            .add_modifier(Modifier::BOLD)
    }
}
