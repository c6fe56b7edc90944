use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Button label, showing the theme a press switches to.
    pub fn switch_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark",
            Theme::Dark => "Light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                base: Style::new().fg(Color::Black).bg(Color::White),
                dim: Style::new().fg(Color::DarkGray).bg(Color::White),
                glow: Style::new()
                    .fg(Color::Blue)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
                button: Style::new().fg(Color::White).bg(Color::Blue),
                secondary: Style::new().fg(Color::Black).bg(Color::Gray),
                focused: Style::new().fg(Color::Black).bg(Color::LightYellow),
            },
            Theme::Dark => Palette {
                base: Style::new().fg(Color::Gray).bg(Color::Black),
                dim: Style::new().fg(Color::DarkGray).bg(Color::Black),
                glow: Style::new()
                    .fg(Color::LightCyan)
                    .bg(Color::Black)
                    .add_modifier(Modifier::BOLD),
                button: Style::new().fg(Color::Black).bg(Color::Cyan),
                secondary: Style::new().fg(Color::White).bg(Color::DarkGray),
                focused: Style::new().fg(Color::White).bg(Color::Blue),
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub base: Style,
    pub dim: Style,
    pub glow: Style,
    pub button: Style,
    pub secondary: Style,
    pub focused: Style,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }
}
