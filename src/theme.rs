use ratatui::style::Color;
use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub buffer_bg: Color,
    pub list_bg: Color,
    pub echo_bg: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub active_fg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            buffer_bg: Color::Rgb(44, 44, 44),
            list_bg: Color::Rgb(48, 48, 48),
            echo_bg: Color::Rgb(36, 36, 36),
            text_fg: Color::Rgb(225, 225, 225),
            muted_fg: Color::Rgb(150, 150, 150),
            active_fg: Color::Rgb(255, 255, 255),
            selection_fg: Color::Rgb(90, 145, 200),
        }
    }
}

/// The `[colors]` table of `bufswitch.toml`. Each entry is optional and takes a color
/// name (`darkgray`), a palette index (`236`) or `#rrggbb`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorsToml {
    buffer_bg: Option<String>,
    list_bg: Option<String>,
    echo_bg: Option<String>,
    text_fg: Option<String>,
    muted_fg: Option<String>,
    active_fg: Option<String>,
    selection_fg: Option<String>,
}

impl Theme {
    /// Replaces the colors named in `colors`, leaving the rest untouched.
    pub fn with_overrides(mut self, colors: ColorsToml) -> Result<Self, ConfigError> {
        let slots = [
            ("buffer_bg", colors.buffer_bg, &mut self.buffer_bg),
            ("list_bg", colors.list_bg, &mut self.list_bg),
            ("echo_bg", colors.echo_bg, &mut self.echo_bg),
            ("text_fg", colors.text_fg, &mut self.text_fg),
            ("muted_fg", colors.muted_fg, &mut self.muted_fg),
            ("active_fg", colors.active_fg, &mut self.active_fg),
            ("selection_fg", colors.selection_fg, &mut self.selection_fg),
        ];
        for (key, value, slot) in slots {
            if let Some(value) = value {
                *slot = parse_color(key, &value)?;
            }
        }
        Ok(self)
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, ConfigError> {
    value
        .trim()
        .parse::<Color>()
        .map_err(|_| ConfigError::InvalidColor {
            key: key.to_string(),
            value: value.to_string(),
        })
}
