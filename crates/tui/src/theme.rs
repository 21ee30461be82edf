//! Color configuration and the resolved theme handed to every render call.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tfplan_core::ChangeType;

/// User-facing color settings, as read from the `colors` section of the
/// config file. Values are color names or `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub info: String,
    pub success: String,
    pub warning: String,
    pub error: String,
    pub highlight: String,
    pub faint: String,
    pub drift: String,
    pub moved: String,
    pub cursor_background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            info: "#3366cc".into(),
            success: "#22aa22".into(),
            warning: "#ffaa00".into(),
            error: "#ff3333".into(),
            highlight: "#8833ff".into(),
            faint: "#777777".into(),
            drift: "#ff8800".into(),
            moved: "#66ccff".into(),
            cursor_background: "#303030".into(),
        }
    }
}

/// The `ui` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub cursor_char: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            cursor_char: ">".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
    pub ui: UiConfig,
}

/// Resolved colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight: Color,
    pub faint: Color,
    pub drift: Color,
    pub moved: Color,
    pub cursor_background: Color,
    pub cursor_char: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Theme {
    /// Resolve a config. Unparsable colors fall back to the defaults.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = ColorConfig::default();
        let colors = &config.colors;
        let pick = |name: &str, value: &str, fallback: &str| {
            parse_color(value).unwrap_or_else(|| {
                tracing::warn!("invalid color {value:?} for {name}, using {fallback}");
                parse_color(fallback).unwrap_or(Color::Reset)
            })
        };
        let cursor_char = if config.ui.cursor_char.is_empty() {
            UiConfig::default().cursor_char
        } else {
            config.ui.cursor_char.clone()
        };
        Self {
            info: pick("info", &colors.info, &defaults.info),
            success: pick("success", &colors.success, &defaults.success),
            warning: pick("warning", &colors.warning, &defaults.warning),
            error: pick("error", &colors.error, &defaults.error),
            highlight: pick("highlight", &colors.highlight, &defaults.highlight),
            faint: pick("faint", &colors.faint, &defaults.faint),
            drift: pick("drift", &colors.drift, &defaults.drift),
            moved: pick("moved", &colors.moved, &defaults.moved),
            cursor_background: pick(
                "cursor_background",
                &colors.cursor_background,
                &defaults.cursor_background,
            ),
            cursor_char,
        }
    }

    /// Foreground style for a change classification.
    pub fn change_style(&self, change_type: &ChangeType) -> Style {
        let color = match change_type {
            ChangeType::Create => self.success,
            ChangeType::Destroy => self.error,
            ChangeType::Update => self.warning,
            ChangeType::Replace => self.highlight,
            ChangeType::Move => self.moved,
            ChangeType::Drift => self.drift,
            ChangeType::Other(_) => self.info,
            ChangeType::NoOp => return Style::default(),
        };
        Style::default().fg(color)
    }

    pub fn faint(&self) -> Style {
        Style::default().fg(self.faint)
    }

    pub fn search_match(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }
}

fn parse_color(value: &str) -> Option<Color> {
    Color::from_str(value.trim()).ok()
}
