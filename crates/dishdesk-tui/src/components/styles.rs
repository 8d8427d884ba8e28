//! Shared style definitions for TUI components.
//!
//! Colors come from a [`Palette`] chosen by the configured theme, so the
//! whole UI switches when the theme is toggled.

use dishdesk_core::storage::config::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub background: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub warning: Color,
    pub error: Color,
    pub success: Color,
    pub modal: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::Cyan,
                text: Color::White,
                dim: Color::DarkGray,
                background: Color::Black,
                highlight_fg: Color::Black,
                highlight_bg: Color::Cyan,
                warning: Color::Yellow,
                error: Color::Red,
                success: Color::Green,
                modal: Color::Magenta,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                dim: Color::Gray,
                background: Color::White,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
                warning: Color::Rgb(180, 110, 0),
                error: Color::Red,
                success: Color::Rgb(0, 128, 0),
                modal: Color::Magenta,
            },
        }
    }
}

/// Get border style based on focus state.
#[inline]
pub fn border_style(palette: &Palette, focused: bool) -> Style {
    if focused {
        Style::new().fg(palette.accent)
    } else {
        Style::new().fg(palette.dim)
    }
}

/// Style for table header text.
pub fn header_style(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.warning)
        .add_modifier(Modifier::BOLD)
}

/// Style for the selected table row.
pub fn row_highlight_style(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.highlight_fg)
        .bg(palette.highlight_bg)
        .add_modifier(Modifier::BOLD)
}

/// Default highlight symbol for table selection.
pub const HIGHLIGHT_SYMBOL: &str = "► ";

pub fn title_style(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD)
}

pub fn dim_style(palette: &Palette) -> Style {
    Style::default().fg(palette.dim)
}

pub fn key_style(palette: &Palette) -> Style {
    Style::default().fg(palette.warning)
}

/// Style for the selected entry of a modal list.
pub fn selected_style(palette: &Palette) -> Style {
    Style::default()
        .fg(palette.highlight_fg)
        .bg(palette.modal)
        .add_modifier(Modifier::BOLD)
}

/// Style for the text being typed in an input box.
pub fn input_text_style(palette: &Palette) -> Style {
    Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_style_follows_focus() {
        let palette = Palette::for_theme(Theme::Dark);
        assert_eq!(border_style(&palette, true).fg, Some(Color::Cyan));
        assert_eq!(border_style(&palette, false).fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_light_theme_inverts_text() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_eq!(dark.text, Color::White);
        assert_eq!(light.text, Color::Black);
        assert_ne!(row_highlight_style(&dark), row_highlight_style(&light));
    }
}
