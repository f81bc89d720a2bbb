//! Colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{TaskState, Theme};

/// Colours for one scheme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dimmed: Color,
    pub accent: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub danger: Color,
}

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(248, 249, 250),
    fg: Color::Rgb(33, 37, 41),
    dimmed: Color::Rgb(134, 142, 150),
    accent: Color::Rgb(34, 139, 230),
    selection_bg: Color::Rgb(208, 235, 255),
    selection_fg: Color::Rgb(33, 37, 41),
    danger: Color::Rgb(250, 82, 82),
};

pub const DARK: Palette = Palette {
    bg: Color::Rgb(26, 27, 30),
    fg: Color::Rgb(193, 194, 197),
    dimmed: Color::Rgb(144, 146, 150),
    accent: Color::Rgb(77, 171, 247),
    selection_bg: Color::Rgb(44, 46, 51),
    selection_fg: Color::Rgb(255, 255, 255),
    danger: Color::Rgb(255, 107, 107),
};

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

/// Per-state colour, shared by both schemes.
pub fn state_color(state: TaskState) -> Color {
    match state {
        TaskState::Done => Color::Rgb(64, 192, 87),
        TaskState::NotDone => Color::Rgb(250, 82, 82),
        TaskState::DoingRightNow => Color::Rgb(250, 176, 5),
    }
}
