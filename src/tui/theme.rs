use ratatui::style::{Color, Modifier, Style};

const BG: Color = Color::Rgb(18, 16, 14);
const PANEL: Color = Color::Rgb(28, 25, 20);
const TEXT: Color = Color::Rgb(230, 218, 196);
const MUTED: Color = Color::Rgb(130, 118, 96);
const GOLD: Color = Color::Rgb(196, 160, 68);
const ORANGE: Color = Color::Rgb(226, 128, 52);
const RED: Color = Color::Rgb(180, 82, 62);

pub fn screen() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn panel() -> Style {
    Style::default().fg(TEXT).bg(PANEL)
}

/// Prayer names and the selected date.
pub fn label() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

/// Timings, titles and key hints.
pub fn accent() -> Style {
    Style::default().fg(GOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

/// Today marker, Hijri line and the input cursor.
pub fn highlight() -> Style {
    Style::default().fg(ORANGE)
}

pub fn error() -> Style {
    Style::default().fg(RED)
}
