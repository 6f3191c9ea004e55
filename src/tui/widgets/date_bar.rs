use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;
use crate::utils::format::date_label;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    selected: NaiveDate,
    today: NaiveDate,
    hijri: Option<&str>,
) {
    let date_style = if selected == today {
        theme::highlight().add_modifier(Modifier::BOLD)
    } else {
        theme::label()
    };

    let date_line = Line::from(vec![
        Span::styled("‹  ", theme::accent()),
        Span::styled(date_label(selected, today), date_style),
        Span::styled("  ›", theme::accent()),
    ]);

    let mut text = vec![date_line];
    if let Some(hijri) = hijri {
        text.push(Line::from(Span::styled(hijri, theme::highlight())));
    }

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
