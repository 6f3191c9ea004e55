use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, location_name: &str) {
    let title_line = Line::from(vec![
        Span::styled("  ميقات  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("Meeqat", theme::accent()),
    ]);

    let place_line = Line::from(Span::styled(location_name, theme::muted()));

    let text = vec![title_line, Line::from(""), place_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent().add_modifier(Modifier::BOLD))
        .style(theme::screen());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
