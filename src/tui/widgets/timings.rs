use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::controller::FetchState;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, state: &FetchState) {
    let block = Block::default()
        .title(Span::styled(" Timings ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::muted())
        .style(theme::panel());

    let record = match state {
        FetchState::Success(record) => record,
        FetchState::Idle | FetchState::Loading => {
            let text = vec![Line::from(""), Line::from(Span::styled("Loading...", theme::muted()))];
            let paragraph = Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
        FetchState::Error(message) => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(message.as_str(), theme::error())),
                Line::from(""),
                Line::from(Span::styled("[r] retry", theme::muted())),
            ];
            let paragraph = Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let items: Vec<ListItem> = record
        .entries()
        .into_iter()
        .map(|(name, time)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("  {:<10}", name.display_name()), theme::label()),
                Span::styled(time.to_string(), theme::accent()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
