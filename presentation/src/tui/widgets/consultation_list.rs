//! Consultation list widget — one card per consultation

use crate::tui::state::TuiState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

pub struct ConsultationListWidget<'a> {
    state: &'a TuiState,
}

impl<'a> ConsultationListWidget<'a> {
    pub fn new(state: &'a TuiState) -> Self {
        Self { state }
    }
}

impl<'a> Widget for ConsultationListWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Consultations ")
            .style(Style::default().fg(Color::White));

        if self.state.consultations.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from("  No consultations yet."),
                Line::from(Span::styled(
                    "  Press n to create the first one.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .consultations
            .iter()
            .map(|c| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            c.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            format!("[{}]", c.count_label()),
                            Style::default().fg(Color::Yellow),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", c.prompt_preview()),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(""),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default().with_selected(Some(self.state.selected));
        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}
