//! Notice overlay — blocking message that must be dismissed

use crate::tui::state::Notice;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct NoticeWidget<'a> {
    notice: &'a Notice,
}

impl<'a> NoticeWidget<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }
}

impl<'a> Widget for NoticeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![Line::from("")];
        lines.extend(self.notice.message.lines().map(Line::from));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {} ", self.notice.title),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().fg(Color::Red));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}
