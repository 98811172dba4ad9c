//! Synthesis view widget — model selector, status line, streamed output

use crate::tui::state::SynthesisView;
use agora_domain::SynthesisStatus;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct SynthesisWidget<'a> {
    view: &'a SynthesisView,
}

impl<'a> SynthesisWidget<'a> {
    pub fn new(view: &'a SynthesisView) -> Self {
        Self { view }
    }

    fn model_line(&self) -> Line<'a> {
        let mut spans = vec![Span::raw(" Model: ")];
        if self.view.models_loading {
            spans.push(Span::styled(
                "loading...",
                Style::default().fg(Color::DarkGray),
            ));
            return Line::from(spans);
        }

        let dim = !self.view.can_start();
        for (i, model) in self.view.models.iter().enumerate() {
            let selected = self.view.selected_model == Some(i);
            let mut style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            if dim {
                style = style.add_modifier(Modifier::DIM);
            }
            spans.push(Span::styled(format!(" {} ", model), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn status_line(&self) -> Line<'a> {
        let status = &self.view.status;
        let color = match status {
            SynthesisStatus::Idle => Color::DarkGray,
            SynthesisStatus::Running => Color::Yellow,
            SynthesisStatus::Done => Color::Green,
            SynthesisStatus::Error(_) => Color::Red,
        };
        let text = match (status, &self.view.active_model) {
            (SynthesisStatus::Idle, _) => format!(
                " {} contributions. Press Enter to generate a synthesis.",
                self.view.contribution_count
            ),
            (SynthesisStatus::Running, Some(model)) => format!(" {} [{}]", status.label(), model),
            _ => format!(" {}", status.label()),
        };
        Line::from(Span::styled(text, Style::default().fg(color)))
    }
}

impl<'a> Widget for SynthesisWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(area);

        Paragraph::new(self.model_line()).render(chunks[0], buf);
        Paragraph::new(self.status_line()).render(chunks[1], buf);

        let output_area = chunks[2];
        let visible_height = output_area.height.saturating_sub(2); // borders
        let content_width = output_area.width.saturating_sub(2); // borders

        let output = &self.view.output;
        let text_style = if output.shows_placeholder() {
            Style::default().fg(Color::DarkGray)
        } else if matches!(self.view.status, SynthesisStatus::Error(_)) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };

        // Built without block so line_count returns pure content lines
        let paragraph = Paragraph::new(output.display_text())
            .style(text_style)
            .wrap(Wrap { trim: false });
        let total_lines = paragraph.line_count(content_width) as u16;

        // scroll_offset=0 means "show bottom"
        let scroll = if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            let offset = (output.scroll_offset as u16).min(max_scroll);
            max_scroll - offset
        } else {
            0
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Synthesis ")
            .style(Style::default().fg(Color::White));

        paragraph.block(block).scroll((scroll, 0)).render(output_area, buf);
    }
}
