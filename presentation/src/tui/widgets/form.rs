//! Form widgets — new consultation and contribution entry

use crate::tui::state::{ConsultationForm, ContributionForm, TextField};
use agora_domain::{FormField, MIN_CONTRIBUTION_CHARS};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Field value with a block cursor when focused
fn field_line(field: &TextField, focused: bool) -> Line<'_> {
    if !focused {
        return Line::from(field.value.as_str());
    }
    let (before, after) = field.value.split_at(field.cursor);
    Line::from(vec![
        Span::raw(before),
        Span::styled("▌", Style::default().fg(Color::Green)),
        Span::raw(after),
    ])
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Green } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

fn hint_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )))
}

pub struct ConsultationFormWidget<'a> {
    form: &'a ConsultationForm,
}

impl<'a> ConsultationFormWidget<'a> {
    pub fn new(form: &'a ConsultationForm) -> Self {
        Self { form }
    }
}

impl<'a> Widget for ConsultationFormWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let title_focused = self.form.focus == FormField::Title;
        Paragraph::new(field_line(&self.form.title, title_focused))
            .block(field_block(" Title ", title_focused))
            .render(chunks[0], buf);

        let prompt_focused = self.form.focus == FormField::Prompt;
        Paragraph::new(field_line(&self.form.prompt, prompt_focused))
            .wrap(Wrap { trim: false })
            .block(field_block(" Question or theme ", prompt_focused))
            .render(chunks[1], buf);

        hint_line(" Tab: next field  Enter: create  Esc: cancel").render(chunks[2], buf);
    }
}

pub struct ContributionFormWidget<'a> {
    form: &'a ContributionForm,
}

impl<'a> ContributionFormWidget<'a> {
    pub fn new(form: &'a ContributionForm) -> Self {
        Self { form }
    }
}

impl<'a> Widget for ContributionFormWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                self.form.consultation_title.as_str(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(self.form.consultation_prompt.as_str()),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM))
        .render(chunks[0], buf);

        let count = self.form.text.value.trim().chars().count();
        let counter_color = if count >= MIN_CONTRIBUTION_CHARS {
            Color::Green
        } else {
            Color::Yellow
        };
        let block = field_block(" Your contribution ", true).title_bottom(Line::from(Span::styled(
            format!(" {} / {} characters min ", count, MIN_CONTRIBUTION_CHARS),
            Style::default().fg(counter_color),
        )));
        Paragraph::new(field_line(&self.form.text, true))
            .wrap(Wrap { trim: false })
            .block(block)
            .render(chunks[1], buf);

        hint_line(" Enter: submit  Esc: cancel").render(chunks[2], buf);
    }
}
