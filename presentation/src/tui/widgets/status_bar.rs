//! Status bar widget — context indicator + key hints + flash messages

use crate::tui::mode::KeyContext;
use crate::tui::state::TuiState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBarWidget<'a> {
    state: &'a TuiState,
    context: KeyContext,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a TuiState, context: KeyContext) -> Self {
        Self { state, context }
    }

    fn hints(&self) -> &'static str {
        match self.context {
            KeyContext::Main => "j/k:select  n:new  c:contribute  s:synthesis  r:refresh  ?:help  q:quit",
            KeyContext::Form => "Enter:submit  Tab:next field  Esc:cancel",
            KeyContext::Synthesis => "Enter:generate  h/l:model  j/k:scroll  Esc:back",
            KeyContext::Notice => "Enter:dismiss",
            KeyContext::Help => "Esc:close",
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(bg_style).set_char(' ');
        }

        // Left: context indicator
        let indicator = self.context.indicator();
        let indicator_style = Style::default()
            .fg(Color::Black)
            .bg(self.context.color())
            .add_modifier(Modifier::BOLD);
        let indicator_line = Line::from(Span::styled(format!(" {} ", indicator), indicator_style));
        let indicator_width = indicator.len() as u16 + 2; // padding
        buf.set_line(area.x, area.y, &indicator_line, indicator_width);

        // Flash message or key hints on the right
        let right_text = match &self.state.flash_message {
            Some((flash, _)) => flash.clone(),
            None => self.hints().to_string(),
        };
        let right_width = right_text.chars().count() as u16;
        let right_x = area.right().saturating_sub(right_width + 1);
        if right_x > area.x + indicator_width {
            let right_line = Line::from(Span::styled(
                right_text,
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ));
            buf.set_line(right_x, area.y, &right_line, right_width + 1);
        }
    }
}
