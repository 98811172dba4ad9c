//! Key handling
//!
//! Maps key events to actions depending on what currently has focus:
//! - Main: the consultation list
//! - Form: a consultation or contribution form (text input)
//! - Synthesis: a synthesis view
//! - Notice / Help: overlays that swallow keys until dismissed

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What currently receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyContext {
    #[default]
    Main,
    Form,
    Synthesis,
    Notice,
    Help,
}

impl KeyContext {
    /// Indicator string for the status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Main => "LIST",
            Self::Form => "INPUT",
            Self::Synthesis => "SYNTHESIS",
            Self::Notice => "NOTICE",
            Self::Help => "HELP",
        }
    }

    /// Indicator color for the status line
    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Self::Main => Color::Blue,
            Self::Form => Color::Green,
            Self::Synthesis => Color::Cyan,
            Self::Notice => Color::Red,
            Self::Help => Color::Yellow,
        }
    }
}

/// User action derived from key events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Quit application
    Quit,
    /// Move the list selection up
    SelectPrev,
    /// Move the list selection down
    SelectNext,
    /// Open the "new consultation" form
    NewConsultation,
    /// Open the contribution form for the selected consultation
    Contribute,
    /// Open a synthesis view for the selected consultation
    OpenSynthesis,
    /// Reload the consultation list
    Refresh,
    /// Show help
    ShowHelp,
    /// Close the current screen or overlay
    Close,
    /// Submit the current form
    Submit,
    /// Focus the next form field
    NextField,
    /// Insert character
    InsertChar(char),
    /// Delete character (Backspace)
    DeleteChar,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
    /// Start a synthesis run
    Generate,
    /// Select the previous model
    PrevModel,
    /// Select the next model
    NextModel,
    ScrollUp,
    ScrollDown,
    ScrollToBottom,
    /// Dismiss a notice
    Dismiss,
    /// No action
    None,
}

/// Key event handler - maps key events to actions based on the context
pub struct KeyHandler;

impl KeyHandler {
    pub fn handle(context: KeyContext, key: KeyEvent) -> Action {
        match context {
            KeyContext::Main => Self::handle_main(key),
            KeyContext::Form => Self::handle_form(key),
            KeyContext::Synthesis => Self::handle_synthesis(key),
            KeyContext::Notice => Self::handle_notice(key),
            KeyContext::Help => Self::handle_help(key),
        }
    }

    fn handle_main(key: KeyEvent) -> Action {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

            // Navigation
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::SelectPrev,
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::SelectNext,

            // Screens
            (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NewConsultation,
            (KeyCode::Char('c'), KeyModifiers::NONE) | (KeyCode::Enter, _) => Action::Contribute,
            (KeyCode::Char('s'), KeyModifiers::NONE) => Action::OpenSynthesis,
            (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,

            (KeyCode::Char('?'), _) => Action::ShowHelp,

            _ => Action::None,
        }
    }

    fn handle_form(key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Esc => Action::Close,
            KeyCode::Enter => Action::Submit,
            KeyCode::Tab | KeyCode::BackTab => Action::NextField,
            KeyCode::Backspace => Action::DeleteChar,
            KeyCode::Left => Action::CursorLeft,
            KeyCode::Right => Action::CursorRight,
            KeyCode::Home => Action::CursorStart,
            KeyCode::End => Action::CursorEnd,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::InsertChar(c)
            }
            _ => Action::None,
        }
    }

    fn handle_synthesis(key: KeyEvent) -> Action {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Close,

            (KeyCode::Enter, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::Generate,

            // Model selection
            (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => Action::PrevModel,
            (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextModel,

            // Output scrolling
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::ScrollToBottom,

            (KeyCode::Char('?'), _) => Action::ShowHelp,

            _ => Action::None,
        }
    }

    fn handle_notice(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Action::Dismiss,
            _ => Action::None,
        }
    }

    fn handle_help(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                Action::Close
            }
            _ => Action::None,
        }
    }
}
