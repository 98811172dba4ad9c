//! TUI application state
//!
//! Single source of truth for everything the TUI renders.
//! Owned and mutated only by the TuiApp select! loop; background workers
//! reach it through TuiEvents applied by the presenter.

use agora_domain::{ConsultationId, ConsultationSummary, FormField, Model, SynthesisStatus};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Text shown in a synthesis output area until the first fragment arrives
pub const CONNECTING_PLACEHOLDER: &str = "Connecting to Ollama...";

/// Identity of an opened synthesis view.
///
/// Every event produced by a synthesis worker carries the id of the view
/// that started it, so events for a closed view can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

// ==================== Forms ====================

/// Editable single-line text with a byte cursor
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub value: String,
    pub cursor: usize,
}

impl TextField {
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Cursor position in characters, for terminal placement
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }
}

/// "New consultation" form
#[derive(Debug, Clone)]
pub struct ConsultationForm {
    pub title: TextField,
    pub prompt: TextField,
    pub focus: FormField,
}

impl Default for ConsultationForm {
    fn default() -> Self {
        Self {
            title: TextField::default(),
            prompt: TextField::default(),
            focus: FormField::Title,
        }
    }
}

impl ConsultationForm {
    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            FormField::Prompt => &mut self.prompt,
            _ => &mut self.title,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Prompt,
            _ => FormField::Title,
        };
    }
}

/// "Contribute" form for one consultation
#[derive(Debug, Clone)]
pub struct ContributionForm {
    pub consultation_id: ConsultationId,
    pub consultation_title: String,
    pub consultation_prompt: String,
    pub text: TextField,
}

impl ContributionForm {
    pub fn new(consultation: &ConsultationSummary) -> Self {
        Self {
            consultation_id: consultation.id,
            consultation_title: consultation.title.clone(),
            consultation_prompt: consultation.prompt.clone(),
            text: TextField::default(),
        }
    }
}

// ==================== Synthesis ====================

/// Read-only output area of a synthesis view.
///
/// Shows [`CONNECTING_PLACEHOLDER`] from the start of a run until the first
/// fragment, which clears it; later fragments are appended verbatim.
#[derive(Debug, Clone, Default)]
pub struct SynthesisOutput {
    text: String,
    placeholder: bool,
    /// Lines scrolled up from the bottom; 0 follows the latest text
    pub scroll_offset: usize,
}

impl SynthesisOutput {
    /// Reset for a new run and show the placeholder
    pub fn start(&mut self) {
        self.text.clear();
        self.placeholder = true;
        self.scroll_offset = 0;
    }

    pub fn append(&mut self, fragment: &str) {
        if self.placeholder {
            self.placeholder = false;
            self.text.clear();
        }
        self.text.push_str(fragment);
    }

    /// End of a successful run; clears a placeholder no fragment replaced
    pub fn finish(&mut self) {
        self.placeholder = false;
    }

    /// Replace everything with an error message
    pub fn fail(&mut self, message: &str) {
        self.placeholder = false;
        self.text = message.to_string();
        self.scroll_offset = 0;
    }

    pub fn shows_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Text to render
    pub fn display_text(&self) -> &str {
        if self.placeholder {
            CONNECTING_PLACEHOLDER
        } else {
            &self.text
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// A synthesis view for one consultation
#[derive(Debug)]
pub struct SynthesisView {
    pub id: ViewId,
    pub consultation_id: ConsultationId,
    pub title: String,
    pub contribution_count: u64,
    pub models: Vec<Model>,
    pub selected_model: Option<usize>,
    pub models_loading: bool,
    pub output: SynthesisOutput,
    pub status: SynthesisStatus,
    /// Model used by the current or last run
    pub active_model: Option<Model>,
    cancel: Option<CancellationToken>,
}

impl SynthesisView {
    pub fn new(id: ViewId, consultation: &ConsultationSummary) -> Self {
        Self {
            id,
            consultation_id: consultation.id,
            title: consultation.title.clone(),
            contribution_count: consultation.contribution_count,
            models: Vec::new(),
            selected_model: None,
            models_loading: true,
            output: SynthesisOutput::default(),
            status: SynthesisStatus::Idle,
            active_model: None,
            cancel: None,
        }
    }

    /// Replace the model list, keeping the selection when possible
    pub fn set_models(&mut self, models: Vec<Model>) {
        let previous = self.selected_model();
        self.selected_model = match previous {
            Some(model) => models.iter().position(|m| *m == model).or(Some(0)),
            None => Some(0),
        }
        .filter(|_| !models.is_empty());
        self.models = models;
        self.models_loading = false;
    }

    pub fn selected_model(&self) -> Option<Model> {
        self.selected_model
            .and_then(|index| self.models.get(index))
            .cloned()
    }

    /// Move the model selection; ignored while a run is in progress
    pub fn cycle_model(&mut self, forward: bool) {
        if !self.status.can_start() || self.models.is_empty() {
            return;
        }
        let len = self.models.len();
        let current = self.selected_model.unwrap_or(0);
        self.selected_model = Some(if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        });
    }

    pub fn can_start(&self) -> bool {
        self.status.can_start()
    }

    /// Enter the running state: trigger disabled, placeholder shown
    pub fn begin(&mut self, cancel: CancellationToken) {
        self.status = SynthesisStatus::Running;
        self.active_model = None;
        self.output.start();
        self.cancel = Some(cancel);
    }

    /// Enter a terminal state and re-enable the trigger
    pub fn end(&mut self, status: SynthesisStatus) {
        self.status = status;
        self.cancel = None;
    }

    /// Cancel the worker of a running synthesis, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

// ==================== Screens ====================

/// Blocking notice shown on top of the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    /// Form field focused once the notice is dismissed
    pub focus: Option<FormField>,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            focus: None,
        }
    }

    pub fn with_focus(mut self, field: FormField) -> Self {
        self.focus = Some(field);
        self
    }
}

#[derive(Debug)]
pub enum Screen {
    Main,
    ConsultationForm(ConsultationForm),
    ContributionForm(ContributionForm),
    Synthesis(SynthesisView),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Main => "CONSULTATIONS",
            Screen::ConsultationForm(_) => "NEW",
            Screen::ContributionForm(_) => "CONTRIBUTE",
            Screen::Synthesis(_) => "SYNTHESIS",
        }
    }
}

/// Central TUI state
#[derive(Debug)]
pub struct TuiState {
    pub screen: Screen,
    pub consultations: Vec<ConsultationSummary>,
    pub selected: usize,
    pub notice: Option<Notice>,
    pub show_help: bool,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    next_view: u64,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            screen: Screen::Main,
            consultations: Vec::new(),
            selected: 0,
            notice: None,
            show_help: false,
            flash_message: None,
            should_quit: false,
            next_view: 1,
        }
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Consultation list --

    pub fn set_consultations(&mut self, consultations: Vec<ConsultationSummary>) {
        self.consultations = consultations;
        self.selected = self
            .selected
            .min(self.consultations.len().saturating_sub(1));
    }

    pub fn selected_consultation(&self) -> Option<&ConsultationSummary> {
        self.consultations.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.consultations.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Select the consultation with `id` if it is listed
    pub fn select_id(&mut self, id: ConsultationId) {
        if let Some(index) = self.consultations.iter().position(|c| c.id == id) {
            self.selected = index;
        }
    }

    // -- Screens --

    pub fn open_consultation_form(&mut self) {
        self.screen = Screen::ConsultationForm(ConsultationForm::default());
    }

    pub fn open_contribution_form(&mut self) {
        if let Some(consultation) = self.selected_consultation() {
            self.screen = Screen::ContributionForm(ContributionForm::new(consultation));
        }
    }

    /// Open a synthesis view for the selected consultation
    pub fn open_synthesis(&mut self) -> Option<ViewId> {
        let consultation = self.selected_consultation()?;
        let id = ViewId(self.next_view);
        let view = SynthesisView::new(id, consultation);
        self.next_view += 1;
        self.screen = Screen::Synthesis(view);
        Some(id)
    }

    /// Return to the main screen, cancelling a running synthesis
    pub fn close_screen(&mut self) {
        if let Screen::Synthesis(view) = &mut self.screen {
            view.cancel();
        }
        self.screen = Screen::Main;
    }

    /// The synthesis view with `id`, if it is still open
    pub fn synthesis_view_mut(&mut self, id: ViewId) -> Option<&mut SynthesisView> {
        match &mut self.screen {
            Screen::Synthesis(view) if view.id == id => Some(view),
            _ => None,
        }
    }

    // -- Notices --

    pub fn show_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Close the notice and move form focus to the field it names
    pub fn dismiss_notice(&mut self) {
        let Some(notice) = self.notice.take() else {
            return;
        };
        if let (Some(field), Screen::ConsultationForm(form)) = (notice.focus, &mut self.screen) {
            form.focus = field;
        }
    }

    // -- Flash --

    pub fn set_flash(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), Instant::now()));
    }

    pub fn expire_flash(&mut self, max_age: Duration) {
        if let Some((_, created)) = &self.flash_message
            && created.elapsed() > max_age
        {
            self.flash_message = None;
        }
    }
}
