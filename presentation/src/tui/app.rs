//! TUI application — main loop
//!
//! Architecture:
//! ```text
//! TuiApp (select! loop)                  workers (tokio::spawn)
//!   ├─ crossterm EventStream               ├─ model discovery per view
//!   ├─ event_rx (TuiEvent) <───────────────┤
//!   └─ tick_interval                       └─ synthesis run (TuiProgressBridge)
//! ```
//!
//! Store operations are awaited inline; only network-bound work runs in
//! workers. Workers never touch TuiState: they report through TuiEvents
//! which the presenter applies on this loop.

use super::event::TuiEvent;
use super::mode::{Action, KeyContext, KeyHandler};
use super::presenter::TuiPresenter;
use super::progress::TuiProgressBridge;
use super::state::{Notice, Screen, TuiState, ViewId};
use super::widgets::{
    MainLayout, consultation_list::ConsultationListWidget,
    form::{ConsultationFormWidget, ContributionFormWidget},
    header::HeaderWidget,
    notice::NoticeWidget,
    status_bar::StatusBarWidget,
    synthesis::SynthesisWidget,
};
use agora_application::{
    ConsultationStore, CreateConsultationError, CreateConsultationUseCase,
    ListConsultationsUseCase, RunSynthesisError, RunSynthesisUseCase, SubmitContributionError,
    SubmitContributionUseCase,
};
use agora_domain::{FailureKind, SynthesisStatus};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::stream::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Main TUI application
pub struct TuiApp {
    create: CreateConsultationUseCase,
    submit: SubmitContributionUseCase,
    list: ListConsultationsUseCase,
    synthesis: RunSynthesisUseCase,

    event_tx: mpsc::UnboundedSender<TuiEvent>,
    event_rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl TuiApp {
    pub fn new(store: Arc<dyn ConsultationStore>, synthesis: RunSynthesisUseCase) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            create: CreateConsultationUseCase::new(store.clone()),
            submit: SubmitContributionUseCase::new(store.clone()),
            list: ListConsultationsUseCase::new(store),
            synthesis,
            event_tx,
            event_rx,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        let mut state = TuiState::new();
        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(250));

        self.reload(&mut state).await;

        loop {
            terminal.draw(|frame| {
                render(frame, &state);
            })?;

            if state.should_quit {
                break;
            }

            tokio::select! {
                // Terminal events (keyboard, resize)
                Some(Ok(term_event)) = event_stream.next() => {
                    if let Event::Key(key) = term_event
                        && key.kind == KeyEventKind::Press
                    {
                        self.handle_key(&mut state, key).await;
                    }
                }

                // TuiEvents from workers
                Some(tui_event) = self.event_rx.recv() => {
                    TuiPresenter::apply(&mut state, tui_event);
                }

                // Tick for flash expiry
                _ = tick.tick() => {
                    state.expire_flash(Duration::from_secs(5));
                }
            }
        }

        // Stop a synthesis still running
        state.close_screen();

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    async fn handle_key(&self, state: &mut TuiState, key: KeyEvent) {
        let context = key_context(state);
        let action = KeyHandler::handle(context, key);

        match context {
            KeyContext::Help => {
                if action == Action::Close {
                    state.show_help = false;
                }
            }
            KeyContext::Notice => {
                if action == Action::Dismiss {
                    state.dismiss_notice();
                }
            }
            KeyContext::Main => self.handle_main_action(state, action).await,
            KeyContext::Form => self.handle_form_action(state, action).await,
            KeyContext::Synthesis => self.handle_synthesis_action(state, action).await,
        }
    }

    // ==================== Main ====================

    async fn handle_main_action(&self, state: &mut TuiState, action: Action) {
        match action {
            Action::Quit => state.should_quit = true,
            Action::SelectPrev => state.select_prev(),
            Action::SelectNext => state.select_next(),
            Action::NewConsultation => state.open_consultation_form(),
            Action::Contribute => state.open_contribution_form(),
            Action::OpenSynthesis => self.open_synthesis(state).await,
            Action::Refresh => {
                self.reload(state).await;
                state.set_flash("Consultations reloaded");
            }
            Action::ShowHelp => state.show_help = true,
            _ => {}
        }
    }

    async fn reload(&self, state: &mut TuiState) {
        match self.list.execute().await {
            Ok(consultations) => state.set_consultations(consultations),
            Err(e) => {
                warn!("Failed to list consultations: {}", e);
                state.set_flash(format!("Could not load consultations: {}", e));
            }
        }
    }

    // ==================== Forms ====================

    async fn handle_form_action(&self, state: &mut TuiState, action: Action) {
        match action {
            Action::Quit => state.should_quit = true,
            Action::Close => state.close_screen(),
            Action::Submit => self.submit_form(state).await,
            Action::NextField => {
                if let Screen::ConsultationForm(form) = &mut state.screen {
                    form.next_field();
                }
            }
            edit => {
                let field = match &mut state.screen {
                    Screen::ConsultationForm(form) => form.focused_mut(),
                    Screen::ContributionForm(form) => &mut form.text,
                    _ => return,
                };
                match edit {
                    Action::InsertChar(c) => field.insert_char(c),
                    Action::DeleteChar => field.delete_char(),
                    Action::CursorLeft => field.cursor_left(),
                    Action::CursorRight => field.cursor_right(),
                    Action::CursorStart => field.cursor_home(),
                    Action::CursorEnd => field.cursor_end(),
                    _ => {}
                }
            }
        }
    }

    async fn submit_form(&self, state: &mut TuiState) {
        match &state.screen {
            Screen::ConsultationForm(form) => {
                let result = self
                    .create
                    .execute(&form.title.value, &form.prompt.value)
                    .await;
                match result {
                    Ok(consultation) => {
                        state.close_screen();
                        self.reload(state).await;
                        state.select_id(consultation.id);
                        state.set_flash(format!("Consultation \"{}\" created", consultation.title));
                    }
                    Err(CreateConsultationError::Validation(e)) => {
                        state.show_notice(Notice::new(e.heading(), e.to_string()).with_focus(e.field()));
                    }
                    Err(CreateConsultationError::Store(e)) => {
                        error!("Failed to create consultation: {}", e);
                        state.show_notice(Notice::new("Storage error", e.to_string()));
                    }
                }
            }
            Screen::ContributionForm(form) => {
                let consultation_id = form.consultation_id;
                let result = self.submit.execute(consultation_id, &form.text.value).await;
                match result {
                    Ok(_) => {
                        state.close_screen();
                        self.reload(state).await;
                        state.select_id(consultation_id);
                        state.set_flash("Thank you! Your contribution has been recorded.");
                    }
                    Err(SubmitContributionError::Validation(e)) => {
                        state.show_notice(Notice::new(e.heading(), e.to_string()).with_focus(e.field()));
                    }
                    Err(SubmitContributionError::Store(e)) => {
                        error!("Failed to save contribution: {}", e);
                        state.show_notice(Notice::new("Storage error", e.to_string()));
                    }
                }
            }
            _ => {}
        }
    }

    // ==================== Synthesis ====================

    async fn handle_synthesis_action(&self, state: &mut TuiState, action: Action) {
        match action {
            Action::Quit => state.should_quit = true,
            Action::Close => {
                state.close_screen();
                self.reload(state).await;
            }
            Action::ShowHelp => state.show_help = true,
            Action::Generate => self.start_synthesis(state).await,
            other => {
                let Screen::Synthesis(view) = &mut state.screen else {
                    return;
                };
                match other {
                    Action::PrevModel => view.cycle_model(false),
                    Action::NextModel => view.cycle_model(true),
                    Action::ScrollUp => view.output.scroll_up(),
                    Action::ScrollDown => view.output.scroll_down(),
                    Action::ScrollToBottom => view.output.scroll_to_bottom(),
                    _ => {}
                }
            }
        }
    }

    /// Open the synthesis view; discovery starts only when there is
    /// something to synthesize
    async fn open_synthesis(&self, state: &mut TuiState) {
        let Some(consultation_id) = state.selected_consultation().map(|c| c.id) else {
            return;
        };
        match self.synthesis.ensure_contributions(consultation_id).await {
            Ok(_) => {
                if let Some(view) = state.open_synthesis() {
                    self.spawn_discovery(view);
                }
            }
            Err(e @ RunSynthesisError::NoContributions(_)) => {
                state.show_notice(Notice::new("No contributions", e.user_message()));
            }
            Err(e) => {
                error!("Failed to count contributions: {}", e);
                state.show_notice(Notice::new("Storage error", e.user_message()));
            }
        }
    }

    fn spawn_discovery(&self, view: ViewId) {
        let synthesis = self.synthesis.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let models = synthesis.discover_models().await;
            let _ = tx.send(TuiEvent::ModelsDiscovered { view, models });
        });
    }

    async fn start_synthesis(&self, state: &mut TuiState) {
        let Screen::Synthesis(view) = &state.screen else {
            return;
        };
        if !view.can_start() {
            return;
        }
        let view_id = view.id;
        let consultation_id = view.consultation_id;
        let title = view.title.clone();

        let input = match self.synthesis.prepare(consultation_id, &title).await {
            Ok(input) => input,
            Err(e @ RunSynthesisError::NoContributions(_)) => {
                state.show_notice(Notice::new("No contributions", e.user_message()));
                return;
            }
            Err(e) => {
                warn!("Could not prepare synthesis: {}", e);
                if let Some(view) = state.synthesis_view_mut(view_id) {
                    view.output.fail(&e.user_message());
                    view.end(SynthesisStatus::Error(
                        e.kind().unwrap_or(FailureKind::Unexpected),
                    ));
                }
                return;
            }
        };

        let Some(view) = state.synthesis_view_mut(view_id) else {
            return;
        };
        let token = CancellationToken::new();
        view.begin(token.clone());
        let model = view.selected_model();
        info!(
            "Starting synthesis for consultation {} in view {:?}",
            consultation_id, view_id
        );

        let synthesis = self.synthesis.clone();
        let tx = self.event_tx.clone();
        let worker = tokio::spawn(async move {
            let bridge = TuiProgressBridge::new(view_id, tx);
            // Outcome is reported through the bridge
            let _ = synthesis.execute(input, model, &bridge, &token).await;
        });
        tokio::spawn(watch_worker(view_id, worker, self.event_tx.clone()));
    }
}

/// Report a synthesis worker that died without a terminal callback
async fn watch_worker(view: ViewId, worker: JoinHandle<()>, tx: mpsc::UnboundedSender<TuiEvent>) {
    if let Err(e) = worker.await
        && e.is_panic()
    {
        error!("Synthesis worker panicked: {}", e);
        let _ = tx.send(TuiEvent::SynthesisFailed {
            view,
            kind: FailureKind::Unexpected,
            message: "Unexpected error: the synthesis stopped abruptly.".to_string(),
            blocking: false,
        });
    }
}

fn key_context(state: &TuiState) -> KeyContext {
    if state.notice.is_some() {
        return KeyContext::Notice;
    }
    if state.show_help {
        return KeyContext::Help;
    }
    match state.screen {
        Screen::Main => KeyContext::Main,
        Screen::ConsultationForm(_) | Screen::ContributionForm(_) => KeyContext::Form,
        Screen::Synthesis(_) => KeyContext::Synthesis,
    }
}

/// Render all widgets
fn render(frame: &mut ratatui::Frame, state: &TuiState) {
    let layout = MainLayout::compute(frame.area());

    frame.render_widget(HeaderWidget::new(state), layout.header);
    match &state.screen {
        Screen::Main => frame.render_widget(ConsultationListWidget::new(state), layout.body),
        Screen::ConsultationForm(form) => {
            frame.render_widget(ConsultationFormWidget::new(form), layout.body)
        }
        Screen::ContributionForm(form) => {
            frame.render_widget(ContributionFormWidget::new(form), layout.body)
        }
        Screen::Synthesis(view) => frame.render_widget(SynthesisWidget::new(view), layout.body),
    }
    frame.render_widget(
        StatusBarWidget::new(state, key_context(state)),
        layout.status_bar,
    );

    // Overlays
    if state.show_help {
        let help_area = MainLayout::centered_overlay(60, 70, frame.area());
        frame.render_widget(ratatui::widgets::Clear, help_area);
        render_help(frame, help_area);
    }

    if let Some(notice) = &state.notice {
        let notice_area = MainLayout::centered_overlay(60, 40, frame.area());
        frame.render_widget(ratatui::widgets::Clear, notice_area);
        frame.render_widget(NoticeWidget::new(notice), notice_area);
    }
}

fn render_help(frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Consultations:"),
        Line::from("  j/k    Select next/previous"),
        Line::from("  n      New consultation"),
        Line::from("  c      Contribute to the selected consultation"),
        Line::from("  s      Open the synthesis view"),
        Line::from("  r      Reload the list"),
        Line::from("  q      Quit"),
        Line::from(""),
        Line::from("Forms:"),
        Line::from("  Tab    Next field"),
        Line::from("  Enter  Submit"),
        Line::from("  Esc    Cancel"),
        Line::from(""),
        Line::from("Synthesis:"),
        Line::from("  Enter  Generate"),
        Line::from("  h/l    Previous/next model"),
        Line::from("  j/k    Scroll output"),
        Line::from("  G      Follow latest output"),
        Line::from("  Esc    Back (stops a running synthesis)"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_application::{
        GatewayError, GenerationGateway, GenerationRequest, StoreError, StreamHandle,
    };
    use agora_domain::{
        Consultation, ConsultationId, ConsultationSummary, Contribution, ContributionId, Model,
        NewConsultation, NewContribution,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// One consultation holding `contributions` contributions
    struct FixedStore {
        contributions: u64,
    }

    impl FixedStore {
        fn summary(&self) -> ConsultationSummary {
            ConsultationSummary {
                id: ConsultationId(1),
                title: "Bike lanes".to_string(),
                prompt: "Where should new lanes go?".to_string(),
                contribution_count: self.contributions,
            }
        }
    }

    #[async_trait]
    impl ConsultationStore for FixedStore {
        async fn create_consultation(
            &self,
            _consultation: &NewConsultation,
        ) -> Result<Consultation, StoreError> {
            Err(StoreError::Backend("read only".to_string()))
        }

        async fn list_consultations(&self) -> Result<Vec<ConsultationSummary>, StoreError> {
            Ok(vec![self.summary()])
        }

        async fn get_consultation(
            &self,
            id: ConsultationId,
        ) -> Result<Option<Consultation>, StoreError> {
            let summary = self.summary();
            Ok((id == summary.id).then(|| Consultation {
                id,
                title: summary.title,
                prompt: summary.prompt,
            }))
        }

        async fn create_contribution(
            &self,
            contribution: &NewContribution,
        ) -> Result<Contribution, StoreError> {
            Err(StoreError::UnknownConsultation(contribution.consultation_id()))
        }

        async fn list_contributions(
            &self,
            id: ConsultationId,
        ) -> Result<Vec<Contribution>, StoreError> {
            Ok((0..self.contributions)
                .map(|n| Contribution {
                    id: ContributionId(n as i64 + 1),
                    consultation_id: id,
                    text: format!("Contribution number {}", n + 1),
                })
                .collect())
        }

        async fn count_contributions(&self, _id: ConsultationId) -> Result<u64, StoreError> {
            Ok(self.contributions)
        }
    }

    /// Gateway counting every call it receives
    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerationGateway for CountingGateway {
        async fn check_liveness(&self) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn list_models(&self) -> Result<Vec<Model>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Model::default()])
        }

        async fn generate(&self, _request: GenerationRequest) -> Result<StreamHandle, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (_tx, rx) = mpsc::channel(1);
            Ok(StreamHandle::new(rx))
        }
    }

    async fn app_with(contributions: u64) -> (TuiApp, TuiState, Arc<CountingGateway>) {
        let store: Arc<dyn ConsultationStore> = Arc::new(FixedStore { contributions });
        let gateway = Arc::new(CountingGateway::default());
        let app = TuiApp::new(
            store.clone(),
            RunSynthesisUseCase::new(store, gateway.clone()),
        );
        let mut state = TuiState::new();
        app.reload(&mut state).await;
        (app, state, gateway)
    }

    #[tokio::test]
    async fn test_open_synthesis_without_contributions_shows_notice() {
        let (app, mut state, gateway) = app_with(0).await;

        app.handle_main_action(&mut state, Action::OpenSynthesis).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(state.screen, Screen::Main));
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.title, "No contributions");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_synthesis_with_contributions_discovers_models() {
        let (mut app, mut state, gateway) = app_with(2).await;

        app.handle_main_action(&mut state, Action::OpenSynthesis).await;
        assert!(matches!(state.screen, Screen::Synthesis(_)));
        assert!(state.notice.is_none());

        let event = tokio::time::timeout(Duration::from_secs(1), app.event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, TuiEvent::ModelsDiscovered { .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }
}
