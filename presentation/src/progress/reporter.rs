//! Progress reporting for headless synthesis runs
//!
//! A spinner stands in for the output until the first fragment arrives;
//! fragments are then written to stdout as they stream in.

use agora_application::{RunSynthesisError, SynthesisProgressNotifier, SynthesisReport};
use agora_domain::Model;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Streams a synthesis to a terminal
pub struct SynthesisStreamReporter {
    spinner: Mutex<Option<ProgressBar>>,
    writer: Mutex<Box<dyn Write + Send>>,
    wrote_text: Mutex<bool>,
}

impl SynthesisStreamReporter {
    /// Reporter writing to stdout with a live spinner
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message("Connecting to Ollama...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self::build(spinner, Box::new(io::stdout()))
    }

    /// Reporter writing to `writer`, without a visible spinner
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self::build(ProgressBar::hidden(), writer)
    }

    fn build(spinner: ProgressBar, writer: Box<dyn Write + Send>) -> Self {
        Self {
            spinner: Mutex::new(Some(spinner)),
            writer: Mutex::new(writer),
            wrote_text: Mutex::new(false),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }

    fn write(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(text.as_bytes());
            let _ = writer.flush();
        }
    }

    /// End the streamed text with a newline if anything was written
    fn finish_text(&self) {
        let wrote = self.wrote_text.lock().map(|w| *w).unwrap_or(false);
        if wrote {
            self.write("\n");
        }
    }
}

impl Default for SynthesisStreamReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesisProgressNotifier for SynthesisStreamReporter {
    fn on_generation_start(&self, model: &Model) {
        if let Ok(spinner) = self.spinner.lock()
            && let Some(pb) = spinner.as_ref()
        {
            pb.set_message(format!("Connecting to Ollama... ({})", model));
        }
    }

    fn on_chunk(&self, chunk: &str) {
        self.clear_spinner();
        if let Ok(mut wrote) = self.wrote_text.lock() {
            *wrote = true;
        }
        self.write(chunk);
    }

    fn on_completed(&self, _report: &SynthesisReport) {
        self.clear_spinner();
        self.finish_text();
    }

    fn on_failed(&self, error: &RunSynthesisError) {
        self.clear_spinner();
        self.finish_text();
        eprintln!("{} {}", "x".red(), error.user_message());
    }

    fn on_cancelled(&self) {
        self.clear_spinner();
        self.finish_text();
    }
}
