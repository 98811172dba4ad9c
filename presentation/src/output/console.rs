//! Console output formatter for headless commands

use colored::Colorize;
use agora_application::SynthesisReport;
use agora_domain::{Consultation, ConsultationSummary, Contribution, Model};

/// Formats command results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Consultation list with contribution counts
    pub fn format_consultations(consultations: &[ConsultationSummary]) -> String {
        if consultations.is_empty() {
            return format!(
                "{}\n",
                "No consultations yet. Create one with `agora new`.".dimmed()
            );
        }

        let mut output = Self::header("Consultations");
        output.push('\n');
        for consultation in consultations {
            output.push_str(&format!(
                "{} {}  {}\n    {}\n",
                format!("#{}", consultation.id).cyan().bold(),
                consultation.title.bold(),
                format!("[{}]", consultation.count_label()).yellow(),
                consultation.prompt_preview()
            ));
        }
        output
    }

    /// Consultation list as JSON
    pub fn format_consultations_json(consultations: &[ConsultationSummary]) -> String {
        serde_json::to_string_pretty(consultations).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn format_created(consultation: &Consultation) -> String {
        format!(
            "{} Consultation {} created: {}",
            "v".green(),
            format!("#{}", consultation.id).cyan().bold(),
            consultation.title
        )
    }

    pub fn format_contribution(contribution: &Contribution) -> String {
        format!(
            "{} Thank you! Contribution {} recorded for consultation {}.",
            "v".green(),
            contribution.id,
            contribution.consultation_id
        )
    }

    /// Models the service reported (or the fallback default)
    pub fn format_models(models: &[Model], default_model: &Model) -> String {
        let mut output = Self::header("Models");
        output.push('\n');
        for model in models {
            if model == default_model {
                output.push_str(&format!("  * {} {}\n", model, "(default)".dimmed()));
            } else {
                output.push_str(&format!("  * {}\n", model));
            }
        }
        output
    }

    /// Line printed under a streamed synthesis
    pub fn format_report_footer(report: &SynthesisReport) -> String {
        format!(
            "{} {}",
            "Synthesis complete".green().bold(),
            format!("({}, {} fragments)", report.model, report.chunk_count).dimmed()
        )
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}", line.cyan(), title.cyan().bold(), line.cyan())
    }
}
