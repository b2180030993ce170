//! Output management for human and JSON modes
//!
//! Every command reports through an [`OutputManager`] so that JSON mode never
//! mixes progress chatter into the machine-readable payload.

use colored::Colorize;
use stylefix_core::RunReport;

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors
    Human,
    /// A JSON document on stdout
    Json,
}

/// Writes progress, summaries and reports in the selected format
#[derive(Debug, Clone)]
pub struct OutputManager {
    format:  OutputFormat,
    colored: bool,
    verbose: bool,
}

impl OutputManager {
    /// Create a manager for `format` with colors off
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colored: false,
            verbose: false,
        }
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        colored::control::set_override(colored);
        self
    }

    /// Enable per-file detail
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Section header
    pub fn header(&self, message: &str) {
        if self.is_human() {
            println!("{} {}", "🔍".bright_blue(), message.bold());
        }
    }

    /// Informational line
    pub fn info(&self, message: &str) {
        if self.is_human() {
            println!("   {}", message);
        }
    }

    /// Success line
    pub fn success(&self, message: &str) {
        if self.is_human() {
            println!("{} {}", "✅".bright_green(), message);
        }
    }

    /// Warning line
    pub fn warning(&self, message: &str) {
        if self.is_human() {
            println!("{} {}", "⚠️".bright_yellow(), message.yellow());
        }
    }

    /// Failure line
    pub fn failure(&self, message: &str) {
        if self.is_human() {
            println!("{} {}", "❌".bright_red(), message.red());
        }
    }

    /// Print one pass report
    pub fn report(&self, report: &RunReport) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            },
            OutputFormat::Human => self.report_human(report),
        }
        Ok(())
    }

    /// Print several pass reports as one document
    pub fn reports(&self, reports: &[RunReport]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(reports)?);
            },
            OutputFormat::Human => {
                for report in reports {
                    self.report_human(report);
                    println!();
                }
            },
        }
        Ok(())
    }

    fn report_human(&self, report: &RunReport) {
        let verb = if report.dry_run { "would change" } else { "changed" };

        for (file, count) in &report.changes {
            if self.verbose || !report.dry_run {
                println!("  {} {} ({} {})", "✓".bright_green(), file, count, plural(*count, "change"));
            }
        }
        for backup in &report.backups {
            if self.verbose {
                println!("  {} backup {}", "↳".dimmed(), backup);
            }
        }
        for failure in &report.failures {
            println!("  {} {}: {}", "✗".bright_red(), failure.file, failure.message);
        }

        println!(
            "\n  {} [{}] {} files scanned, {} {}, {} {}",
            "📊".bright_cyan(),
            report.pass.bold(),
            report.files_scanned,
            report.files_changed,
            verb,
            report.replacements,
            plural(report.replacements, "replacement"),
        );
        if report.dry_run && !report.violations.is_empty() {
            println!("    Violations by file:");
            for (file, count) in &report.violations {
                println!("      {:>5}  {}", count, file);
            }
        }
        if report.has_failures() {
            println!("    {} files skipped", report.failures.len());
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 { word.to_string() } else { format!("{}s", word) }
}
