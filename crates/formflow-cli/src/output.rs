//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! support for submission states, validation issues and schemas.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use formflow_core::{FieldErrorMap, FormSchema, Issue, SubmissionState};
use formflow_schemas::Constraint;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use tracing::{debug, trace};

/// Result of a validate-only run, as printed by machine formats
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<Issue>,
    pub errors: FieldErrorMap,
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a submission state
    fn format_state(&self, state: &SubmissionState) -> Result<String>;

    /// Format a validate-only report
    fn format_report(&self, report: &ValidationReport) -> Result<String>;

    /// Format a form schema
    fn format_schema(&self, schema: &FormSchema) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_state(&self, state: &SubmissionState) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_state_human(state)),
            _ => self.format(state),
        }
    }

    fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_schema(&self, schema: &FormSchema) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_schema_human(schema)),
            _ => self.format(schema),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stdout().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg(test)]
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        // Submitted values can hold secrets; log a redacted copy only
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    /// Write a submission state
    pub fn state(&mut self, state: &SubmissionState) -> Result<()> {
        let formatted = self.format.format_state(state)?;
        self.emit(&formatted)
    }

    /// Write a validate-only report
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.emit(&formatted)
    }

    /// Write a form schema
    pub fn schema(&mut self, schema: &FormSchema) -> Result<()> {
        let formatted = self.format.format_schema(schema)?;
        self.emit(&formatted)
    }

    fn emit(&mut self, formatted: &str) -> Result<()> {
        match self.format {
            OutputFormat::Human | OutputFormat::Json | OutputFormat::JsonPretty => {
                self.writeln(formatted.trim_end_matches('\n'))
            }
            // serde_yaml already ends documents with a newline
            OutputFormat::Yaml => self.write(formatted),
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let rendered = render_table(headers, &rows);
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            if self.use_color {
                self.writeln(&header.bold().to_string())?;
            } else {
                self.writeln(header)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Render rows under headers with aligned columns
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = render_row(headers, &widths);
    output.push('\n');
    output.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    for row in rows {
        let cells = row.iter().map(String::as_str).collect::<Vec<_>>();
        output.push('\n');
        output.push_str(&render_row(&cells, &widths));
    }
    output
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match widths.get(i) {
            Some(width) => format!("{:width$}", cell, width = *width),
            None => cell.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" │ ")
        .trim_end()
        .to_string()
}

/// Format a submission state for human reading
fn format_state_human(state: &SubmissionState) -> String {
    let mut output = String::new();

    if state.is_initial() {
        output.push_str("No submission yet\n");
        return output;
    }

    let icon = if state.issues.is_some() { "✗" } else { "✓" };
    output.push_str(&format!("{} {}\n", icon, state.message));

    if let Some(issues) = &state.issues {
        output.push_str("\nErrors:\n");
        for (field, message) in issues {
            output.push_str(&format!("  • {}: {}\n", field, message));
        }
    }

    if let Some(fields) = &state.fields {
        output.push_str("\nValues:\n");
        for (field, value) in fields {
            output.push_str(&format!("  {} = {:?}\n", field, value));
        }
    }

    output
}

/// Format a validate-only report for human reading
fn format_report_human(report: &ValidationReport) -> String {
    if report.valid {
        return "✓ All fields are valid\n".to_string();
    }

    let mut output = format!("✗ Validation failed - {} issue(s)\n\n", report.issues.len());
    for (i, issue) in report.issues.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} [{}] {}\n",
            i + 1,
            issue.json_path(),
            issue.code.as_str(),
            issue.message
        ));
    }

    output.push_str("\nShown per field:\n");
    for (field, message) in &report.errors {
        output.push_str(&format!("  • {}: {}\n", field, message));
    }

    output
}

/// Format a schema for human reading
fn format_schema_human(schema: &FormSchema) -> String {
    let mut output = format!("Schema: {}\n", schema.name);
    if let Some(description) = &schema.description {
        output.push_str(&format!("{}\n", description));
    }
    output.push('\n');

    let rows = schema
        .fields
        .iter()
        .map(|field| {
            vec![
                field.name.clone(),
                field.label.clone().unwrap_or_default(),
                if field.trim { "yes" } else { "no" }.to_string(),
                field
                    .constraints
                    .iter()
                    .map(describe_constraint)
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect::<Vec<_>>();

    output.push_str(&render_table(&["Field", "Label", "Trim", "Constraints"], &rows));
    output.push('\n');
    output
}

fn describe_constraint(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Required { .. } => "required".to_string(),
        Constraint::Email { .. } => "email".to_string(),
        Constraint::MinLength { min, .. } => format!("min_length({})", min),
        Constraint::MaxLength { max, .. } => format!("max_length({})", max),
        Constraint::Pattern { regex, .. } => format!("pattern({})", regex),
    }
}
