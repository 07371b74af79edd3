//! Report formatting for validation runs.
//!
//! Formatters turn a [`ValidationReport`] into text for a console, a JSON
//! consumer or a Markdown document. Each result is shown under its display
//! label from a [`LabelTable`]; results without a registered label use the
//! table's fallback.
//!
//! # Examples
//!
//! ```rust
//! use dq_guard::formatters::{HumanFormatter, ResultFormatter};
//! use dq_guard::core::ValidationReport;
//!
//! let report = ValidationReport::new("empty", 0, Vec::new());
//! let output = HumanFormatter::new().format(&report).unwrap();
//! assert!(output.contains("Suite: empty"));
//! ```

use crate::core::{Summary, ValidationReport};
use crate::labels::LabelTable;
use crate::prelude::*;
use crate::profile::QualityKpis;
use crate::scoring::Badge;
use serde::Serialize;
use std::fmt::Write;

/// Configuration options for formatting validation reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include summary metrics and the badge
    pub include_summary: bool,
    /// Include the per-expectation result table
    pub include_results: bool,
    /// Only list failed expectations in the result table
    pub only_failures: bool,
    /// Maximum number of results to display (-1 for all)
    pub max_results: i32,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_results: true,
            only_failures: false,
            max_results: -1,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_summary: true,
            include_results: false,
            only_failures: false,
            max_results: 0,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_summary: true,
            include_results: true,
            only_failures: true,
            max_results: 50,
            use_colors: false,
            include_timestamps: true,
        }
    }

    pub fn with_results(mut self, include: bool) -> Self {
        self.include_results = include;
        self
    }

    pub fn with_only_failures(mut self, only_failures: bool) -> Self {
        self.only_failures = only_failures;
        self
    }

    pub fn with_max_results(mut self, max: i32) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }
}

/// Trait for formatting validation reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use dq_guard::core::ValidationReport;
/// use dq_guard::formatters::ResultFormatter;
///
/// struct OneLine;
///
/// impl ResultFormatter for OneLine {
///     fn format(&self, report: &ValidationReport) -> dq_guard::prelude::Result<String> {
///         let summary = report.summary();
///         Ok(format!("{}/{} passed", summary.success_count, summary.total_checks))
///     }
/// }
///
/// let report = ValidationReport::new("s", 0, Vec::new());
/// assert_eq!(OneLine.format(&report).unwrap(), "0/0 passed");
/// ```
pub trait ResultFormatter {
    /// Formats a validation report.
    fn format(&self, report: &ValidationReport) -> Result<String>;

    /// Formats a validation report with custom configuration.
    fn format_with_config(
        &self,
        report: &ValidationReport,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(report)
    }

    /// Formats dataset quality figures. Formatters without a KPI view return
    /// an empty string.
    fn format_kpis(&self, _kpis: &QualityKpis) -> Result<String> {
        Ok(String::new())
    }
}

/// A result row as shown to readers: label first, then the raw identity.
#[derive(Debug, Clone, Serialize)]
struct ResultRow<'a> {
    label: String,
    kind: &'a str,
    column: &'a str,
    success: bool,
    unexpected_count: u64,
    element_count: u64,
}

/// The serialized shape of a report.
#[derive(Debug, Serialize)]
struct ReportView<'a> {
    suite_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a str>,
    row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<Badge>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    results: Vec<ResultRow<'a>>,
}

/// Rows selected by `config`, plus how many were cut off by `max_results`.
fn select_rows<'a>(
    report: &'a ValidationReport,
    labels: &LabelTable,
    config: &FormatterConfig,
) -> (Vec<ResultRow<'a>>, usize) {
    if !config.include_results {
        return (Vec::new(), 0);
    }

    let rows: Vec<ResultRow<'a>> = report
        .results
        .iter()
        .filter(|result| !config.only_failures || !result.success())
        .map(|result| ResultRow {
            label: labels.label_for_result(result).into_owned(),
            kind: result.kind().as_str(),
            column: result.column(),
            success: result.success(),
            unexpected_count: result.unexpected_count(),
            element_count: result.element_count(),
        })
        .collect();

    if config.max_results < 0 {
        return (rows, 0);
    }
    let max = config.max_results as usize;
    let hidden = rows.len().saturating_sub(max);
    (rows.into_iter().take(max).collect(), hidden)
}

/// Formats validation reports as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    labels: LabelTable,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            labels: LabelTable::new(),
            pretty: true,
        }
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.map_err(|e| DqError::Internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let (results, _) = select_rows(report, &self.labels, config);
        let view = ReportView {
            suite_name: &report.suite_name,
            timestamp: config
                .include_timestamps
                .then_some(report.timestamp.as_str()),
            row_count: report.row_count,
            summary: config.include_summary.then(|| report.summary()),
            badge: config.include_summary.then(|| report.badge()),
            results,
        };
        self.serialize(&view)
    }

    fn format_kpis(&self, kpis: &QualityKpis) -> Result<String> {
        self.serialize(kpis)
    }
}

/// Formats validation reports for console output.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
    labels: LabelTable,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            labels: LabelTable::new(),
        }
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(text: &str, ansi: &str, use_colors: bool) -> String {
    if use_colors {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();

        writeln!(output).unwrap();
        if report.is_success() {
            writeln!(output, "✅ {}", paint("Validation PASSED", "32", config.use_colors)).unwrap();
        } else {
            writeln!(output, "❌ {}", paint("Validation FAILED", "31", config.use_colors)).unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "Suite: {}", report.suite_name).unwrap();
        writeln!(output, "Rows: {}", report.row_count).unwrap();
        if config.include_timestamps {
            writeln!(output, "Timestamp: {}", report.timestamp).unwrap();
        }

        let (rows, hidden) = select_rows(report, &self.labels, config);
        if !rows.is_empty() {
            let width = rows
                .iter()
                .map(|row| row.label.chars().count())
                .max()
                .unwrap_or(0)
                .max("Test".len());

            writeln!(output).unwrap();
            writeln!(output, "🔍 Results:").unwrap();
            writeln!(output, "   {:<width$}  Status  Fehler", "Test").unwrap();
            for row in &rows {
                let status = if row.success {
                    paint("✅", "32", config.use_colors)
                } else {
                    paint("❌", "31", config.use_colors)
                };
                writeln!(
                    output,
                    "   {:<width$}  {status}      {}",
                    row.label, row.unexpected_count
                )
                .unwrap();
            }
            if hidden > 0 {
                writeln!(output, "   ... and {hidden} more results").unwrap();
            }
        }

        if config.include_summary {
            let summary = report.summary();
            let badge = report.badge();
            writeln!(output).unwrap();
            writeln!(output, "📊 Summary Statistics:").unwrap();
            writeln!(output, "   Total Checks: {}", summary.total_checks).unwrap();
            writeln!(output, "   ✅ Passed: {}", summary.success_count).unwrap();
            writeln!(output, "   ❌ Failed: {}", summary.failed_count()).unwrap();
            writeln!(output, "   Unexpected Values: {}", summary.total_unexpected).unwrap();
            writeln!(output, "   Success Rate: {:.1}%", summary.success_percentage()).unwrap();
            writeln!(
                output,
                "   Badge: {} ({:.0}%)",
                badge.label(),
                badge.progress * 100.0
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        Ok(output)
    }

    fn format_kpis(&self, kpis: &QualityKpis) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "📈 Kennzahlen:").unwrap();
        writeln!(output, "   Fehlerhaft: {:.1}%", kpis.error_percentage).unwrap();
        writeln!(
            output,
            "   Zeilen mit fehlenden Werten: {} ({:.1}%)",
            kpis.rows_with_missing, kpis.empty_rows_percentage
        )
        .unwrap();
        for column in &kpis.missing_by_column {
            writeln!(
                output,
                "   {}: {:.2}% fehlend",
                column.column, column.missing_percentage
            )
            .unwrap();
        }
        Ok(output)
    }
}

/// Formats validation reports as Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    labels: LabelTable,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            labels: LabelTable::new(),
            heading_level: 2,
        }
    }

    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes characters that would break a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        if report.is_success() {
            writeln!(output, "{h} ✅ Validation Report - PASSED").unwrap();
        } else {
            writeln!(output, "{h} ❌ Validation Report - FAILED").unwrap();
        }

        writeln!(output).unwrap();
        writeln!(output, "**Suite:** {}", report.suite_name).unwrap();
        writeln!(output, "**Rows:** {}", report.row_count).unwrap();
        if config.include_timestamps {
            writeln!(output, "**Timestamp:** {}", report.timestamp).unwrap();
        }

        let (rows, hidden) = select_rows(report, &self.labels, config);
        if !rows.is_empty() {
            writeln!(output).unwrap();
            writeln!(output, "{h}# Results").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Test | Status | Fehler |").unwrap();
            writeln!(output, "|------|--------|--------|").unwrap();
            for row in &rows {
                let status = if row.success { "✅" } else { "❌" };
                writeln!(
                    output,
                    "| {} | {status} | {} |",
                    escape_cell(&row.label),
                    row.unexpected_count
                )
                .unwrap();
            }
            if hidden > 0 {
                writeln!(output).unwrap();
                writeln!(
                    output,
                    "> **Note:** {hidden} additional results not shown in this report."
                )
                .unwrap();
            }
        }

        if config.include_summary {
            let summary = report.summary();
            let badge = report.badge();
            writeln!(output).unwrap();
            writeln!(output, "{h}# Summary").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Metric | Value |").unwrap();
            writeln!(output, "|--------|-------|").unwrap();
            writeln!(output, "| Total Checks | {} |", summary.total_checks).unwrap();
            writeln!(output, "| Passed | {} |", summary.success_count).unwrap();
            writeln!(output, "| Failed | {} |", summary.failed_count()).unwrap();
            writeln!(output, "| Unexpected Values | {} |", summary.total_unexpected).unwrap();
            writeln!(
                output,
                "| Success Rate | {:.1}% |",
                summary.success_percentage()
            )
            .unwrap();
            writeln!(output, "| Badge | {} |", badge.label()).unwrap();
        }

        Ok(output)
    }

    fn format_kpis(&self, kpis: &QualityKpis) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);
        writeln!(output, "{h}# Kennzahlen").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Kennzahl | Wert |").unwrap();
        writeln!(output, "|----------|------|").unwrap();
        writeln!(output, "| Fehlerhaft | {:.1}% |", kpis.error_percentage).unwrap();
        writeln!(
            output,
            "| Zeilen mit fehlenden Werten | {:.1}% |",
            kpis.empty_rows_percentage
        )
        .unwrap();
        for column in &kpis.missing_by_column {
            writeln!(
                output,
                "| {} fehlend | {:.2}% |",
                escape_cell(&column.column),
                column.missing_percentage
            )
            .unwrap();
        }
        Ok(output)
    }
}
