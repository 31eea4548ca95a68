//! Human-readable rendering of test cases and run summaries

use crate::case::{TestCase, TestOutcome, TestStatus};
use crate::generator::{indent, unescaped_quote_params};
use crate::runner::RunSummary;
use colored::{ColoredString, Colorize};
use sqltest_core::TestParams;

const CASE_SEPARATOR_WIDTH: usize = 48;
const SUMMARY_SEPARATOR_WIDTH: usize = 79;

/// Renders test cases and summaries, optionally with ANSI colors
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// A reporter that never emits escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn status_token(&self, status: TestStatus) -> String {
        let token = status.as_str();
        match status {
            TestStatus::Pending => token.to_string(),
            TestStatus::Passed => self.paint(token, |t| t.cyan()),
            TestStatus::Failed | TestStatus::Error => self.paint(token, |t| t.red()),
        }
    }

    /// Render one case: its label and status, the parameters it was
    /// invoked with, and for failures the error or the executed SQL.
    pub fn render_case(&self, case: &TestCase<'_>, outcome: Option<&TestOutcome>) -> String {
        let status = outcome.map_or(TestStatus::Pending, |o| o.status);
        let mut out = format!("{} - {}", case.label(), self.status_token(status));

        if !case.test.kwargs.is_empty() {
            let kwargs = format!(" ↳ {}", format_kwargs(&case.test.kwargs));
            out.push('\n');
            out.push_str(&self.paint(&kwargs, |t| t.bright_black()));
        }

        let detail = outcome.and_then(|o| match o.status {
            TestStatus::Error => o.error.as_deref(),
            TestStatus::Failed => Some(o.sql.as_str()),
            TestStatus::Pending | TestStatus::Passed => None,
        });
        if let Some(detail) = detail {
            let separator = "=".repeat(CASE_SEPARATOR_WIDTH);
            let block = format!("{separator}\n{}\n{separator}", indent(detail, 4));
            out.push('\n');
            out.push_str(&self.paint(&block, |t| t.red()));
        }

        out
    }

    /// Render the separator, overall verdict and counts of a run
    pub fn render_summary(&self, summary: &RunSummary) -> String {
        let verdict = if summary.succeeded() {
            self.paint("Passed", |t| t.cyan())
        } else {
            self.paint("Failed", |t| t.red())
        };
        format!(
            "{}\n{}\nTested: {} - Passed: {} - Failed: {} - Errors: {}",
            "+".repeat(SUMMARY_SEPARATOR_WIDTH),
            verdict,
            group_thousands(summary.tested),
            group_thousands(summary.passed),
            group_thousands(summary.failed),
            group_thousands(summary.errors),
        )
    }
}

/// Notice for a case whose string parameters contain single quotes, which
/// are emitted without escaping.
pub fn quote_warning(case: &TestCase<'_>) -> Option<String> {
    let params = unescaped_quote_params(case.test);
    if params.is_empty() {
        return None;
    }
    Some(format!(
        "Warning: {}: single quotes in {} are not escaped; the generated SQL may be invalid",
        case.label(),
        params.join(", ")
    ))
}

/// `{'key': value, ...}`
pub fn format_kwargs(kwargs: &TestParams) -> String {
    let entries = kwargs
        .iter()
        .map(|(key, value)| format!("'{key}': {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}

/// Format a count with comma thousands separators
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
