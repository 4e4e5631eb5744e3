//! Output formatting for JSON and text modes
//!
//! Text mode echoes each result as it is recorded and ends with a per-category
//! summary. JSON mode prints one [`RunReport`] per suite at the end.

use crate::results::{Category, ResultLog, Summary, TestResult};
use crate::scenario::Suite;
use serde::Serialize;

/// Machine-readable outcome of one suite run
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub suite: String,
    /// Set when setup failed and the scenarios never ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
    pub summary: Summary,
    pub results: &'a [TestResult],
}

impl<'a> RunReport<'a> {
    pub fn new(suite: &str, log: &'a ResultLog) -> Self {
        Self {
            suite: suite.to_string(),
            aborted: None,
            summary: log.summarize(),
            results: log.results(),
        }
    }

    pub fn with_aborted(mut self, reason: &str) -> Self {
        self.aborted = Some(reason.to_string());
        self
    }
}

/// Entry of `swipecheck list`
#[derive(Debug, Serialize)]
pub struct SuiteListing {
    pub name: String,
    pub description: String,
    pub scenarios: usize,
}

impl SuiteListing {
    pub fn new(suite: &Suite) -> Self {
        Self {
            name: suite.name.clone(),
            description: suite.description.clone(),
            scenarios: suite.scenarios.len(),
        }
    }
}

pub fn status_label(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

/// One line per result, with the detail indented underneath for failures
pub fn format_result(result: &TestResult) -> String {
    let mut line = format!(
        "{}: {} - {}",
        status_label(result.passed),
        result.name,
        result.message
    );
    if !result.passed
        && let Some(detail) = &result.detail
    {
        line.push_str(&format!("\n   Details: {}", detail));
    }
    line
}

pub fn print_result(result: &TestResult) {
    println!("{}", format_result(result));
}

pub fn print_section(title: &str) {
    println!("\n=== {} ===", title);
}

/// Per-category totals followed by the failures of that category
pub fn format_summary(suite: &str, log: &ResultLog) -> String {
    let summary = log.summarize();
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "=".repeat(60)));
    out.push_str(&format!("SUMMARY: {}\n", suite));
    out.push_str(&format!("{}\n", "=".repeat(60)));

    for category in &summary.categories {
        out.push_str(&format!(
            "\n{}: {} passed, {} failed\n",
            heading(category.category),
            category.passed,
            category.failed
        ));
        for failure in log.failures().filter(|r| r.category == category.category) {
            out.push_str(&format!("  FAIL: {} - {}\n", failure.name, failure.message));
        }
    }

    out.push_str(&format!(
        "\nTOTAL: {} passed, {} failed\n",
        summary.total_passed, summary.total_failed
    ));
    if summary.all_passed {
        out.push_str("All checks passed.\n");
    } else {
        out.push_str(&format!("{} check(s) failed.\n", summary.total_failed));
    }
    out
}

pub fn print_summary(suite: &str, log: &ResultLog) {
    print!("{}", format_summary(suite, log));
}

fn heading(category: Category) -> String {
    category.to_string().to_uppercase()
}

/// Print JSON output to stdout
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    }
}
