//! Result log for a harness run
//!
//! Every assertion made by a scenario becomes an immutable [`TestResult`]
//! appended to the [`ResultLog`]. The log keeps running pass/fail counters
//! per [`Category`] and produces a [`Summary`] at the end of the run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Bucket a result is counted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Setup,
    Auth,
    Profile,
    Explore,
    Swipe,
    Matches,
    Seed,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Setup => write!(f, "setup"),
            Category::Auth => write!(f, "auth"),
            Category::Profile => write!(f, "profile"),
            Category::Explore => write!(f, "explore"),
            Category::Swipe => write!(f, "swipe"),
            Category::Matches => write!(f, "matches"),
            Category::Seed => write!(f, "seed"),
        }
    }
}

/// A single recorded assertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub category: Category,
    pub name: String,
    pub passed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

/// Pass/fail counters for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
}

/// Ordered, append-only log of results
#[derive(Debug, Default)]
pub struct ResultLog {
    results: Vec<TestResult>,
    counts: BTreeMap<Category, Counts>,
}

/// Per-category line of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub passed: usize,
    pub failed: usize,
}

/// Aggregated outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub categories: Vec<CategorySummary>,
    pub total_passed: usize,
    pub total_failed: usize,
    pub all_passed: bool,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and bump its category counter
    pub fn record(
        &mut self,
        category: Category,
        name: impl Into<String>,
        passed: bool,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> &TestResult {
        let counts = self.counts.entry(category).or_default();
        if passed {
            counts.passed += 1;
        } else {
            counts.failed += 1;
        }

        self.results.push(TestResult {
            category,
            name: name.into(),
            passed,
            message: message.into(),
            detail,
            timestamp: now_millis(),
        });
        // Just pushed, so the log is never empty here.
        &self.results[self.results.len() - 1]
    }

    pub fn pass(&mut self, category: Category, name: impl Into<String>, message: impl Into<String>) {
        self.record(category, name, true, message, None);
    }

    pub fn fail(
        &mut self,
        category: Category,
        name: impl Into<String>,
        message: impl Into<String>,
        detail: Option<String>,
    ) {
        self.record(category, name, false, message, detail);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn counts(&self, category: Category) -> Counts {
        self.counts.get(&category).copied().unwrap_or_default()
    }

    pub fn summarize(&self) -> Summary {
        let categories: Vec<CategorySummary> = self
            .counts
            .iter()
            .map(|(category, counts)| CategorySummary {
                category: *category,
                passed: counts.passed,
                failed: counts.failed,
            })
            .collect();

        let total_passed = categories.iter().map(|c| c.passed).sum();
        let total_failed: usize = categories.iter().map(|c| c.failed).sum();

        Summary {
            categories,
            total_passed,
            total_failed,
            all_passed: total_failed == 0,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
