use chrono::NaiveDate;

use crate::prompts::{STANDUP_PROMPT_FOOTER, STANDUP_PROMPT_HEADER};

/// Builds the user prompt for a standup summary.
///
/// Commit subjects are kept in the order given, one per line.
pub fn commit_prompt(commits: &[String]) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        STANDUP_PROMPT_HEADER,
        commits.join("\n"),
        STANDUP_PROMPT_FOOTER
    )
}

/// A generated report, ready to print or post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandupReport {
    pub date: NaiveDate,
    pub commit_count: usize,
    pub summary: String,
}

impl StandupReport {
    pub fn new(date: NaiveDate, commit_count: usize, summary: String) -> Self {
        Self {
            date,
            commit_count,
            summary,
        }
    }

    pub fn to_markdown(&self) -> String {
        format!(
            "# Daily Standup - {}\n\n{}\n",
            self.date.format("%a %b %d %Y"),
            self.summary.trim_end()
        )
    }
}
