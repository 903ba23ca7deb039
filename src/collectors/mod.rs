pub mod git;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::path::Path;

#[async_trait]
pub trait CommitCollector: Send + Sync {
    /// Commit subjects from the given local calendar day, newest first.
    async fn commit_messages_on(&self, repo_root: &Path, date: NaiveDate) -> Result<Vec<String>>;

    /// Commit subjects since local midnight, newest first.
    async fn todays_commit_messages(&self, repo_root: &Path) -> Result<Vec<String>> {
        self.commit_messages_on(repo_root, Local::now().date_naive())
            .await
    }

    /// Check if this collector can read the repository
    async fn health_check(&self, repo_root: &Path) -> Result<bool>;
}

pub use git::GitCollector;
