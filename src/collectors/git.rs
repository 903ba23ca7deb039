use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate, TimeZone};
use git2::{ErrorCode, Repository, Sort};
use std::path::{Path, PathBuf};

use crate::collectors::CommitCollector;

/// Reads commit subjects straight from the object database with libgit2.
#[derive(Debug, Clone, Default)]
pub struct GitCollector;

impl GitCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommitCollector for GitCollector {
    async fn commit_messages_on(&self, repo_root: &Path, date: NaiveDate) -> Result<Vec<String>> {
        let (since, until) = local_day_bounds(date)?;
        let repo_root: PathBuf = repo_root.to_path_buf();

        let subjects = tokio::task::spawn_blocking(move || read_subjects(&repo_root, since, until))
            .await
            .context("git history task panicked")??;

        tracing::debug!(%date, count = subjects.len(), "Collected commit subjects");
        Ok(subjects)
    }

    async fn health_check(&self, repo_root: &Path) -> Result<bool> {
        Ok(Repository::discover(repo_root).is_ok())
    }
}

/// Unix seconds for `[00:00 on date, 00:00 the next day)` in local time.
pub fn local_day_bounds(date: NaiveDate) -> Result<(i64, i64)> {
    let start = local_midnight(date)?;
    let end = local_midnight(date + Duration::days(1))?;
    Ok((start, end))
}

fn local_midnight(date: NaiveDate) -> Result<i64> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight for date")?;
    // A DST gap at midnight has no local instant; fall back to reading it as UTC.
    Ok(Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| naive.and_utc().timestamp()))
}

fn read_subjects(repo_root: &Path, since: i64, until: i64) -> Result<Vec<String>> {
    let repo = Repository::discover(repo_root)
        .with_context(|| format!("Not in a git repository: {}", repo_root.display()))?;

    if repo.is_empty()? {
        return Ok(Vec::new());
    }
    match repo.head() {
        Ok(_) => {}
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).context("Failed to read HEAD"),
    }

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME)?;
    revwalk.push_head().context("Failed to read HEAD")?;

    let mut subjects = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        let committed_at = commit.time().seconds();
        if committed_at < since || committed_at >= until {
            continue;
        }
        if let Some(subject) = commit.summary() {
            let subject = subject.trim();
            if !subject.is_empty() {
                subjects.push(subject.to_string());
            }
        }
    }

    Ok(subjects)
}
