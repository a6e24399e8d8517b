// src/github/fetch.rs
// =============================================================================
// Collects the metrics for each configured repository.
//
// Per repository, four sequential GET requests:
// 1. /repos/{org}/{repo}                  -> pushed_at (required), stars
// 2. /repos/{org}/{repo}/releases/latest  -> tag, or the placeholder if none
// 3. /repos/{org}/{repo}/issues?state=open
//    -> count of entries that are NOT pull requests
// 4. /repos/{org}/{repo}/pulls?state=open&per_page=N
//    -> count of entries returned (a single page, see below)
//
// The download badge is built from a URL template; no request is made for it.
//
// Known limitation: the pull-request count only looks at one page of
// `pull_request_page_size` entries (1 by default), so it reads at most that
// many even when more pull requests are open. The open-issue count likewise
// only sees the API's first page.
// =============================================================================

use super::client::GitHubClient;
use super::types::{is_pull_request, latest_release_tag, IssueEntry, RepoMetadata};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{RepositoryRecord, TableRow, PLACEHOLDER};
use crate::render::format_age;
use chrono::{DateTime, Utc};

/// Fetches and assembles one repository's record.
///
/// `now` is the instant the "last commit" age is measured against.
pub async fn fetch_repository(
    client: &GitHubClient,
    config: &Config,
    name: &str,
    now: DateTime<Utc>,
) -> Result<RepositoryRecord> {
    let repo_path = format!("/repos/{}/{}", config.organization, name);

    let metadata: RepoMetadata = client.get_json(&repo_path).await.required()?;
    let pushed_at = metadata.pushed_at.ok_or_else(|| {
        Error::upstream(
            format!("{}{}", client.base_url(), repo_path),
            "missing required field `pushed_at`",
        )
    })?;

    // No release yet is normal, whatever shape the empty answer takes; only a
    // transport failure or a body that is not JSON at all is an error.
    let release = client
        .get_json::<serde_json::Value>(&format!("{repo_path}/releases/latest"))
        .await
        .optional()?
        .and_then(|body| latest_release_tag(&body))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let issues: Vec<IssueEntry> = client
        .get_json(&format!("{repo_path}/issues?state=open"))
        .await
        .required()?;
    let open_issues = issues.iter().filter(|entry| !is_pull_request(entry)).count() as u64;

    let pulls: Vec<serde_json::Value> = client
        .get_json(&format!(
            "{repo_path}/pulls?state=open&per_page={}",
            config.pull_request_page_size
        ))
        .await
        .required()?;
    let open_prs = pulls.len() as u64;

    let record = RepositoryRecord {
        name: name.to_string(),
        stars: metadata.stars(),
        release,
        downloads_badge: config.badge_template.as_deref().map(|t| badge_for(t, name)),
        open_issues,
        open_prs,
        last_commit_relative: format_age(pushed_at, now),
    };

    log::info!(
        "{}: issues={} prs={} last_commit={} stars={} release={}",
        record.name,
        record.open_issues,
        record.open_prs,
        record.last_commit_relative,
        record.stars,
        record.release
    );

    Ok(record)
}

/// Fetches every configured repository, one after another, in list order.
///
/// Unless `fail_fast` is set, a repository that fails is logged and kept as an
/// [`TableRow::Unavailable`] row so the rest of the table still gets written.
/// With `fail_fast`, the first failure is returned and nothing else is fetched.
pub async fn collect_rows(client: &GitHubClient, config: &Config, now: DateTime<Utc>) -> Result<Vec<TableRow>> {
    let mut rows = Vec::with_capacity(config.repositories.len());

    for name in &config.repositories {
        match fetch_repository(client, config, name, now).await {
            Ok(record) => rows.push(TableRow::Fetched(record)),
            Err(e) if config.fail_fast => return Err(e),
            Err(e) => {
                log::warn!("{name}: {e}; rendering placeholder row");
                rows.push(TableRow::Unavailable { name: name.clone() });
            }
        }
    }

    Ok(rows)
}

/// Substitutes the repository name into the badge template.
pub fn badge_for(template: &str, repo: &str) -> String {
    template.replace("{repo}", repo)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why pass `now` in instead of calling Utc::now() here?
//    - Every row of one run is aged against the same instant
//    - Tests can pin the clock and assert exact strings like "3d ago"
//
// 2. Why `.required()` vs `.optional()`?
//    - Both come from ApiResult (see client.rs)
//    - required(): a 404 or empty body is an Error::Upstream
//    - optional(): a 404 or empty body is Ok(None); network errors still fail
//
// 3. Why `as u64` on the counts?
//    - Vec::len() is a usize; the record stores u64 so the JSON output has
//      the same shape on every platform
// -----------------------------------------------------------------------------
