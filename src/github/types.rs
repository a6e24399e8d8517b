// src/github/types.rs
// Only the fields we read are declared; serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GET /repos/{org}/{repo}
#[derive(Debug, Deserialize)]
pub struct RepoMetadata {
    /// Required. Its absence is reported as an upstream error by the fetcher.
    pub pushed_at: Option<DateTime<Utc>>,
    /// Treated as zero when absent or null.
    pub stargazers_count: Option<u64>,
}

impl RepoMetadata {
    pub fn stars(&self) -> u64 {
        self.stargazers_count.unwrap_or(0)
    }
}

/// GET /repos/{org}/{repo}/releases/latest, decoded loosely: only an object
/// with a non-empty string `tag_name` counts as a release. Any other shape
/// (`[]`, `{}`, a missing or null tag) means there is no release to show.
pub fn latest_release_tag(body: &serde_json::Value) -> Option<String> {
    body.get("tag_name")
        .and_then(serde_json::Value::as_str)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
}

/// An entry of GET /repos/{org}/{repo}/issues, kept as raw JSON because the
/// only thing we care about is whether the `pull_request` key is present.
pub type IssueEntry = serde_json::Map<String, serde_json::Value>;

/// The issues endpoint also lists pull requests; those carry this key.
pub const PULL_REQUEST_MARKER: &str = "pull_request";

pub fn is_pull_request(entry: &IssueEntry) -> bool {
    entry.contains_key(PULL_REQUEST_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_without_stars_defaults_to_zero() {
        let meta: RepoMetadata = serde_json::from_str(r#"{"pushed_at": "2025-06-01T12:00:00Z"}"#).unwrap();
        assert_eq!(meta.stars(), 0);
        assert_eq!(meta.pushed_at, Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_metadata_without_pushed_at_still_parses() {
        let meta: RepoMetadata = serde_json::from_str(r#"{"stargazers_count": 12}"#).unwrap();
        assert!(meta.pushed_at.is_none());
        assert_eq!(meta.stars(), 12);
    }

    #[test]
    fn test_latest_release_tag_shapes() {
        assert_eq!(latest_release_tag(&serde_json::json!({"tag_name": "v0.3.1"})), Some("v0.3.1".to_string()));
        assert_eq!(latest_release_tag(&serde_json::json!({"tag_name": ""})), None);
        assert_eq!(latest_release_tag(&serde_json::json!({"tag_name": null})), None);
        assert_eq!(latest_release_tag(&serde_json::json!({"name": "untagged"})), None);
        assert_eq!(latest_release_tag(&serde_json::json!([])), None);
        assert_eq!(latest_release_tag(&serde_json::json!([{"tag_name": "v1"}])), None);
    }

    #[test]
    fn test_pull_request_marker() {
        let issue: IssueEntry = serde_json::from_str(r#"{"number": 1}"#).unwrap();
        let pr: IssueEntry = serde_json::from_str(r#"{"number": 2, "pull_request": {"url": "x"}}"#).unwrap();
        assert!(!is_pull_request(&issue));
        assert!(is_pull_request(&pr));
    }
}
