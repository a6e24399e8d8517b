// src/record.rs
// =============================================================================
// The per-repository data that flows from the fetcher to the renderer.
//
// A RepositoryRecord is built once per repository per run and never mutated.
// A TableRow is what the renderer actually consumes: either a record, or a
// marker that the repository could not be fetched (rendered as placeholders).
// =============================================================================

use serde::Serialize;

/// Substituted for values that are genuinely absent (e.g. no release yet).
pub const PLACEHOLDER: &str = "–";

/// Metrics collected for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRecord {
    pub name: String,
    pub stars: u64,
    /// Latest release tag, or [`PLACEHOLDER`] when there is none.
    pub release: String,
    /// Markdown image+link snippet; `None` when no badge template is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads_badge: Option<String>,
    pub open_issues: u64,
    pub open_prs: u64,
    pub last_commit_relative: String,
}

/// One row of the rendered table, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TableRow {
    Fetched(RepositoryRecord),
    /// The repository failed to fetch; every metric cell shows the placeholder.
    Unavailable { name: String },
}

impl TableRow {
    pub fn name(&self) -> &str {
        match self {
            TableRow::Fetched(record) => &record.name,
            TableRow::Unavailable { name } => name,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, TableRow::Fetched(_))
    }
}

impl From<RepositoryRecord> for TableRow {
    fn from(record: RepositoryRecord) -> Self {
        TableRow::Fetched(record)
    }
}
