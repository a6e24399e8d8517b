// src/render/table.rs
// =============================================================================
// Projects the ordered rows into a Markdown document:
//
//   # {title}
//   <empty line>
//   | Project | ⭐ Stars | ... |
//   |---------|---------|-----|
//   | [name](https://github.com/org/name) | 12 | ... |
//
// Rows are emitted in the order given. Nothing here sorts, filters, or reads
// the clock, so the same rows always produce the same bytes.
// =============================================================================

use crate::config::{Column, Config};
use crate::record::{TableRow, PLACEHOLDER};

const PROJECT_LABEL: &str = "Project";

/// Everything the renderer needs to know, independent of the rows.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub title: String,
    pub organization: String,
    pub site_url: String,
    pub columns: Vec<Column>,
}

impl TableLayout {
    pub fn from_config(config: &Config) -> Self {
        TableLayout {
            title: config.title.clone(),
            organization: config.organization.clone(),
            site_url: config.site_base().to_string(),
            columns: config.columns.clone(),
        }
    }

    pub fn render(&self, rows: &[TableRow]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 4);
        lines.push(format!("# {}", self.title));
        lines.push(String::new());
        lines.push(self.header_line());
        lines.push(self.separator_line());
        for row in rows {
            lines.push(self.row_line(row));
        }

        // No trailing newline after the last row.
        lines.join("\n")
    }

    fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(PROJECT_LABEL).chain(self.columns.iter().map(|c| c.label()))
    }

    fn header_line(&self) -> String {
        join_cells(self.labels().map(str::to_string))
    }

    fn separator_line(&self) -> String {
        // One dash per label character plus the padding on either side.
        let mut line = String::from("|");
        for label in self.labels() {
            line.push_str(&"-".repeat(label.chars().count() + 2));
            line.push('|');
        }
        line
    }

    fn row_line(&self, row: &TableRow) -> String {
        let name = row.name();
        let project = format!("[{name}]({}/{}/{name})", self.site_url, self.organization);
        let cells = self.columns.iter().map(|&column| cell(row, column));
        join_cells(std::iter::once(project).chain(cells))
    }
}

fn cell(row: &TableRow, column: Column) -> String {
    let record = match row {
        TableRow::Fetched(record) => record,
        TableRow::Unavailable { .. } => return PLACEHOLDER.to_string(),
    };

    match column {
        Column::Stars => record.stars.to_string(),
        Column::Release => record.release.clone(),
        Column::Downloads => record.downloads_badge.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        Column::Issues => record.open_issues.to_string(),
        Column::Prs => record.open_prs.to_string(),
        Column::LastCommit => record.last_commit_relative.clone(),
    }
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    let mut line = String::new();
    for cell in cells {
        line.push_str("| ");
        line.push_str(&cell);
        line.push(' ');
    }
    line.push('|');
    line
}
