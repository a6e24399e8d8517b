// src/config.rs
// =============================================================================
// The run configuration.
//
// A Config is built exactly once at startup and then passed by reference into
// every component. Nothing reads the environment or global state after that.
//
// Sources, lowest precedence first:
// 1. Built-in defaults
// 2. An optional TOML file (--config)
// 3. Command-line flags
// 4. The access token from the environment (GITHUB_TOKEN by default)
// =============================================================================

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SITE_URL: &str = "https://github.com";
pub const DEFAULT_OUTPUT: &str = "README.md";
pub const DEFAULT_TITLE: &str = "Projects Overview";
/// Highest accepted `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;
pub const DEFAULT_BADGE_TEMPLATE: &str = "[![PyPI Downloads]\
(https://static.pepy.tech/personalized-badge/{repo}?period=total&units=INTERNATIONAL_SYSTEM\
&left_color=BLACK&right_color=GREEN&left_text=downloads)]\
(https://pepy.tech/projects/{repo})";

/// The columns the table can show after the always-present project column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Stars,
    Release,
    Downloads,
    Issues,
    Prs,
    LastCommit,
}

impl Column {
    pub const FULL: [Column; 6] = [
        Column::Stars,
        Column::Release,
        Column::Downloads,
        Column::Issues,
        Column::Prs,
        Column::LastCommit,
    ];

    pub const REDUCED: [Column; 3] = [Column::Issues, Column::Prs, Column::LastCommit];

    pub fn label(self) -> &'static str {
        match self {
            Column::Stars => "⭐ Stars",
            Column::Release => "Release",
            Column::Downloads => "Downloads",
            Column::Issues => "Open Issues",
            Column::Prs => "Open PRs",
            Column::LastCommit => "Last Commit",
        }
    }

    /// Parses one entry of a column list; the presets `full` and `reduced`
    /// expand to several columns.
    pub fn expand(entry: &str) -> Result<Vec<Column>> {
        match entry.trim() {
            "full" => Ok(Column::FULL.to_vec()),
            "reduced" => Ok(Column::REDUCED.to_vec()),
            other => Ok(vec![other.parse()?]),
        }
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stars" => Ok(Column::Stars),
            "release" => Ok(Column::Release),
            "downloads" => Ok(Column::Downloads),
            "issues" => Ok(Column::Issues),
            "prs" => Ok(Column::Prs),
            "last-commit" => Ok(Column::LastCommit),
            other => Err(Error::config(format!(
                "unknown column '{other}' (expected stars, release, downloads, issues, prs, last-commit, full or reduced)"
            ))),
        }
    }
}

/// Expands a list of column names and presets into columns, in order.
pub fn parse_columns<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    for entry in entries {
        columns.extend(Column::expand(entry.as_ref())?);
    }
    Ok(columns)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub organization: String,
    pub repositories: Vec<String>,
    pub token: Option<String>,
    pub output: PathBuf,
    pub title: String,
    pub columns: Vec<Column>,
    pub api_url: String,
    pub site_url: String,
    pub badge_template: Option<String>,
    pub pull_request_page_size: u32,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub fail_fast: bool,
}

impl Config {
    /// A configuration with every optional setting at its default.
    pub fn new(organization: impl Into<String>, repositories: Vec<String>) -> Self {
        Config {
            organization: organization.into(),
            repositories,
            token: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            columns: Column::FULL.to_vec(),
            api_url: DEFAULT_API_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            badge_template: Some(DEFAULT_BADGE_TEMPLATE.to_string()),
            pull_request_page_size: 1,
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
            fail_fast: false,
        }
    }

    /// Builds the configuration from an optional TOML file, command-line
    /// overrides and the token, then validates it.
    pub fn load(path: Option<&Path>, overrides: Overrides, token: Option<String>) -> Result<Self> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };

        let mut config = Config::new(String::new(), Vec::new());
        file.apply(&mut config)?;
        overrides.apply(&mut config)?;
        config.token = token.filter(|t| !t.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(Error::config("no organization set (use `organization` in the config file or --org)"));
        }
        if self.organization.contains('/') {
            return Err(Error::config(format!("organization '{}' must not contain '/'", self.organization)));
        }
        if self.repositories.is_empty() {
            return Err(Error::config("no repositories listed (use `repositories` in the config file or --repo)"));
        }
        for repo in &self.repositories {
            if repo.trim().is_empty() || repo.contains('/') {
                return Err(Error::config(format!("invalid repository name '{repo}'")));
            }
        }
        if self.columns.is_empty() {
            return Err(Error::config("the column list is empty"));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(column) {
                return Err(Error::config(format!("column '{}' is listed twice", column.label())));
            }
        }
        for url in [&self.api_url, &self.site_url] {
            Url::parse(url).map_err(|e| Error::config(format!("invalid URL '{url}': {e}")))?;
        }
        if let Some(template) = &self.badge_template {
            if !template.contains("{repo}") {
                return Err(Error::config("badge_template must contain the {repo} placeholder"));
            }
        }
        if !(1..=100).contains(&self.pull_request_page_size) {
            return Err(Error::config("pull_request_page_size must be between 1 and 100"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be at least one second"));
        }
        if !(1..=MAX_ATTEMPTS_LIMIT).contains(&self.max_attempts) {
            return Err(Error::config(format!("max_attempts must be between 1 and {MAX_ATTEMPTS_LIMIT}")));
        }
        Ok(())
    }

    /// API URL with any trailing slash removed, ready for path joining.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn site_base(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

/// Values given on the command line; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub organization: Option<String>,
    pub repositories: Vec<String>,
    pub columns: Vec<String>,
    pub title: Option<String>,
    pub output: Option<PathBuf>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_attempts: Option<u32>,
    pub fail_fast: bool,
}

impl Overrides {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(organization) = self.organization {
            config.organization = organization;
        }
        // Repositories given on the command line replace the file's list.
        if !self.repositories.is_empty() {
            config.repositories = self.repositories;
        }
        if !self.columns.is_empty() {
            config.columns = parse_columns(&self.columns)?;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
        config.fail_fast |= self.fail_fast;
        Ok(())
    }
}

/// The on-disk TOML shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    organization: Option<String>,
    #[serde(default)]
    repositories: Vec<String>,
    output: Option<PathBuf>,
    title: Option<String>,
    columns: Option<Vec<String>>,
    api_url: Option<String>,
    site_url: Option<String>,
    /// An empty string disables the badge.
    badge_template: Option<String>,
    pull_request_page_size: Option<u32>,
    timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
    fail_fast: Option<bool>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading configuration file '{}'", path.display()), e))?;
        Self::parse(&text).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(organization) = self.organization {
            config.organization = organization;
        }
        config.repositories = self.repositories;
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(columns) = self.columns {
            config.columns = parse_columns(&columns)?;
        }
        if let Some(api_url) = self.api_url {
            config.api_url = api_url;
        }
        if let Some(site_url) = self.site_url {
            config.site_url = site_url;
        }
        if let Some(template) = self.badge_template {
            config.badge_template = Some(template).filter(|t| !t.is_empty());
        }
        if let Some(size) = self.pull_request_page_size {
            config.pull_request_page_size = size;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.retry_delay = Duration::from_millis(ms);
        }
        if let Some(fail_fast) = self.fail_fast {
            config.fail_fast = fail_fast;
        }
        Ok(())
    }
}
