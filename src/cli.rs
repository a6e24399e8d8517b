// src/cli.rs
// =============================================================================
// The command-line interface, defined with clap's derive API.
//
// Two subcommands share the same "where do the repositories come from" flags:
//   org-pulse render --config org-pulse.toml
//   org-pulse fetch --org y-sunflower --repo pyfonts --repo dayplot --json
// =============================================================================

use crate::config::Overrides;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "org-pulse",
    version,
    about = "Render a Markdown status table for the repositories of a GitHub organization",
    long_about = "org-pulse queries the GitHub REST API for each listed repository (stars, latest release, \
                  open issues, open pull requests, last push) and writes the results as a Markdown table."
)]
pub struct Cli {
    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every repository and write the Markdown table
    ///
    /// Example: org-pulse render --config org-pulse.toml --output README.md
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// File to overwrite with the rendered table (default: README.md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the document to stdout instead of writing the file
        #[arg(long)]
        stdout: bool,
    },

    /// Fetch every repository and print the collected metrics
    ///
    /// Example: org-pulse fetch --org y-sunflower --repo pyfonts --json
    Fetch {
        #[command(flatten)]
        source: SourceArgs,

        /// Output the records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub organization (or user) that owns the repositories
    #[arg(long)]
    pub org: Option<String>,

    /// Repository name; repeat for several. Replaces the config file's list.
    #[arg(long = "repo", action = ArgAction::Append)]
    pub repos: Vec<String>,

    /// Columns to show, comma separated (stars, release, downloads, issues,
    /// prs, last-commit) or a preset (full, reduced)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Title line of the rendered document
    #[arg(long)]
    pub title: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per request when the connection fails
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Abort on the first repository that fails instead of rendering a placeholder row
    #[arg(long)]
    pub fail_fast: bool,

    /// Environment variable holding the access token
    #[arg(long, default_value = "GITHUB_TOKEN")]
    pub token_env: String,
}

impl SourceArgs {
    pub fn overrides(&self, output: Option<PathBuf>) -> Overrides {
        Overrides {
            organization: self.org.clone(),
            repositories: self.repos.clone(),
            columns: self.columns.clone(),
            title: self.title.clone(),
            output,
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout,
            max_attempts: self.max_attempts,
            fail_fast: self.fail_fast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::parse_from([
            "org-pulse",
            "-vv",
            "render",
            "--org",
            "y-sunflower",
            "--repo",
            "pyfonts",
            "--repo",
            "dayplot",
            "--columns",
            "issues,prs,last-commit",
            "--output",
            "STATUS.md",
        ]);
        assert_eq!(cli.verbose, 2);

        let Commands::Render { source, output, stdout } = cli.command else {
            panic!("expected render");
        };
        assert!(!stdout);
        assert_eq!(source.repos, vec!["pyfonts", "dayplot"]);
        assert_eq!(source.columns, vec!["issues", "prs", "last-commit"]);
        assert_eq!(source.token_env, "GITHUB_TOKEN");

        let overrides = source.overrides(output);
        assert_eq!(overrides.output, Some(PathBuf::from("STATUS.md")));
        assert_eq!(overrides.organization.as_deref(), Some("y-sunflower"));
    }

    #[test]
    fn test_fetch_json_flag() {
        let cli = Cli::parse_from(["org-pulse", "fetch", "--config", "org.toml", "--json", "--fail-fast"]);
        let Commands::Fetch { source, json } = cli.command else {
            panic!("expected fetch");
        };
        assert!(json);
        assert!(source.fail_fast);
        assert_eq!(source.config, Some(PathBuf::from("org.toml")));
    }
}
