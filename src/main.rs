// src/main.rs
// =============================================================================
// Entry point of org-pulse.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Build the one immutable Config for this run
// 3. Fetch every repository, in list order, one at a time
// 4. Render the table and write it (only after every fetch is done)
// 5. Exit with a code that tells callers what happened:
//      0 = all rows fetched, 1 = some placeholder rows,
//      2 = config, 3 = network, 4 = upstream, 5 = io error
// =============================================================================

mod cli;
mod config;
mod error;
mod github;
mod record;
mod render;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, SourceArgs};
use config::Config;
use github::GitHubClient;
use record::TableRow;
use render::TableLayout;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

/// Info level by default so the per-repository summary is always shown;
/// `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(verbose > 0)
        .init();
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<error::Error>()
        .map_or(2, error::Error::exit_code)
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Render { source, output, stdout } => {
            let config = load_config(&source, output)?;
            handle_render(&config, stdout).await
        }
        Commands::Fetch { source, json } => {
            let config = load_config(&source, None)?;
            handle_fetch(&config, json).await
        }
    }
}

fn load_config(source: &SourceArgs, output: Option<PathBuf>) -> Result<Config> {
    let token = std::env::var(&source.token_env).ok();
    if token.is_none() {
        log::debug!("{} is not set; requests are unauthenticated", source.token_env);
    }

    let config = Config::load(source.config.as_deref(), source.overrides(output), token)?;
    Ok(config)
}

async fn handle_render(config: &Config, stdout: bool) -> Result<i32> {
    let rows = fetch_rows(config).await?;
    let document = TableLayout::from_config(config).render(&rows);

    if stdout {
        println!("{document}");
    } else {
        write_output(&config.output, &document)?;
        log::info!("Wrote {} row(s) to {}", rows.len(), config.output.display());
    }

    Ok(exit_code_for_rows(&rows))
}

async fn handle_fetch(config: &Config, json: bool) -> Result<i32> {
    let rows = fetch_rows(config).await?;

    if json {
        let json_output = serde_json::to_string_pretty(&rows).context("serializing records")?;
        println!("{json_output}");
    } else {
        print_rows(&rows);
    }

    Ok(exit_code_for_rows(&rows))
}

async fn fetch_rows(config: &Config) -> Result<Vec<TableRow>> {
    let client = GitHubClient::new(config)?;
    log::info!(
        "Fetching {} repositories of {} from {}",
        config.repositories.len(),
        config.organization,
        client.base_url()
    );

    // One clock reading per run, so every row's age is measured from the same instant.
    let rows = github::collect_rows(&client, config, Utc::now()).await?;
    Ok(rows)
}

/// Overwrites the output file in one go. Called only once every row is known.
fn write_output(path: &Path, document: &str) -> error::Result<()> {
    std::fs::write(path, document).map_err(|e| error::Error::io(format!("writing {}", path.display()), e))
}

fn exit_code_for_rows(rows: &[TableRow]) -> i32 {
    if rows.iter().all(TableRow::is_fetched) {
        error::EXIT_OK
    } else {
        error::EXIT_PARTIAL
    }
}

fn print_rows(rows: &[TableRow]) {
    for row in rows {
        match row {
            TableRow::Fetched(record) => {
                println!("{}", record.name);
                println!("  stars:       {}", record.stars);
                println!("  release:     {}", record.release);
                println!("  open issues: {}", record.open_issues);
                println!("  open prs:    {}", record.open_prs);
                println!("  last commit: {}", record.last_commit_relative);
            }
            TableRow::Unavailable { name } => {
                println!("{name}");
                println!("  (unavailable)");
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Column;
    use crate::record::{RepositoryRecord, PLACEHOLDER};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, output: &Path) -> Config {
        let mut config = Config::new("y-sunflower", vec!["pyfonts".to_string(), "dayplot".to_string()]);
        config.api_url = server.uri();
        config.output = output.to_path_buf();
        config.title = "Overview".to_string();
        config.columns = Column::REDUCED.to_vec();
        config.retry_delay = Duration::from_millis(10);
        config
    }

    async fn mount_healthy_repo(server: &MockServer, repo: &str) {
        let routes = [
            (format!("/repos/y-sunflower/{repo}"), json!({"pushed_at": "2020-01-01T00:00:00Z"})),
            (format!("/repos/y-sunflower/{repo}/releases/latest"), json!({"tag_name": "v1"})),
            (format!("/repos/y-sunflower/{repo}/issues"), json!([{"number": 1}])),
            (format!("/repos/y-sunflower/{repo}/pulls"), json!([])),
        ];
        for (route, body) in routes {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn test_render_writes_rows_in_configured_order() {
        let server = MockServer::start().await;
        mount_healthy_repo(&server, "pyfonts").await;
        mount_healthy_repo(&server, "dayplot").await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("README.md");
        let config = test_config(&server, &output);

        let code = handle_render(&config, false).await.unwrap();
        assert_eq!(code, error::EXIT_OK);

        let written = std::fs::read_to_string(&output).unwrap();
        let rows: Vec<&str> = written.lines().skip(4).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("| [pyfonts]"));
        assert!(rows[1].starts_with("| [dayplot]"));
        assert!(rows[0].contains("| 1 | 0 | "));
        assert!(rows[0].ends_with("mo ago |"));
    }

    #[tokio::test]
    async fn test_partial_failure_writes_placeholder_row() {
        let server = MockServer::start().await;
        mount_healthy_repo(&server, "pyfonts").await;
        // dayplot is not mounted: wiremock answers 404.

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("README.md");
        let config = test_config(&server, &output);

        let code = handle_render(&config, false).await.unwrap();
        assert_eq!(code, error::EXIT_PARTIAL);

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("| [dayplot](https://github.com/y-sunflower/dayplot) | – | – | – |"));
    }

    #[tokio::test]
    async fn test_fail_fast_leaves_existing_file_untouched() {
        let server = MockServer::start().await;
        mount_healthy_repo(&server, "pyfonts").await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("README.md");
        std::fs::write(&output, "previous contents").unwrap();

        let mut config = test_config(&server, &output);
        config.fail_fast = true;

        let err = handle_render(&config, false).await.unwrap_err();
        assert_eq!(exit_code_for(&err), 4);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous contents");
    }

    #[test]
    fn test_write_output_error_maps_to_io_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let missing_parent = dir.path().join("no-such-dir").join("README.md");
        let err = write_output(&missing_parent, "x").unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_exit_code_for_rows() {
        let fetched = TableRow::Fetched(RepositoryRecord {
            name: "a".to_string(),
            stars: 0,
            release: PLACEHOLDER.to_string(),
            downloads_badge: None,
            open_issues: 0,
            open_prs: 0,
            last_commit_relative: "1s ago".to_string(),
        });
        let unavailable = TableRow::Unavailable { name: "b".to_string() };

        assert_eq!(exit_code_for_rows(&[]), error::EXIT_OK);
        assert_eq!(exit_code_for_rows(&[fetched.clone()]), error::EXIT_OK);
        assert_eq!(exit_code_for_rows(&[fetched, unavailable]), error::EXIT_PARTIAL);
    }

    #[test]
    fn test_unknown_errors_exit_with_config_code() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("something else")), 2);
    }
}
