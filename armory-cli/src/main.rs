//! Armory - browse the vehicle encyclopedia from the terminal
//!
//! Main entry point: parses flags, initializes tracing, resolves
//! configuration and dispatches to the table commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use armory_core::config::ArmoryConfig;

mod table_cli;

/// Trace modules for structured tracing
#[derive(Debug, Clone, ValueEnum)]
enum TraceModule {
    Fetch,
    View,
    All,
}

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "armory",
    about = "Search and page through the vehicle encyclopedia",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Enable structured tracing (comma-separated: fetch,view,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Override the encyclopedia endpoint
    #[clap(long, global = true)]
    endpoint: Option<String>,

    /// Override the application id sent to the API
    #[clap(long, global = true)]
    application_id: Option<String>,

    /// Page sizes to offer (comma-separated)
    #[clap(long, value_delimiter = ',', global = true, allow_negative_numbers = true)]
    page_sizes: Option<Vec<i64>>,

    /// Initial page size (must be one of the offered sizes)
    #[clap(long, global = true, allow_negative_numbers = true)]
    page_size: Option<i64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and print one page
    List {
        /// Filter by name or short name (case and accent insensitive)
        #[clap(long, short)]
        search: Option<String>,

        /// Page to show (clamped to the available pages)
        #[clap(long, default_value = "1")]
        page: usize,

        /// Output the view as JSON
        #[clap(long)]
        json: bool,
    },

    /// Browse the catalog interactively
    Browse,
}

/// Initialize tracing with CLI flags
///
/// When --trace is set, output switches to JSON lines. Logs always go to
/// stderr so stdout carries only the rendered table.
fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        let directive = match module {
            TraceModule::Fetch => "armory_core::catalog=trace",
            TraceModule::View => "armory_core::view=trace",
            TraceModule::All => "armory_core=trace",
        };

        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    if !trace_modules.is_empty() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "Armory tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the config file and apply flag overrides
fn resolve_config(cli: &Cli) -> Result<ArmoryConfig> {
    let mut config = match &cli.config {
        Some(path) => ArmoryConfig::load_from_path(path)?,
        None => ArmoryConfig::load().context("Failed to load armory configuration")?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.catalog.endpoint = endpoint.clone();
    }
    if let Some(application_id) = &cli.application_id {
        config.catalog.application_id = application_id.clone();
    }
    if let Some(sizes) = &cli.page_sizes {
        config.table.page_size_options = sizes.clone();
    }
    if let Some(size) = cli.page_size {
        config.table.initial_page_size = Some(size);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let config = resolve_config(&cli)?;
    tracing::debug!("Using endpoint {}", config.catalog.endpoint);

    match cli.command {
        Command::List { search, page, json } => {
            table_cli::execute_list(&config, search, page, json).await
        }
        Command::Browse => table_cli::execute_browse(&config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "armory",
            "list",
            "--search",
            "Löwe",
            "--page",
            "3",
            "--page-sizes",
            "1,2",
            "--page-size",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.page_sizes, Some(vec![1, 2]));
        assert_eq!(cli.page_size, Some(2));
        match cli.command {
            Command::List { search, page, json } => {
                assert_eq!(search.as_deref(), Some("Löwe"));
                assert_eq!(page, 3);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "table:\n  page_size_options: [10, 20]\n").unwrap();

        let cli = Cli::try_parse_from([
            "armory",
            "browse",
            "--config",
            path.to_str().unwrap(),
            "--endpoint",
            "http://localhost:9/",
            "--page-size",
            "20",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.catalog.endpoint, "http://localhost:9/");
        assert_eq!(config.table.page_size_options, vec![10, 20]);
        assert_eq!(config.table.initial_page_size, Some(20));
    }

    #[test]
    fn test_trace_modules_parse() {
        let cli = Cli::try_parse_from(["armory", "--trace", "fetch,view", "browse"]).unwrap();
        assert_eq!(cli.trace.len(), 2);
    }
}
