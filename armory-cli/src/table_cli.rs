//! Vehicle table commands
//!
//! Renders [`TableView`] frames as text tables and drives the interactive
//! browse loop.

use anyhow::{Context, Result};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use armory_core::catalog::CatalogFetcher;
use armory_core::config::ArmoryConfig;
use armory_core::view::{PageSizeOptions, TableView, VehicleTable, ViewStatus};

/// Table row for one vehicle
#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "Tier")]
    tier: u8,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Short")]
    short_name: String,
    #[tabled(rename = "Nation")]
    nation: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Icon")]
    icon: String,
}

/// One interactive browse command
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    First,
    Last,
    Search(String),
    PageSize(usize),
    Retry,
    Help,
    Quit,
}

impl BrowseCommand {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(query) = line.strip_prefix('/') {
            return Some(BrowseCommand::Search(query.to_string()));
        }

        let mut parts = line.split_whitespace();
        let command = match parts.next()? {
            "n" | "next" => BrowseCommand::Next,
            "p" | "prev" => BrowseCommand::Prev,
            "f" | "first" => BrowseCommand::First,
            "l" | "last" => BrowseCommand::Last,
            "r" | "retry" => BrowseCommand::Retry,
            "h" | "help" | "?" => BrowseCommand::Help,
            "q" | "quit" => BrowseCommand::Quit,
            "s" | "size" => BrowseCommand::PageSize(parts.next()?.parse().ok()?),
            _ => return None,
        };
        Some(command)
    }
}

const BROWSE_HELP: &str = "\
Commands:
  n / p        next / previous page
  f / l        first / last page
  /text        search by name (a bare / clears the search)
  s N          set page size
  r            retry loading
  q            quit";

pub async fn execute_list(
    config: &ArmoryConfig,
    search: Option<String>,
    page: usize,
    json_output: bool,
) -> Result<()> {
    let fetcher =
        CatalogFetcher::from_config(&config.catalog).context("Failed to create catalog client")?;
    let mut table = VehicleTable::from_config(&config.table);

    if !json_output {
        eprintln!("Fetching vehicle catalog...");
    }
    table.load(&fetcher).await;

    if let Some(query) = search {
        table.set_query(query);
    }
    table.go_to_page(page);

    let view = table.view();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_view(&view));
    }

    if let Some(error) = view.error {
        anyhow::bail!(error);
    }

    Ok(())
}

pub async fn execute_browse(config: &ArmoryConfig) -> Result<()> {
    let fetcher =
        CatalogFetcher::from_config(&config.catalog).context("Failed to create catalog client")?;
    let mut table = VehicleTable::from_config(&config.table);

    println!("Fetching vehicle catalog...");
    table.load(&fetcher).await;
    println!("{}", render_view(&table.view()));
    println!("{BROWSE_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(command) = BrowseCommand::parse(&line) else {
            if !line.trim().is_empty() {
                println!("Unknown command '{}'. Type h for help.", line.trim());
            }
            continue;
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                println!("{BROWSE_HELP}");
                continue;
            }
            BrowseCommand::Retry => {
                println!("Reloading vehicle catalog...");
                table.load(&fetcher).await;
            }
            other => apply_command(&mut table, other),
        }

        println!("{}", render_view(&table.view()));
    }

    table.cancel_in_flight();
    Ok(())
}

/// Apply a state-only command to the table
fn apply_command(table: &mut VehicleTable, command: BrowseCommand) {
    match command {
        BrowseCommand::Next => table.next_page(),
        BrowseCommand::Prev => table.prev_page(),
        BrowseCommand::First => table.first_page(),
        BrowseCommand::Last => table.last_page(),
        BrowseCommand::Search(query) => table.set_query(query),
        BrowseCommand::PageSize(size) => {
            if !table.set_page_size(size) {
                println!(
                    "Page size {size} is not offered. Options: {}",
                    options_display(table.state().options())
                );
            }
        }
        BrowseCommand::Retry | BrowseCommand::Help | BrowseCommand::Quit => {}
    }
}

fn options_display(options: &PageSizeOptions) -> String {
    options
        .as_slice()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a full frame: header, stats, then the block for the current status
fn render_view(view: &TableView) -> String {
    let mut out = String::new();
    out.push_str("Vehicle Encyclopedia\n");
    out.push_str(&format!(
        "Total: {}  Found: {}",
        view.total_count, view.filtered_count
    ));
    if !view.query.is_empty() {
        out.push_str(&format!("  Search: \"{}\"", view.query));
    }
    out.push('\n');

    match view.status() {
        ViewStatus::Error => {
            out.push_str(&format!(
                "\nError: {}\nRetry loading to try again.",
                view.error.as_deref().unwrap_or_default()
            ));
        }
        ViewStatus::Loading => out.push_str("\nLoading…"),
        ViewStatus::Empty => out.push_str("\nNo vehicles match this name."),
        ViewStatus::Rows => {
            out.push('\n');
            out.push_str(&render_rows(view));
            out.push('\n');
            out.push_str(&render_pagination(view));
            if let Some(loaded_at) = view.loaded_at {
                out.push_str(&format!(
                    "\nUpdated {}",
                    loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
                ));
            }
        }
    }

    out
}

fn render_rows(view: &TableView) -> String {
    let rows: Vec<VehicleRow> = view
        .rows
        .iter()
        .map(|vehicle| VehicleRow {
            tier: vehicle.tier,
            name: vehicle.name.clone(),
            short_name: vehicle.short_name.clone(),
            nation: vehicle.origin.clone(),
            category: vehicle.category.clone(),
            status: if vehicle.is_special() {
                "Premium"
            } else {
                "Regular"
            },
            icon: vehicle.secure_icon_url(),
        })
        .collect();

    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

fn render_pagination(view: &TableView) -> String {
    let first = if view.has_prev { "[f]irst" } else { " first " };
    let prev = if view.has_prev { "[p]rev" } else { " prev " };
    let next = if view.has_next { "[n]ext" } else { " next " };
    let last = if view.has_next { "[l]ast" } else { " last " };

    format!(
        "{first} {prev}  Page {} of {}  {next} {last}   ({} per page; options: {})",
        view.page,
        view.total_pages,
        view.page_size,
        options_display(&view.page_size_options)
    )
}
