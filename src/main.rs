use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use halpub::classify::{classify, group_by_category, GroupedRecords};
use halpub::client::HalClient;
use halpub::config::{find_config_file, load_config, Config};
use halpub::models::{Category, Record};
use halpub::query::SearchQuery;
use halpub::render::{render_html, render_text, summary_table};
use is_terminal::IsTerminal;
use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// halpub - fetch, classify and render publication lists from the HAL open archive
#[derive(Parser, Debug)]
#[command(name = "halpub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch, classify and render publication lists from the HAL open archive", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (text if TTY, JSON otherwise)
    Auto,
    /// Plain or colored terminal text
    Text,
    /// JSON format (machine-readable)
    Json,
    /// HTML fragment (the publication-page list markup)
    Html,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a publication list, classified and grouped by category
    #[command(alias = "f")]
    Fetch {
        /// Author idHAL (falls back to `default_author` from the config)
        author: Option<String>,

        /// Restrict to one category code (e.g. ACL, INV, TH)
        #[arg(long, short)]
        category: Option<String>,

        /// Extra field filter, `field=value` (repeatable, e.g. producedDateY_i=2019)
        #[arg(long, short)]
        filter: Vec<String>,

        /// Print a per-category count summary after the list
        #[arg(long)]
        summary: bool,
    },

    /// List the category codes, labels and their server-side filters
    #[command(alias = "cat")]
    Categories,

    /// Classify records from a JSON file (or stdin) - schema-drift debugging aid
    Classify {
        /// JSON file holding an array of HAL records; stdin when omitted
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("halpub={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Fetch {
            author,
            category,
            filter,
            summary,
        } => {
            let author = author
                .or_else(|| config.default_author.clone())
                .context("no author given and no default_author configured")?;

            let mut query = SearchQuery::new().author(&author).rows(config.rows);
            if let Some(code) = &category {
                query = query.category(Category::from_code(code)?);
            }
            for entry in &filter {
                let (field, value) = entry
                    .split_once('=')
                    .with_context(|| format!("filter '{}' is not field=value", entry))?;
                query = query.filter(field, value);
            }

            let client = HalClient::from_config(&config)?;
            let records = client.fetch_by_category(&query).await?;
            tracing::info!(count = records.len(), author = %author, "fetched records");

            let grouped = group_by_category(records)?;
            print_grouped(&grouped, &config.excluded_ids, cli.output, summary)?;
        }

        Commands::Categories => match resolve_format(cli.output) {
            OutputFormat::Json => {
                let listing: Vec<serde_json::Value> = Category::ALL
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "code": c.code(),
                            "label": c.label(),
                            "filters": c.filter_clauses(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
            _ => {
                let mut table = comfy_table::Table::new();
                table
                    .load_preset(comfy_table::presets::UTF8_FULL)
                    .set_header(vec!["Code", "Category", "Filters"]);
                for category in Category::ALL {
                    table.add_row(vec![
                        category.code().to_string(),
                        category.label().to_string(),
                        category.filter_clauses().join("\n"),
                    ]);
                }
                println!("{table}");
            }
        },

        Commands::Classify { input } => {
            let raw = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let records: Vec<Record> =
                serde_json::from_str(&raw).context("input is not a JSON array of HAL records")?;

            let mut failures = 0usize;
            for record in &records {
                match classify(record) {
                    Ok(category) => println!("{}\t{}", record.hal_id, category.code()),
                    Err(err) => {
                        failures += 1;
                        eprintln!("{}\tERROR: {}", record.hal_id, err);
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{} record(s) could not be classified", failures);
            }
        }
    }

    Ok(())
}

/// Collapse `Auto` into a concrete format based on TTY detection
fn resolve_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if std::io::stdout().is_terminal() {
                OutputFormat::Text
            } else {
                OutputFormat::Json
            }
        }
        other => other,
    }
}

fn print_grouped(
    grouped: &GroupedRecords,
    excluded: &HashSet<String>,
    format: OutputFormat,
    summary: bool,
) -> Result<()> {
    match resolve_format(format) {
        OutputFormat::Json => {
            let mut map = serde_json::Map::new();
            for (category, records) in grouped.iter() {
                let kept: Vec<&Record> = records
                    .iter()
                    .filter(|r| !excluded.contains(&r.hal_id))
                    .collect();
                if !kept.is_empty() {
                    map.insert(category.code().to_string(), serde_json::to_value(kept)?);
                }
            }
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Html => print!("{}", render_html(grouped, excluded)),
        _ => {
            let color = std::io::stdout().is_terminal();
            print!("{}", render_text(grouped, excluded, color));
            if summary {
                println!("\n{}", summary_table(grouped, excluded));
            }
        }
    }
    Ok(())
}
