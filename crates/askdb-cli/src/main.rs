//! # askdb
//!
//! Interactive natural-language SQL REPL. Wires settings, the gated
//! database engine, the SQL generator, and the query journal together.

#![deny(unsafe_code)]

mod pager;
mod render;

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use askdb_core::ids::SessionId;
use askdb_core::policy::SensitivePolicy;
use askdb_core::result::{QueryOutcome, StatementResult};
use askdb_db::DbEngine;
use askdb_journal::QueryJournal;
use askdb_llm::{DashScopeConfig, DashScopeGenerator};
use askdb_service::{QueryRequest, QueryResponse, QueryService};
use askdb_settings::AskdbSettings;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pager::QueryPager;

/// askdb REPL.
#[derive(Parser, Debug)]
#[command(name = "askdb", about = "Natural-language SQL queries behind a read-only gate")]
struct Cli {
    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Path to the settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Rows per page for interactive display (overrides settings).
    #[arg(long)]
    page_size: Option<usize>,

    /// User tag recorded in the journal.
    #[arg(long, default_value = "cli_user")]
    user: String,

    /// Run a single query and exit instead of starting the REPL.
    query: Option<String>,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Build the query service from resolved settings.
fn build_service(settings: &AskdbSettings) -> Result<QueryService> {
    let api_key = settings
        .provider
        .api_key
        .clone()
        .context("no API key configured (set ASKDB_API_KEY or DASHSCOPE_API_KEY)")?;

    ensure_parent_dir(Path::new(&settings.database.path))?;
    let engine = DbEngine::open(&settings.database.path)?
        .with_policy(SensitivePolicy::new(settings.policy.sensitive_fields.clone()));

    let generator = Arc::new(DashScopeGenerator::new(DashScopeConfig {
        base_url: settings.provider.base_url.clone(),
        model: settings.provider.model.clone(),
        api_key,
    }));

    let journal = QueryJournal::open(&settings.journal.dir)?;
    Ok(QueryService::new(engine, generator, journal))
}

/// Parse the table list of a `schema t1,t2` command.
fn parse_schema_tables(input: &str) -> Option<Vec<String>> {
    let rest = input.split_whitespace().nth(1)?;
    let tables: Vec<String> = rest
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    (!tables.is_empty()).then_some(tables)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match &args.settings {
        Some(path) => askdb_settings::load_settings_from_path(path)?,
        None => askdb_settings::load_settings()?,
    };
    if let Some(db) = &args.db {
        settings.database.path = db.to_string_lossy().into_owned();
    }
    if let Some(n) = args.page_size {
        settings.pager.page_size = n;
    }

    let service = build_service(&settings)?;
    let page_size = settings.pager.page_size;

    if let Some(query) = args.query {
        let response = service
            .query(QueryRequest::new(query, args.user).with_session(SessionId::new()))
            .await?;
        print_outcome(&response, page_size, false);
        return Ok(());
    }

    run_repl(&service, &args.user, page_size).await
}

async fn run_repl(service: &QueryService, user: &str, page_size: usize) -> Result<()> {
    let session = SessionId::new();
    println!("askdb - natural-language SQL queries");
    println!("commands: schema [t1,t2] | logs | recent | errors | exit");
    println!("long rowsets page interactively (next, prev, first, last, page N, auto, exit)");

    let stdin = std::io::stdin();
    loop {
        print!("\naskdb> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let lower = input.to_lowercase();

        if lower == "exit" || lower == "quit" {
            break;
        } else if lower == "logs" {
            println!("{}", render::stats_view(&service.stats()));
        } else if lower == "recent" {
            println!("{}", render::recent_view(&service.recent(10)));
        } else if lower == "errors" {
            println!("{}", render::errors_view(&service.errors(10)));
        } else if lower.starts_with("schema") {
            let tables = parse_schema_tables(input);
            match service.schema_text(tables.as_deref()) {
                Ok(text) => println!("\n{text}"),
                Err(e) => println!("failed to read schema: {e}"),
            }
        } else {
            println!("processing query...");
            let request = QueryRequest::new(input, user).with_session(session.clone());
            match service.query(request).await {
                Ok(response) => print_outcome(&response, page_size, true),
                Err(e) => println!("query failed: {e}"),
            }
        }
    }
    Ok(())
}

/// Print a processed response; rowsets larger than one page go through the
/// pager (interactively in the REPL, all pages at once in one-shot mode).
fn print_outcome(response: &QueryResponse, page_size: usize, interactive: bool) {
    println!("{}", render::response_header(response));
    match &response.result {
        QueryOutcome::Statement(result) => print_statement(result, page_size, interactive),
        QueryOutcome::Batch(batch) => {
            println!("{}", render::batch_header(batch));
            for item in &batch.results {
                println!("\nstatement {}: {}", item.statement_index, item.sql);
                print_statement(&item.result, page_size, interactive);
            }
        }
    }
}

fn print_statement(result: &StatementResult, page_size: usize, interactive: bool) {
    println!("{}", render::statement_summary(result));
    if let StatementResult::Rowset { columns, rows, .. } = result {
        if rows.is_empty() {
            return;
        }
        let mut pager = QueryPager::new(rows.clone(), columns.clone(), page_size);
        println!("{}", pager.format_page());
        if pager.total_pages() > 1 {
            if interactive {
                page_loop(&mut pager);
            } else {
                while pager.next_page() {
                    println!("{}", pager.format_page());
                }
            }
        }
    }
}

fn page_loop(pager: &mut QueryPager) {
    let stdin = std::io::stdin();
    loop {
        print!("pager> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let (text, keep_going) = pager::apply_command(pager, pager::parse_command(&line));
        println!("{text}");
        if !keep_going {
            break;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
