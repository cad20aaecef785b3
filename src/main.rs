// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up tracing (diagnostics go to stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = README found, 1 = no README, 2 = error)
//
// The heavy lifting lives in the library (src/lib.rs); this file only turns
// flags into a PipelineConfig and prints what comes back.
// =============================================================================

mod cli;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use repo_scout::{
    locate_readme, parse, DocumentStats, FetchOptions, Pipeline, PipelineConfig, Readme,
    RepositorySnapshot,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_scout=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = README found
//   Ok(1) = no README
//   Err   = anything that stopped the run
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            repo_url,
            workspace,
            timeout,
            git,
            json,
        } => {
            let config = PipelineConfig {
                fetch: FetchOptions::default()
                    .with_timeout(Duration::from_secs(timeout))
                    .with_git_program(git),
                ..PipelineConfig::default()
            };
            handle_scan(&repo_url, workspace.as_deref(), config, json).await
        }
        Commands::Locate { dir, json } => handle_locate(&dir, json),
        Commands::Parse { file, json, tree } => handle_parse(&file, json, tree),
    }
}

// What we print for a README, in text or JSON form
#[derive(Debug, Serialize)]
struct ReadmeReport {
    file_name: String,
    bytes: usize,
    stats: DocumentStats,
}

impl ReadmeReport {
    fn new(readme: &Readme) -> Self {
        Self {
            file_name: readme.file_name.clone(),
            bytes: readme.text.len(),
            stats: DocumentStats::from_document(&parse(&readme.text)),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScanReport {
    url: String,
    readme: Option<ReadmeReport>,
}

impl ScanReport {
    fn from_snapshot(snapshot: &RepositorySnapshot<'_>) -> Self {
        let readme = match (&snapshot.readme, snapshot.stats()) {
            (Some(readme), Some(stats)) => Some(ReadmeReport {
                file_name: readme.file_name.clone(),
                bytes: readme.text.len(),
                stats,
            }),
            _ => None,
        };
        Self {
            url: snapshot.url.to_string(),
            readme,
        }
    }
}

// Handles the 'scan' subcommand
async fn handle_scan(
    repo_url: &str,
    workspace: Option<&Path>,
    config: PipelineConfig,
    json: bool,
) -> Result<i32> {
    if !json {
        println!("🔍 Scanning repository: {}", repo_url);
    }

    let pipeline = Pipeline::new(config);
    let report = match workspace {
        Some(path) => pipeline.run(repo_url, path, ScanReport::from_snapshot).await,
        None => pipeline.run_in_temp(repo_url, ScanReport::from_snapshot).await,
    }
    .with_context(|| format!("scan of {} failed", repo_url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_readme(report.readme.as_ref());
    }

    Ok(exit_code(report.readme.is_some()))
}

// Handles the 'locate' subcommand
fn handle_locate(dir: &Path, json: bool) -> Result<i32> {
    let report = locate_readme(dir).map(|readme| ReadmeReport::new(&readme));

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📁 Searching {}", dir.display());
        print_readme(report.as_ref());
    }

    Ok(exit_code(report.is_some()))
}

// Handles the 'parse' subcommand
fn handle_parse(file: &Path, json: bool, tree: bool) -> Result<i32> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let document = parse(&text);

    if tree {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&DocumentStats::from_document(&document))?
        );
    } else {
        println!("📄 {}", file.display());
        print_stats(&DocumentStats::from_document(&document));
        for (depth, title) in document.headings() {
            println!("   {}{}", "  ".repeat(depth.saturating_sub(1) as usize), title);
        }
    }

    Ok(0)
}

fn exit_code(found: bool) -> i32 {
    if found {
        0
    } else {
        1
    }
}

fn print_readme(report: Option<&ReadmeReport>) {
    match report {
        Some(readme) => {
            println!("✅ Found {} ({} bytes)", readme.file_name, readme.bytes);
            print_stats(&readme.stats);
        }
        None => println!("⚠️  No README file found in the repository"),
    }
}

fn print_stats(stats: &DocumentStats) {
    println!("📊 Summary:");
    println!("   Top-level nodes: {}", stats.top_level_nodes);
    println!("   Sections:        {}", stats.sections);
    println!("   Headings:        {}", stats.headings);
    println!("   Paragraphs:      {}", stats.paragraphs);
    println!("   Code blocks:     {}", stats.code_blocks);
    println!(
        "   Lists:           {} ({} items, {}/{} tasks done)",
        stats.lists, stats.list_items, stats.completed_tasks, stats.task_items
    );
    println!("   Tables:          {}", stats.tables);
    println!("   Links:           {}", stats.links);
    println!("   Images:          {}", stats.images);
    println!("   Words:           {}", stats.words);
}
