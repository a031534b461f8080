#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for archiving aged IMAP mail into yearly folders

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use mailbox_archiver::{
    Archiver, ArchiverConfig, DryRun, Folder, ImapStore, MailStore, PlaceholderStore, RunSummary,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailbox-archiver")]
#[command(about = "Archive aged IMAP mail into yearly folders and prune old years")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Decide and log every step without changing the mailbox
    #[arg(long, global = true)]
    dry_run: bool,

    /// With --dry-run, read the real mailbox instead of placeholder data
    #[arg(long, global = true, requires = "dry_run")]
    connect: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Apply the retention rules and prune old buckets (default)
    Run,

    /// List IMAP folders and the delimiter that would be used
    Folders,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = ArchiverConfig::from_env()?;
    let archiver = Archiver::new(&config.policy);
    let now = Local::now().naive_local();

    let command = args.command.as_ref().unwrap_or(&Command::Run);
    match (command, args.dry_run, args.connect) {
        (Command::Run, true, false) => {
            info!("dry run: using placeholder data, no connection");
            let mut store = DryRun::new(PlaceholderStore::new(now));
            cmd_run(&archiver, &mut store, now, &args).await
        }
        (Command::Run, true, true) => {
            let live = ImapStore::connect(&config.imap, &config.connect_retry).await?;
            let mut store = DryRun::new(live);
            cmd_run(&archiver, &mut store, now, &args).await
        }
        (Command::Run, false, _) => {
            let mut store = ImapStore::connect(&config.imap, &config.connect_retry).await?;
            cmd_run(&archiver, &mut store, now, &args).await
        }
        (Command::Folders, true, false) => {
            let mut store = PlaceholderStore::new(now);
            cmd_folders(&archiver, &mut store, &args).await
        }
        (Command::Folders, _, _) => {
            let mut store = ImapStore::connect(&config.imap, &config.connect_retry).await?;
            cmd_folders(&archiver, &mut store, &args).await
        }
    }
}

async fn cmd_run<S: MailStore>(
    archiver: &Archiver<'_>,
    store: &mut S,
    now: NaiveDateTime,
    args: &Args,
) -> anyhow::Result<()> {
    let summary = archiver.run(store, now).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

async fn cmd_folders<S: MailStore>(
    archiver: &Archiver<'_>,
    store: &mut S,
    args: &Args,
) -> anyhow::Result<()> {
    let (folders, delimiter) = archiver.folders(store).await;

    if args.json {
        let output = serde_json::json!({
            "delimiter": delimiter,
            "folders": folders,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_folders(&folders, &delimiter);
    }

    Ok(())
}

fn print_folders(folders: &[Folder], delimiter: &str) {
    if folders.is_empty() {
        println!("No folders found.");
    }
    for folder in folders {
        println!("{folder}");
    }
    println!("\nDelimiter: '{delimiter}'");
}

fn print_summary(summary: &RunSummary) {
    let mode = if summary.dry_run { " (dry run)" } else { "" };
    println!("Delimiter: '{}'{mode}", summary.delimiter);

    for folder in &summary.created_folders {
        println!("Created:  {folder}");
    }

    println!(
        "\n{:<20} {:<12} {:>8} {:>8} {:>8}",
        "Folder", "Before", "Found", "Moved", "Skipped"
    );
    println!("{}", "-".repeat(60));
    for rule in &summary.rules {
        if rule.aborted {
            println!("{:<20} {:<12} {:>8}", rule.source, rule.cutoff.to_string(), "aborted");
        } else {
            println!(
                "{:<20} {:<12} {:>8} {:>8} {:>8}",
                rule.source, rule.cutoff.to_string(), rule.searched, rule.moved, rule.skipped
            );
        }
        for diagnostic in &rule.diagnostics {
            println!("  ! {diagnostic}");
        }
        if rule.duplicated > 0 {
            println!(
                "  ! {} message(s) copied but still in {}",
                rule.duplicated, rule.source
            );
        }
    }

    match &summary.prune {
        Some(prune) => {
            println!("\nPrune before {}:", prune.threshold_year);
            for folder in &prune.deleted {
                println!("  deleted       {folder}");
            }
            for folder in &prune.needs_review {
                println!("  needs review  {folder}");
            }
            for diagnostic in &prune.diagnostics {
                println!("  ! {diagnostic}");
            }
            if prune.deleted.is_empty() && prune.needs_review.is_empty() {
                println!("  nothing to prune");
            }
        }
        None => println!("\nPruning disabled"),
    }

    for diagnostic in &summary.diagnostics {
        println!("! {diagnostic}");
    }

    println!("\n{} message(s) moved{mode}", summary.moved());
}
