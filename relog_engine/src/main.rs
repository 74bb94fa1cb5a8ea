#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** relog **
//! Rewrites an addon combat log for upload to a legacy log-analysis site.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use relog_engine::log_files::DEFAULT_LOG_FILE;
use relog_engine::{PlayerName, RELOG_VERSION, RunOptions, process_file};

#[derive(Parser)]
#[command(author, version, about = "Normalize a combat log for legacy log-analysis uploads.")]
struct Cli {
    /// Combat log to rewrite.
    #[arg(value_name = "LOG", default_value = DEFAULT_LOG_FILE)]
    log: PathBuf,
    /// Name that replaces "You" / "Your" in the log.
    #[arg(long, short)]
    player: String,
    /// Write the result here instead of rewriting the log in place.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Rule set TOML to use instead of the built-in rules.
    #[arg(long, value_name = "TOML")]
    rules: Option<PathBuf>,
    /// Skip creating a zip archive of the result.
    #[arg(long)]
    no_zip: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("relog {RELOG_VERSION} starting");

    let player = PlayerName::parse(&cli.player)?;
    if !cli.log.is_file() {
        anyhow::bail!("log file '{}' not found or not a regular file", cli.log.display());
    }

    let options = RunOptions {
        log_path: cli.log,
        player,
        out_path: cli.out,
        rules_path: cli.rules,
        archive: !cli.no_zip,
    };
    let summary = process_file(&options).with_context(|| format!("while processing '{}'", options.log_path.display()))?;

    if let Some(backup) = &summary.backup {
        println!("{} {}", "Backup created:".bright_blue(), backup.display());
    }
    if let Some(archive) = &summary.archive {
        println!("{} {}", "Zip file created:".bright_blue(), archive.display());
    }
    for diagnostic in &summary.report.diagnostics {
        println!("{} {diagnostic}", "warning:".yellow());
    }
    println!(
        "{} {} lines written to {} ({} dropped). Messages with You/Your now name {}.",
        "Done.".bright_green().bold(),
        summary.report.lines.len(),
        summary.output.display(),
        summary.report.dropped,
        options.player.to_string().bold()
    );
    Ok(())
}
