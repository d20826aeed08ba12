use anyhow::{bail, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use loc_sync::config::Config;
use loc_sync::fs::{DryRunFileSystem, FileSystem, RealFileSystem};
use loc_sync::logging::{self, LogLevel};
use loc_sync::{SyncOptions, SyncReport, Synchronizer};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "loc-sync")]
#[command(author, version, about = "Synchronize loc(\"...\") strings into a language file", long_about = None)]
struct Cli {
    /// Source file to scan for loc("...") calls
    source: PathBuf,

    /// Language file to update
    language: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report changes without writing the language file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Like --dry-run, but fail when the language file is out of sync
    #[arg(long)]
    check: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("{}", Cli::command().render_usage());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli) {
        logging::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_ref())?;
    logging::set_level(LogLevel::from_flags(
        cli.quiet,
        cli.verbose,
        config.log_level(),
    ));

    let options = SyncOptions::from(&config);
    let report = if cli.dry_run || cli.check {
        let fs = DryRunFileSystem::new(RealFileSystem);
        sync_with(&fs, options, &cli.source, &cli.language)?
    } else {
        sync_with(&RealFileSystem, options, &cli.source, &cli.language)?
    };

    logging::info(&format!(
        "Summary: {} added, {} removed",
        report.added.len(),
        report.removed.len()
    ));
    if cli.dry_run || cli.check {
        logging::info("[Dry run] No files were modified.");
    }

    if cli.check && !report.is_clean() {
        bail!("Language file is out of sync: {}", cli.language.display());
    }

    Ok(())
}

fn sync_with<F: FileSystem>(
    fs: &F,
    options: SyncOptions,
    source: &Path,
    language: &Path,
) -> Result<SyncReport> {
    logging::debug(&format!(
        "syncing {} -> {} (function {:?}, literal limit {})",
        source.display(),
        language.display(),
        options.function,
        options.max_literal_len
    ));
    Ok(Synchronizer::new(fs, options).run(source, language)?)
}
