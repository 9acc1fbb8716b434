/// Quest Linter: validates quest-folder JSON files.
///
/// Usage: quest_lint <path> [--schema quest|blocked-quests|quest-list] [-v]
use clap::Parser;
use log::debug;
use quest_kit::core::lint::{lint_directory, lint_file, FileReport, SchemaKind};
use quest_kit::QuestCollection;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "quest_lint")]
#[command(about = "Validate custom quest files against the quest data format")]
#[command(version)]
struct Cli {
    /// File or quest-folder root to check
    path: PathBuf,

    /// Schema for a single file (directories pick it per folder)
    #[arg(short, long, default_value = "quest")]
    schema: SchemaKind,

    /// Also load the folder as a collection and print its stats
    #[arg(long)]
    stats: bool,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let reports: Vec<FileReport> = if cli.path.is_file() {
        vec![lint_file(&cli.path, cli.schema)]
    } else if cli.path.is_dir() {
        match lint_directory(&cli.path) {
            Ok(reports) => reports,
            Err(e) => {
                eprintln!("ERROR: Failed to read {}: {}", cli.path.display(), e);
                process::exit(1);
            }
        }
    } else {
        eprintln!("ERROR: Path '{}' does not exist", cli.path.display());
        process::exit(1);
    };

    println!("\n=== Quest Lint Report ===\n");
    for report in &reports {
        if report.is_valid() {
            debug!("{} ok ({})", report.path.display(), report.schema);
            println!("OK:    {}", report.path.display());
        } else {
            println!("ERROR: {} ({})", report.path.display(), report.schema);
            for error in &report.errors {
                println!("    {}", error);
            }
        }
    }

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    println!(
        "\nSummary: {} files, {} valid, {} invalid",
        reports.len(),
        reports.len() - failed,
        failed
    );

    if cli.stats && cli.path.is_dir() {
        print_stats(&cli.path);
    }

    process::exit(if failed == 0 { 0 } else { 1 });
}

fn print_stats(root: &std::path::Path) {
    let mut collection = QuestCollection::at(root);
    match collection.import_from_files() {
        Ok(summary) => {
            let stats = collection.stats();
            println!("\n=== Collection ===\n");
            println!("Quests loaded:       {}", stats.total_quests);
            println!("Files skipped:       {}", summary.skipped.len());
            println!("Blocked quest names: {}", stats.blocked_quest_names);
            println!("Block all defaults:  {}", stats.block_all_default);
        }
        Err(e) => eprintln!("ERROR: Failed to import {}: {}", root.display(), e),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}
