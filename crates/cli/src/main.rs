use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stutter_batch::{Checkpoint, Mode, ScanConfig, Scanner, Summary};
use stutter_core::CollapseConfig;

#[derive(Parser)]
#[command(name = "stutter-sweep")]
#[command(about = "Detect and collapse repeated-phrase stutters in draft translations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Collapse stutters, writing an _edit sibling next to each changed file
    Collapse(ScanArgs),

    /// Locate stutters and write a stats log; never rewrites anything
    Report(ScanArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Root directory to search
    #[arg(long)]
    directory: PathBuf,

    /// Minimum consecutive occurrences of a phrase to count as a stutter
    #[arg(long, default_value_t = 3)]
    min_dups: usize,

    /// Process only files inside directories with this name
    #[arg(long, default_value = "Infer")]
    target_dir_name: String,

    /// File extension to process, with leading dot (case-insensitive)
    #[arg(long, default_value = ".sfm")]
    extension: String,

    /// Skip detection on lines with more tokens than this
    #[arg(long, default_value_t = 512)]
    max_line_tokens: usize,

    /// Audit log destination (defaults to a file inside the root)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Ignore any existing checkpoint and rediscover the tree
    #[arg(long)]
    fresh: bool,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Collapse(args) | Commands::Report(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let quiet = cli.quiet;
    match cli.command {
        Commands::Collapse(args) => run_scan(args, Mode::Collapse, quiet),
        Commands::Report(args) => run_scan(args, Mode::Report, quiet),
    }
}

fn run_scan(args: ScanArgs, mode: Mode, quiet: bool) -> Result<()> {
    let collapse = CollapseConfig {
        min_dups: args.min_dups,
        max_line_tokens: args.max_line_tokens,
    };
    collapse.validate().context("Invalid detection settings")?;

    let mut config = ScanConfig::new(&args.directory, mode);
    config.target_dir_name = args.target_dir_name;
    config.extension = args.extension;
    config.collapse = collapse;
    config.fresh = args.fresh;
    config.progress = !quiet;
    if let Some(log) = args.log {
        config.log_path = log;
    }

    let checkpoint = Checkpoint::for_root(&args.directory);
    let summary = Scanner::new(config.clone(), checkpoint)
        .run()
        .with_context(|| format!("Scan of {} failed", args.directory.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &config);
    }

    Ok(())
}

fn print_summary(summary: &Summary, config: &ScanConfig) {
    println!(
        "Found {} directories named {:?}.",
        summary.dirs_found, config.target_dir_name
    );
    println!("Found {} {} files.", summary.files_found, config.extension);
    if summary.files_skipped > 0 {
        println!(
            "Processed {} files ({} skipped).",
            summary.files_processed, summary.files_skipped
        );
    } else {
        println!("Processed {} files.", summary.files_processed);
    }
    println!(
        "Found {} files with stutters, {} flagged lines.",
        summary.files_changed, summary.lines_flagged
    );
    println!("Saved log to {}.", config.log_path.display());
}
