use anyhow::Context;
use clap::Parser;
use colored::*;
use snipmd_lib::config::load_config;
use snipmd_lib::exit_codes::{self, exit};
use snipmd_lib::formatter::CommandFormatter;
use snipmd_lib::resolver::normalize_path;
use snipmd_lib::transform::SnippetTransform;
use std::path::PathBuf;
use std::sync::Arc;

mod file_processor;

use file_processor::{OutputMode, ProcessError};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markdown/MDX files or directories to transform
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Configuration file path (default: nearest .snipmd.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rewrite files in place instead of printing to stdout
    #[arg(short, long, conflicts_with = "out_dir")]
    write: bool,

    /// Write transformed files under this directory, mirroring the project layout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let loaded = load_config(cli.config.as_deref(), &cwd)?;
    if let Some(path) = &loaded.path {
        log::info!("Using config file {}", path.display());
    }

    let formatter = CommandFormatter::new(loaded.config.formatter.command.clone());
    let transform = SnippetTransform::new(loaded.transform_options()).with_formatter(Arc::new(formatter));

    let mode = match (&cli.out_dir, cli.write) {
        (Some(dir), _) => OutputMode::Directory(normalize_path(&cwd.join(dir))),
        (None, true) => OutputMode::InPlace,
        (None, false) => OutputMode::Stdout,
    };

    let paths: Vec<PathBuf> = cli.paths.iter().map(|p| normalize_path(&cwd.join(p))).collect();
    let files = file_processor::find_markdown_files(&paths, &loaded.config.exclude, &loaded.root)
        .context("Failed to find markdown files")?;
    if files.is_empty() {
        log::warn!("No Markdown or MDX files found");
    }

    let mut exit_code = exit_codes::SUCCESS;
    let mut changed_files = 0;
    let mut substituted = 0;
    for file in &files {
        match file_processor::process_file(&transform, file, &mode, &loaded.root).await {
            Ok(outcome) => {
                substituted += outcome.summary.substituted;
                if outcome.changed {
                    log::debug!("Changed {}", outcome.path.display());
                    changed_files += 1;
                }
            }
            Err(e) => {
                eprintln!("{}: {e}", "Error".red().bold());
                let code = match e {
                    ProcessError::Transform { .. } => exit_codes::TRANSFORM_FAILED,
                    ProcessError::Read { .. } | ProcessError::Write { .. } => exit_codes::TOOL_ERROR,
                };
                exit_code = exit_code.max(code);
            }
        }
    }

    if !cli.quiet && mode != OutputMode::Stdout {
        eprintln!(
            "{} {substituted} snippet(s) across {} file(s), {changed_files} file(s) changed",
            "Substituted".green().bold(),
            files.len()
        );
    }

    Ok(exit_code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            exit_codes::TOOL_ERROR
        }
    };

    match code {
        exit_codes::SUCCESS => exit::success(),
        exit_codes::TRANSFORM_FAILED => exit::transform_failed(),
        _ => exit::tool_error(),
    }
}
