use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use needle_graph::{compile, ComponentRegistry, UnparentedPolicy};
use needle_scanner::PatternScanner;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::discovery::SourceFinder;

mod config;
mod discovery;
mod report;
mod scan;

#[derive(Parser)]
#[command(name = "needle")]
#[command(about = "Link and order dependency-injection components", long_about = None)]
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

    /// TOML config with optional [scanner] and [linker] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print components in generation order (parents first)
    Order(OrderArgs),

    /// Validate the component hierarchy
    Check(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Source files or directories to scan
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Fail on components nothing instantiates
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct OrderArgs {
    #[command(flatten)]
    sources: SourceArgs,

    /// Output JSON (implies --quiet)
    #[arg(long)]
    json: bool,
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    if let Commands::Order(args) = &cli.command {
        if args.json {
            cli.quiet = true;
        }
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Order(args) => run_order(args, config),
        Commands::Check(args) => run_check(args, config),
    }
}

fn load_registry(args: &SourceArgs, config: &AppConfig) -> Result<ComponentRegistry> {
    let scanner = PatternScanner::new(config.scanner.clone())?;
    let files = SourceFinder::new(&config.scanner).find(&args.paths);
    if files.is_empty() {
        log::warn!("No source files found");
    }

    // Registration is the single-threaded barrier after the parallel scan
    let declarations = scan::scan_files(&scanner, &files)?;
    ComponentRegistry::from_declarations(declarations).context("Failed to register components")
}

fn effective_config(args: &SourceArgs, mut config: AppConfig) -> AppConfig {
    if args.strict {
        config.linker.unparented = UnparentedPolicy::Deny;
    }
    config
}

fn run_order(args: OrderArgs, config: AppConfig) -> Result<()> {
    let config = effective_config(&args.sources, config);
    let registry = load_registry(&args.sources, &config)?;
    let compilation =
        compile(&registry, &config.linker).context("Failed to build component graph")?;
    let entries = compilation.report();

    if args.json {
        let mut body = serde_json::to_string_pretty(&entries)?;
        body.push('\n');
        print_stdout(&body)
    } else {
        print_stdout(&report::render_order(&entries))
    }
}

fn run_check(args: SourceArgs, config: AppConfig) -> Result<()> {
    let config = effective_config(&args, config);
    let registry = load_registry(&args, &config)?;
    let compilation =
        compile(&registry, &config.linker).context("Failed to build component graph")?;

    let mut summary = report::render_summary(&compilation.report());
    summary.push('\n');
    print_stdout(&summary)
}
