//! stylefix - design-system maintenance passes for an application source tree
//!
//! This is the CLI entry point over the stylefix-core library. Each
//! subcommand runs one batch rewrite over the source root and prints a
//! summary; `check` runs them all without writing and gates on the result.

use std::{
    path::PathBuf,
    process,
};

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use colored::Colorize;
use stylefix_core::{
    classnames::ClassMigration,
    run_pass,
    selectors::{
        ThemeSelectorRewrite,
        CANONICAL_PREFIX,
        LEGACY_PREFIX,
    },
    units::PxRewrite,
    FixConfig,
    Pass,
    Rewrite,
    RunReport,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod helpers;

use helpers::GlobalArgs;

/// Stylefix - bring application styles in line with the design system
#[derive(Parser)]
#[command(name = "stylefix")]
#[command(
    version,
    about = "Design-system maintenance passes for an application source tree",
    long_about = "
Design-system maintenance passes for an application source tree

Examples:
  stylefix units                    # px literals to rem / spacing tokens
  stylefix selectors                # drop legacy .dark selectors (keeps .backup copies)
  stylefix classes                  # utility className strings to CSS modules
  stylefix check                    # dry-run everything, exit 1 on violations

  stylefix --dry-run units          # report without writing
  stylefix --output json check      # machine-readable reports
  stylefix --root web/src --exclude legacy units
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Source root to scan (defaults to src/ of the nearest package.json)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Report what would change without writing any file
    #[arg(long, global = true)]
    dry_run: bool,

    /// Output format for summaries and reports
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormatArg,

    /// Override the file extensions the selected pass visits (comma-separated,
    /// ignored by check)
    #[arg(long, global = true, value_delimiter = ',')]
    ext: Option<Vec<String>>,

    /// Extra directory or file names to exclude (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    exclude: Option<Vec<String>>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormatArg {
    /// Human-readable format with colors (default)
    Human,
    /// JSON report for tooling
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Convert px literals to rem values and spacing tokens
    Units,

    /// Drop legacy `.dark` selector lines duplicated by `[data-theme="dark"]`
    ///
    /// The check subcommand always uses the default prefixes.
    Selectors {
        /// Legacy theme class prefix
        #[arg(long, default_value = LEGACY_PREFIX)]
        legacy_prefix: String,

        /// Canonical attribute selector prefix
        #[arg(long, default_value = CANONICAL_PREFIX)]
        canonical_prefix: String,
    },

    /// Migrate utility className strings to CSS-module references
    Classes,

    /// Run every pass in dry-run mode and fail when violations remain
    Check,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{} {:#}", "❌".bright_red(), e);
        process::exit(1);
    }

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "❌".bright_red(), e);
            process::exit(1);
        },
    }
}

/// Route tracing output to stderr so JSON on stdout stays clean
fn init_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { Level::INFO } else { Level::WARN };
    let level = cli
        .log_level
        .as_deref()
        .map(str::parse::<Level>)
        .transpose()
        .context("Invalid --log-level")?
        .unwrap_or(default_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default tracing subscriber")
}

fn run(cli: &Cli) -> Result<i32> {
    let args = GlobalArgs::from_cli(cli)?;
    tracing::info!(root = %args.root.display(), dry_run = args.dry_run, "starting");

    if args.verbose && !args.is_json_mode() {
        println!("{} stylefix v{}", "🎨".bright_blue(), stylefix_core::VERSION);
        args.output.info(&format!("Source root: {}", args.root.display()));
        println!();
    }
    if args.dry_run {
        args.output.warning("Dry run: no files will be written");
    }

    match &cli.command {
        Commands::Units => cmd_units(&args),
        Commands::Selectors {
            legacy_prefix,
            canonical_prefix,
        } => {
            let pass = ThemeSelectorRewrite::new(legacy_prefix.as_str(), canonical_prefix.as_str());
            cmd_rewrite(&args, Pass::Selectors, &pass)
        },
        Commands::Classes => {
            let pass = ClassMigration::builtin().context("Failed to compile className rules")?;
            cmd_rewrite(&args, Pass::Classes, &pass)
        },
        Commands::Check => cmd_check(&args),
    }
}

fn run_one(args: &GlobalArgs, pass: Pass, rewrite: &dyn Rewrite) -> Result<RunReport> {
    scan(rewrite, &args.config_for(pass))
}

fn scan(rewrite: &dyn Rewrite, config: &FixConfig) -> Result<RunReport> {
    run_pass(rewrite, config).with_context(|| format!("Failed to scan {}", config.root.display()))
}

/// px conversion, gated on zero remaining violations
fn cmd_units(args: &GlobalArgs) -> Result<i32> {
    let output = &args.output;
    output.header(&format!("Converting px literals under {}", args.root.display()));

    let report = run_one(args, Pass::Units, &PxRewrite)?;
    output.report(&report)?;

    if report.is_clean() {
        output.success("No px violations remain");
        return Ok(0);
    }
    if report.total_violations() > 0 {
        output.failure(&format!("{} px violations remain", report.total_violations()));
    }
    if report.has_failures() {
        output.failure(&format!("{} files could not be processed", report.failures.len()));
    }
    Ok(1)
}

/// Passes that only summarize and always complete with exit code 0
fn cmd_rewrite(args: &GlobalArgs, pass: Pass, rewrite: &dyn Rewrite) -> Result<i32> {
    let output = &args.output;
    output.header(&format!("Running {} pass under {}", pass, args.root.display()));

    let report = run_one(args, pass, rewrite)?;
    output.report(&report)?;

    let verb = if report.dry_run { "would be updated" } else { "updated" };
    output.success(&format!("{} files {}", report.files_changed, verb));
    Ok(0)
}

fn rewrite_for(pass: Pass) -> Result<Box<dyn Rewrite>> {
    Ok(match pass {
        Pass::Units => Box::new(PxRewrite),
        Pass::Selectors => Box::new(ThemeSelectorRewrite::default()),
        Pass::Classes => Box::new(ClassMigration::builtin().context("Failed to compile className rules")?),
    })
}

/// Dry-run every pass and gate on the total
fn cmd_check(args: &GlobalArgs) -> Result<i32> {
    let output = &args.output;
    output.header(&format!("Checking design-system compliance under {}", args.root.display()));

    let mut reports = Vec::new();
    for pass in Pass::ALL {
        let rewrite = rewrite_for(pass)?;
        let config = args.default_config_for(pass).with_dry_run(true);
        reports.push(scan(rewrite.as_ref(), &config)?);
    }
    output.reports(&reports)?;

    let total: usize = reports.iter().map(RunReport::total_violations).sum();
    if reports.iter().all(RunReport::is_clean) {
        output.success("100% design-system compliance");
        Ok(0)
    } else {
        output.failure(&format!("Total violations: {}", total));
        Ok(1)
    }
}
