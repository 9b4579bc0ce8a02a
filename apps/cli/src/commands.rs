//! CLI command definitions, routing, and tracing setup.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use oqsgen_core::{
    CatalogVariant, GenerateConfig, GenerateResult, ProgressReporter, check, generate,
    prepare_catalog, render_table,
};
use oqsgen_shared::{GeneratorError, datasheet_root, init_settings, load_settings};
use oqsgen_templater::PopulateOutcome;
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// oqsgen: regenerate provider sources from the algorithm catalog.
#[derive(Parser)]
#[command(
    name = "oqsgen",
    version,
    about = "Generate oqs-provider sources and documentation from the algorithm catalog.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Provider checkout to operate on.
    #[arg(long, env = "OQSGEN_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Regenerate all source and documentation targets.
    Generate,

    /// Load, resolve and validate the catalog without writing anything.
    Check,

    /// Print the resolved catalog as JSON (the template context).
    Dump {
        /// Use the documentation catalog (keeps disabled signatures).
        #[arg(long)]
        docs: bool,
    },

    /// Print a Markdown table of code points and OIDs.
    Table {
        /// Use the documentation catalog (keeps disabled signatures).
        #[arg(long)]
        docs: bool,
    },

    /// Settings management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write `oqsgen.toml` with the default targets.
    Init,
    /// Show resolved settings.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "oqsgen=info",
        1 => "oqsgen=debug",
        _ => "oqsgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
///
/// Generator failures are printed as diagnostics and turned into exit
/// code 1; anything else bubbles up as an eyre report.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let root = cli.root;
    match cli.command {
        Command::Generate => Ok(report(cmd_generate(&root))),
        Command::Check => Ok(report(cmd_check(&root))),
        Command::Dump { docs } => Ok(report(cmd_dump(&root, variant(docs)))),
        Command::Table { docs } => Ok(report(cmd_table(&root, variant(docs)))),
        Command::Config { action } => {
            match action {
                ConfigAction::Init => cmd_config_init(&root)?,
                ConfigAction::Show => cmd_config_show(&root)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn variant(docs: bool) -> CatalogVariant {
    if docs {
        CatalogVariant::Documentation
    } else {
        CatalogVariant::Production
    }
}

fn report(outcome: oqsgen_shared::Result<()>) -> ExitCode {
    report_to(&mut std::io::stdout().lock(), outcome)
}

/// Diagnostics go to `out` as a single line; the exit code is 1 for any
/// generator error.
fn report_to(out: &mut impl Write, outcome: oqsgen_shared::Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(out, "{err}");
            ExitCode::FAILURE
        }
    }
}

/// Settings plus the datasheet root; fails before any stage runs when the
/// datasheet environment variable is unset.
fn generate_config(root: &Path) -> oqsgen_shared::Result<GenerateConfig> {
    let settings = load_settings(root)?;
    let datasheet_root = datasheet_root(&settings)?;
    Ok(GenerateConfig {
        provider_root: root.to_path_buf(),
        settings,
        datasheet_root,
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(root: &Path) -> oqsgen_shared::Result<()> {
    let config = generate_config(root)?;
    info!(
        root = %root.display(),
        sources = config.settings.sources.len(),
        docs = config.settings.docs.len(),
        "generating"
    );

    let reporter = CliProgress::new();
    let result = generate(&config, &reporter)?;
    drop(reporter);

    print!(
        "{}",
        generate_summary(
            result.sources.len() + result.docs.len(),
            result.written(),
            result.elapsed
        )
    );
    Ok(())
}

fn generate_summary(targets: usize, changed: usize, elapsed: Duration) -> String {
    format!(
        "  Targets:    {targets} ({changed} changed)\n  Time:       {:.1}s\nAll files generated\n",
        elapsed.as_secs_f64()
    )
}

fn cmd_check(root: &Path) -> oqsgen_shared::Result<()> {
    let config = generate_config(root)?;
    let result = check(&config)?;

    println!("  KEM groups:      {}", result.kems);
    println!("  Hybrid groups:   {}", result.hybrids);
    println!("  Signatures:      {}", result.sigs);
    if result.unresolved_sigs > 0 {
        println!("  Unresolved sigs: {}", result.unresolved_sigs);
    }
    println!("  Claimed points:  {}", result.code_points.claimed);
    match result.code_points.next_free {
        Some(next) => println!("  Next free point: {next} ({next:#06X})"),
        None => println!("  Next free point: none"),
    }
    Ok(())
}

fn cmd_dump(root: &Path, variant: CatalogVariant) -> oqsgen_shared::Result<()> {
    let config = generate_config(root)?;
    let catalog = prepare_catalog(&config, variant)?;
    let json = serde_json::to_string_pretty(&catalog)
        .map_err(|e| GeneratorError::catalog(format!("cannot serialize catalog: {e}")))?;
    println!("{json}");
    Ok(())
}

fn cmd_table(root: &Path, variant: CatalogVariant) -> oqsgen_shared::Result<()> {
    let config = generate_config(root)?;
    let catalog = prepare_catalog(&config, variant)?;
    print!("{}", render_table(&catalog));
    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_settings(root)?;
    println!("Settings initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    let settings = load_settings(root)?;
    let toml_str = toml::to_string_pretty(&settings)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn target_done(&self, outcome: &PopulateOutcome, current: usize, total: usize) {
        let state = if outcome.changed { "updated" } else { "unchanged" };
        self.spinner.set_message(format!(
            "[{current}/{total}] {} {state}",
            outcome.path.display()
        ));
    }

    fn done(&self, _result: &GenerateResult) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Clears the spinner when the run fails part-way.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
