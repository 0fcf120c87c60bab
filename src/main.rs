//! intake-relay: relay newly uploaded folder files to a processing endpoint
//!
//! Lists a folder, notifies an endpoint once per file not yet in the log,
//! and appends a row for every file the endpoint accepted.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use intake_relay::{
    cli::{self, OutputOptions},
    config::{CliOverrides, LogKind, RelayConfig, SourceKind, ACCESS_TOKEN_ENV},
    output::OutputFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "intake-relay")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Relay newly uploaded folder files to a processing endpoint", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Run completed (individual notification failures are reported, not fatal)
    1  Configuration, folder or log store error

EXAMPLES:
    # One pass using .intake-relay.yaml
    intake-relay run

    # Preview what would be relayed
    intake-relay run --dry-run

    # Poll a local folder every 30 seconds, logging to a local file
    intake-relay watch --source local --folder ./inbox --log-path relay.ndjson \\
        --notify-url http://localhost:8080/process --interval 30s")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Flags that override values from the configuration file
#[derive(Parser)]
struct RelayArgs {
    /// Folder backend (drive, local)
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// Drive folder ID, or directory path for the local source
    #[arg(long)]
    folder: Option<String>,

    /// Only consider PDF files
    #[arg(long)]
    pdf_only: bool,

    /// Spreadsheet ID of the sheets log
    #[arg(long)]
    spreadsheet: Option<String>,

    /// NDJSON log file path (selects the local log)
    #[arg(long)]
    log_path: Option<PathBuf>,

    /// Notification endpoint URL
    #[arg(long)]
    notify_url: Option<String>,

    /// Treat non-2xx notification responses as failures
    #[arg(long)]
    require_success_status: bool,

    /// Google API bearer token
    #[arg(long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    access_token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,

    /// Output file path for json output (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum SourceArg {
    Drive,
    Local,
}

/// Arguments for the `run` subcommand
#[derive(Parser)]
struct RunArgs {
    #[command(flatten)]
    relay: RelayArgs,

    /// List new files without notifying or logging them
    #[arg(long)]
    dry_run: bool,
}

/// Arguments for the `watch` subcommand
#[derive(Parser)]
struct WatchArgs {
    #[command(flatten)]
    relay: RelayArgs,

    /// Pause between runs (e.g. 30s, 5m, 1h)
    #[arg(long)]
    interval: Option<String>,

    /// Exit after this many runs
    #[arg(long)]
    exit_after: Option<u64>,

    /// Print a status summary every N runs (0 disables)
    #[arg(long, default_value = "12")]
    status_every: u64,

    /// List new files without notifying or logging them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single ingestion pass
    Run(RunArgs),

    /// Run ingestion passes on an interval until interrupted
    Watch(WatchArgs),

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .intake-relay.yaml in the current directory
    Init,
    /// Print the JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl RelayArgs {
    /// Collect the given flags into overrides applied on top of file values.
    ///
    /// `--spreadsheet` selects the Sheets log and `--log-path` the NDJSON log.
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            source_kind: self.source.map(|source| match source {
                SourceArg::Drive => SourceKind::Drive,
                SourceArg::Local => SourceKind::Local,
            }),
            ..Default::default()
        };
        let config = &mut overrides.values;
        if let Some(folder) = &self.folder {
            config.source.folder.clone_from(folder);
        }
        config.source.pdf_only = self.pdf_only;
        if let Some(id) = &self.spreadsheet {
            overrides.log_kind = Some(LogKind::Sheets);
            config.log.spreadsheet_id.clone_from(id);
        }
        if let Some(path) = &self.log_path {
            overrides.log_kind = Some(LogKind::Ndjson);
            config.log.path = Some(path.clone());
        }
        if let Some(url) = &self.notify_url {
            config.notify.url.clone_from(url);
        }
        config.notify.require_success_status = self.require_success_status;
        config.google.access_token.clone_from(&self.access_token);
        overrides
    }

    fn output_options(&self, quiet: bool) -> OutputOptions {
        OutputOptions {
            format: self.output,
            file: self.output_file.clone(),
            quiet,
        }
    }
}

fn load_config(
    explicit: Option<&std::path::Path>,
    overrides: &CliOverrides,
) -> Result<RelayConfig> {
    let (config, loaded_from) = RelayConfig::from_file_with_overrides(explicit, overrides)
        .context("failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref(), &args.relay.overrides())?;
            let output = args.relay.output_options(cli.quiet);
            cli::run_once(&config, args.dry_run, &output)?;
            Ok(())
        }

        Commands::Watch(args) => {
            let mut overrides = args.relay.overrides();
            if let Some(interval) = &args.interval {
                overrides.values.watch.interval.clone_from(interval);
            }
            let config = load_config(cli.config.as_deref(), &overrides)?;
            let output = args.relay.output_options(cli.quiet);
            cli::run_watch(
                &config,
                args.exit_after,
                args.status_every,
                args.dry_run,
                &output,
            )?;
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "intake-relay", &mut io::stdout());
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) =
                    intake_relay::config::load_or_default(cli.config.as_deref())
                        .context("failed to load configuration")?;
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config.redacted())
                    .context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                eprintln!("Config file search paths (in order):");
                for path in intake_relay::config::config_search_paths() {
                    eprintln!("  {}", path.display());
                }
                eprintln!();
                match intake_relay::config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".intake-relay.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = intake_relay::config::generate_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
            ConfigAction::Schema { output } => {
                let schema = intake_relay::config::generate_json_schema();
                match output {
                    Some(path) => {
                        std::fs::write(&path, &schema)?;
                        eprintln!("Schema written to {}", path.display());
                    }
                    None => {
                        println!("{schema}");
                    }
                }
                Ok(())
            }
        },
    }
}
