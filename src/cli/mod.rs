use std::io;
use std::io::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::checks::Ruleset;
use crate::core::ReadinessReport;
use crate::engine::{Engine, EngineOptions};
use crate::ui::UiConfig;

#[derive(Debug, Parser)]
#[command(
    name = "vmready",
    version,
    about = "Pre-migration readiness checker for virtual machine images: validates OS architecture, edition/SKU, and installed services before conversion to a cloud-hosted virtual desktop image"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the readiness checklist once and write the log artifact
    Check(CheckArgs),
    Config(ConfigArgs),
    Completion(CompletionArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Publisher glob patterns for conflicting vendors; replaces the
    /// configured set (repeatable or comma-separated)
    #[arg(long = "publishers", value_delimiter = ',')]
    pub publishers: Vec<String>,
    /// Exclude known first-party client-app services from the conflict set
    #[arg(long)]
    pub ignore_client_app: bool,
    /// Exclude services matching the vendor-client product pattern
    #[arg(long)]
    pub ignore_vendor_client: bool,
    /// Where to write the run log (truncated per run)
    #[arg(long)]
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = crate::platform::effective_home_dir()?;

    let env_config_path = std::env::var_os("VMREADY_CONFIG").map(PathBuf::from);
    let mut cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;
    let ui_cfg = UiConfig {
        color,
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Check(args) => {
            if !args.publishers.is_empty() {
                cfg.services.publishers = args.publishers;
            }
            if args.ignore_client_app {
                cfg.services.ignore_client_app = true;
            }
            if args.ignore_vendor_client {
                cfg.services.ignore_vendor_client = true;
            }
            if let Some(log_path) = args.log_path {
                cfg.log.path = log_path;
            }

            let ruleset = Ruleset::from_config(&cfg).map_err(crate::exit::invalid_args_err)?;
            let engine = Engine::new(
                EngineOptions {
                    timeout: Duration::from_secs(cli.timeout),
                },
                ruleset,
            );
            let report = engine.check();

            // The log artifact is a primary output; a write failure is an
            // error, unlike the collaborator queries.
            let mut log = crate::logs::RunLog::create(&cfg.log.path)?;
            log.write_report(&report)?;

            if cli.json {
                write_json(&report)?;
            } else {
                crate::ui::print_report(&report, &ui_cfg);
            }

            if !report.overall_passed {
                return Err(crate::exit::checks_failed(report.summary_line()));
            }
        }
        Commands::Config(args) => {
            if args.show {
                if cli.json {
                    let stdout = io::stdout();
                    serde_json::to_writer_pretty(stdout.lock(), &cfg)?;
                } else {
                    println!("{}", toml::to_string_pretty(&cfg)?);
                }
            } else if !ui_cfg.quiet {
                eprintln!("config: use `vmready config --show`");
            }
        }
        Commands::Completion(args) => {
            let shell: clap_complete::Shell = args
                .shell
                .trim()
                .parse()
                .map_err(|_| crate::exit::invalid_args(format!("unknown shell: {}", args.shell)))?;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "vmready", &mut io::stdout());
        }
    }

    Ok(())
}

fn write_json(report: &ReadinessReport) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}
