//! Hpo CLI - install, write and print the helm project operator's CRDs

use clap::{ArgAction, Parser, Subcommand, ValueEnum, builder::FalseyValueParser};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use error::Result;

#[derive(Parser)]
#[command(name = "hpo")]
#[command(author = "Helm Project Operator Contributors")]
#[command(version)]
#[command(about = "CRD tooling for the helm project operator", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (overridden per target by RUST_LOG)
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the operator's CustomResourceDefinitions
    #[command(subcommand)]
    Crds(CrdsCommand),
}

#[derive(Subcommand)]
enum CrdsCommand {
    /// Write CRDs to one file per resource
    Write {
        /// Directory for the operator's own CRDs
        #[arg(long)]
        crd_dir: PathBuf,

        /// Directory for dependency CRDs (kept out of the uninstall path)
        #[arg(long)]
        crd_dep_dir: PathBuf,
    },

    /// Print CRDs to stdout
    Print {
        /// Write dependency CRDs to this file instead of stdout
        #[arg(long)]
        dep_output: Option<PathBuf>,
    },

    /// Create missing CRDs in the current cluster
    Create {
        /// Re-apply every CRD, even those already installed
        ///
        /// Any value other than empty, `0`, `false`, `no`, `n`, `off` or `f` enables it.
        #[arg(long, env = "UPDATE_CRDS", value_parser = FalseyValueParser::new())]
        update_crds: bool,

        /// Detect k3s/RKE2 and leave their helm-controller CRDs alone
        #[arg(
            long,
            env = "DETECT_K3S_RKE2",
            default_value_t = true,
            action = ArgAction::Set,
            value_parser = FalseyValueParser::new()
        )]
        detect_k3s_rke2: bool,

        /// Seconds to wait for each CRD to become established
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },

    /// List the CRDs in the catalog
    List,
}

fn init_tracing(cli: &Cli) {
    let level: LevelFilter = if cli.debug {
        LevelFilter::DEBUG
    } else {
        cli.log_level.into()
    };

    // stderr keeps `crds print` output clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Crds(command) => match command {
            CrdsCommand::Write {
                crd_dir,
                crd_dep_dir,
            } => commands::write::run(&crd_dir, &crd_dep_dir).await,

            CrdsCommand::Print { dep_output } => commands::print::run(dep_output.as_deref()),

            CrdsCommand::Create {
                update_crds,
                detect_k3s_rke2,
                timeout,
            } => commands::create::run(update_crds, detect_k3s_rke2, timeout).await,

            CrdsCommand::List => commands::list::run(),
        },
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
