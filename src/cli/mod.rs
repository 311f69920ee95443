use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod config;
mod info;

use config::Config;

/// sofainfo prints info about SOFA files
#[derive(Parser)]
#[command(name = "sofainfo")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML file selecting the printed sections
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Print a validation report against every supported convention instead
    #[arg(long)]
    pub report: bool,

    /// List the supported conventions and exit
    #[arg(long)]
    pub list_conventions: bool,

    /// SOFA file (.sofa, or .json snapshot)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Initialise `env_logger`; `RUST_LOG` overrides the verbosity flag
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Run the command line; `Err` means an open or read failure
pub fn dispatch(cli: Cli) -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list_conventions {
        info::list_conventions(&mut out)?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(file) = cli.file else {
        Cli::command().write_help(&mut out)?;
        writeln!(out)?;
        return Ok(ExitCode::SUCCESS);
    };

    if cli.report {
        return run_report(&file, &mut out);
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    info::run(&file, &config.display, &mut out)?;
    Ok(ExitCode::SUCCESS)
}

fn run_report(file: &std::path::Path, out: &mut impl Write) -> Result<ExitCode> {
    let report = sofa::validator::validate_sofa_file(file)?;
    writeln!(out, "{}", report.format_colored())?;
    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
