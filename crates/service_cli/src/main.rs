//! risk-bench CLI
//!
//! Entry point for the portfolio risk benchmark.
//!
//! Exit codes: 0 on success or after `--help`/`--version`, 1 on malformed
//! flags, invalid configuration or a failed run.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use infra_system::{EnvironmentTuner, PlatformTuner};
use service_cli::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match run_cli(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(level: &str) {
    // Logs go to stderr; stdout carries only the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_cli(cli: &Cli) -> Result<()> {
    let config = BenchConfig::resolve(cli).context("invalid configuration")?;
    init_tracing(&config.log_level);

    let tuner = EnvironmentTuner::native();
    let mut stdout = std::io::stdout().lock();

    if cli.sysinfo {
        let info = tuner.system_info();
        match config.format {
            OutputFormat::Table => write!(stdout, "{info}")?,
            OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(&info)?)?,
        }
        return Ok(());
    }

    tracing::info!(
        positions = config.positions,
        simulations = config.simulations,
        threads = config.threads,
        platform = tuner.platform().name(),
        "starting benchmark"
    );

    if config.format == OutputFormat::Table {
        write!(stdout, "{}", render_header(&config))?;
    }

    // Tuning is process-wide and must precede worker fan-out
    let tuning = config.system.has_requests().then(|| tuner.apply(&config.system));
    if let (Some(report), OutputFormat::Table) = (&tuning, config.format) {
        write!(stdout, "{}", render_tuning(&config.system, report))?;
    }
    stdout.flush()?;

    let summary = service_cli::runner::run(&config).context("benchmark run failed")?;

    match config.format {
        OutputFormat::Table => write!(stdout, "{}", render_table(&summary))?,
        OutputFormat::Json => writeln!(
            stdout,
            "{}",
            render_json(&config, tuning.as_ref(), &summary)?
        )?,
    }
    Ok(())
}
