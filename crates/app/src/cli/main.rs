//! mac-audio-default CLI Application

mod args;
mod console;

use anyhow::Result;
use args::{Cli, Mode};
use audiodefault_core::domain::{
    list_devices, run_config_file, run_legacy, show_default, AudioHost, ThreadSleeper,
};
use clap::Parser;
use console::ConsoleReporter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let host = audiodefault_infra::default_host();
    tracing::debug!(backend = host.backend_name(), "Host ready");

    let mut reporter = ConsoleReporter::stdio();
    let status = match cli.into_mode() {
        Mode::List => list_devices(&host, &mut reporter),
        Mode::ShowDefault => show_default(&host, &mut reporter),
        Mode::Legacy(options) => run_legacy(&host, &options, &mut reporter, &mut ThreadSleeper),
        Mode::Config {
            path,
            print_interval_only,
        } => run_config_file(&host, path, print_interval_only, &mut reporter),
    };

    Ok(ExitCode::from(status.code()))
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}
