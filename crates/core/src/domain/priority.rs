//! Single-pass orchestration driven by a config priority list
//!
//! Config problems short-circuit before the host is touched. After that, one
//! snapshot is taken and the run ends in exactly one terminal report.

use crate::domain::apply::apply_device;
use crate::domain::audio::{AudioError, AudioHost, Result};
use crate::domain::config::{expand_tilde, RunConfig};
use crate::domain::report::{ExitStatus, Origin, Report, Reporter};
use crate::domain::resolve::select_configured;
use std::path::Path;
use tracing::{debug, error, info, instrument};

/// Load `path` and either print its interval or apply it
#[instrument(skip_all, fields(path = %path.as_ref().display(), print_interval_only))]
pub fn run_config_file<H, R, P>(
    host: &H,
    path: P,
    print_interval_only: bool,
    reporter: &mut R,
) -> ExitStatus
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
    P: AsRef<Path>,
{
    let path = expand_tilde(path);

    let config = match RunConfig::load_from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Config rejected");
            reporter.report(Report::ConfigRejected(e.to_string()));
            return ExitStatus::ConfigError;
        }
    };

    if print_interval_only {
        reporter.report(Report::Interval(config.check_frequency()));
        return ExitStatus::Success;
    }

    run_from_config(host, &config, reporter)
}

/// Apply the first present configured device, or fall back
pub fn run_from_config<H, R>(host: &H, config: &RunConfig, reporter: &mut R) -> ExitStatus
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
{
    match apply_config(host, config) {
        Ok(Some(report)) => {
            reporter.report(report);
            ExitStatus::Success
        }
        Ok(None) => {
            reporter.report(Report::NoConfiguredDevice);
            ExitStatus::Failure
        }
        Err(e) => {
            error!(error = %e, "Config run failed");
            reporter.report(Report::Failed(e));
            ExitStatus::Failure
        }
    }
}

/// `Ok(None)` means nothing matched and fallback is disabled
fn apply_config<H>(host: &H, config: &RunConfig) -> Result<Option<Report>>
where
    H: AudioHost + ?Sized,
{
    let snapshot = host.snapshot()?;

    if let Some((entry, device)) = select_configured(&config.devices, &snapshot) {
        debug!(pattern = %entry.name, device = %device.name, rate = %entry.rate, "Configured device present");
        let rate = apply_device(host, device, entry.rate)?;
        return Ok(Some(Report::Applied {
            device: device.name.clone(),
            rate,
            origin: Origin::Config,
        }));
    }

    if !config.fallback_enabled() {
        info!("No configured device present and fallback disabled");
        return Ok(None);
    }

    let id = host.current_default_output_device()?;
    let device = host.describe(id);
    if !device.output_capable {
        return Err(AudioError::NotOutputCapable(device.name));
    }

    // Fallback never changes the rate.
    host.set_as_default_output(id)?;
    info!(device = %device.name, "Fell back to current default");

    Ok(Some(Report::FallbackApplied {
        device: device.name,
    }))
}
