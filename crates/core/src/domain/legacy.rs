//! Retry-driven orchestration for command-line targets
//!
//! Each attempt takes a fresh look at the host: resolve, confirm output
//! capability, apply. Attempt failures of any kind (absent device, query or
//! mutation errors) are reported and retried; only exhaustion is fatal.

use crate::domain::apply::apply_device;
use crate::domain::audio::{sorted_by_min, AudioHost, Result};
use crate::domain::config::RateSpec;
use crate::domain::report::{ExitStatus, Origin, Report, Reporter};
use crate::domain::resolve::{resolve, TargetSpec};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Name targeted when none is given on the command line
pub const DEFAULT_DEVICE_NAME: &str = "JDS Labs Element IV";

/// Rate applied when none is given on the command line
pub const DEFAULT_RATE_HZ: f64 = 192000.0;

/// Blocking pause between attempts
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Immutable legacy-mode request, built once from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyOptions {
    pub target: TargetSpec,
    pub rate: RateSpec,
    /// Attempts before giving up, at least 1
    pub tries: u32,
    /// Pause between attempts
    pub wait: Duration,
    /// Report the device's available ranges before applying
    pub print_rates: bool,
}

impl Default for LegacyOptions {
    fn default() -> Self {
        Self {
            target: TargetSpec::Named(DEFAULT_DEVICE_NAME.to_string()),
            rate: RateSpec::Fixed(DEFAULT_RATE_HZ),
            tries: 3,
            wait: Duration::from_secs(1),
            print_rates: false,
        }
    }
}

/// Outcome of a single attempt
enum Attempt {
    Applied,
    NotFound,
}

/// Run legacy mode to completion
#[instrument(skip_all, fields(target = %options.target, tries = options.tries))]
pub fn run_legacy<H, R, S>(
    host: &H,
    options: &LegacyOptions,
    reporter: &mut R,
    sleeper: &mut S,
) -> ExitStatus
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
    S: Sleeper + ?Sized,
{
    let tries = options.tries.max(1);

    for attempt in 1..=tries {
        debug!(attempt, "Starting attempt");

        match try_once(host, options, reporter) {
            Ok(Attempt::Applied) => return ExitStatus::Success,
            Ok(Attempt::NotFound) => {
                warn!(attempt, tries, "Device not found");
                reporter.report(Report::NotFoundYet {
                    target: options.target.clone(),
                    attempt,
                    tries,
                });
            }
            Err(error) => {
                warn!(attempt, tries, %error, "Attempt failed");
                reporter.report(Report::AttemptFailed {
                    error,
                    attempt,
                    tries,
                });
            }
        }

        if attempt < tries {
            sleeper.sleep(options.wait);
        }
    }

    reporter.report(Report::Exhausted);
    ExitStatus::Failure
}

fn try_once<H, R>(host: &H, options: &LegacyOptions, reporter: &mut R) -> Result<Attempt>
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
{
    let Some(device) = resolve(&options.target, host)? else {
        return Ok(Attempt::NotFound);
    };

    // A CurrentDefault lookup bypasses the snapshot filter.
    if !device.output_capable {
        return Ok(Attempt::NotFound);
    }

    if options.print_rates {
        match host.available_sample_rates(device.id) {
            Ok(ranges) => reporter.report(Report::AvailableRates {
                device: device.name.clone(),
                ranges: sorted_by_min(ranges),
            }),
            Err(error) => debug!(%error, "Could not read available rates"),
        }
    }

    let rate = apply_device(host, &device, options.rate)?;
    reporter.report(Report::Applied {
        device: device.name,
        rate,
        origin: Origin::CommandLine,
    });
    Ok(Attempt::Applied)
}
