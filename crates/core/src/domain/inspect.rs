//! Read-only inspection: `list` and `default`

use crate::domain::audio::{sorted_by_min, AudioHost, Result};
use crate::domain::report::{DeviceListing, ExitStatus, Report, Reporter};
use tracing::{debug, error};

/// Report every device the host knows about
pub fn list_devices<H, R>(host: &H, reporter: &mut R) -> ExitStatus
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
{
    match collect_listings(host) {
        Ok(listings) => {
            for listing in listings {
                reporter.report(Report::Device(listing));
            }
            ExitStatus::Success
        }
        Err(e) => {
            error!(error = %e, "Listing failed");
            reporter.report(Report::Failed(e));
            ExitStatus::Failure
        }
    }
}

fn collect_listings<H>(host: &H) -> Result<Vec<DeviceListing>>
where
    H: AudioHost + ?Sized,
{
    let default = host.current_default_output_device().ok();
    debug!(backend = host.backend_name(), ?default, "Listing devices");

    Ok(host
        .snapshot()?
        .into_iter()
        .map(|device| DeviceListing {
            id: device.id.as_raw(),
            is_default: Some(device.id) == default,
            rate: host.nominal_sample_rate(device.id).ok(),
            ranges: host
                .available_sample_rates(device.id)
                .map(sorted_by_min)
                .unwrap_or_default(),
            name: device.name,
            output_capable: device.output_capable,
        })
        .collect())
}

/// Report the current default output device and its running rate
pub fn show_default<H, R>(host: &H, reporter: &mut R) -> ExitStatus
where
    H: AudioHost + ?Sized,
    R: Reporter + ?Sized,
{
    match host.current_default_output_device() {
        Ok(id) => {
            reporter.report(Report::CurrentDefault {
                device: host.display_name(id),
                rate: host.nominal_sample_rate(id).ok(),
            });
            ExitStatus::Success
        }
        Err(e) => {
            reporter.report(Report::Failed(e));
            ExitStatus::Failure
        }
    }
}
