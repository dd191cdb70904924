//! Applying a chosen device
//!
//! Default-output assignment always happens before the rate is touched. No
//! rollback: if the rate cannot be set, the new default stays in place.

use crate::domain::audio::{AudioDevice, AudioError, AudioHost, Result};
use crate::domain::config::RateSpec;
use tracing::{debug, info};

/// Make `device` the default output and clock it according to `rate`
///
/// Returns the rate that was set.
pub fn apply_device<H>(host: &H, device: &AudioDevice, rate: RateSpec) -> Result<f64>
where
    H: AudioHost + ?Sized,
{
    if !device.output_capable {
        return Err(AudioError::NotOutputCapable(device.name.clone()));
    }

    host.set_as_default_output(device.id)?;
    debug!(device = %device.name, "Assigned default output");

    let hz = chosen_rate(host, device, rate)?;
    host.set_sample_rate(device.id, hz)?;
    info!(device = %device.name, rate = hz, "Applied device");

    Ok(hz)
}

/// Resolve a [`RateSpec`] to a concrete rate for `device`
pub fn chosen_rate<H>(host: &H, device: &AudioDevice, rate: RateSpec) -> Result<f64>
where
    H: AudioHost + ?Sized,
{
    match rate {
        RateSpec::Fixed(hz) => Ok(hz),
        RateSpec::Max => host
            .max_available_rate(device.id)?
            .ok_or_else(|| AudioError::NoAvailableRates(device.name.clone())),
    }
}
