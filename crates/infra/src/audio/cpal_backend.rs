//! CPAL-based host for platforms without a CoreAudio property API
//!
//! CPAL exposes no way to change the system default device or a device's
//! nominal rate, so this host is read-only: inspection works, mutations fail
//! with a typed error. Device ids are enumeration indices and are only valid
//! for the lifetime of the current device list.

use audiodefault_core::domain::audio::{
    AudioError, AudioHost, DeviceDirectory, DeviceId, DeviceMutator, RateRange, Result,
};
use cpal::traits::{DeviceTrait, HostTrait};
use std::fmt;
use tracing::{debug, warn};

/// CPAL-backed read-only host
pub struct CpalHost {
    host: cpal::Host,
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CpalHost {
    pub fn new() -> Self {
        let host = cpal::default_host();
        debug!("Using audio host: {:?}", host.id());
        Self { host }
    }

    fn devices(&self) -> Result<Vec<cpal::Device>> {
        self.host
            .devices()
            .map(|devices| devices.collect())
            .map_err(|e| AudioError::HostQuery(e.to_string()))
    }

    fn device(&self, id: DeviceId) -> Result<cpal::Device> {
        self.devices()?
            .into_iter()
            .nth(id.as_raw() as usize)
            .ok_or_else(|| AudioError::DeviceNotFound(id.to_string()))
    }

    #[allow(deprecated)]
    fn name_of(device: &cpal::Device) -> String {
        device.name().unwrap_or_default()
    }
}

impl fmt::Debug for CpalHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpalHost")
            .field("host", &self.host.id())
            .finish()
    }
}

impl DeviceDirectory for CpalHost {
    fn list_devices(&self) -> Result<Vec<DeviceId>> {
        let count = self.devices()?.len();
        Ok((0..count as u32).map(DeviceId::new).collect())
    }

    fn is_output_capable(&self, device: DeviceId) -> bool {
        self.device(device)
            .ok()
            .and_then(|d| d.supported_output_configs().ok())
            .map(|mut configs| configs.next().is_some())
            .unwrap_or(false)
    }

    fn display_name(&self, device: DeviceId) -> String {
        self.device(device)
            .map(|d| Self::name_of(&d))
            .unwrap_or_default()
    }

    fn available_sample_rates(&self, device: DeviceId) -> Result<Vec<RateRange>> {
        let configs = self
            .device(device)?
            .supported_output_configs()
            .map_err(|e| AudioError::HostQuery(e.to_string()))?;

        let mut ranges: Vec<RateRange> = Vec::new();
        for config in configs {
            let range = RateRange::new(
                f64::from(config.min_sample_rate()),
                f64::from(config.max_sample_rate()),
            );
            // One entry per channel layout; keep each range once
            if !ranges.contains(&range) {
                ranges.push(range);
            }
        }
        Ok(ranges)
    }

    fn nominal_sample_rate(&self, device: DeviceId) -> Result<f64> {
        let config = self
            .device(device)?
            .default_output_config()
            .map_err(|e| AudioError::HostQuery(e.to_string()))?;
        Ok(f64::from(config.sample_rate()))
    }

    fn current_default_output_device(&self) -> Result<DeviceId> {
        let default = self
            .host
            .default_output_device()
            .ok_or_else(|| AudioError::HostQuery("No default output device".to_string()))?;
        let wanted = Self::name_of(&default);

        self.devices()?
            .iter()
            .position(|d| Self::name_of(d) == wanted)
            .map(|index| DeviceId::new(index as u32))
            .ok_or_else(|| AudioError::DeviceNotFound(wanted))
    }
}

impl DeviceMutator for CpalHost {
    fn set_as_default_output(&self, device: DeviceId) -> Result<()> {
        warn!(%device, "Default output cannot be changed through CPAL");
        Err(AudioError::HostMutation(format!(
            "{} cannot change the default output device",
            self.backend_name()
        )))
    }

    fn set_sample_rate(&self, device: DeviceId, _hz: f64) -> Result<()> {
        Err(AudioError::RateNotSettable(self.display_name(device)))
    }
}

impl AudioHost for CpalHost {
    fn backend_name(&self) -> &'static str {
        "CPAL"
    }
}
