//! Audio device abstractions and domain models
//!
//! This module defines the host capability interfaces the rest of the tool is
//! written against. Implementations for specific platforms (CoreAudio, CPAL)
//! live in the `infra` crate; a scripted in-memory host lives in
//! [`crate::fake`].

use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while talking to the host audio subsystem
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    /// Device enumeration or a property read failed
    #[error("Host query failed: {0}")]
    HostQuery(String),

    /// A property write was rejected by the host
    #[error("Host mutation failed: {0}")]
    HostMutation(String),

    /// The device's nominal sample rate is fixed
    #[error("Sample rate not settable for '{0}'")]
    RateNotSettable(String),

    /// Max rate requested but the device reports no ranges
    #[error("No available rates for '{0}'")]
    NoAvailableRates(String),

    /// Resolution yielded no candidate
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The device exposes no output streams
    #[error("'{0}' is not an output device")]
    NotOutputCapable(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;

/// Opaque host handle for an audio device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u32);

impl DeviceId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed range of nominal sample rates a device accepts, in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateRange {
    pub min: f64,
    pub max: f64,
}

impl RateRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range containing exactly one rate
    pub fn discrete(hz: f64) -> Self {
        Self { min: hz, max: hz }
    }
}

impl fmt::Display for RateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} .. {:.0} Hz", self.min, self.max)
    }
}

/// Highest upper bound across `ranges`, `None` when empty
pub fn max_rate(ranges: &[RateRange]) -> Option<f64> {
    ranges.iter().map(|r| r.max).reduce(f64::max)
}

/// Ranges ordered by ascending minimum, for display
pub fn sorted_by_min(mut ranges: Vec<RateRange>) -> Vec<RateRange> {
    ranges.sort_by(|a, b| a.min.total_cmp(&b.min));
    ranges
}

/// One device as seen in a single enumeration pass
///
/// Snapshots are never cached: the host is the source of truth and may change
/// between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDevice {
    pub id: DeviceId,
    pub name: String,
    pub output_capable: bool,
}

/// Read-only access to the host's device directory
pub trait DeviceDirectory {
    /// Every device known to the host, in the host's enumeration order
    fn list_devices(&self) -> Result<Vec<DeviceId>>;

    /// True iff the device has at least one output stream. Query failure
    /// reads as `false`.
    fn is_output_capable(&self, device: DeviceId) -> bool;

    /// Best-effort display name, empty on failure
    fn display_name(&self, device: DeviceId) -> String;

    /// Nominal sample-rate ranges the device reports
    fn available_sample_rates(&self, device: DeviceId) -> Result<Vec<RateRange>>;

    /// Rate the device is currently clocked at
    fn nominal_sample_rate(&self, device: DeviceId) -> Result<f64>;

    /// Device new system output is routed to
    fn current_default_output_device(&self) -> Result<DeviceId>;

    /// Maximum of all range upper bounds, `None` for a device without ranges
    fn max_available_rate(&self, device: DeviceId) -> Result<Option<f64>> {
        Ok(max_rate(&self.available_sample_rates(device)?))
    }

    /// Enumerate once and describe every device
    fn snapshot(&self) -> Result<Vec<AudioDevice>> {
        let devices: Vec<AudioDevice> = self
            .list_devices()?
            .into_iter()
            .map(|id| AudioDevice {
                id,
                name: self.display_name(id),
                output_capable: self.is_output_capable(id),
            })
            .collect();

        debug!(count = devices.len(), "Took device snapshot");
        Ok(devices)
    }

    /// Snapshot record for a single device
    fn describe(&self, device: DeviceId) -> AudioDevice {
        AudioDevice {
            id: device,
            name: self.display_name(device),
            output_capable: self.is_output_capable(device),
        }
    }
}

/// Host-wide default assignment and rate control
pub trait DeviceMutator {
    /// Point both the default output and the default system (alert) output
    /// at `device`
    fn set_as_default_output(&self, device: DeviceId) -> Result<()>;

    /// Set the nominal sample rate. Fails with
    /// [`AudioError::RateNotSettable`] when the property is read-only.
    fn set_sample_rate(&self, device: DeviceId, hz: f64) -> Result<()>;
}

/// Everything the orchestrators need from a host
pub trait AudioHost: DeviceDirectory + DeviceMutator {
    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}

impl<T: AudioHost + ?Sized> AudioHost for Box<T> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<T: DeviceDirectory + ?Sized> DeviceDirectory for Box<T> {
    fn list_devices(&self) -> Result<Vec<DeviceId>> {
        (**self).list_devices()
    }

    fn is_output_capable(&self, device: DeviceId) -> bool {
        (**self).is_output_capable(device)
    }

    fn display_name(&self, device: DeviceId) -> String {
        (**self).display_name(device)
    }

    fn available_sample_rates(&self, device: DeviceId) -> Result<Vec<RateRange>> {
        (**self).available_sample_rates(device)
    }

    fn nominal_sample_rate(&self, device: DeviceId) -> Result<f64> {
        (**self).nominal_sample_rate(device)
    }

    fn current_default_output_device(&self) -> Result<DeviceId> {
        (**self).current_default_output_device()
    }
}

impl<T: DeviceMutator + ?Sized> DeviceMutator for Box<T> {
    fn set_as_default_output(&self, device: DeviceId) -> Result<()> {
        (**self).set_as_default_output(device)
    }

    fn set_sample_rate(&self, device: DeviceId, hz: f64) -> Result<()> {
        (**self).set_sample_rate(device, hz)
    }
}
