//! Status reporting and process outcome
//!
//! Orchestrators never print. They emit [`Report`]s to a [`Reporter`] and
//! return an [`ExitStatus`]; the binary decides how each report is rendered.

use crate::domain::audio::{AudioError, RateRange};
use crate::domain::resolve::TargetSpec;

/// Terminal outcome of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Exhausted retries, no configured device, or a runtime error
    Failure,
    /// The config document could not be read or parsed
    ConfigError,
}

impl ExitStatus {
    pub fn code(&self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::ConfigError => 2,
        }
    }
}

/// Where an applied setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    CommandLine,
    Config,
}

/// A status event worth showing the user
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Device made default and clocked at `rate`
    Applied {
        device: String,
        rate: f64,
        origin: Origin,
    },
    /// Nothing configured was present; the live default was re-applied
    FallbackApplied { device: String },
    /// Ranges a device accepts, ascending by minimum
    AvailableRates {
        device: String,
        ranges: Vec<RateRange>,
    },
    /// Target absent on this attempt
    NotFoundYet {
        target: TargetSpec,
        attempt: u32,
        tries: u32,
    },
    /// An attempt raised a host error
    AttemptFailed {
        error: AudioError,
        attempt: u32,
        tries: u32,
    },
    /// Every attempt failed
    Exhausted,
    /// No configured entry matched and fallback is disabled
    NoConfiguredDevice,
    /// A single-pass run hit a host error
    Failed(AudioError),
    /// Config document unusable
    ConfigRejected(String),
    /// Configured polling interval, for an external scheduler
    Interval(i64),
    /// One line of `list` output
    Device(DeviceListing),
    /// The current default output device
    CurrentDefault {
        device: String,
        rate: Option<f64>,
    },
}

/// Everything `list` knows about a device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceListing {
    pub id: u32,
    pub name: String,
    pub output_capable: bool,
    pub is_default: bool,
    pub rate: Option<f64>,
    pub ranges: Vec<RateRange>,
}

/// Sink for status events
pub trait Reporter {
    fn report(&mut self, report: Report);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, report: Report) {
        (**self).report(report)
    }
}
