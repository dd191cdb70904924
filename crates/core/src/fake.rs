//! Scripted in-memory host for testing without audio hardware
//!
//! Devices can be delayed (visible only from the N-th enumeration on),
//! rate-locked, or given no ranges; the host can be told to reject
//! enumeration or mutations. Every mutation is logged in order.
//!
//! # Usage
//!
//! ```
//! use audiodefault_core::fake::{FakeDevice, FakeHost};
//! use audiodefault_core::domain::RateRange;
//!
//! let host = FakeHost::new(vec![
//!     FakeDevice::output(1, "MacBook Pro Speakers").with_ranges(vec![RateRange::discrete(48000.0)]),
//!     FakeDevice::output(2, "JDS Labs Element IV").appears_on_listing(2),
//! ])
//! .with_default(1);
//! ```

use crate::domain::audio::{
    AudioDevice, AudioError, AudioHost, DeviceDirectory, DeviceId, DeviceMutator, RateRange,
    Result,
};
use crate::domain::legacy::Sleeper;
use crate::domain::report::{Report, Reporter};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

/// A device the fake host knows about
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub id: u32,
    pub name: String,
    pub output_capable: bool,
    pub ranges: Vec<RateRange>,
    pub rate_settable: bool,
    pub rate: f64,
    /// 1-based enumeration from which the device is listed
    pub visible_from: u32,
}

impl FakeDevice {
    pub fn output(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            output_capable: true,
            ranges: Vec::new(),
            rate_settable: true,
            rate: 44100.0,
            visible_from: 1,
        }
    }

    pub fn input(id: u32, name: &str) -> Self {
        Self {
            output_capable: false,
            ..Self::output(id, name)
        }
    }

    pub fn with_ranges(mut self, ranges: Vec<RateRange>) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_rate(mut self, hz: f64) -> Self {
        self.rate = hz;
        self
    }

    /// Nominal rate property is read-only
    pub fn rate_locked(mut self) -> Self {
        self.rate_settable = false;
        self
    }

    /// Hide the device until the `listing`-th enumeration
    pub fn appears_on_listing(mut self, listing: u32) -> Self {
        self.visible_from = listing;
        self
    }
}

/// A host mutation, in the order it was issued
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    DefaultOutput(u32),
    SampleRate(u32, f64),
}

#[derive(Debug, Default)]
struct FakeState {
    listings: u32,
    queries: u32,
    default_output: Option<u32>,
    default_system_output: Option<u32>,
    rates: HashMap<u32, f64>,
    mutations: Vec<Mutation>,
}

/// In-memory [`AudioHost`]
#[derive(Debug)]
pub struct FakeHost {
    devices: Vec<FakeDevice>,
    fail_enumeration: bool,
    reject_default_output: bool,
    reject_sample_rate: bool,
    state: RefCell<FakeState>,
}

impl FakeHost {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        let rates = devices.iter().map(|d| (d.id, d.rate)).collect();
        Self {
            devices,
            fail_enumeration: false,
            reject_default_output: false,
            reject_sample_rate: false,
            state: RefCell::new(FakeState {
                rates,
                ..FakeState::default()
            }),
        }
    }

    /// Set the device the host currently routes output to
    pub fn with_default(self, id: u32) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.default_output = Some(id);
            state.default_system_output = Some(id);
        }
        self
    }

    pub fn failing_enumeration(mut self) -> Self {
        self.fail_enumeration = true;
        self
    }

    pub fn rejecting_default_output(mut self) -> Self {
        self.reject_default_output = true;
        self
    }

    pub fn rejecting_sample_rate(mut self) -> Self {
        self.reject_sample_rate = true;
        self
    }

    /// Mutations issued so far
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.borrow().mutations.clone()
    }

    /// Number of `list_devices` calls
    pub fn listings(&self) -> u32 {
        self.state.borrow().listings
    }

    /// Number of directory calls of any kind
    pub fn query_count(&self) -> u32 {
        self.state.borrow().queries
    }

    pub fn default_output(&self) -> Option<u32> {
        self.state.borrow().default_output
    }

    pub fn default_system_output(&self) -> Option<u32> {
        self.state.borrow().default_system_output
    }

    pub fn rate_of(&self, id: u32) -> Option<f64> {
        self.state.borrow().rates.get(&id).copied()
    }

    /// Snapshot record for a known device
    pub fn describe_device(&self, id: u32) -> AudioDevice {
        self.describe(DeviceId::new(id))
    }

    fn device(&self, id: DeviceId) -> Option<&FakeDevice> {
        self.devices.iter().find(|d| d.id == id.as_raw())
    }

    fn count_query(&self) {
        self.state.borrow_mut().queries += 1;
    }
}

impl DeviceDirectory for FakeHost {
    fn list_devices(&self) -> Result<Vec<DeviceId>> {
        self.count_query();
        if self.fail_enumeration {
            return Err(AudioError::HostQuery("Get devices (OSStatus=-1)".to_string()));
        }

        let listing = {
            let mut state = self.state.borrow_mut();
            state.listings += 1;
            state.listings
        };

        Ok(self
            .devices
            .iter()
            .filter(|d| d.visible_from <= listing)
            .map(|d| DeviceId::new(d.id))
            .collect())
    }

    fn is_output_capable(&self, device: DeviceId) -> bool {
        self.count_query();
        self.device(device).map(|d| d.output_capable).unwrap_or(false)
    }

    fn display_name(&self, device: DeviceId) -> String {
        self.count_query();
        self.device(device).map(|d| d.name.clone()).unwrap_or_default()
    }

    fn available_sample_rates(&self, device: DeviceId) -> Result<Vec<RateRange>> {
        self.count_query();
        self.device(device)
            .map(|d| d.ranges.clone())
            .ok_or_else(|| AudioError::HostQuery(format!("Avail rate ranges for {}", device)))
    }

    fn nominal_sample_rate(&self, device: DeviceId) -> Result<f64> {
        self.count_query();
        self.state
            .borrow()
            .rates
            .get(&device.as_raw())
            .copied()
            .ok_or_else(|| AudioError::HostQuery(format!("Nominal rate for {}", device)))
    }

    fn current_default_output_device(&self) -> Result<DeviceId> {
        self.count_query();
        self.state
            .borrow()
            .default_output
            .map(DeviceId::new)
            .ok_or_else(|| AudioError::HostQuery("Get default output".to_string()))
    }
}

impl DeviceMutator for FakeHost {
    fn set_as_default_output(&self, device: DeviceId) -> Result<()> {
        if self.reject_default_output || self.device(device).is_none() {
            return Err(AudioError::HostMutation(
                "Set default output (OSStatus=-50)".to_string(),
            ));
        }

        let mut state = self.state.borrow_mut();
        state.default_output = Some(device.as_raw());
        state.default_system_output = Some(device.as_raw());
        state.mutations.push(Mutation::DefaultOutput(device.as_raw()));
        Ok(())
    }

    fn set_sample_rate(&self, device: DeviceId, hz: f64) -> Result<()> {
        let Some(fake) = self.device(device) else {
            return Err(AudioError::HostMutation(
                "Set sample rate (OSStatus=-50)".to_string(),
            ));
        };
        if !fake.rate_settable {
            return Err(AudioError::RateNotSettable(fake.name.clone()));
        }
        if self.reject_sample_rate {
            return Err(AudioError::HostMutation(
                "Set sample rate (OSStatus=-50)".to_string(),
            ));
        }

        let mut state = self.state.borrow_mut();
        state.rates.insert(fake.id, hz);
        state.mutations.push(Mutation::SampleRate(fake.id, hz));
        Ok(())
    }
}

impl AudioHost for FakeHost {
    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

/// Collects reports in order
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub reports: Vec<Report>,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }
}

/// Records requested pauses instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    pub sleeps: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}
