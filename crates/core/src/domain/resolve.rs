//! Device resolution policy
//!
//! Turns a [`TargetSpec`] into at most one device. Enumeration order from the
//! host is authoritative: within a pass, the first match wins and no further
//! tie-breaking is applied.

use crate::domain::audio::{AudioDevice, DeviceDirectory, Result};
use crate::domain::config::ConfigDeviceEntry;
use std::fmt;
use tracing::debug;

/// What the resolver must locate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Exact name, falling back to a case-insensitive substring match
    Named(String),
    /// Whatever the host currently routes output to
    CurrentDefault,
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Named(name) => f.write_str(name),
            TargetSpec::CurrentDefault => f.write_str("current default"),
        }
    }
}

/// Resolve `target` against a fresh view of the host
///
/// For [`TargetSpec::CurrentDefault`] the snapshot is bypassed; the caller is
/// responsible for confirming the returned device is output-capable.
pub fn resolve<D>(target: &TargetSpec, directory: &D) -> Result<Option<AudioDevice>>
where
    D: DeviceDirectory + ?Sized,
{
    match target {
        TargetSpec::CurrentDefault => {
            let id = directory.current_default_output_device()?;
            Ok(Some(directory.describe(id)))
        }
        TargetSpec::Named(want) => {
            let snapshot = directory.snapshot()?;
            Ok(find_by_name(want, &snapshot).cloned())
        }
    }
}

/// Two-pass name lookup over output-capable devices
///
/// Pass 1 is an exact, case-sensitive comparison. Pass 2 accepts either name
/// containing the other, ignoring case. A pass-1 hit always wins.
pub fn find_by_name<'a>(want: &str, snapshot: &'a [AudioDevice]) -> Option<&'a AudioDevice> {
    let outputs = || snapshot.iter().filter(|d| d.output_capable);

    if let Some(exact) = outputs().find(|d| d.name == want) {
        debug!(device = %exact.name, "Exact name match");
        return Some(exact);
    }

    let fuzzy = outputs().find(|d| fuzzy_match(&d.name, want));
    if let Some(device) = fuzzy {
        debug!(device = %device.name, want, "Fuzzy name match");
    }
    fuzzy
}

/// Case-insensitive containment in either direction
///
/// Empty strings never match: an empty `want` is not contained in anything,
/// and an empty device name (a failed lookup) is not contained in `want`.
pub fn fuzzy_match(name: &str, want: &str) -> bool {
    contains_ignore_case(name, want) || contains_ignore_case(want, name)
}

/// True when `name` contains a non-empty `pattern`, ignoring case
pub fn contains_ignore_case(name: &str, pattern: &str) -> bool {
    !pattern.is_empty() && name.to_lowercase().contains(&pattern.to_lowercase())
}

/// Pick the first configured entry with a present output device
///
/// Entries are tried in declared order; the first entry with any match wins,
/// and among its matches the first in enumeration order is chosen.
pub fn select_configured<'a>(
    entries: &'a [ConfigDeviceEntry],
    snapshot: &'a [AudioDevice],
) -> Option<(&'a ConfigDeviceEntry, &'a AudioDevice)> {
    entries.iter().find_map(|entry| {
        snapshot
            .iter()
            .find(|d| d.output_capable && contains_ignore_case(&d.name, &entry.name))
            .map(|device| (entry, device))
    })
}
