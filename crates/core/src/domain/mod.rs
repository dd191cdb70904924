//! Domain entities and business rules

pub mod apply;
pub mod audio;
pub mod config;
pub mod inspect;
pub mod legacy;
pub mod priority;
pub mod report;
pub mod resolve;

// Re-export specific items to avoid ambiguous glob imports
pub use apply::{apply_device, chosen_rate};
pub use audio::{
    max_rate, sorted_by_min, AudioDevice, AudioError, AudioHost, DeviceDirectory, DeviceId,
    DeviceMutator, RateRange,
};
pub use config::{
    expand_tilde, ConfigDeviceEntry, ConfigError, RateSpec, RunConfig,
    DEFAULT_CHECK_FREQUENCY_SECS,
};
pub use inspect::{list_devices, show_default};
pub use legacy::{
    run_legacy, LegacyOptions, Sleeper, ThreadSleeper, DEFAULT_DEVICE_NAME, DEFAULT_RATE_HZ,
};
pub use priority::{run_config_file, run_from_config};
pub use report::{DeviceListing, ExitStatus, Origin, Report, Reporter};
pub use resolve::{find_by_name, resolve, select_configured, TargetSpec};
