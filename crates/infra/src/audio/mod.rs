//! Platform audio hosts
//!
//! - macOS: CoreAudio property API (read and write)
//! - elsewhere: CPAL (read-only)

pub mod status;

#[cfg(target_os = "macos")]
pub mod coreaudio_backend;
#[cfg(not(target_os = "macos"))]
pub mod cpal_backend;

#[cfg(target_os = "macos")]
pub use coreaudio_backend::CoreAudioHost;
#[cfg(not(target_os = "macos"))]
pub use cpal_backend::CpalHost;

use audiodefault_core::domain::AudioHost;

/// The host for the current platform
pub fn default_host() -> Box<dyn AudioHost> {
    #[cfg(target_os = "macos")]
    {
        Box::new(CoreAudioHost::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(CpalHost::new())
    }
}
