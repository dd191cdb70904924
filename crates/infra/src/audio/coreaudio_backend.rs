//! CoreAudio host backend
//!
//! Wraps the `AudioObject` property API. Every call reads straight from the
//! HAL; nothing is cached between calls.

use super::status::{check, OsStatusError};
use audiodefault_core::domain::audio::{
    AudioError, AudioHost, DeviceDirectory, DeviceId, DeviceMutator, RateRange, Result,
};
use core_foundation::base::TCFType;
use core_foundation::string::CFString;
use coreaudio_sys::{
    kAudioDevicePropertyAvailableNominalSampleRates, kAudioDevicePropertyNominalSampleRate,
    kAudioDevicePropertyScopeOutput, kAudioDevicePropertyStreams,
    kAudioHardwarePropertyDefaultOutputDevice, kAudioHardwarePropertyDefaultSystemOutputDevice,
    kAudioHardwarePropertyDevices, kAudioObjectPropertyName, kAudioObjectPropertyScopeGlobal,
    kAudioObjectSystemObject, AudioObjectGetPropertyData, AudioObjectGetPropertyDataSize,
    AudioObjectID, AudioObjectIsPropertySettable, AudioObjectPropertyAddress,
    AudioObjectPropertyScope, AudioObjectPropertySelector, AudioObjectSetPropertyData,
    AudioValueRange, Boolean, CFStringRef,
};
use std::ffi::c_void;
use std::{mem, ptr};
use tracing::{debug, trace};

/// `kAudioObjectPropertyElementMain`
const ELEMENT_MAIN: u32 = 0;

const SYSTEM_OBJECT: AudioObjectID = kAudioObjectSystemObject as AudioObjectID;

fn address(
    selector: AudioObjectPropertySelector,
    scope: AudioObjectPropertyScope,
) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: selector,
        mScope: scope,
        mElement: ELEMENT_MAIN,
    }
}

fn global(selector: u32) -> AudioObjectPropertyAddress {
    address(
        selector as AudioObjectPropertySelector,
        kAudioObjectPropertyScopeGlobal as AudioObjectPropertyScope,
    )
}

/// Read a fixed-size property value
fn read_scalar<T: Copy>(
    object: AudioObjectID,
    addr: &AudioObjectPropertyAddress,
    mut value: T,
    context: &'static str,
) -> std::result::Result<T, OsStatusError> {
    let mut size = mem::size_of::<T>() as u32;
    // SAFETY: `value` is a plain-old-data buffer of exactly `size` bytes.
    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            addr,
            0,
            ptr::null(),
            &mut size,
            &mut value as *mut T as *mut c_void,
        )
    };
    check(status, context)?;
    Ok(value)
}

/// Read a variable-length array property
fn read_array<T: Copy>(
    object: AudioObjectID,
    addr: &AudioObjectPropertyAddress,
    zero: T,
    context: &'static str,
) -> std::result::Result<Vec<T>, OsStatusError> {
    let mut size: u32 = 0;
    // SAFETY: only writes the byte size through a valid pointer.
    let status =
        unsafe { AudioObjectGetPropertyDataSize(object, addr, 0, ptr::null(), &mut size) };
    check(status, context)?;

    let count = size as usize / mem::size_of::<T>();
    let mut values = vec![zero; count];
    if count == 0 {
        return Ok(values);
    }

    // SAFETY: `values` holds `count` elements, which is `size` bytes.
    let status = unsafe {
        AudioObjectGetPropertyData(
            object,
            addr,
            0,
            ptr::null(),
            &mut size,
            values.as_mut_ptr() as *mut c_void,
        )
    };
    check(status, context)?;

    // The HAL may return fewer bytes than it announced.
    values.truncate(size as usize / mem::size_of::<T>());
    Ok(values)
}

/// Write a fixed-size property value
fn write_scalar<T: Copy>(
    object: AudioObjectID,
    addr: &AudioObjectPropertyAddress,
    value: T,
    context: &'static str,
) -> std::result::Result<(), OsStatusError> {
    // SAFETY: the HAL copies `size_of::<T>()` bytes out of `value`.
    let status = unsafe {
        AudioObjectSetPropertyData(
            object,
            addr,
            0,
            ptr::null(),
            mem::size_of::<T>() as u32,
            &value as *const T as *const c_void,
        )
    };
    check(status, context)
}

fn is_settable(
    object: AudioObjectID,
    addr: &AudioObjectPropertyAddress,
) -> std::result::Result<bool, OsStatusError> {
    let mut settable: Boolean = 0;
    // SAFETY: writes one Boolean through a valid pointer.
    let status = unsafe { AudioObjectIsPropertySettable(object, addr, &mut settable) };
    check(status, "Check sample rate settable")?;
    Ok(settable != 0)
}

/// CoreAudio-backed host
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreAudioHost;

impl CoreAudioHost {
    pub fn new() -> Self {
        debug!("Using CoreAudio host");
        Self
    }
}

impl DeviceDirectory for CoreAudioHost {
    fn list_devices(&self) -> Result<Vec<DeviceId>> {
        let addr = global(kAudioHardwarePropertyDevices as u32);
        let ids = read_array::<AudioObjectID>(SYSTEM_OBJECT, &addr, 0, "Get devices")
            .map_err(OsStatusError::into_query)?;

        trace!(count = ids.len(), "Enumerated devices");
        Ok(ids.into_iter().map(DeviceId::new).collect())
    }

    fn is_output_capable(&self, device: DeviceId) -> bool {
        let addr = address(
            kAudioDevicePropertyStreams as AudioObjectPropertySelector,
            kAudioDevicePropertyScopeOutput as AudioObjectPropertyScope,
        );
        let mut size: u32 = 0;
        // SAFETY: only writes the byte size through a valid pointer.
        let status = unsafe {
            AudioObjectGetPropertyDataSize(device.as_raw(), &addr, 0, ptr::null(), &mut size)
        };
        check(status, "Get output streams").is_ok() && size > 0
    }

    fn display_name(&self, device: DeviceId) -> String {
        let addr = global(kAudioObjectPropertyName as u32);
        let name_ref: CFStringRef = ptr::null();

        match read_scalar(device.as_raw(), &addr, name_ref, "Get device name") {
            Ok(name_ref) if !name_ref.is_null() => {
                // SAFETY: the HAL hands back a +1 retained CFString; wrapping
                // under the create rule releases it on drop.
                let name = unsafe {
                    CFString::wrap_under_create_rule(
                        name_ref as core_foundation::string::CFStringRef,
                    )
                };
                name.to_string()
            }
            Ok(_) => String::new(),
            Err(e) => {
                trace!(error = %e, %device, "Name lookup failed");
                String::new()
            }
        }
    }

    fn available_sample_rates(&self, device: DeviceId) -> Result<Vec<RateRange>> {
        let addr = global(kAudioDevicePropertyAvailableNominalSampleRates as u32);
        let zero = AudioValueRange {
            mMinimum: 0.0,
            mMaximum: 0.0,
        };

        let ranges = read_array(device.as_raw(), &addr, zero, "Avail rate ranges")
            .map_err(OsStatusError::into_query)?;
        Ok(ranges
            .into_iter()
            .map(|r| RateRange::new(r.mMinimum, r.mMaximum))
            .collect())
    }

    fn nominal_sample_rate(&self, device: DeviceId) -> Result<f64> {
        let addr = global(kAudioDevicePropertyNominalSampleRate as u32);
        read_scalar(device.as_raw(), &addr, 0.0f64, "Get sample rate")
            .map_err(OsStatusError::into_query)
    }

    fn current_default_output_device(&self) -> Result<DeviceId> {
        let addr = global(kAudioHardwarePropertyDefaultOutputDevice as u32);
        let id = read_scalar::<AudioObjectID>(SYSTEM_OBJECT, &addr, 0, "Get default output")
            .map_err(OsStatusError::into_query)?;

        // kAudioObjectUnknown
        if id == 0 {
            return Err(AudioError::HostQuery("No default output device".to_string()));
        }
        Ok(DeviceId::new(id))
    }
}

impl DeviceMutator for CoreAudioHost {
    fn set_as_default_output(&self, device: DeviceId) -> Result<()> {
        for selector in [
            kAudioHardwarePropertyDefaultOutputDevice as u32,
            kAudioHardwarePropertyDefaultSystemOutputDevice as u32,
        ] {
            let addr = global(selector);
            write_scalar::<AudioObjectID>(SYSTEM_OBJECT, &addr, device.as_raw(), "Set default output")
                .map_err(OsStatusError::into_mutation)?;
        }

        debug!(%device, "Default and system output assigned");
        Ok(())
    }

    fn set_sample_rate(&self, device: DeviceId, hz: f64) -> Result<()> {
        let addr = global(kAudioDevicePropertyNominalSampleRate as u32);

        match is_settable(device.as_raw(), &addr) {
            Ok(true) => {}
            Ok(false) => return Err(AudioError::RateNotSettable(self.display_name(device))),
            Err(e) => {
                debug!(error = %e, %device, "Settability query failed");
                return Err(AudioError::RateNotSettable(self.display_name(device)));
            }
        }

        write_scalar(device.as_raw(), &addr, hz, "Set sample rate")
            .map_err(OsStatusError::into_mutation)?;

        debug!(%device, rate = hz, "Nominal sample rate set");
        Ok(())
    }
}

impl AudioHost for CoreAudioHost {
    fn backend_name(&self) -> &'static str {
        "CoreAudio"
    }
}
