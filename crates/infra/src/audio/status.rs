//! OSStatus translation
//!
//! CoreAudio reports failures as `OSStatus` codes, many of which are
//! four-character codes (`'!dat'`, `'who?'`). This module turns them into
//! typed errors with readable messages. It has no platform dependencies so it
//! is tested everywhere.

use audiodefault_core::domain::AudioError;
use std::fmt;
use thiserror::Error;

/// `noErr`
pub const NO_ERR: i32 = 0;

/// A non-zero status returned by a host property call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{context} (OSStatus={status}{})", four_cc(.status))]
pub struct OsStatusError {
    pub context: &'static str,
    pub status: i32,
}

impl OsStatusError {
    /// Failure of a read
    pub fn into_query(self) -> AudioError {
        AudioError::HostQuery(self.to_string())
    }

    /// Failure of a write
    pub fn into_mutation(self) -> AudioError {
        AudioError::HostMutation(self.to_string())
    }
}

/// `Ok` for `noErr`, otherwise an error carrying `context`
pub fn check(status: i32, context: &'static str) -> Result<(), OsStatusError> {
    if status == NO_ERR {
        Ok(())
    } else {
        Err(OsStatusError { context, status })
    }
}

/// Renders ` 'abcd'` when the status is a printable four-character code
struct FourCc(i32);

fn four_cc(status: &i32) -> FourCc {
    FourCc(*status)
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            let code: String = bytes.iter().map(|&b| b as char).collect();
            write!(f, " '{}'", code)
        } else {
            Ok(())
        }
    }
}
