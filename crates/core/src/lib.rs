//! Default output device selection and sample-rate control
//!
//! The [`domain`] module holds everything platform-agnostic: the host
//! capability traits, the resolution policy, the config model and both
//! orchestrators. Host backends live in `audiodefault-infra`.

pub mod domain;
pub mod fake;

pub use domain::*;
