//! Host bindings for audiodefault

pub mod audio;

pub use audio::default_host;
